use actix_web::web::{Data, Json, Path};
use serde::Deserialize;
use sqlx::{query_as, PgPool};

use crate::error::Error;
use crate::models::{Article, ArticleStatus};
use crate::response::List;

pub async fn list(db: Data<PgPool>) -> Result<Json<List<Article>>, Error> {
    let mut conn = db.acquire().await?;
    let articles: Vec<Article> = query_as(
        "SELECT id, title, description, author, content_url, photo_url, status, created_at
        FROM articles
        WHERE status = $1
        ORDER BY id DESC",
    )
    .bind(ArticleStatus::Published)
    .fetch_all(&mut conn)
    .await?;
    Ok(Json(List::new(articles)))
}

// Drafts are indistinguishable from missing articles on the public surface.
pub async fn detail(path: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<Article>, Error> {
    let (article_id,) = path.into_inner();
    let mut conn = db.acquire().await?;
    let article: Article = query_as(
        "SELECT id, title, description, author, content_url, photo_url, status, created_at
        FROM articles
        WHERE id = $1 AND status = $2",
    )
    .bind(article_id)
    .bind(ArticleStatus::Published)
    .fetch_optional(&mut conn)
    .await?
    .ok_or_else(|| Error::NotFound("article not found".into()))?;
    Ok(Json(article))
}

#[derive(Debug, Deserialize)]
pub struct ArticleCreation {
    title: String,
    description: Option<String>,
    author: Option<String>,
    content_url: Option<String>,
    photo_url: Option<String>,
}

// Every article starts as a draft, whatever the client sends.
pub async fn create(Json(body): Json<ArticleCreation>, db: Data<PgPool>) -> Result<Json<Article>, Error> {
    let mut conn = db.acquire().await?;
    let article: Article = query_as(
        "INSERT INTO articles (title, description, author, content_url, photo_url, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, title, description, author, content_url, photo_url, status, created_at",
    )
    .bind(&body.title)
    .bind(&body.description)
    .bind(&body.author)
    .bind(&body.content_url)
    .bind(&body.photo_url)
    .bind(ArticleStatus::Draft)
    .fetch_one(&mut conn)
    .await?;
    Ok(Json(article))
}
