use actix_web::web::{Data, Json};
use serde::Deserialize;
use sqlx::{query_as, PgPool};

use crate::error::Error;
use crate::models::GalleryPhoto;
use crate::response::List;

pub async fn list(db: Data<PgPool>) -> Result<Json<List<GalleryPhoto>>, Error> {
    let mut conn = db.acquire().await?;
    let photos: Vec<GalleryPhoto> = query_as(
        "SELECT id, title, description, position, url FROM gallery_photos ORDER BY position, id",
    )
    .fetch_all(&mut conn)
    .await?;
    Ok(Json(List::new(photos)))
}

#[derive(Debug, Deserialize)]
pub struct GalleryPhotoCreation {
    title: Option<String>,
    description: Option<String>,
    position: Option<i32>,
    url: String,
}

pub async fn create(Json(body): Json<GalleryPhotoCreation>, db: Data<PgPool>) -> Result<Json<GalleryPhoto>, Error> {
    let mut conn = db.acquire().await?;
    let photo: GalleryPhoto = query_as(
        "INSERT INTO gallery_photos (title, description, position, url)
        VALUES ($1, $2, COALESCE($3, 0), $4)
        RETURNING id, title, description, position, url",
    )
    .bind(&body.title)
    .bind(&body.description)
    .bind(body.position)
    .bind(&body.url)
    .fetch_one(&mut conn)
    .await?;
    Ok(Json(photo))
}
