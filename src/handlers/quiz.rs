use actix_web::web::{Data, Json, Path};
use serde::Deserialize;
use sqlx::{query_as, query_scalar, FromRow, PgPool, QueryBuilder};
use std::collections::HashSet;

use crate::context::UserInfo;
use crate::error::Error;
use crate::models::{Answer, Question, Quiz};
use crate::response::List;
use crate::views::{self, QuizDetail, QuizSummary};

#[derive(Debug, FromRow)]
struct SummaryRow {
    id: i32,
    title: String,
    description: Option<String>,
    photos_url: Option<Vec<String>>,
    preview_photo: Option<String>,
    total_questions: i64,
    answered_questions: i64,
}

pub async fn list(user: UserInfo, db: Data<PgPool>) -> Result<Json<List<QuizSummary>>, Error> {
    let mut conn = db.acquire().await?;
    let rows: Vec<SummaryRow> = query_as(
        "SELECT qz.id, qz.title, qz.description, qz.photos_url, qz.preview_photo,
            (SELECT COUNT(*) FROM questions AS q WHERE q.quiz_id = qz.id) AS total_questions,
            (SELECT COUNT(*)
             FROM user_answers AS ua
             JOIN questions AS q ON ua.question_id = q.id
             WHERE q.quiz_id = qz.id AND ua.user_id = $1) AS answered_questions
        FROM quizzes AS qz
        ORDER BY qz.id",
    )
    .bind(&user.id)
    .fetch_all(&mut conn)
    .await?;
    let summaries = rows
        .into_iter()
        .map(|r| QuizSummary {
            id: r.id,
            title: r.title,
            description: r.description,
            photos_url: r.photos_url.unwrap_or_default(),
            preview_photo: r.preview_photo,
            is_completed: r.answered_questions == r.total_questions,
        })
        .collect();
    Ok(Json(List::new(summaries)))
}

pub async fn detail(user: UserInfo, path: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<QuizDetail>, Error> {
    let (quiz_id,) = path.into_inner();
    Ok(Json(load_detail(&db, quiz_id, &user.id).await?))
}

// Shared with answer submission, which responds with the refreshed view.
pub(crate) async fn load_detail(db: &PgPool, quiz_id: i32, user_id: &str) -> Result<QuizDetail, Error> {
    let mut conn = db.acquire().await?;
    let quiz: Quiz = query_as("SELECT id, title, description, photos_url, preview_photo FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .fetch_optional(&mut conn)
        .await?
        .ok_or_else(|| Error::NotFound("quiz not found".into()))?;
    let questions: Vec<Question> = query_as("SELECT id, quiz_id, title, description, photos_url FROM questions WHERE quiz_id = $1 ORDER BY id")
        .bind(quiz_id)
        .fetch_all(&mut conn)
        .await?;
    let answers: Vec<Answer> = query_as(
        "SELECT a.id, a.question_id, a.title, a.after_title, a.photos_url, a.is_correct
        FROM answers AS a
        JOIN questions AS q ON a.question_id = q.id
        WHERE q.quiz_id = $1
        ORDER BY a.id",
    )
    .bind(quiz_id)
    .fetch_all(&mut conn)
    .await?;
    let chosen: Vec<i32> = query_scalar(
        "SELECT ua.answer_id
        FROM user_answers AS ua
        JOIN questions AS q ON ua.question_id = q.id
        WHERE ua.user_id = $1 AND q.quiz_id = $2",
    )
    .bind(user_id)
    .bind(quiz_id)
    .fetch_all(&mut conn)
    .await?;
    let chosen: HashSet<i32> = chosen.into_iter().collect();
    Ok(views::assemble_detail(quiz, questions, answers, &chosen))
}

#[derive(Debug, Deserialize)]
pub struct AnswerCreation {
    title: String,
    after_title: Option<String>,
    photos_url: Option<Vec<String>>,
    is_correct: bool,
}

#[derive(Debug, Deserialize)]
pub struct QuestionCreation {
    title: String,
    description: Option<String>,
    photos_url: Option<Vec<String>>,
    answers: Vec<AnswerCreation>,
}

#[derive(Debug, Deserialize)]
pub struct QuizCreation {
    title: String,
    description: Option<String>,
    photos_url: Option<Vec<String>>,
    preview_photo: Option<String>,
    questions: Vec<QuestionCreation>,
}

// Authoring is all-or-nothing: a failure mid-way leaves no orphaned quiz.
pub async fn create(Json(body): Json<QuizCreation>, db: Data<PgPool>) -> Result<Json<Quiz>, Error> {
    if body.questions.is_empty() {
        return Err(Error::BadRequest("a quiz must contain at least one question".into()));
    }
    if body.questions.iter().any(|q| q.answers.is_empty()) {
        return Err(Error::BadRequest("every question must contain at least one answer".into()));
    }
    let mut tx = db.begin().await?;
    let quiz: Quiz = query_as(
        "INSERT INTO quizzes (title, description, photos_url, preview_photo)
        VALUES ($1, $2, $3, $4)
        RETURNING id, title, description, photos_url, preview_photo",
    )
    .bind(&body.title)
    .bind(&body.description)
    .bind(&body.photos_url)
    .bind(&body.preview_photo)
    .fetch_one(&mut tx)
    .await?;
    for question in body.questions {
        let question_id: i32 = query_scalar(
            "INSERT INTO questions (quiz_id, title, description, photos_url) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(quiz.id)
        .bind(&question.title)
        .bind(&question.description)
        .bind(&question.photos_url)
        .fetch_one(&mut tx)
        .await?;
        QueryBuilder::new("INSERT INTO answers (question_id, title, after_title, photos_url, is_correct) ")
            .push_values(question.answers.into_iter(), |mut b, a| {
                b.push_bind(question_id);
                b.push_bind(a.title);
                b.push_bind(a.after_title);
                b.push_bind(a.photos_url);
                b.push_bind(a.is_correct);
            })
            .build()
            .execute(&mut tx)
            .await?;
    }
    tx.commit().await?;
    Ok(Json(quiz))
}
