use actix_web::web::{Data, Json, Path};
use sqlx::{query, query_as, query_scalar, PgPool, QueryBuilder};
use std::collections::HashSet;

use crate::context::UserInfo;
use crate::error::Error;
use crate::handlers::quiz::load_detail;
use crate::models::Answer;
use crate::views::{self, QuizDetail};

pub async fn submit(user: UserInfo, path: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<QuizDetail>, Error> {
    let (answer_id,) = path.into_inner();
    let mut tx = db.begin().await?;
    let target: Option<(i32, i32)> = query_as(
        "SELECT a.question_id, q.quiz_id
        FROM answers AS a
        JOIN questions AS q ON a.question_id = q.id
        WHERE a.id = $1",
    )
    .bind(answer_id)
    .fetch_optional(&mut tx)
    .await?;
    let (question_id, quiz_id) = target.ok_or_else(|| Error::NotFound("answer not found".into()))?;
    // fast path for a friendlier error; the unique index on
    // (user_id, question_id) decides the race
    let already: bool = query_scalar("SELECT EXISTS(SELECT 1 FROM user_answers WHERE user_id = $1 AND question_id = $2)")
        .bind(&user.id)
        .bind(question_id)
        .fetch_one(&mut tx)
        .await?;
    if already {
        return Err(Error::Conflict("question already answered".into()));
    }
    query("INSERT INTO user_answers (user_id, question_id, answer_id) VALUES ($1, $2, $3)")
        .bind(&user.id)
        .bind(question_id)
        .bind(answer_id)
        .execute(&mut tx)
        .await
        .map_err(|e| Error::conflict_on_unique(e, "question already answered"))?;
    tx.commit().await?;

    finalize_completion(&db, &user.id, quiz_id).await?;
    Ok(Json(load_detail(&db, quiz_id, &user.id).await?))
}

// Runs after the answer insert has committed, so a lost stats race cannot
// take the recorded answer down with it.
async fn finalize_completion(db: &PgPool, user_id: &str, quiz_id: i32) -> Result<(), Error> {
    let mut tx = db.begin().await?;
    let total: i64 = query_scalar("SELECT COUNT(*) FROM questions WHERE quiz_id = $1")
        .bind(quiz_id)
        .fetch_one(&mut tx)
        .await?;
    let answered: i64 = query_scalar(
        "SELECT COUNT(*)
        FROM user_answers AS ua
        JOIN questions AS q ON ua.question_id = q.id
        WHERE ua.user_id = $1 AND q.quiz_id = $2",
    )
    .bind(user_id)
    .bind(quiz_id)
    .fetch_one(&mut tx)
    .await?;
    if answered != total {
        return Ok(());
    }
    let snapshotted: bool = query_scalar("SELECT EXISTS(SELECT 1 FROM stats WHERE user_id = $1 AND quiz_id = $2)")
        .bind(user_id)
        .bind(quiz_id)
        .fetch_one(&mut tx)
        .await?;
    if snapshotted {
        return Err(Error::Conflict("quiz result already recorded".into()));
    }
    let answers: Vec<Answer> = query_as(
        "SELECT a.id, a.question_id, a.title, a.after_title, a.photos_url, a.is_correct
        FROM answers AS a
        JOIN questions AS q ON a.question_id = q.id
        WHERE q.quiz_id = $1",
    )
    .bind(quiz_id)
    .fetch_all(&mut tx)
    .await?;
    let chosen: HashSet<i32> = query_scalar(
        "SELECT ua.answer_id
        FROM user_answers AS ua
        JOIN questions AS q ON ua.question_id = q.id
        WHERE ua.user_id = $1 AND q.quiz_id = $2",
    )
    .bind(user_id)
    .bind(quiz_id)
    .fetch_all(&mut tx)
    .await?
    .into_iter()
    .collect();
    let correct = views::correct_chosen(&answers, &chosen);
    let stats_id: i32 = query_scalar("INSERT INTO stats (user_id, quiz_id) VALUES ($1, $2) RETURNING id")
        .bind(user_id)
        .bind(quiz_id)
        .fetch_one(&mut tx)
        .await
        .map_err(|e| Error::conflict_on_unique(e, "quiz result already recorded"))?;
    if !correct.is_empty() {
        QueryBuilder::new("INSERT INTO stats_answers (stats_id, answer_id) ")
            .push_values(correct.into_iter(), |mut b, aid| {
                b.push_bind(stats_id);
                b.push_bind(aid);
            })
            .build()
            .execute(&mut tx)
            .await?;
    }
    tx.commit().await?;
    log::info!("quiz {} completed, stats snapshot {} recorded", quiz_id, stats_id);
    Ok(())
}
