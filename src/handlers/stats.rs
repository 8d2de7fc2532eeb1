use actix_web::web::{Data, Json, Path};
use sqlx::{query_as, query_scalar, PgPool};

use crate::context::UserInfo;
use crate::error::Error;
use crate::views::{self, QuizStats, TallyRow};

// The requester's own snapshot only gates access; the tally below counts
// every user's submissions.
pub async fn detail(user: UserInfo, path: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<QuizStats>, Error> {
    let (quiz_id,) = path.into_inner();
    let mut conn = db.acquire().await?;
    let completed: bool = query_scalar("SELECT EXISTS(SELECT 1 FROM stats WHERE user_id = $1 AND quiz_id = $2)")
        .bind(&user.id)
        .bind(quiz_id)
        .fetch_one(&mut conn)
        .await?;
    if !completed {
        return Err(Error::NotFound("no recorded result for this quiz".into()));
    }
    let rows: Vec<TallyRow> = query_as(
        "SELECT q.id AS question_id, a.id AS answer_id, a.is_correct, COUNT(ua.id) AS picks
        FROM questions AS q
        JOIN answers AS a ON a.question_id = q.id
        LEFT JOIN user_answers AS ua ON ua.answer_id = a.id
        WHERE q.quiz_id = $1
        GROUP BY q.id, a.id, a.is_correct
        ORDER BY q.id, a.id",
    )
    .bind(quiz_id)
    .fetch_all(&mut conn)
    .await?;
    Ok(Json(views::fold_tallies(quiz_id, rows)))
}
