use serde::Serialize;
use sqlx::FromRow;

// is_correct is the stored grade; it never reaches a response as-is, the
// view layer decides whether it may be disclosed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Answer {
    pub id: i32,
    pub question_id: i32,
    pub title: String,
    pub after_title: Option<String>,
    pub photos_url: Option<Vec<String>>,
    pub is_correct: bool,
}
