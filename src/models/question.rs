use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Question {
    pub id: i32,
    pub quiz_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub photos_url: Option<Vec<String>>,
}
