use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GalleryPhoto {
    pub id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: i32,
    pub url: String,
}
