use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(sqlx::Type)]
#[sqlx(type_name = "article_status")]
#[sqlx(rename_all = "lowercase")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub content_url: Option<String>,
    pub photo_url: Option<String>,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::ArticleStatus;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ArticleStatus::Draft).unwrap(), "draft");
        assert_eq!(serde_json::to_value(ArticleStatus::Published).unwrap(), "published");
    }
}
