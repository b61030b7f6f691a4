use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: Option<String>,
    pub active: bool,
    pub created_at: String,
}
