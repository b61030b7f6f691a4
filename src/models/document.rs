use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub file_name: String,
    pub stored_path: String,
    pub size_bytes: i64,
    pub uploaded_by: Option<String>,
    pub active: bool,
    pub created_at: String,
}
