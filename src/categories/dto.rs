use serde::{Deserialize, Serialize};

use crate::categories::repo::Category;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CreatedCategoryResponse {
    pub message: String,
    pub category: Category,
}
