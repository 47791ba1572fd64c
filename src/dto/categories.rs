use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::category::{Category, Subcategory};
use crate::domain::types::CategoryId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryDto {
    pub id: i32,
    /// Subcategory ids are scoped to their category.
    pub category_id: i32,
    pub name: String,
    pub is_deleted: bool,
}

impl SubcategoryDto {
    pub fn new(category_id: CategoryId, value: &Subcategory) -> Self {
        Self {
            id: value.id.get(),
            category_id: category_id.get(),
            name: value.name.as_str().to_string(),
            is_deleted: value.is_deleted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub subcategories: Vec<SubcategoryDto>,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.as_str().to_string(),
            subcategories: value
                .subcategories
                .iter()
                .map(|s| SubcategoryDto::new(value.id, s))
                .collect(),
            is_deleted: value.is_deleted,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
