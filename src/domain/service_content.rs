use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryName, SeoKeyword, ServiceContentId, ServiceTitle, SubcategoryName,
};

/// Rich content page describing one of the consultancy's services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceContent {
    pub id: ServiceContentId,
    pub title: ServiceTitle,
    /// HTML body; inline images have already been replaced by hosted URLs.
    pub content: String,
    pub category: CategoryName,
    pub subcategory: Option<SubcategoryName>,
    pub seo_keywords: Vec<SeoKeyword>,
    pub short_description: String,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Field values written on create and on full update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewServiceContent {
    pub title: ServiceTitle,
    pub content: String,
    pub category: CategoryName,
    pub subcategory: Option<SubcategoryName>,
    pub seo_keywords: Vec<SeoKeyword>,
    pub short_description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
