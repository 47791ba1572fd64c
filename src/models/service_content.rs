use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::fold_name;
use crate::domain::service_content::{
    NewServiceContent as DomainNewServiceContent, ServiceContent as DomainServiceContent,
};
use crate::domain::types::{
    CategoryName, SeoKeyword, ServiceTitle, SubcategoryName, TypeConstraintError,
};

/// Diesel model representing the `service_contents` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::service_contents)]
pub struct ServiceContent {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub category: String,
    pub category_folded: String,
    pub subcategory: Option<String>,
    pub short_description: String,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`ServiceContent`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::service_contents)]
pub struct NewServiceContent {
    pub title: String,
    pub content: String,
    pub category: String,
    pub category_folded: String,
    pub subcategory: Option<String>,
    pub short_description: String,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset applied by a full update; `created_at` and `is_deleted` stay.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::service_contents)]
#[diesel(treat_none_as_null = true)]
pub struct ServiceContentChanges {
    pub title: String,
    pub content: String,
    pub category: String,
    pub category_folded: String,
    pub subcategory: Option<String>,
    pub short_description: String,
    pub updated_at: NaiveDateTime,
}

/// Diesel model representing the `service_content_keywords` table.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::schema::service_content_keywords)]
pub struct ServiceContentKeyword {
    pub service_content_id: i32,
    pub position: i32,
    pub keyword: String,
    pub keyword_folded: String,
}

impl ServiceContent {
    /// Assemble the domain record from the row and its keyword rows, already
    /// sorted by position.
    pub fn into_domain(
        self,
        keywords: Vec<ServiceContentKeyword>,
    ) -> Result<DomainServiceContent, TypeConstraintError> {
        Ok(DomainServiceContent {
            id: self.id.try_into()?,
            title: ServiceTitle::new(self.title)?,
            content: self.content,
            category: CategoryName::new(self.category)?,
            subcategory: self.subcategory.map(SubcategoryName::new).transpose()?,
            seo_keywords: keywords
                .into_iter()
                .map(|k| SeoKeyword::new(k.keyword))
                .collect::<Result<Vec<_>, _>>()?,
            short_description: self.short_description,
            is_deleted: self.is_deleted,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<&DomainNewServiceContent> for NewServiceContent {
    fn from(service: &DomainNewServiceContent) -> Self {
        Self {
            title: service.title.as_str().to_string(),
            content: service.content.clone(),
            category: service.category.as_str().to_string(),
            category_folded: fold_name(service.category.as_str()),
            subcategory: service
                .subcategory
                .as_ref()
                .map(|s| s.as_str().to_string()),
            short_description: service.short_description.clone(),
            is_deleted: false,
            created_at: service.created_at,
            updated_at: service.updated_at,
        }
    }
}

impl From<&DomainNewServiceContent> for ServiceContentChanges {
    fn from(service: &DomainNewServiceContent) -> Self {
        Self {
            title: service.title.as_str().to_string(),
            content: service.content.clone(),
            category: service.category.as_str().to_string(),
            category_folded: fold_name(service.category.as_str()),
            subcategory: service
                .subcategory
                .as_ref()
                .map(|s| s.as_str().to_string()),
            short_description: service.short_description.clone(),
            updated_at: service.updated_at,
        }
    }
}

/// Keyword rows for a service, positions following the input order.
pub fn keyword_rows(service_content_id: i32, keywords: &[SeoKeyword]) -> Vec<ServiceContentKeyword> {
    keywords
        .iter()
        .enumerate()
        .map(|(position, keyword)| ServiceContentKeyword {
            service_content_id,
            position: position as i32,
            keyword: keyword.as_str().to_string(),
            keyword_folded: fold_name(keyword.as_str()),
        })
        .collect()
}
