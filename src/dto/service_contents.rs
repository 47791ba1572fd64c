use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::service_content::ServiceContent;

/// Full service content record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceContentDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub seo_keywords: Vec<String>,
    pub short_description: String,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ServiceContent> for ServiceContentDto {
    fn from(value: ServiceContent) -> Self {
        Self {
            id: value.id.get(),
            title: value.title.into_inner(),
            content: value.content,
            category: value.category.into_inner(),
            subcategory: value.subcategory.map(|s| s.into_inner()),
            seo_keywords: value
                .seo_keywords
                .into_iter()
                .map(|k| k.into_inner())
                .collect(),
            short_description: value.short_description,
            is_deleted: value.is_deleted,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Public projection of a service, without bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummaryDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub seo_keywords: Vec<String>,
    pub short_description: String,
}

impl From<ServiceContent> for ServiceSummaryDto {
    fn from(value: ServiceContent) -> Self {
        let full = ServiceContentDto::from(value);
        Self {
            id: full.id,
            title: full.title,
            content: full.content,
            category: full.category,
            subcategory: full.subcategory,
            seo_keywords: full.seo_keywords,
            short_description: full.short_description,
        }
    }
}

/// Metadata of an image referenced from service content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImageInfo {
    Found {
        url: String,
        public_id: String,
        format: String,
        width: u32,
        height: u32,
    },
    Failed {
        url: String,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceWithImagesDto {
    #[serde(flatten)]
    pub service: ServiceSummaryDto,
    pub images: Vec<ImageInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationDto {
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub limit: usize,
}

impl PaginationDto {
    pub fn new(total: usize, page: usize, limit: usize) -> Self {
        Self {
            total,
            page,
            pages: total.div_ceil(limit.max(1)),
            limit,
        }
    }
}

/// `{message, data}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// `{message, data, total}` envelope of the unpaginated listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResponse<T> {
    pub message: String,
    pub data: Vec<T>,
    pub total: usize,
}

/// `{message, data, pagination}` envelope of paginated listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedResponse<T> {
    pub message: String,
    pub data: Vec<T>,
    pub pagination: PaginationDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_pages_up() {
        assert_eq!(PaginationDto::new(21, 1, 10).pages, 3);
        assert_eq!(PaginationDto::new(20, 2, 10).pages, 2);
        assert_eq!(PaginationDto::new(0, 1, 10).pages, 0);
    }

    #[test]
    fn failed_image_info_serializes_url_and_error() {
        let info = ImageInfo::Failed {
            url: "https://cdn.example.com/services/a.png".into(),
            error: "Failed to fetch image metadata".into(),
        };

        let json = serde_json::to_value(&info).unwrap();

        assert_eq!(json["error"], "Failed to fetch image metadata");
        assert!(json.get("public_id").is_none());
    }
}
