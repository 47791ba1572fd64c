use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{
    CategoryName, SeoKeyword, ServiceTitle, SubcategoryName, TypeConstraintError,
};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Body of the create and update service content requests.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServiceContentForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title, content, and category are required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Title, content, and category are required"))]
    pub content: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Title, content, and category are required"))]
    pub category: String,
    pub subcategory: Option<String>,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
    #[serde(default)]
    pub short_description: String,
}

/// Validated service content fields. `content` still holds inline images.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceContentFormPayload {
    pub title: ServiceTitle,
    pub content: String,
    pub category: CategoryName,
    pub subcategory: Option<SubcategoryName>,
    pub seo_keywords: Vec<SeoKeyword>,
    pub short_description: String,
}

#[derive(Debug, Error)]
pub enum ServiceContentFormError {
    #[error("{0}")]
    Validation(String),
    #[error("Category must be a non-empty string")]
    EmptyCategory,
    #[error("Subcategory must be a non-empty string")]
    EmptySubcategory,
    #[error("Service form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ServiceContentFormError {
    fn from(value: ValidationErrors) -> Self {
        // Every field shares one message; report it once.
        let message = value
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| value.to_string());
        Self::Validation(message)
    }
}

impl From<TypeConstraintError> for ServiceContentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ServiceContentForm> for ServiceContentFormPayload {
    type Error = ServiceContentFormError;

    fn try_from(value: ServiceContentForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let category =
            CategoryName::new(value.category).map_err(|_| ServiceContentFormError::EmptyCategory)?;

        // An empty string means "no subcategory"; whitespace only is rejected.
        let subcategory = match value.subcategory {
            Some(s) if s.is_empty() => None,
            Some(s) => Some(
                SubcategoryName::new(s).map_err(|_| ServiceContentFormError::EmptySubcategory)?,
            ),
            None => None,
        };

        let seo_keywords = value
            .seo_keywords
            .into_iter()
            .filter(|k| !k.trim().is_empty())
            .map(SeoKeyword::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title: ServiceTitle::new(value.title)?,
            content: value.content,
            category,
            subcategory,
            seo_keywords,
            short_description: value.short_description,
        })
    }
}

/// Raw `page` and `limit` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePayload {
    pub page: usize,
    pub limit: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageQueryError {
    #[error("Invalid pagination parameters")]
    InvalidPagination,
    #[error("Keywords are required")]
    MissingKeywords,
}

fn parse_positive(value: Option<&str>, default: usize) -> Result<usize, PageQueryError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(PageQueryError::InvalidPagination),
        },
    }
}

impl TryFrom<PageQuery> for PagePayload {
    type Error = PageQueryError;

    fn try_from(value: PageQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            page: parse_positive(value.page.as_deref(), DEFAULT_PAGE)?,
            limit: parse_positive(value.limit.as_deref(), DEFAULT_PAGE_LIMIT)?,
        })
    }
}

/// Query parameters of the keyword search.
#[derive(Debug, Default, Deserialize)]
pub struct KeywordSearchQuery {
    pub keywords: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSearchPayload {
    pub keywords: Vec<String>,
    pub page: PagePayload,
}

/// Split a comma separated keyword list, dropping blank entries.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

impl TryFrom<KeywordSearchQuery> for KeywordSearchPayload {
    type Error = PageQueryError;

    fn try_from(value: KeywordSearchQuery) -> Result<Self, Self::Error> {
        let keywords = value
            .keywords
            .as_deref()
            .map(split_keywords)
            .unwrap_or_default();
        if keywords.is_empty() {
            return Err(PageQueryError::MissingKeywords);
        }

        let page = PagePayload::try_from(PageQuery {
            page: value.page,
            limit: value.limit,
        })?;

        Ok(Self { keywords, page })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(json: &str) -> ServiceContentForm {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn service_form_trims_category_and_subcategory() {
        let payload = ServiceContentFormPayload::try_from(form(
            r#"{"title": "Study in Canada", "content": "<p>hi</p>", "category": " Visas ",
                "subcategory": " Student ", "seoKeywords": ["canada", " ", "study"]}"#,
        ))
        .unwrap();

        assert_eq!(payload.category.as_str(), "Visas");
        assert_eq!(payload.subcategory.unwrap().as_str(), "Student");
        assert_eq!(payload.seo_keywords.len(), 2);
        assert_eq!(payload.short_description, "");
    }

    #[test]
    fn service_form_requires_title_content_and_category() {
        let err = ServiceContentFormPayload::try_from(form(
            r#"{"title": "Study in Canada", "category": "Visas"}"#,
        ))
        .unwrap_err();

        assert_eq!(err.to_string(), "Title, content, and category are required");
    }

    #[test]
    fn service_form_rejects_blank_category() {
        let err = ServiceContentFormPayload::try_from(form(
            r#"{"title": "t", "content": "c", "category": "   "}"#,
        ))
        .unwrap_err();

        assert!(matches!(err, ServiceContentFormError::EmptyCategory));
    }

    #[test]
    fn service_form_treats_empty_subcategory_as_absent() {
        let payload = ServiceContentFormPayload::try_from(form(
            r#"{"title": "t", "content": "c", "category": "Visas", "subcategory": ""}"#,
        ))
        .unwrap();
        assert!(payload.subcategory.is_none());

        let err = ServiceContentFormPayload::try_from(form(
            r#"{"title": "t", "content": "c", "category": "Visas", "subcategory": "  "}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, ServiceContentFormError::EmptySubcategory));
    }

    #[test]
    fn page_query_defaults_and_validation() {
        let payload = PagePayload::try_from(PageQuery::default()).unwrap();
        assert_eq!(payload, PagePayload { page: 1, limit: 10 });

        let err = PagePayload::try_from(PageQuery {
            page: Some("0".into()),
            limit: None,
        })
        .unwrap_err();
        assert_eq!(err, PageQueryError::InvalidPagination);

        let err = PagePayload::try_from(PageQuery {
            page: None,
            limit: Some("ten".into()),
        })
        .unwrap_err();
        assert_eq!(err, PageQueryError::InvalidPagination);
    }

    #[test]
    fn keywords_are_split_and_trimmed() {
        assert_eq!(
            split_keywords(" visa, ,Study ,,canada"),
            vec!["visa", "Study", "canada"]
        );
    }

    #[test]
    fn keyword_search_requires_keywords() {
        let err = KeywordSearchPayload::try_from(KeywordSearchQuery {
            keywords: Some(" , ".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, PageQueryError::MissingKeywords);

        let payload = KeywordSearchPayload::try_from(KeywordSearchQuery {
            keywords: Some("visa".into()),
            page: Some("2".into()),
            limit: Some("5".into()),
        })
        .unwrap();
        assert_eq!(payload.page, PagePayload { page: 2, limit: 5 });
    }
}
