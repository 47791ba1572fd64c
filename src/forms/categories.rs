use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::NewCategory;
use crate::domain::types::{CategoryName, ProvenanceToken, SubcategoryName, TypeConstraintError};

/// Initial subcategory as submitted: either `{"name": "..."}` or a bare string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubcategoryInput {
    Named { name: String },
    Plain(String),
}

impl SubcategoryInput {
    fn into_name(self) -> String {
        match self {
            Self::Named { name } => name,
            Self::Plain(name) => name,
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct CreateCategoryForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryInput>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateCategoryFormPayload {
    pub name: CategoryName,
    pub subcategories: Vec<SubcategoryName>,
}

impl CreateCategoryFormPayload {
    pub fn into_new_category(self, created_by: ProvenanceToken) -> NewCategory {
        let now = Utc::now().naive_utc();
        NewCategory {
            name: self.name,
            subcategories: self.subcategories,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum CreateCategoryFormError {
    #[error("Create category form validation failed: {0}")]
    Validation(String),
    #[error("Create category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CreateCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CreateCategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CreateCategoryForm> for CreateCategoryFormPayload {
    type Error = CreateCategoryFormError;

    fn try_from(value: CreateCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let subcategories = value
            .subcategories
            .into_iter()
            .map(|s| SubcategoryName::new(s.into_name()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: CategoryName::new(value.name)?,
            subcategories,
        })
    }
}

/// Body of the add and rename subcategory requests.
#[derive(Deserialize, Validate)]
pub struct SubcategoryForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Subcategory name is required"))]
    pub subcategory: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubcategoryFormPayload {
    pub name: SubcategoryName,
}

#[derive(Debug, Error)]
pub enum SubcategoryFormError {
    #[error("Subcategory form validation failed: {0}")]
    Validation(String),
    #[error("Subcategory form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for SubcategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for SubcategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<SubcategoryForm> for SubcategoryFormPayload {
    type Error = SubcategoryFormError;

    fn try_from(value: SubcategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: SubcategoryName::new(value.subcategory)?,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct RenameCategoryForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenameCategoryFormPayload {
    pub name: CategoryName,
}

#[derive(Debug, Error)]
pub enum RenameCategoryFormError {
    #[error("Rename category form validation failed: {0}")]
    Validation(String),
    #[error("Rename category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for RenameCategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for RenameCategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<RenameCategoryForm> for RenameCategoryFormPayload {
    type Error = RenameCategoryFormError;

    fn try_from(value: RenameCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: CategoryName::new(value.name)?,
        })
    }
}
