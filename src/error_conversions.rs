//! Error conversion glue between the form, domain and service layers.
//!
//! Forms and domain types must not depend on the service error type, so the
//! conversions into [`ServiceError`] live here.

use crate::domain::category::TaxonomyError;
use crate::domain::types::TypeConstraintError;
use crate::forms::accounts::AccountFormError;
use crate::forms::categories::{
    CreateCategoryFormError, RenameCategoryFormError, SubcategoryFormError,
};
use crate::forms::contact::ContactFormError;
use crate::forms::service_contents::{PageQueryError, ServiceContentFormError};
use crate::services::ServiceError;
use crate::services::categories::SUBCATEGORY_NOT_FOUND;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TaxonomyError> for ServiceError {
    fn from(val: TaxonomyError) -> Self {
        match val {
            TaxonomyError::SubcategoryNotFound(_) => {
                ServiceError::NotFound(SUBCATEGORY_NOT_FOUND.to_string())
            }
            TaxonomyError::DuplicateName(message) => ServiceError::DuplicateName(message.into()),
            TaxonomyError::InvalidStateTransition(message) => {
                ServiceError::InvalidStateTransition(message.into())
            }
        }
    }
}

/// Implements `From<$error> for ServiceError` as a form failure.
macro_rules! form_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl From<$error> for ServiceError {
                fn from(val: $error) -> Self {
                    ServiceError::Form(val.to_string())
                }
            }
        )*
    };
}

form_error!(
    CreateCategoryFormError,
    SubcategoryFormError,
    RenameCategoryFormError,
    ServiceContentFormError,
    PageQueryError,
    AccountFormError,
    ContactFormError,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::SubcategoryId;

    #[test]
    fn taxonomy_errors_keep_their_kind() {
        let missing = TaxonomyError::SubcategoryNotFound(SubcategoryId::new(3).unwrap());
        assert_eq!(
            ServiceError::from(missing),
            ServiceError::NotFound("Subcategory not found".into())
        );
        assert_eq!(
            ServiceError::from(TaxonomyError::InvalidStateTransition("Already deleted")),
            ServiceError::InvalidStateTransition("Already deleted".into())
        );
    }

    #[test]
    fn form_errors_become_form_failures() {
        assert_eq!(
            ServiceError::from(PageQueryError::MissingKeywords),
            ServiceError::Form("Keywords are required".into())
        );
    }
}
