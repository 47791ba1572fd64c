use serde::Deserialize;
use thiserror::Error;

use crate::domain::contact::{ConsultationRequest, ContactMessage};
use crate::domain::types::{EmailAddress, NonEmptyString, TypeConstraintError};

#[derive(Debug, Error)]
pub enum ContactFormError {
    #[error("Please fill in all required fields")]
    MissingContactFields,
    #[error("Please fill in all required fields (name, email, city, requirement, phone)")]
    MissingConsultationFields,
    #[error("{0}")]
    TypeConstraint(String),
}

impl From<TypeConstraintError> for ContactFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

fn required(
    value: Option<String>,
    missing: fn() -> ContactFormError,
) -> Result<NonEmptyString, ContactFormError> {
    value
        .and_then(|v| NonEmptyString::new(v).ok())
        .ok_or_else(missing)
}

impl TryFrom<ContactForm> for ContactMessage {
    type Error = ContactFormError;

    fn try_from(value: ContactForm) -> Result<Self, Self::Error> {
        let missing = || ContactFormError::MissingContactFields;
        let name = required(value.name, missing)?;
        let email = required(value.email, missing)?;
        let subject = required(value.subject, missing)?;
        let message = required(value.message, missing)?;

        Ok(Self {
            name,
            email: EmailAddress::new(email.into_inner())?,
            subject,
            message,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ConsultExpertForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub requirement: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

impl TryFrom<ConsultExpertForm> for ConsultationRequest {
    type Error = ContactFormError;

    fn try_from(value: ConsultExpertForm) -> Result<Self, Self::Error> {
        let missing = || ContactFormError::MissingConsultationFields;
        let name = required(value.name, missing)?;
        let email = required(value.email, missing)?;
        let city = required(value.city, missing)?;
        let requirement = required(value.requirement, missing)?;
        let phone = required(value.phone, missing)?;

        Ok(Self {
            name,
            email: EmailAddress::new(email.into_inner())?,
            city,
            requirement,
            phone,
            message: value.message.and_then(|m| NonEmptyString::new(m).ok()),
        })
    }
}
