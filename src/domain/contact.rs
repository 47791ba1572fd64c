use serde::{Deserialize, Serialize};

use crate::domain::types::{EmailAddress, NonEmptyString};

/// Message submitted through the "contact us" form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactMessage {
    pub name: NonEmptyString,
    pub email: EmailAddress,
    pub subject: NonEmptyString,
    pub message: NonEmptyString,
}

/// Request submitted through the "consult an expert" form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsultationRequest {
    pub name: NonEmptyString,
    pub email: EmailAddress,
    pub city: NonEmptyString,
    pub requirement: NonEmptyString,
    pub phone: NonEmptyString,
    pub message: Option<NonEmptyString>,
}
