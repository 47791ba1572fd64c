use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{EmailAddress, OneTimeCode, TypeConstraintError};

pub const MIN_PASSWORD_LENGTH: u64 = 8;

#[derive(Debug, Error)]
pub enum AccountFormError {
    #[error("Account form validation failed: {0}")]
    Validation(String),
    #[error("{0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AccountFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AccountFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Email and password pair used by signup.
#[derive(Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignupFormPayload {
    pub email: EmailAddress,
    pub password: String,
}

impl TryFrom<SignupForm> for SignupFormPayload {
    type Error = AccountFormError;

    fn try_from(value: SignupForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            email: EmailAddress::new(value.email)?,
            password: value.password,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginFormPayload {
    pub email: EmailAddress,
    pub password: String,
}

impl TryFrom<LoginForm> for LoginFormPayload {
    type Error = AccountFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            email: EmailAddress::new(value.email)?,
            password: value.password,
        })
    }
}

#[derive(Deserialize)]
pub struct VerifyOtpForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerifyOtpFormPayload {
    pub email: EmailAddress,
    pub otp: OneTimeCode,
}

impl TryFrom<VerifyOtpForm> for VerifyOtpFormPayload {
    type Error = AccountFormError;

    fn try_from(value: VerifyOtpForm) -> Result<Self, Self::Error> {
        Ok(Self {
            email: EmailAddress::new(value.email)?,
            otp: OneTimeCode::new(value.otp)?,
        })
    }
}

#[derive(Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForgotPasswordFormPayload {
    pub email: EmailAddress,
}

impl TryFrom<ForgotPasswordForm> for ForgotPasswordFormPayload {
    type Error = AccountFormError;

    fn try_from(value: ForgotPasswordForm) -> Result<Self, Self::Error> {
        Ok(Self {
            email: EmailAddress::new(value.email)?,
        })
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResetPasswordFormPayload {
    pub email: EmailAddress,
    pub otp: OneTimeCode,
    pub new_password: String,
}

impl TryFrom<ResetPasswordForm> for ResetPasswordFormPayload {
    type Error = AccountFormError;

    fn try_from(value: ResetPasswordForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            email: EmailAddress::new(value.email)?,
            otp: OneTimeCode::new(value.otp)?,
            new_password: value.new_password,
        })
    }
}
