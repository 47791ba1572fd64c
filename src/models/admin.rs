use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::admin::{
    Admin as DomainAdmin, NewAdmin as DomainNewAdmin, NewOtpCode as DomainNewOtpCode,
    OtpCode as DomainOtpCode,
};
use crate::domain::types::{EmailAddress, OneTimeCode, OtpPurpose, TypeConstraintError};

/// Diesel model representing the `admins` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::admins)]
pub struct Admin {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Admin`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::admins)]
pub struct NewAdmin {
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Diesel model representing the `otp_codes` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::otp_codes)]
pub struct OtpCode {
    pub id: i32,
    pub email: String,
    pub purpose: String,
    pub code: String,
    pub password_hash: Option<String>,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`OtpCode`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::otp_codes)]
pub struct NewOtpCode {
    pub email: String,
    pub purpose: String,
    pub code: String,
    pub password_hash: Option<String>,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Admin> for DomainAdmin {
    type Error = TypeConstraintError;

    fn try_from(admin: Admin) -> Result<Self, Self::Error> {
        Ok(Self {
            id: admin.id.try_into()?,
            email: EmailAddress::new(admin.email)?,
            password_hash: admin.password_hash,
            created_at: admin.created_at,
        })
    }
}

impl From<&DomainNewAdmin> for NewAdmin {
    fn from(admin: &DomainNewAdmin) -> Self {
        Self {
            email: admin.email.as_str().to_string(),
            password_hash: admin.password_hash.clone(),
            created_at: admin.created_at,
        }
    }
}

impl TryFrom<OtpCode> for DomainOtpCode {
    type Error = TypeConstraintError;

    fn try_from(otp: OtpCode) -> Result<Self, Self::Error> {
        Ok(Self {
            id: otp.id.try_into()?,
            email: EmailAddress::new(otp.email)?,
            purpose: OtpPurpose::try_from(otp.purpose.as_str())?,
            code: OneTimeCode::new(otp.code)?,
            password_hash: otp.password_hash,
            expires_at: otp.expires_at,
            created_at: otp.created_at,
        })
    }
}

impl From<&DomainNewOtpCode> for NewOtpCode {
    fn from(otp: &DomainNewOtpCode) -> Self {
        Self {
            email: otp.email.as_str().to_string(),
            purpose: otp.purpose.as_str().to_string(),
            code: otp.code.as_str().to_string(),
            password_hash: otp.password_hash.clone(),
            expires_at: otp.expires_at,
            created_at: otp.created_at,
        }
    }
}
