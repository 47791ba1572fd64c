use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AdminId, EmailAddress, OneTimeCode, OtpId, OtpPurpose};

/// Administrator allowed to manage the site content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: AdminId,
    pub email: EmailAddress,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Admin`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewAdmin {
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// One-time code mailed to an address for signup or password reset.
#[derive(Debug, Clone)]
pub struct OtpCode {
    pub id: OtpId,
    pub email: EmailAddress,
    pub purpose: OtpPurpose,
    pub code: OneTimeCode,
    /// Password chosen at signup, applied once the code is verified.
    pub password_hash: Option<String>,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

impl OtpCode {
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        now >= self.expires_at
    }

    pub fn matches(&self, code: &OneTimeCode, now: NaiveDateTime) -> bool {
        !self.is_expired(now) && self.code == *code
    }
}

/// Data required to insert a new [`OtpCode`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewOtpCode {
    pub email: EmailAddress,
    pub purpose: OtpPurpose,
    pub code: OneTimeCode,
    pub password_hash: Option<String>,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};

    #[test]
    fn codes_stop_matching_after_expiry() {
        let issued = DateTime::from_timestamp(1_000, 0).unwrap().naive_utc();
        let otp = OtpCode {
            id: OtpId::new(1).unwrap(),
            email: EmailAddress::new("admin@example.com").unwrap(),
            purpose: OtpPurpose::Signup,
            code: OneTimeCode::new("123456").unwrap(),
            password_hash: None,
            expires_at: issued + Duration::minutes(10),
            created_at: issued,
        };
        let code = OneTimeCode::new("123456").unwrap();

        assert!(otp.matches(&code, issued + Duration::minutes(9)));
        assert!(!otp.matches(&code, issued + Duration::minutes(10)));
        assert!(!otp.matches(&OneTimeCode::new("654321").unwrap(), issued));
    }
}
