use chrono::{Duration, Utc};

use crate::auth::{OTP_TTL_MINUTES, generate_otp, hash_password, issue_token, verify_password};
use crate::domain::admin::{Admin, NewAdmin, NewOtpCode, OtpCode};
use crate::domain::types::{EmailAddress, OneTimeCode, OtpPurpose};
use crate::forms::accounts::{
    ForgotPasswordFormPayload, LoginFormPayload, ResetPasswordFormPayload, SignupFormPayload,
    VerifyOtpFormPayload,
};
use crate::mailer::{Mailer, OutgoingEmail};
use crate::models::config::{AuthConfig, MailConfig};
use crate::repository::{AdminReader, AdminWriter, OtpReader, OtpWriter};

use super::{ServiceError, ServiceResult};

pub const ADMIN_NOT_FOUND: &str = "Admin not found";

fn find_admin<R>(repo: &R, email: &EmailAddress) -> ServiceResult<Option<Admin>>
where
    R: AdminReader,
{
    repo.get_admin_by_email(email).map_err(|e| {
        log::error!("Failed to get admin {email}: {e}");
        ServiceError::Internal
    })
}

/// Latest code issued to `email` for `purpose`, provided it equals `code`
/// and has not expired.
fn check_otp<R>(
    repo: &R,
    email: &EmailAddress,
    purpose: OtpPurpose,
    code: &OneTimeCode,
) -> ServiceResult<OtpCode>
where
    R: OtpReader,
{
    let latest = repo.get_latest_otp(email, purpose).map_err(|e| {
        log::error!("Failed to get {purpose} otp for {email}: {e}");
        ServiceError::Internal
    })?;

    match latest {
        Some(otp) if otp.matches(code, Utc::now().naive_utc()) => Ok(otp),
        _ => {
            log::warn!("Rejected {purpose} otp for {email}");
            Err(ServiceError::InvalidOtp)
        }
    }
}

fn clear_otps<R>(repo: &R, email: &EmailAddress, purpose: OtpPurpose)
where
    R: OtpWriter,
{
    if let Err(e) = repo.delete_otps(email, purpose) {
        log::error!("Failed to clear {purpose} otps for {email}: {e}");
    }
}

/// Mail a fresh code to `email` and store it for later verification.
async fn issue_otp<R>(
    repo: &R,
    email: &EmailAddress,
    purpose: OtpPurpose,
    password_hash: Option<String>,
    mailer: &dyn Mailer,
    mail: &MailConfig,
) -> ServiceResult<()>
where
    R: OtpWriter,
{
    let code = generate_otp().map_err(|e| {
        log::error!("Failed to generate otp: {e}");
        ServiceError::Internal
    })?;

    let (subject, text) = match purpose {
        OtpPurpose::Signup => (
            "Email Verification OTP",
            format!(
                "GreenHead Admin generated OTP {code}. This will expire in {OTP_TTL_MINUTES} min"
            ),
        ),
        OtpPurpose::PasswordReset => (
            "Password Reset OTP",
            format!(
                "GreenHead Admin password reset OTP {code}. This will expire in {OTP_TTL_MINUTES} min"
            ),
        ),
    };
    let email_message = OutgoingEmail {
        from: mail.sender.clone(),
        to: email.to_string(),
        reply_to: None,
        subject: subject.to_string(),
        text,
        html: None,
    };
    if let Err(e) = mailer.send(&email_message).await {
        log::error!("Failed to send {purpose} otp to {email}: {e}");
        return Err(ServiceError::Mail("Failed to send OTP email".to_string()));
    }

    let now = Utc::now().naive_utc();
    let otp = NewOtpCode {
        email: email.clone(),
        purpose,
        code,
        password_hash,
        expires_at: now + Duration::minutes(OTP_TTL_MINUTES),
        created_at: now,
    };
    repo.create_otp(&otp).map_err(|e| {
        log::error!("Failed to store {purpose} otp for {email}: {e}");
        ServiceError::Internal
    })?;

    Ok(())
}

/// Start a signup: mail a verification code and remember the chosen password
/// until the code is confirmed.
pub async fn signup<R>(
    payload: SignupFormPayload,
    repo: &R,
    mailer: &dyn Mailer,
    mail: &MailConfig,
) -> ServiceResult<()>
where
    R: AdminReader + OtpWriter,
{
    if find_admin(repo, &payload.email)?.is_some() {
        return Err(ServiceError::AlreadyRegistered);
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        log::error!("Failed to hash password of {}: {e}", payload.email);
        ServiceError::Internal
    })?;
    issue_otp(
        repo,
        &payload.email,
        OtpPurpose::Signup,
        Some(password_hash),
        mailer,
        mail,
    )
    .await?;

    log::info!("Signup otp sent to {}", payload.email);
    Ok(())
}

/// Confirm a signup code and create the admin account.
pub fn verify_signup<R>(payload: VerifyOtpFormPayload, repo: &R) -> ServiceResult<Admin>
where
    R: AdminReader + AdminWriter + OtpReader + OtpWriter,
{
    let otp = check_otp(repo, &payload.email, OtpPurpose::Signup, &payload.otp)?;
    let Some(password_hash) = otp.password_hash else {
        log::warn!("Signup otp for {} carries no password", payload.email);
        return Err(ServiceError::InvalidOtp);
    };

    if find_admin(repo, &payload.email)?.is_some() {
        return Err(ServiceError::AlreadyRegistered);
    }

    let admin = repo
        .create_admin(&NewAdmin {
            email: payload.email.clone(),
            password_hash,
            created_at: Utc::now().naive_utc(),
        })
        .map_err(|e| {
            log::error!("Failed to create admin {}: {e}", payload.email);
            ServiceError::Internal
        })?;
    clear_otps(repo, &payload.email, OtpPurpose::Signup);

    log::info!("Admin {} registered", admin.email);
    Ok(admin)
}

/// Check credentials and issue a session token.
pub fn login<R>(payload: LoginFormPayload, repo: &R, auth: &AuthConfig) -> ServiceResult<String>
where
    R: AdminReader,
{
    let Some(admin) = find_admin(repo, &payload.email)? else {
        return Err(ServiceError::Unauthorized);
    };
    if !verify_password(&payload.password, &admin.password_hash) {
        log::warn!("Wrong password for {}", admin.email);
        return Err(ServiceError::Unauthorized);
    }

    issue_token(admin.email.as_str(), auth).map_err(|e| {
        log::error!("Failed to issue token for {}: {e}", admin.email);
        ServiceError::Internal
    })
}

pub async fn forgot_password<R>(
    payload: ForgotPasswordFormPayload,
    repo: &R,
    mailer: &dyn Mailer,
    mail: &MailConfig,
) -> ServiceResult<()>
where
    R: AdminReader + OtpWriter,
{
    if find_admin(repo, &payload.email)?.is_none() {
        return Err(ServiceError::NotFound(ADMIN_NOT_FOUND.to_string()));
    }

    issue_otp(
        repo,
        &payload.email,
        OtpPurpose::PasswordReset,
        None,
        mailer,
        mail,
    )
    .await?;

    log::info!("Password reset otp sent to {}", payload.email);
    Ok(())
}

pub fn reset_password<R>(payload: ResetPasswordFormPayload, repo: &R) -> ServiceResult<()>
where
    R: AdminReader + AdminWriter + OtpReader + OtpWriter,
{
    check_otp(repo, &payload.email, OtpPurpose::PasswordReset, &payload.otp)?;

    let password_hash = hash_password(&payload.new_password).map_err(|e| {
        log::error!("Failed to hash password of {}: {e}", payload.email);
        ServiceError::Internal
    })?;
    match repo.update_admin_password(&payload.email, &password_hash) {
        Ok(0) => return Err(ServiceError::NotFound(ADMIN_NOT_FOUND.to_string())),
        Ok(_) => {}
        Err(e) => {
            log::error!("Failed to update password of {}: {e}", payload.email);
            return Err(ServiceError::Internal);
        }
    }
    clear_otps(repo, &payload.email, OtpPurpose::PasswordReset);

    log::info!("Password of {} was reset", payload.email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_token;
    use crate::mailer::test::RecordingMailer;
    use crate::repository::test::TestRepository;

    const EMAIL: &str = "admin@example.com";

    fn mail_config() -> MailConfig {
        MailConfig {
            relay_url: "http://relay.invalid/send".into(),
            api_key: String::new(),
            sender: "noreply@example.com".into(),
            contact_receiver: "contact@example.com".into(),
            consult_receiver: "experts@example.com".into(),
        }
    }

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "secret".into(),
            token_ttl_minutes: 60,
        }
    }

    fn email() -> EmailAddress {
        EmailAddress::new(EMAIL).unwrap()
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        actix_web::rt::System::new().block_on(future)
    }

    fn latest_code(repo: &TestRepository, purpose: OtpPurpose) -> OneTimeCode {
        repo.get_latest_otp(&email(), purpose)
            .unwrap()
            .unwrap()
            .code
    }

    fn register(repo: &TestRepository, password: &str) {
        let mailer = RecordingMailer::default();
        block_on(signup(
            SignupFormPayload {
                email: email(),
                password: password.into(),
            },
            repo,
            &mailer,
            &mail_config(),
        ))
        .unwrap();
        verify_signup(
            VerifyOtpFormPayload {
                email: email(),
                otp: latest_code(repo, OtpPurpose::Signup),
            },
            repo,
        )
        .unwrap();
    }

    fn login_with(repo: &TestRepository, password: &str) -> ServiceResult<String> {
        login(
            LoginFormPayload {
                email: email(),
                password: password.into(),
            },
            repo,
            &auth_config(),
        )
    }

    #[test]
    fn signup_mails_code_and_verification_creates_admin() {
        let repo = TestRepository::new();
        let mailer = RecordingMailer::default();

        block_on(signup(
            SignupFormPayload {
                email: email(),
                password: "correct horse".into(),
            },
            &repo,
            &mailer,
            &mail_config(),
        ))
        .unwrap();

        let code = latest_code(&repo, OtpPurpose::Signup);
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Email Verification OTP");
        assert_eq!(sent[0].to, EMAIL);
        assert!(sent[0].text.contains(code.as_str()));

        let wrong = if code.as_str() == "111111" { "222222" } else { "111111" };
        let err = verify_signup(
            VerifyOtpFormPayload {
                email: email(),
                otp: OneTimeCode::new(wrong).unwrap(),
            },
            &repo,
        )
        .unwrap_err();
        assert_eq!(err, ServiceError::InvalidOtp);

        let admin = verify_signup(VerifyOtpFormPayload { email: email(), otp: code }, &repo).unwrap();
        assert_eq!(admin.email, email());
        assert!(repo.get_latest_otp(&email(), OtpPurpose::Signup).unwrap().is_none());
    }

    #[test]
    fn signup_rejects_registered_email() {
        let repo = TestRepository::new();
        register(&repo, "correct horse");

        let err = block_on(signup(
            SignupFormPayload {
                email: email(),
                password: "another password".into(),
            },
            &repo,
            &RecordingMailer::default(),
            &mail_config(),
        ))
        .unwrap_err();

        assert_eq!(err, ServiceError::AlreadyRegistered);
    }

    #[test]
    fn signup_fails_when_mail_is_refused() {
        let repo = TestRepository::new();

        let err = block_on(signup(
            SignupFormPayload {
                email: email(),
                password: "correct horse".into(),
            },
            &repo,
            &RecordingMailer::failing(),
            &mail_config(),
        ))
        .unwrap_err();

        assert_eq!(err, ServiceError::Mail("Failed to send OTP email".into()));
        assert!(repo.get_latest_otp(&email(), OtpPurpose::Signup).unwrap().is_none());
    }

    #[test]
    fn login_issues_token_for_valid_credentials() {
        let repo = TestRepository::new();
        register(&repo, "correct horse");

        let token = login_with(&repo, "correct horse").unwrap();
        assert_eq!(verify_token(&token, &auth_config()).unwrap().sub, EMAIL);

        assert_eq!(login_with(&repo, "wrong horse").unwrap_err(), ServiceError::Unauthorized);
        let unknown = login(
            LoginFormPayload {
                email: EmailAddress::new("nobody@example.com").unwrap(),
                password: "correct horse".into(),
            },
            &repo,
            &auth_config(),
        );
        assert_eq!(unknown.unwrap_err(), ServiceError::Unauthorized);
    }

    #[test]
    fn password_reset_replaces_hash() {
        let repo = TestRepository::new();
        register(&repo, "correct horse");
        let mailer = RecordingMailer::default();

        block_on(forgot_password(
            ForgotPasswordFormPayload { email: email() },
            &repo,
            &mailer,
            &mail_config(),
        ))
        .unwrap();
        assert_eq!(mailer.sent()[0].subject, "Password Reset OTP");

        reset_password(
            ResetPasswordFormPayload {
                email: email(),
                otp: latest_code(&repo, OtpPurpose::PasswordReset),
                new_password: "battery staple".into(),
            },
            &repo,
        )
        .unwrap();

        assert!(login_with(&repo, "battery staple").is_ok());
        assert_eq!(login_with(&repo, "correct horse").unwrap_err(), ServiceError::Unauthorized);
    }

    #[test]
    fn forgot_password_requires_known_admin() {
        let repo = TestRepository::new();

        let err = block_on(forgot_password(
            ForgotPasswordFormPayload { email: email() },
            &repo,
            &RecordingMailer::default(),
            &mail_config(),
        ))
        .unwrap_err();

        assert_eq!(err, ServiceError::NotFound(ADMIN_NOT_FOUND.into()));
    }
}
