use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::{HttpResponse, Responder, post, web};
use serde::Serialize;

use crate::forms::accounts::{
    ForgotPasswordForm, ForgotPasswordFormPayload, LoginForm, LoginFormPayload,
    ResetPasswordForm, ResetPasswordFormPayload, SignupForm, SignupFormPayload, VerifyOtpForm,
    VerifyOtpFormPayload,
};
use crate::mailer::Mailer;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{MessageBody, status_for};
use crate::routes::categories::TOKEN_COOKIE;
use crate::services::ServiceError;
use crate::services::accounts::{
    forgot_password as forgot_password_service, login as login_service,
    reset_password as reset_password_service, signup as signup_service,
    verify_signup as verify_signup_service,
};

#[derive(Serialize)]
struct LoginBody {
    message: &'static str,
    token: String,
}

/// Account endpoints report failures as `{"message": ...}`.
fn account_error(err: &ServiceError) -> HttpResponse {
    HttpResponse::build(status_for(err)).json(MessageBody::new(err.to_string()))
}

fn ok(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(MessageBody::new(message))
}

#[post("/api/admin/signup")]
pub async fn signup(
    repo: web::Data<DieselRepository>,
    mailer: web::Data<Arc<dyn Mailer>>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<SignupForm>,
) -> impl Responder {
    let payload: SignupFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return account_error(&ServiceError::from(e)),
    };

    match signup_service(
        payload,
        repo.get_ref(),
        mailer.get_ref().as_ref(),
        &server_config.mail,
    )
    .await
    {
        Ok(()) => ok("OTP sent successfully"),
        Err(err) => account_error(&err),
    }
}

#[post("/api/verify/admin/signup")]
pub async fn verify_signup(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<VerifyOtpForm>,
) -> impl Responder {
    let payload: VerifyOtpFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return account_error(&ServiceError::from(e)),
    };

    match verify_signup_service(payload, repo.get_ref()) {
        Ok(_) => ok("Admin registered successfully"),
        Err(err) => account_error(&err),
    }
}

#[post("/api/admin/login")]
pub async fn login(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<LoginForm>,
) -> impl Responder {
    let payload: LoginFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return account_error(&ServiceError::from(e)),
    };

    match login_service(payload, repo.get_ref(), &server_config.auth) {
        Ok(token) => {
            let cookie = Cookie::build(TOKEN_COOKIE, token.clone())
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .max_age(time::Duration::minutes(server_config.auth.token_ttl_minutes))
                .finish();
            HttpResponse::Ok().cookie(cookie).json(LoginBody {
                message: "Login successful",
                token,
            })
        }
        Err(err) => account_error(&err),
    }
}

#[post("/api/admin/forgot/password")]
pub async fn forgot_password(
    repo: web::Data<DieselRepository>,
    mailer: web::Data<Arc<dyn Mailer>>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<ForgotPasswordForm>,
) -> impl Responder {
    let payload: ForgotPasswordFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return account_error(&ServiceError::from(e)),
    };

    match forgot_password_service(
        payload,
        repo.get_ref(),
        mailer.get_ref().as_ref(),
        &server_config.mail,
    )
    .await
    {
        Ok(()) => ok("OTP sent successfully"),
        Err(err) => account_error(&err),
    }
}

#[post("/api/admin/reset/password")]
pub async fn reset_password(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ResetPasswordForm>,
) -> impl Responder {
    let payload: ResetPasswordFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return account_error(&ServiceError::from(e)),
    };

    match reset_password_service(payload, repo.get_ref()) {
        Ok(()) => ok("Password reset successfully"),
        Err(err) => account_error(&err),
    }
}
