use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::services::ServiceError;

pub mod accounts;
pub mod categories;
pub mod contact;
pub mod service_contents;

/// `{"error": ...}` body of every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"message": ...}` body of operations that return no document.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::DuplicateName(_)
        | ServiceError::InvalidStateTransition(_)
        | ServiceError::MissingToken
        | ServiceError::Form(_)
        | ServiceError::TypeConstraint(_)
        | ServiceError::AlreadyRegistered
        | ServiceError::InvalidOtp => StatusCode::BAD_REQUEST,
        ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
        ServiceError::Conflict => StatusCode::CONFLICT,
        ServiceError::Mail(_) | ServiceError::Asset(_) | ServiceError::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn error_response(err: &ServiceError) -> HttpResponse {
    HttpResponse::build(status_for(err)).json(ErrorBody {
        error: err.to_string(),
    })
}

pub fn message_response(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(MessageBody::new(message))
}

/// Report malformed JSON bodies with the same `{"error": ...}` envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let status = match &err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        _ => StatusCode::BAD_REQUEST,
    };
    let response = HttpResponse::build(status).json(ErrorBody {
        error: err.to_string(),
    });
    InternalError::from_response(err, response).into()
}

/// Register every API route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(categories::create_category)
        .service(categories::add_subcategory)
        .service(categories::rename_category)
        .service(categories::rename_subcategory)
        .service(categories::soft_delete_category)
        .service(categories::soft_delete_subcategory)
        .service(categories::restore_category)
        .service(categories::restore_subcategory)
        .service(categories::hard_delete_category)
        .service(categories::hard_delete_subcategory)
        .service(categories::list_active_categories)
        .service(categories::list_all_active_subcategories)
        .service(categories::list_active_subcategories)
        .service(categories::list_deleted_categories)
        .service(categories::list_deleted_subcategories)
        .service(service_contents::create_service_content)
        .service(service_contents::update_service_content)
        .service(service_contents::list_deleted_service_contents)
        .service(service_contents::soft_delete_service_content)
        .service(service_contents::permanent_delete_service_content)
        .service(service_contents::restore_service_content)
        .service(service_contents::list_service_contents)
        .service(service_contents::get_service_content)
        .service(service_contents::list_by_category)
        .service(service_contents::list_by_subcategory)
        .service(service_contents::search_by_keywords)
        .service(accounts::signup)
        .service(accounts::verify_signup)
        .service(accounts::login)
        .service(accounts::forgot_password)
        .service(accounts::reset_password)
        .service(contact::contact_us)
        .service(contact::consult_expert);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        assert_eq!(
            status_for(&ServiceError::NotFound("Category not found".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_for(&ServiceError::MissingToken), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&ServiceError::Conflict), StatusCode::CONFLICT);
        assert_eq!(status_for(&ServiceError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for(&ServiceError::Mail("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
