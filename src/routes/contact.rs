use std::sync::Arc;

use actix_web::{HttpResponse, Responder, post, web};
use serde::Serialize;

use crate::domain::contact::{ConsultationRequest, ContactMessage};
use crate::forms::contact::{ConsultExpertForm, ContactForm};
use crate::mailer::Mailer;
use crate::models::config::ServerConfig;
use crate::routes::status_for;
use crate::services::ServiceError;
use crate::services::contact::{
    consult_expert as consult_expert_service, contact_us as contact_us_service,
};

const SENT: &str = "Your message has been sent successfully";

/// `{success, message}` body of the contact endpoints.
#[derive(Serialize)]
struct ContactBody {
    success: bool,
    message: String,
}

fn respond(result: Result<(), ServiceError>) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::Ok().json(ContactBody {
            success: true,
            message: SENT.to_string(),
        }),
        Err(err) => HttpResponse::build(status_for(&err)).json(ContactBody {
            success: false,
            message: err.to_string(),
        }),
    }
}

#[post("/api/contact")]
pub async fn contact_us(
    mailer: web::Data<Arc<dyn Mailer>>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<ContactForm>,
) -> impl Responder {
    let message: ContactMessage = match form.try_into() {
        Ok(message) => message,
        Err(e) => return respond(Err(ServiceError::from(e))),
    };

    respond(contact_us_service(message, mailer.get_ref().as_ref(), &server_config.mail).await)
}

#[post("/api/consult/expert")]
pub async fn consult_expert(
    mailer: web::Data<Arc<dyn Mailer>>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<ConsultExpertForm>,
) -> impl Responder {
    let request: ConsultationRequest = match form.try_into() {
        Ok(request) => request,
        Err(e) => return respond(Err(ServiceError::from(e))),
    };

    respond(consult_expert_service(request, mailer.get_ref().as_ref(), &server_config.mail).await)
}
