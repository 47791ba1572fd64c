use crate::domain::contact::{ConsultationRequest, ContactMessage};
use crate::mailer::{Mailer, OutgoingEmail};
use crate::models::config::MailConfig;

use super::{ServiceError, ServiceResult};

const SEND_FAILED: &str = "Failed to send message. Please try again later.";
const NO_MESSAGE: &str = "No additional message provided";

async fn deliver(mailer: &dyn Mailer, email: OutgoingEmail) -> ServiceResult<()> {
    match mailer.send(&email).await {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("Failed to deliver \"{}\": {e}", email.subject);
            Err(ServiceError::Mail(SEND_FAILED.to_string()))
        }
    }
}

/// Forward a "contact us" message to the contact inbox, replying to the
/// visitor.
pub async fn contact_us(
    message: ContactMessage,
    mailer: &dyn Mailer,
    mail: &MailConfig,
) -> ServiceResult<()> {
    let text = format!(
        "Name: {}\nEmail: {}\nSubject: {}\n\nMessage:\n{}",
        message.name, message.email, message.subject, message.message
    );

    deliver(
        mailer,
        OutgoingEmail {
            from: mail.sender.clone(),
            to: mail.contact_receiver.clone(),
            reply_to: Some(message.email.to_string()),
            subject: format!("Contact Form: {}", message.subject),
            text,
            html: None,
        },
    )
    .await
}

pub async fn consult_expert(
    request: ConsultationRequest,
    mailer: &dyn Mailer,
    mail: &MailConfig,
) -> ServiceResult<()> {
    let message = request
        .message
        .as_ref()
        .map_or(NO_MESSAGE, |message| message.as_str());
    let text = format!(
        "Name: {}\nEmail: {}\nCity: {}\nRequirement: {}\nPhone: {}\n\nMessage:\n{}",
        request.name, request.email, request.city, request.requirement, request.phone, message
    );

    deliver(
        mailer,
        OutgoingEmail {
            from: mail.sender.clone(),
            to: mail.consult_receiver.clone(),
            reply_to: Some(request.email.to_string()),
            subject: format!("Contact Form Submission from {}", request.name),
            text,
            html: None,
        },
    )
    .await
}
