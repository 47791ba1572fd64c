use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("{0}")]
    NotFound(String),
    /// A uniqueness rule on names was violated.
    #[error("{0}")]
    DuplicateName(String),
    /// The record is not in a state that allows the transition.
    #[error("{0}")]
    InvalidStateTransition(String),
    /// The request carried no session token to record as provenance.
    #[error("Token not found in cookies")]
    MissingToken,
    /// The record kept changing under concurrent writers.
    #[error("The record was modified concurrently, please retry")]
    Conflict,
    /// Submitted form failed validation.
    #[error("{0}")]
    Form(String),
    /// A value did not satisfy its domain constraints.
    #[error("{0}")]
    TypeConstraint(String),
    /// An account with this email already exists.
    #[error("Email is already registered")]
    AlreadyRegistered,
    /// The one-time code is unknown, wrong or expired.
    #[error("Invalid or expired OTP")]
    InvalidOtp,
    /// Credentials were rejected.
    #[error("Invalid email or password")]
    Unauthorized,
    /// The mail relay refused or failed to deliver a message.
    #[error("{0}")]
    Mail(String),
    /// The asset host failed to store, remove or describe an image.
    #[error("{0}")]
    Asset(String),
    /// An unexpected internal error occurred.
    #[error("Internal Server Error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
