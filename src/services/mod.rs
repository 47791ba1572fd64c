pub use errors::{ServiceError, ServiceResult};

pub mod accounts;
pub mod categories;
pub mod contact;
pub mod errors;
pub mod service_contents;
