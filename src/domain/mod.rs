//! Domain entities and value objects, free of persistence and HTTP concerns.

pub mod admin;
pub mod category;
pub mod contact;
pub mod service_content;
pub mod types;
