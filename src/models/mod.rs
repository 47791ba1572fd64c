//! Diesel row types and their conversions into domain entities.

pub mod admin;
pub mod category;
pub mod config;
pub mod service_content;
