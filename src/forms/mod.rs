pub mod accounts;
pub mod categories;
pub mod contact;
pub mod service_contents;
