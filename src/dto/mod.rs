pub mod categories;
pub mod service_contents;
