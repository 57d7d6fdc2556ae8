pub mod path;
pub mod protect;
pub mod reporting;
