pub mod metadata;
pub mod scanner;
