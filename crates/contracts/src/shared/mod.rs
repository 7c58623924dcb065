pub mod import;
pub mod logger;
