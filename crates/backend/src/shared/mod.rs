pub mod config;
pub mod data;
pub mod import;
pub mod logger;
