pub mod request;
pub mod response;

pub use request::ImportRequest;
pub use response::{ImportResponse, ImportStartStatus};
