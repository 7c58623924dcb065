pub mod aggregate;

pub use aggregate::{Video, VideoDto, VideoId};
