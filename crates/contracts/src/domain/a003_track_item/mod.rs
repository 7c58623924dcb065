pub mod aggregate;

pub use aggregate::{TrackItem, TrackItemDto, TrackItemId};
