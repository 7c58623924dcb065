pub mod a001_schedule_entry;
pub mod a002_book;
pub mod a003_track_item;
pub mod a004_video;
pub mod common;
