pub mod aggregate;

pub use aggregate::{ScheduleEntry, ScheduleEntryDto, ScheduleEntryId};
