pub mod checklist;
pub mod classify;
pub mod cycle;
pub mod engine;
pub mod executor;
pub mod reschedule;
pub mod schedule;
pub mod slot;
pub mod transition;
pub mod weekday;

pub use crate::domain::model::{Card, CardDates, ResolvedAction, Slot, Tag, TagSet};
pub use crate::domain::ports::{BoardRepository, Clock};
pub use crate::utils::error::Result;
