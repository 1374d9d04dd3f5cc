use crate::core::reschedule::Cadence;
use crate::domain::model::{Tag, TagSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardCategory {
    /// Weekly, Biweekly or Monthly.
    Periodic(Cadence),
    /// Daily or Reverse.
    DailyFamily,
    OneOffTask,
    Static,
    Unhandled,
}

/// First matching rule wins: periodic cadence, daily/reverse, task, static.
pub fn classify(tags: &TagSet) -> CardCategory {
    if let Some(cadence) = Cadence::periodic_from(tags) {
        CardCategory::Periodic(cadence)
    } else if tags.contains_any(&[Tag::Daily, Tag::Reverse]) {
        CardCategory::DailyFamily
    } else if tags.contains(Tag::Task) {
        CardCategory::OneOffTask
    } else if tags.contains(Tag::Static) {
        CardCategory::Static
    } else {
        CardCategory::Unhandled
    }
}
