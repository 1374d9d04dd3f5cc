use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Utc};

use crate::domain::model::{CardDates, Tag, TagSet};

const WEEK_DAYS: i64 = 7;

/// Recurrence cadence and its fixed day increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl Cadence {
    pub fn days(self) -> i64 {
        match self {
            Cadence::Daily => 1,
            Cadence::Weekly => 7,
            Cadence::Biweekly => 14,
            Cadence::Monthly => 30,
        }
    }

    pub fn tag(self) -> Tag {
        match self {
            Cadence::Daily => Tag::Daily,
            Cadence::Weekly => Tag::Weekly,
            Cadence::Biweekly => Tag::Biweekly,
            Cadence::Monthly => Tag::Monthly,
        }
    }

    /// Longest periodic cadence present on the card, if any.
    pub fn periodic_from(tags: &TagSet) -> Option<Cadence> {
        [Cadence::Monthly, Cadence::Biweekly, Cadence::Weekly]
            .into_iter()
            .find(|cadence| tags.contains(cadence.tag()))
    }
}

/// How far a periodic card moves. Strict monthly cards jump four weeks, or
/// five when the four-week trial lands exactly on a week boundary of its month.
pub fn periodic_increment(cadence: Cadence, strict: bool, known: DateTime<FixedOffset>) -> Duration {
    if cadence == Cadence::Monthly && strict {
        let trial = known + Duration::days(WEEK_DAYS * 4);
        let day = trial.day() as i64;
        let week_boundary = (day / WEEK_DAYS) * WEEK_DAYS;
        let weeks = if day <= week_boundary { 5 } else { 4 };
        return Duration::days(WEEK_DAYS * weeks);
    }
    Duration::days(cadence.days())
}

/// Inputs to one date recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescheduleRule {
    pub increment: Duration,
    pub strict: bool,
    /// Due dates of one-off tasks are fixed deadlines.
    pub one_off_task: bool,
}

/// Moves `date` onto the reference day, keeping its local time of day. A date
/// already later than the reference instant is kept as is.
pub fn rebase_onto(date: DateTime<Utc>, reference: DateTime<FixedOffset>) -> DateTime<Utc> {
    let existing = date.with_timezone(reference.offset());
    if existing > reference {
        return date;
    }

    let naive = reference.date_naive().and_time(existing.time());
    match reference.offset().from_local_datetime(&naive).single() {
        Some(rebased) => rebased.with_timezone(&Utc),
        None => date,
    }
}

/// Next start/due pair. Non-strict cards are first re-anchored on the
/// reference day, strict ones keep their exact interval.
pub fn next_dates(
    dates: &CardDates,
    rule: &RescheduleRule,
    reference: DateTime<FixedOffset>,
) -> CardDates {
    let mut start = dates.start;
    let mut due = dates.due;

    if !rule.strict {
        start = start.map(|d| rebase_onto(d, reference));
        if !rule.one_off_task {
            due = due.map(|d| rebase_onto(d, reference));
        }
    }

    start = start.map(|d| d + rule.increment);
    if !rule.one_off_task {
        due = due.map(|d| d + rule.increment);
    }

    CardDates { start, due }
}
