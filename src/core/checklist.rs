use chrono::Weekday;

use crate::core::weekday::{ordinal, parse_weekday};
use crate::domain::model::{CheckItem, Checklist};

/// Flags that shape one checklist walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub reference_day: Weekday,
    /// Past-day and undated items may be resolved too.
    pub strict: bool,
    /// Card carries both Morning and Night: every item is its own bunch.
    pub divided: bool,
    /// Resolving a divided card after the night boundary.
    pub skip_first_bunch_at_night: bool,
    /// Bunches already counted on earlier checklists of a divided card.
    pub carry_count: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistOutcome {
    pub to_complete: Vec<CheckItem>,
    pub residual: i32,
    pub night_skipped: bool,
}

impl ChecklistOutcome {
    pub fn is_complete(&self) -> bool {
        self.residual <= 1
    }
}

/// Walks a position-sorted checklist and picks the first unresolved bunch.
///
/// A bunch is a run of consecutive incomplete items for the same weekday and
/// only its leading item is ticked; the rest count toward the same bunch. Only
/// today's or later items count unless `strict`. At night a divided card leaves
/// the morning item of a day alone and resolves the night one.
pub fn resolve_checklist(checklist: &Checklist, opts: &ResolveOptions) -> ChecklistOutcome {
    let mut incomplete_count = if opts.divided { opts.carry_count } else { 0 };
    let mut previous_day: Option<Weekday> = None;
    let mut last_settled_day: Option<Weekday> = None;
    let mut to_complete = Vec::new();
    let mut night_skipped = false;

    for item in &checklist.items {
        let item_day = parse_weekday(&item.name);

        if item.is_complete() {
            last_settled_day = item_day;
            previous_day = None;
            continue;
        }

        let before_reference = match item_day {
            None => true,
            Some(day) => ordinal(day) < ordinal(opts.reference_day),
        };

        if before_reference && !opts.strict {
            continue;
        }

        let continues_bunch = !before_reference && item_day == previous_day && !opts.divided;
        if continues_bunch {
            incomplete_count -= 1;
        }
        previous_day = item_day;

        if incomplete_count <= 0 && !continues_bunch {
            if opts.divided && opts.skip_first_bunch_at_night && last_settled_day != item_day {
                last_settled_day = item_day;
                night_skipped = true;
                continue;
            }
            to_complete.push(item.clone());
        }
        incomplete_count += 1;
    }

    tracing::debug!(
        "Checklist {} has {} incomplete items/bunches",
        checklist.name,
        incomplete_count
    );

    ChecklistOutcome {
        to_complete,
        residual: incomplete_count,
        night_skipped,
    }
}

/// Incomplete items after the last completed one. Earlier blanks are left
/// alone so intentionally skipped entries stay visible.
pub fn trailing_incomplete(checklist: &Checklist) -> Vec<CheckItem> {
    let mut items: Vec<CheckItem> = checklist
        .items
        .iter()
        .rev()
        .take_while(|item| !item.is_complete())
        .cloned()
        .collect();
    items.reverse();
    items
}

pub fn all_incomplete(checklist: &Checklist) -> Vec<CheckItem> {
    checklist
        .items
        .iter()
        .filter(|item| !item.is_complete())
        .cloned()
        .collect()
}
