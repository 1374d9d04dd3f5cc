use chrono::{DateTime, Utc};

use crate::core::cycle::BoardCycle;
use crate::core::schedule::Schedule;
use crate::core::slot::locate_in_window;
use crate::domain::model::{ListPosition, Tag};
use crate::domain::ports::BoardRepository;
use crate::utils::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationReport {
    pub shifted_slots: usize,
    pub pulled_from_future: usize,
    pub separated_night: usize,
}

/// Reads the board's lists and checks the slot layout before anything moves.
pub async fn load_cycle<R: BoardRepository + ?Sized>(board: &R) -> Result<BoardCycle> {
    let slots = board.list_slots().await?;
    BoardCycle::discover(slots)
}

/// Moves every day list one step toward Today, then pulls due cards out of
/// the future list and splits off tonight's cards.
///
/// Shifts run strictly one after another from the cycle end backwards; each
/// one must see its source list before the next shift refills it.
pub async fn rotate_day<R: BoardRepository + ?Sized>(
    board: &R,
    cycle: &BoardCycle,
    schedule: &Schedule,
    now: DateTime<Utc>,
) -> Result<RotationReport> {
    cycle.validate()?;

    tracing::info!("CYCLE: {} - {}", cycle.cycle_start(), cycle.cycle_end());
    let mut report = RotationReport::default();
    for (from, to) in cycle.forward_shifts() {
        let (from, to) = (cycle.slot(from)?, cycle.slot(to)?);
        tracing::info!("Moving from {} to {}", from.name, to.name);
        board.move_all_cards(from, to).await?;
        report.shifted_slots += 1;
    }

    report.pulled_from_future = move_from_future(board, cycle, schedule, now).await?;
    report.separated_night = separate_night(board, cycle).await?;
    Ok(report)
}

/// Undoes one [`rotate_day`] shift. Meant for manual correction.
pub async fn rewind_day<R: BoardRepository + ?Sized>(board: &R, cycle: &BoardCycle) -> Result<usize> {
    cycle.validate()?;

    tracing::info!("De-transitioning days");
    let mut shifted = 0;
    for (from, to) in cycle.backward_shifts() {
        let (from, to) = (cycle.slot(from)?, cycle.slot(to)?);
        tracing::info!("Moving from {} to {}", from.name, to.name);
        board.move_all_cards(from, to).await?;
        shifted += 1;
    }
    Ok(shifted)
}

/// Relocates dated cards in the future list that now fall inside the window.
pub async fn move_from_future<R: BoardRepository + ?Sized>(
    board: &R,
    cycle: &BoardCycle,
    schedule: &Schedule,
    now: DateTime<Utc>,
) -> Result<usize> {
    tracing::info!("Moving cards out of future list");

    let future = cycle.slot(cycle.first_todo())?;
    let mut moved = 0;
    for card in board.cards_in(future).await? {
        let Some(index) = locate_in_window(cycle, schedule, now, card.dates.known()) else {
            continue;
        };
        if index == cycle.first_todo() {
            continue;
        }
        let target = cycle.slot(index)?;
        tracing::info!("Moving card {} to list {}", card.name, target.name);
        board.move_card(&card, target, ListPosition::Top).await?;
        moved += 1;
    }
    Ok(moved)
}

/// Night-only cards in Today go to Tonight.
pub async fn separate_night<R: BoardRepository + ?Sized>(board: &R, cycle: &BoardCycle) -> Result<usize> {
    let today = cycle.slot(cycle.today())?;
    let tonight = cycle.slot(cycle.tonight())?;
    let mut moved = 0;
    for card in board.cards_in(today).await? {
        if card.has(Tag::Night) && !card.has(Tag::Morning) {
            tracing::info!("Moving night card {} to {}", card.name, tonight.name);
            board.move_card(&card, tonight, ListPosition::Top).await?;
            moved += 1;
        }
    }
    Ok(moved)
}

/// Folds whatever is left in Tonight back into Today.
pub async fn merge_night<R: BoardRepository + ?Sized>(board: &R, cycle: &BoardCycle) -> Result<()> {
    let tonight = cycle.slot(cycle.tonight())?;
    let today = cycle.slot(cycle.today())?;
    tracing::info!("Merging {} into {}", tonight.name, today.name);
    board.move_all_cards(tonight, today).await
}
