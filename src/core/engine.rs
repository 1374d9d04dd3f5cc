use chrono::{DateTime, Datelike, Duration, FixedOffset, Utc};
use std::collections::HashSet;

use crate::core::checklist::{all_incomplete, resolve_checklist, trailing_incomplete, ResolveOptions};
use crate::core::classify::{classify, CardCategory};
use crate::core::cycle::BoardCycle;
use crate::core::reschedule::{next_dates, periodic_increment, Cadence, RescheduleRule};
use crate::core::schedule::Schedule;
use crate::core::slot::locate_in_window;
use crate::domain::model::{
    Card, CardDates, CheckItem, Checklist, CloneKind, ListPosition, ResolvedAction, Tag,
};

/// Per-call view of the card being resolved.
struct Resolution<'a> {
    card: &'a Card,
    cycle: &'a BoardCycle,
    now: DateTime<Utc>,
    reference: DateTime<FixedOffset>,
    strict: bool,
    task: bool,
}

/// Decides what happens to a card that was just ticked. Pure: the returned
/// actions are applied by [`ActionExecutor`](crate::core::executor::ActionExecutor).
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionEngine {
    schedule: Schedule,
}

impl ResolutionEngine {
    pub fn new(schedule: Schedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn locate(&self, cycle: &BoardCycle, now: DateTime<Utc>, date: DateTime<Utc>) -> usize {
        locate_in_window(cycle, &self.schedule, now, Some(date)).unwrap_or(cycle.today())
    }

    pub fn resolve(&self, card: &Card, cycle: &BoardCycle, now: DateTime<Utc>) -> Vec<ResolvedAction> {
        let mut sorted = card.clone();
        sorted.checklists.iter_mut().for_each(Checklist::sort_items);

        let ctx = Resolution {
            card: &sorted,
            cycle,
            now,
            reference: self.schedule.reference_instant(now),
            strict: sorted.has(Tag::Strict),
            task: sorted.has(Tag::Task),
        };

        tracing::info!("Received card {} ({}) to resolve", sorted.name, sorted.id);

        match classify(&sorted.tags) {
            CardCategory::Periodic(cadence) => self.resolve_periodic(&ctx, cadence),
            CardCategory::DailyFamily => self.resolve_daily(&ctx),
            CardCategory::OneOffTask => {
                tracing::info!("Completing standard task {}", sorted.name);
                let mut actions = complete_items(&sorted.checklists, all_incomplete);
                actions.push(move_to(cycle.done(), ListPosition::Top));
                actions
            }
            CardCategory::Static => {
                tracing::info!("Completing static task {}", sorted.name);
                let mut actions = complete_items(&sorted.checklists, all_incomplete);
                actions.push(move_to(cycle.routine(), ListPosition::Top));
                actions.push(ResolvedAction::CloneCard {
                    dates: CardDates::default(),
                    target: cycle.wind_down(),
                    kind: CloneKind::Lossy,
                    complete_items: false,
                });
                actions
            }
            CardCategory::Unhandled => {
                tracing::error!("Received unhandleable card {} ({})", sorted.name, sorted.id);
                vec![ResolvedAction::Reject {
                    reason: format!(
                        "card '{}' carries no recurrence, task, reverse or static tag",
                        sorted.name
                    ),
                }]
            }
        }
    }

    fn resolve_periodic(&self, ctx: &Resolution<'_>, cadence: Cadence) -> Vec<ResolvedAction> {
        tracing::info!("Resolving {} card {}", cadence.tag(), ctx.card.name);

        let known = ctx
            .card
            .dates
            .known()
            .unwrap_or(ctx.now)
            .with_timezone(&self.schedule.offset);
        let rule = RescheduleRule {
            increment: periodic_increment(cadence, ctx.strict, known),
            strict: ctx.strict,
            one_off_task: ctx.task,
        };
        let dates = next_dates(&base_dates(ctx), &rule, ctx.reference);

        if let Some(done) = self.expired_routine_task(ctx, &dates) {
            return done;
        }

        let mut actions = complete_items(&ctx.card.checklists, trailing_incomplete);
        actions.push(move_to(ctx.cycle.routine(), ListPosition::Top));

        let target = self.locate(ctx.cycle, ctx.now, dates.known().unwrap_or(ctx.now));
        tracing::info!("Cloning {} into slot {}", ctx.card.name, target);
        actions.push(ResolvedAction::CloneCard {
            dates,
            target,
            kind: CloneKind::Full,
            complete_items: false,
        });
        actions
    }

    fn resolve_daily(&self, ctx: &Resolution<'_>) -> Vec<ResolvedAction> {
        let card = ctx.card;
        let is_daily = card.has(Tag::Daily);
        let is_reverse = card.has(Tag::Reverse);
        let divided = card.has(Tag::Morning) && card.has(Tag::Night);
        let night = self.schedule.is_night(ctx.now);

        tracing::info!(
            "Resolving {} card {}",
            if is_daily { Tag::Daily } else { Tag::Reverse },
            card.name
        );

        let known = card.dates.known().unwrap_or(ctx.now);
        let stale_week = self.is_stale_week(ctx);
        let card_day = if ctx.now >= known {
            ctx.reference.weekday()
        } else {
            known.with_timezone(&self.schedule.offset).weekday()
        };

        let mut complete = true;
        let mut carry_count = 0;
        let mut night_skipped = false;
        let mut completions = Vec::new();

        if stale_week {
            tracing::info!("Card {} belongs to a finished week, closing it", card.name);
        } else {
            for checklist in &card.checklists {
                let outcome = resolve_checklist(
                    checklist,
                    &ResolveOptions {
                        reference_day: card_day,
                        strict: ctx.strict,
                        divided,
                        skip_first_bunch_at_night: divided && night,
                        carry_count,
                    },
                );
                completions.extend(outcome.to_complete.iter().map(|item| complete_item(checklist, item)));
                if divided {
                    carry_count += outcome.residual;
                }
                night_skipped |= outcome.night_skipped;
                complete &= outcome.is_complete();
            }
        }

        let dividing = divided && !night && carry_count > 1;

        let increment = if divided {
            Duration::hours(12) + if night_skipped { Duration::hours(12) } else { Duration::zero() }
        } else {
            Duration::days(1)
        };
        let rule = RescheduleRule {
            increment,
            strict: ctx.strict,
            one_off_task: ctx.task,
        };
        let dates = next_dates(&base_dates(ctx), &rule, ctx.reference);

        if let Some(done) = self.expired_routine_task(ctx, &dates) {
            return done;
        }

        let moving_index = if is_daily {
            self.locate(ctx.cycle, ctx.now, dates.known().unwrap_or(ctx.now))
        } else {
            ctx.cycle.wind_down()
        };

        let mut actions = completions;

        if !complete {
            tracing::info!("Card {} is not complete", card.name);
            if dividing {
                tracing::info!("Moving incomplete divided card {} to tonight", card.name);
                actions.push(move_to(ctx.cycle.tonight(), ListPosition::Bottom));
                // Not a no-op: the update clears the tick so the night half can be ticked.
                actions.push(ResolvedAction::UpdateCardDates {
                    dates: card.dates,
                    target: None,
                });
            } else if is_daily
                && dates
                    .due
                    .is_some_and(|due| due > self.schedule.tomorrow_start(ctx.now))
            {
                tracing::info!("Moving extant card {} to slot {}", card.name, moving_index);
                actions.push(ResolvedAction::UpdateCardDates {
                    dates,
                    target: Some(moving_index),
                });
            } else {
                tracing::info!("Updating extant card {}", card.name);
                actions.push(ResolvedAction::UpdateCardDates { dates, target: None });
            }
            return actions;
        }

        if stale_week {
            actions.clear();
        } else {
            let mut seen: HashSet<String> = actions
                .iter()
                .filter_map(|action| match action {
                    ResolvedAction::CompleteItem { item, .. } => Some(item.id.clone()),
                    _ => None,
                })
                .collect();
            for action in complete_items(&card.checklists, trailing_incomplete) {
                if let ResolvedAction::CompleteItem { item, .. } = &action {
                    if seen.insert(item.id.clone()) {
                        actions.push(action);
                    }
                }
            }
        }

        actions.push(move_to(ctx.cycle.routine(), ListPosition::Top));
        tracing::info!("Cloning {} into slot {}", card.name, moving_index);
        actions.push(ResolvedAction::CloneCard {
            dates,
            target: moving_index,
            kind: CloneKind::Full,
            complete_items: is_reverse,
        });
        actions
    }

    /// A card that also carries Task stops recurring once its deadline passed
    /// or its next start would land after the deadline.
    fn expired_routine_task(
        &self,
        ctx: &Resolution<'_>,
        next: &CardDates,
    ) -> Option<Vec<ResolvedAction>> {
        if !ctx.task {
            return None;
        }
        let due = ctx.card.dates.due?;
        let next_known = next.known().unwrap_or(due);
        if due < ctx.now || next_known > due {
            tracing::info!("Completing periodic task {}", ctx.card.name);
            return Some(vec![move_to(ctx.cycle.done(), ListPosition::Top)]);
        }
        None
    }

    /// The reference day is past the Saturday that ends the card's due week.
    fn is_stale_week(&self, ctx: &Resolution<'_>) -> bool {
        let due = ctx
            .card
            .dates
            .due
            .or(ctx.card.dates.start)
            .unwrap_or(ctx.now)
            .with_timezone(&self.schedule.offset);
        let to_saturday = 6 - due.weekday().num_days_from_sunday() as i64;
        let ending_saturday = due.date_naive() + Duration::days(to_saturday);
        ctx.reference.date_naive() > ending_saturday
    }
}

/// Dates to reschedule from. An undated recurring card counts as due now so
/// its next copy lands one increment ahead instead of in Today.
fn base_dates(ctx: &Resolution<'_>) -> CardDates {
    match ctx.card.dates.known() {
        None if !ctx.task => CardDates::new(None, Some(ctx.now)),
        _ => ctx.card.dates,
    }
}

fn move_to(target: usize, position: ListPosition) -> ResolvedAction {
    ResolvedAction::MoveCard { target, position }
}

fn complete_item(checklist: &Checklist, item: &CheckItem) -> ResolvedAction {
    ResolvedAction::CompleteItem {
        checklist_id: checklist.id.clone(),
        item: item.clone(),
    }
}

fn complete_items(
    checklists: &[Checklist],
    select: fn(&Checklist) -> Vec<CheckItem>,
) -> Vec<ResolvedAction> {
    checklists
        .iter()
        .flat_map(|checklist| {
            select(checklist)
                .into_iter()
                .map(move |item| complete_item(checklist, &item))
        })
        .collect()
}
