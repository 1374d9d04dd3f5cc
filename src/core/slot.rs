use chrono::{DateTime, Utc};

use crate::core::cycle::BoardCycle;
use crate::core::schedule::Schedule;

/// Slot for a card dated `date`: Today for anything due today or earlier, one
/// slot further from Today per day ahead, and the future slot once the date
/// runs past the window. `None` when there is no date to go by.
pub fn locate_slot(
    cycle: &BoardCycle,
    schedule: &Schedule,
    now: DateTime<Utc>,
    date: Option<DateTime<Utc>>,
) -> Option<usize> {
    let date = date?;
    let days_out = schedule.days_between(now, date);
    let clamped = days_out.clamp(0, cycle.span() as i64) as usize;
    Some(cycle.today().saturating_sub(clamped))
}

/// Like [`locate_slot`], but a result outside the window is pulled back to the
/// nearest window edge.
pub fn locate_in_window(
    cycle: &BoardCycle,
    schedule: &Schedule,
    now: DateTime<Utc>,
    date: Option<DateTime<Utc>>,
) -> Option<usize> {
    let index = locate_slot(cycle, schedule, now, date)?;
    if cycle.in_window(index) {
        return Some(index);
    }
    let fallback = cycle.clamp_to_window(index);
    tracing::debug!(
        "Slot {} is outside the cycle window, falling back to {}",
        index,
        fallback
    );
    Some(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cycle::fixtures::{slots, standard_cycle};
    use crate::core::cycle::CycleLayout;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        // 10:00 local (UTC-7) on Monday 2026-10-19
        DateTime::parse_from_rfc3339("2026-10-19T17:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_same_day_and_past_land_on_today() {
        let cycle = standard_cycle();
        let schedule = Schedule::default();
        assert_eq!(locate_slot(&cycle, &schedule, now(), Some(now())), Some(6));
        assert_eq!(
            locate_slot(&cycle, &schedule, now(), Some(now() - Duration::days(3))),
            Some(6)
        );
    }

    #[test]
    fn test_days_ahead_walk_toward_future() {
        let cycle = standard_cycle();
        let schedule = Schedule::default();
        assert_eq!(
            locate_slot(&cycle, &schedule, now(), Some(now() + Duration::days(1))),
            Some(cycle.tomorrow())
        );
        assert_eq!(
            locate_slot(&cycle, &schedule, now(), Some(now() + Duration::days(4))),
            Some(2)
        );
    }

    #[test]
    fn test_far_future_clamps_to_window_edge() {
        let cycle = standard_cycle();
        let schedule = Schedule::default();
        let edge = locate_slot(
            &cycle,
            &schedule,
            now(),
            Some(now() + Duration::days(cycle.span() as i64)),
        );
        let far = locate_slot(&cycle, &schedule, now(), Some(now() + Duration::days(100)));
        assert_eq!(far, edge);
        assert_eq!(far, Some(cycle.first_todo()));
    }

    #[test]
    fn test_no_date_is_unlocatable() {
        let cycle = standard_cycle();
        assert_eq!(locate_slot(&cycle, &Schedule::default(), now(), None), None);
    }

    #[test]
    fn test_overshoot_below_future_slot_falls_back_into_window() {
        // Cycle end sits past Today, so the widest span overshoots the future slot.
        let names = [
            "Inbox",
            "Future TODO",
            "Later TODO",
            "Today TODO",
            "Tonight",
            "Wind Down",
            "Done",
            "Routine",
        ];
        let cycle = BoardCycle::new(
            slots(&names),
            CycleLayout {
                first_todo: 1,
                cycle_end: 5,
                today: 3,
                done: 6,
                routine: 7,
            },
        )
        .unwrap();
        let schedule = Schedule::default();
        let far = Some(now() + Duration::days(30));
        assert_eq!(locate_slot(&cycle, &schedule, now(), far), Some(0));
        assert_eq!(locate_in_window(&cycle, &schedule, now(), far), Some(1));
    }
}
