use crate::domain::model::Slot;
use crate::utils::error::{BoardError, Result};

/// Slot indices that anchor the cycle. Tonight, Wind Down, Tomorrow and the
/// cycle start are derived from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleLayout {
    pub first_todo: usize,
    pub cycle_end: usize,
    pub today: usize,
    pub done: usize,
    pub routine: usize,
}

/// The board's lists in order, with the rolling day window and role slots:
///
/// `Future TODO, <day lists…>, Tomorrow, Today, Tonight, Wind Down, Done, …, Routine`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCycle {
    slots: Vec<Slot>,
    layout: CycleLayout,
}

impl BoardCycle {
    pub fn new(slots: Vec<Slot>, layout: CycleLayout) -> Result<Self> {
        let cycle = Self { slots, layout };
        cycle.validate()?;
        Ok(cycle)
    }

    /// Finds the role slots by name: the first and last lists containing
    /// "TODO" bound the cycle, the last "today" inside it is Today, and
    /// "done"/"routine" are searched from the cycle end onwards.
    pub fn discover(slots: Vec<Slot>) -> Result<Self> {
        let first_todo = slots
            .iter()
            .position(|s| s.name.contains("TODO"))
            .ok_or_else(|| BoardError::invalid_structure("no list name contains 'TODO'"))?;
        let cycle_end = slots
            .iter()
            .rposition(|s| s.name.contains("TODO"))
            .unwrap_or(first_todo);

        let today = (first_todo + 1..=cycle_end)
            .rev()
            .find(|&i| contains_ignore_case(&slots[i].name, "today"))
            .ok_or_else(|| {
                BoardError::invalid_structure(format!(
                    "no list between '{}' and '{}' contains 'today'",
                    slots[first_todo].name, slots[cycle_end].name
                ))
            })?;

        let mut done = None;
        let mut routine = None;
        for (i, slot) in slots.iter().enumerate().skip(cycle_end) {
            if contains_ignore_case(&slot.name, "done") {
                done = Some(i);
            }
            if contains_ignore_case(&slot.name, "routine") {
                routine = Some(i);
            }
        }
        let done =
            done.ok_or_else(|| BoardError::invalid_structure("no list after the cycle contains 'done'"))?;
        let routine = routine
            .ok_or_else(|| BoardError::invalid_structure("no list after the cycle contains 'routine'"))?;

        tracing::debug!(
            "Discovered cycle: future={} end={} today={} done={} routine={}",
            first_todo,
            cycle_end,
            today,
            done,
            routine
        );

        Self::new(
            slots,
            CycleLayout {
                first_todo,
                cycle_end,
                today,
                done,
                routine,
            },
        )
    }

    /// Checks `first_todo < cycle_start <= today <= cycle_end` and that
    /// Tonight, Wind Down and Done follow Today without gaps.
    pub fn validate(&self) -> Result<()> {
        let l = &self.layout;
        let len = self.slots.len();

        for (role, index) in [
            ("future", l.first_todo),
            ("cycle end", l.cycle_end),
            ("today", l.today),
            ("done", l.done),
            ("routine", l.routine),
        ] {
            if index >= len {
                return Err(BoardError::invalid_structure(format!(
                    "{} index {} is outside the {} board lists",
                    role, index, len
                )));
            }
        }

        if !(l.first_todo < self.cycle_start()
            && self.cycle_start() <= l.today
            && l.today <= l.cycle_end)
        {
            return Err(BoardError::invalid_structure(format!(
                "expected future ({}) < today ({}) <= cycle end ({})",
                l.first_todo, l.today, l.cycle_end
            )));
        }

        let wind_down = self.wind_down();
        if wind_down + 1 != l.done {
            return Err(BoardError::invalid_structure(format!(
                "did you insert a list between {} and {}? wind down should sit at {} directly before done at {}",
                self.slots[l.today].name, self.slots[l.done].name, wind_down, l.done
            )));
        }

        if l.routine == l.done {
            return Err(BoardError::invalid_structure(
                "done and routine must be different lists",
            ));
        }

        Ok(())
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Result<&Slot> {
        self.slots.get(index).ok_or_else(|| {
            BoardError::invalid_structure(format!(
                "slot index {} is outside the {} board lists",
                index,
                self.slots.len()
            ))
        })
    }

    pub fn layout(&self) -> CycleLayout {
        self.layout
    }

    /// Catch-all slot for anything beyond the window.
    pub fn first_todo(&self) -> usize {
        self.layout.first_todo
    }

    pub fn cycle_start(&self) -> usize {
        self.layout.first_todo + 1
    }

    pub fn cycle_end(&self) -> usize {
        self.layout.cycle_end
    }

    pub fn today(&self) -> usize {
        self.layout.today
    }

    pub fn tomorrow(&self) -> usize {
        self.layout.today - 1
    }

    pub fn tonight(&self) -> usize {
        self.layout.today + 1
    }

    pub fn wind_down(&self) -> usize {
        self.layout.today + 2
    }

    pub fn done(&self) -> usize {
        self.layout.done
    }

    pub fn routine(&self) -> usize {
        self.layout.routine
    }

    /// Short label for what the slot at `index` is used for.
    pub fn role_of(&self, index: usize) -> &'static str {
        match index {
            i if i == self.first_todo() => "future",
            i if i == self.today() => "today",
            i if i == self.tomorrow() => "tomorrow",
            i if i == self.tonight() => "tonight",
            i if i == self.wind_down() => "wind down",
            i if i == self.done() => "done",
            i if i == self.routine() => "routine",
            i if i > self.first_todo() && i < self.today() => "day",
            _ => "",
        }
    }

    /// Number of days the window covers before overflowing into the future slot.
    pub fn span(&self) -> usize {
        self.layout.cycle_end - self.layout.first_todo
    }

    pub fn in_window(&self, index: usize) -> bool {
        (self.layout.first_todo..=self.layout.today).contains(&index)
    }

    pub fn clamp_to_window(&self, index: usize) -> usize {
        index.clamp(self.layout.first_todo, self.layout.today)
    }

    /// `(from, to)` pairs for the daily shift, last day first so every move
    /// sees its source list before it is refilled.
    pub fn forward_shifts(&self) -> Vec<(usize, usize)> {
        (self.cycle_start()..self.layout.cycle_end)
            .rev()
            .map(|i| (i, i + 1))
            .collect()
    }

    /// Inverse of [`forward_shifts`](Self::forward_shifts).
    pub fn backward_shifts(&self) -> Vec<(usize, usize)> {
        (self.cycle_start()..self.layout.cycle_end)
            .map(|i| (i + 1, i))
            .collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
