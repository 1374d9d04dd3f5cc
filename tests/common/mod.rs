#![allow(dead_code)]

use async_trait::async_trait;
use board_cycle::domain::model::{
    Card, CardDates, CheckItem, Checklist, CloneKind, ItemState, ListPosition, Slot, Tag, TagSet,
};
use board_cycle::{BoardError, BoardRepository, Result};
use chrono::{DateTime, Utc};
use std::sync::Mutex;

pub const STANDARD_LISTS: [&str; 12] = [
    "Future TODO",
    "Saturday TODO",
    "Friday TODO",
    "Thursday TODO",
    "Wednesday TODO",
    "Tomorrow TODO",
    "Today TODO",
    "Tonight",
    "Wind Down",
    "Done",
    "Notes",
    "Routine",
];

pub const FUTURE: usize = 0;
pub const TOMORROW: usize = 5;
pub const TODAY: usize = 6;
pub const TONIGHT: usize = 7;
pub const WIND_DOWN: usize = 8;
pub const DONE: usize = 9;
pub const ROUTINE: usize = 11;

pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// Monday 2026-10-19, 10:00 at UTC-7.
pub fn monday_morning() -> DateTime<Utc> {
    utc("2026-10-19T17:00:00Z")
}

/// Monday 2026-10-19, 20:00 at UTC-7.
pub fn monday_night() -> DateTime<Utc> {
    utc("2026-10-20T03:00:00Z")
}

struct State {
    lists: Vec<(Slot, Vec<Card>)>,
    ops: Vec<String>,
    next_id: usize,
}

/// Board kept in memory. Every write is recorded in `ops`.
pub struct InMemoryBoard {
    state: Mutex<State>,
}

impl InMemoryBoard {
    pub fn new(names: &[&str]) -> Self {
        let lists = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                (
                    Slot {
                        id: format!("list-{}", i),
                        name: name.to_string(),
                    },
                    Vec::new(),
                )
            })
            .collect();
        Self {
            state: Mutex::new(State {
                lists,
                ops: Vec::new(),
                next_id: 0,
            }),
        }
    }

    pub fn standard() -> Self {
        Self::new(&STANDARD_LISTS)
    }

    pub fn put(&self, list: usize, card: Card) {
        self.state.lock().unwrap().lists[list].1.push(card);
    }

    pub fn cards(&self, list: usize) -> Vec<Card> {
        self.state.lock().unwrap().lists[list].1.clone()
    }

    pub fn names(&self, list: usize) -> Vec<String> {
        self.cards(list).into_iter().map(|c| c.name).collect()
    }

    pub fn find(&self, card_id: &str) -> Option<(usize, Card)> {
        let state = self.state.lock().unwrap();
        state.lists.iter().enumerate().find_map(|(i, (_, cards))| {
            cards.iter().find(|c| c.id == card_id).map(|c| (i, c.clone()))
        })
    }

    pub fn ops(&self) -> Vec<String> {
        self.state.lock().unwrap().ops.clone()
    }

    fn list_index(state: &State, slot: &Slot) -> Result<usize> {
        state
            .lists
            .iter()
            .position(|(s, _)| s.id == slot.id)
            .ok_or_else(|| BoardError::UpstreamFailure {
                status: 404,
                context: format!("list {}", slot.id),
            })
    }

    fn take(state: &mut State, card_id: &str) -> Result<Card> {
        for (_, cards) in state.lists.iter_mut() {
            if let Some(pos) = cards.iter().position(|c| c.id == card_id) {
                return Ok(cards.remove(pos));
            }
        }
        Err(BoardError::UpstreamFailure {
            status: 404,
            context: format!("card {}", card_id),
        })
    }

    fn place(state: &mut State, list: usize, card: Card, position: ListPosition) {
        let cards = &mut state.lists[list].1;
        match position {
            ListPosition::Top => cards.insert(0, card),
            ListPosition::Bottom => cards.push(card),
        }
    }
}

#[async_trait]
impl BoardRepository for InMemoryBoard {
    async fn list_slots(&self) -> Result<Vec<Slot>> {
        let state = self.state.lock().unwrap();
        Ok(state.lists.iter().map(|(slot, _)| slot.clone()).collect())
    }

    async fn cards_in(&self, slot: &Slot) -> Result<Vec<Card>> {
        let state = self.state.lock().unwrap();
        let index = Self::list_index(&state, slot)?;
        Ok(state.lists[index].1.clone())
    }

    async fn card(&self, card_id: &str) -> Result<Card> {
        self.find(card_id)
            .map(|(_, card)| card)
            .ok_or_else(|| BoardError::UpstreamFailure {
                status: 404,
                context: format!("card {}", card_id),
            })
    }

    async fn move_card(&self, card: &Card, target: &Slot, position: ListPosition) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let index = Self::list_index(&state, target)?;
        let stored = Self::take(&mut state, &card.id)?;
        Self::place(&mut state, index, stored, position);
        state
            .ops
            .push(format!("move {} -> {} ({})", card.name, target.name, position.as_str()));
        Ok(())
    }

    async fn clone_card(
        &self,
        template: &Card,
        dates: &CardDates,
        target: &Slot,
        kind: CloneKind,
    ) -> Result<Card> {
        let mut state = self.state.lock().unwrap();
        let index = Self::list_index(&state, target)?;
        state.next_id += 1;

        let stored = state
            .lists
            .iter()
            .flat_map(|(_, cards)| cards.iter())
            .find(|c| c.id == template.id)
            .cloned()
            .unwrap_or_else(|| template.clone());

        let mut clone = stored;
        clone.id = format!("clone-{}", state.next_id);
        clone.due_complete = false;
        match kind {
            CloneKind::Full => {
                clone.dates = *dates;
                for checklist in clone.checklists.iter_mut() {
                    checklist.id = format!("{}-{}", checklist.id, state.next_id);
                    for item in checklist.items.iter_mut() {
                        item.id = format!("{}-{}", item.id, state.next_id);
                        item.state = ItemState::Incomplete;
                    }
                }
            }
            CloneKind::Lossy => {
                clone.dates = CardDates::default();
                clone.checklists.clear();
            }
        }

        state
            .ops
            .push(format!("clone {} -> {} ({:?})", template.name, target.name, kind));
        Self::place(&mut state, index, clone.clone(), ListPosition::Top);
        Ok(clone)
    }

    async fn update_card_dates(
        &self,
        card: &Card,
        dates: &CardDates,
        target: Option<&Slot>,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let current = state
            .lists
            .iter()
            .position(|(_, cards)| cards.iter().any(|c| c.id == card.id));
        let mut stored = Self::take(&mut state, &card.id)?;
        stored.dates = *dates;
        stored.due_complete = false;
        let index = match target {
            Some(slot) => Self::list_index(&state, slot)?,
            None => current.unwrap_or_default(),
        };
        state.ops.push(format!(
            "dates {} -> {}",
            card.name,
            target.map(|s| s.name.as_str()).unwrap_or("same list")
        ));
        Self::place(&mut state, index, stored, ListPosition::Top);
        Ok(())
    }

    async fn complete_check_item(&self, card: &Card, item: &CheckItem) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .lists
            .iter_mut()
            .flat_map(|(_, cards)| cards.iter_mut())
            .flat_map(|c| c.checklists.iter_mut())
            .flat_map(|l| l.items.iter_mut())
            .find(|i| i.id == item.id);
        if let Some(stored) = stored {
            stored.state = ItemState::Complete;
        }
        state.ops.push(format!("complete {} in {}", item.name, card.name));
        Ok(())
    }

    async fn move_all_cards(&self, from: &Slot, to: &Slot) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let from_index = Self::list_index(&state, from)?;
        let to_index = Self::list_index(&state, to)?;
        let moved = std::mem::take(&mut state.lists[from_index].1);
        state.lists[to_index].1.extend(moved);
        state.ops.push(format!("move all {} -> {}", from.name, to.name));
        Ok(())
    }
}

pub struct CardBuilder {
    card: Card,
}

impl CardBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            card: Card {
                id: id.to_string(),
                name: name.to_string(),
                dates: CardDates::default(),
                due_complete: true,
                tags: TagSet::empty(),
                checklists: Vec::new(),
                unrecognized_labels: Vec::new(),
            },
        }
    }

    pub fn tags(mut self, tags: &[Tag]) -> Self {
        self.card.tags = tags.iter().copied().collect();
        self
    }

    pub fn start(mut self, date: &str) -> Self {
        self.card.dates.start = Some(utc(date));
        self
    }

    pub fn due(mut self, date: &str) -> Self {
        self.card.dates.due = Some(utc(date));
        self
    }

    /// Items as `(name, complete)`, positioned in the given order.
    pub fn checklist(mut self, id: &str, items: &[(&str, bool)]) -> Self {
        let items = items
            .iter()
            .enumerate()
            .map(|(i, (name, complete))| CheckItem {
                id: format!("{}-item-{}", id, i),
                name: name.to_string(),
                state: if *complete {
                    ItemState::Complete
                } else {
                    ItemState::Incomplete
                },
                pos: (i as f64 + 1.0) * 1024.0,
            })
            .collect();
        self.card.checklists.push(Checklist {
            id: id.to_string(),
            name: "Checklist".to_string(),
            items,
        });
        self
    }

    pub fn build(self) -> Card {
        self.card
    }
}
