use crate::domain::model::{Card, CardDates, CheckItem, CloneKind, ListPosition, Slot};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Remote board holding every slot and card. The engine only reads snapshots
/// from it and pushes decided changes back.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn list_slots(&self) -> Result<Vec<Slot>>;
    async fn cards_in(&self, slot: &Slot) -> Result<Vec<Card>>;
    async fn card(&self, card_id: &str) -> Result<Card>;
    async fn move_card(&self, card: &Card, target: &Slot, position: ListPosition) -> Result<()>;
    async fn clone_card(
        &self,
        template: &Card,
        dates: &CardDates,
        target: &Slot,
        kind: CloneKind,
    ) -> Result<Card>;
    /// Writes new dates and clears the completion tick, optionally moving the
    /// card to the top of `target`.
    async fn update_card_dates(
        &self,
        card: &Card,
        dates: &CardDates,
        target: Option<&Slot>,
    ) -> Result<()>;
    async fn complete_check_item(&self, card: &Card, item: &CheckItem) -> Result<()>;
    async fn move_all_cards(&self, from: &Slot, to: &Slot) -> Result<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
