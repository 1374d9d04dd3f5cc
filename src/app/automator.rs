use chrono::{DateTime, Utc};

use crate::adapters::webhook::{evaluate, WebhookVerdict};
use crate::app::timers::TimedJob;
use crate::core::cycle::BoardCycle;
use crate::core::engine::ResolutionEngine;
use crate::core::executor::{ActionExecutor, ApplySummary};
use crate::core::schedule::Schedule;
use crate::core::transition::{self, RotationReport};
use crate::domain::model::{Card, ResolvedAction, Slot};
use crate::domain::ports::{BoardRepository, Clock, SystemClock};
use crate::utils::error::Result;

/// Entry point tying a board, a clock and the resolution engine together.
/// Every operation reads a fresh copy of the board layout first.
pub struct BoardAutomator<R: BoardRepository, C: Clock = SystemClock> {
    board: R,
    clock: C,
    engine: ResolutionEngine,
}

impl<R: BoardRepository> BoardAutomator<R, SystemClock> {
    pub fn new(board: R, schedule: Schedule) -> Self {
        Self::with_clock(board, SystemClock, schedule)
    }
}

impl<R: BoardRepository, C: Clock> BoardAutomator<R, C> {
    pub fn with_clock(board: R, clock: C, schedule: Schedule) -> Self {
        Self {
            board,
            clock,
            engine: ResolutionEngine::new(schedule),
        }
    }

    pub fn board(&self) -> &R {
        &self.board
    }

    pub fn schedule(&self) -> &Schedule {
        self.engine.schedule()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub async fn cycle(&self) -> Result<BoardCycle> {
        transition::load_cycle(&self.board).await
    }

    /// Actions the engine would take for `card`, without touching the board.
    pub async fn plan(&self, card: &Card) -> Result<Vec<ResolvedAction>> {
        let cycle = self.cycle().await?;
        Ok(self.engine.resolve(card, &cycle, self.now()))
    }

    pub async fn resolve(&self, card: &Card) -> Result<ApplySummary> {
        let cycle = self.cycle().await?;
        self.resolve_in(card, &cycle).await
    }

    async fn resolve_in(&self, card: &Card, cycle: &BoardCycle) -> Result<ApplySummary> {
        let actions = self.engine.resolve(card, cycle, self.now());
        let summary = ActionExecutor::new(&self.board, cycle).apply(card, &actions).await?;
        tracing::info!(
            "Resolved {}: {} items completed, {} moves, {} date updates, {} clones",
            card.name,
            summary.completed_items,
            summary.moves,
            summary.date_updates,
            summary.clones.len()
        );
        Ok(summary)
    }

    pub async fn resolve_card_by_id(&self, card_id: &str) -> Result<ApplySummary> {
        let card = self.board.card(card_id).await?;
        self.resolve(&card).await
    }

    /// Resolves every ticked card in one slot, stopping at the first failure.
    pub async fn resolve_ticked_in(&self, slot_index: usize) -> Result<Vec<ApplySummary>> {
        let cycle = self.cycle().await?;
        let slot = cycle.slot(slot_index)?;
        tracing::info!("Resolving ticked cards in {}", slot.name);

        let mut summaries = Vec::new();
        for card in self.board.cards_in(slot).await? {
            if !card.due_complete {
                continue;
            }
            summaries.push(self.resolve_in(&card, &cycle).await?);
        }
        Ok(summaries)
    }

    pub async fn handle_webhook(&self, method: &str, body: &str) -> Result<WebhookVerdict> {
        let verdict = evaluate(method, body)?;
        if let WebhookVerdict::Resolve { card_id } = &verdict {
            self.resolve_card_by_id(card_id).await?;
        }
        Ok(verdict)
    }

    pub async fn rotate_day(&self) -> Result<RotationReport> {
        let cycle = self.cycle().await?;
        transition::rotate_day(&self.board, &cycle, self.schedule(), self.now()).await
    }

    pub async fn rewind_day(&self) -> Result<usize> {
        let cycle = self.cycle().await?;
        transition::rewind_day(&self.board, &cycle).await
    }

    pub async fn merge_night(&self) -> Result<()> {
        let cycle = self.cycle().await?;
        transition::merge_night(&self.board, &cycle).await
    }

    pub async fn move_from_future(&self) -> Result<usize> {
        let cycle = self.cycle().await?;
        transition::move_from_future(&self.board, &cycle, self.schedule(), self.now()).await
    }

    pub async fn separate_night(&self) -> Result<usize> {
        let cycle = self.cycle().await?;
        transition::separate_night(&self.board, &cycle).await
    }

    /// The slot a card dated `date` belongs in right now.
    pub async fn locate_slot(&self, date: DateTime<Utc>) -> Result<Slot> {
        let cycle = self.cycle().await?;
        let index = self.engine.locate(&cycle, self.now(), date);
        Ok(cycle.slot(index)?.clone())
    }

    pub async fn run_job(&self, job: TimedJob) -> Result<()> {
        tracing::info!("Running timed job {:?}", job);
        match job {
            TimedJob::MergeNight => self.merge_night().await,
            TimedJob::Transition => self.rotate_day().await.map(|_| ()),
        }
    }
}
