use crate::core::checklist::trailing_incomplete;
use crate::core::cycle::BoardCycle;
use crate::domain::model::{Card, Checklist, ResolvedAction};
use crate::domain::ports::BoardRepository;
use crate::utils::error::{BoardError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub completed_items: usize,
    pub moves: usize,
    pub date_updates: usize,
    pub clones: Vec<String>,
}

/// Applies resolved actions to the board in the order they were emitted.
pub struct ActionExecutor<'a, R: ?Sized> {
    board: &'a R,
    cycle: &'a BoardCycle,
}

impl<'a, R: BoardRepository + ?Sized> ActionExecutor<'a, R> {
    pub fn new(board: &'a R, cycle: &'a BoardCycle) -> Self {
        Self { board, cycle }
    }

    pub async fn apply(&self, card: &Card, actions: &[ResolvedAction]) -> Result<ApplySummary> {
        if let Some(ResolvedAction::Reject { reason }) = actions
            .iter()
            .find(|action| matches!(action, ResolvedAction::Reject { .. }))
        {
            tracing::warn!("Rejected card {}: {}", card.name, reason);
            return Err(BoardError::UnhandledTagCombination {
                card: card.name.clone(),
            });
        }

        let mut summary = ApplySummary::default();

        for action in actions {
            match action {
                ResolvedAction::CompleteItem { item, .. } => {
                    tracing::debug!("Completing item {} in card {}", item.name, card.name);
                    self.board.complete_check_item(card, item).await?;
                    summary.completed_items += 1;
                }
                ResolvedAction::MoveCard { target, position } => {
                    let slot = self.cycle.slot(*target)?;
                    tracing::debug!("Moving card {} to {}", card.name, slot.name);
                    self.board.move_card(card, slot, *position).await?;
                    summary.moves += 1;
                }
                ResolvedAction::UpdateCardDates { dates, target } => {
                    let slot = target.map(|index| self.cycle.slot(index)).transpose()?;
                    self.board.update_card_dates(card, dates, slot).await?;
                    summary.date_updates += 1;
                }
                ResolvedAction::CloneCard {
                    dates,
                    target,
                    kind,
                    complete_items,
                } => {
                    let slot = self.cycle.slot(*target)?;
                    let clone = self.board.clone_card(card, dates, slot, *kind).await?;
                    tracing::debug!("Cloned card {} into {} as {}", card.name, slot.name, clone.id);

                    if *complete_items {
                        // The create response carries no checklists.
                        let mut fresh = self.board.card(&clone.id).await?;
                        fresh.checklists.iter_mut().for_each(Checklist::sort_items);
                        for checklist in &fresh.checklists {
                            for item in trailing_incomplete(checklist) {
                                self.board.complete_check_item(&fresh, &item).await?;
                                summary.completed_items += 1;
                            }
                        }
                    }
                    summary.clones.push(clone.id);
                }
                // Checked before anything ran.
                ResolvedAction::Reject { .. } => {}
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cycle::fixtures::standard_cycle;
    use crate::domain::model::{CardDates, CheckItem, CloneKind, ItemState, ListPosition, Slot, TagSet};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBoard {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingBoard {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BoardRepository for RecordingBoard {
        async fn list_slots(&self) -> Result<Vec<Slot>> {
            Ok(Vec::new())
        }
        async fn cards_in(&self, _slot: &Slot) -> Result<Vec<Card>> {
            Ok(Vec::new())
        }
        async fn card(&self, card_id: &str) -> Result<Card> {
            self.record(format!("fetch {}", card_id));
            let mut fresh = card("clone");
            fresh.checklists = vec![Checklist {
                id: "cl".to_string(),
                name: "Days".to_string(),
                items: vec![item("b", 2.0), item("a", 1.0)],
            }];
            Ok(fresh)
        }
        async fn move_card(&self, card: &Card, target: &Slot, position: ListPosition) -> Result<()> {
            self.record(format!("move {} {} {}", card.id, target.name, position.as_str()));
            Ok(())
        }
        async fn clone_card(
            &self,
            template: &Card,
            _dates: &CardDates,
            target: &Slot,
            _kind: CloneKind,
        ) -> Result<Card> {
            self.record(format!("clone {} {}", template.id, target.name));
            Ok(card("clone"))
        }
        async fn update_card_dates(
            &self,
            card: &Card,
            _dates: &CardDates,
            target: Option<&Slot>,
        ) -> Result<()> {
            self.record(format!("dates {} {:?}", card.id, target.map(|s| s.name.as_str())));
            Ok(())
        }
        async fn complete_check_item(&self, card: &Card, item: &CheckItem) -> Result<()> {
            self.record(format!("complete {} {}", card.id, item.id));
            Ok(())
        }
        async fn move_all_cards(&self, _from: &Slot, _to: &Slot) -> Result<()> {
            Ok(())
        }
    }

    fn card(id: &str) -> Card {
        Card {
            id: id.to_string(),
            name: id.to_string(),
            dates: CardDates::default(),
            due_complete: true,
            tags: TagSet::empty(),
            checklists: Vec::new(),
            unrecognized_labels: Vec::new(),
        }
    }

    fn item(id: &str, pos: f64) -> CheckItem {
        CheckItem {
            id: id.to_string(),
            name: id.to_string(),
            state: ItemState::Incomplete,
            pos,
        }
    }

    #[test]
    fn test_actions_run_in_emission_order() {
        let board = RecordingBoard::default();
        let cycle = standard_cycle();
        let actions = vec![
            ResolvedAction::CompleteItem {
                checklist_id: "cl".to_string(),
                item: item("x", 1.0),
            },
            ResolvedAction::MoveCard {
                target: cycle.routine(),
                position: ListPosition::Top,
            },
            ResolvedAction::CloneCard {
                dates: CardDates::default(),
                target: cycle.wind_down(),
                kind: CloneKind::Full,
                complete_items: true,
            },
        ];

        let summary = tokio_test::block_on(ActionExecutor::new(&board, &cycle).apply(&card("c1"), &actions))
            .unwrap();

        assert_eq!(
            board.calls(),
            vec![
                "complete c1 x",
                "move c1 Routine top",
                "clone c1 Wind Down",
                "fetch clone",
                "complete clone a",
                "complete clone b",
            ]
        );
        assert_eq!(summary.completed_items, 3);
        assert_eq!(summary.clones, vec!["clone".to_string()]);
    }

    #[test]
    fn test_reject_stops_before_any_write() {
        let board = RecordingBoard::default();
        let cycle = standard_cycle();
        let actions = vec![
            ResolvedAction::MoveCard {
                target: cycle.done(),
                position: ListPosition::Top,
            },
            ResolvedAction::Reject {
                reason: "no tags".to_string(),
            },
        ];

        let result = tokio_test::block_on(ActionExecutor::new(&board, &cycle).apply(&card("c1"), &actions));

        assert!(matches!(
            result,
            Err(BoardError::UnhandledTagCombination { .. })
        ));
        assert!(board.calls().is_empty());
    }
}
