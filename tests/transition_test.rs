mod common;

use board_cycle::domain::model::Tag;
use board_cycle::{BoardAutomator, BoardError, FixedClock, Schedule};
use common::*;

fn automator(board: InMemoryBoard) -> BoardAutomator<InMemoryBoard, FixedClock> {
    BoardAutomator::with_clock(board, FixedClock(monday_morning()), Schedule::default())
}

#[tokio::test]
async fn test_rotate_day_shifts_pulls_and_separates() {
    let board = InMemoryBoard::standard();
    board.put(1, CardBuilder::new("sat", "Saturday chores").build());
    board.put(
        TOMORROW,
        CardBuilder::new("n1", "Journal")
            .tags(&[Tag::Daily, Tag::Night])
            .build(),
    );
    board.put(
        TOMORROW,
        CardBuilder::new("b1", "Breakfast")
            .tags(&[Tag::Daily, Tag::Morning, Tag::Night])
            .build(),
    );
    // Two days out, so it belongs in the Wednesday list.
    board.put(
        FUTURE,
        CardBuilder::new("f1", "Dentist")
            .tags(&[Tag::Task])
            .due("2026-10-21T16:00:00Z")
            .build(),
    );
    board.put(FUTURE, CardBuilder::new("f2", "Someday").tags(&[Tag::Task]).build());

    let automator = automator(board);
    let report = automator.rotate_day().await.unwrap();

    assert_eq!(report.shifted_slots, 5);
    assert_eq!(report.pulled_from_future, 1);
    assert_eq!(report.separated_night, 1);

    let board = automator.board();
    assert_eq!(board.names(2), vec!["Saturday chores"]);
    assert_eq!(board.names(4), vec!["Dentist"]);
    assert_eq!(board.names(FUTURE), vec!["Someday"]);
    assert_eq!(board.names(TODAY), vec!["Breakfast"]);
    assert_eq!(board.names(TONIGHT), vec!["Journal"]);

    let shifts: Vec<String> = board
        .ops()
        .into_iter()
        .filter(|op| op.starts_with("move all"))
        .collect();
    assert_eq!(
        shifts,
        vec![
            "move all Tomorrow TODO -> Today TODO",
            "move all Wednesday TODO -> Tomorrow TODO",
            "move all Thursday TODO -> Wednesday TODO",
            "move all Friday TODO -> Thursday TODO",
            "move all Saturday TODO -> Friday TODO",
        ]
    );
}

#[tokio::test]
async fn test_rotate_day_on_broken_board_moves_nothing() {
    let board = InMemoryBoard::new(&[
        "Future TODO",
        "Tomorrow TODO",
        "Today TODO",
        "Tonight",
        "Wind Down",
        "Errands",
        "Done",
        "Routine",
    ]);
    board.put(1, CardBuilder::new("a", "Anything").build());

    let automator = automator(board);
    let result = automator.rotate_day().await;

    assert!(matches!(
        result,
        Err(BoardError::InvalidBoardStructure { .. })
    ));
    assert!(automator.board().ops().is_empty());
    assert_eq!(automator.board().names(1), vec!["Anything"]);
}

#[tokio::test]
async fn test_rewind_day_undoes_rotation() {
    let board = InMemoryBoard::standard();
    board.put(TODAY, CardBuilder::new("t", "Today card").build());
    board.put(2, CardBuilder::new("f", "Friday card").build());

    let automator = automator(board);
    assert_eq!(automator.rewind_day().await.unwrap(), 5);

    let board = automator.board();
    assert_eq!(board.names(TOMORROW), vec!["Today card"]);
    assert_eq!(board.names(1), vec!["Friday card"]);
    assert!(board.cards(TODAY).is_empty());
}

#[tokio::test]
async fn test_merge_night_folds_tonight_into_today() {
    let board = InMemoryBoard::standard();
    board.put(TODAY, CardBuilder::new("a", "Lunch").build());
    board.put(TONIGHT, CardBuilder::new("b", "Read").build());

    let automator = automator(board);
    automator.merge_night().await.unwrap();

    let board = automator.board();
    assert!(board.cards(TONIGHT).is_empty());
    assert_eq!(board.names(TODAY), vec!["Lunch", "Read"]);
}

#[tokio::test]
async fn test_move_from_future_pulls_past_due_cards_to_today() {
    let board = InMemoryBoard::standard();
    board.put(
        FUTURE,
        CardBuilder::new("late", "Overdue")
            .tags(&[Tag::Task])
            .due("2026-10-10T16:00:00Z")
            .build(),
    );
    board.put(
        FUTURE,
        CardBuilder::new("far", "Far away")
            .tags(&[Tag::Task])
            .start("2026-12-01T16:00:00Z")
            .build(),
    );

    let automator = automator(board);
    assert_eq!(automator.move_from_future().await.unwrap(), 1);
    assert_eq!(automator.board().names(TODAY), vec!["Overdue"]);
    assert_eq!(automator.board().names(FUTURE), vec!["Far away"]);
}

#[tokio::test]
async fn test_locate_slot_by_date() {
    let automator = automator(InMemoryBoard::standard());

    let slot = automator.locate_slot(utc("2026-10-20T16:00:00Z")).await.unwrap();
    assert_eq!(slot.name, "Tomorrow TODO");

    let slot = automator.locate_slot(utc("2027-01-01T16:00:00Z")).await.unwrap();
    assert_eq!(slot.name, "Future TODO");
}
