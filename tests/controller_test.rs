//! Tests for the game controller state machine.

use noughts::{
    AiError, AiMoveProvider, Board, ControllerState, Coord, Difficulty, Direction, EventKind,
    GameController, GameError, GameMode, LlmError, Mark, MoveOracle, MoveRequest, Outcome,
};
use std::sync::Arc;
use std::time::Duration;

/// Always points at the top-left cell.
struct TopLeftOracle;

#[async_trait::async_trait]
impl MoveOracle for TopLeftOracle {
    async fn propose(&self, _request: &MoveRequest) -> Result<String, LlmError> {
        Ok(r#"{"row": 0, "col": 0}"#.to_string())
    }

    fn name(&self) -> &str {
        "top-left"
    }
}

fn two_player() -> GameController {
    let mut controller = GameController::new(None);
    controller.set_mode(GameMode::TwoPlayer);
    controller.new_game().unwrap();
    controller
}

fn vs_local_ai(difficulty: Difficulty) -> GameController {
    let provider = AiMoveProvider::local().with_seed(42);
    let mut controller = GameController::new(Some(provider)).with_ai_delay(Duration::ZERO);
    controller.set_mode(GameMode::VsAi);
    controller.set_difficulty(difficulty);
    controller.new_game().unwrap();
    controller
}

fn board(controller: &GameController) -> Board {
    *controller.session().unwrap().board()
}

#[test]
fn test_two_player_top_row_win() {
    let mut controller = two_player();
    assert_eq!(controller.state(), ControllerState::AwaitingMove(Mark::X));

    for (row, col) in [(0, 0), (1, 1), (0, 1), (1, 0), (0, 2)] {
        assert!(controller.submit_move(row, col));
    }

    match controller.state() {
        ControllerState::Terminal(Outcome::Win(info)) => {
            assert_eq!(info.winner, Mark::X);
            assert_eq!(info.direction, Direction::Horizontal);
            assert_eq!(
                info.line,
                [
                    Coord { row: 0, col: 0 },
                    Coord { row: 0, col: 1 },
                    Coord { row: 0, col: 2 }
                ]
            );
        }
        other => panic!("expected a win, got {:?}", other),
    }
    let snapshot = controller.snapshot();
    assert!(!snapshot.active);
    assert_eq!(snapshot.status, "Player X wins!");
    assert_eq!(snapshot.winning_info.map(|i| i.winner), Some(Mark::X));
}

#[test]
fn test_two_player_draw() {
    let mut controller = two_player();
    for (row, col) in [
        (0, 0),
        (0, 1),
        (0, 2),
        (1, 1),
        (1, 0),
        (1, 2),
        (2, 1),
        (2, 0),
        (2, 2),
    ] {
        assert!(controller.submit_move(row, col));
    }
    assert_eq!(controller.state(), ControllerState::Terminal(Outcome::Draw));
    assert_eq!(controller.status(), "It's a draw!");
}

#[test]
fn test_turns_alternate() {
    let mut controller = two_player();
    controller.submit_move(2, 2);
    assert_eq!(controller.state(), ControllerState::AwaitingMove(Mark::O));
    assert_eq!(controller.status(), "Player O's turn");
}

#[test]
fn test_moves_ignored_before_first_game() {
    let mut controller = GameController::new(None);
    assert_eq!(controller.state(), ControllerState::Idle);
    assert!(!controller.submit_move(0, 0));
    assert_eq!(controller.state(), ControllerState::Idle);
    assert_eq!(controller.status(), "Start a new game!");
}

#[test]
fn test_invalid_moves_are_silent_no_ops() {
    let mut controller = two_player();
    controller.submit_move(1, 1);
    let before = board(&controller);

    assert!(!controller.submit_move(1, 1));
    assert!(!controller.submit_move(3, 0));
    assert_eq!(board(&controller), before);
    assert_eq!(controller.state(), ControllerState::AwaitingMove(Mark::O));
}

#[test]
fn test_moves_ignored_after_terminal() {
    let mut controller = two_player();
    for (row, col) in [(0, 0), (1, 1), (0, 1), (1, 0), (0, 2)] {
        controller.submit_move(row, col);
    }
    let before = board(&controller);
    assert!(!controller.submit_move(2, 2));
    assert_eq!(board(&controller), before);
}

#[test]
fn test_vs_ai_without_provider_is_configuration_error() {
    let mut controller = GameController::new(None);
    controller.set_mode(GameMode::VsAi);
    assert!(matches!(
        controller.new_game(),
        Err(GameError::ConfigurationMissing(_))
    ));
    assert_eq!(controller.state(), ControllerState::Idle);
    assert!(controller.session().is_none());
}

#[test]
fn test_human_move_ignored_during_ai_turn() {
    let mut controller = vs_local_ai(Difficulty::Hard);
    assert!(controller.submit_move(1, 1));
    assert_eq!(controller.state(), ControllerState::AwaitingAiMove);

    let before = board(&controller);
    assert!(!controller.submit_move(0, 0));
    assert_eq!(board(&controller), before);
    assert_eq!(controller.state(), ControllerState::AwaitingAiMove);
}

#[tokio::test]
async fn test_ai_turn_returns_control_to_human() {
    let mut controller = vs_local_ai(Difficulty::Hard);
    controller.submit_move(1, 1);
    assert!(controller.play_ai_turn().await);

    assert_eq!(controller.state(), ControllerState::AwaitingMove(Mark::X));
    assert_eq!(board(&controller).mark_count(), 2);
    assert_eq!(controller.status(), "Player X's turn");
}

#[tokio::test]
async fn test_play_ai_turn_is_noop_on_human_turn() {
    let mut controller = vs_local_ai(Difficulty::Easy);
    assert!(!controller.play_ai_turn().await);
    assert_eq!(board(&controller), Board::empty());
}

#[tokio::test]
async fn test_hard_ai_never_loses_to_scripted_human() {
    let mut controller = vs_local_ai(Difficulty::Hard);
    // Human tries corners, then anything still open.
    let preferences = [(0, 0), (2, 2), (0, 2), (2, 0), (1, 1), (0, 1), (1, 0), (1, 2), (2, 1)];
    while let ControllerState::AwaitingMove(_) = controller.state() {
        let open = board(&controller);
        let (row, col) = preferences
            .iter()
            .copied()
            .find(|&(r, c)| open.is_empty_at(r, c))
            .unwrap();
        controller.submit_move(row, col);
        if controller.state() == ControllerState::AwaitingAiMove {
            controller.play_ai_turn().await;
        }
    }
    match controller.state() {
        ControllerState::Terminal(Outcome::Win(info)) => assert_eq!(info.winner, Mark::O),
        ControllerState::Terminal(Outcome::Draw) => {}
        other => panic!("unexpected state {:?}", other),
    }
}

#[tokio::test]
async fn test_occupied_remote_reply_never_overwrites() {
    let provider = AiMoveProvider::remote(Arc::new(TopLeftOracle)).with_seed(5);
    let mut controller = GameController::new(Some(provider)).with_ai_delay(Duration::ZERO);
    controller.new_game().unwrap();

    controller.submit_move(0, 0);
    assert!(controller.play_ai_turn().await);

    let board = board(&controller);
    assert_eq!(board.get(0, 0), Some(Mark::X));
    assert_eq!(board.mark_count(), 2);
    assert_eq!(controller.state(), ControllerState::AwaitingMove(Mark::X));
}

#[test]
fn test_stale_ai_result_is_discarded() {
    let mut controller = vs_local_ai(Difficulty::Easy);
    controller.submit_move(1, 1);
    let turn = controller.begin_ai_turn().unwrap();

    controller.new_game().unwrap();
    assert!(!controller.complete_ai_turn(&turn, Ok(Coord { row: 0, col: 0 })));
    assert_eq!(board(&controller), Board::empty());
    assert_eq!(controller.state(), ControllerState::AwaitingMove(Mark::X));
}

#[test]
fn test_stale_ai_result_discarded_even_when_state_matches() {
    let mut controller = vs_local_ai(Difficulty::Easy);
    controller.submit_move(1, 1);
    let stale = controller.begin_ai_turn().unwrap();

    controller.new_game().unwrap();
    controller.submit_move(2, 2);
    assert_eq!(controller.state(), ControllerState::AwaitingAiMove);

    assert!(!controller.complete_ai_turn(&stale, Ok(Coord { row: 0, col: 0 })));
    assert_eq!(board(&controller).mark_count(), 1);
    assert_eq!(controller.state(), ControllerState::AwaitingAiMove);
}

#[test]
fn test_no_available_moves_hands_turn_back() {
    let mut controller = vs_local_ai(Difficulty::Easy);
    let mut events = controller.subscribe();
    controller.submit_move(1, 1);
    let turn = controller.begin_ai_turn().unwrap();

    assert!(!controller.complete_ai_turn(&turn, Err(AiError::NoAvailableMoves)));
    assert_eq!(controller.state(), ControllerState::AwaitingMove(Mark::X));
    assert_eq!(controller.status(), "AI error. Your turn!");

    let kinds: Vec<EventKind> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|e| e.kind)
        .collect();
    assert!(matches!(kinds.last(), Some(EventKind::AiError(_))));
}

#[test]
fn test_events_follow_transitions() {
    let mut controller = GameController::new(None);
    controller.set_mode(GameMode::TwoPlayer);
    let mut events = controller.subscribe();

    controller.new_game().unwrap();
    for (row, col) in [(0, 0), (1, 1), (0, 1), (1, 0), (0, 2)] {
        controller.submit_move(row, col);
    }
    controller.submit_move(2, 2);

    let received: Vec<_> = std::iter::from_fn(|| events.try_recv().ok()).collect();
    assert_eq!(received.len(), 7);
    assert_eq!(received[0].kind, EventKind::NewGame);
    assert_eq!(
        received[1].kind,
        EventKind::MoveAccepted {
            mark: Mark::X,
            coord: Coord { row: 0, col: 0 }
        }
    );
    assert_eq!(received[1].snapshot.board.mark_count(), 1);
    assert!(matches!(received[6].kind, EventKind::Won(info) if info.winner == Mark::X));
    assert!(!received[6].snapshot.active);
}

#[test]
fn test_new_game_resets_after_terminal() {
    let mut controller = two_player();
    for (row, col) in [(0, 0), (1, 1), (0, 1), (1, 0), (0, 2)] {
        controller.submit_move(row, col);
    }
    let first_id = controller.session().unwrap().id();

    controller.new_game().unwrap();
    let session = controller.session().unwrap();
    assert_ne!(session.id(), first_id);
    assert_eq!(session.board(), &Board::empty());
    assert!(session.winning_info().is_none());
    assert_eq!(controller.state(), ControllerState::AwaitingMove(Mark::X));
}

#[tokio::test]
async fn test_ai_opens_when_it_plays_x() {
    let provider = AiMoveProvider::local();
    let mut controller = GameController::new(Some(provider))
        .with_ai_delay(Duration::ZERO)
        .with_ai_mark(Mark::X);
    controller.set_difficulty(Difficulty::Easy);
    controller.new_game().unwrap();
    assert_eq!(controller.state(), ControllerState::AwaitingAiMove);
    assert!(!controller.submit_move(1, 1));

    assert!(controller.play_ai_turn().await);
    assert_eq!(controller.state(), ControllerState::AwaitingMove(Mark::O));
}
