//! Search engine tests: pruning must not change the chosen action, wins
//! are taken at once, and the caller's position is never modified.

use quoridor_rust::board::{Coord, Orientation};
use quoridor_rust::movegen::{legal_actions, play};
use quoridor_rust::pathfind::distance_to_goal;
use quoridor_rust::playout::random_game;
use quoridor_rust::position::{Action, Barrier, PlayerId, PositionState};
use quoridor_rust::search::{Difficulty, SearchConfig, SearchEngine};

// =============================================================================
// Helper functions
// =============================================================================

fn position(
    p1: (usize, usize),
    p2: (usize, usize),
    barriers: Vec<Barrier>,
    to_move: PlayerId,
) -> PositionState {
    PositionState::from_parts(p1.into(), p2.into(), barriers, to_move).expect("valid position")
}

/// Nineteen horizontal barriers leaving column i as the only way through
/// most rows. Player 2 owns ten of them, player 1 owns nine, so player 1
/// has one barrier left and player 2 none.
fn ladder_barriers() -> Vec<Barrier> {
    let mut anchors = Vec::new();
    for y in [2, 4, 6, 8] {
        for x in [0, 2, 4, 6] {
            anchors.push(Coord::new(x, y));
        }
    }
    for x in [0, 2, 4] {
        anchors.push(Coord::new(x, 1));
    }
    anchors
        .into_iter()
        .enumerate()
        .map(|(i, anchor)| {
            let owner = if i < 10 { PlayerId::Two } else { PlayerId::One };
            Barrier::new(owner, anchor, Orientation::Horizontal)
        })
        .collect()
}

fn ladder_position() -> PositionState {
    position((4, 0), (4, 8), ladder_barriers(), PlayerId::One)
}

fn engine(difficulty: Difficulty, pruning: bool, max_depth: Option<u32>) -> SearchEngine {
    SearchEngine::new(SearchConfig {
        difficulty,
        pruning,
        max_depth,
    })
}

/// Search `pos` with and without pruning on fresh caches and check both
/// agree on the action and its value.
fn assert_pruning_agrees(pos: &PositionState, depth: u32) {
    let mut pruned = engine(Difficulty::Hard, true, Some(depth));
    let mut full = engine(Difficulty::Hard, false, Some(depth));

    let a = pruned.get_action(pos);
    let b = full.get_action(pos);
    assert!(a.is_some());
    assert_eq!(a, b, "depth {depth}");
    assert_eq!(
        pruned.last_stats().root_value,
        full.last_stats().root_value,
        "depth {depth}"
    );
}

// =============================================================================
// Alpha-beta equivalence
// =============================================================================

#[test]
fn test_pruning_agrees_on_opening() {
    assert_pruning_agrees(&PositionState::new(false), 2);
}

#[test]
fn test_pruning_agrees_after_random_opening() {
    let mut pos = PositionState::new(false);
    let mut rng = fastrand::Rng::with_seed(11);
    random_game(&mut pos, &mut rng, 6);
    assert_pruning_agrees(&pos, 2);
}

#[test]
fn test_pruning_agrees_on_narrow_board() {
    let pos = ladder_position();
    assert_eq!(pos.remaining(PlayerId::One), 1);
    assert_eq!(pos.remaining(PlayerId::Two), 0);
    for depth in 2..=4 {
        assert_pruning_agrees(&pos, depth);
    }
}

#[test]
fn test_pruning_cuts_nodes() {
    let pos = ladder_position();
    let mut pruned = engine(Difficulty::Hard, true, Some(4));
    let mut full = engine(Difficulty::Hard, false, Some(4));
    pruned.get_action(&pos);
    full.get_action(&pos);
    assert!(pruned.last_stats().cutoffs > 0);
    assert_eq!(full.last_stats().cutoffs, 0);
}

// =============================================================================
// Depth policy
// =============================================================================

#[test]
fn test_adaptive_depth_goes_deep_when_budgets_are_low() {
    let pos = ladder_position();
    let mut hard = engine(Difficulty::Hard, true, None);
    assert!(hard.get_action(&pos).is_some());
    assert_eq!(hard.last_stats().depth, 5);
}

// =============================================================================
// Immediate wins
// =============================================================================

#[test]
fn test_both_strategies_take_immediate_win() {
    let pos = position((3, 7), (3, 1), Vec::new(), PlayerId::One);
    for difficulty in [Difficulty::Easy, Difficulty::Hard] {
        let mut e = engine(difficulty, true, None);
        assert_eq!(e.get_action(&pos), Some(Action::Advance(Coord::new(3, 8))));
    }
}

#[test]
fn test_hop_onto_goal_row_wins() {
    let pos = position((4, 6), (4, 7), Vec::new(), PlayerId::One);
    for difficulty in [Difficulty::Easy, Difficulty::Hard] {
        let mut e = engine(difficulty, true, None);
        assert_eq!(e.get_action(&pos), Some(Action::Advance(Coord::new(4, 8))));
    }
}

#[test]
fn test_player_two_takes_immediate_win() {
    let pos = position((0, 3), (6, 1), Vec::new(), PlayerId::Two);
    let mut e = engine(Difficulty::Hard, true, Some(3));
    assert_eq!(e.get_action(&pos), Some(Action::Advance(Coord::new(6, 0))));
}

// =============================================================================
// Greedy strategy
// =============================================================================

#[test]
fn test_greedy_opens_with_barrier_on_full_budget() {
    let mut pos = PositionState::new(false);
    let e = engine(Difficulty::Easy, true, None);
    let action = e.greedy_action(&pos).unwrap();
    assert!(!action.is_advance());
    assert!(play(&mut pos, action));
    assert_eq!(distance_to_goal(&pos, PlayerId::Two), Some(9));
}

#[test]
fn test_greedy_threshold_saves_barriers() {
    // Four player-1 barriers along the west edge: budget 6, threshold 2.
    let barriers = [2, 4, 6, 8]
        .into_iter()
        .map(|y| Barrier::new(PlayerId::One, Coord::new(0, y), Orientation::Vertical))
        .collect();
    let pos = position((4, 0), (4, 8), barriers, PlayerId::One);
    assert_eq!(pos.remaining(PlayerId::One), 6);

    let e = engine(Difficulty::Easy, true, None);
    assert_eq!(e.greedy_action(&pos), Some(Action::Advance(Coord::new(4, 1))));
}

#[test]
fn test_exhausted_budget_advances() {
    let pos = position((4, 0), (4, 8), ladder_barriers(), PlayerId::Two);
    assert_eq!(pos.remaining(PlayerId::Two), 0);
    for difficulty in [Difficulty::Easy, Difficulty::Hard] {
        let mut e = engine(difficulty, true, None);
        let action = e.get_action(&pos).unwrap();
        assert!(action.is_advance(), "{difficulty:?} chose {action}");
    }
}

// =============================================================================
// Side effects
// =============================================================================

#[test]
fn test_search_leaves_position_untouched() {
    let mut pos = PositionState::new(false);
    let mut rng = fastrand::Rng::with_seed(2);
    random_game(&mut pos, &mut rng, 8);
    let before = pos.clone();

    let mut hard = engine(Difficulty::Hard, true, Some(2));
    let easy = engine(Difficulty::Easy, true, None);
    hard.get_action(&pos);
    easy.greedy_action(&pos);
    assert_eq!(pos, before);
}

#[test]
fn test_search_populates_store() {
    let pos = PositionState::new(false);
    let mut hard = engine(Difficulty::Hard, true, Some(2));
    let action = hard.get_action(&pos).unwrap();

    let key = pos.fingerprint();
    let store = hard.store();
    assert_eq!(store.optimal(&key), Some(action));
    assert_eq!(store.children(&key), Some(legal_actions(&pos).as_slice()));
    let (children, evaluations, optimal) = store.sizes();
    assert!(children > 1);
    assert!(evaluations > 1);
    assert_eq!(optimal, 1);
}

#[test]
fn test_stale_optimal_entry_is_ignored() {
    let pos = ladder_position();
    let mut hard = engine(Difficulty::Hard, true, Some(2));

    // An action that is illegal here: the anchor is already taken.
    let stale = Action::PlaceBarrier {
        anchor: Coord::new(4, 4),
        orientation: Orientation::Horizontal,
    };
    hard.store_mut().insert_optimal(pos.fingerprint(), stale);

    let action = hard.get_action(&pos).unwrap();
    assert_ne!(action, stale);
    assert!(hard.last_stats().nodes > 0);
}

#[test]
fn test_empty_root_children_fall_back_to_greedy() {
    let pos = PositionState::new(false);
    let mut hard = engine(Difficulty::Hard, true, Some(2));
    hard.store_mut().insert_children(pos.fingerprint(), Vec::new());

    let greedy = hard.greedy_action(&pos);
    assert!(greedy.is_some());
    assert_eq!(hard.get_action(&pos), greedy);
    assert_eq!(hard.last_stats().root_value, None);
    assert_eq!(hard.store().optimal(&pos.fingerprint()), None);
}
