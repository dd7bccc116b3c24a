//! Random and engine-driven game simulation.
//!
//! Random playouts pick uniformly among legal actions and are used to
//! generate varied openings and to exercise the move rules in tests.
//! Self-play games let the search engine play both sides from such an
//! opening and warm the transposition cache along the way.

use log::{debug, info};

use crate::movegen::{legal_actions, play};
use crate::position::{Action, PlayerId, PositionState};
use crate::search::SearchEngine;

/// Play up to `max_plies` uniformly random legal actions on `state`.
///
/// Stops early when the game is won or the side to move is stuck.
/// Returns the actions played, in order.
pub fn random_game(state: &mut PositionState, rng: &mut fastrand::Rng, max_plies: usize) -> Vec<Action> {
    let mut played = Vec::new();
    while played.len() < max_plies && !state.is_over() {
        let Some(action) = choose_random_action(state, rng) else {
            break;
        };
        if !play(state, action) {
            break;
        }
        played.push(action);
    }
    played
}

/// A uniformly random legal action for the side to move.
pub fn choose_random_action(state: &PositionState, rng: &mut fastrand::Rng) -> Option<Action> {
    let actions = legal_actions(state);
    if actions.is_empty() {
        return None;
    }
    Some(actions[rng.usize(..actions.len())])
}

/// Outcome of one self-play game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub actions: Vec<Action>,
    pub winner: Option<PlayerId>,
    /// How many of `actions` came from the random opening.
    pub opening_plies: usize,
}

/// Play one game with `engine` moving for both sides after
/// `opening_plies` random actions. Gives up after `max_plies` in total.
pub fn self_play(
    engine: &mut SearchEngine,
    rng: &mut fastrand::Rng,
    opening_plies: usize,
    max_plies: usize,
) -> GameRecord {
    let mut state = PositionState::new(false);
    let mut actions = random_game(&mut state, rng, opening_plies.min(max_plies));
    let opening = actions.len();

    while actions.len() < max_plies && !state.is_over() {
        let Some(action) = engine.get_action(&state) else {
            break;
        };
        if !play(&mut state, action) {
            // Engine answers come from the legal move list, so this means a
            // stale cache entry slipped through.
            debug!("engine proposed illegal action {action}; stopping game");
            break;
        }
        actions.push(action);
    }

    let winner = state.winner();
    info!(
        "self-play game finished after {} plies, winner: {}",
        actions.len(),
        winner.map_or_else(|| "none".to_string(), |p| p.to_string())
    );

    GameRecord {
        actions,
        winner,
        opening_plies: opening,
    }
}
