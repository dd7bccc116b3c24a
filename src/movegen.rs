//! Legal move generation.
//!
//! - Token advances, including straight and diagonal hops over the opponent
//! - Barrier placements, filtered by budget, the conflict rule, and the
//!   rule that neither token may be cut off from its goal row
//! - [`play`], the checked entry point for drivers

use crate::board::{Coord, Direction, Orientation, anchor_in_range};
use crate::pathfind::{goal_reachable, rank_squares_by_distance};
use crate::position::{Action, Barrier, PlayerId, PositionState};

/// Cells `player`'s token may move to.
///
/// An adjacent open cell is a destination unless the opponent stands on
/// it. In that case the token may hop straight over; if the straight hop is
/// off the board or walled, it may step to either side of the opponent
/// instead.
pub fn legal_advances(state: &PositionState, player: PlayerId) -> Vec<Coord> {
    let edges = state.edges();
    let me = state.token(player).pos;
    let opp = state.token(player.other()).pos;
    let mut moves = Vec::with_capacity(5);

    for dir in Direction::ALL {
        let Some(next) = edges.open_step(me, dir) else {
            continue;
        };
        if next != opp {
            moves.push(next);
            continue;
        }

        if let Some(far) = edges.open_step(opp, dir) {
            moves.push(far);
        } else {
            for side in dir.sideways() {
                if let Some(diag) = edges.open_step(opp, side) {
                    moves.push(diag);
                }
            }
        }
    }

    moves
}

/// Whether `barrier` conflicts with any barrier already on the board.
pub fn conflicts_with_any(state: &PositionState, barrier: &Barrier) -> bool {
    state.barriers().any(|b| b.conflicts_with(barrier))
}

/// Full legality check for placing `barrier` on behalf of its owner.
///
/// `state` is mutated provisionally to test reachability and restored
/// before returning.
pub fn is_barrier_legal(state: &mut PositionState, barrier: Barrier) -> bool {
    if !anchor_in_range(barrier.anchor) || state.remaining(barrier.owner) == 0 {
        return false;
    }
    if conflicts_with_any(state, &barrier) {
        return false;
    }
    if !state.apply_barrier_provisional(barrier) {
        return false;
    }
    let open = PlayerId::BOTH.into_iter().all(|p| goal_reachable(state, p));
    state.remove_barrier_provisional(&barrier);
    open
}

/// Legal barrier placements for `player`, working on `state` in place.
///
/// Candidates are generated anchor by anchor in order of the anchor cell's
/// distance from the opponent's token, so barriers near the opponent come
/// first. `state` is left unchanged.
pub fn legal_barriers_in(state: &mut PositionState, player: PlayerId) -> Vec<Barrier> {
    if state.remaining(player) == 0 {
        return Vec::new();
    }

    let ranked = rank_squares_by_distance(state, player.other());
    let mut barriers = Vec::new();
    for anchor in ranked {
        if !anchor_in_range(anchor) {
            continue;
        }
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let barrier = Barrier::new(player, anchor, orientation);
            if is_barrier_legal(state, barrier) {
                barriers.push(barrier);
            }
        }
    }
    barriers
}

/// Legal barrier placements for `player`. See [`legal_barriers_in`].
pub fn legal_barriers(state: &PositionState, player: PlayerId) -> Vec<Barrier> {
    let mut work = state.clone();
    legal_barriers_in(&mut work, player)
}

/// Every legal action for the side to move: advances first, then barriers
/// nearest the opponent first.
pub fn legal_actions_in(state: &mut PositionState) -> Vec<Action> {
    let player = state.current_player();
    let mut actions: Vec<Action> = legal_advances(state, player)
        .into_iter()
        .map(Action::Advance)
        .collect();
    actions.extend(
        legal_barriers_in(state, player)
            .into_iter()
            .map(|b| Action::PlaceBarrier {
                anchor: b.anchor,
                orientation: b.orientation,
            }),
    );
    actions
}

/// Every legal action for the side to move. See [`legal_actions_in`].
pub fn legal_actions(state: &PositionState) -> Vec<Action> {
    let mut work = state.clone();
    legal_actions_in(&mut work)
}

/// Whether `action` is legal for the side to move.
pub fn is_legal(state: &mut PositionState, action: Action) -> bool {
    if state.is_over() {
        return false;
    }
    let player = state.current_player();
    match action {
        Action::Advance(to) => legal_advances(state, player).contains(&to),
        Action::PlaceBarrier {
            anchor,
            orientation,
        } => is_barrier_legal(state, Barrier::new(player, anchor, orientation)),
    }
}

/// Validate and apply `action` for the side to move, then pass the turn.
///
/// Returns `false` and leaves `state` untouched if the action is illegal.
pub fn play(state: &mut PositionState, action: Action) -> bool {
    if !is_legal(state, action) {
        return false;
    }
    state.apply_action(action);
    true
}
