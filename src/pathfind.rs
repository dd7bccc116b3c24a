//! Breadth-first shortest paths under the current barrier set.
//!
//! Tokens are ignored here: another token never blocks a path, it only
//! changes how the first steps are taken (see [`crate::movegen`]).
//! Every edge has unit weight, so a plain BFS gives exact distances.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use crate::board::{Coord, Direction};
use crate::constants::{CELLS, N};
use crate::position::{PlayerId, PositionState};

/// BFS distance from `start` to every cell; `None` for unreachable cells.
pub fn distance_map(state: &PositionState, start: Coord) -> [Option<u32>; CELLS] {
    let mut dist = [None; CELLS];
    let mut queue = VecDeque::with_capacity(CELLS);
    let edges = state.edges();

    dist[start.idx()] = Some(0);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        let d = dist[cell.idx()].unwrap_or(0);
        for dir in Direction::ALL {
            if let Some(next) = edges.open_step(cell, dir) {
                let slot = &mut dist[next.idx()];
                if slot.is_none() {
                    *slot = Some(d + 1);
                    queue.push_back(next);
                }
            }
        }
    }

    dist
}

/// Shortest number of steps from `player`'s token to any cell of its goal
/// row, or `None` if the goal row has been walled off.
pub fn distance_to_goal(state: &PositionState, player: PlayerId) -> Option<u32> {
    let token = state.token(player);
    if token.at_goal() {
        return Some(0);
    }

    let goal = token.goal_row;
    let mut seen = [false; CELLS];
    let mut queue = VecDeque::with_capacity(CELLS);
    let edges = state.edges();

    seen[token.pos.idx()] = true;
    queue.push_back((token.pos, 0u32));

    // BFS reaches cells in nondecreasing distance, so the first goal cell
    // popped is the nearest.
    while let Some((cell, d)) = queue.pop_front() {
        for dir in Direction::ALL {
            if let Some(next) = edges.open_step(cell, dir) {
                if seen[next.idx()] {
                    continue;
                }
                if next.y == goal {
                    return Some(d + 1);
                }
                seen[next.idx()] = true;
                queue.push_back((next, d + 1));
            }
        }
    }

    None
}

/// Whether `player` can still reach its goal row.
#[inline]
pub fn goal_reachable(state: &PositionState, player: PlayerId) -> bool {
    distance_to_goal(state, player).is_some()
}

/// Every cell of the board, nearest to `player`'s token first.
///
/// Unreachable cells come last. Ties are broken by cell index so the order
/// is deterministic.
pub fn rank_squares_by_distance(state: &PositionState, player: PlayerId) -> Vec<Coord> {
    let dist = distance_map(state, state.token(player).pos);

    let mut heap: BinaryHeap<Reverse<(u32, usize)>> = dist
        .iter()
        .enumerate()
        .map(|(i, d)| Reverse((d.unwrap_or(u32::MAX), i)))
        .collect();

    let mut ranked = Vec::with_capacity(N * N);
    while let Some(Reverse((_, i))) = heap.pop() {
        ranked.push(Coord::from_idx(i));
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Orientation;
    use crate::position::Barrier;

    #[test]
    fn test_empty_board_distance_is_eight() {
        let pos = PositionState::new(false);
        assert_eq!(distance_to_goal(&pos, PlayerId::One), Some(8));
        assert_eq!(distance_to_goal(&pos, PlayerId::Two), Some(8));
    }

    #[test]
    fn test_distance_at_goal_is_zero() {
        let none: [Barrier; 0] = [];
        let pos =
            PositionState::from_parts(Coord::new(2, 8), Coord::new(6, 3), none, PlayerId::One)
                .unwrap();
        assert_eq!(distance_to_goal(&pos, PlayerId::One), Some(0));
        assert_eq!(distance_to_goal(&pos, PlayerId::Two), Some(3));
    }

    #[test]
    fn test_barrier_forces_detour() {
        let mut pos = PositionState::new(false);
        // Wall in front of player 1 covering columns 3..=6.
        pos.apply_barrier(Barrier::new(PlayerId::Two, Coord::new(3, 1), Orientation::Horizontal));
        pos.apply_barrier(Barrier::new(PlayerId::Two, Coord::new(5, 1), Orientation::Horizontal));
        // Column 4 and its neighbours are closed; nearest gap is column 2 or 7.
        assert_eq!(distance_to_goal(&pos, PlayerId::One), Some(10));
    }

    #[test]
    fn test_boxed_token_is_unreachable() {
        // Unchecked primitives: the horizontal barrier crosses one of the
        // verticals, which move generation would never allow.
        let mut boxed = PositionState::new(false);
        for (x, orientation) in [
            (3, Orientation::Vertical),
            (4, Orientation::Vertical),
            (4, Orientation::Horizontal),
        ] {
            boxed.apply_barrier_provisional(Barrier::new(
                PlayerId::Two,
                Coord::new(x, 1),
                orientation,
            ));
        }
        assert_eq!(distance_to_goal(&boxed, PlayerId::One), None);
        assert!(!goal_reachable(&boxed, PlayerId::One));
        assert!(goal_reachable(&boxed, PlayerId::Two));
    }

    #[test]
    fn test_distance_map_matches_distance_to_goal() {
        let mut pos = PositionState::new(false);
        pos.apply_barrier(Barrier::new(PlayerId::One, Coord::new(4, 5), Orientation::Horizontal));
        let map = distance_map(&pos, pos.token(PlayerId::Two).pos);
        let best = (0..N)
            .filter_map(|x| map[Coord::new(x, 0).idx()])
            .min();
        assert_eq!(best, distance_to_goal(&pos, PlayerId::Two));
    }

    #[test]
    fn test_rank_squares_returns_every_cell_once() {
        let pos = PositionState::new(false);
        let ranked = rank_squares_by_distance(&pos, PlayerId::One);
        assert_eq!(ranked.len(), CELLS);
        assert_eq!(ranked[0], Coord::new(4, 0));

        let mut seen = [false; CELLS];
        for c in &ranked {
            assert!(!seen[c.idx()], "cell {c} ranked twice");
            seen[c.idx()] = true;
        }

        let dist = distance_map(&pos, Coord::new(4, 0));
        for pair in ranked.windows(2) {
            assert!(dist[pair[0].idx()] <= dist[pair[1].idx()]);
        }
    }
}
