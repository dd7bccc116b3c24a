//! Tuning tables for the automated opponent.
//!
//! Both functions are pure so they can be tuned and tested apart from the
//! search itself.

use crate::constants::{MAX_BARRIERS, MAX_SEARCH_DEPTH, MIN_SEARCH_DEPTH};

/// Minimum opponent-distance increase a barrier must buy before the greedy
/// strategy prefers it over advancing.
///
/// Grows as the budget shrinks, so early barriers are cheap and the last
/// few are saved for moves that really hurt.
pub fn wall_diff_threshold(budget: u8) -> i32 {
    match budget {
        b if b >= MAX_BARRIERS => 0,
        7.. => 1,
        3.. => 2,
        _ => 3,
    }
}

/// Search depth in plies for the deep strategy.
///
/// `remaining` holds both players' barrier budgets and `distances` both
/// players' current distance to goal. Few barriers left means a narrow
/// tree that can be searched deeper; a token close to its goal means the
/// race is about to be decided.
pub fn search_depth(remaining: [u8; 2], distances: [u32; 2]) -> u32 {
    let total = remaining[0] as u32 + remaining[1] as u32;
    let closest = distances[0].min(distances[1]);

    if total <= 2 {
        MAX_SEARCH_DEPTH
    } else if total <= 6 || closest <= 2 {
        MIN_SEARCH_DEPTH + 1
    } else {
        MIN_SEARCH_DEPTH
    }
}
