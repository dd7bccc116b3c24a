//! Move selection for the automated opponent.
//!
//! Two strategies, picked by [`Difficulty`]:
//! - **Easy**: one-ply greedy lookahead comparing the best advance against
//!   the best barrier, throttled by [`wall_diff_threshold`]
//! - **Hard**: depth-limited minimax with alpha-beta pruning over
//!   [`legal_actions_in`], scored by the path-length differential and
//!   memoised in a [`TranspositionStore`]
//!
//! The recursive search mutates a single working [`PositionState`] and
//! reverts every action with its [`Undo`](crate::position::Undo) record, so
//! the caller's state is never touched.

use std::collections::HashMap;

use log::{debug, warn};

use crate::board::Coord;
use crate::constants::{UNREACHABLE_PENALTY, WIN_SCORE};
use crate::movegen::{is_legal, legal_actions_in, legal_advances, legal_barriers_in};
use crate::pathfind::distance_to_goal;
use crate::policy::{search_depth, wall_diff_threshold};
use crate::position::{Action, Barrier, Fingerprint, PlayerId, PositionState};
use crate::store::TranspositionStore;

/// Strength of the automated opponent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    #[default]
    Hard,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub difficulty: Difficulty,
    /// Alpha-beta cutoffs. Turning this off gives plain minimax with the
    /// same move choice, only slower.
    pub pruning: bool,
    /// Fixed depth in plies instead of the adaptive [`search_depth`] policy.
    pub max_depth: Option<u32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Hard,
            pruning: true,
            max_depth: None,
        }
    }
}

/// Counters from the most recent deep search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub depth: u32,
    pub nodes: u64,
    pub leaves: u64,
    pub cutoffs: u64,
    pub transpositions: u64,
    /// Minimax value of the chosen action from the mover's point of view.
    pub root_value: Option<i32>,
}

/// Static score of a position from player 1's point of view:
/// `distance(player 2) - distance(player 1)`, plus or minus [`WIN_SCORE`]
/// once a token stands on its goal row.
pub fn static_evaluation(state: &PositionState) -> i32 {
    let d1 = distance_score(state, PlayerId::One);
    let d2 = distance_score(state, PlayerId::Two);
    let base = d2 - d1;
    match state.winner() {
        Some(PlayerId::One) => base + WIN_SCORE,
        Some(PlayerId::Two) => base - WIN_SCORE,
        None => base,
    }
}

fn distance_score(state: &PositionState, player: PlayerId) -> i32 {
    distance_to_goal(state, player).map_or(UNREACHABLE_PENALTY, |d| d as i32)
}

fn barrier_action(b: Barrier) -> Action {
    Action::PlaceBarrier {
        anchor: b.anchor,
        orientation: b.orientation,
    }
}

/// The automated opponent.
pub struct SearchEngine {
    config: SearchConfig,
    store: TranspositionStore,
    stats: SearchStats,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl SearchEngine {
    /// Create an engine with an empty transposition cache.
    pub fn new(config: SearchConfig) -> Self {
        Self::with_store(config, TranspositionStore::new())
    }

    /// Create an engine around a cache loaded by the caller.
    pub fn with_store(config: SearchConfig, store: TranspositionStore) -> Self {
        Self {
            config,
            store,
            stats: SearchStats::default(),
        }
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Switch strategy for subsequent calls. The cache is kept.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
    }

    /// The transposition cache, e.g. for saving between runs.
    pub fn store(&self) -> &TranspositionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TranspositionStore {
        &mut self.store
    }

    /// Consume the engine and hand back its cache for saving.
    pub fn into_store(self) -> TranspositionStore {
        self.store
    }

    /// Counters from the most recent [`deep_action`](Self::deep_action);
    /// all zero after a root cache hit.
    pub fn last_stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Pick an action for the side to move.
    ///
    /// Returns `None` when the game is over or the side to move has no
    /// legal action at all.
    pub fn get_action(&mut self, state: &PositionState) -> Option<Action> {
        if state.is_over() {
            return None;
        }
        match self.config.difficulty {
            Difficulty::Easy => self.greedy_action(state),
            Difficulty::Hard => self.deep_action(state),
        }
    }

    /// One-ply greedy choice between the best advance and the best barrier.
    pub fn greedy_action(&self, state: &PositionState) -> Option<Action> {
        greedy(state, true)
    }

    /// Adaptive-depth alpha-beta search.
    pub fn deep_action(&mut self, state: &PositionState) -> Option<Action> {
        let me = state.current_player();
        self.stats = SearchStats::default();

        if state.remaining(me) == 0 {
            return greedy(state, false);
        }
        if let Some(win) = winning_advance(state, me) {
            return Some(Action::Advance(win));
        }

        let key = state.fingerprint();
        if let Some(cached) = self.store.optimal(&key) {
            if is_legal(&mut state.clone(), cached) {
                debug!("root-optimal cache hit: {cached}");
                return Some(cached);
            }
        }

        let depth = self.depth_for(state);
        self.stats.depth = depth;

        let mut work = state.clone();
        let children = self.children_of(&mut work, &key);
        let mut visited = HashMap::new();
        let mut alpha = i32::MIN;
        let beta = i32::MAX;
        let mut best: Option<(Action, i32)> = None;

        for action in children {
            let mut child = state.clone();
            child.apply_action(action);
            let value = self.minimax(&mut child, depth - 1, alpha, beta, false, me, &mut visited);
            if best.is_none_or(|(_, v)| value > v) {
                best = Some((action, value));
            }
            alpha = alpha.max(value);
        }

        debug!(
            "deep search depth {} visited {} nodes ({} leaves, {} cutoffs, {} transpositions)",
            self.stats.depth,
            self.stats.nodes,
            self.stats.leaves,
            self.stats.cutoffs,
            self.stats.transpositions
        );

        match best {
            Some((action, value)) => {
                self.stats.root_value = Some(value);
                self.store.insert_optimal(key, action);
                Some(action)
            }
            None => {
                warn!("deep search produced no action; falling back to the greedy strategy");
                self.greedy_action(state)
            }
        }
    }

    fn depth_for(&self, state: &PositionState) -> u32 {
        if let Some(depth) = self.config.max_depth {
            return depth.max(1);
        }
        let remaining = [state.remaining(PlayerId::One), state.remaining(PlayerId::Two)];
        let distances = [
            distance_score(state, PlayerId::One) as u32,
            distance_score(state, PlayerId::Two) as u32,
        ];
        search_depth(remaining, distances)
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &mut self,
        state: &mut PositionState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        root: PlayerId,
        visited: &mut HashMap<(Fingerprint, u32), i32>,
    ) -> i32 {
        self.stats.nodes += 1;

        if depth == 0 || state.is_over() {
            return self.evaluate(state, root);
        }

        let key = state.fingerprint();
        if let Some(&value) = visited.get(&(key.clone(), depth)) {
            self.stats.transpositions += 1;
            return value;
        }

        let children = self.children_of(state, &key);
        if children.is_empty() {
            return self.evaluate(state, root);
        }

        let (alpha0, beta0) = (alpha, beta);
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for action in children {
            let undo = state.apply_action(action);
            let value = self.minimax(state, depth - 1, alpha, beta, !maximizing, root, visited);
            state.undo(undo);

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(best);
            } else {
                best = best.min(value);
                beta = beta.min(best);
            }
            if self.config.pruning && alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        // Only values strictly inside the window are exact.
        if !self.config.pruning || (alpha0 < best && best < beta0) {
            visited.insert((key, depth), best);
        }
        best
    }

    fn evaluate(&mut self, state: &PositionState, root: PlayerId) -> i32 {
        self.stats.leaves += 1;
        let key = state.fingerprint();
        let value = match self.store.evaluation(&key) {
            Some(v) => v,
            None => {
                let v = static_evaluation(state);
                self.store.insert_evaluation(key, v);
                v
            }
        };
        match root {
            PlayerId::One => value,
            PlayerId::Two => -value,
        }
    }

    fn children_of(&mut self, state: &mut PositionState, key: &Fingerprint) -> Vec<Action> {
        if let Some(cached) = self.store.children(key) {
            return cached.to_vec();
        }
        let actions = legal_actions_in(state);
        self.store.insert_children(key.clone(), actions.clone());
        actions
    }
}

fn winning_advance(state: &PositionState, player: PlayerId) -> Option<Coord> {
    let goal = state.token(player).goal_row;
    legal_advances(state, player)
        .into_iter()
        .find(|c| c.y == goal)
}

/// Greedy one-ply choice. With `allow_barriers` off only advances are
/// considered.
fn greedy(state: &PositionState, allow_barriers: bool) -> Option<Action> {
    let me = state.current_player();
    let opp = me.other();

    if let Some(win) = winning_advance(state, me) {
        return Some(Action::Advance(win));
    }

    let mut work = state.clone();
    let self_dist = distance_score(&work, me);
    let opp_dist = distance_score(&work, opp);

    let mut best_advance: Option<(Coord, i32)> = None;
    for to in legal_advances(&work, me) {
        work.apply_advance(me, to);
        let gain = self_dist - distance_score(&work, me);
        work.undo_advance(me);
        if best_advance.is_none_or(|(_, g)| gain > g) {
            best_advance = Some((to, gain));
        }
    }

    if !allow_barriers || work.remaining(me) == 0 {
        return best_advance.map(|(to, _)| Action::Advance(to));
    }

    let mut best_barrier: Option<(Barrier, i32)> = None;
    for barrier in legal_barriers_in(&mut work, me) {
        work.apply_barrier_provisional(barrier);
        let gain = distance_score(&work, opp) - opp_dist;
        work.remove_barrier_provisional(&barrier);
        if best_barrier.is_none_or(|(_, g)| gain > g) {
            best_barrier = Some((barrier, gain));
        }
    }

    let threshold = wall_diff_threshold(work.remaining(me));
    match (best_advance, best_barrier) {
        (Some((_, advance_gain)), Some((barrier, wall_gain)))
            if wall_gain >= threshold && wall_gain >= advance_gain =>
        {
            Some(barrier_action(barrier))
        }
        (Some((to, _)), _) => Some(Action::Advance(to)),
        (None, Some((barrier, _))) => Some(barrier_action(barrier)),
        (None, None) => None,
    }
}
