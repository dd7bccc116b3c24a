//! Game state representation and its mutation primitives.
//!
//! This module provides:
//! - [`Token`], [`Barrier`] and [`Action`], the pieces of a position
//! - [`PositionState`], the mutable game state
//! - [`Fingerprint`], the immutable key used for transposition lookups
//!
//! None of the mutation primitives check legality. Callers consult
//! [`crate::movegen`] first, or go through [`crate::movegen::play`] which
//! does both.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Coord, EdgeGrid, Orientation, anchor_in_range};
use crate::constants::{MAX_BARRIERS, N, P1_GOAL_ROW, P1_START, P2_GOAL_ROW, P2_START};
use crate::error::Error;

/// One of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const BOTH: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    #[inline]
    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// The player's number as shown to users (1 or 2).
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn goal_row(self) -> usize {
        match self {
            PlayerId::One => P1_GOAL_ROW,
            PlayerId::Two => P2_GOAL_ROW,
        }
    }

    pub fn start(self) -> Coord {
        match self {
            PlayerId::One => P1_START.into(),
            PlayerId::Two => P2_START.into(),
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}

/// A player's playing piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub id: PlayerId,
    pub pos: Coord,
    pub goal_row: usize,
    pub human: bool,
    /// Cells the token stood on before each advance, most recent last.
    history: Vec<Coord>,
}

impl Token {
    pub fn new(id: PlayerId, pos: Coord, human: bool) -> Self {
        Self {
            id,
            pos,
            goal_row: id.goal_row(),
            human,
            history: Vec::new(),
        }
    }

    #[inline]
    pub fn at_goal(&self) -> bool {
        self.pos.y == self.goal_row
    }
}

/// A two-cell barrier sitting on the edges between cells.
///
/// `anchor` is the northwest corner of the span; see
/// [`crate::board::barrier_edges`] for which edges it closes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Barrier {
    pub owner: PlayerId,
    pub anchor: Coord,
    pub orientation: Orientation,
}

impl Barrier {
    pub fn new(owner: PlayerId, anchor: Coord, orientation: Orientation) -> Self {
        Self {
            owner,
            anchor,
            orientation,
        }
    }

    /// Whether the two barriers overlap or cross. Ownership is ignored.
    ///
    /// Parallel barriers conflict on the same anchor or when offset by
    /// exactly one cell along their span; perpendicular barriers conflict
    /// only when they cross at the same anchor.
    pub fn conflicts_with(&self, other: &Barrier) -> bool {
        let (a, b) = (self.anchor, other.anchor);
        if a == b {
            return true;
        }
        match (self.orientation, other.orientation) {
            (Orientation::Vertical, Orientation::Vertical) => a.x == b.x && a.y.abs_diff(b.y) == 1,
            (Orientation::Horizontal, Orientation::Horizontal) => {
                a.y == b.y && a.x.abs_diff(b.x) == 1
            }
            _ => false,
        }
    }
}

/// The unit of play: move the token, or place a barrier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    Advance(Coord),
    PlaceBarrier {
        anchor: Coord,
        orientation: Orientation,
    },
}

impl Action {
    pub fn is_advance(&self) -> bool {
        matches!(self, Action::Advance(_))
    }

    /// Whether the action stays on the board: an advance to an on-board
    /// cell, or a barrier with an anchor in range. Says nothing about
    /// legality in a given position.
    pub fn in_bounds(&self) -> bool {
        match *self {
            Action::Advance(to) => to.on_board(),
            Action::PlaceBarrier { anchor, .. } => anchor_in_range(anchor),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Advance(to) => write!(f, "{to}"),
            Action::PlaceBarrier {
                anchor,
                orientation,
            } => {
                let o = match orientation {
                    Orientation::Horizontal => 'h',
                    Orientation::Vertical => 'v',
                };
                write!(f, "{anchor}{o}")
            }
        }
    }
}

/// Parses `e2` (advance) or `e3h` / `e3v` (barrier anchored at e3).
impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| Error::ParseAction {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let bytes = s.trim().to_ascii_lowercase().into_bytes();
        if bytes.len() < 2 || bytes.len() > 3 {
            return Err(fail("expected a cell like e2, optionally followed by h or v"));
        }
        let col = bytes[0];
        let row = bytes[1];
        if !(b'a'..b'a' + N as u8).contains(&col) {
            return Err(fail("column must be a-i"));
        }
        if !(b'1'..b'1' + N as u8).contains(&row) {
            return Err(fail("row must be 1-9"));
        }
        let cell = Coord::new((col - b'a') as usize, (row - b'1') as usize);

        let orientation = match bytes.get(2) {
            None => return Ok(Action::Advance(cell)),
            Some(b'h') => Orientation::Horizontal,
            Some(b'v') => Orientation::Vertical,
            Some(_) => return Err(fail("barrier suffix must be h or v")),
        };
        if !anchor_in_range(cell) {
            return Err(fail("barrier anchor must be in columns a-h, rows 2-9"));
        }
        Ok(Action::PlaceBarrier {
            anchor: cell,
            orientation,
        })
    }
}

/// Transposition key: both token cells, the side to move, and the sorted
/// barrier list.
///
/// Coarser than [`PositionState`] equality (move histories and the human
/// flags are not part of it).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    tokens: [Coord; 2],
    to_move: PlayerId,
    barriers: Vec<Barrier>,
}

impl Fingerprint {
    /// The side to move in the fingerprinted position.
    pub fn to_move(&self) -> PlayerId {
        self.to_move
    }

    /// Barrier budget `player` had left, derived from the barrier owners.
    pub fn remaining(&self, player: PlayerId) -> u8 {
        let placed = self.barriers.iter().filter(|b| b.owner == player).count();
        MAX_BARRIERS.saturating_sub(placed.min(u8::MAX as usize) as u8)
    }

    /// Whether this could be the fingerprint of a real position: both
    /// tokens on distinct board cells, every anchor in range, and no
    /// player owning more than [`MAX_BARRIERS`] barriers.
    pub fn is_well_formed(&self) -> bool {
        let [p1, p2] = self.tokens;
        if !p1.on_board() || !p2.on_board() || p1 == p2 {
            return false;
        }
        if !self.barriers.iter().all(|b| anchor_in_range(b.anchor)) {
            return false;
        }
        PlayerId::BOTH.into_iter().all(|p| {
            self.barriers.iter().filter(|b| b.owner == p).count() <= MAX_BARRIERS as usize
        })
    }
}

/// Record needed to revert one [`PositionState::apply_action`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Undo {
    Advance { player: PlayerId },
    Barrier { barrier: Barrier },
}

/// The mutable game state.
///
/// Budget invariant: for each player, barriers placed through
/// [`apply_barrier`](Self::apply_barrier) plus the remaining budget is
/// always [`MAX_BARRIERS`]. Provisional barriers leave the budget alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionState {
    tokens: [Token; 2],
    barriers: BTreeSet<Barrier>,
    remaining: [u8; 2],
    to_move: PlayerId,
    edges: EdgeGrid,
}

impl Default for PositionState {
    fn default() -> Self {
        Self::new(false)
    }
}

impl PositionState {
    /// A fresh game. Player 1 is human; `p2_human` picks player 2's controller.
    pub fn new(p2_human: bool) -> Self {
        Self {
            tokens: [
                Token::new(PlayerId::One, PlayerId::One.start(), true),
                Token::new(PlayerId::Two, PlayerId::Two.start(), p2_human),
            ],
            barriers: BTreeSet::new(),
            remaining: [MAX_BARRIERS; 2],
            to_move: PlayerId::One,
            edges: EdgeGrid::new(),
        }
    }

    /// Rebuild a position from its parts, e.g. after loading a saved game.
    ///
    /// Budgets are derived from the barrier owners. Returns `None` if a
    /// token is off the board, both tokens share a cell, an anchor is out of
    /// range, or a player owns more than [`MAX_BARRIERS`] barriers.
    pub fn from_parts(
        p1: Coord,
        p2: Coord,
        barriers: impl IntoIterator<Item = Barrier>,
        to_move: PlayerId,
    ) -> Option<Self> {
        if !p1.on_board() || !p2.on_board() || p1 == p2 {
            return None;
        }
        let mut state = Self::new(false);
        state.tokens[0].pos = p1;
        state.tokens[1].pos = p2;
        state.to_move = to_move;
        for barrier in barriers {
            if !anchor_in_range(barrier.anchor) {
                return None;
            }
            if state.remaining[barrier.owner.index()] == 0 {
                return None;
            }
            if state.barriers.insert(barrier) {
                state.edges.block(barrier.anchor, barrier.orientation);
                state.remaining[barrier.owner.index()] -= 1;
            }
        }
        Some(state)
    }

    #[inline]
    pub fn token(&self, player: PlayerId) -> &Token {
        &self.tokens[player.index()]
    }

    #[inline]
    pub fn current_player(&self) -> PlayerId {
        self.to_move
    }

    #[inline]
    pub fn remaining(&self, player: PlayerId) -> u8 {
        self.remaining[player.index()]
    }

    pub fn barriers(&self) -> impl Iterator<Item = &Barrier> {
        self.barriers.iter()
    }

    pub fn placed_by(&self, player: PlayerId) -> usize {
        self.barriers.iter().filter(|b| b.owner == player).count()
    }

    pub fn has_barrier(&self, barrier: &Barrier) -> bool {
        self.barriers.contains(barrier)
    }

    #[inline]
    pub fn edges(&self) -> &EdgeGrid {
        &self.edges
    }

    /// The player whose token has reached its goal row, if any.
    pub fn winner(&self) -> Option<PlayerId> {
        PlayerId::BOTH
            .into_iter()
            .find(|&p| self.tokens[p.index()].at_goal())
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Move `player`'s token to `to`, remembering where it came from.
    pub fn apply_advance(&mut self, player: PlayerId, to: Coord) {
        let token = &mut self.tokens[player.index()];
        token.history.push(token.pos);
        token.pos = to;
    }

    /// Revert the most recent [`apply_advance`](Self::apply_advance) of
    /// `player`. Returns `false` if there is nothing to revert.
    pub fn undo_advance(&mut self, player: PlayerId) -> bool {
        let token = &mut self.tokens[player.index()];
        match token.history.pop() {
            Some(prev) => {
                token.pos = prev;
                true
            }
            None => false,
        }
    }

    /// Place a barrier permanently, charging its owner's budget.
    pub fn apply_barrier(&mut self, barrier: Barrier) {
        if self.barriers.insert(barrier) {
            self.edges.block(barrier.anchor, barrier.orientation);
            let budget = &mut self.remaining[barrier.owner.index()];
            debug_assert!(*budget > 0, "{} has no barriers left", barrier.owner);
            *budget = budget.saturating_sub(1);
        }
    }

    /// Take back a barrier placed with [`apply_barrier`](Self::apply_barrier)
    /// and refund its owner.
    pub fn retract_barrier(&mut self, barrier: &Barrier) {
        if self.barriers.remove(barrier) {
            self.edges.unblock(barrier.anchor, barrier.orientation);
            let budget = &mut self.remaining[barrier.owner.index()];
            *budget = (*budget + 1).min(MAX_BARRIERS);
        }
    }

    /// Insert a barrier without touching any budget. Returns `false` if the
    /// barrier was already present (nothing changes in that case).
    pub fn apply_barrier_provisional(&mut self, barrier: Barrier) -> bool {
        let inserted = self.barriers.insert(barrier);
        if inserted {
            self.edges.block(barrier.anchor, barrier.orientation);
        }
        inserted
    }

    /// Remove a barrier inserted with
    /// [`apply_barrier_provisional`](Self::apply_barrier_provisional).
    pub fn remove_barrier_provisional(&mut self, barrier: &Barrier) -> bool {
        let removed = self.barriers.remove(barrier);
        if removed {
            self.edges.unblock(barrier.anchor, barrier.orientation);
        }
        removed
    }

    /// Hand the move to the other player.
    #[inline]
    pub fn advance_turn(&mut self) {
        self.to_move = self.to_move.other();
    }

    /// Apply `action` for the side to move and pass the turn.
    pub fn apply_action(&mut self, action: Action) -> Undo {
        let player = self.to_move;
        let undo = match action {
            Action::Advance(to) => {
                self.apply_advance(player, to);
                Undo::Advance { player }
            }
            Action::PlaceBarrier {
                anchor,
                orientation,
            } => {
                let barrier = Barrier::new(player, anchor, orientation);
                self.apply_barrier(barrier);
                Undo::Barrier { barrier }
            }
        };
        self.advance_turn();
        undo
    }

    /// Revert an [`apply_action`](Self::apply_action).
    pub fn undo(&mut self, undo: Undo) {
        self.advance_turn();
        match undo {
            Undo::Advance { player } => {
                self.undo_advance(player);
            }
            Undo::Barrier { barrier } => self.retract_barrier(&barrier),
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            tokens: [self.tokens[0].pos, self.tokens[1].pos],
            to_move: self.to_move,
            barriers: self.barriers.iter().copied().collect(),
        }
    }
}
