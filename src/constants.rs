//! Constants for board geometry, barrier budgets, and search parameters.
//!
//! The board is a fixed 9x9 grid. Coordinates are `(x, y)` with `x` the
//! column (`a`..`i`) and `y` the row (`1`..`9`), both zero-based.
//! Player 1 starts on row 0 and races north; player 2 starts on row 8 and
//! races south.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const N: usize = 9;

/// Number of cells on the board.
pub const CELLS: usize = N * N;

/// Anchors are valid for `x` in `0..ANCHOR_MAX_X`.
pub const ANCHOR_MAX_X: usize = N - 1;

/// Anchors are valid for `y` in `ANCHOR_MIN_Y..N`.
pub const ANCHOR_MIN_Y: usize = 1;

// =============================================================================
// Players
// =============================================================================

/// Barriers each player may place over a whole game.
pub const MAX_BARRIERS: u8 = 10;

/// Starting cell of player 1.
pub const P1_START: (usize, usize) = (4, 0);

/// Starting cell of player 2.
pub const P2_START: (usize, usize) = (4, N - 1);

/// Goal row of player 1.
pub const P1_GOAL_ROW: usize = N - 1;

/// Goal row of player 2.
pub const P2_GOAL_ROW: usize = 0;

// =============================================================================
// Search Parameters
// =============================================================================

/// Bonus added to the path differential of a position where a token has
/// reached its goal row. Larger than any differential on a 9x9 board.
pub const WIN_SCORE: i32 = 1000;

/// Distance substituted for an unreachable goal when scoring.
pub const UNREACHABLE_PENALTY: i32 = 100;

/// Shallowest depth chosen by the adaptive depth policy.
pub const MIN_SEARCH_DEPTH: u32 = 3;

/// Deepest depth chosen by the adaptive depth policy.
pub const MAX_SEARCH_DEPTH: u32 = 5;

// =============================================================================
// Persistence
// =============================================================================

/// Default location of the persisted transposition cache.
pub const DEFAULT_CACHE_PATH: &str = "quoridor-cache.msgpack";

/// Format version written into the cache envelope.
pub const CACHE_FORMAT_VERSION: u32 = 1;
