//! Grid geometry: coordinates, directions, and the edge-block grid.
//!
//! Barriers never occupy cells; they sit on the edges between cells. The
//! [`EdgeGrid`] keeps a per-cell, per-direction block count so path finding
//! and move generation can ask "can I leave this cell northwards" without
//! scanning the barrier set.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{ANCHOR_MAX_X, ANCHOR_MIN_Y, CELLS, N};
use crate::position::{PlayerId, PositionState};

/// A cell on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    /// Create a coordinate from a column `x` and a row `y`, both zero-based.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Index of this cell in a row-major `CELLS`-sized array.
    #[inline]
    pub fn idx(self) -> usize {
        self.y * N + self.x
    }

    /// Inverse of [`idx`](Self::idx).
    #[inline]
    pub fn from_idx(i: usize) -> Self {
        Self { x: i % N, y: i / N }
    }

    /// Whether the cell lies inside the 9x9 grid.
    #[inline]
    pub fn on_board(self) -> bool {
        self.x < N && self.y < N
    }

    /// The neighbouring cell in `dir`, or `None` past the edge of the board.
    #[inline]
    pub fn step(self, dir: Direction) -> Option<Coord> {
        let (x, y) = match dir {
            Direction::North => (self.x, self.y + 1),
            Direction::East => (self.x + 1, self.y),
            Direction::South => (self.x, self.y.checked_sub(1)?),
            Direction::West => (self.x.checked_sub(1)?, self.y),
        };
        let c = Coord::new(x, y);
        c.on_board().then_some(c)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Coord::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.x as u8) as char, self.y + 1)
    }
}

/// Orthogonal directions. North is towards higher `y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The two directions perpendicular to this one.
    #[inline]
    pub fn sideways(self) -> [Direction; 2] {
        match self {
            Direction::North | Direction::South => [Direction::East, Direction::West],
            Direction::East | Direction::West => [Direction::North, Direction::South],
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

/// Barrier orientation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Whether `anchor` is a valid northwest corner for a barrier.
#[inline]
pub fn anchor_in_range(anchor: Coord) -> bool {
    anchor.x < ANCHOR_MAX_X && (ANCHOR_MIN_Y..N).contains(&anchor.y)
}

/// The four directed edges a barrier at `anchor` closes.
///
/// A vertical barrier separates columns `x` and `x + 1` on rows `y - 1` and
/// `y`. A horizontal barrier separates rows `y - 1` and `y` on columns `x`
/// and `x + 1`. The anchor must satisfy [`anchor_in_range`].
pub fn barrier_edges(anchor: Coord, orientation: Orientation) -> [(Coord, Direction); 4] {
    let Coord { x, y } = anchor;
    match orientation {
        Orientation::Vertical => [
            (Coord::new(x, y), Direction::East),
            (Coord::new(x, y - 1), Direction::East),
            (Coord::new(x + 1, y), Direction::West),
            (Coord::new(x + 1, y - 1), Direction::West),
        ],
        Orientation::Horizontal => [
            (Coord::new(x, y - 1), Direction::North),
            (Coord::new(x + 1, y - 1), Direction::North),
            (Coord::new(x, y), Direction::South),
            (Coord::new(x + 1, y), Direction::South),
        ],
    }
}

/// Per-cell count of barriers closing each outgoing edge.
///
/// Counts rather than flags so that removing one of two overlapping
/// barriers (only possible through the unchecked primitives) leaves the
/// edge closed.
#[derive(Clone, PartialEq, Eq)]
pub struct EdgeGrid {
    blocks: [[u8; 4]; CELLS],
}

impl Default for EdgeGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeGrid {
    pub fn new() -> Self {
        Self {
            blocks: [[0; 4]; CELLS],
        }
    }

    pub fn block(&mut self, anchor: Coord, orientation: Orientation) {
        for (cell, dir) in barrier_edges(anchor, orientation) {
            self.blocks[cell.idx()][dir.slot()] += 1;
        }
    }

    pub fn unblock(&mut self, anchor: Coord, orientation: Orientation) {
        for (cell, dir) in barrier_edges(anchor, orientation) {
            let count = &mut self.blocks[cell.idx()][dir.slot()];
            *count = count.saturating_sub(1);
        }
    }

    /// Whether leaving `cell` in `dir` crosses a barrier.
    #[inline]
    pub fn is_blocked(&self, cell: Coord, dir: Direction) -> bool {
        self.blocks[cell.idx()][dir.slot()] > 0
    }

    /// The neighbour of `cell` in `dir` if it is on the board and no barrier
    /// is in the way.
    #[inline]
    pub fn open_step(&self, cell: Coord, dir: Direction) -> Option<Coord> {
        if self.is_blocked(cell, dir) {
            return None;
        }
        cell.step(dir)
    }
}

impl fmt::Debug for EdgeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let closed = self.blocks.iter().flatten().filter(|&&c| c > 0).count();
        f.debug_struct("EdgeGrid").field("closed_edges", &closed).finish()
    }
}

const COLUMNS: &str = "   a   b   c   d   e   f   g   h   i";
const BORDER: &str = " -------------------------------------";

/// Text rendering: player 1 is `O`, player 2 is `X`, row 9 on top.
impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = N * 2 - 1;
        let cols = N * 4 - 3;
        let mut grid = vec![vec![' '; cols]; rows];

        for y in 0..N {
            for x in 0..N {
                grid[y * 2][x * 4] = '.';
            }
        }
        for player in PlayerId::BOTH {
            let c = self.token(player).pos;
            grid[c.y * 2][c.x * 4] = match player {
                PlayerId::One => 'O',
                PlayerId::Two => 'X',
            };
        }
        for barrier in self.barriers() {
            let Coord { x, y } = barrier.anchor;
            match barrier.orientation {
                Orientation::Vertical => {
                    for i in 0..3 {
                        grid[(y - 1) * 2 + i][x * 4 + 2] = '|';
                    }
                }
                Orientation::Horizontal => {
                    for i in 0..5 {
                        grid[(y - 1) * 2 + 1][x * 4 + i] = '-';
                    }
                }
            }
        }

        writeln!(f, "{COLUMNS}")?;
        writeln!(f, "{BORDER}")?;
        for i in (0..rows).rev() {
            let label = if i % 2 == 0 {
                (i / 2 + 1).to_string()
            } else {
                " ".to_string()
            };
            let line: String = grid[i].iter().collect();
            let tail = if i % 2 == 0 { label.as_str() } else { "" };
            writeln!(f, "{label}| {line} |{tail}")?;
        }
        writeln!(f, "{BORDER}")?;
        writeln!(f, "{COLUMNS}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_respects_board_edges() {
        assert_eq!(Coord::new(0, 0).step(Direction::South), None);
        assert_eq!(Coord::new(0, 0).step(Direction::West), None);
        assert_eq!(Coord::new(8, 8).step(Direction::North), None);
        assert_eq!(Coord::new(8, 8).step(Direction::East), None);
        assert_eq!(Coord::new(4, 4).step(Direction::North), Some(Coord::new(4, 5)));
    }

    #[test]
    fn test_idx_roundtrip() {
        for i in 0..CELLS {
            assert_eq!(Coord::from_idx(i).idx(), i);
        }
    }

    #[test]
    fn test_horizontal_barrier_blocks_both_columns() {
        let mut grid = EdgeGrid::new();
        grid.block(Coord::new(4, 3), Orientation::Horizontal);

        assert!(grid.is_blocked(Coord::new(4, 2), Direction::North));
        assert!(grid.is_blocked(Coord::new(5, 2), Direction::North));
        assert!(grid.is_blocked(Coord::new(4, 3), Direction::South));
        assert!(grid.is_blocked(Coord::new(5, 3), Direction::South));
        assert!(!grid.is_blocked(Coord::new(3, 2), Direction::North));
        assert!(!grid.is_blocked(Coord::new(4, 2), Direction::East));
    }

    #[test]
    fn test_vertical_barrier_blocks_both_rows() {
        let mut grid = EdgeGrid::new();
        grid.block(Coord::new(2, 5), Orientation::Vertical);

        assert!(grid.is_blocked(Coord::new(2, 5), Direction::East));
        assert!(grid.is_blocked(Coord::new(2, 4), Direction::East));
        assert!(grid.is_blocked(Coord::new(3, 5), Direction::West));
        assert!(grid.is_blocked(Coord::new(3, 4), Direction::West));
        assert!(!grid.is_blocked(Coord::new(2, 6), Direction::East));
    }

    #[test]
    fn test_unblock_restores_grid() {
        let mut grid = EdgeGrid::new();
        grid.block(Coord::new(0, 1), Orientation::Vertical);
        grid.unblock(Coord::new(0, 1), Orientation::Vertical);
        assert_eq!(grid, EdgeGrid::new());
    }

    #[test]
    fn test_anchor_range() {
        assert!(anchor_in_range(Coord::new(0, 1)));
        assert!(anchor_in_range(Coord::new(7, 8)));
        assert!(!anchor_in_range(Coord::new(8, 4)));
        assert!(!anchor_in_range(Coord::new(3, 0)));
    }

    #[test]
    fn test_coord_display() {
        assert_eq!(Coord::new(0, 0).to_string(), "a1");
        assert_eq!(Coord::new(8, 8).to_string(), "i9");
    }
}
