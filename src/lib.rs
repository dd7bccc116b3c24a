//! Quoridor-Rust: decision engine for a 9x9 wall-placement race game.
//!
//! Two tokens race to the opposite side of the board while each player
//! may spend up to ten barriers to lengthen the other's path. A barrier
//! may never cut a token off from its goal row.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, budgets and search parameters
//! - [`board`] - Coordinates, directions and the blocked-edge grid
//! - [`position`] - Game state, actions and reversible transitions
//! - [`pathfind`] - BFS distances to the goal row
//! - [`movegen`] - Legal advances, barriers and actions
//! - [`policy`] - Greedy threshold and adaptive depth tables
//! - [`search`] - Greedy and alpha-beta move selection
//! - [`store`] - Persisted transposition cache
//! - [`playout`] - Random games and self-play
//! - [`protocol`] - Line-oriented text front end
//!
//! ## Example
//!
//! ```
//! use quoridor_rust::movegen::play;
//! use quoridor_rust::position::{Action, PositionState};
//! use quoridor_rust::search::{SearchConfig, SearchEngine};
//!
//! // Create a new game and advance player 1
//! let mut state = PositionState::new(false);
//! assert!(play(&mut state, "e2".parse::<Action>().unwrap()));
//!
//! // Let the engine answer for player 2
//! let mut engine = SearchEngine::new(SearchConfig {
//!     max_depth: Some(1),
//!     ..SearchConfig::default()
//! });
//! let reply = engine.get_action(&state).unwrap();
//! assert!(play(&mut state, reply));
//! println!("Engine played {reply}");
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod movegen;
pub mod pathfind;
pub mod playout;
pub mod policy;
pub mod position;
pub mod protocol;
pub mod search;
pub mod store;

pub use error::{Error, Result};
