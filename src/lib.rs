//! __boxslide__ simulates a tile-based sliding-block puzzle and searches
//! for solutions.
//!
//! A token is pushed in one of four directions and slides until something
//! stops it. The board elements interact with the slide in their own ways:
//! walls stop it, deflectors bend it, teleports relocate it, bombs are
//! defused by it, traps break under it and turn into walls, and sensors are
//! one-shot gates that each entry side passes exactly once. A puzzle is
//! solved by bringing the token from its start to the exit; an exit may
//! additionally require every bomb to be defused and every sensor side to
//! be used up first.
//!
//! The crate has three layers:
//!
//! - [`Board`]: the static tile grid, decoded from one string per row.
//! - [`BoardState`]: a copy-on-write overlay the physics writes into, so a
//!   hypothetical move never corrupts another branch of the search.
//! - [`Solver`]: a depth-first search over the four push directions at
//!   every reachable resting position, returning the move sequences it
//!   found, shortest first.
//!
//! # Example
//!
//! ```
//! use boxslide::{Board, Direction, Solver};
//!
//! # fn main() -> Result<(), boxslide::Error> {
//! let board = Board::from_rows(&[
//!     "xwpw", //
//!     "   w", //
//!     "wwww", //
//! ]);
//! let solver = Solver::new(board)?;
//! let solutions = solver.solve(|| true);
//! let best: Vec<_> = solutions[0].iter().map(|m| m.direction()).collect();
//! assert_eq!(best, [Direction::Down, Direction::Right, Direction::Up]);
//! # Ok(())
//! # }
//! ```
//!
//! The search runs on the calling thread; callers who need a responsive
//! foreground run it on a worker and stop it through the control predicate
//! of [`Solver::solve`].

mod board;
mod engine;
mod error;
mod search;
mod state;
mod tiles;

pub use board::Board;
pub use error::Error;
pub use search::{Move, Solution, Solver};
pub use state::BoardState;
pub use tiles::{Coord, Direction, DirectionSet, Tile};
