//! The solution search.

use crate::{
    board::Board,
    error::Error,
    state::BoardState,
    tiles::{Coord, Direction, Tile},
};
use std::{collections::HashMap, rc::Rc};

/// One push of the token, as part of a recorded path.
#[derive(Clone, Debug)]
pub struct Move {
    direction: Direction,
    origin: Coord,
    target: Coord,
    state: Rc<BoardState>,
}

impl Move {
    /// The direction the token was pushed in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The cell the push started from.
    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// The cell the token came to rest on.
    pub fn target(&self) -> Coord {
        self.target
    }

    /// The board state after the push.
    pub fn state(&self) -> &Rc<BoardState> {
        &self.state
    }
}

/// A sequence of moves leading from the start to an exit.
pub type Solution = Vec<Move>;

/// The key of a search frontier: the token's cell, the direction it arrived
/// by, and the identity of the state it arrived on.
type VisitKey = (Coord, Option<Direction>, u64);

/// A solution searcher for a board.
///
/// The search is a depth-first exploration of the four push directions from
/// every reachable resting position. It is not a perfect solver: it cannot
/// handle elements whose resolution depends on move timing, and its
/// recursion may exhaust memory or the stack on boards with very large
/// reachable-state spaces.
pub struct Solver {
    board: Rc<Board>,
    start: Coord,
}

impl Solver {
    /// Creates the solver for the given board.
    ///
    /// Fails when the board has no start or no exit position; a board that
    /// cannot even be played is a configuration error, not an unsolvable
    /// puzzle.
    pub fn new(board: Board) -> Result<Self, Error> {
        let start = board.start().ok_or(Error::MissingStart)?;
        if board.exit().is_none() {
            return Err(Error::MissingExit);
        }
        Ok(Solver {
            board: Rc::new(board),
            start,
        })
    }

    /// The board being solved.
    pub fn board(&self) -> &Rc<Board> {
        &self.board
    }

    /// Searches for solutions.
    ///
    /// `control` is polled at the start of every recursive step; returning
    /// `false` stops the search promptly, and whatever solutions were
    /// already recorded are returned normally, just possibly incomplete.
    ///
    /// The result is sorted ascending by length, so the first entry is the
    /// shortest solution discovered. This does *not* return all possible
    /// solutions, and the shortest one found is not necessarily the
    /// globally shortest one.
    pub fn solve<F: Fn() -> bool>(&self, control: F) -> Vec<Solution> {
        let mut solutions = Vec::new();
        let root = Rc::new(BoardState::new(Rc::clone(&self.board), true));
        self.explore(
            &control,
            &mut Vec::new(),
            root,
            self.start,
            None,
            &mut HashMap::new(),
            &mut solutions,
        );
        solutions.sort_by_key(Vec::len);
        solutions
    }

    /// One recursive search step at a resting position.
    ///
    /// The frontier for the current (position, arrival direction, state
    /// identity) key holds the directions not yet tried there. It is
    /// drained last-in-first-out while this call works on it, so a
    /// recursive re-entry to the same key on the same path only sees the
    /// remaining directions, which bounds direct cycles. Once drained it is
    /// restored from the snapshot taken on entry, so unrelated paths can
    /// explore the key again. This is an approximate guard, not a visited
    /// set: states are only ever recognized by identity, never by content.
    #[allow(clippy::too_many_arguments)]
    fn explore<F: Fn() -> bool>(
        &self,
        control: &F,
        path: &mut Vec<Move>,
        state: Rc<BoardState>,
        position: Coord,
        arrived: Option<Direction>,
        frontiers: &mut HashMap<VisitKey, Vec<Direction>>,
        solutions: &mut Vec<Solution>,
    ) {
        if !control() || !self.board.in_range(position.0, position.1) {
            return;
        }
        let tile = state.tile_at(position.0, position.1);
        if tile.is_exit() {
            record(tile, &state, path, solutions);
            return;
        }
        let key = (position, arrived, state.id());
        let snapshot = frontiers.entry(key).or_insert_with(new_frontier).clone();
        while let Some(direction) = frontiers.get_mut(&key).and_then(Vec::pop) {
            let mut target = position;
            if let Some(next) = state.slide(&mut target, direction) {
                path.push(Move {
                    direction,
                    origin: position,
                    target,
                    state: Rc::clone(&next),
                });
                self.explore(control, path, next, target, Some(direction), frontiers, solutions);
                path.pop();
            }
        }
        frontiers.insert(key, snapshot);
    }
}

/// A fresh frontier; directions pop off the end in the fixed trial order.
fn new_frontier() -> Vec<Direction> {
    let mut directions = Direction::ALL.to_vec();
    directions.reverse();
    directions
}

/// Records the current path as a solution if the ending is a true one.
///
/// Reaching an exit with an armed sensor left, or a bomb-guarded exit with
/// a bomb left, is not a solution. Only paths strictly shorter than the
/// last recorded one are kept, so the list is a chain of improving records
/// in discovery order.
fn record(tile: Tile, state: &BoardState, path: &[Move], solutions: &mut Vec<Solution>) {
    if state.has_armed_sensors() {
        return;
    }
    if tile == Tile::SafeExit && state.has_bombs() {
        return;
    }
    if solutions.last().map_or(true, |best| best.len() > path.len()) {
        solutions.push(path.to_vec());
    }
}
