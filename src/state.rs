//! The live simulation surface.

use crate::{
    board::{next_id, Board},
    tiles::{Coord, Direction, DirectionSet, Tile},
};
use std::{
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    rc::Rc,
};

/// A copy-on-write overlay of a [`Board`].
///
/// A state never touches the board it wraps. Writes land in a sparse delta
/// consulted before the base; deriving a state for a hypothetical move
/// layers a fresh delta over the parent, so every branch of a search sees
/// only its own mutations. On top of the tiles, a state tracks the entry
/// sides each sensor still permits and how many traps currently claim each
/// guard-wall cell.
///
/// Like boards, every state has a process-unique identity; two states with
/// identical content are still two different states.
pub struct BoardState {
    board: Rc<Board>,
    parent: Option<Rc<BoardState>>,
    delta: HashMap<Coord, Tile>,
    sensors: HashMap<Coord, DirectionSet>,
    overlaps: HashMap<Coord, u32>,
    id: u64,
}

impl BoardState {
    /// Creates the root state for a board.
    ///
    /// With `process` set, traps and sensors are armed: the two flank cells
    /// of every trap become guard walls (counting overlaps, so two traps
    /// sharing a flank keep it walled until both are broken), every sensor
    /// gets its initially permitted entry sides, and the token's start tile
    /// is cleared, since the token's position is tracked by the caller and
    /// not as board content.
    ///
    /// A sensor side is permitted only if its approach cell, the neighbor
    /// opposite the entry direction, lies on the board and is
    /// [`Empty`](Tile::Empty) at the time the sensor is scanned. Guard
    /// walls written earlier in the scan count as blocked approaches.
    pub fn new(board: Rc<Board>, process: bool) -> Self {
        let mut state = BoardState {
            board,
            parent: None,
            delta: HashMap::new(),
            sensors: HashMap::new(),
            overlaps: HashMap::new(),
            id: next_id(),
        };
        if process {
            for y in 0..state.board.height() {
                for x in 0..state.board.width() {
                    match state.board.tile_at(x, y) {
                        Tile::TrapH => {
                            state.arm_guard(x, y - 1);
                            state.arm_guard(x, y + 1);
                        }
                        Tile::TrapV => {
                            state.arm_guard(x - 1, y);
                            state.arm_guard(x + 1, y);
                        }
                        Tile::Sensor => state.init_sensor(x, y),
                        _ => {}
                    }
                }
            }
            if let Some((x, y)) = state.board.start() {
                state.set_tile(Tile::Empty, x, y);
            }
        }
        state
    }

    /// Derives a child state to apply a mutation to.
    ///
    /// The child starts with an empty delta layered over the parent and
    /// deep copies of the sensor and overlap maps, so sibling branches
    /// never observe each other's changes.
    pub fn derive(parent: &Rc<BoardState>) -> Self {
        BoardState {
            board: Rc::clone(&parent.board),
            parent: Some(Rc::clone(parent)),
            delta: HashMap::new(),
            sensors: parent.sensors.clone(),
            overlaps: parent.overlaps.clone(),
            id: next_id(),
        }
    }

    /// The board this state overlays.
    pub fn board(&self) -> &Rc<Board> {
        &self.board
    }

    /// The process-unique identity of the state.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The width of the underlying board.
    pub fn width(&self) -> i32 {
        self.board.width()
    }

    /// The height of the underlying board.
    pub fn height(&self) -> i32 {
        self.board.height()
    }

    /// Whether the coordinates lie on the board.
    pub fn in_range(&self, x: i32, y: i32) -> bool {
        self.board.in_range(x, y)
    }

    /// The tile at the given coordinates: the nearest delta entry in the
    /// parent chain, or the base board's tile.
    pub fn tile_at(&self, x: i32, y: i32) -> Tile {
        if let Some(&tile) = self.delta.get(&(x, y)) {
            tile
        } else if let Some(parent) = &self.parent {
            parent.tile_at(x, y)
        } else {
            self.board.tile_at(x, y)
        }
    }

    /// Overrides the tile at the given coordinates.
    ///
    /// A no-op when the value is unchanged or the coordinates are out of
    /// range; the base board is never written to.
    pub fn set_tile(&mut self, tile: Tile, x: i32, y: i32) {
        if self.in_range(x, y) && self.tile_at(x, y) != tile {
            self.delta.insert((x, y), tile);
        }
    }

    /// Whether any cell currently resolves to a bomb.
    pub fn has_bombs(&self) -> bool {
        (0..self.height())
            .any(|y| (0..self.width()).any(|x| self.tile_at(x, y) == Tile::Bomb))
    }

    /// Whether any sensor still has an entry side left to trigger.
    pub fn has_armed_sensors(&self) -> bool {
        self.sensors.values().any(|permitted| !permitted.is_empty())
    }

    /// The entry sides the sensor at the given cell still permits.
    pub fn sensor_permits(&self, position: Coord) -> DirectionSet {
        self.sensors.get(&position).copied().unwrap_or_default()
    }

    /// Uses up one entry side of a sensor.
    pub(crate) fn consume_sensor(&mut self, position: Coord, direction: Direction) {
        if let Some(permitted) = self.sensors.get_mut(&position) {
            permitted.remove(direction.flag());
        }
    }

    /// Releases one trap's claim on a guard-wall cell; the cell empties
    /// once no trap claims it any more.
    pub(crate) fn remove_guard(&mut self, x: i32, y: i32) {
        match self.overlaps.get_mut(&(x, y)) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                self.overlaps.remove(&(x, y));
                self.set_tile(Tile::Empty, x, y);
            }
            None => self.set_tile(Tile::Empty, x, y),
        }
    }

    fn arm_guard(&mut self, x: i32, y: i32) {
        self.set_tile(Tile::Wall, x, y);
        *self.overlaps.entry((x, y)).or_insert(0) += 1;
    }

    fn init_sensor(&mut self, x: i32, y: i32) {
        let mut permitted = DirectionSet::all();
        if x == 0 || self.tile_at(x - 1, y) != Tile::Empty {
            permitted.remove(DirectionSet::RIGHT);
        }
        if x == self.width() - 1 || self.tile_at(x + 1, y) != Tile::Empty {
            permitted.remove(DirectionSet::LEFT);
        }
        if y == 0 || self.tile_at(x, y - 1) != Tile::Empty {
            permitted.remove(DirectionSet::DOWN);
        }
        if y == self.height() - 1 || self.tile_at(x, y + 1) != Tile::Empty {
            permitted.remove(DirectionSet::UP);
        }
        self.sensors.insert((x, y), permitted);
    }
}

impl Debug for BoardState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardState")
            .field("id", &self.id)
            .field("board", &self.board.id())
            .field("delta", &self.delta.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(rows: &[&str]) -> BoardState {
        BoardState::new(Rc::new(Board::from_rows(rows)), true)
    }

    #[test]
    fn delta_isolation() {
        let mut state = state(&["x p", "   "]);
        state.set_tile(Tile::Wall, 1, 1);
        assert_eq!(state.tile_at(1, 1), Tile::Wall);
        for y in 0..state.height() {
            for x in 0..state.width() {
                if (x, y) != (1, 1) && (x, y) != (2, 0) {
                    assert_eq!(state.tile_at(x, y), Tile::Empty, "at ({}, {})", x, y);
                }
            }
        }
        assert_eq!(state.board().tile_at(1, 1), Tile::Empty);
    }

    #[test]
    fn start_tile_is_cleared() {
        let state = state(&["x p"]);
        assert_eq!(state.tile_at(0, 0), Tile::Empty);
        assert_eq!(state.board().tile_at(0, 0), Tile::Start);
    }

    #[test]
    fn traps_arm_their_flanks() {
        let state = state(&["     ", "x T p", "     "]);
        assert_eq!(state.tile_at(2, 0), Tile::Wall);
        assert_eq!(state.tile_at(2, 2), Tile::Wall);
        assert_eq!(state.tile_at(2, 1), Tile::TrapH);
    }

    #[test]
    fn shared_guard_cell_counts_overlaps() {
        // Two horizontal traps one row apart share the guard cell between
        // them; both must be broken before it empties.
        let root = Rc::new(state(&["     ", " T   ", "     ", " T   ", "x   p"]));
        assert_eq!(root.tile_at(1, 2), Tile::Wall);
        let mut one = BoardState::derive(&root);
        one.remove_guard(1, 0);
        one.set_tile(Tile::Wall, 1, 1);
        one.remove_guard(1, 2);
        assert_eq!(one.tile_at(1, 2), Tile::Wall);
        one.remove_guard(1, 2);
        one.set_tile(Tile::Wall, 1, 3);
        one.remove_guard(1, 4);
        assert_eq!(one.tile_at(1, 2), Tile::Empty);
    }

    #[test]
    fn sensor_sides_need_an_open_approach() {
        // The wall right of the sensor and the top edge block two sides;
        // the approaches from the left and from below stay open.
        let state = state(&["x sw", "    "]);
        let permitted = state.sensor_permits((2, 0));
        assert!(permitted.contains(DirectionSet::RIGHT));
        assert!(permitted.contains(DirectionSet::UP));
        assert!(!permitted.contains(DirectionSet::LEFT));
        assert!(!permitted.contains(DirectionSet::DOWN));
    }

    #[test]
    fn siblings_do_not_share_sensor_state() {
        let root = Rc::new(state(&["x s ", "    ", "   p"]));
        let mut left = BoardState::derive(&root);
        left.consume_sensor((2, 0), Direction::Right);
        let right = BoardState::derive(&root);
        assert!(!left.sensor_permits((2, 0)).contains(DirectionSet::RIGHT));
        assert!(right.sensor_permits((2, 0)).contains(DirectionSet::RIGHT));
        assert!(root.sensor_permits((2, 0)).contains(DirectionSet::RIGHT));
    }

    #[test]
    fn identities_are_unique() {
        let root = Rc::new(state(&["x p"]));
        let a = BoardState::derive(&root);
        let b = BoardState::derive(&root);
        assert_ne!(a.id(), b.id());
        assert_ne!(a.id(), root.id());
    }
}
