//! The static board.

use crate::tiles::{Coord, Tile};
use std::{
    fmt::{self, Display, Formatter},
    sync::atomic::{AtomicU64, Ordering},
};

#[cfg(feature = "serde")]
use serde::{de::Deserializer, ser::SerializeSeq, Deserialize, Serialize, Serializer};

/// The shared counter behind board and state identities.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Hands out a process-unique, strictly increasing identity.
pub(crate) fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// The static definition of a puzzle: a grid of tiles plus the named
/// positions the physics cares about.
///
/// A board is built once, either [from row strings](Board::from_rows) or
/// [cell by cell](Board::place), and is never mutated while a search runs
/// on it. Every board carries a process-unique identity; identity, not tile
/// content, is what makes two boards "the same" to the solver.
#[derive(Debug)]
pub struct Board {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    start: Option<Coord>,
    exit: Option<Coord>,
    teleports: Vec<Coord>,
    id: u64,
}

impl Board {
    /// Creates an empty board of the given dimensions.
    ///
    /// Non-positive dimensions yield a board with no cells; every
    /// coordinate of such a board is out of range.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Board {
            width,
            height,
            tiles: vec![Tile::Empty; (width * height) as usize],
            start: None,
            exit: None,
            teleports: Vec::with_capacity(2),
            id: next_id(),
        }
    }

    /// Decodes a board from one string per row.
    ///
    /// The height is the number of rows and the width the length of the
    /// longest row; missing cells and unrecognized characters are
    /// [`Empty`](Tile::Empty). Placement follows the same policy as
    /// [`place`](Board::place), so the last `Start`, exit or teleport
    /// occurrence wins its slot.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let height = rows.len() as i32;
        let width = rows
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0) as i32;
        let mut board = Board::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.as_ref().chars().enumerate() {
                board.place(Tile::from_char(c), x as i32, y as i32);
            }
        }
        board
    }

    /// The width of the board.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// The height of the board.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The process-unique identity of the board.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The starting cell of the token, if one has been placed.
    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    /// The exit cell, if one has been placed.
    pub fn exit(&self) -> Option<Coord> {
        self.exit
    }

    /// The teleport cells, oldest first. At most two.
    pub fn teleports(&self) -> &[Coord] {
        &self.teleports
    }

    /// Whether the coordinates lie on the board.
    pub fn in_range(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// The tile at the given coordinates.
    ///
    /// Out-of-range coordinates are [`Empty`](Tile::Empty); this never
    /// fails.
    pub fn tile_at(&self, x: i32, y: i32) -> Tile {
        if self.in_range(x, y) {
            self.tiles[(y * self.width + x) as usize]
        } else {
            Tile::Empty
        }
    }

    /// Places a tile, maintaining the named-position slots.
    ///
    /// The last `Start` placed wins the start slot and the displaced cell
    /// empties; the same goes for the exit slot, shared by both exit kinds.
    /// A third teleport evicts the oldest one. A trap in the boundary
    /// row/column next to the grid edge is rejected and the cell left as it
    /// was, since its guard cells would lie off the grid. Out-of-range
    /// placements are ignored.
    pub fn place(&mut self, tile: Tile, x: i32, y: i32) {
        if !self.in_range(x, y) {
            return;
        }
        if tile == Tile::TrapH && (y == 0 || y == self.height - 1) {
            return;
        }
        if tile == Tile::TrapV && (x == 0 || x == self.width - 1) {
            return;
        }
        match tile {
            Tile::Start => {
                if let Some((px, py)) = self.start {
                    self.set(Tile::Empty, px, py);
                }
                self.start = Some((x, y));
            }
            Tile::Exit | Tile::SafeExit => {
                if let Some((px, py)) = self.exit {
                    self.set(Tile::Empty, px, py);
                }
                self.exit = Some((x, y));
            }
            Tile::Teleport => {
                if !self.teleports.contains(&(x, y)) {
                    if self.teleports.len() == 2 {
                        let (px, py) = self.teleports.remove(0);
                        self.set(Tile::Empty, px, py);
                    }
                    self.teleports.push((x, y));
                }
            }
            _ => {
                if self.start == Some((x, y)) {
                    self.start = None;
                } else if self.exit == Some((x, y)) {
                    self.exit = None;
                }
                if self.tile_at(x, y) == Tile::Teleport {
                    self.teleports.retain(|&p| p != (x, y));
                }
            }
        }
        self.set(tile, x, y);
    }

    /// The cell a slide entering the given teleport continues from.
    ///
    /// Returns `None` for a cell that is not a registered teleport; with a
    /// single registered teleport the cell maps to itself.
    pub(crate) fn teleport_exit(&self, from: Coord) -> Option<Coord> {
        let i = self.teleports.iter().position(|&p| p == from)?;
        Some(self.teleports[(i + 1) % self.teleports.len()])
    }

    /// Encodes the board back into one string per row.
    pub fn rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| (0..self.width).map(|x| self.tile_at(x, y).to_char()).collect())
            .collect()
    }

    fn set(&mut self, tile: Tile, x: i32, y: i32) {
        self.tiles[(y * self.width + x) as usize] = tile;
    }
}

/// A clone receives a fresh identity: it is a new board that merely has the
/// same content.
impl Clone for Board {
    fn clone(&self) -> Self {
        Board {
            width: self.width,
            height: self.height,
            tiles: self.tiles.clone(),
            start: self.start,
            exit: self.exit,
            teleports: self.teleports.clone(),
            id: next_id(),
        }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// Serializes as the row strings of [`rows`](Board::rows); the identity is
/// process-local and is not part of the encoding.
#[cfg(feature = "serde")]
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.height as usize))?;
        for row in self.rows() {
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Ok(Board::from_rows(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_placement_wins() {
        let mut board = Board::new(4, 4);
        board.place(Tile::Start, 0, 0);
        board.place(Tile::Start, 2, 2);
        assert_eq!(board.start(), Some((2, 2)));
        assert_eq!(board.tile_at(0, 0), Tile::Empty);
        board.place(Tile::Exit, 1, 1);
        board.place(Tile::SafeExit, 3, 3);
        assert_eq!(board.exit(), Some((3, 3)));
        assert_eq!(board.tile_at(1, 1), Tile::Empty);
    }

    #[test]
    fn third_teleport_evicts_oldest() {
        let mut board = Board::new(4, 4);
        board.place(Tile::Teleport, 0, 0);
        board.place(Tile::Teleport, 1, 0);
        board.place(Tile::Teleport, 2, 0);
        assert_eq!(board.teleports(), &[(1, 0), (2, 0)]);
        assert_eq!(board.tile_at(0, 0), Tile::Empty);
    }

    #[test]
    fn trap_rejected_at_edges() {
        let mut board = Board::new(4, 4);
        board.place(Tile::TrapH, 1, 0);
        board.place(Tile::TrapH, 1, 3);
        board.place(Tile::TrapV, 0, 1);
        board.place(Tile::TrapV, 3, 1);
        assert_eq!(board.rows().join(""), " ".repeat(16));
        board.place(Tile::TrapH, 1, 2);
        assert_eq!(board.tile_at(1, 2), Tile::TrapH);
    }

    #[test]
    fn overwriting_a_named_tile_clears_its_slot() {
        let mut board = Board::new(4, 4);
        board.place(Tile::Start, 1, 1);
        board.place(Tile::Wall, 1, 1);
        assert_eq!(board.start(), None);
        board.place(Tile::Teleport, 2, 2);
        board.place(Tile::Wall, 2, 2);
        assert!(board.teleports().is_empty());
    }

    #[test]
    fn rows_round_trip() {
        let rows = ["x  w", "aBcd", " tt ", "h  p"];
        let board = Board::from_rows(&rows);
        assert_eq!(board.rows(), rows);
        assert_eq!(board.start(), Some((0, 0)));
        assert_eq!(board.exit(), Some((3, 3)));
        assert_eq!(board.teleports(), &[(0, 3)]);
    }

    #[test]
    fn clones_are_distinct_boards() {
        let board = Board::from_rows(&["x p"]);
        let copy = board.clone();
        assert_ne!(board.id(), copy.id());
        assert_eq!(board.rows(), copy.rows());
    }
}
