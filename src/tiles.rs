//! Tiles and directions.

use bitflags::bitflags;
use educe::Educe;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The coordinates of a cell.
///
/// `(x-coordinate, y-coordinate)`, both 0-indexed, growing right and down.
pub type Coord = (i32, i32);

/// The content of a single cell on a board.
///
/// Each tile has a fixed single-character encoding, used in the row strings
/// a [`Board`](crate::Board) is built from. Characters without a meaning
/// decode to [`Empty`](Tile::Empty).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Educe)]
#[educe(Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Tile {
    /// Nothing; the token slides across it. Encoded as `' '`.
    #[educe(Default)]
    Empty,
    /// Stops the token one cell short. Encoded as `'w'`.
    Wall,
    /// Defused when hit: the cell empties and the token is pushed back one
    /// step. Encoded as `'B'`.
    Bomb,
    /// The exit. Encoded as `'p'`.
    Exit,
    /// An exit that only works once every bomb has been defused.
    /// Encoded as `'P'`.
    SafeExit,
    /// The starting cell of the token. Encoded as `'x'`.
    Start,
    /// A deflector whose solid quarter fills the north-west corner:
    /// it bends a leftward slide down and an upward slide right,
    /// and blocks the other two. Encoded as `'a'`.
    DeflectorNw,
    /// North-east deflector: bends rightward down and upward left.
    /// Encoded as `'b'`.
    DeflectorNe,
    /// South-east deflector: bends rightward up and downward left.
    /// Encoded as `'c'`.
    DeflectorSe,
    /// South-west deflector: bends leftward up and downward right.
    /// Encoded as `'d'`.
    DeflectorSw,
    /// A trap crossed horizontally, guarded by walls above and below.
    /// Encoded as `'T'`.
    TrapH,
    /// A trap crossed vertically, guarded by walls left and right.
    /// Encoded as `'t'`.
    TrapV,
    /// One end of a teleport pair. Encoded as `'h'`.
    Teleport,
    /// A one-shot gate: each initially open entry side works exactly once.
    /// Encoded as `'s'`.
    Sensor,
}

impl Tile {
    /// Decodes a tile from its character encoding.
    ///
    /// Unrecognized characters decode to [`Empty`](Tile::Empty).
    pub fn from_char(c: char) -> Self {
        match c {
            'w' => Tile::Wall,
            'B' => Tile::Bomb,
            'p' => Tile::Exit,
            'P' => Tile::SafeExit,
            'x' => Tile::Start,
            'a' => Tile::DeflectorNw,
            'b' => Tile::DeflectorNe,
            'c' => Tile::DeflectorSe,
            'd' => Tile::DeflectorSw,
            'T' => Tile::TrapH,
            't' => Tile::TrapV,
            'h' => Tile::Teleport,
            's' => Tile::Sensor,
            _ => Tile::Empty,
        }
    }

    /// The character encoding of the tile.
    pub fn to_char(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => 'w',
            Tile::Bomb => 'B',
            Tile::Exit => 'p',
            Tile::SafeExit => 'P',
            Tile::Start => 'x',
            Tile::DeflectorNw => 'a',
            Tile::DeflectorNe => 'b',
            Tile::DeflectorSe => 'c',
            Tile::DeflectorSw => 'd',
            Tile::TrapH => 'T',
            Tile::TrapV => 't',
            Tile::Teleport => 'h',
            Tile::Sensor => 's',
        }
    }

    /// Whether this tile ends a play when the token reaches it.
    pub(crate) fn is_exit(self) -> bool {
        matches!(self, Tile::Exit | Tile::SafeExit)
    }
}

/// A direction the token can be pushed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Direction {
    /// All four directions, in the order the solver tries them.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
    ];

    /// The unit offset of the direction, as `(dx, dy)`.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
        }
    }

    /// The opposite direction.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }

    /// The direction as a [`DirectionSet`] with a single bit set.
    pub fn flag(self) -> DirectionSet {
        match self {
            Direction::Up => DirectionSet::UP,
            Direction::Down => DirectionSet::DOWN,
            Direction::Right => DirectionSet::RIGHT,
            Direction::Left => DirectionSet::LEFT,
        }
    }
}

bitflags! {
    /// A set of directions.
    ///
    /// Used for the entry sides a sensor still permits.
    #[derive(Default)]
    pub struct DirectionSet: u8 {
        const UP = 0b0001;
        const DOWN = 0b0010;
        const RIGHT = 0b0100;
        const LEFT = 0b1000;
    }
}
