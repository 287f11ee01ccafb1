//! The sliding physics.
//!
//! A pushed token keeps moving in one direction, one cell at a time, until
//! something stops it. Deflectors bend the slide, teleports relocate it,
//! bombs, traps and sensors end it while changing the board. The whole
//! consequence of one push is computed here, against a [`BoardState`],
//! without touching any other state.

use crate::{
    state::BoardState,
    tiles::{Coord, Direction, Tile},
};
use std::rc::Rc;

/// Tiles a slide may continue into right after breaking through a trap run.
fn passable_after_trap(tile: Tile) -> bool {
    matches!(
        tile,
        Tile::Empty
            | Tile::Exit
            | Tile::SafeExit
            | Tile::Teleport
            | Tile::DeflectorNw
            | Tile::DeflectorNe
    )
}

fn advance(position: &mut Coord, direction: Direction) {
    let (dx, dy) = direction.offset();
    position.0 += dx;
    position.1 += dy;
}

fn step_back(position: &mut Coord, direction: Direction) {
    advance(position, direction.opposite());
}

impl BoardState {
    /// Slides the token from `position` in `direction` until it rests.
    ///
    /// On a legal move, `position` is rewritten to the resting cell and the
    /// resulting state is returned: the same state when nothing changed, a
    /// derived one when the board was mutated. `None` means the move is
    /// void (the token left the grid, traced a loop back to its starting
    /// cell, or stopped where it started without changing anything) and
    /// `position` is then meaningless.
    pub fn slide(self: &Rc<Self>, position: &mut Coord, direction: Direction) -> Option<Rc<Self>> {
        let origin = *position;
        let mut dir = direction;
        loop {
            advance(position, dir);
            let (x, y) = *position;
            if !self.in_range(x, y) {
                return None;
            }
            match self.tile_at(x, y) {
                Tile::Wall => return self.stop(origin, position, dir),
                Tile::Exit | Tile::SafeExit => return Some(Rc::clone(self)),
                Tile::DeflectorNw => match dir {
                    Direction::Right | Direction::Down => return self.stop(origin, position, dir),
                    Direction::Left => dir = Direction::Down,
                    Direction::Up => dir = Direction::Right,
                },
                Tile::DeflectorNe => match dir {
                    Direction::Left | Direction::Down => return self.stop(origin, position, dir),
                    Direction::Right => dir = Direction::Down,
                    Direction::Up => dir = Direction::Left,
                },
                Tile::DeflectorSe => match dir {
                    Direction::Left | Direction::Up => return self.stop(origin, position, dir),
                    Direction::Right => dir = Direction::Up,
                    Direction::Down => dir = Direction::Left,
                },
                Tile::DeflectorSw => match dir {
                    Direction::Right | Direction::Up => return self.stop(origin, position, dir),
                    Direction::Left => dir = Direction::Up,
                    Direction::Down => dir = Direction::Right,
                },
                Tile::Bomb => {
                    let mut defused = BoardState::derive(self);
                    defused.set_tile(Tile::Empty, x, y);
                    step_back(position, dir);
                    return Some(Rc::new(defused));
                }
                trap @ (Tile::TrapH | Tile::TrapV) => return self.break_trap(trap, position, dir),
                Tile::Teleport => {
                    if let Some(other) = self.board().teleport_exit((x, y)) {
                        *position = other;
                    }
                }
                Tile::Sensor => {
                    if !self.sensor_permits((x, y)).contains(dir.flag()) {
                        return self.stop(origin, position, dir);
                    }
                    let mut tripped = BoardState::derive(self);
                    tripped.consume_sensor((x, y), dir);
                    step_back(position, dir);
                    return Some(Rc::new(tripped));
                }
                Tile::Empty | Tile::Start => {}
            }
            if *position == origin {
                return None;
            }
        }
    }

    /// Breaks through a run of trap cells: every consumed cell becomes a
    /// permanent wall and releases its guard cells, then the slide carries
    /// on past the run on the derived state.
    ///
    /// `position` is on the first trap cell of the run when called. The
    /// move is void when the tile just past the run cannot be slid into.
    fn break_trap(
        self: &Rc<Self>,
        trap: Tile,
        position: &mut Coord,
        dir: Direction,
    ) -> Option<Rc<Self>> {
        let mut broken = BoardState::derive(self);
        while self.tile_at(position.0, position.1) == trap {
            let (x, y) = *position;
            if trap == Tile::TrapH {
                broken.remove_guard(x, y - 1);
                broken.set_tile(Tile::Wall, x, y);
                broken.remove_guard(x, y + 1);
            } else {
                broken.remove_guard(x - 1, y);
                broken.set_tile(Tile::Wall, x, y);
                broken.remove_guard(x + 1, y);
            }
            advance(position, dir);
        }
        if !passable_after_trap(self.tile_at(position.0, position.1)) {
            return None;
        }
        step_back(position, dir);
        let broken = Rc::new(broken);
        let more = broken.slide(position, dir);
        Some(more.unwrap_or(broken))
    }

    /// Rests one cell short of a blocking tile. A stop on the slide's own
    /// starting cell means nothing moved, which voids the move.
    fn stop(self: &Rc<Self>, origin: Coord, position: &mut Coord, dir: Direction) -> Option<Rc<Self>> {
        step_back(position, dir);
        if *position == origin {
            None
        } else {
            Some(Rc::clone(self))
        }
    }
}
