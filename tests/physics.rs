//! Slide physics, exercised one push at a time.

use boxslide::{Board, BoardState, Direction, Tile};
use std::rc::Rc;

fn state(rows: &[&str]) -> Rc<BoardState> {
    Rc::new(BoardState::new(Rc::new(Board::from_rows(rows)), true))
}

#[test]
fn wall_stops_one_short() {
    let root = state(&["x  w"]);
    let mut position = (0, 0);
    let after = root.slide(&mut position, Direction::Right).unwrap();
    assert_eq!(position, (2, 0));
    assert!(Rc::ptr_eq(&root, &after));
}

#[test]
fn stop_on_the_starting_cell_is_void() {
    let root = state(&["xw"]);
    let mut position = (0, 0);
    assert!(root.slide(&mut position, Direction::Right).is_none());
}

#[test]
fn sliding_off_the_grid_is_void() {
    let root = state(&["x  "]);
    for direction in Direction::ALL {
        let mut position = (0, 0);
        assert!(root.slide(&mut position, direction).is_none());
    }
}

#[test]
fn bomb_defuses_and_pushes_back() {
    let root = state(&["x B p"]);
    let mut position = (0, 0);
    let after = root.slide(&mut position, Direction::Right).unwrap();
    assert_eq!(position, (1, 0));
    assert!(!Rc::ptr_eq(&root, &after));
    assert_eq!(after.tile_at(2, 0), Tile::Empty);
    assert!(!after.has_bombs());
    // The root is untouched; the defusal lives in the derived state only.
    assert_eq!(root.tile_at(2, 0), Tile::Bomb);
    assert!(root.has_bombs());
}

#[test]
fn bomb_defusal_on_the_spot_is_still_a_move() {
    let root = state(&["xBp"]);
    let mut position = (0, 0);
    let after = root.slide(&mut position, Direction::Right).unwrap();
    assert_eq!(position, (0, 0));
    assert!(!after.has_bombs());
}

#[test]
fn deflector_bends_the_slide() {
    let root = state(&["  a p", "     ", "  x  "]);
    let mut position = (2, 2);
    let after = root.slide(&mut position, Direction::Up).unwrap();
    assert_eq!(position, (4, 0));
    assert!(Rc::ptr_eq(&root, &after));
}

#[test]
fn deflector_blocks_its_solid_sides() {
    let root = state(&["x a "]);
    let mut position = (0, 0);
    let after = root.slide(&mut position, Direction::Right).unwrap();
    assert_eq!(position, (1, 0));
    assert!(Rc::ptr_eq(&root, &after));
}

#[test]
fn deflector_loop_through_the_start_is_void() {
    // Right from the token runs a full circle through four deflectors and
    // re-enters the starting cell without ever stopping.
    let root = state(&["   ", "axb", "d c"]);
    let mut position = (1, 1);
    assert!(root.slide(&mut position, Direction::Right).is_none());
}

#[test]
fn teleport_relocates_the_slide() {
    let root = state(&["x h   ", "    hp"]);
    let mut position = (0, 0);
    let after = root.slide(&mut position, Direction::Right).unwrap();
    assert_eq!(position, (5, 1));
    assert!(Rc::ptr_eq(&root, &after));
}

#[test]
fn lone_teleport_passes_the_slide_through() {
    let root = state(&["x h w"]);
    let mut position = (0, 0);
    let after = root.slide(&mut position, Direction::Right).unwrap();
    assert_eq!(position, (3, 0));
    assert!(Rc::ptr_eq(&root, &after));
}

#[test]
fn sensor_side_works_exactly_once() {
    let root = state(&["x sw", "wwww"]);
    assert!(root.has_armed_sensors());

    let mut position = (0, 0);
    let tripped = root.slide(&mut position, Direction::Right).unwrap();
    assert_eq!(position, (1, 0));
    assert!(!Rc::ptr_eq(&root, &tripped));
    assert!(!tripped.has_armed_sensors());

    // Entering again from the same side now stops like a wall: resting on
    // the starting cell voids the move, a longer approach rests short.
    let mut position = (1, 0);
    assert!(tripped.slide(&mut position, Direction::Right).is_none());
    let mut position = (0, 0);
    let after = tripped.slide(&mut position, Direction::Right).unwrap();
    assert_eq!(position, (1, 0));
    assert!(Rc::ptr_eq(&tripped, &after));

    // The root still has its side; siblings derive from it untouched.
    let mut position = (0, 0);
    assert!(root.slide(&mut position, Direction::Right).is_some());
}

#[test]
fn trap_breaks_into_walls_and_frees_its_guards() {
    let root = state(&["     ", "x T p", "     "]);
    assert_eq!(root.tile_at(2, 0), Tile::Wall);
    assert_eq!(root.tile_at(2, 2), Tile::Wall);

    let mut position = (0, 1);
    let after = root.slide(&mut position, Direction::Right).unwrap();
    assert_eq!(position, (4, 1));
    assert_eq!(after.tile_at(2, 1), Tile::Wall);
    assert_eq!(after.tile_at(2, 0), Tile::Empty);
    assert_eq!(after.tile_at(2, 2), Tile::Empty);
    assert_eq!(root.tile_at(2, 1), Tile::TrapH);
}

#[test]
fn trap_run_into_a_wall_is_void() {
    let root = state(&["     ", "x TTw", "     "]);
    let mut position = (0, 1);
    assert!(root.slide(&mut position, Direction::Right).is_none());
}

#[test]
fn vertical_trap_breaks_downward() {
    let root = state(&[" x ", " t ", " p "]);
    assert_eq!(root.tile_at(0, 1), Tile::Wall);
    assert_eq!(root.tile_at(2, 1), Tile::Wall);

    let mut position = (1, 0);
    let after = root.slide(&mut position, Direction::Down).unwrap();
    assert_eq!(position, (1, 2));
    assert_eq!(after.tile_at(1, 1), Tile::Wall);
    assert_eq!(after.tile_at(0, 1), Tile::Empty);
    assert_eq!(after.tile_at(2, 1), Tile::Empty);
}
