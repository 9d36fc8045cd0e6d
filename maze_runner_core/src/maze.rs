use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::Position;

/// Smallest allowed maze dimension.
pub const MIN_DIMENSION: i32 = 5;
/// Largest allowed maze dimension.
pub const MAX_DIMENSION: i32 = 10;

/// Marker drawn at the player's position when rendering.
pub const PLAYER_MARKER: char = '@';

/// Represents errors that can occur constructing or accessing a maze.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("{axis} must be between {min} and {max}, got {value}", min = MIN_DIMENSION, max = MAX_DIMENSION)]
    InvalidDimension { axis: &'static str, value: i32 },
    #[error("Position ({x}, {y}) is out of bounds for maze size ({width}, {height})")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    #[error("Layout row {row} is {found} cells wide, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Represents the static type of a cell in the maze grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Wall,
    Start,
    Exit,
    Key,
}

impl Default for CellKind {
    fn default() -> Self {
        CellKind::Empty
    }
}

impl CellKind {
    /// The display character for this cell kind.
    pub const fn to_char(self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Wall => '#',
            CellKind::Start => 'S',
            CellKind::Exit => 'E',
            CellKind::Key => 'K',
        }
    }

    /// Maps a layout character back to a cell kind.
    ///
    /// Unrecognized characters default to [`CellKind::Empty`].
    pub const fn from_char(c: char) -> Self {
        match c {
            '#' => CellKind::Wall,
            'S' => CellKind::Start,
            'E' => CellKind::Exit,
            'K' => CellKind::Key,
            _ => CellKind::Empty,
        }
    }
}

/// Interior wall offsets for the default layout. Offsets landing on the
/// border are ignored, so smaller grids get a subset of these.
const INTERIOR_WALLS: [(i32, i32); 9] = [
    (2, 1),
    (2, 2),
    (2, 3),
    (4, 3),
    (4, 4),
    (4, 5),
    (1, 5),
    (2, 5),
    (5, 1),
];

/// A bounded rectangular grid of typed cells.
///
/// Stores cells in a flat vector using row-major order, alongside the
/// start/exit positions and the set of positions currently holding a key.
/// The key set is the authoritative source for "is there a key here":
/// [`Maze::remove_key`] clears the grid cell and the set entry together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
    start_position: Position,
    exit_position: Position,
    key_positions: HashSet<Position>,
}

impl Maze {
    /// Creates the default maze layout: border walls, a fixed set of
    /// interior walls, start at (1, 1), exit at (width-2, height-2), and
    /// up to two keys.
    pub fn create_default(width: i32, height: i32) -> Result<Self, MazeError> {
        Self::validate_dimension("Width", width)?;
        Self::validate_dimension("Height", height)?;
        Ok(Self::build_default(width, height))
    }

    /// Creates a maze from an ordered sequence of equal-length strings.
    ///
    /// Characters: '#' = wall, '.' = empty, 'S' = start, 'E' = exit,
    /// 'K' = key; anything else reads as empty. The layout defines the
    /// whole grid, including its own boundary; no border walls are added.
    pub fn from_layout<S: AsRef<str>>(layout: &[S]) -> Result<Self, MazeError> {
        let height = layout.len() as i32;
        let width = layout.first().map_or(0, |row| row.as_ref().chars().count()) as i32;
        Self::validate_dimension("Width", width)?;
        Self::validate_dimension("Height", height)?;

        let mut cells = Vec::with_capacity((width * height) as usize);
        let mut start_position = Position::new(0, 0);
        let mut exit_position = Position::new(0, 0);
        let mut key_positions = HashSet::new();

        for (y, row) in layout.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width as usize {
                return Err(MazeError::RaggedLayout {
                    row: y,
                    expected: width as usize,
                    found,
                });
            }
            for (x, c) in row.chars().enumerate() {
                let kind = CellKind::from_char(c);
                let pos = Position::new(x as i32, y as i32);
                match kind {
                    CellKind::Start => start_position = pos,
                    CellKind::Exit => exit_position = pos,
                    CellKind::Key => {
                        key_positions.insert(pos);
                    }
                    _ => {}
                }
                cells.push(kind);
            }
        }

        Ok(Maze {
            width,
            height,
            cells,
            start_position,
            exit_position,
            key_positions,
        })
    }

    /// Builds the default layout without re-validating dimensions. Callers
    /// must only pass dimensions that already passed validation.
    pub(crate) fn build_default(width: i32, height: i32) -> Self {
        let index = |pos: Position| (pos.y * width + pos.x) as usize;
        let mut cells = vec![CellKind::Empty; (width * height) as usize];

        // Border walls.
        for y in 0..height {
            for x in 0..width {
                if x == 0 || x == width - 1 || y == 0 || y == height - 1 {
                    cells[(y * width + x) as usize] = CellKind::Wall;
                }
            }
        }

        // Interior walls, skipping offsets that fall on the border.
        for (x, y) in INTERIOR_WALLS {
            if x > 0 && x < width - 1 && y > 0 && y < height - 1 {
                cells[(y * width + x) as usize] = CellKind::Wall;
            }
        }

        let start_position = Position::new(1, 1);
        let exit_position = Position::new(width - 2, height - 2);
        cells[index(start_position)] = CellKind::Start;
        cells[index(exit_position)] = CellKind::Exit;

        // Keys go only onto cells that are still empty; an occupied target
        // is silently skipped, so narrow grids may end up with fewer keys.
        let mut key_positions = HashSet::new();
        for key_pos in [Position::new(3, 2), Position::new(width - 3, height - 3)] {
            if cells[index(key_pos)] == CellKind::Empty {
                cells[index(key_pos)] = CellKind::Key;
                key_positions.insert(key_pos);
            }
        }

        Maze {
            width,
            height,
            cells,
            start_position,
            exit_position,
            key_positions,
        }
    }

    fn validate_dimension(axis: &'static str, value: i32) -> Result<(), MazeError> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
            return Err(MazeError::InvalidDimension { axis, value });
        }
        Ok(())
    }

    fn index(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    fn out_of_bounds(&self, pos: Position) -> MazeError {
        MazeError::OutOfBounds {
            x: pos.x,
            y: pos.y,
            width: self.width,
            height: self.height,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn start_position(&self) -> Position {
        self.start_position
    }

    pub fn exit_position(&self) -> Position {
        self.exit_position
    }

    /// Number of keys still on the grid.
    pub fn key_count(&self) -> usize {
        self.key_positions.len()
    }

    /// Checks whether a position lies within the grid boundaries.
    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Checks whether a position can be walked on: in bounds and not a wall.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.cells[self.index(pos)] != CellKind::Wall
    }

    /// Gets the cell kind at a position.
    pub fn cell_at(&self, pos: Position) -> Result<CellKind, MazeError> {
        if !self.in_bounds(pos) {
            return Err(self.out_of_bounds(pos));
        }
        Ok(self.cells[self.index(pos)])
    }

    /// Sets the cell kind at a position. Unconditional overwrite; used by
    /// construction routines only.
    pub fn set_cell(&mut self, pos: Position, kind: CellKind) -> Result<(), MazeError> {
        if !self.in_bounds(pos) {
            return Err(self.out_of_bounds(pos));
        }
        let index = self.index(pos);
        self.cells[index] = kind;
        Ok(())
    }

    /// Checks whether a key is present at the given position.
    pub fn has_key_at(&self, pos: Position) -> bool {
        self.key_positions.contains(&pos)
    }

    /// Removes the key at the given position, clearing the cell to empty.
    ///
    /// Returns `true` if a key was removed; `false` leaves the maze
    /// entirely unchanged.
    pub fn remove_key(&mut self, pos: Position) -> bool {
        if self.key_positions.remove(&pos) {
            let index = self.index(pos);
            self.cells[index] = CellKind::Empty;
            true
        } else {
            false
        }
    }

    /// Checks whether the given position is the exit.
    pub fn is_exit(&self, pos: Position) -> bool {
        pos == self.exit_position
    }

    /// Returns every cell within a square window of the given radius
    /// around `center`, clipped to the grid bounds.
    ///
    /// Performs no clamping of the radius and never mutates; the result
    /// holds at most (2 * radius + 1)^2 entries.
    pub fn visible_cells(&self, center: Position, radius: i32) -> HashMap<Position, CellKind> {
        let mut visible = HashMap::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let pos = center + Position::new(dx, dy);
                if self.in_bounds(pos) {
                    visible.insert(pos, self.cells[self.index(pos)]);
                }
            }
        }
        visible
    }

    /// Renders the maze as one character per cell, row by row, with the
    /// player marker substituted at the given position.
    pub fn render(&self, player: Position) -> String {
        let mut lines = Vec::with_capacity(self.height as usize);
        for y in 0..self.height {
            let mut row = String::with_capacity(self.width as usize);
            for x in 0..self.width {
                let pos = Position::new(x, y);
                if pos == player {
                    row.push(PLAYER_MARKER);
                } else {
                    row.push(self.cells[self.index(pos)].to_char());
                }
            }
            lines.push(row);
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_dimensions_outside_range() {
        assert_eq!(
            Maze::create_default(4, 7),
            Err(MazeError::InvalidDimension {
                axis: "Width",
                value: 4
            })
        );
        assert_eq!(
            Maze::create_default(7, 11),
            Err(MazeError::InvalidDimension {
                axis: "Height",
                value: 11
            })
        );
        assert!(Maze::create_default(5, 5).is_ok());
        assert!(Maze::create_default(10, 10).is_ok());
    }

    #[test]
    fn default_layout_has_border_walls() {
        let maze = Maze::create_default(7, 7).unwrap();
        for x in 0..7 {
            assert_eq!(maze.cell_at(Position::new(x, 0)).unwrap(), CellKind::Wall);
            assert_eq!(maze.cell_at(Position::new(x, 6)).unwrap(), CellKind::Wall);
        }
        for y in 0..7 {
            assert_eq!(maze.cell_at(Position::new(0, y)).unwrap(), CellKind::Wall);
            assert_eq!(maze.cell_at(Position::new(6, y)).unwrap(), CellKind::Wall);
        }
    }

    #[test]
    fn default_layout_start_and_exit() {
        let maze = Maze::create_default(8, 9).unwrap();
        assert_eq!(maze.start_position(), Position::new(1, 1));
        assert_eq!(maze.exit_position(), Position::new(6, 7));
        assert_eq!(maze.cell_at(Position::new(1, 1)).unwrap(), CellKind::Start);
        assert_eq!(maze.cell_at(Position::new(6, 7)).unwrap(), CellKind::Exit);
    }

    #[test]
    fn default_layout_key_placement_skips_occupied_cells() {
        // On a 7x7 grid the second key target (4, 4) is an interior wall,
        // so only the key at (3, 2) is placed.
        let maze = Maze::create_default(7, 7).unwrap();
        assert_eq!(maze.key_count(), 1);
        assert!(maze.has_key_at(Position::new(3, 2)));
        assert!(!maze.has_key_at(Position::new(4, 4)));

        // On 8x8 both targets are empty.
        let maze = Maze::create_default(8, 8).unwrap();
        assert_eq!(maze.key_count(), 2);
        assert!(maze.has_key_at(Position::new(3, 2)));
        assert!(maze.has_key_at(Position::new(5, 5)));
    }

    #[test]
    fn from_layout_reads_char_table() {
        let maze = Maze::from_layout(&["#####", "#SK.#", "#...#", "#..E#", "#####"]).unwrap();
        assert_eq!(maze.width(), 5);
        assert_eq!(maze.height(), 5);
        assert_eq!(maze.start_position(), Position::new(1, 1));
        assert_eq!(maze.exit_position(), Position::new(3, 3));
        assert_eq!(maze.key_count(), 1);
        assert!(maze.has_key_at(Position::new(2, 1)));
        assert_eq!(maze.cell_at(Position::new(0, 0)).unwrap(), CellKind::Wall);
        assert_eq!(maze.cell_at(Position::new(3, 1)).unwrap(), CellKind::Empty);
    }

    #[test]
    fn from_layout_unknown_chars_read_as_empty() {
        let maze = Maze::from_layout(&["#####", "#S?x#", "#...#", "#..E#", "#####"]).unwrap();
        assert_eq!(maze.cell_at(Position::new(2, 1)).unwrap(), CellKind::Empty);
        assert_eq!(maze.cell_at(Position::new(3, 1)).unwrap(), CellKind::Empty);
    }

    #[test]
    fn from_layout_rejects_ragged_rows() {
        let err = Maze::from_layout(&["#####", "#S.#", "#...#", "#..E#", "#####"]).unwrap_err();
        assert_eq!(
            err,
            MazeError::RaggedLayout {
                row: 1,
                expected: 5,
                found: 4
            }
        );
    }

    #[test]
    fn cell_access_out_of_bounds_is_an_error() {
        let mut maze = Maze::create_default(5, 5).unwrap();
        assert!(matches!(
            maze.cell_at(Position::new(5, 0)),
            Err(MazeError::OutOfBounds { x: 5, y: 0, .. })
        ));
        assert!(matches!(
            maze.set_cell(Position::new(-1, 2), CellKind::Wall),
            Err(MazeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn remove_key_is_atomic_and_idempotent() {
        let mut maze = Maze::from_layout(&["#####", "#SK.#", "#...#", "#..E#", "#####"]).unwrap();
        let key_pos = Position::new(2, 1);

        assert!(maze.remove_key(key_pos));
        assert!(!maze.has_key_at(key_pos));
        assert_eq!(maze.cell_at(key_pos).unwrap(), CellKind::Empty);

        // Second removal fails and changes nothing.
        let before = maze.clone();
        assert!(!maze.remove_key(key_pos));
        assert_eq!(maze, before);
    }

    #[test]
    fn char_table_round_trips() {
        for kind in [
            CellKind::Empty,
            CellKind::Wall,
            CellKind::Start,
            CellKind::Exit,
            CellKind::Key,
        ] {
            assert_eq!(CellKind::from_char(kind.to_char()), kind);
        }
    }

    #[test]
    fn visible_cells_full_window_in_open_area() {
        let maze = Maze::from_layout(&[
            ".......", ".......", ".......", "...S...", ".......", ".......", "......E",
        ])
        .unwrap();
        let visible = maze.visible_cells(Position::new(3, 3), 1);
        assert_eq!(visible.len(), 9);
    }

    #[test]
    fn visible_cells_clip_to_bounds() {
        let maze = Maze::create_default(7, 7).unwrap();
        let visible = maze.visible_cells(Position::new(0, 0), 1);
        assert_eq!(visible.len(), 4);
        assert!(visible.contains_key(&Position::new(0, 0)));
        assert!(!visible.contains_key(&Position::new(-1, 0)));
    }

    #[test]
    fn render_substitutes_player_marker() {
        let layout = ["#####", "#S..#", "#...#", "#..E#", "#####"];
        let maze = Maze::from_layout(&layout).unwrap();
        let rendered = maze.render(Position::new(2, 2));
        assert_eq!(rendered, "#####\n#S..#\n#.@.#\n#..E#\n#####");
    }

    proptest! {
        #[test]
        fn in_bounds_matches_range_definition(x in -20i32..20, y in -20i32..20) {
            let maze = Maze::create_default(7, 7).unwrap();
            let pos = Position::new(x, y);
            prop_assert_eq!(
                maze.in_bounds(pos),
                (0..7).contains(&x) && (0..7).contains(&y)
            );
        }

        #[test]
        fn walkable_implies_in_bounds_and_not_wall(x in -20i32..20, y in -20i32..20) {
            let maze = Maze::create_default(7, 7).unwrap();
            let pos = Position::new(x, y);
            if maze.is_walkable(pos) {
                prop_assert!(maze.in_bounds(pos));
                prop_assert_ne!(maze.cell_at(pos).unwrap(), CellKind::Wall);
            }
        }

        #[test]
        fn visibility_stays_within_window(cx in 0i32..7, cy in 0i32..7, radius in 0i32..5) {
            let maze = Maze::create_default(7, 7).unwrap();
            let center = Position::new(cx, cy);
            let visible = maze.visible_cells(center, radius);
            let side = 2 * radius + 1;
            prop_assert!(visible.len() <= (side * side) as usize);
            for pos in visible.keys() {
                prop_assert!(maze.in_bounds(*pos));
                prop_assert!((pos.x - cx).abs() <= radius);
                prop_assert!((pos.y - cy).abs() <= radius);
            }
        }
    }
}
