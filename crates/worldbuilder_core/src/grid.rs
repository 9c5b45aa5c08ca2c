//! Dense grid storage and cell coordinates
//!
//! Coordinates are y-down: `Up` is `y - 1`, `Down` is `y + 1`. Storage is
//! row-major (`index = y * width + x`).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::WorldError;

/// A cell position inside a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: u32,
    pub y: u32,
}

impl GridCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Offset by a signed delta. Returns `None` if either axis leaves `u32` range.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = u32::try_from(i64::from(self.x) + i64::from(dx)).ok()?;
        let y = u32::try_from(i64::from(self.y) + i64::from(dy)).ok()?;
        Some(Self { x, y })
    }

    /// Convert signed input into a coordinate inside a `width` x `height`
    /// area. Never clamps.
    pub fn checked(x: i32, y: i32, width: u32, height: u32) -> Result<Self, WorldError> {
        let out_of_bounds = || WorldError::OutOfBounds {
            x: i64::from(x),
            y: i64::from(y),
            width,
            height,
        };
        let cx = u32::try_from(x).map_err(|_| out_of_bounds())?;
        let cy = u32::try_from(y).map_err(|_| out_of_bounds())?;
        if cx < width && cy < height {
            Ok(Self::new(cx, cy))
        } else {
            Err(out_of_bounds())
        }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal neighbor directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Order in which neighbors are visited during propagation
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit step `(dx, dy)` in y-down coordinates
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// Occupancy of the 4 orthogonal neighbors of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Neighbors {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Neighbors {
    pub const TOP: u8 = 0b0001;
    pub const BOTTOM: u8 = 0b0010;
    pub const LEFT: u8 = 0b0100;
    pub const RIGHT: u8 = 0b1000;

    pub const NONE: Self = Self::new(false, false, false, false);
    pub const ALL: Self = Self::new(true, true, true, true);

    pub const fn new(top: bool, bottom: bool, left: bool, right: bool) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Pack into a 4-bit mask (`TOP | BOTTOM | LEFT | RIGHT`)
    pub const fn mask(self) -> u8 {
        (self.top as u8) * Self::TOP
            | (self.bottom as u8) * Self::BOTTOM
            | (self.left as u8) * Self::LEFT
            | (self.right as u8) * Self::RIGHT
    }

    /// Unpack a 4-bit mask. Higher bits are ignored.
    pub const fn from_mask(mask: u8) -> Self {
        Self {
            top: mask & Self::TOP != 0,
            bottom: mask & Self::BOTTOM != 0,
            left: mask & Self::LEFT != 0,
            right: mask & Self::RIGHT != 0,
        }
    }

    /// Every one of the 16 possible patterns, in mask order
    pub fn all_patterns() -> impl Iterator<Item = Neighbors> {
        (0u8..16).map(Self::from_mask)
    }

    /// Build the pattern for `coord` from an occupancy predicate.
    /// The predicate is only called for in-bounds neighbors.
    pub fn from_fn<T>(grid: &Grid<T>, coord: GridCoord, occupied: impl Fn(&T) -> bool) -> Self {
        let has = |dir: Direction| {
            grid.neighbor(coord, dir)
                .and_then(|n| grid.get(n))
                .is_some_and(&occupied)
        };
        Self {
            top: has(Direction::Up),
            bottom: has(Direction::Down),
            left: has(Direction::Left),
            right: has(Direction::Right),
        }
    }
}

impl fmt::Display for Neighbors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "[{}{}{}{}]",
            flag(self.top, 'T'),
            flag(self.bottom, 'B'),
            flag(self.left, 'L'),
            flag(self.right, 'R')
        )
    }
}

/// Fixed-size dense 2D storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `fill`
    pub fn new(width: u32, height: u32, fill: T) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![fill; size],
        }
    }

    /// Reset every cell to `value`
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Convert signed input into a coordinate, rejecting anything outside
    /// `[0, width) x [0, height)`
    pub fn checked_coord(&self, x: i32, y: i32) -> Result<GridCoord, WorldError> {
        GridCoord::checked(x, y, self.width, self.height)
    }

    /// Fail with `OutOfBounds` unless `coord` is inside the grid
    pub fn ensure_contains(&self, coord: GridCoord) -> Result<(), WorldError> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(self.out_of_bounds(coord))
        }
    }

    fn out_of_bounds(&self, coord: GridCoord) -> WorldError {
        WorldError::OutOfBounds {
            x: i64::from(coord.x),
            y: i64::from(coord.y),
            width: self.width,
            height: self.height,
        }
    }

    fn index(&self, coord: GridCoord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.y as usize * self.width as usize + coord.x as usize)
    }

    pub fn get(&self, coord: GridCoord) -> Option<&T> {
        self.index(coord).map(|idx| &self.cells[idx])
    }

    pub fn get_mut(&mut self, coord: GridCoord) -> Option<&mut T> {
        self.index(coord).map(move |idx| &mut self.cells[idx])
    }

    /// Replace the value at `coord`, returning the previous one
    pub fn set(&mut self, coord: GridCoord, value: T) -> Result<T, WorldError> {
        let idx = self
            .index(coord)
            .ok_or_else(|| self.out_of_bounds(coord))?;
        Ok(std::mem::replace(&mut self.cells[idx], value))
    }

    /// The in-bounds neighbor of `coord` in `dir`, if any
    pub fn neighbor(&self, coord: GridCoord, dir: Direction) -> Option<GridCoord> {
        let (dx, dy) = dir.delta();
        coord.offset(dx, dy).filter(|n| self.contains(*n))
    }

    /// In-bounds orthogonal neighbors in propagation order
    pub fn neighbors(&self, coord: GridCoord) -> impl Iterator<Item = GridCoord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(coord, dir))
    }

    /// Iterate cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &T)> {
        let width = self.width.max(1);
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            let idx = idx as u32;
            (GridCoord::new(idx % width, idx / width), cell)
        })
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }
}
