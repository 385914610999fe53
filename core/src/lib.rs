#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Depthcrawl engine.
//!
//! This crate defines the vocabulary that connects the world generator, the
//! pure systems and the adapters. The world produces immutable [`Map`] values
//! and spawn/stairs [`Point`]s, systems read them together with the
//! [`Player`] pose, and every visual decision is written through the
//! [`Canvas`] trait so that adapters decide how cells reach a display.
//! Reproducible per-frame randomness lives in the [`noise`] module.

mod map;
pub mod noise;
mod player;

use serde::{Deserialize, Serialize};

pub use map::{Map, MapError};
pub use player::Player;

/// Glyph drawn for the stairs cell in every presentation of a floor.
pub const STAIRS_GLYPH: char = '>';

/// Integer grid coordinate addressing a single map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate displaced by the provided offsets.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Kinds of cells that compose a map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Walkable open space.
    Empty,
    /// Solid rock that blocks movement and rays.
    #[default]
    Wall,
    /// Walkable cell leading down to the next floor.
    Stairs,
}

impl CellKind {
    /// Reports whether the player may stand on the cell.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// Cardinal directions on the grid. Rows grow southward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in the order used by breadth-first expansion.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    /// Unit grid offset travelled when stepping in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Named colors understood by character-cell displays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Terminal default color.
    #[default]
    Reset,
    /// Black.
    Black,
    /// White.
    White,
    /// Dark blue.
    DarkBlue,
    /// Dark gray.
    DarkGray,
    /// Yellow.
    Yellow,
    /// Dark magenta.
    DarkMagenta,
    /// Red.
    Red,
    /// Fuchsia.
    Fuchsia,
    /// Dark red.
    DarkRed,
    /// Green.
    Green,
    /// Aqua.
    Aqua,
}

/// Foreground and background colors applied to a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellStyle {
    foreground: Color,
    background: Color,
}

impl CellStyle {
    /// Creates a style from explicit colors.
    #[must_use]
    pub const fn new(foreground: Color, background: Color) -> Self {
        Self {
            foreground,
            background,
        }
    }

    /// Style with the provided foreground over the terminal default background.
    #[must_use]
    pub const fn foreground_only(foreground: Color) -> Self {
        Self::new(foreground, Color::Reset)
    }

    /// Returns a copy of the style with a replaced foreground color.
    #[must_use]
    pub const fn with_foreground(self, foreground: Color) -> Self {
        Self {
            foreground,
            background: self.background,
        }
    }

    /// Foreground color of the cell.
    #[must_use]
    pub const fn foreground(&self) -> Color {
        self.foreground
    }

    /// Background color of the cell.
    #[must_use]
    pub const fn background(&self) -> Color {
        self.background
    }
}

/// Screen-drawing collaborator that receives per-cell glyph writes.
///
/// Implementors must ignore writes that fall outside [`Canvas::size`] so
/// producers never need to clip defensively.
pub trait Canvas {
    /// Dimensions of the drawable area as `(width, height)` in cells.
    fn size(&self) -> (u32, u32);

    /// Writes a glyph with the provided style at the given cell.
    fn set_cell(&mut self, x: u32, y: u32, glyph: char, style: CellStyle);
}
