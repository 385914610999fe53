//! Immutable cell grid describing a single floor.

use thiserror::Error;

use crate::{CellKind, Point};

/// Errors raised while constructing a [`Map`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// The layout contained no rows or no columns.
    #[error("map layout is empty")]
    Empty,
    /// A layout row did not match the width of the first row.
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A layout row contained a glyph with no cell meaning.
    #[error("unknown glyph {glyph:?} at ({column}, {row})")]
    UnknownGlyph {
        /// Glyph that could not be interpreted.
        glyph: char,
        /// Column of the glyph.
        column: usize,
        /// Row of the glyph.
        row: usize,
    },
    /// The cell buffer did not hold exactly `width * height` entries.
    #[error("expected {expected} cells for the declared dimensions, found {found}")]
    CellCount {
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell count provided.
        found: usize,
    },
}

/// Row-major grid of cells. Queries outside the grid observe [`CellKind::Wall`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Map {
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
}

impl Map {
    /// Builds a map from a row-major cell buffer.
    pub fn from_cells(width: u32, height: u32, cells: Vec<CellKind>) -> Result<Self, MapError> {
        let expected = (width as usize).saturating_mul(height as usize);
        if expected == 0 {
            return Err(MapError::Empty);
        }
        if cells.len() != expected {
            return Err(MapError::CellCount {
                expected,
                found: cells.len(),
            });
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Builds a map by evaluating `cell_at` for every coordinate in row-major
    /// order. Dimensions below one are raised to one.
    pub fn from_fn<F>(width: u32, height: u32, mut cell_at: F) -> Self
    where
        F: FnMut(Point) -> CellKind,
    {
        let width = width.max(1);
        let height = height.max(1);
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            for column in 0..width {
                cells.push(cell_at(Point::new(column as i32, row as i32)));
            }
        }

        Self {
            width,
            height,
            cells,
        }
    }

    /// Parses a textual layout where `#` is wall, `.` or a space is empty and
    /// `>` marks stairs.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let Some(first) = rows.first() else {
            return Err(MapError::Empty);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(MapError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(MapError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found,
                });
            }

            for (column, glyph) in row.chars().enumerate() {
                let cell = match glyph {
                    '#' => CellKind::Wall,
                    '.' | ' ' => CellKind::Empty,
                    '>' => CellKind::Stairs,
                    _ => {
                        return Err(MapError::UnknownGlyph {
                            glyph,
                            column,
                            row: row_index,
                        })
                    }
                };
                cells.push(cell);
            }
        }

        Self::from_cells(width as u32, rows.len() as u32, cells)
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Cell stored at the coordinate, or [`CellKind::Wall`] outside the grid.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> CellKind {
        self.index(x, y)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(CellKind::Wall)
    }

    /// Cell stored at the point, or [`CellKind::Wall`] outside the grid.
    #[must_use]
    pub fn cell_at(&self, point: Point) -> CellKind {
        self.cell(point.x(), point.y())
    }

    /// Reports whether the coordinate blocks movement and rays.
    #[must_use]
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.cell(x, y) == CellKind::Wall
    }

    /// Dense row-major cell storage.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// Number of cells that are not walls.
    #[must_use]
    pub fn open_cell_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_passable()).count()
    }

    /// Iterates the coordinates of every non-wall cell in row-major order.
    pub fn iter_open_cells(&self) -> impl Iterator<Item = Point> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_passable())
            .map(move |(index, _)| Point::new((index % width) as i32, (index / width) as i32))
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let column = u32::try_from(x).ok()?;
        let row = u32::try_from(y).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        Some(row as usize * width + column as usize)
    }
}
