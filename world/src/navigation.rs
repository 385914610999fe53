//! Breadth-first reachability field shared by generation and validation.

use std::collections::VecDeque;

use depthcrawl_core::{Direction, Map, Point};

/// Dense breadth-first distance grid seeded from a single origin.
///
/// Distances are stored row-major in a flat buffer sized `width * height`,
/// with `u32::MAX` marking cells the search never reached. The visit order is
/// retained so callers can resolve ties by discovery order; neighbours are
/// expanded east, west, south and north.
#[derive(Clone, Debug)]
pub struct ReachabilityField {
    width: u32,
    height: u32,
    origin: Point,
    distances: Vec<u32>,
    order: Vec<Point>,
}

impl ReachabilityField {
    /// Runs the search over the map's non-wall cells.
    #[must_use]
    pub fn from_map(map: &Map, origin: Point) -> Self {
        Self::build_with(map.width(), map.height(), origin, |cell| {
            map.is_wall(cell.x(), cell.y())
        })
    }

    /// Runs the search over a `width * height` grid using a caller supplied
    /// blocking predicate. The origin is always expanded when it lies inside
    /// the grid.
    pub fn build_with<F>(width: u32, height: u32, origin: Point, mut is_blocked: F) -> Self
    where
        F: FnMut(Point) -> bool,
    {
        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        let mut field = Self {
            width,
            height,
            origin,
            distances: vec![u32::MAX; cell_count],
            order: Vec::new(),
        };

        let Some(origin_index) = field.index(origin) else {
            return field;
        };

        field.distances[origin_index] = 0;
        let mut queue = VecDeque::with_capacity(cell_count);
        queue.push_back(origin);

        while let Some(cell) = queue.pop_front() {
            field.order.push(cell);
            let Some(current_index) = field.index(cell) else {
                continue;
            };
            let next_distance = field.distances[current_index].saturating_add(1);

            for direction in Direction::ALL {
                let (dx, dy) = direction.delta();
                let neighbor = cell.offset(dx, dy);
                let Some(neighbor_index) = field.index(neighbor) else {
                    continue;
                };

                if field.distances[neighbor_index] != u32::MAX {
                    continue;
                }

                if is_blocked(neighbor) {
                    continue;
                }

                field.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }

        field
    }

    /// Cell the search started from.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Breadth-first distance to the cell, if it was reached.
    #[must_use]
    pub fn distance(&self, cell: Point) -> Option<u32> {
        self.index(cell)
            .and_then(|index| self.distances.get(index).copied())
            .filter(|distance| *distance != u32::MAX)
    }

    /// Reports whether the search reached the cell.
    #[must_use]
    pub fn is_reachable(&self, cell: Point) -> bool {
        self.distance(cell).is_some()
    }

    /// Number of cells reached, the origin included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.order.len()
    }

    /// Cells in the order the search dequeued them.
    #[must_use]
    pub fn visit_order(&self) -> &[Point] {
        &self.order
    }

    /// First cell dequeued at the maximal distance, or the origin when
    /// nothing else was reached.
    #[must_use]
    pub fn farthest(&self) -> Point {
        let mut best = self.origin;
        let mut best_distance = 0;
        for &cell in &self.order {
            let distance = self.distance(cell).unwrap_or(0);
            if distance > best_distance {
                best_distance = distance;
                best = cell;
            }
        }
        best
    }

    /// First reached cell in visit order that differs from `excluded`.
    #[must_use]
    pub fn first_other_than(&self, excluded: Point) -> Option<Point> {
        self.order.iter().copied().find(|cell| *cell != excluded)
    }

    fn index(&self, cell: Point) -> Option<usize> {
        let column = u32::try_from(cell.x()).ok()?;
        let row = u32::try_from(cell.y()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        usize::try_from(row)
            .ok()?
            .checked_mul(width)?
            .checked_add(usize::try_from(column).ok()?)
    }
}
