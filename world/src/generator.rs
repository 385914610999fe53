//! Random-walk floor carving with reachability-driven stairs placement.

use depthcrawl_core::{noise::clamp01, CellKind, Map, Point};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::navigation::ReachabilityField;

/// Smallest accepted floor edge, outer wall ring included.
pub const MIN_MAP_SIZE: u32 = 5;
/// Largest accepted floor edge.
pub const MAX_MAP_SIZE: u32 = 1024;
/// Odd multiplier folding the depth into the per-floor seed.
pub const SEED_DEPTH_MULTIPLIER: u64 = 1_000_003;

const DEPTH_SCALE_MAX: f64 = 50.0;
const BASE_OPEN_FRACTION: f64 = 0.50;
const OPEN_FRACTION_DROP: f64 = 0.22;
const MIN_OPEN_FRACTION: f64 = 0.28;
const BASE_TURN_CHANCE: f64 = 0.25;
const TURN_CHANCE_INCREASE: f64 = 0.45;
const MAX_STEPS_PER_CELL: usize = 12;
const MIN_TARGET_OPEN_CELLS: usize = 2;

/// Derives the seed used for a floor's local random source.
#[must_use]
pub const fn depth_seed(seed: u64, depth: u32) -> u64 {
    seed.wrapping_add((depth as u64).wrapping_mul(SEED_DEPTH_MULTIPLIER))
}

/// Carves floors from solid rock with a depth-biased random walk.
///
/// Every open cell is carved by the walk itself, so the floor is connected by
/// construction. Stairs are placed on the reachable cell farthest from spawn.
#[derive(Clone, Debug)]
pub struct FloorGenerator {
    width: u32,
    height: u32,
    depth: u32,
    seed: u64,
    spawn: Point,
    stairs: Point,
}

impl FloorGenerator {
    /// Creates a generator for the provided dimensions, depth and seed.
    #[must_use]
    pub const fn new(width: u32, height: u32, depth: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            depth,
            seed,
            spawn: Point::new(0, 0),
            stairs: Point::new(0, 0),
        }
    }

    /// Requested floor width before clamping.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Requested floor height before clamping.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Depth the next floor will be generated for.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Base seed shared by every depth.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Spawn cell recorded by the last call to [`FloorGenerator::generate`].
    #[must_use]
    pub const fn spawn_pos(&self) -> Point {
        self.spawn
    }

    /// Stairs cell recorded by the last call to [`FloorGenerator::generate`].
    #[must_use]
    pub const fn stairs_pos(&self) -> Point {
        self.stairs
    }

    /// Changes the depth used by subsequent generations.
    pub fn set_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    /// Generates the floor for the current depth and records spawn and stairs.
    ///
    /// Identical dimensions, depth and seed always produce identical output.
    pub fn generate(&mut self) -> Map {
        let width = self.width.clamp(MIN_MAP_SIZE, MAX_MAP_SIZE);
        let height = self.height.clamp(MIN_MAP_SIZE, MAX_MAP_SIZE);
        let mut grid = CarveGrid::new(width, height);
        let mut rng = ChaCha8Rng::seed_from_u64(depth_seed(self.seed, self.depth));

        let (w, h) = (grid.width, grid.height);
        let spawn = Point::new((w / 2).clamp(1, w - 2), (h / 2).clamp(1, h - 2));
        let _ = grid.carve(spawn);
        let mut open_cells = 1;

        let target = self.target_open_cells(w, h).max(MIN_TARGET_OPEN_CELLS);
        let turn_chance = self.turn_chance();
        let max_steps = grid.cells.len().saturating_mul(MAX_STEPS_PER_CELL);

        let mut position = spawn;
        let (mut dx, mut dy) = random_direction(&mut rng);
        let mut steps_used = 0;

        while steps_used < max_steps && open_cells < target {
            steps_used += 1;

            if rng.gen::<f64>() < turn_chance {
                (dx, dy) = random_direction(&mut rng);
            }

            let next = position.offset(dx, dy);
            if !grid.is_interior(next) {
                (dx, dy) = random_direction(&mut rng);
                continue;
            }

            position = next;
            if grid.carve(position) {
                open_cells += 1;
            }
        }

        // Fallback only: a clamped spawn on a 5x5 or larger grid has interior neighbours.
        if open_cells < 2 {
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let neighbor = spawn.offset(dx, dy);
                if grid.is_interior(neighbor) {
                    if grid.carve(neighbor) {
                        open_cells += 1;
                    }
                    break;
                }
            }
        }

        let field = ReachabilityField::build_with(width, height, spawn, |cell| grid.is_wall(cell));
        let mut stairs = field.farthest();
        if stairs == spawn {
            stairs = field.first_other_than(spawn).unwrap_or(spawn);
        }

        self.spawn = spawn;
        self.stairs = stairs;

        debug!(
            depth = self.depth,
            width,
            height,
            open_cells,
            target_open = target,
            steps_used,
            spawn = ?spawn,
            stairs = ?stairs,
            "generated floor"
        );

        Map::from_fn(width, height, |cell| {
            if cell == stairs {
                CellKind::Stairs
            } else {
                grid.cell(cell)
            }
        })
    }

    fn depth_factor(&self) -> f64 {
        clamp01(f64::from(self.depth) / DEPTH_SCALE_MAX)
    }

    fn target_open_cells(&self, width: i32, height: i32) -> usize {
        let open_fraction =
            (BASE_OPEN_FRACTION - self.depth_factor() * OPEN_FRACTION_DROP).max(MIN_OPEN_FRACTION);
        let interior = f64::from(width - 2) * f64::from(height - 2);
        (interior * open_fraction).round() as usize
    }

    fn turn_chance(&self) -> f64 {
        (BASE_TURN_CHANCE + self.depth_factor() * TURN_CHANCE_INCREASE).min(1.0)
    }
}

fn random_direction(rng: &mut ChaCha8Rng) -> (i32, i32) {
    match rng.gen_range(0..4u8) {
        0 => (1, 0),
        1 => (-1, 0),
        2 => (0, 1),
        _ => (0, -1),
    }
}

/// Mutable scratch grid the walk carves before the immutable map is built.
struct CarveGrid {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
}

impl CarveGrid {
    fn new(width: u32, height: u32) -> Self {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        let count = usize::try_from(width).unwrap_or(0) * usize::try_from(height).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![CellKind::Wall; count],
        }
    }

    fn index(&self, cell: Point) -> Option<usize> {
        if cell.x() < 0 || cell.y() < 0 || cell.x() >= self.width || cell.y() >= self.height {
            return None;
        }
        usize::try_from(cell.y() * self.width + cell.x()).ok()
    }

    fn is_interior(&self, cell: Point) -> bool {
        cell.x() > 0 && cell.x() < self.width - 1 && cell.y() > 0 && cell.y() < self.height - 1
    }

    fn cell(&self, cell: Point) -> CellKind {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(CellKind::Wall)
    }

    fn is_wall(&self, cell: Point) -> bool {
        self.cell(cell) == CellKind::Wall
    }

    /// Opens the cell, returning `true` when it was previously a wall.
    fn carve(&mut self, cell: Point) -> bool {
        let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) else {
            return false;
        };
        if *slot == CellKind::Wall {
            *slot = CellKind::Empty;
            true
        } else {
            false
        }
    }
}
