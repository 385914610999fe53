//! Floor values and the manager that owns the generator lifecycle.

use depthcrawl_core::{Map, Point};
use tracing::info;

use crate::generator::FloorGenerator;

/// Width used when a manager is created with a zero width.
pub const DEFAULT_MAP_WIDTH: u32 = 32;
/// Height used when a manager is created with a zero height.
pub const DEFAULT_MAP_HEIGHT: u32 = 32;

/// A generated level together with its spawn and stairs cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Floor {
    map: Map,
    depth: u32,
    spawn: Point,
    stairs: Point,
    seed: u64,
}

impl Floor {
    /// Cell grid of the floor.
    #[must_use]
    pub const fn map(&self) -> &Map {
        &self.map
    }

    /// One-based depth of the floor.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Cell the player enters the floor on.
    #[must_use]
    pub const fn spawn(&self) -> Point {
        self.spawn
    }

    /// Cell holding the stairs to the next floor.
    #[must_use]
    pub const fn stairs(&self) -> Point {
        self.stairs
    }

    /// Base session seed the floor was generated from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Owns the current floor and regenerates it on descent or teleport.
///
/// Each transition replaces the current floor wholesale. Because the same
/// generator and seed are reused, revisiting a depth reproduces its layout.
#[derive(Clone, Debug)]
pub struct FloorManager {
    generator: FloorGenerator,
    current: Option<Floor>,
}

impl FloorManager {
    /// Creates a manager for floors of the provided size. Zero dimensions fall
    /// back to [`DEFAULT_MAP_WIDTH`] and [`DEFAULT_MAP_HEIGHT`].
    #[must_use]
    pub const fn new(width: u32, height: u32, seed: u64) -> Self {
        let width = if width == 0 { DEFAULT_MAP_WIDTH } else { width };
        let height = if height == 0 { DEFAULT_MAP_HEIGHT } else { height };
        Self {
            generator: FloorGenerator::new(width, height, 1, seed),
            current: None,
        }
    }

    /// Generates depth one.
    pub fn generate_first_floor(&mut self) -> &Floor {
        self.generate_at_depth(1)
    }

    /// Generates the floor below the current one, or depth one when no floor
    /// exists yet.
    pub fn descend_to_next_floor(&mut self) -> &Floor {
        let next = self
            .current
            .as_ref()
            .map_or(1, |floor| floor.depth.saturating_add(1));
        self.generate_at_depth(next)
    }

    /// Generates the requested depth, raising zero to one.
    pub fn teleport_to_depth(&mut self, depth: u32) -> &Floor {
        self.generate_at_depth(depth.max(1))
    }

    /// Floor currently in play, if any was generated.
    #[must_use]
    pub fn current_floor(&self) -> Option<&Floor> {
        self.current.as_ref()
    }

    /// Depth of the current floor, or zero before the first generation.
    #[must_use]
    pub fn current_depth(&self) -> u32 {
        self.current.as_ref().map_or(0, Floor::depth)
    }

    /// Base seed shared by every generated floor.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.generator.seed()
    }

    fn generate_at_depth(&mut self, depth: u32) -> &Floor {
        let previous = self.current_depth();
        self.generator.set_depth(depth);
        let map = self.generator.generate();

        let floor = Floor {
            map,
            depth,
            spawn: self.generator.spawn_pos(),
            stairs: self.generator.stairs_pos(),
            seed: self.generator.seed(),
        };

        info!(from = previous, to = depth, "entered floor");
        self.current.insert(floor)
    }
}
