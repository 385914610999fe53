#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Depthcrawl.
//!
//! The world crate carves floors, tracks which floor is in play and owns the
//! corruption severity that the rendering systems read every tick. All
//! randomness is seeded explicitly so that a `(width, height, depth, seed)`
//! tuple always reproduces the same floor.

mod corruption;
mod floor;
mod generator;
mod navigation;

pub use corruption::{corruption_for_depth, CorruptionState};
pub use floor::{Floor, FloorManager, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH};
pub use generator::{
    depth_seed, FloorGenerator, MAX_MAP_SIZE, MIN_MAP_SIZE, SEED_DEPTH_MULTIPLIER,
};
pub use navigation::ReachabilityField;
