#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Edge-of-vision watchers that haunt deep floors.
//!
//! Watchers are spawned once per floor from an explicit seed and drift along
//! a narrow band at the edge of the field of view. Whether a watcher is shown
//! on a given tick, and which glyph it wears, is never stored: both are pure
//! hashes of the watcher's seed, the tick counter, its index and its side.

use std::f64::consts::FRAC_PI_3;

use depthcrawl_core::noise::{chance, clamp01, mix, pick_index};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// First depth on which watchers appear.
pub const WATCHER_START_DEPTH: u32 = 15;
/// Nearest perceived watcher distance.
pub const WATCHER_MIN_DISTANCE: f64 = 8.0;
/// Farthest perceived watcher distance.
pub const WATCHER_MAX_DISTANCE: f64 = 14.0;
/// Fraction of the half field of view reserved for edge sightings.
pub const WATCHER_EDGE_THRESHOLD: f64 = 0.20;
/// Angular drift applied per update, in radians.
pub const WATCHER_DRIFT_SPEED: f64 = 0.002;
/// Corruption exposure gained per visible watcher per frame.
pub const WATCHER_CORRUPTION_RATE: f64 = 0.0001;
/// Field of view used when a non-positive one is supplied.
pub const DEFAULT_FOV: f64 = FRAC_PI_3;
/// Glyph drawn for an undisturbed watcher.
pub const WATCHER_GLYPH: char = 'W';
/// Glyphs a watcher may flicker into.
pub const WATCHER_GLITCH_GLYPHS: [char; 5] = ['#', '%', '&', '@', 'X'];

const SEED_DEPTH_MULTIPLIER: u64 = 1_000_003;
const DEPTH_TIER_ONE_MAX: u32 = 24;
const DEPTH_TIER_TWO_MAX: u32 = 34;
const MIN_SPRITE_HEIGHT: u32 = 2;
const MAX_SPRITE_HEIGHT: u32 = 10;
const VISIBLE_CHANCE: f64 = 0.70;
const GLITCH_CHANCE: f64 = 0.30;

const SALT_VISIBILITY: u64 = 0xC0FF_EE01;
const SALT_GLITCH: u64 = 0xC0FF_EE02;
const SALT_GLYPH: u64 = 0xC0FF_EE03;

/// Angular band `[min, max]` watchers live in for the provided field of view.
#[must_use]
pub fn edge_band(fov: f64) -> (f64, f64) {
    let half = sanitize_fov(fov) * 0.5;
    let min = (half * (1.0 - 2.0 * WATCHER_EDGE_THRESHOLD)).max(0.0);
    (min, half)
}

fn sanitize_fov(fov: f64) -> f64 {
    if fov.is_finite() && fov > 0.0 {
        fov
    } else {
        DEFAULT_FOV
    }
}

/// A single edge-of-vision entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Watcher {
    angle: f64,
    distance: f64,
    drift: f64,
    side: i32,
    seed: u64,
}

impl Watcher {
    /// Angular offset from the view centre, inside the edge band.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    /// Perceived distance used to size the sprite.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Current drift direction, `1.0` or `-1.0`.
    #[must_use]
    pub const fn drift(&self) -> f64 {
        self.drift
    }

    /// Side of the view the watcher haunts, `-1` left or `1` right.
    #[must_use]
    pub const fn side(&self) -> i32 {
        self.side
    }

    /// Stable per-instance seed feeding visibility and glyph noise.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Vertical slice of a single screen column occupied by a watcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatcherSprite {
    column: u32,
    start_y: u32,
    end_y: u32,
    glyph: char,
}

impl WatcherSprite {
    /// Screen column the sprite occupies.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// First row covered by the sprite.
    #[must_use]
    pub const fn start_y(&self) -> u32 {
        self.start_y
    }

    /// Row one past the last covered row.
    #[must_use]
    pub const fn end_y(&self) -> u32 {
        self.end_y
    }

    /// Glyph drawn on every covered row.
    #[must_use]
    pub const fn glyph(&self) -> char {
        self.glyph
    }
}

/// Owns the watchers of the current floor and the tick counter keying their
/// per-frame noise.
#[derive(Clone, Debug, PartialEq)]
pub struct WatcherManager {
    watchers: Vec<Watcher>,
    depth: u32,
    fov: f64,
    ticks: u64,
}

impl WatcherManager {
    /// Spawns the watchers for a floor. Floors shallower than
    /// [`WATCHER_START_DEPTH`] receive none.
    #[must_use]
    pub fn new(depth: u32, seed: u64, fov: f64) -> Self {
        let fov = sanitize_fov(fov);
        let mut manager = Self {
            watchers: Vec::new(),
            depth,
            fov,
            ticks: 0,
        };
        if depth < WATCHER_START_DEPTH {
            return manager;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(
            seed.wrapping_add(u64::from(depth).wrapping_mul(SEED_DEPTH_MULTIPLIER)),
        );
        let count = watcher_count_for_depth(depth, &mut rng);
        let (min_edge, max_edge) = edge_band(fov);
        manager.watchers = (0..count)
            .map(|_| spawn_watcher(&mut rng, min_edge, max_edge))
            .collect();
        manager
    }

    /// Watchers spawned for the floor.
    #[must_use]
    pub fn watchers(&self) -> &[Watcher] {
        &self.watchers
    }

    /// Depth the manager was created for.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Field of view the band was derived from.
    #[must_use]
    pub const fn fov(&self) -> f64 {
        self.fov
    }

    /// Number of updates performed.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advances the tick counter and drifts every watcher, reflecting at the
    /// band edges.
    pub fn update(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
        let (min_edge, max_edge) = edge_band(self.fov);
        for watcher in &mut self.watchers {
            watcher.angle += watcher.drift * WATCHER_DRIFT_SPEED;
            if watcher.angle < min_edge {
                watcher.angle = min_edge;
                watcher.drift = 1.0;
            }
            if watcher.angle > max_edge {
                watcher.angle = max_edge;
                watcher.drift = -1.0;
            }
        }
    }

    /// Reports whether the watcher at `index` shows itself this tick.
    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        self.watchers.get(index).is_some_and(|watcher| {
            chance(
                watcher_noise(watcher, self.ticks, index, SALT_VISIBILITY),
                VISIBLE_CHANCE,
            )
        })
    }

    /// Glyph the watcher at `index` wears this tick.
    #[must_use]
    pub fn glyph_for(&self, index: usize) -> char {
        let Some(watcher) = self.watchers.get(index) else {
            return WATCHER_GLYPH;
        };
        if chance(
            watcher_noise(watcher, self.ticks, index, SALT_GLITCH),
            GLITCH_CHANCE,
        ) {
            let pick = pick_index(
                watcher_noise(watcher, self.ticks, index, SALT_GLYPH),
                WATCHER_GLITCH_GLYPHS.len(),
            );
            return WATCHER_GLITCH_GLYPHS[pick];
        }
        WATCHER_GLYPH
    }

    /// Number of watchers visible this tick.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        (0..self.watchers.len())
            .filter(|index| self.is_visible(*index))
            .count()
    }

    /// Corruption exposure contributed by the visible watchers this tick.
    #[must_use]
    pub fn corruption_delta(&self) -> f64 {
        self.visible_count() as f64 * WATCHER_CORRUPTION_RATE
    }

    /// Screen-space sprites for the visible watchers.
    #[must_use]
    pub fn sprites(&self, screen_width: u32, screen_height: u32) -> Vec<WatcherSprite> {
        if screen_width == 0 || screen_height == 0 {
            return Vec::new();
        }

        self.watchers
            .iter()
            .enumerate()
            .filter(|(index, _)| self.is_visible(*index))
            .filter_map(|(index, watcher)| {
                let height = sprite_height(screen_height, watcher.distance);
                let (start_y, end_y) = sprite_span(screen_height, height);
                (start_y < end_y).then(|| WatcherSprite {
                    column: watcher_column(watcher, self.fov, screen_width),
                    start_y,
                    end_y,
                    glyph: self.glyph_for(index),
                })
            })
            .collect()
    }
}

fn watcher_count_for_depth(depth: u32, rng: &mut ChaCha8Rng) -> usize {
    let base = match depth {
        d if d < WATCHER_START_DEPTH => return 0,
        d if d <= DEPTH_TIER_ONE_MAX => 1,
        d if d <= DEPTH_TIER_TWO_MAX => 2,
        _ => 3,
    };
    base + rng.gen_range(0..2usize)
}

fn spawn_watcher(rng: &mut ChaCha8Rng, min_edge: f64, max_edge: f64) -> Watcher {
    let angle = if max_edge > min_edge {
        min_edge + rng.gen::<f64>() * (max_edge - min_edge)
    } else {
        min_edge
    };
    let distance =
        WATCHER_MIN_DISTANCE + rng.gen::<f64>() * (WATCHER_MAX_DISTANCE - WATCHER_MIN_DISTANCE);
    let side = if rng.gen_range(0..2u8) == 0 { -1 } else { 1 };
    let drift = if rng.gen_range(0..2u8) == 0 { 1.0 } else { -1.0 };

    Watcher {
        angle,
        distance,
        drift,
        side,
        seed: rng.gen(),
    }
}

fn watcher_noise(watcher: &Watcher, ticks: u64, index: usize, salt: u64) -> u64 {
    let mut n = watcher.seed ^ salt;
    n ^= u64::from(ticks as u32).wrapping_mul(0x9E37_79B1_85EB_CA87);
    n ^= u64::from(index as u32).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    n ^= u64::from(watcher.side as u32).wrapping_mul(0x1656_67B1_9E37_79F9);
    mix(n)
}

fn watcher_column(watcher: &Watcher, fov: f64, screen_width: u32) -> u32 {
    if screen_width <= 1 {
        return 0;
    }
    let offset = f64::from(watcher.side) * watcher.angle;
    let normalized = clamp01(offset / sanitize_fov(fov) + 0.5);
    let last = screen_width - 1;
    ((normalized * f64::from(last)).round() as u32).min(last)
}

fn sprite_height(screen_height: u32, distance: f64) -> u32 {
    if distance <= 0.0 {
        return MAX_SPRITE_HEIGHT;
    }
    let height = (f64::from(screen_height) / (distance * 2.0)) as u32;
    height.clamp(MIN_SPRITE_HEIGHT, MAX_SPRITE_HEIGHT)
}

fn sprite_span(screen_height: u32, sprite_height: u32) -> (u32, u32) {
    let centre = i64::from(screen_height / 2);
    let start = centre - i64::from(sprite_height / 2);
    let end = start + i64::from(sprite_height);
    let clip = |row: i64| row.clamp(0, i64::from(screen_height)) as u32;
    (clip(start), clip(end))
}
