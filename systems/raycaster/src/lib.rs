#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Column ray caster that projects a floor into a character-cell view.
//!
//! Each screen column marches one ray through the grid with a DDA walk,
//! converts the hit distance into a wall band, and fills the column with
//! ceiling, shaded wall and floor glyphs. Stairs seen before the wall and any
//! watcher sprites for the column are drawn on top. Corruption effects are
//! applied per cell through the effects engine.

use std::f64::consts::FRAC_PI_3;

use depthcrawl_core::{Canvas, CellKind, CellStyle, Color, Map, Player, STAIRS_GLYPH};
use depthcrawl_system_effects::{
    apply_char_glitch, apply_color_bleed, EffectsContext, VisualConfig, WALL_SHADES,
};
use depthcrawl_system_watchers::WatcherManager;
use glam::DVec2;

/// Default horizontal field of view in radians.
pub const DEFAULT_FOV: f64 = FRAC_PI_3;
/// Default maximum render distance in map cells.
pub const DEFAULT_MAX_DIST: f64 = 16.0;
/// Floor glyphs ordered from the horizon to the bottom of the screen.
pub const FLOOR_SHADES: [char; 4] = ['.', ':', ';', ' '];
/// Glyph used for every ceiling cell.
pub const CEILING_GLYPH: char = ' ';

const STAIRS_MIN_SPRITE_HEIGHT: i64 = 1;
const STAIRS_MAX_SPRITE_HEIGHT: i64 = 9;

const WALL_STYLE: CellStyle = CellStyle::foreground_only(Color::White);
const CEILING_STYLE: CellStyle = CellStyle::foreground_only(Color::DarkBlue);
const FLOOR_STYLE: CellStyle = CellStyle::foreground_only(Color::DarkGray);
const STAIRS_STYLE: CellStyle = CellStyle::foreground_only(Color::Yellow);
const WATCHER_STYLE: CellStyle = CellStyle::foreground_only(Color::DarkMagenta);

/// Wall glyph for a perpendicular distance: solid at zero, blank at or beyond
/// `max_dist`.
#[must_use]
pub fn wall_shade(distance: f64, max_dist: f64) -> char {
    let last = WALL_SHADES.len() - 1;
    if distance <= 0.0 {
        return WALL_SHADES[0];
    }
    if distance >= max_dist {
        return WALL_SHADES[last];
    }
    let index = ((distance / max_dist) * last as f64) as usize;
    WALL_SHADES[index.min(last)]
}

/// Floor glyph for a row measured from the screen's horizontal centre.
#[must_use]
pub fn floor_shade(row_from_center: i64, half_height: i64) -> char {
    if half_height <= 0 {
        return FLOOR_SHADES[0];
    }
    let last = FLOOR_SHADES.len() - 1;
    let ratio = row_from_center as f64 / half_height as f64;
    let index = ((ratio * last as f64) as i64).clamp(0, last as i64);
    FLOOR_SHADES[index as usize]
}

/// Grid axis whose boundary a ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitSide {
    /// The ray crossed a vertical grid line (stepped along x).
    Vertical,
    /// The ray crossed a horizontal grid line (stepped along y).
    Horizontal,
}

/// Result of marching a single ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance along the ray to the first wall, capped at the render distance.
    pub wall_dist: f64,
    /// Distance to the first stairs cell crossed, or infinity if none.
    pub stairs_dist: f64,
    /// Axis crossed on the final step.
    pub side: HitSide,
}

/// Projects a map onto a fixed-size character grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Raycaster {
    screen_width: u32,
    screen_height: u32,
    fov: f64,
    max_dist: f64,
}

impl Raycaster {
    /// Creates a ray caster for a screen of the provided size.
    #[must_use]
    pub const fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen_width,
            screen_height,
            fov: DEFAULT_FOV,
            max_dist: DEFAULT_MAX_DIST,
        }
    }

    /// Overrides the field of view.
    #[must_use]
    pub const fn with_fov(mut self, fov: f64) -> Self {
        self.fov = fov;
        self
    }

    /// Overrides the maximum render distance.
    #[must_use]
    pub const fn with_max_dist(mut self, max_dist: f64) -> Self {
        self.max_dist = max_dist;
        self
    }

    /// Updates the screen dimensions after a resize.
    pub fn set_screen_size(&mut self, screen_width: u32, screen_height: u32) {
        self.screen_width = screen_width;
        self.screen_height = screen_height;
    }

    /// Screen dimensions as `(width, height)`.
    #[must_use]
    pub const fn screen_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    /// Horizontal field of view in radians.
    #[must_use]
    pub const fn fov(&self) -> f64 {
        self.fov
    }

    /// Maximum render distance.
    #[must_use]
    pub const fn max_dist(&self) -> f64 {
        self.max_dist
    }

    /// Distance along the ray to the first wall.
    #[must_use]
    pub fn cast_ray(&self, player: &Player, map: &Map, angle: f64) -> f64 {
        self.cast_ray_with_stairs(player, map, angle).wall_dist
    }

    /// Marches a ray cell by cell, tracking the nearest stairs crossed before
    /// the wall.
    #[must_use]
    pub fn cast_ray_with_stairs(&self, player: &Player, map: &Map, angle: f64) -> RayHit {
        let origin = player.position();
        let direction = DVec2::new(angle.cos(), angle.sin());
        let delta = DVec2::new((1.0 / direction.x).abs(), (1.0 / direction.y).abs());

        let mut map_x = origin.x.floor() as i32;
        let mut map_y = origin.y.floor() as i32;

        let (step_x, mut side_x) = if direction.x < 0.0 {
            (-1, (origin.x - f64::from(map_x)) * delta.x)
        } else {
            (1, (f64::from(map_x) + 1.0 - origin.x) * delta.x)
        };
        let (step_y, mut side_y) = if direction.y < 0.0 {
            (-1, (origin.y - f64::from(map_y)) * delta.y)
        } else {
            (1, (f64::from(map_y) + 1.0 - origin.y) * delta.y)
        };

        let mut stairs_dist = f64::INFINITY;

        loop {
            let side = if side_x < side_y {
                side_x += delta.x;
                map_x += step_x;
                HitSide::Vertical
            } else {
                side_y += delta.y;
                map_y += step_y;
                HitSide::Horizontal
            };

            let travelled = match side {
                HitSide::Vertical => side_x - delta.x,
                HitSide::Horizontal => side_y - delta.y,
            };

            let cell = map.cell(map_x, map_y);
            if cell == CellKind::Stairs {
                stairs_dist = stairs_dist.min(travelled);
            }

            if side_x > self.max_dist && side_y > self.max_dist {
                return RayHit {
                    wall_dist: self.max_dist,
                    stairs_dist,
                    side,
                };
            }

            if cell == CellKind::Wall {
                return RayHit {
                    wall_dist: travelled,
                    stairs_dist,
                    side,
                };
            }
        }
    }

    /// Renders every column of the view onto the canvas.
    pub fn render<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        player: &Player,
        map: &Map,
        effects: &EffectsContext,
        config: &VisualConfig,
        watchers: Option<&WatcherManager>,
    ) {
        let width = self.screen_width;
        let height = i64::from(self.screen_height);
        if width == 0 || height == 0 {
            return;
        }

        let sprites = watchers
            .map(|manager| manager.sprites(self.screen_width, self.screen_height))
            .unwrap_or_default();

        for x in 0..width {
            let ray_offset = (f64::from(x) / f64::from(width) - 0.5) * self.fov;
            let hit = self.cast_ray_with_stairs(player, map, player.angle() + ray_offset);
            let perp_dist = hit.wall_dist * ray_offset.cos();

            let wall_height = if perp_dist > 0.0 {
                (height as f64 / perp_dist) as i64
            } else {
                height
            };
            let draw_start = (height - wall_height) / 2;
            let draw_end = (draw_start + wall_height).min(height);
            let draw_start = draw_start.max(0);
            let wall_glyph = wall_shade(perp_dist, self.max_dist);

            for y in 0..height {
                let row = y as u32;
                if y < draw_start {
                    canvas.set_cell(x, row, CEILING_GLYPH, CEILING_STYLE);
                } else if y < draw_end {
                    let glyph = apply_char_glitch(wall_glyph, effects, config, x, row);
                    let style = apply_color_bleed(WALL_STYLE, effects, config, x, row);
                    canvas.set_cell(x, row, glyph, style);
                } else {
                    let glyph = floor_shade(y - height / 2, height / 2);
                    canvas.set_cell(x, row, glyph, FLOOR_STYLE);
                }
            }

            if hit.stairs_dist < hit.wall_dist && hit.stairs_dist < self.max_dist {
                let sprite_height = stairs_sprite_height(height, hit.stairs_dist * ray_offset.cos());
                let start = height / 2 - sprite_height / 2;
                let end = (start + sprite_height).min(height);
                for y in start.max(0)..end {
                    let row = y as u32;
                    let style = apply_color_bleed(STAIRS_STYLE, effects, config, x, row);
                    canvas.set_cell(x, row, STAIRS_GLYPH, style);
                }
            }

            for sprite in sprites.iter().filter(|sprite| sprite.column() == x) {
                for row in sprite.start_y()..sprite.end_y() {
                    let style = apply_color_bleed(WATCHER_STYLE, effects, config, x, row);
                    canvas.set_cell(x, row, sprite.glyph(), style);
                }
            }
        }
    }
}

fn stairs_sprite_height(screen_height: i64, perp_dist: f64) -> i64 {
    if perp_dist <= 0.0 {
        return STAIRS_MAX_SPRITE_HEIGHT;
    }
    let height = (screen_height as f64 / (perp_dist * 2.0)) as i64;
    height.clamp(STAIRS_MIN_SPRITE_HEIGHT, STAIRS_MAX_SPRITE_HEIGHT)
}
