#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic corruption effects layered over the rendered view.
//!
//! Every decision is a pure function of an [`EffectsContext`], a
//! [`VisualConfig`] snapshot, a screen position and a purpose salt. Two calls
//! with the same inputs always agree, which keeps frames replayable.

mod config;

use depthcrawl_core::{
    noise::{chance, clamp01, mix, pick_index, GOLDEN_GAMMA},
    Canvas, CellStyle, Color,
};

pub use config::{VisualConfig, VisualSettings};

/// Wall glyphs ordered from nearest to farthest.
pub const WALL_SHADES: [char; 6] = ['█', '▓', '▒', '░', '.', ' '];
/// Glyphs substituted for wall shades by the glitch effect.
pub const GLITCH_GLYPHS: [char; 6] = ['╳', '◊', '∆', '¤', '§', '░'];
/// Foreground colors applied by the bleed effect.
pub const CORRUPT_COLORS: [Color; 3] = [Color::Red, Color::Fuchsia, Color::DarkRed];
/// Fragments drawn by the whisper effect.
pub const WHISPERS: [&str; 5] = [
    "ph'nglui mglw'nafh",
    "the deep calls",
    "THEY SEE YOU",
    "do not look back",
    "the angles are wrong",
];
/// Glyph stamped by the fake geometry effect.
pub const FAKE_GEOMETRY_GLYPH: char = '▒';
/// Style of whisper text.
pub const WHISPER_STYLE: CellStyle = CellStyle::new(Color::DarkMagenta, Color::Black);
/// Style of fake geometry cells.
pub const FAKE_GEOMETRY_STYLE: CellStyle = CellStyle::new(Color::DarkRed, Color::Black);
/// Corruption at which whispers begin.
pub const WHISPER_START_LEVEL: f64 = 0.65;
/// Corruption at which fake geometry begins.
pub const FAKE_GEOMETRY_START_LEVEL: f64 = 0.90;

const SALT_GLITCH_CHANCE: u64 = 0xA11CE;
const SALT_GLITCH_GLYPH: u64 = 0xC0FFEE;
const SALT_BLEED_CHANCE: u64 = 0xB1EED;
const SALT_BLEED_COLOR: u64 = 0xD15EA5E;
const SALT_WHISPER_GATE: u64 = 0x51A57E;
const SALT_WHISPER_MESSAGE: u64 = 0x57EAD;
const SALT_WHISPER_ROW: u64 = 0x900D;
const SALT_WHISPER_COLUMN: u64 = 0xBADC0DE;
const SALT_FAKE_COLUMN: u64 = 0x1234;
const SALT_FAKE_ROW: u64 = 0xBEEF;

/// Per-frame randomness root for the effects engine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectsContext {
    corruption: f64,
    depth: u32,
    ticks: u64,
    seed: u64,
}

impl EffectsContext {
    /// Builds the context for one frame. The seed is derived from the depth.
    #[must_use]
    pub const fn new(depth: u32, corruption: f64, ticks: u64) -> Self {
        Self {
            corruption,
            depth,
            ticks,
            seed: mix(depth as u64),
        }
    }

    /// Effective corruption for the frame.
    #[must_use]
    pub const fn corruption(&self) -> f64 {
        self.corruption
    }

    /// Depth the frame is rendered at.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Tick counter of the frame.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Seed shared by every decision in the frame.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Noise keyed on the frame, a screen position and a purpose salt.
    #[must_use]
    pub const fn cell_noise(&self, x: u32, y: u32, salt: u64) -> u64 {
        let mut n = self.seed ^ salt;
        n ^= (self.ticks as u32 as u64).wrapping_mul(0xD2B7_4407_B1CE_6E93);
        n ^= (self.depth as u64).wrapping_mul(0x1656_67B1_9E37_79F9);
        n ^= (x as u64).wrapping_mul(0x9E37_79B1_85EB_CA87);
        n ^= (y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        mix(n)
    }

    const fn with_ticks(self, ticks: u64) -> Self {
        Self { ticks, ..self }
    }

    fn blinked(self, max_ticks: i32) -> Self {
        self.with_ticks(self.ticks / blink_ticks_for(self.corruption, max_ticks))
    }
}

/// Flicker period for the corruption level: `max_ticks` at zero corruption,
/// shrinking linearly to one tick at full corruption.
#[must_use]
pub fn blink_ticks_for(corruption: f64, max_ticks: i32) -> u64 {
    if max_ticks <= 1 {
        return 1;
    }
    let corruption = clamp01(corruption);
    let max = f64::from(max_ticks);
    if corruption <= 0.0 {
        return max as u64;
    }
    if corruption >= 1.0 {
        return 1;
    }
    ((max - corruption * (max - 1.0)).round() as u64).max(1)
}

/// Reports whether the glyph belongs to the wall shade table.
#[must_use]
pub fn is_wall_shade(glyph: char) -> bool {
    WALL_SHADES.contains(&glyph)
}

/// Possibly replaces a wall shade glyph with a glitch glyph.
#[must_use]
pub fn apply_char_glitch(
    glyph: char,
    context: &EffectsContext,
    config: &VisualConfig,
    x: u32,
    y: u32,
) -> char {
    if context.corruption <= 0.0 || !is_wall_shade(glyph) {
        return glyph;
    }

    let blinked = context.blinked(config.glitch_blink_max_ticks);
    let p = clamp01(context.corruption) * config.max_char_glitch_chance * config.visual_scale;
    if !chance(blinked.cell_noise(x, y, SALT_GLITCH_CHANCE), p) {
        return glyph;
    }

    GLITCH_GLYPHS[pick_index(
        blinked.cell_noise(x, y, SALT_GLITCH_GLYPH),
        GLITCH_GLYPHS.len(),
    )]
}

/// Possibly swaps the foreground for a color from [`CORRUPT_COLORS`].
#[must_use]
pub fn apply_color_bleed(
    style: CellStyle,
    context: &EffectsContext,
    config: &VisualConfig,
    x: u32,
    y: u32,
) -> CellStyle {
    if context.corruption <= 0.0 {
        return style;
    }

    let blinked = context.blinked(config.bleed_blink_max_ticks);
    let p = clamp01(context.corruption) * config.max_color_bleed_chance * config.visual_scale;
    if !chance(blinked.cell_noise(x, y, SALT_BLEED_CHANCE), p) {
        return style;
    }

    let color = CORRUPT_COLORS[pick_index(
        blinked.cell_noise(x, y, SALT_BLEED_COLOR),
        CORRUPT_COLORS.len(),
    )];
    style.with_foreground(color)
}

/// A whisper chosen for the current window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Whisper {
    x: u32,
    y: u32,
    text: &'static str,
}

impl Whisper {
    /// Column of the first character.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Row the text is drawn on.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Text of the whisper.
    #[must_use]
    pub const fn text(&self) -> &'static str {
        self.text
    }
}

/// Decides whether a whisper appears during the context's window and where.
///
/// At most one whisper is chosen per window and it never lands on the first
/// row or the last two rows.
#[must_use]
pub fn plan_whisper(
    context: &EffectsContext,
    config: &VisualConfig,
    width: u32,
    height: u32,
) -> Option<Whisper> {
    if width == 0 || height == 0 || context.corruption < WHISPER_START_LEVEL {
        return None;
    }

    let intensity = clamp01((context.corruption - WHISPER_START_LEVEL) / (1.0 - WHISPER_START_LEVEL))
        * config.visual_scale;
    let window = match u64::try_from(config.whisper_window_ticks) {
        Ok(ticks) if ticks > 0 => context.ticks / ticks,
        _ => 0,
    };
    let key = context.seed ^ window;

    if !chance(
        mix(key ^ SALT_WHISPER_GATE),
        intensity * config.max_whisper_per_window,
    ) {
        return None;
    }

    let text = WHISPERS[pick_index(mix(key ^ SALT_WHISPER_MESSAGE), WHISPERS.len())];
    let usable_height = usize::try_from(height).ok()?.checked_sub(3)?;
    if usable_height == 0 {
        return None;
    }
    let y = 1 + pick_index(mix(key ^ SALT_WHISPER_ROW), usable_height);
    let max_x = usize::try_from(width)
        .ok()?
        .saturating_sub(text.chars().count());
    let x = pick_index(mix(key ^ SALT_WHISPER_COLUMN), max_x + 1);

    Some(Whisper {
        x: u32::try_from(x).ok()?,
        y: u32::try_from(y).ok()?,
        text,
    })
}

/// Draws the whisper planned for the current window, clipped to the canvas.
pub fn render_whisper<C: Canvas + ?Sized>(
    canvas: &mut C,
    context: &EffectsContext,
    config: &VisualConfig,
) {
    let (width, height) = canvas.size();
    let Some(whisper) = plan_whisper(context, config, width, height) else {
        return;
    };

    for (column, glyph) in (whisper.x..width).zip(whisper.text.chars()) {
        canvas.set_cell(column, whisper.y, glyph, WHISPER_STYLE);
    }
}

/// Cells stamped with fake geometry this frame.
///
/// Rows within two of the top or bottom edge are skipped, so fewer cells than
/// the computed count may be returned.
#[must_use]
pub fn plan_fake_geometry(
    context: &EffectsContext,
    config: &VisualConfig,
    width: u32,
    height: u32,
) -> Vec<(u32, u32)> {
    if width == 0 || height == 0 || context.corruption < FAKE_GEOMETRY_START_LEVEL {
        return Vec::new();
    }

    let intensity = clamp01(
        (context.corruption - FAKE_GEOMETRY_START_LEVEL) / (1.0 - FAKE_GEOMETRY_START_LEVEL),
    ) * config.visual_scale;
    let count = ((intensity * f64::from(config.max_fake_geometry_cells)) as usize).max(1);
    let (columns, rows) = (width as usize, height as usize);

    (0..count as u64)
        .filter_map(|i| {
            let n = mix(context.seed ^ context.ticks ^ i.wrapping_mul(GOLDEN_GAMMA));
            let x = pick_index(n ^ SALT_FAKE_COLUMN, columns);
            let y = pick_index(n ^ SALT_FAKE_ROW, rows);
            if y <= 1 || y >= rows.saturating_sub(2) {
                return None;
            }
            Some((x as u32, y as u32))
        })
        .collect()
}

/// Stamps the fake geometry planned for this frame onto the canvas.
pub fn apply_fake_geometry<C: Canvas + ?Sized>(
    canvas: &mut C,
    context: &EffectsContext,
    config: &VisualConfig,
) {
    let (width, height) = canvas.size();
    for (x, y) in plan_fake_geometry(context, config, width, height) {
        canvas.set_cell(x, y, FAKE_GEOMETRY_GLYPH, FAKE_GEOMETRY_STYLE);
    }
}
