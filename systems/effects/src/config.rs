//! Runtime tuning for corruption visuals.

use serde::{Deserialize, Serialize};
use tracing::debug;

const VISUAL_SCALE_RANGE: (f64, f64) = (0.0, 1.0);
const CHANCE_RANGE: (f64, f64) = (0.0, 1.0);
const WHISPER_WINDOW_RANGE: (i32, i32) = (1, 300);
const FAKE_GEOMETRY_CELLS_RANGE: (i32, i32) = (0, 200);
const BLINK_TICKS_RANGE: (i32, i32) = (1, 120);

/// Tunable intensities for every corruption effect.
///
/// Values loaded from disk or set by an operator are passed through
/// [`VisualConfig::sanitized`], which clamps each field into its documented
/// range instead of rejecting it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Global multiplier applied to every effect probability, in `[0, 1]`.
    pub visual_scale: f64,
    /// Peak per-cell glyph glitch probability, in `[0, 1]`.
    pub max_char_glitch_chance: f64,
    /// Peak per-cell color bleed probability, in `[0, 1]`.
    pub max_color_bleed_chance: f64,
    /// Ticks per whisper window, in `[1, 300]`.
    pub whisper_window_ticks: i32,
    /// Peak probability of a whisper within one window, in `[0, 1]`.
    pub max_whisper_per_window: f64,
    /// Upper bound on fake geometry cells per frame, in `[0, 200]`.
    pub max_fake_geometry_cells: i32,
    /// Slowest glyph glitch flicker period in ticks, in `[1, 120]`.
    pub glitch_blink_max_ticks: i32,
    /// Slowest color bleed flicker period in ticks, in `[1, 120]`.
    pub bleed_blink_max_ticks: i32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            visual_scale: 0.5,
            max_char_glitch_chance: 0.10,
            max_color_bleed_chance: 0.05,
            whisper_window_ticks: 45,
            max_whisper_per_window: 0.12,
            max_fake_geometry_cells: 24,
            glitch_blink_max_ticks: 24,
            bleed_blink_max_ticks: 18,
        }
    }
}

impl VisualConfig {
    /// Returns a copy with every field clamped into range. NaN becomes the
    /// lower bound.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            visual_scale: clamp_float(self.visual_scale, VISUAL_SCALE_RANGE),
            max_char_glitch_chance: clamp_float(self.max_char_glitch_chance, CHANCE_RANGE),
            max_color_bleed_chance: clamp_float(self.max_color_bleed_chance, CHANCE_RANGE),
            whisper_window_ticks: clamp_int(self.whisper_window_ticks, WHISPER_WINDOW_RANGE),
            max_whisper_per_window: clamp_float(self.max_whisper_per_window, CHANCE_RANGE),
            max_fake_geometry_cells: clamp_int(
                self.max_fake_geometry_cells,
                FAKE_GEOMETRY_CELLS_RANGE,
            ),
            glitch_blink_max_ticks: clamp_int(self.glitch_blink_max_ticks, BLINK_TICKS_RANGE),
            bleed_blink_max_ticks: clamp_int(self.bleed_blink_max_ticks, BLINK_TICKS_RANGE),
        }
    }
}

fn clamp_float(value: f64, (low, high): (f64, f64)) -> f64 {
    if value.is_nan() {
        return low;
    }
    value.clamp(low, high)
}

fn clamp_int(value: i32, (low, high): (i32, i32)) -> i32 {
    value.clamp(low, high)
}

/// Explicit holder of the active [`VisualConfig`].
///
/// The session owns one instance and hands snapshots to the effects engine;
/// an external tuning surface mutates it through [`VisualSettings::set`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisualSettings {
    current: VisualConfig,
}

impl VisualSettings {
    /// Creates settings holding the sanitized configuration.
    #[must_use]
    pub fn new(config: VisualConfig) -> Self {
        Self {
            current: config.sanitized(),
        }
    }

    /// Snapshot of the active configuration.
    #[must_use]
    pub const fn get(&self) -> VisualConfig {
        self.current
    }

    /// Replaces the active configuration after clamping it into range.
    pub fn set(&mut self, config: VisualConfig) {
        let sanitized = config.sanitized();
        if sanitized != config {
            debug!(requested = ?config, applied = ?sanitized, "clamped visual config");
        }
        self.current = sanitized;
    }

    /// Restores the default configuration.
    pub fn reset(&mut self) {
        self.current = VisualConfig::default();
    }
}
