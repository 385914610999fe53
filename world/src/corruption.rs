//! Depth-driven corruption severity with an operator bias.

use depthcrawl_core::noise::clamp01;

const CORRUPTION_START_DEPTH: u32 = 10;
const CORRUPTION_MAX_DEPTH: u32 = 50;

/// Base corruption for a depth: zero up to depth ten, then a linear ramp that
/// saturates at depth fifty.
#[must_use]
pub fn corruption_for_depth(depth: u32) -> f64 {
    if depth < CORRUPTION_START_DEPTH {
        return 0.0;
    }
    let span = f64::from(CORRUPTION_MAX_DEPTH - CORRUPTION_START_DEPTH);
    clamp01(f64::from(depth - CORRUPTION_START_DEPTH) / span)
}

/// Per-session corruption tracker advanced once per simulated tick.
///
/// The effective level is the depth-derived base plus a bias in `[-1, 1]`,
/// clamped to `[0, 1]`. Watcher exposure is folded into the same bias; the
/// cumulative exposure is kept separately for reporting only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CorruptionState {
    level: f64,
    bias: f64,
    depth: u32,
    ticks: u64,
    exposure: f64,
}

impl CorruptionState {
    /// Creates a state at depth zero with no bias.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances one tick and recomputes the base level for `depth`.
    pub fn update(&mut self, depth: u32) {
        self.ticks = self.ticks.wrapping_add(1);
        self.depth = depth;
        self.level = corruption_for_depth(depth);
    }

    /// Effective corruption in `[0, 1]`.
    #[must_use]
    pub fn level(&self) -> f64 {
        clamp01(self.level + self.bias)
    }

    /// Depth-derived level before the bias is applied.
    #[must_use]
    pub const fn base_level(&self) -> f64 {
        self.level
    }

    /// Operator bias in `[-1, 1]`.
    #[must_use]
    pub const fn bias(&self) -> f64 {
        self.bias
    }

    /// Adds `delta` to the bias, clamping the result to `[-1, 1]`.
    pub fn adjust_bias(&mut self, delta: f64) {
        if delta.is_nan() {
            return;
        }
        self.bias = (self.bias + delta).clamp(-1.0, 1.0);
    }

    /// Accumulates watcher exposure into the bias.
    pub fn add_exposure(&mut self, delta: f64) {
        if delta.is_nan() {
            return;
        }
        self.exposure += delta;
        self.adjust_bias(delta);
    }

    /// Total exposure accumulated this session.
    #[must_use]
    pub const fn exposure(&self) -> f64 {
        self.exposure
    }

    /// Depth passed to the most recent [`CorruptionState::update`].
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of updates performed.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }
}
