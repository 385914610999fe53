//! Stateless integer hashing used for every reproducible per-frame decision.
//!
//! Each helper is a pure function of its arguments. Callers derive a key from
//! a stable seed, the current tick, a position and a purpose salt, then feed it
//! through [`mix`] so that two queries with the same key always agree.

/// Increment applied before mixing; the 64-bit golden ratio.
pub const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

const UNIT_SCALE: f64 = 1.0 / ((1u64 << 53) as f64);

/// SplitMix64 finalizer applied to `x + GOLDEN_GAMMA`.
#[must_use]
pub const fn mix(x: u64) -> u64 {
    let mut z = x.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Maps the top 53 bits of `n` onto `[0, 1)`.
#[must_use]
pub fn unit_interval(n: u64) -> f64 {
    (n >> 11) as f64 * UNIT_SCALE
}

/// Returns `true` with probability `p` for a uniformly distributed `n`.
///
/// Probabilities at or below zero never pass and probabilities at or above
/// one always pass.
#[must_use]
pub fn chance(n: u64, p: f64) -> bool {
    if p <= 0.0 {
        return false;
    }
    if p >= 1.0 {
        return true;
    }
    unit_interval(n) < p
}

/// Selects an index in `0..size`, or zero for an empty range.
#[must_use]
pub fn pick_index(n: u64, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    (n % size as u64) as usize
}

/// Clamps a value into `[0, 1]`, mapping NaN to zero.
#[must_use]
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
