//! Battle stat multipliers.
//!
//! Multipliers compound across applications and only go back to 1 on reset.
//!
//! Formula:
//! - buff `+p`:   `m × (1 + p/100)`
//! - debuff `-p`: `m × 1 / (1 + p/100)`
//!
//! A debuff of `-p` is the reciprocal of a buff of `+p`, not a linear
//! `(1 - p/100)` reduction: `-50` leaves two thirds of the stat, not half.

use strum::EnumCount;

use super::Stat;

/// Per-stat multiplicative modifiers held by a battle unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatMultipliers {
    values: [f64; Stat::COUNT],
}

impl StatMultipliers {
    pub const IDENTITY: Self = Self {
        values: [1.0; Stat::COUNT],
    };

    pub fn new() -> Self {
        Self::IDENTITY
    }

    /// Current multiplier for `stat`.
    pub fn get(&self, stat: Stat) -> f64 {
        self.values[stat.index()]
    }

    /// Factor a single application of `percent` multiplies by.
    pub fn factor(percent: i32) -> f64 {
        let magnitude = 1.0 + f64::from(percent.unsigned_abs()) / 100.0;
        if percent >= 0 { magnitude } else { magnitude.recip() }
    }

    /// Compounds `percent` into the multiplier for `stat`.
    ///
    /// Returns the new multiplier, or `None` when the stat does not accept
    /// multipliers (Health).
    pub fn apply(&mut self, stat: Stat, percent: i32) -> Option<f64> {
        if !stat.accepts_multiplier() {
            return None;
        }
        let slot = &mut self.values[stat.index()];
        *slot *= Self::factor(percent);
        Some(*slot)
    }

    /// Scales a base value, rounding to the nearest integer.
    pub fn scale(&self, stat: Stat, base: i32) -> i32 {
        (f64::from(base) * self.get(stat)).round() as i32
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    pub fn is_identity(&self) -> bool {
        self.values.iter().all(|&m| m == 1.0)
    }
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self::new()
    }
}
