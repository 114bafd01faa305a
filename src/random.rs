//! Random sources for battle rolls.
//!
//! The engine never reaches for an ambient generator: every draw (first
//! turn, damage variance, critical roll) goes through a [`RandomSource`]
//! passed in by the caller, so replays and tests can pin the sequence.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_float(&mut self) -> f64;
}

impl RandomSource for SmallRng {
    fn next_float(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Seeded generator used by the CLI and the matrix runner.
pub fn seeded(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Replays a fixed list of values, then repeats the fallback forever.
#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    values: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self::with_fallback(values, 0.5)
    }

    pub fn with_fallback(values: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            values: values.into_iter().map(clamp_unit).collect(),
            fallback: clamp_unit(fallback),
        }
    }

    /// Always returns the same value.
    pub fn constant(value: f64) -> Self {
        Self::with_fallback(std::iter::empty::<f64>(), value)
    }

    /// Values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_float(&mut self) -> f64 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}

// Keeps scripted values inside the half-open unit interval.
fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else if value >= 1.0 {
        1.0 - f64::EPSILON
    } else {
        value
    }
}
