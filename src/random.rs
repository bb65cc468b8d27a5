use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of uniform draws in `[0, 1)` handed to the tick
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Adapts any `rand` generator
pub struct RngSource<R: Rng>(pub R);

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        RngSource(StdRng::seed_from_u64(seed))
    }

    pub fn from_os() -> Self {
        RngSource(StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Replays a fixed script of draws, then repeats the fallback forever
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    script: VecDeque<f64>,
    fallback: f64,
    drawn: usize,
}

impl ScriptedRolls {
    pub fn new(script: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback,
            drawn: 0,
        }
    }

    /// Every draw returns `value`
    pub fn always(value: f64) -> Self {
        Self::new([], value)
    }

    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl RandomSource for ScriptedRolls {
    fn next_unit(&mut self) -> f64 {
        self.drawn += 1;
        self.script.pop_front().unwrap_or(self.fallback)
    }
}
