//! Initial orbital phase generation

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ConfigError, ConfigResult};

/// Where initial orbit phases come from when a body doesn't fix its own
///
/// Phases are drawn once while the body table is built and never again.
pub enum PhaseSource {
    Random(StdRng),
    Fixed { phases: Vec<f32>, next: usize },
}

impl PhaseSource {
    /// Non-deterministic phases for normal runs
    pub fn from_entropy() -> Self {
        Self::Random(StdRng::from_entropy())
    }

    /// Reproducible phases
    pub fn seeded(seed: u64) -> Self {
        Self::Random(StdRng::seed_from_u64(seed))
    }

    /// Phases handed out in order, one per orbiting body
    pub fn fixed(phases: Vec<f32>) -> Self {
        Self::Fixed { phases, next: 0 }
    }

    /// Draw the next phase in `[0, 2π)`
    pub fn next_phase(&mut self) -> ConfigResult<f32> {
        match self {
            Self::Random(rng) => Ok(rng.gen_range(0.0..TAU)),
            Self::Fixed { phases, next } => {
                let phase = phases
                    .get(*next)
                    .copied()
                    .ok_or(ConfigError::PhasesExhausted(*next))?;
                *next += 1;
                Ok(phase.rem_euclid(TAU))
            }
        }
    }
}
