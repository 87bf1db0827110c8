// ─────────────────────────────────────────────────────────────────────
// StatKern — Sampling
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Uniform draws on `[min, max)`.
//!
//! The generator is always passed in by the caller; nothing here reads
//! ambient RNG state.

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use statkern_types::error::{KernelError, KernelResult};

/// Validated uniform distribution on `[min, max)`.
/// A degenerate interval (`min == max`) always yields `min`.
#[derive(Debug, Clone, Copy)]
pub struct UniformDraw {
    min: f64,
    max: f64,
    dist: Option<Uniform<f64>>,
}

impl UniformDraw {
    pub fn new(min: f64, max: f64) -> KernelResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(KernelError::InvalidParameter(format!(
                "uniform bounds must be finite, got [{min}, {max})"
            )));
        }
        if min > max {
            return Err(KernelError::InvalidParameter(format!(
                "uniform min {min} exceeds max {max}"
            )));
        }
        if !(max - min).is_finite() {
            return Err(KernelError::InvalidParameter(format!(
                "uniform range [{min}, {max}) overflows f64"
            )));
        }
        let dist = (min < max).then(|| Uniform::new(min, max));
        Ok(UniformDraw { min, max, dist })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Draw `n` values using `rng`.
    pub fn draw<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let mut out = vec![0.0; n];
        self.draw_into(&mut out, rng);
        out
    }

    /// Fill `out` with draws using `rng`.
    pub fn draw_into<R: Rng + ?Sized>(&self, out: &mut [f64], rng: &mut R) {
        match &self.dist {
            Some(dist) => {
                for v in out.iter_mut() {
                    *v = dist.sample(rng);
                }
            }
            None => out.fill(self.min),
        }
    }
}
