// ─────────────────────────────────────────────────────────────────────
// StatKern — Convolve
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Direct O(n·m) linear convolution.
//!
//! `result[k] = Σ a[i] * b[j]` over all `i + j = k`, length `n1 + n2 - 1`.
//! Accumulation runs `i` outer, `j` inner, starting from 0.0 in every slot,
//! so results are reproducible bit-for-bit.

use std::borrow::Cow;

use ndarray::{Array1, ArrayView1};
use statkern_types::config::{ConvolutionConfig, EmptyInputPolicy};
use statkern_types::error::{KernelError, KernelResult};

use crate::parallel::convolve_parallel_chunked;

/// Length law: `n1 + n2 - 1`.
///
/// `None` when either input is empty or the sum overflows `usize`.
pub fn output_len(n1: usize, n2: usize) -> Option<usize> {
    if n1 == 0 || n2 == 0 {
        return None;
    }
    n1.checked_add(n2 - 1)
}

/// Allocate the zeroed output buffer for inputs of length `n1` and `n2`.
///
/// Returns an empty buffer only under `EmptyInputPolicy::EmptyResult`.
pub(crate) fn zeroed_output(
    n1: usize,
    n2: usize,
    policy: EmptyInputPolicy,
) -> KernelResult<Vec<f64>> {
    if n1 == 0 || n2 == 0 {
        return match policy {
            EmptyInputPolicy::Reject => Err(KernelError::InvalidInput(format!(
                "convolution requires non-empty inputs, got lengths {n1} and {n2}"
            ))),
            EmptyInputPolicy::EmptyResult => Ok(Vec::new()),
        };
    }

    let len = output_len(n1, n2).ok_or(KernelError::AllocationFailure {
        requested: usize::MAX,
    })?;
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| KernelError::AllocationFailure { requested: len })?;
    out.resize(len, 0.0);
    Ok(out)
}

/// Linear convolution of `a` and `b`. Empty inputs are rejected.
pub fn convolve(a: &[f64], b: &[f64]) -> KernelResult<Vec<f64>> {
    convolve_with_policy(a, b, EmptyInputPolicy::Reject)
}

/// Linear convolution of `a` and `b` with an explicit empty-input policy.
#[tracing::instrument(name = "convolve", level = "debug", skip_all)]
pub fn convolve_with_policy(
    a: &[f64],
    b: &[f64],
    policy: EmptyInputPolicy,
) -> KernelResult<Vec<f64>> {
    let mut out = zeroed_output(a.len(), b.len(), policy)?;
    if out.is_empty() {
        return Ok(out);
    }

    for (i, &ai) in a.iter().enumerate() {
        for (slot, &bj) in out[i..i + b.len()].iter_mut().zip(b) {
            *slot += ai * bj;
        }
    }
    Ok(out)
}

/// ndarray entry point. Strided views are copied to contiguous storage first.
pub fn convolve_array(
    a: ArrayView1<'_, f64>,
    b: ArrayView1<'_, f64>,
    policy: EmptyInputPolicy,
) -> KernelResult<Array1<f64>> {
    let a = contiguous(&a);
    let b = contiguous(&b);
    convolve_with_policy(&a, &b, policy).map(Array1::from_vec)
}

/// Borrow the view's storage when it is contiguous, otherwise copy it.
pub fn contiguous<'a>(view: &'a ArrayView1<'_, f64>) -> Cow<'a, [f64]> {
    match view.as_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(view.to_vec()),
    }
}

/// Configured convolver: picks the serial or rayon path by work size.
#[derive(Debug, Clone, Default)]
pub struct Convolver {
    config: ConvolutionConfig,
}

impl Convolver {
    pub fn new(config: ConvolutionConfig) -> Self {
        Convolver { config }
    }

    pub fn config(&self) -> &ConvolutionConfig {
        &self.config
    }

    /// True when `n1 * n2` reaches the configured parallel threshold.
    pub fn uses_parallel(&self, n1: usize, n2: usize) -> bool {
        self.config.parallel_threshold > 0
            && n1.saturating_mul(n2) >= self.config.parallel_threshold
    }

    pub fn convolve(&self, a: &[f64], b: &[f64]) -> KernelResult<Vec<f64>> {
        let policy = self.config.empty_input;
        if self.uses_parallel(a.len(), b.len()) {
            tracing::debug!(n1 = a.len(), n2 = b.len(), "dispatching to parallel path");
            convolve_parallel_chunked(a, b, policy, self.config.parallel_chunk)
        } else {
            convolve_with_policy(a, b, policy)
        }
    }

    pub fn convolve_array(
        &self,
        a: ArrayView1<'_, f64>,
        b: ArrayView1<'_, f64>,
    ) -> KernelResult<Array1<f64>> {
        let a = contiguous(&a);
        let b = contiguous(&b);
        self.convolve(&a, &b).map(Array1::from_vec)
    }
}
