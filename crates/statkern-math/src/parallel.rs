// ─────────────────────────────────────────────────────────────────────
// StatKern — Parallel Convolve
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Rayon-parallel linear convolution.
//!
//! The output buffer is split into disjoint chunks; each worker owns its
//! slots outright, so no two threads ever touch the same `result[k]`.
//! Slot `k` sums `a[i] * b[k - i]` for ascending `i` starting from 0.0,
//! which is exactly the order the serial nested loop adds into that slot.
//! Results are therefore bit-identical to [`crate::convolve::convolve`].

use rayon::prelude::*;
use statkern_types::config::EmptyInputPolicy;
use statkern_types::error::KernelResult;

use crate::convolve::zeroed_output;

/// Output slots per rayon task when no chunk size is configured.
pub const DEFAULT_CHUNK: usize = 1024;

/// Parallel linear convolution with the default chunk size.
pub fn convolve_parallel(
    a: &[f64],
    b: &[f64],
    policy: EmptyInputPolicy,
) -> KernelResult<Vec<f64>> {
    convolve_parallel_chunked(a, b, policy, DEFAULT_CHUNK)
}

/// Parallel linear convolution, `chunk` output slots per task (0 is treated as 1).
#[tracing::instrument(name = "convolve_parallel", level = "debug", skip_all)]
pub fn convolve_parallel_chunked(
    a: &[f64],
    b: &[f64],
    policy: EmptyInputPolicy,
    chunk: usize,
) -> KernelResult<Vec<f64>> {
    let mut out = zeroed_output(a.len(), b.len(), policy)?;
    if out.is_empty() {
        return Ok(out);
    }

    let chunk = chunk.max(1);
    out.par_chunks_mut(chunk)
        .enumerate()
        .for_each(|(c, slots)| {
            let base = c * chunk;
            for (offset, slot) in slots.iter_mut().enumerate() {
                *slot = output_element(a, b, base + offset);
            }
        });
    Ok(out)
}

/// One output slot. Requires both inputs non-empty and `k < n1 + n2 - 1`.
fn output_element(a: &[f64], b: &[f64], k: usize) -> f64 {
    let i_lo = k.saturating_sub(b.len() - 1);
    let i_hi = k.min(a.len() - 1);
    let mut acc = 0.0;
    for i in i_lo..=i_hi {
        acc += a[i] * b[k - i];
    }
    acc
}
