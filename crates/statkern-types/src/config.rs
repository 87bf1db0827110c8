// ─────────────────────────────────────────────────────────────────────
// StatKern — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, KernelResult};

/// Top-level kernel configuration.
/// Every field is optional in JSON; missing sections take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    #[serde(default)]
    pub convolution: ConvolutionConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
}

/// What to do when either convolution input has length 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyInputPolicy {
    /// Fail with `KernelError::InvalidInput`.
    #[default]
    Reject,
    /// Return an empty result.
    EmptyResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvolutionConfig {
    #[serde(default)]
    pub empty_input: EmptyInputPolicy,
    /// Minimum `n1 * n2` before the rayon path is used. 0 disables it.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    /// Minimum number of output slots handed to one worker.
    #[serde(default = "default_parallel_chunk")]
    pub parallel_chunk: usize,
}

fn default_parallel_threshold() -> usize {
    1 << 20
}
fn default_parallel_chunk() -> usize {
    1024
}

impl Default for ConvolutionConfig {
    fn default() -> Self {
        ConvolutionConfig {
            empty_input: EmptyInputPolicy::default(),
            parallel_threshold: default_parallel_threshold(),
            parallel_chunk: default_parallel_chunk(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Base seed for sessions opened without an explicit seed.
    /// When absent, such sessions are seeded from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_seed: Option<u64>,
}

impl KernelConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> KernelResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> KernelResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> KernelResult<()> {
        if self.convolution.parallel_chunk == 0 {
            return Err(KernelError::ConfigError(
                "convolution.parallel_chunk must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
