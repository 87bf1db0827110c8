// ─────────────────────────────────────────────────────────────────────
// StatKern — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Allocation failure: could not reserve {requested} elements")]
    AllocationFailure { requested: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown handle: {0}")]
    UnknownHandle(u64),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type KernelResult<T> = Result<T, KernelError>;

/// Host-facing class of a [`KernelError`], used by bindings to pick an exception type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad argument or bad configuration content.
    BadValue,
    OutOfMemory,
    MissingHandle,
    Io,
}

impl KernelError {
    pub fn class(&self) -> ErrorClass {
        match self {
            KernelError::InvalidInput(_)
            | KernelError::InvalidParameter(_)
            | KernelError::ConfigError(_)
            | KernelError::Json(_) => ErrorClass::BadValue,
            KernelError::AllocationFailure { .. } => ErrorClass::OutOfMemory,
            KernelError::UnknownHandle(_) => ErrorClass::MissingHandle,
            KernelError::Io(_) => ErrorClass::Io,
        }
    }
}
