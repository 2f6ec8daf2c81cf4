/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! Error type shared by column vectors, writers and the chunk container.
//!
//! Parsing failures (`Format`, `PrecisionExceeded`, `Conversion`) concern a single
//! value and leave the vector untouched, so the caller may reject the row and go on.
//! The remaining variants describe caller bugs or resource exhaustion and are never
//! retried internally.

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed {kind} value {input:?}, expected {expected}")]
    Format {
        kind: &'static str,
        input: String,
        expected: &'static str,
    },

    #[error("value {value} exceeds the allowed precision {precision}")]
    PrecisionExceeded { value: String, precision: u8 },

    #[error("cannot normalize {input:?}: {reason}")]
    Conversion { input: String, reason: &'static str },

    #[error("{writer} column writer cannot consume a {vector} column vector")]
    TypeMismatch { writer: String, vector: String },

    #[error("failed to allocate {bytes} bytes aligned to {align}")]
    Allocation { bytes: usize, align: usize },

    #[error("{0} used after close")]
    UseAfterClose(&'static str),

    #[error("invalid decimal type: precision {precision}, scale {scale}")]
    InvalidDecimal { precision: u8, scale: u8 },

    #[error("invalid writer options: {0}")]
    InvalidOptions(String),

    #[error("requested {requested} rows but the column vector holds {available}")]
    RowCountOutOfBounds { requested: usize, available: usize },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization Error: {0}")]
    Serialization(#[from] bincode::Error),
}

impl Error {
    /// Whether the error concerns one input value rather than the vector or writer
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            Error::Format { .. } | Error::PrecisionExceeded { .. } | Error::Conversion { .. }
        )
    }
}
