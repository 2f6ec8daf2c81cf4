/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! Writer configuration shared by every column of a table.
//!
//! [`WriterOptions`] deserializes from YAML or JSON with every field optional:
//!
//! ```yaml
//! pixel_stride: 10000
//! encoding_level: EL2
//! byte_order: Little
//! nulls_padding: false
//! ```

use crate::Error;
use crate::Result;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Rows per pixel when nothing else is configured
pub const DEFAULT_PIXEL_STRIDE: usize = 10_000;

/// How aggressively column writers transform values before writing them.
///
/// Levels are ordered; `EL2` and above enable run-length encoding for integer-like
/// columns and keep nulls out of the value stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EncodingLevel {
    EL0,
    EL1,
    #[default]
    EL2,
}

impl EncodingLevel {
    /// Whether this level is at or above `other`
    pub fn at_least(self, other: EncodingLevel) -> bool {
        self >= other
    }
}

impl fmt::Display for EncodingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingLevel::EL0 => write!(f, "EL0"),
            EncodingLevel::EL1 => write!(f, "EL1"),
            EncodingLevel::EL2 => write!(f, "EL2"),
        }
    }
}

impl FromStr for EncodingLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EL0" | "0" => Ok(EncodingLevel::EL0),
            "EL1" | "1" => Ok(EncodingLevel::EL1),
            "EL2" | "2" => Ok(EncodingLevel::EL2),
            _ => Err(Error::InvalidOptions(format!("unknown encoding level {s:?}"))),
        }
    }
}

/// Byte order of raw fixed-width values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    pub pixel_stride: usize,
    pub encoding_level: EncodingLevel,
    pub byte_order: ByteOrder,
    /// Whether null rows occupy a zeroed slot in the value stream below `EL2`
    pub nulls_padding: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            pixel_stride: DEFAULT_PIXEL_STRIDE,
            encoding_level: EncodingLevel::default(),
            byte_order: ByteOrder::default(),
            nulls_padding: false,
        }
    }
}

impl WriterOptions {
    pub fn with_pixel_stride(mut self, pixel_stride: usize) -> Self {
        self.pixel_stride = pixel_stride;
        self
    }

    pub fn with_encoding_level(mut self, encoding_level: EncodingLevel) -> Self {
        self.encoding_level = encoding_level;
        self
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn with_nulls_padding(mut self, nulls_padding: bool) -> Self {
        self.nulls_padding = nulls_padding;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.pixel_stride == 0 {
            return Err(Error::InvalidOptions(
                "pixel stride must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
