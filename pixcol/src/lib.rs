/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # PIXCOL - Column Vectors and Pixel Writers
//!
//! This library implements the columnar write path of a table format. Callers append
//! typed values into column vectors, then hand those vectors to column writers which
//! split the rows into fixed-size groups called *pixels*, encode every pixel either as
//! raw fixed-width values or through a run-length integer encoder, and keep per-pixel
//! statistics alongside a null bitmap.
//!
//! ```rust
//! use pixcol::ColumnType;
//! use pixcol::options::WriterOptions;
//! use pixcol::vector::ColumnVector;
//! use pixcol::writer::ColumnWriter;
//!
//! let options = WriterOptions::default().with_pixel_stride(4);
//! let mut vector = ColumnVector::new(ColumnType::Date, 8).unwrap();
//! vector.add_str("2024-01-15").unwrap();
//! vector.add_null().unwrap();
//!
//! let mut writer = ColumnWriter::new(ColumnType::Date, &options).unwrap();
//! writer.write(&vector, vector.len()).unwrap();
//! let chunk = writer.finish().unwrap();
//! assert_eq!(chunk.meta.row_count, 2);
//! ```

use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub mod aligned;
pub mod calendar;
pub mod compression;
pub mod error;
pub mod options;
pub mod serialization;
pub mod sink;
pub mod stats;
pub mod vector;
pub mod writer;

pub use error::Error;
pub use error::Result;

/// Largest precision a short (64-bit unscaled) decimal can hold
pub const MAX_SHORT_DECIMAL_PRECISION: u8 = 18;

/// Largest fractional-second precision of a timestamp column (microseconds)
pub const MAX_TIMESTAMP_PRECISION: u8 = 6;

/// Logical column types supported by the write path
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Long,
    Double,
    Decimal { precision: u8, scale: u8 },
    Date,
    Timestamp { precision: u8 },
}

impl ColumnType {
    /// Decimal type after checking that it fits into a 64-bit unscaled value
    pub fn decimal(precision: u8, scale: u8) -> Result<Self> {
        if precision == 0 || precision > MAX_SHORT_DECIMAL_PRECISION || scale > precision {
            return Err(Error::InvalidDecimal { precision, scale });
        }
        Ok(ColumnType::Decimal { precision, scale })
    }

    /// Timestamp type with the default microsecond precision
    pub fn timestamp() -> Self {
        ColumnType::Timestamp {
            precision: MAX_TIMESTAMP_PRECISION,
        }
    }

    /// Width in bytes of one physical value
    pub fn physical_width(&self) -> usize {
        match self {
            ColumnType::Date => 4,
            ColumnType::Long
            | ColumnType::Double
            | ColumnType::Decimal { .. }
            | ColumnType::Timestamp { .. } => 8,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Long => write!(f, "long"),
            ColumnType::Double => write!(f, "double"),
            ColumnType::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::Timestamp { precision } => write!(f, "timestamp({precision})"),
        }
    }
}

impl FromStr for ColumnType {
    type Err = Error;

    /// Parses `long`, `double`, `date`, `timestamp`, `timestamp(p)` and `decimal(p,s)`
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        let invalid = || Error::InvalidOptions(format!("unknown column type {s:?}"));

        match normalized.as_str() {
            "long" | "bigint" => return Ok(ColumnType::Long),
            "double" => return Ok(ColumnType::Double),
            "date" => return Ok(ColumnType::Date),
            "timestamp" => return Ok(ColumnType::timestamp()),
            _ => {}
        }

        if let Some(args) = normalized
            .strip_prefix("decimal(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let (precision, scale) = args.split_once(',').ok_or_else(invalid)?;
            let precision = precision.parse::<u8>().map_err(|_| invalid())?;
            let scale = scale.parse::<u8>().map_err(|_| invalid())?;
            return ColumnType::decimal(precision, scale);
        }

        if let Some(arg) = normalized
            .strip_prefix("timestamp(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let precision = arg.parse::<u8>().map_err(|_| invalid())?;
            if precision > MAX_TIMESTAMP_PRECISION {
                return Err(invalid());
            }
            return Ok(ColumnType::Timestamp { precision });
        }

        Err(invalid())
    }
}
