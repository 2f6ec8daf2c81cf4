/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # Column vectors
//!
//! A column vector is an append-only batch of values of one logical type, kept in its
//! physical representation:
//!
//! | Vector                    | Physical | Meaning                              |
//! |---------------------------|----------|--------------------------------------|
//! | [`LongColumnVector`]      | `i64`    | the integer itself                   |
//! | [`DoubleColumnVector`]    | `f64`    | the IEEE double itself               |
//! | [`DecimalColumnVector`]   | `i64`    | unscaled value, `3.14` at scale 2 → 314 |
//! | [`DateColumnVector`]      | `i32`    | days since 1970-01-01                |
//! | [`TimestampColumnVector`] | `i64`    | microseconds since 1970-01-01 UTC    |
//!
//! [`ColumnVector`] closes over all of them for code that only learns the column type
//! at runtime.

use crate::ColumnType;
use crate::Result;

mod buffer;
mod date;
mod decimal;
mod double;
mod long;
mod timestamp;

pub use buffer::VectorBuffer;
pub use date::DateColumnVector;
pub use decimal::DecimalColumnVector;
pub use double::DoubleColumnVector;
pub use long::LongColumnVector;
pub use timestamp::TimestampColumnVector;

/// Row count of a vector built without an explicit capacity
pub const DEFAULT_SIZE: usize = 1024;

/// Generates the buffer accessors every typed vector shares
macro_rules! impl_vector_buffer {
    ($vector:ty, $native:ty, $variant:ident) => {
        impl $vector {
            pub fn len(&self) -> usize {
                self.buffer.len()
            }

            pub fn is_empty(&self) -> bool {
                self.buffer.is_empty()
            }

            pub fn capacity(&self) -> usize {
                self.buffer.capacity()
            }

            pub fn memory_usage(&self) -> usize {
                self.buffer.memory_usage()
            }

            pub fn no_nulls(&self) -> bool {
                self.buffer.no_nulls()
            }

            pub fn is_closed(&self) -> bool {
                self.buffer.is_closed()
            }

            /// Committed physical values; null rows hold zero
            pub fn values(&self) -> &[$native] {
                self.buffer.values()
            }

            pub fn is_null(&self) -> &[bool] {
                self.buffer.is_null()
            }

            pub fn current(&self) -> Option<&[$native]> {
                self.buffer.current()
            }

            pub fn seek(&mut self, index: usize) -> $crate::Result<()> {
                self.buffer.seek(index)
            }

            pub fn add_null(&mut self) -> $crate::Result<()> {
                self.buffer.push_null()
            }

            pub fn set_null(&mut self, index: usize) -> $crate::Result<()> {
                self.buffer.set_null(index)
            }

            pub fn ensure_size(&mut self, size: usize, preserve_data: bool) -> $crate::Result<()> {
                self.buffer.ensure_size(size, preserve_data)
            }

            pub fn reset(&mut self) -> $crate::Result<()> {
                self.buffer.reset()
            }

            pub fn close(&mut self) {
                self.buffer.close()
            }

            pub fn buffer(&self) -> &$crate::vector::VectorBuffer<$native> {
                &self.buffer
            }
        }

        impl From<$vector> for $crate::vector::ColumnVector {
            fn from(vector: $vector) -> Self {
                $crate::vector::ColumnVector::$variant(vector)
            }
        }
    };
}

pub(crate) use impl_vector_buffer;

/// A column vector of any supported type
#[derive(Debug)]
pub enum ColumnVector {
    Long(LongColumnVector),
    Double(DoubleColumnVector),
    Decimal(DecimalColumnVector),
    Date(DateColumnVector),
    Timestamp(TimestampColumnVector),
}

macro_rules! dispatch {
    ($self:expr, $vector:ident => $body:expr) => {
        match $self {
            ColumnVector::Long($vector) => $body,
            ColumnVector::Double($vector) => $body,
            ColumnVector::Decimal($vector) => $body,
            ColumnVector::Date($vector) => $body,
            ColumnVector::Timestamp($vector) => $body,
        }
    };
}

impl ColumnVector {
    /// Empty vector matching `column_type`
    pub fn new(column_type: ColumnType, capacity: usize) -> Result<Self> {
        Ok(match column_type {
            ColumnType::Long => ColumnVector::Long(LongColumnVector::new(capacity)?),
            ColumnType::Double => ColumnVector::Double(DoubleColumnVector::new(capacity)?),
            ColumnType::Decimal { precision, scale } => {
                ColumnVector::Decimal(DecimalColumnVector::new(capacity, precision, scale)?)
            }
            ColumnType::Date => ColumnVector::Date(DateColumnVector::new(capacity)?),
            ColumnType::Timestamp { precision } => {
                ColumnVector::Timestamp(TimestampColumnVector::new(capacity, precision)?)
            }
        })
    }

    pub fn column_type(&self) -> ColumnType {
        dispatch!(self, vector => vector.column_type())
    }

    pub fn len(&self) -> usize {
        dispatch!(self, vector => vector.len())
    }

    pub fn is_empty(&self) -> bool {
        dispatch!(self, vector => vector.is_empty())
    }

    pub fn capacity(&self) -> usize {
        dispatch!(self, vector => vector.capacity())
    }

    pub fn memory_usage(&self) -> usize {
        dispatch!(self, vector => vector.memory_usage())
    }

    pub fn no_nulls(&self) -> bool {
        dispatch!(self, vector => vector.no_nulls())
    }

    pub fn is_closed(&self) -> bool {
        dispatch!(self, vector => vector.is_closed())
    }

    pub fn is_null(&self) -> &[bool] {
        dispatch!(self, vector => vector.is_null())
    }

    /// Parse and append a value in the type's textual form
    pub fn add_str(&mut self, value: &str) -> Result<()> {
        dispatch!(self, vector => vector.add_str(value))
    }

    pub fn add_null(&mut self) -> Result<()> {
        dispatch!(self, vector => vector.add_null())
    }

    pub fn reset(&mut self) -> Result<()> {
        dispatch!(self, vector => vector.reset())
    }

    pub fn close(&mut self) {
        dispatch!(self, vector => vector.close())
    }

    /// Textual form of the value at `index`, `None` for nulls and out-of-range rows
    pub fn format(&self, index: usize) -> Option<String> {
        dispatch!(self, vector => vector.format(index))
    }
}
