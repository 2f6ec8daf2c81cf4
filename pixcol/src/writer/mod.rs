/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # Column writers
//!
//! A column writer consumes row batches from column vectors of one logical type and
//! splits them into pixels of `pixel_stride` rows. Every closed pixel is encoded into the
//! writer's output stream, its statistics are recorded in the column chunk index and its
//! null flags are appended to the chunk-level null flags.
//!
//! ## Per-type policy
//!
//! | Writer      | Run-length at `EL2` | Nulls padding                      |
//! |-------------|---------------------|------------------------------------|
//! | Long        | yes                 | off at `EL2`, else configured flag |
//! | Date        | yes                 | off at `EL2`, else configured flag |
//! | Timestamp   | yes                 | configured flag at every level     |
//! | Decimal     | never               | configured flag at every level     |
//! | Double      | never               | off at `EL2`, else configured flag |
//!
//! With nulls padding enabled a null row occupies a zeroed slot in the value stream;
//! otherwise it only shows up in the null bitmap.

use crate::ColumnType;
use crate::Error;
use crate::Result;
use crate::aligned::Native;
use crate::options::ByteOrder;
use crate::options::WriterOptions;
use crate::serialization::ColumnChunk;
use crate::serialization::ColumnChunkIndex;
use crate::sink::OutputStream;
use crate::stats::StatsRecorder;
use crate::vector::ColumnVector;
use crate::vector::DateColumnVector;
use crate::vector::DecimalColumnVector;
use crate::vector::DoubleColumnVector;
use crate::vector::LongColumnVector;
use crate::vector::TimestampColumnVector;
use crate::vector::VectorBuffer;
use serde::Deserialize;
use serde::Serialize;

mod base;
mod date;
mod decimal;
mod double;
mod long;
mod timestamp;

pub use base::TypedColumnWriter;
pub use date::DateColumnWriter;
pub use decimal::DecimalColumnWriter;
pub use double::DoubleColumnWriter;
pub use long::LongColumnWriter;
pub use timestamp::TimestampColumnWriter;

/// Encoding recorded in the column chunk metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnEncoding {
    None,
    RunLength,
}

/// Type-specific half of a column writer, implemented by every typed column vector
pub trait PixelEncoding: Sized {
    type Native: Native;

    /// Whether pixels go through the run-length encoder, fixed at construction
    fn runlength_encoding(options: &WriterOptions) -> bool;

    /// Whether null rows occupy a zeroed slot in the value stream, fixed at construction
    fn decide_nulls_padding(options: &WriterOptions) -> bool;

    fn from_vector(vector: &ColumnVector) -> Option<&Self>;

    fn logical_type(&self) -> ColumnType;

    fn vector_buffer(&self) -> &VectorBuffer<Self::Native>;

    fn update_statistics(stats: &mut StatsRecorder, value: Self::Native);

    fn write_raw(output: &mut OutputStream, value: Self::Native, order: ByteOrder);

    /// Value handed to the run-length encoder
    fn codec_value(value: Self::Native) -> i64;
}

/// A column writer of any supported type
#[derive(Debug)]
pub enum ColumnWriter {
    Long(LongColumnWriter),
    Double(DoubleColumnWriter),
    Decimal(DecimalColumnWriter),
    Date(DateColumnWriter),
    Timestamp(TimestampColumnWriter),
}

macro_rules! dispatch {
    ($self:expr, $writer:ident => $body:expr) => {
        match $self {
            ColumnWriter::Long($writer) => $body,
            ColumnWriter::Double($writer) => $body,
            ColumnWriter::Decimal($writer) => $body,
            ColumnWriter::Date($writer) => $body,
            ColumnWriter::Timestamp($writer) => $body,
        }
    };
}

impl ColumnWriter {
    pub fn new(column_type: ColumnType, options: &WriterOptions) -> Result<Self> {
        Ok(match column_type {
            ColumnType::Long => ColumnWriter::Long(LongColumnWriter::new(options)?),
            ColumnType::Double => ColumnWriter::Double(DoubleColumnWriter::new(options)?),
            ColumnType::Decimal { precision, scale } => {
                ColumnWriter::Decimal(DecimalColumnWriter::new(precision, scale, options)?)
            }
            ColumnType::Date => ColumnWriter::Date(DateColumnWriter::new(options)?),
            ColumnType::Timestamp { precision } => {
                ColumnWriter::Timestamp(TimestampColumnWriter::new(precision, options)?)
            }
        })
    }

    /// Nulls padding a writer of `column_type` would use under `options`
    pub fn decide_nulls_padding(column_type: ColumnType, options: &WriterOptions) -> bool {
        match column_type {
            ColumnType::Long => LongColumnVector::decide_nulls_padding(options),
            ColumnType::Double => DoubleColumnVector::decide_nulls_padding(options),
            ColumnType::Decimal { .. } => DecimalColumnVector::decide_nulls_padding(options),
            ColumnType::Date => DateColumnVector::decide_nulls_padding(options),
            ColumnType::Timestamp { .. } => TimestampColumnVector::decide_nulls_padding(options),
        }
    }

    /// Write the first `length` rows of `vector`, returning the bytes written so far
    pub fn write(&mut self, vector: &ColumnVector, length: usize) -> Result<usize> {
        dispatch!(self, writer => writer.write(vector, length))
    }

    /// Flush the pending pixel and stop accepting rows
    pub fn close(&mut self) -> Result<()> {
        dispatch!(self, writer => writer.close())
    }

    pub fn finish(self) -> Result<ColumnChunk> {
        dispatch!(self, writer => writer.finish())
    }

    pub fn column_type(&self) -> ColumnType {
        dispatch!(self, writer => writer.column_type())
    }

    pub fn column_chunk_encoding(&self) -> ColumnEncoding {
        dispatch!(self, writer => writer.column_chunk_encoding())
    }

    pub fn nulls_padding(&self) -> bool {
        dispatch!(self, writer => writer.nulls_padding())
    }

    pub fn has_null(&self) -> bool {
        dispatch!(self, writer => writer.has_null())
    }

    pub fn null_flags(&self) -> &[bool] {
        dispatch!(self, writer => writer.null_flags())
    }

    pub fn pixels_written(&self) -> usize {
        dispatch!(self, writer => writer.pixels_written())
    }

    pub fn pending_rows(&self) -> usize {
        dispatch!(self, writer => writer.pending_rows())
    }

    pub fn size(&self) -> usize {
        dispatch!(self, writer => writer.size())
    }

    pub fn output(&self) -> &[u8] {
        dispatch!(self, writer => writer.output())
    }

    pub fn column_chunk_index(&self) -> &ColumnChunkIndex {
        dispatch!(self, writer => writer.column_chunk_index())
    }

    pub fn column_chunk_statistics(&self) -> &StatsRecorder {
        dispatch!(self, writer => writer.column_chunk_statistics())
    }

    pub fn is_closed(&self) -> bool {
        dispatch!(self, writer => writer.is_closed())
    }
}

/// Error for a vector handed to a writer of another type
pub(crate) fn type_mismatch(writer: ColumnType, vector: ColumnType) -> Error {
    Error::TypeMismatch {
        writer: writer.to_string(),
        vector: vector.to_string(),
    }
}
