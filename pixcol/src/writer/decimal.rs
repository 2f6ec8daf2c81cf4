/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

use super::PixelEncoding;
use super::TypedColumnWriter;
use crate::ColumnType;
use crate::Result;
use crate::options::ByteOrder;
use crate::options::WriterOptions;
use crate::sink::OutputStream;
use crate::stats::StatsRecorder;
use crate::vector::ColumnVector;
use crate::vector::DecimalColumnVector;
use crate::vector::VectorBuffer;

/// Writer for short decimal columns.
///
/// Unscaled values are written raw at every encoding level, and null padding follows the
/// configured flag regardless of the level.
pub type DecimalColumnWriter = TypedColumnWriter<DecimalColumnVector>;

impl DecimalColumnWriter {
    pub fn new(precision: u8, scale: u8, options: &WriterOptions) -> Result<Self> {
        let column_type = ColumnType::decimal(precision, scale)?;
        Self::with_type(column_type, options)
    }
}

impl PixelEncoding for DecimalColumnVector {
    type Native = i64;

    fn runlength_encoding(_options: &WriterOptions) -> bool {
        false
    }

    fn decide_nulls_padding(options: &WriterOptions) -> bool {
        options.nulls_padding
    }

    fn from_vector(vector: &ColumnVector) -> Option<&Self> {
        match vector {
            ColumnVector::Decimal(vector) => Some(vector),
            _ => None,
        }
    }

    fn logical_type(&self) -> ColumnType {
        self.column_type()
    }

    fn vector_buffer(&self) -> &VectorBuffer<i64> {
        self.buffer()
    }

    fn update_statistics(stats: &mut StatsRecorder, unscaled: i64) {
        stats.update_integer(unscaled, 1);
    }

    fn write_raw(output: &mut OutputStream, unscaled: i64, order: ByteOrder) {
        output.write_i64(unscaled, order);
    }

    fn codec_value(unscaled: i64) -> i64 {
        unscaled
    }
}
