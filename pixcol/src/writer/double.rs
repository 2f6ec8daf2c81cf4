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
use crate::options::EncodingLevel;
use crate::options::WriterOptions;
use crate::sink::OutputStream;
use crate::stats::StatsRecorder;
use crate::vector::ColumnVector;
use crate::vector::DoubleColumnVector;
use crate::vector::VectorBuffer;

/// Writer for double columns; values are always written raw
pub type DoubleColumnWriter = TypedColumnWriter<DoubleColumnVector>;

impl DoubleColumnWriter {
    pub fn new(options: &WriterOptions) -> Result<Self> {
        Self::with_type(ColumnType::Double, options)
    }
}

impl PixelEncoding for DoubleColumnVector {
    type Native = f64;

    fn runlength_encoding(_options: &WriterOptions) -> bool {
        false
    }

    fn decide_nulls_padding(options: &WriterOptions) -> bool {
        if options.encoding_level.at_least(EncodingLevel::EL2) {
            return false;
        }
        options.nulls_padding
    }

    fn from_vector(vector: &ColumnVector) -> Option<&Self> {
        match vector {
            ColumnVector::Double(vector) => Some(vector),
            _ => None,
        }
    }

    fn logical_type(&self) -> ColumnType {
        self.column_type()
    }

    fn vector_buffer(&self) -> &VectorBuffer<f64> {
        self.buffer()
    }

    fn update_statistics(stats: &mut StatsRecorder, value: f64) {
        stats.update_double(value);
    }

    fn write_raw(output: &mut OutputStream, value: f64, order: ByteOrder) {
        output.write_f64(value, order);
    }

    // Never reached; doubles are not run-length encoded.
    fn codec_value(value: f64) -> i64 {
        value.to_bits() as i64
    }
}
