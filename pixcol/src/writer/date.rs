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
use crate::vector::DateColumnVector;
use crate::vector::VectorBuffer;

/// Writer for date columns; day offsets are run-length encoded from `EL2` on
pub type DateColumnWriter = TypedColumnWriter<DateColumnVector>;

impl DateColumnWriter {
    pub fn new(options: &WriterOptions) -> Result<Self> {
        Self::with_type(ColumnType::Date, options)
    }
}

impl PixelEncoding for DateColumnVector {
    type Native = i32;

    fn runlength_encoding(options: &WriterOptions) -> bool {
        options.encoding_level.at_least(EncodingLevel::EL2)
    }

    fn decide_nulls_padding(options: &WriterOptions) -> bool {
        if options.encoding_level.at_least(EncodingLevel::EL2) {
            return false;
        }
        options.nulls_padding
    }

    fn from_vector(vector: &ColumnVector) -> Option<&Self> {
        match vector {
            ColumnVector::Date(vector) => Some(vector),
            _ => None,
        }
    }

    fn logical_type(&self) -> ColumnType {
        self.column_type()
    }

    fn vector_buffer(&self) -> &VectorBuffer<i32> {
        self.buffer()
    }

    fn update_statistics(stats: &mut StatsRecorder, days: i32) {
        stats.update_date(days);
    }

    fn write_raw(output: &mut OutputStream, days: i32, order: ByteOrder) {
        output.write_i32(days, order);
    }

    fn codec_value(days: i32) -> i64 {
        i64::from(days)
    }
}
