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
use crate::vector::LongColumnVector;
use crate::vector::VectorBuffer;

pub type LongColumnWriter = TypedColumnWriter<LongColumnVector>;

impl LongColumnWriter {
    pub fn new(options: &WriterOptions) -> Result<Self> {
        Self::with_type(ColumnType::Long, options)
    }
}

impl PixelEncoding for LongColumnVector {
    type Native = i64;

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
            ColumnVector::Long(vector) => Some(vector),
            _ => None,
        }
    }

    fn logical_type(&self) -> ColumnType {
        self.column_type()
    }

    fn vector_buffer(&self) -> &VectorBuffer<i64> {
        self.buffer()
    }

    fn update_statistics(stats: &mut StatsRecorder, value: i64) {
        stats.update_integer(value, 1);
    }

    fn write_raw(output: &mut OutputStream, value: i64, order: ByteOrder) {
        output.write_i64(value, order);
    }

    fn codec_value(value: i64) -> i64 {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_nulls_are_zero_and_not_counted() {
        let options = WriterOptions::default()
            .with_encoding_level(EncodingLevel::EL1)
            .with_nulls_padding(true)
            .with_byte_order(ByteOrder::Big);
        let mut writer = LongColumnWriter::new(&options).unwrap();

        let mut vector = LongColumnVector::new(4).unwrap();
        vector.add(-7).unwrap();
        vector.add_null().unwrap();
        vector.add(3).unwrap();

        writer.write_vector(&vector, 3).unwrap();
        writer.close().unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&(-7i64).to_be_bytes());
        expected.extend_from_slice(&0i64.to_be_bytes());
        expected.extend_from_slice(&3i64.to_be_bytes());
        assert_eq!(writer.output(), expected.as_slice());

        let stats = writer.column_chunk_statistics();
        assert_eq!(stats.number_of_values(), 2);
        assert_eq!(stats.null_count(), 1);
    }
}
