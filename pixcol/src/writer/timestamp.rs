/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

use super::PixelEncoding;
use super::TypedColumnWriter;
use crate::ColumnType;
use crate::Error;
use crate::MAX_TIMESTAMP_PRECISION;
use crate::Result;
use crate::options::ByteOrder;
use crate::options::EncodingLevel;
use crate::options::WriterOptions;
use crate::sink::OutputStream;
use crate::stats::StatsRecorder;
use crate::vector::ColumnVector;
use crate::vector::TimestampColumnVector;
use crate::vector::VectorBuffer;

/// Writer for timestamp columns.
///
/// Microsecond values are run-length encoded from `EL2` on. Null padding follows the
/// configured flag at every encoding level.
pub type TimestampColumnWriter = TypedColumnWriter<TimestampColumnVector>;

impl TimestampColumnWriter {
    pub fn new(precision: u8, options: &WriterOptions) -> Result<Self> {
        if precision > MAX_TIMESTAMP_PRECISION {
            return Err(Error::InvalidOptions(format!(
                "timestamp precision {precision} exceeds {MAX_TIMESTAMP_PRECISION}"
            )));
        }
        Self::with_type(ColumnType::Timestamp { precision }, options)
    }
}

impl PixelEncoding for TimestampColumnVector {
    type Native = i64;

    fn runlength_encoding(options: &WriterOptions) -> bool {
        options.encoding_level.at_least(EncodingLevel::EL2)
    }

    fn decide_nulls_padding(options: &WriterOptions) -> bool {
        options.nulls_padding
    }

    fn from_vector(vector: &ColumnVector) -> Option<&Self> {
        match vector {
            ColumnVector::Timestamp(vector) => Some(vector),
            _ => None,
        }
    }

    fn logical_type(&self) -> ColumnType {
        self.column_type()
    }

    fn vector_buffer(&self) -> &VectorBuffer<i64> {
        self.buffer()
    }

    fn update_statistics(stats: &mut StatsRecorder, micros: i64) {
        stats.update_timestamp(micros);
    }

    fn write_raw(output: &mut OutputStream, micros: i64, order: ByteOrder) {
        output.write_i64(micros, order);
    }

    fn codec_value(micros: i64) -> i64 {
        micros
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::RangeStatistics;

    #[test]
    fn test_padded_placeholders_are_encoded_but_not_recorded() {
        let options = WriterOptions::default()
            .with_pixel_stride(3)
            .with_nulls_padding(true);
        let mut writer = TimestampColumnWriter::new(6, &options).unwrap();
        assert!(writer.nulls_padding());

        let mut vector = TimestampColumnVector::new(4, 6).unwrap();
        vector.add(5).unwrap();
        vector.add_null().unwrap();
        vector.add(9).unwrap();

        writer.write_vector(&vector, 3).unwrap();
        assert_eq!(writer.pixels_written(), 1);

        // three literals: 5, the zero placeholder, 9
        assert_eq!(writer.output(), &[0xFD, 10, 0, 18]);
        let stats = &writer.column_chunk_index().pixel_statistics[0];
        assert_eq!(stats.number_of_values(), 2);
        assert_eq!(stats.null_count(), 1);
        assert_eq!(
            stats.range(),
            Some(RangeStatistics::Timestamp {
                minimum: 5,
                maximum: 9
            })
        );
    }

    #[test]
    fn test_precision_is_validated() {
        assert!(TimestampColumnWriter::new(7, &WriterOptions::default()).is_err());
        let writer = TimestampColumnWriter::new(3, &WriterOptions::default()).unwrap();
        assert_eq!(writer.column_type(), ColumnType::Timestamp { precision: 3 });
    }
}
