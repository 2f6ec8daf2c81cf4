/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

use super::DEFAULT_SIZE;
use super::VectorBuffer;
use super::impl_vector_buffer;
use crate::ColumnType;
use crate::Error;
use crate::MAX_TIMESTAMP_PRECISION;
use crate::Result;
use crate::calendar;
use chrono::DateTime;
use chrono::Utc;

const TIMESTAMP_ALIGNMENT: usize = 64;

/// Timestamps stored as microseconds since 1970-01-01 00:00:00 UTC.
///
/// `precision` is the number of fractional-second digits declared by the column type.
/// It travels with the type metadata; values always keep full microsecond resolution.
#[derive(Debug)]
pub struct TimestampColumnVector {
    buffer: VectorBuffer<i64>,
    precision: u8,
}

impl TimestampColumnVector {
    pub fn new(capacity: usize, precision: u8) -> Result<Self> {
        Self::check_precision(precision)?;
        Ok(Self {
            buffer: VectorBuffer::new(capacity, TIMESTAMP_ALIGNMENT)?,
            precision,
        })
    }

    pub fn with_default_size() -> Result<Self> {
        Self::new(DEFAULT_SIZE, MAX_TIMESTAMP_PRECISION)
    }

    /// Vector that allocates its value storage only on the first write
    pub fn detached(capacity: usize, precision: u8) -> Result<Self> {
        Self::check_precision(precision)?;
        Ok(Self {
            buffer: VectorBuffer::detached(capacity, TIMESTAMP_ALIGNMENT),
            precision,
        })
    }

    fn check_precision(precision: u8) -> Result<()> {
        if precision > MAX_TIMESTAMP_PRECISION {
            return Err(Error::InvalidOptions(format!(
                "timestamp precision {precision} exceeds {MAX_TIMESTAMP_PRECISION}"
            )));
        }
        Ok(())
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Timestamp {
            precision: self.precision,
        }
    }

    /// Append microseconds since the epoch
    pub fn add(&mut self, micros: i64) -> Result<()> {
        self.buffer.push(micros)
    }

    /// Append a `YYYY-MM-DD HH:MM:SS[.ffffff]` timestamp
    pub fn add_str(&mut self, value: &str) -> Result<()> {
        let micros = calendar::parse_timestamp(value)?;
        self.buffer.push(micros)
    }

    pub fn add_datetime(&mut self, value: &DateTime<Utc>) -> Result<()> {
        self.buffer.push(calendar::datetime_to_micros(value))
    }

    pub fn set(&mut self, index: usize, micros: i64) -> Result<()> {
        self.buffer.set(index, micros)
    }

    pub fn format(&self, index: usize) -> Option<String> {
        if *self.is_null().get(index)? {
            return None;
        }
        calendar::format_timestamp(self.buffer.value(index)?)
    }
}

impl_vector_buffer!(TimestampColumnVector, i64, Timestamp);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_str_stores_micros() {
        let mut vector = TimestampColumnVector::new(2, 6).unwrap();
        vector.add_str("2023-12-23 00:00:00.500000").unwrap();
        vector.add_str("1970-01-01 00:00:01").unwrap();

        assert_eq!(vector.values(), &[1_703_289_600_500_000, 1_000_000]);
        assert_eq!(
            vector.format(0).as_deref(),
            Some("2023-12-23 00:00:00.500000")
        );
        assert!(vector.buffer().is_aligned());
        assert_eq!(vector.buffer().values().as_ptr() as usize % 64, 0);
    }

    #[test]
    fn test_add_datetime() {
        let mut vector = TimestampColumnVector::with_default_size().unwrap();
        let instant = DateTime::from_timestamp(1_700_000_000, 250_000_000).unwrap();
        vector.add_datetime(&instant).unwrap();
        assert_eq!(vector.values(), &[1_700_000_000_250_000]);
    }

    #[test]
    fn test_malformed_timestamp_is_rejected() {
        let mut vector = TimestampColumnVector::new(2, 3).unwrap();
        assert!(matches!(
            vector.add_str("2023-12-23"),
            Err(Error::Format { .. })
        ));
        assert!(vector.is_empty());
        assert_eq!(vector.column_type(), ColumnType::Timestamp { precision: 3 });
    }

    #[test]
    fn test_precision_is_validated() {
        assert!(TimestampColumnVector::new(2, 7).is_err());
        assert!(TimestampColumnVector::detached(2, 9).is_err());
        assert!(
            TimestampColumnVector::detached(2, 0)
                .unwrap()
                .current()
                .is_none()
        );
    }
}
