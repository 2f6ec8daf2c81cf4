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
use crate::Result;
use crate::calendar;
use chrono::NaiveDate;

const DATE_ALIGNMENT: usize = 32;

/// Dates stored as days since 1970-01-01 UTC
#[derive(Debug)]
pub struct DateColumnVector {
    buffer: VectorBuffer<i32>,
}

impl DateColumnVector {
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            buffer: VectorBuffer::new(capacity, DATE_ALIGNMENT)?,
        })
    }

    pub fn with_default_size() -> Result<Self> {
        Self::new(DEFAULT_SIZE)
    }

    /// Vector that allocates its value storage only on the first write
    pub fn detached(capacity: usize) -> Self {
        Self {
            buffer: VectorBuffer::detached(capacity, DATE_ALIGNMENT),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Date
    }

    /// Append a day offset from the epoch
    pub fn add(&mut self, days: i32) -> Result<()> {
        self.buffer.push(days)
    }

    /// Append a strict `YYYY-MM-DD` date
    pub fn add_str(&mut self, value: &str) -> Result<()> {
        let days = calendar::parse_date(value)?;
        self.buffer.push(days)
    }

    pub fn add_date(&mut self, date: NaiveDate) -> Result<()> {
        self.buffer.push(calendar::date_to_days(date))
    }

    /// Overwrite row `index` with a day offset from the epoch
    pub fn set(&mut self, index: usize, days: i32) -> Result<()> {
        self.buffer.set(index, days)
    }

    pub fn format(&self, index: usize) -> Option<String> {
        if *self.is_null().get(index)? {
            return None;
        }
        calendar::format_date(self.buffer.value(index)?)
    }
}

impl_vector_buffer!(DateColumnVector, i32, Date);
