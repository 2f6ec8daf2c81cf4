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
use crate::Result;

const LONG_ALIGNMENT: usize = 32;

/// Signed 64-bit integers
#[derive(Debug)]
pub struct LongColumnVector {
    buffer: VectorBuffer<i64>,
}

impl LongColumnVector {
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            buffer: VectorBuffer::new(capacity, LONG_ALIGNMENT)?,
        })
    }

    pub fn with_default_size() -> Result<Self> {
        Self::new(DEFAULT_SIZE)
    }

    pub fn detached(capacity: usize) -> Self {
        Self {
            buffer: VectorBuffer::detached(capacity, LONG_ALIGNMENT),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Long
    }

    pub fn add(&mut self, value: i64) -> Result<()> {
        self.buffer.push(value)
    }

    pub fn add_str(&mut self, value: &str) -> Result<()> {
        let parsed = value.trim().parse::<i64>().map_err(|_| Error::Format {
            kind: "long",
            input: value.to_string(),
            expected: "a signed 64-bit integer",
        })?;
        self.buffer.push(parsed)
    }

    pub fn set(&mut self, index: usize, value: i64) -> Result<()> {
        self.buffer.set(index, value)
    }

    pub fn format(&self, index: usize) -> Option<String> {
        if *self.is_null().get(index)? {
            return None;
        }
        self.buffer.value(index).map(|value| value.to_string())
    }
}

impl_vector_buffer!(LongColumnVector, i64, Long);
