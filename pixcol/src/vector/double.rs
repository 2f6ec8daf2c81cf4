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

const DOUBLE_ALIGNMENT: usize = 32;

/// IEEE 754 doubles
#[derive(Debug)]
pub struct DoubleColumnVector {
    buffer: VectorBuffer<f64>,
}

impl DoubleColumnVector {
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            buffer: VectorBuffer::new(capacity, DOUBLE_ALIGNMENT)?,
        })
    }

    pub fn with_default_size() -> Result<Self> {
        Self::new(DEFAULT_SIZE)
    }

    pub fn detached(capacity: usize) -> Self {
        Self {
            buffer: VectorBuffer::detached(capacity, DOUBLE_ALIGNMENT),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::Double
    }

    pub fn add(&mut self, value: f64) -> Result<()> {
        self.buffer.push(value)
    }

    pub fn add_str(&mut self, value: &str) -> Result<()> {
        let parsed = value.trim().parse::<f64>().map_err(|_| Error::Format {
            kind: "double",
            input: value.to_string(),
            expected: "a floating point number",
        })?;
        self.buffer.push(parsed)
    }

    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        self.buffer.set(index, value)
    }

    pub fn format(&self, index: usize) -> Option<String> {
        if *self.is_null().get(index)? {
            return None;
        }
        self.buffer.value(index).map(|value| value.to_string())
    }
}

impl_vector_buffer!(DoubleColumnVector, f64, Double);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_parse() {
        let mut vector = DoubleColumnVector::new(1).unwrap();
        vector.add(1.5).unwrap();
        vector.add_str("-2.25").unwrap();
        vector.add_str("1e3").unwrap();
        vector.add_null().unwrap();

        assert_eq!(vector.values(), &[1.5, -2.25, 1000.0, 0.0]);
        assert_eq!(vector.is_null(), &[false, false, false, true]);
        assert_eq!(vector.format(2).as_deref(), Some("1000"));
        assert!(matches!(vector.add_str("one"), Err(Error::Format { .. })));
        assert_eq!(vector.len(), 4);
    }

    #[test]
    fn test_detached_vector() {
        let mut vector = DoubleColumnVector::detached(4);
        assert!(vector.current().is_none());
        vector.add_str("0.5").unwrap();
        assert_eq!(vector.current(), Some(&[0.5][..]));
    }
}
