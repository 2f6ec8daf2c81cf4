/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # Run-length integer encoding
//!
//! Integer-like pixels (longs, dates and timestamps) are handed to a [`RunLenIntEncoder`]
//! once the encoding level enables run-length encoding. The output is a sequence of
//! groups:
//!
//! ### Run group
//! - **Header**: one byte holding `length - 3`, so runs of 3 to 130 values fit
//! - **Delta**: one signed byte, the constant difference between consecutive values
//! - **Base**: the first value of the run as a zigzag varint
//!
//! ### Literal group
//! - **Header**: one signed byte holding `-count`, for 1 to 128 values
//! - **Values**: `count` zigzag varints
//!
//! A sorted or constant column shrinks to a few bytes per 130 rows while random data
//! costs one header byte per 128 values on top of the varints.

use crate::Error;
use crate::Result;

const MIN_REPEAT: usize = 3;
const MAX_REPEAT: usize = 127 + MIN_REPEAT;
const MAX_LITERALS: usize = 128;

/// Run-length encoder for signed 64-bit integers
#[derive(Debug, Default)]
pub struct RunLenIntEncoder {
    literals: Vec<i64>,
    closed: bool,
}

impl RunLenIntEncoder {
    pub fn new() -> Self {
        Self {
            literals: Vec::with_capacity(MAX_LITERALS),
            closed: false,
        }
    }

    /// Encode `values` into a self-contained byte sequence.
    ///
    /// The result depends only on `values`; no state carries over between calls.
    pub fn encode(&mut self, values: &[i64]) -> Result<Vec<u8>> {
        if self.closed {
            return Err(Error::UseAfterClose("run-length encoder"));
        }

        let mut output = Vec::with_capacity(values.len() + 2);
        self.literals.clear();

        let mut position = 0;
        while position < values.len() {
            match run_at(&values[position..]) {
                Some((length, delta)) => {
                    self.flush_literals(&mut output);
                    output.push((length - MIN_REPEAT) as u8);
                    output.push(delta as u8);
                    encode_vle(values[position], &mut output);
                    position += length;
                }
                None => {
                    self.literals.push(values[position]);
                    if self.literals.len() == MAX_LITERALS {
                        self.flush_literals(&mut output);
                    }
                    position += 1;
                }
            }
        }
        self.flush_literals(&mut output);

        Ok(output)
    }

    /// Release the scratch buffer; the encoder rejects further input
    pub fn close(&mut self) {
        self.literals = Vec::new();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn flush_literals(&mut self, output: &mut Vec<u8>) {
        if self.literals.is_empty() {
            return;
        }
        output.push((-(self.literals.len() as i16)) as i8 as u8);
        for &value in &self.literals {
            encode_vle(value, output);
        }
        self.literals.clear();
    }
}

/// Length and delta of the run starting at `values[0]`, if it is long enough to pay off
fn run_at(values: &[i64]) -> Option<(usize, i8)> {
    if values.len() < MIN_REPEAT {
        return None;
    }

    let step = |i: usize| -> Option<i8> {
        values[i]
            .checked_sub(values[i - 1])
            .and_then(|delta| i8::try_from(delta).ok())
    };

    let delta = step(1)?;
    let mut length = 2;
    while length < values.len() && length < MAX_REPEAT && step(length) == Some(delta) {
        length += 1;
    }

    (length >= MIN_REPEAT).then_some((length, delta))
}

/// Variable Length Encoding for signed integers using zigzag encoding
///
/// Converts signed integers to variable-length byte sequences where smaller absolute
/// values use fewer bytes: 0 → 0, -1 → 1, 1 → 2, -2 → 3, 2 → 4, etc.
pub(crate) fn encode_vle(value: i64, output: &mut Vec<u8>) {
    let unsigned = ((value << 1) ^ (value >> 63)) as u64;

    let mut remaining = unsigned;
    while remaining >= 0x80 {
        output.push((remaining & 0x7F) as u8 | 0x80);
        remaining >>= 7;
    }
    output.push(remaining as u8);
}

/// Decode one zigzag varint, returning the value and the bytes consumed
#[cfg(test)]
pub(crate) fn decode_vle(input: &[u8]) -> Option<(i64, usize)> {
    let mut result = 0u64;
    let mut shift = 0;

    for (index, &byte) in input.iter().enumerate() {
        result |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            let signed = ((result >> 1) as i64) ^ (-((result & 1) as i64));
            return Some((signed, index + 1));
        }
        shift += 7;
        if shift >= 64 {
            return None;
        }
    }
    None
}
