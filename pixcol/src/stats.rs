/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # Pixel and column chunk statistics
//!
//! Column writers feed every non-null physical value of a pixel into a [`StatsRecorder`]
//! and report every null through [`StatsRecorder::increment`]. When a pixel is closed
//! its recorder is merged into the column chunk's recorder and reset.

use serde::Deserialize;
use serde::Serialize;

/// Value range of the non-null values seen so far
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RangeStatistics {
    /// Integers and unscaled decimals; `sum` is `None` once it overflowed
    Integer {
        minimum: i64,
        maximum: i64,
        sum: Option<i64>,
    },
    Double {
        minimum: f64,
        maximum: f64,
        sum: f64,
    },
    Date {
        minimum: i32,
        maximum: i32,
    },
    Timestamp {
        minimum: i64,
        maximum: i64,
    },
}

impl RangeStatistics {
    /// Combine two ranges of the same kind; a range of another kind is ignored
    fn merge(self, other: RangeStatistics) -> RangeStatistics {
        use RangeStatistics::*;

        match (self, other) {
            (
                Integer {
                    minimum,
                    maximum,
                    sum,
                },
                Integer {
                    minimum: other_min,
                    maximum: other_max,
                    sum: other_sum,
                },
            ) => Integer {
                minimum: minimum.min(other_min),
                maximum: maximum.max(other_max),
                sum: sum.zip(other_sum).and_then(|(a, b)| a.checked_add(b)),
            },
            (
                Double {
                    minimum,
                    maximum,
                    sum,
                },
                Double {
                    minimum: other_min,
                    maximum: other_max,
                    sum: other_sum,
                },
            ) => Double {
                minimum: minimum.min(other_min),
                maximum: maximum.max(other_max),
                sum: sum + other_sum,
            },
            (
                Date { minimum, maximum },
                Date {
                    minimum: other_min,
                    maximum: other_max,
                },
            ) => Date {
                minimum: minimum.min(other_min),
                maximum: maximum.max(other_max),
            },
            (
                Timestamp { minimum, maximum },
                Timestamp {
                    minimum: other_min,
                    maximum: other_max,
                },
            ) => Timestamp {
                minimum: minimum.min(other_min),
                maximum: maximum.max(other_max),
            },
            (current, _) => current,
        }
    }
}

/// Value count, null count and value range of a pixel or column chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsRecorder {
    number_of_values: u64,
    null_count: u64,
    range: Option<RangeStatistics>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one null row
    pub fn increment(&mut self) {
        self.null_count += 1;
    }

    /// Record `repeat` occurrences of an integer value
    pub fn update_integer(&mut self, value: i64, repeat: u64) {
        if repeat == 0 {
            return;
        }
        let total = i64::try_from(repeat)
            .ok()
            .and_then(|repeat| value.checked_mul(repeat));
        self.number_of_values += repeat;
        self.absorb(RangeStatistics::Integer {
            minimum: value,
            maximum: value,
            sum: total,
        });
    }

    pub fn update_double(&mut self, value: f64) {
        self.number_of_values += 1;
        self.absorb(RangeStatistics::Double {
            minimum: value,
            maximum: value,
            sum: value,
        });
    }

    /// Record a date given as days since the epoch
    pub fn update_date(&mut self, days: i32) {
        self.number_of_values += 1;
        self.absorb(RangeStatistics::Date {
            minimum: days,
            maximum: days,
        });
    }

    /// Record a timestamp given as microseconds since the epoch
    pub fn update_timestamp(&mut self, micros: i64) {
        self.number_of_values += 1;
        self.absorb(RangeStatistics::Timestamp {
            minimum: micros,
            maximum: micros,
        });
    }

    /// Fold another recorder into this one
    pub fn merge(&mut self, other: &StatsRecorder) {
        self.number_of_values += other.number_of_values;
        self.null_count += other.null_count;
        if let Some(range) = other.range {
            self.absorb(range);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Non-null values recorded
    pub fn number_of_values(&self) -> u64 {
        self.number_of_values
    }

    pub fn null_count(&self) -> u64 {
        self.null_count
    }

    pub fn has_null(&self) -> bool {
        self.null_count > 0
    }

    pub fn range(&self) -> Option<RangeStatistics> {
        self.range
    }

    fn absorb(&mut self, range: RangeStatistics) {
        self.range = Some(match self.range {
            Some(current) => current.merge(range),
            None => range,
        });
    }
}
