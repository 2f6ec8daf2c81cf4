/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! Growth, null tracking and value normalization of the column vectors

use chrono::{Duration, NaiveDate};
use pixcol::vector::{
    ColumnVector, DateColumnVector, DecimalColumnVector, DoubleColumnVector, LongColumnVector,
    TimestampColumnVector,
};
use pixcol::{ColumnType, Error};

#[test]
fn test_growth_preserves_prefix() {
    let mut vector = LongColumnVector::new(3).unwrap();
    for value in 0..3 {
        vector.add(value * 11).unwrap();
    }
    vector.add_null().unwrap();
    for value in 4..40 {
        vector.add(value * 11).unwrap();
    }

    assert_eq!(vector.len(), 40);
    assert!(vector.capacity() >= 40);
    assert_eq!(&vector.values()[..3], &[0, 11, 22]);
    assert_eq!(vector.values()[3], 0);
    assert_eq!(vector.values()[39], 39 * 11);
    assert_eq!(vector.is_null().iter().filter(|&&null| null).count(), 1);
    assert!(vector.buffer().is_aligned());
}

#[test]
fn test_ensure_size_without_preserve_rewinds() {
    let mut vector = DoubleColumnVector::new(2).unwrap();
    vector.add(1.0).unwrap();
    vector.add(2.0).unwrap();

    vector.ensure_size(16, false).unwrap();
    assert_eq!(vector.capacity(), 16);
    assert!(vector.is_empty());

    vector.add(3.0).unwrap();
    assert_eq!(vector.values(), &[3.0]);
}

#[test]
fn test_memory_usage_tracks_capacity() {
    let mut vector = DateColumnVector::new(8).unwrap();
    let initial = vector.memory_usage();
    assert_eq!(initial, 8 * 4 + 8);

    vector.ensure_size(64, true).unwrap();
    assert_eq!(vector.memory_usage(), 64 * 4 + 64);

    vector.close();
    assert_eq!(vector.memory_usage(), 0);
}

#[test]
fn test_no_nulls_is_sticky() {
    let mut vector = ColumnVector::new(ColumnType::Long, 4).unwrap();
    vector.add_str("1").unwrap();
    assert!(vector.no_nulls());

    vector.add_null().unwrap();
    assert!(!vector.no_nulls());

    vector.reset().unwrap();
    assert!(vector.is_empty());
    assert!(!vector.no_nulls());
    vector.add_str("2").unwrap();
    assert_eq!(vector.is_null(), &[false]);
}

#[test]
fn test_date_round_trip() {
    let mut vector = DateColumnVector::new(16).unwrap();
    let start = NaiveDate::from_ymd_opt(1899, 12, 25).unwrap();

    for step in 0..400 {
        let date = start + Duration::days(step * 97);
        let text = date.format("%Y-%m-%d").to_string();
        vector.reset().unwrap();
        vector.add_str(&text).unwrap();

        let expected = (date - NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()).num_days();
        assert_eq!(i64::from(vector.values()[0]), expected);
        assert_eq!(vector.format(0).as_deref(), Some(text.as_str()));
    }
}

#[test]
fn test_date_rejects_loose_formats() {
    let mut vector = DateColumnVector::new(4).unwrap();
    for input in ["2024-1-15", "2024-01-15 ", "2024/01/15", "20240115", "2024-01-15T00"] {
        assert!(
            matches!(vector.add_str(input), Err(Error::Format { .. })),
            "{input:?} should be rejected"
        );
    }
    for input in ["2023-02-29", "2024-13-01", "2024-04-31"] {
        assert!(
            matches!(vector.add_str(input), Err(Error::Conversion { .. })),
            "{input:?} should not convert"
        );
    }
    assert!(vector.is_empty());
}

#[test]
fn test_decimal_scaling() {
    let mut vector = DecimalColumnVector::new(8, 9, 3).unwrap();
    for input in ["1", "-1.5", "0.0005", "-0.0005", "123456.789", " 100 "] {
        vector.add_str(input).unwrap();
    }
    assert_eq!(
        vector.values(),
        &[1_000, -1_500, 1, -1, 123_456_789, 100_000]
    );
    assert!(matches!(
        vector.add_str("1234567.1"),
        Err(Error::PrecisionExceeded { precision: 9, .. })
    ));
}

#[test]
fn test_timestamp_micros() {
    let mut vector = TimestampColumnVector::new(4, 6).unwrap();
    vector.add_str("1970-01-01 00:00:00").unwrap();
    vector.add_str("1969-12-31 23:59:59.9").unwrap();
    vector.add_str("2000-01-01 12:30:45.123456789").unwrap();

    assert_eq!(
        vector.values(),
        &[0, -100_000, 946_729_845_123_456]
    );
    assert!(matches!(
        vector.add_str("2000-01-01 24:00:00"),
        Err(Error::Conversion { .. })
    ));
}

#[test]
fn test_use_after_close() {
    let mut vector = TimestampColumnVector::with_default_size().unwrap();
    vector.add(1).unwrap();
    vector.close();
    vector.close();

    assert!(vector.is_closed());
    assert!(vector.current().is_none());
    assert!(matches!(vector.add(2), Err(Error::UseAfterClose(_))));
    assert!(matches!(vector.set_null(0), Err(Error::UseAfterClose(_))));
    assert!(matches!(
        vector.ensure_size(10, true),
        Err(Error::UseAfterClose(_))
    ));
}

#[test]
fn test_current_follows_read_index() {
    let mut vector = LongColumnVector::new(4).unwrap();
    for value in [5, 6, 7] {
        vector.add(value).unwrap();
    }
    vector.seek(1).unwrap();
    assert_eq!(vector.current(), Some(&[6, 7][..]));
    assert!(vector.seek(4).is_err());
}
