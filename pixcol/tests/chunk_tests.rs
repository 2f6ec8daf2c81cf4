/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! Column chunks assembled by finished writers and their on-disk container

use pixcol::options::{EncodingLevel, WriterOptions};
use pixcol::serialization::{ColumnChunk, compact_null_bitmap};
use pixcol::vector::ColumnVector;
use pixcol::writer::{ColumnEncoding, ColumnWriter};
use pixcol::{ColumnType, Error};
use std::fs;
use tempfile::TempDir;

fn decimal_chunk(options: &WriterOptions) -> ColumnChunk {
    let column_type = ColumnType::decimal(7, 2).unwrap();
    let mut vector = ColumnVector::new(column_type, 8).unwrap();
    for input in ["10.25", "", "-3.5", "", "", "0.01", "99999.99"] {
        if input.is_empty() {
            vector.add_null().unwrap();
        } else {
            vector.add_str(input).unwrap();
        }
    }

    let mut writer = ColumnWriter::new(column_type, options).unwrap();
    writer.write(&vector, vector.len()).unwrap();
    writer.finish().unwrap()
}

#[test]
fn test_finish_appends_null_bitmap() {
    let options = WriterOptions::default().with_pixel_stride(3);
    let chunk = decimal_chunk(&options);

    assert_eq!(chunk.meta.row_count, 7);
    assert_eq!(chunk.meta.encoding, ColumnEncoding::None);
    assert_eq!(chunk.meta.index.pixel_positions, vec![0, 16, 24]);

    // four non-null unscaled values, nulls omitted
    assert_eq!(chunk.meta.is_null_offset, Some(32));
    assert_eq!(chunk.values().len(), 32);
    assert_eq!(&chunk.values()[..8], &1025i64.to_le_bytes());
    assert_eq!(chunk.null_bitmap(), Some(&[0b0101_1000][..]));

    assert_eq!(chunk.meta.statistics.null_count(), 3);
    assert_eq!(chunk.meta.statistics.number_of_values(), 4);
}

#[test]
fn test_chunk_without_nulls_has_no_bitmap() {
    let mut vector = ColumnVector::new(ColumnType::Date, 4).unwrap();
    vector.add_str("2024-01-15").unwrap();
    vector.add_str("2024-01-16").unwrap();

    let options = WriterOptions::default().with_encoding_level(EncodingLevel::EL0);
    let mut writer = ColumnWriter::new(ColumnType::Date, &options).unwrap();
    writer.write(&vector, 2).unwrap();
    let chunk = writer.finish().unwrap();

    assert_eq!(chunk.meta.is_null_offset, None);
    assert_eq!(chunk.null_bitmap(), None);
    assert_eq!(chunk.values(), chunk.content.as_slice());
    assert_eq!(chunk.content.len(), 8);
}

#[test]
fn test_empty_writer_finishes() {
    let writer = ColumnWriter::new(ColumnType::Long, &WriterOptions::default()).unwrap();
    let chunk = writer.finish().unwrap();

    assert_eq!(chunk.meta.row_count, 0);
    assert!(chunk.content.is_empty());
    assert!(chunk.meta.index.pixel_positions.is_empty());
    assert_eq!(chunk.meta.statistics.range(), None);
}

#[test]
fn test_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("prices.pxc");

    let options = WriterOptions::default()
        .with_pixel_stride(2)
        .with_nulls_padding(true);
    let chunk = decimal_chunk(&options);
    chunk.save(&path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"PIXCOL01");
    assert_eq!(bytes, chunk.to_bytes().unwrap());

    let loaded = ColumnChunk::load(&path).unwrap();
    assert_eq!(loaded, chunk);
    // padded nulls keep one slot per row
    assert_eq!(loaded.values().len(), 7 * 8);
    assert_eq!(
        loaded.null_bitmap(),
        Some(compact_null_bitmap(&[false, true, false, true, true, false, false]).as_slice())
    );
}

#[test]
fn test_load_rejects_foreign_files() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("not_a_chunk.pxc");
    fs::write(&path, b"MIMDB002 and then some").unwrap();

    assert!(matches!(
        ColumnChunk::load(&path),
        Err(Error::Format { .. })
    ));
    assert!(matches!(
        ColumnChunk::load(temp_dir.path().join("missing.pxc")),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_load_rejects_null_offset_past_content() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("corrupt.pxc");

    let mut chunk = decimal_chunk(&WriterOptions::default());
    chunk.meta.is_null_offset = Some(chunk.content.len() as u64 + 1);
    chunk.save(&path).unwrap();

    assert!(matches!(
        ColumnChunk::load(&path),
        Err(Error::Format { .. })
    ));
}
