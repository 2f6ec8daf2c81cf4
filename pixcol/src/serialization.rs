/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # Column chunk container
//!
//! A finished column writer produces a [`ColumnChunk`]: the encoded pixels, followed by
//! the packed null bitmap when any row was null, plus the metadata a reader needs to
//! find its way around them.
//!
//! ## Layout
//!
//! | Bytes        | Content                                        |
//! |--------------|------------------------------------------------|
//! | 8            | magic `PIXCOL01`                               |
//! | 4            | metadata length, little-endian `u32`           |
//! | variable     | [`ColumnChunkMeta`] serialized with bincode    |
//! | variable     | content: pixel bytes, then the null bitmap     |
//!
//! ```rust,no_run
//! use pixcol::ColumnType;
//! use pixcol::options::WriterOptions;
//! use pixcol::vector::ColumnVector;
//! use pixcol::writer::ColumnWriter;
//!
//! let mut vector = ColumnVector::new(ColumnType::Long, 16).unwrap();
//! vector.add_str("42").unwrap();
//!
//! let mut writer = ColumnWriter::new(ColumnType::Long, &WriterOptions::default()).unwrap();
//! writer.write(&vector, vector.len()).unwrap();
//! writer.finish().unwrap().save("column.pxc").unwrap();
//! ```

use crate::ColumnType;
use crate::Error;
use crate::Result;
use crate::stats::StatsRecorder;
use crate::writer::ColumnEncoding;
use serde::Deserialize;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

const MAGIC_BYTES: &[u8; 8] = b"PIXCOL01";

/// Where every pixel starts in the content and what it holds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnChunkIndex {
    pub pixel_positions: Vec<u64>,
    pub pixel_statistics: Vec<StatsRecorder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnChunkMeta {
    pub column_type: ColumnType,
    pub encoding: ColumnEncoding,
    pub row_count: u64,
    /// Offset of the null bitmap in the content, absent when no row is null
    pub is_null_offset: Option<u64>,
    pub index: ColumnChunkIndex,
    pub statistics: StatsRecorder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChunk {
    pub content: Vec<u8>,
    pub meta: ColumnChunkMeta,
}

impl ColumnChunk {
    /// Pixel bytes without the trailing null bitmap
    pub fn values(&self) -> &[u8] {
        let end = self.null_offset().unwrap_or(self.content.len());
        &self.content[..end]
    }

    pub fn null_bitmap(&self) -> Option<&[u8]> {
        self.null_offset().map(|offset| &self.content[offset..])
    }

    /// Null bitmap offset clamped to the content
    fn null_offset(&self) -> Option<usize> {
        self.meta.is_null_offset.map(|offset| {
            usize::try_from(offset).map_or(self.content.len(), |offset| {
                offset.min(self.content.len())
            })
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let meta_bytes = bincode::serialize(&self.meta)?;
        let meta_size = u32::try_from(meta_bytes.len()).map_err(|_| {
            Error::InvalidOptions(format!(
                "column chunk metadata of {} bytes is too large",
                meta_bytes.len()
            ))
        })?;

        writer.write_all(MAGIC_BYTES)?;
        writer.write_all(&meta_size.to_le_bytes())?;
        writer.write_all(&meta_bytes)?;
        writer.write_all(&self.content)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.content.len() + 64);
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Read back a chunk written by [`write_to`](Self::write_to), consuming the reader
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC_BYTES {
            return Err(Error::Format {
                kind: "column chunk",
                input: String::from_utf8_lossy(&magic).into_owned(),
                expected: "the PIXCOL01 magic bytes",
            });
        }

        let mut meta_size = [0u8; 4];
        reader.read_exact(&mut meta_size)?;
        let meta_size = u32::from_le_bytes(meta_size);

        // allocation follows the bytes actually read
        let mut meta_bytes = Vec::new();
        reader
            .by_ref()
            .take(u64::from(meta_size))
            .read_to_end(&mut meta_bytes)?;
        if meta_bytes.len() != meta_size as usize {
            return Err(Error::Format {
                kind: "column chunk",
                input: format!("{} of {meta_size} metadata bytes", meta_bytes.len()),
                expected: "complete chunk metadata",
            });
        }
        let meta: ColumnChunkMeta = bincode::deserialize(&meta_bytes)?;

        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        if let Some(offset) = meta
            .is_null_offset
            .filter(|&offset| offset > content.len() as u64)
        {
            return Err(Error::Format {
                kind: "column chunk",
                input: format!("null bitmap offset {offset} in {} bytes", content.len()),
                expected: "a null bitmap offset within the content",
            });
        }

        Ok(Self { content, meta })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write_to(&mut file)?;
        file.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = BufReader::new(File::open(path)?);
        Self::read_from(&mut file)
    }
}

/// Pack null flags one bit per row, most significant bit first
pub fn compact_null_bitmap(is_null: &[bool]) -> Vec<u8> {
    is_null
        .chunks(8)
        .map(|flags| {
            flags
                .iter()
                .enumerate()
                .filter(|&(_, &null)| null)
                .fold(0u8, |byte, (bit, _)| byte | (0x80 >> bit))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chunk() -> ColumnChunk {
        let mut statistics = StatsRecorder::new();
        statistics.update_date(3);
        statistics.increment();

        ColumnChunk {
            content: vec![1, 2, 3, 0b0100_0000],
            meta: ColumnChunkMeta {
                column_type: ColumnType::Date,
                encoding: ColumnEncoding::RunLength,
                row_count: 2,
                is_null_offset: Some(3),
                index: ColumnChunkIndex {
                    pixel_positions: vec![0],
                    pixel_statistics: vec![statistics.clone()],
                },
                statistics,
            },
        }
    }

    #[test]
    fn test_compact_null_bitmap() {
        assert!(compact_null_bitmap(&[]).is_empty());
        assert_eq!(compact_null_bitmap(&[true]), vec![0x80]);
        assert_eq!(
            compact_null_bitmap(&[false, true, false, false, false, false, false, true, true]),
            vec![0b0100_0001, 0b1000_0000]
        );
    }

    #[test]
    fn test_values_and_bitmap_split() {
        let chunk = sample_chunk();
        assert_eq!(chunk.values(), &[1, 2, 3]);
        assert_eq!(chunk.null_bitmap(), Some(&[0b0100_0000][..]));
    }

    #[test]
    fn test_container_layout() {
        let chunk = sample_chunk();
        let bytes = chunk.to_bytes().unwrap();

        assert_eq!(&bytes[..8], b"PIXCOL01");
        let meta_size = u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize;
        assert_eq!(bytes.len(), 12 + meta_size + chunk.content.len());
        assert_eq!(&bytes[12 + meta_size..], chunk.content.as_slice());

        let parsed = ColumnChunk::read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(parsed, chunk);
    }

    #[test]
    fn test_null_offset_past_content_is_rejected() {
        let mut chunk = sample_chunk();
        chunk.meta.is_null_offset = Some(1000);
        let bytes = chunk.to_bytes().unwrap();

        assert!(matches!(
            ColumnChunk::read_from(&mut bytes.as_slice()),
            Err(Error::Format { .. })
        ));
        assert_eq!(chunk.values(), chunk.content.as_slice());
        assert_eq!(chunk.null_bitmap(), Some(&[][..]));
    }

    #[test]
    fn test_truncated_metadata_is_rejected() {
        let mut bytes = sample_chunk().to_bytes().unwrap();
        bytes[8..12].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            ColumnChunk::read_from(&mut bytes.as_slice()),
            Err(Error::Format { .. })
        ));

        bytes.truncate(14);
        bytes[8..12].copy_from_slice(&8u32.to_le_bytes());
        assert!(matches!(
            ColumnChunk::read_from(&mut bytes.as_slice()),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn test_bad_magic_is_rejected() {
        let mut bytes = sample_chunk().to_bytes().unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            ColumnChunk::read_from(&mut bytes.as_slice()),
            Err(Error::Format { .. })
        ));
    }
}
