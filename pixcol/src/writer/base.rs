/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

use super::ColumnEncoding;
use super::PixelEncoding;
use super::type_mismatch;
use crate::ColumnType;
use crate::Error;
use crate::Result;
use crate::compression::RunLenIntEncoder;
use crate::options::ByteOrder;
use crate::options::WriterOptions;
use crate::serialization::ColumnChunk;
use crate::serialization::ColumnChunkIndex;
use crate::serialization::ColumnChunkMeta;
use crate::serialization::compact_null_bitmap;
use crate::sink::OutputStream;
use crate::stats::StatsRecorder;
use crate::vector::ColumnVector;
use crate::vector::DEFAULT_SIZE;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;
use tracing::trace;

/// Pixel-chunking column writer over the typed vector `V`.
///
/// Rows are accumulated in the current pixel until `pixel_stride` of them have been
/// seen, at which point the pixel is encoded into the output stream and a new one starts.
/// A partially filled pixel is flushed by [`close`](Self::close).
pub struct TypedColumnWriter<V: PixelEncoding> {
    column_type: ColumnType,
    pixel_stride: usize,
    byte_order: ByteOrder,
    runlength_encoding: bool,
    nulls_padding: bool,

    cur_pixel_values: Vec<V::Native>,
    cur_pixel_is_null: Vec<bool>,
    cur_pixel_ele_index: usize,
    has_null: bool,

    /// Null flags of every closed pixel, in row order
    is_null: Vec<bool>,
    output: OutputStream,
    encoder: Option<RunLenIntEncoder>,

    pixel_stats: StatsRecorder,
    chunk_stats: StatsRecorder,
    index: ColumnChunkIndex,
    last_pixel_position: usize,
    closed: bool,

    _vector: PhantomData<fn(&V)>,
}

impl<V: PixelEncoding> TypedColumnWriter<V> {
    pub(crate) fn with_type(column_type: ColumnType, options: &WriterOptions) -> Result<Self> {
        options.validate()?;

        let runlength_encoding = V::runlength_encoding(options);
        let nulls_padding = V::decide_nulls_padding(options);
        debug!(
            column_type = %column_type,
            pixel_stride = options.pixel_stride,
            encoding_level = %options.encoding_level,
            runlength_encoding,
            nulls_padding,
            "Creating column writer"
        );

        let pixel_capacity = options.pixel_stride.min(DEFAULT_SIZE);
        Ok(Self {
            column_type,
            pixel_stride: options.pixel_stride,
            byte_order: options.byte_order,
            runlength_encoding,
            nulls_padding,
            cur_pixel_values: Vec::with_capacity(pixel_capacity),
            cur_pixel_is_null: Vec::new(),
            cur_pixel_ele_index: 0,
            has_null: false,
            is_null: Vec::new(),
            output: OutputStream::with_capacity(pixel_capacity * column_type.physical_width()),
            encoder: runlength_encoding.then(RunLenIntEncoder::new),
            pixel_stats: StatsRecorder::new(),
            chunk_stats: StatsRecorder::new(),
            index: ColumnChunkIndex::default(),
            last_pixel_position: 0,
            closed: false,
            _vector: PhantomData,
        })
    }

    /// Write the first `length` rows of `vector`, returning the bytes written so far
    pub fn write(&mut self, vector: &ColumnVector, length: usize) -> Result<usize> {
        self.ensure_open()?;
        let typed = V::from_vector(vector)
            .ok_or_else(|| type_mismatch(self.column_type, vector.column_type()))?;
        self.write_vector(typed, length)
    }

    /// Write the first `length` rows of a vector of this writer's type.
    ///
    /// Nothing is consumed when the call fails.
    pub fn write_vector(&mut self, vector: &V, length: usize) -> Result<usize> {
        self.ensure_open()?;
        if vector.logical_type() != self.column_type {
            return Err(type_mismatch(self.column_type, vector.logical_type()));
        }
        let buffer = vector.vector_buffer();
        if length > buffer.len() {
            return Err(Error::RowCountOutOfBounds {
                requested: length,
                available: buffer.len(),
            });
        }

        let values = &buffer.values()[..length];
        let is_null = &buffer.is_null()[..length];

        let mut offset = 0;
        let mut remaining = length;
        while self.cur_pixel_ele_index + remaining >= self.pixel_stride {
            let part_length = self.pixel_stride - self.cur_pixel_ele_index;
            let end = offset + part_length;
            self.consume(&values[offset..end], &is_null[offset..end]);
            self.new_pixel()?;
            offset = end;
            remaining -= part_length;
        }
        self.consume(&values[offset..], &is_null[offset..]);

        Ok(self.output.size())
    }

    fn consume(&mut self, values: &[V::Native], is_null: &[bool]) {
        for (&value, &null) in values.iter().zip(is_null) {
            if null {
                self.has_null = true;
                self.pixel_stats.increment();
                if self.nulls_padding {
                    self.cur_pixel_values.push(V::Native::default());
                }
            } else {
                self.cur_pixel_values.push(value);
            }
            self.cur_pixel_is_null.push(null);
            self.cur_pixel_ele_index += 1;
        }
    }

    /// Encode the current pixel and start a new one
    pub fn new_pixel(&mut self) -> Result<()> {
        self.ensure_open()?;

        // padding slots line up with the pixel's null flags, otherwise every value is real
        let placeholders: &[bool] = if self.nulls_padding {
            &self.cur_pixel_is_null
        } else {
            &[]
        };
        let is_placeholder = |i: usize| placeholders.get(i).copied().unwrap_or(false);

        if let Some(encoder) = self.encoder.as_mut() {
            let mut codec_values = Vec::with_capacity(self.cur_pixel_values.len());
            for (i, &value) in self.cur_pixel_values.iter().enumerate() {
                if !is_placeholder(i) {
                    V::update_statistics(&mut self.pixel_stats, value);
                }
                codec_values.push(V::codec_value(value));
            }
            let encoded = encoder.encode(&codec_values)?;
            self.output.write_bytes(&encoded);
        } else {
            for (i, &value) in self.cur_pixel_values.iter().enumerate() {
                V::write_raw(&mut self.output, value, self.byte_order);
                if !is_placeholder(i) {
                    V::update_statistics(&mut self.pixel_stats, value);
                }
            }
        }

        trace!(
            column_type = %self.column_type,
            pixel = self.index.pixel_positions.len(),
            rows = self.cur_pixel_ele_index,
            position = self.last_pixel_position,
            bytes = self.output.size() - self.last_pixel_position,
            "Flushed pixel"
        );

        self.index.pixel_positions.push(self.last_pixel_position as u64);
        self.index.pixel_statistics.push(self.pixel_stats.clone());
        self.chunk_stats.merge(&self.pixel_stats);
        self.pixel_stats.reset();
        self.last_pixel_position = self.output.size();

        self.is_null.append(&mut self.cur_pixel_is_null);
        self.cur_pixel_values.clear();
        self.cur_pixel_ele_index = 0;

        Ok(())
    }

    /// Flush a partially filled pixel and stop accepting rows; closing twice is a no-op
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        if self.cur_pixel_ele_index > 0 {
            self.new_pixel()?;
        }
        if let Some(encoder) = self.encoder.as_mut() {
            encoder.close();
        }
        self.cur_pixel_values = Vec::new();
        self.cur_pixel_is_null = Vec::new();
        self.closed = true;

        debug!(
            column_type = %self.column_type,
            rows = self.is_null.len(),
            pixels = self.index.pixel_positions.len(),
            bytes = self.output.size(),
            has_null = self.has_null,
            "Closed column writer"
        );
        Ok(())
    }

    /// Close the writer and assemble its column chunk
    pub fn finish(mut self) -> Result<ColumnChunk> {
        self.close()?;

        let column_chunk_encoding = self.column_chunk_encoding();
        let mut content = self.output.into_inner();
        let is_null_offset = if self.has_null {
            let offset = content.len() as u64;
            content.extend_from_slice(&compact_null_bitmap(&self.is_null));
            Some(offset)
        } else {
            None
        };

        Ok(ColumnChunk {
            content,
            meta: ColumnChunkMeta {
                column_type: self.column_type,
                encoding: column_chunk_encoding,
                row_count: self.is_null.len() as u64,
                is_null_offset,
                index: self.index,
                statistics: self.chunk_stats,
            },
        })
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    pub fn column_chunk_encoding(&self) -> ColumnEncoding {
        if self.runlength_encoding {
            ColumnEncoding::RunLength
        } else {
            ColumnEncoding::None
        }
    }

    pub fn nulls_padding(&self) -> bool {
        self.nulls_padding
    }

    /// Whether any null row has been written, including rows of the pending pixel
    pub fn has_null(&self) -> bool {
        self.has_null
    }

    /// Null flags of the rows in closed pixels
    pub fn null_flags(&self) -> &[bool] {
        &self.is_null
    }

    pub fn pixels_written(&self) -> usize {
        self.index.pixel_positions.len()
    }

    /// Rows accumulated in the pixel that is not yet encoded
    pub fn pending_rows(&self) -> usize {
        self.cur_pixel_ele_index
    }

    /// Bytes written to the output stream
    pub fn size(&self) -> usize {
        self.output.size()
    }

    pub fn output(&self) -> &[u8] {
        self.output.as_slice()
    }

    pub fn column_chunk_index(&self) -> &ColumnChunkIndex {
        &self.index
    }

    /// Statistics merged from every closed pixel
    pub fn column_chunk_statistics(&self) -> &StatsRecorder {
        &self.chunk_stats
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::UseAfterClose("column writer"));
        }
        Ok(())
    }
}

impl<V: PixelEncoding> fmt::Debug for TypedColumnWriter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedColumnWriter")
            .field("column_type", &self.column_type)
            .field("pixel_stride", &self.pixel_stride)
            .field("byte_order", &self.byte_order)
            .field("runlength_encoding", &self.runlength_encoding)
            .field("nulls_padding", &self.nulls_padding)
            .field("pending_rows", &self.cur_pixel_ele_index)
            .field("pixels_written", &self.index.pixel_positions.len())
            .field("size", &self.output.size())
            .field("closed", &self.closed)
            .finish()
    }
}
