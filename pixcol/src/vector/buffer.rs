/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! Growable typed storage shared by every column vector.

use crate::Error;
use crate::Result;
use crate::aligned::AlignedBuffer;
use crate::aligned::Native;
use std::mem;
use tracing::trace;

/// Values and null flags of one column vector.
///
/// `is_null` always holds exactly `capacity` flags and the value storage, once it
/// exists, exactly `capacity` elements. Only the first `len()` of them are committed.
#[derive(Debug)]
pub struct VectorBuffer<T: Native> {
    values: Option<AlignedBuffer<T>>,
    is_null: Vec<bool>,
    capacity: usize,
    align: usize,
    write_index: usize,
    read_index: usize,
    no_nulls: bool,
    memory_usage: usize,
    closed: bool,
}

impl<T: Native> VectorBuffer<T> {
    /// Buffer with `capacity` zeroed values aligned to `align` bytes
    pub fn new(capacity: usize, align: usize) -> Result<Self> {
        let mut buffer = Self::detached(capacity, align);
        buffer.values = Some(AlignedBuffer::zeroed(capacity, align)?);
        buffer.update_memory_usage();
        Ok(buffer)
    }

    /// Buffer without value storage. [`current`](Self::current) returns `None` until the
    /// first write allocates it.
    pub fn detached(capacity: usize, align: usize) -> Self {
        let mut buffer = Self {
            values: None,
            is_null: vec![false; capacity],
            capacity,
            align,
            write_index: 0,
            read_index: 0,
            no_nulls: true,
            memory_usage: 0,
            closed: false,
        };
        buffer.update_memory_usage();
        buffer
    }

    /// Number of committed elements
    pub fn len(&self) -> usize {
        self.write_index
    }

    pub fn is_empty(&self) -> bool {
        self.write_index == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn read_index(&self) -> usize {
        self.read_index
    }

    /// Bytes currently owned by values and null flags
    pub fn memory_usage(&self) -> usize {
        self.memory_usage
    }

    /// True until the first null is stored, then false for the buffer's lifetime
    pub fn no_nulls(&self) -> bool {
        self.no_nulls
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn has_storage(&self) -> bool {
        self.values.is_some()
    }

    /// Whether the value storage starts on the configured boundary
    pub fn is_aligned(&self) -> bool {
        self.values.as_ref().is_none_or(AlignedBuffer::is_aligned)
    }

    /// Committed values; null rows hold zero
    pub fn values(&self) -> &[T] {
        match &self.values {
            Some(values) => &values.as_slice()[..self.write_index],
            None => &[],
        }
    }

    /// Null flags of the committed values
    pub fn is_null(&self) -> &[bool] {
        &self.is_null[..self.write_index]
    }

    pub fn value(&self, index: usize) -> Option<T> {
        self.values().get(index).copied()
    }

    /// Committed values from the read cursor on, `None` without backing storage
    pub fn current(&self) -> Option<&[T]> {
        self.values
            .as_ref()
            .map(|values| &values.as_slice()[self.read_index..self.write_index])
    }

    /// Move the read cursor
    pub fn seek(&mut self, index: usize) -> Result<()> {
        self.check_open()?;
        if index > self.write_index {
            return Err(Error::RowCountOutOfBounds {
                requested: index,
                available: self.write_index,
            });
        }
        self.read_index = index;
        Ok(())
    }

    /// Append a value, doubling the capacity when full
    pub fn push(&mut self, value: T) -> Result<()> {
        self.check_open()?;
        self.grow_for_append()?;
        self.store(self.write_index, value, false)
    }

    /// Append a null row; its value slot holds zero
    pub fn push_null(&mut self) -> Result<()> {
        self.check_open()?;
        self.grow_for_append()?;
        self.store(self.write_index, T::default(), true)
    }

    /// Overwrite the value at `index`. Writing past the committed length moves it to
    /// `index + 1`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.check_open()?;
        self.grow_to_index(index)?;
        self.store(index, value, false)
    }

    pub fn set_null(&mut self, index: usize) -> Result<()> {
        self.check_open()?;
        self.grow_to_index(index)?;
        self.store(index, T::default(), true)
    }

    /// Grow to `size` elements; a no-op when the capacity already suffices.
    ///
    /// New storage is fully built before the old one is released, so a failed
    /// allocation leaves the buffer exactly as it was. Without `preserve_data` the new
    /// storage is zeroed and the committed length rewinds to zero.
    pub fn ensure_size(&mut self, size: usize, preserve_data: bool) -> Result<()> {
        self.check_open()?;
        if size <= self.capacity {
            return Ok(());
        }

        let values = match &self.values {
            Some(old) => Some(old.resized(size, preserve_data)?),
            None => None,
        };

        let mut is_null = Vec::new();
        is_null
            .try_reserve_exact(size)
            .map_err(|_| Error::Allocation {
                bytes: size * mem::size_of::<bool>(),
                align: mem::align_of::<bool>(),
            })?;
        if preserve_data {
            is_null.extend_from_slice(&self.is_null);
        }
        is_null.resize(size, false);

        trace!(
            from = self.capacity,
            to = size,
            preserve_data,
            "Growing column vector"
        );

        self.values = values;
        self.is_null = is_null;
        self.capacity = size;
        if !preserve_data {
            self.write_index = 0;
            self.read_index = 0;
        }
        self.update_memory_usage();
        Ok(())
    }

    /// Rewind to an empty buffer of the same capacity so a row batch can be reused.
    /// `no_nulls` keeps its value.
    pub fn reset(&mut self) -> Result<()> {
        self.check_open()?;
        self.is_null[..self.write_index].fill(false);
        self.write_index = 0;
        self.read_index = 0;
        Ok(())
    }

    /// Release all storage. Closing twice is a no-op; any later mutation fails.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.values = None;
        self.is_null = Vec::new();
        self.capacity = 0;
        self.write_index = 0;
        self.read_index = 0;
        self.memory_usage = 0;
        self.closed = true;
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::UseAfterClose("column vector"));
        }
        Ok(())
    }

    fn grow_for_append(&mut self) -> Result<()> {
        if self.write_index >= self.capacity {
            self.ensure_size((self.write_index * 2).max(1), true)?;
        }
        Ok(())
    }

    fn grow_to_index(&mut self, index: usize) -> Result<()> {
        if index >= self.capacity {
            self.ensure_size((self.capacity * 2).max(index + 1), true)?;
        }
        Ok(())
    }

    fn store(&mut self, index: usize, value: T, null: bool) -> Result<()> {
        if self.values.is_none() {
            self.values = Some(AlignedBuffer::zeroed(self.capacity, self.align)?);
            self.update_memory_usage();
        }
        if let Some(values) = self.values.as_mut() {
            values.as_mut_slice()[index] = value;
        }
        self.is_null[index] = null;
        if null {
            self.no_nulls = false;
        }
        if index >= self.write_index {
            self.write_index = index + 1;
        }
        Ok(())
    }

    fn update_memory_usage(&mut self) {
        let values = self
            .values
            .as_ref()
            .map_or(0, AlignedBuffer::size_in_bytes);
        self.memory_usage = values + self.is_null.len() * mem::size_of::<bool>();
    }
}
