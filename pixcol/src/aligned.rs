/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

//! # Aligned value storage
//!
//! Column vectors keep their physical values in an [`AlignedBuffer`], a fixed-length,
//! zero-initialized allocation whose first element sits on a 32- or 64-byte boundary so
//! that downstream consumers can load it with wide vector instructions.
//!
//! The buffer never grows in place. [`AlignedBuffer::resized`] builds a complete new
//! allocation and leaves `self` untouched, which lets the owner swap the two only once
//! the new one is fully populated.

use crate::Error;
use crate::Result;
use std::alloc;
use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;
use std::slice;

mod private {
    pub trait Sealed {}

    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
}

/// Fixed-width physical value stored by column vectors.
///
/// Every implementor accepts the all-zero bit pattern as a valid value, since buffers
/// are handed out zero-initialized.
pub trait Native:
    private::Sealed + Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static
{
}

impl Native for i32 {}
impl Native for i64 {}
impl Native for f64 {}

/// Owned, zero-initialized array of `T` aligned to a caller-chosen boundary
pub struct AlignedBuffer<T: Native> {
    ptr: NonNull<T>,
    len: usize,
    align: usize,
    _marker: PhantomData<T>,
}

// The buffer exclusively owns its allocation, like a Vec<T>.
unsafe impl<T: Native> Send for AlignedBuffer<T> {}
unsafe impl<T: Native> Sync for AlignedBuffer<T> {}

impl<T: Native> AlignedBuffer<T> {
    /// Allocate `len` zeroed elements whose start is aligned to `align` bytes
    pub fn zeroed(len: usize, align: usize) -> Result<Self> {
        let align = align.max(mem::align_of::<T>());
        let layout = Self::layout(len, align)?;

        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                len,
                align,
                _marker: PhantomData,
            });
        }

        // SAFETY: the layout has a non-zero size.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or(Error::Allocation {
            bytes: layout.size(),
            align,
        })?;

        Ok(Self {
            ptr,
            len,
            align,
            _marker: PhantomData,
        })
    }

    /// Build a new buffer of `len` elements with the same alignment.
    ///
    /// With `preserve` the first `min(self.len(), len)` elements are copied over, the
    /// rest stays zeroed. `self` is left as it was, also when allocation fails.
    pub fn resized(&self, len: usize, preserve: bool) -> Result<Self> {
        let mut next = Self::zeroed(len, self.align)?;
        if preserve {
            let kept = self.len.min(len);
            next.as_mut_slice()[..kept].copy_from_slice(&self.as_slice()[..kept]);
        }
        Ok(next)
    }

    fn layout(len: usize, align: usize) -> Result<Layout> {
        let bytes = len
            .checked_mul(mem::size_of::<T>())
            .ok_or(Error::Allocation {
                bytes: usize::MAX,
                align,
            })?;
        Layout::from_size_align(bytes, align).map_err(|_| Error::Allocation { bytes, align })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Alignment in bytes of the first element
    pub fn align(&self) -> usize {
        self.align
    }

    /// Bytes owned by this buffer
    pub fn size_in_bytes(&self) -> usize {
        self.len * mem::size_of::<T>()
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid for len initialized elements (or dangling with len 0).
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and &mut self guarantees exclusive access.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Whether the storage actually starts on the requested boundary
    pub fn is_aligned(&self) -> bool {
        self.is_empty() || (self.ptr.as_ptr() as usize) % self.align == 0
    }
}

impl<T: Native> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        if self.size_in_bytes() == 0 {
            return;
        }
        if let Ok(layout) = Layout::from_size_align(self.size_in_bytes(), self.align) {
            // SAFETY: allocated in `zeroed` with exactly this layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
        }
    }
}

impl<T: Native> fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("align", &self.align)
            .field("values", &self.as_slice())
            .finish()
    }
}
