//! The unsynchronized buffer engine.
//!
//! A [`Store`] owns one contiguous allocation and two cursors:
//!
//! ```text
//!  0            read           write          capacity
//!  |  consumed   |    unread     |   reserve    |
//! ```
//!
//! - `write` only moves forward, on writes.
//! - `read` only moves forward, on reads, and never passes `write`.
//! - Peeks inspect `[read, write)` without moving anything.
//! - The reserve `[write, capacity)` is never handed out.
//!
//! Consumed bytes are kept until the store is dropped; nothing is compacted.
//! [`ByteBuffer`](crate::ByteBuffer) wraps a `Store` in a mutex; use the
//! `Store` directly when the buffer is not shared between threads.

use alloc::vec::Vec;

use crate::{BufferError, BufferOptions, Result};

/// A growable byte buffer with independent read and write cursors.
///
/// See the [module documentation](self) for the cursor model.
#[derive(Clone)]
pub struct Store {
    /// `data.len()` is the capacity; bytes past `write` are reserve.
    data: Vec<u8>,
    read: usize,
    write: usize,
    options: BufferOptions,
}

impl Store {
    /// Creates an empty store with default options. Nothing is allocated
    /// until the first write.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(BufferOptions::default())
    }

    /// Creates an empty store with the given growth policy.
    #[must_use]
    pub fn with_options(options: BufferOptions) -> Self {
        Self {
            data: Vec::new(),
            read: 0,
            write: 0,
            options,
        }
    }

    /// Takes `bytes` as the initial, unread content without copying. The
    /// store's capacity is exactly `bytes.len()` until the next write.
    #[must_use]
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let write = bytes.len();
        Self {
            data: bytes,
            read: 0,
            write,
            options: BufferOptions::default(),
        }
    }

    /// Creates a store whose logical content starts as `bytes`.
    ///
    /// # Errors
    ///
    /// Fails with [`BufferError::CapacityExceeded`] when `bytes` does not fit
    /// under `options.max_capacity`.
    pub fn from_bytes_with_options(bytes: &[u8], options: BufferOptions) -> Result<Self> {
        let mut store = Self::with_options(options);
        store.write(bytes)?;
        Ok(store)
    }

    /// The growth policy this store was created with.
    #[must_use]
    pub fn options(&self) -> BufferOptions {
        self.options
    }

    /// Length of the logical content, i.e. the write cursor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.write
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.write == 0
    }

    /// Bytes allocated for the store, written or not.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Offset of the first unread byte.
    #[must_use]
    pub fn read_position(&self) -> usize {
        self.read
    }

    /// Bytes written but not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.write - self.read
    }

    /// Copies out the logical content `[0, len)`, including consumed bytes.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.contents().to_vec()
    }

    pub(crate) fn contents(&self) -> &[u8] {
        &self.data[..self.write]
    }

    /// Grows the store so that it holds at least `target` bytes.
    ///
    /// The new capacity is the largest of `target`, `min_allocation` and
    /// twice the current capacity. When doubling would cross
    /// `max_capacity`, the store grows straight to `max_capacity`.
    ///
    /// # Errors
    ///
    /// [`BufferError::CapacityExceeded`] when `target` is over the limit or
    /// the allocator refuses the reservation. The store is unchanged.
    pub fn ensure_capacity(&mut self, target: usize) -> Result<()> {
        let current = self.data.len();
        if target <= current {
            return Ok(());
        }

        let max = self.options.max_capacity;
        if target > max {
            return Err(BufferError::CapacityExceeded {
                requested: target,
                max,
            });
        }

        let mut grown = target.max(self.options.min_allocation);
        match current.checked_mul(2) {
            Some(doubled) if doubled <= max => grown = grown.max(doubled),
            _ => grown = target.max(max),
        }
        // `min_allocation` may itself sit above the ceiling.
        let grown = grown.min(max);

        let mut data = Vec::new();
        data.try_reserve_exact(grown)
            .map_err(|_| BufferError::CapacityExceeded {
                requested: grown,
                max,
            })?;
        data.extend_from_slice(&self.data);
        data.resize(grown, 0);
        tracing::trace!(from = current, to = grown, "grew byte store");
        self.data = data;
        Ok(())
    }

    /// Appends all of `src`. Returns the new write cursor, or `0` when `src`
    /// is empty.
    ///
    /// # Errors
    ///
    /// [`BufferError::CapacityExceeded`] if the store cannot grow. Nothing
    /// is written in that case.
    pub fn write(&mut self, src: &[u8]) -> Result<usize> {
        self.write_range(src, 0, src.len())
    }

    /// Appends `count` bytes of `src` starting at `offset`.
    ///
    /// `count` is clamped to the bytes `src` actually has past `offset`. A
    /// clamped count of zero is a no-op returning `0`; otherwise the new
    /// write cursor is returned.
    ///
    /// # Errors
    ///
    /// [`BufferError::CapacityExceeded`] if the store cannot grow.
    pub fn write_range(&mut self, src: &[u8], offset: usize, count: usize) -> Result<usize> {
        let count = count.min(src.len().saturating_sub(offset));
        if count == 0 {
            return Ok(0);
        }

        let end = self
            .write
            .checked_add(count)
            .ok_or(BufferError::CapacityExceeded {
                requested: usize::MAX,
                max: self.options.max_capacity,
            })?;
        if end > self.data.len() {
            self.ensure_capacity(end)?;
        }
        self.data[self.write..end].copy_from_slice(&src[offset..offset + count]);
        self.write = end;
        Ok(end)
    }

    /// Copies up to `dst.len()` unread bytes into `dst` without consuming
    /// them. Returns how many bytes were copied.
    ///
    /// A short copy at the end of the data is normal. When nothing at all is
    /// left to copy, `strict` decides between an error and `Ok(0)`.
    ///
    /// # Errors
    ///
    /// [`BufferError::EndOfData`] when `strict` is set, `dst` is non-empty
    /// and the unread window is empty.
    pub fn peek_into(&self, dst: &mut [u8], strict: bool) -> Result<usize> {
        self.peek_at(0, dst, strict)
    }

    /// Like [`peek_into`](Self::peek_into), then consumes the copied bytes.
    ///
    /// # Errors
    ///
    /// As for [`peek_into`](Self::peek_into). Nothing is consumed on error.
    pub fn read_into(&mut self, dst: &mut [u8], strict: bool) -> Result<usize> {
        let n = self.peek_into(dst, strict)?;
        self.advance(n);
        Ok(n)
    }

    /// Returns the next `len` unread bytes without consuming them.
    ///
    /// The result is always `len` bytes long. If the data runs out first (and
    /// `strict` is off) the tail is left zero-filled.
    ///
    /// # Errors
    ///
    /// [`BufferError::EndOfData`] when `strict` is set and fewer than `len`
    /// bytes are unread, [`BufferError::CapacityExceeded`] when a lenient
    /// `len` is too large to allocate.
    pub fn peek(&self, len: usize, strict: bool) -> Result<Vec<u8>> {
        let mut out = self.output(len, strict)?;
        self.peek_fill(&mut out, strict)?;
        Ok(out)
    }

    /// Like [`peek`](Self::peek), then consumes the bytes that were actually
    /// available.
    ///
    /// # Errors
    ///
    /// As for [`peek`](Self::peek). Nothing is consumed on error.
    pub fn read(&mut self, len: usize, strict: bool) -> Result<Vec<u8>> {
        let mut out = self.output(len, strict)?;
        let n = self.peek_fill(&mut out, strict)?;
        self.advance(n);
        Ok(out)
    }

    /// A zeroed `len`-byte destination for [`peek`](Self::peek). A strict
    /// request the window cannot satisfy fails before anything is allocated.
    fn output(&self, len: usize, strict: bool) -> Result<Vec<u8>> {
        let available = self.remaining();
        if strict && len > available {
            return Err(BufferError::EndOfData {
                requested: len,
                available,
            });
        }
        zeroed(len, self.options.max_capacity)
    }

    /// Fills `dst` from the unread window, one `peek_at` at a time, until it
    /// is full or the data runs out. Returns the number of bytes filled.
    pub(crate) fn peek_fill(&self, dst: &mut [u8], strict: bool) -> Result<usize> {
        let mut filled = 0;
        while filled < dst.len() {
            let n = self
                .peek_at(filled, &mut dst[filled..], strict)
                .map_err(|_| BufferError::EndOfData {
                    requested: dst.len(),
                    available: filled,
                })?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }

    /// The single-pass peek over `[read + skip, write)`.
    fn peek_at(&self, skip: usize, dst: &mut [u8], strict: bool) -> Result<usize> {
        if dst.is_empty() {
            return Ok(0);
        }

        let start = self.read + skip;
        let available = self.write.saturating_sub(start);
        if available == 0 {
            if strict {
                return Err(BufferError::EndOfData {
                    requested: dst.len(),
                    available,
                });
            }
            return Ok(0);
        }

        let n = dst.len().min(available);
        dst[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }

    /// Consumes `n` bytes that a preceding peek returned.
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.remaining(), "advance past write cursor");
        self.read += n;
    }

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panics unless `read <= write <= capacity <= max_capacity`.
    pub fn assert_cursors(&self) {
        assert!(self.read <= self.write, "read {} > write {}", self.read, self.write);
        assert!(
            self.write <= self.data.len(),
            "write {} > capacity {}",
            self.write,
            self.data.len()
        );
        assert!(
            self.data.len() <= self.options.max_capacity,
            "capacity {} over limit {}",
            self.data.len(),
            self.options.max_capacity
        );
    }
}

/// Allocates `len` zero bytes, reporting allocator refusal as
/// [`BufferError::CapacityExceeded`] instead of aborting.
pub(crate) fn zeroed(len: usize, max: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| BufferError::CapacityExceeded {
            requested: len,
            max,
        })?;
    out.resize(len, 0);
    Ok(out)
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Store {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Store")
            .field("len", &self.write)
            .field("read_position", &self.read)
            .field("capacity", &self.data.len())
            .finish_non_exhaustive()
    }
}

/// Stores compare by logical content only; capacity and cursors are ignored.
impl PartialEq for Store {
    fn eq(&self, other: &Self) -> bool {
        self.contents() == other.contents()
    }
}

impl Eq for Store {}
