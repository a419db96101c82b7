use alloc::{string::String, vec::Vec};
use std::io;

use parking_lot::{Mutex, MutexGuard};

use crate::{
    BufferOptions, Endian, HexOptions, LengthPrefix, Primitive, Result, Store, TextEncoding,
    codec::for_each_primitive, hex,
};

/// Exclusive access to a [`ByteBuffer`]'s [`Store`], returned by
/// [`ByteBuffer::lock`]. Other threads block until it is dropped.
pub type BufferGuard<'a> = MutexGuard<'a, Store>;

/// A thread-safe growable byte buffer.
///
/// Writes append at the write cursor; reads consume from an independent read
/// cursor; peeks look at the unread bytes without consuming them. Every method
/// takes the internal lock once and holds it for the whole operation, so a
/// compound call such as [`read_prefixed_string`](Self::read_prefixed_string)
/// never interleaves with another thread's writes.
///
/// ```rust
/// use bytebuf::{ByteBuffer, Endian, LengthPrefix, TextEncoding};
///
/// let buf = ByteBuffer::new();
/// buf.write_u16(0x0102, Endian::Big)?;
/// buf.write_prefixed_str("hi", TextEncoding::Utf8, LengthPrefix::U8)?;
/// assert_eq!(buf.to_vec(), [0x01, 0x02, 0x02, b'h', b'i']);
///
/// assert_eq!(buf.peek_u16(Endian::Big)?, 0x0102);
/// assert_eq!(buf.read_u16(Endian::Big)?, 0x0102);
/// assert_eq!(
///     buf.read_prefixed_string(LengthPrefix::U8, TextEncoding::Utf8)?,
///     "hi"
/// );
/// assert_eq!(buf.remaining(), 0);
/// # Ok::<(), bytebuf::BufferError>(())
/// ```
///
/// Use [`lock`](Self::lock) to run several operations as one unit:
///
/// ```rust
/// use bytebuf::{ByteBuffer, Endian};
///
/// let buf = ByteBuffer::new();
/// {
///     let mut guard = buf.lock();
///     guard.write_u32(7, Endian::Little)?;
///     guard.write_u32(9, Endian::Little)?;
/// }
/// assert_eq!(buf.len(), 8);
/// # Ok::<(), bytebuf::BufferError>(())
/// ```
#[derive(Default)]
pub struct ByteBuffer {
    store: Mutex<Store>,
}

impl ByteBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(Store::new())
    }

    /// Creates an empty buffer with the given growth policy.
    #[must_use]
    pub fn with_options(options: BufferOptions) -> Self {
        Self::from_store(Store::with_options(options))
    }

    /// Creates a buffer whose content starts as a copy of `bytes`, unread.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_store(Store::from_vec(bytes.to_vec()))
    }

    /// Creates a buffer seeded with `bytes` under a custom growth policy.
    ///
    /// # Errors
    ///
    /// [`BufferError::CapacityExceeded`](crate::BufferError::CapacityExceeded)
    /// when `bytes` does not fit under `options.max_capacity`.
    pub fn from_bytes_with_options(bytes: &[u8], options: BufferOptions) -> Result<Self> {
        Store::from_bytes_with_options(bytes, options).map(Self::from_store)
    }

    /// Wraps an existing store.
    #[must_use]
    pub fn from_store(store: Store) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Unwraps the store.
    #[must_use]
    pub fn into_store(self) -> Store {
        self.store.into_inner()
    }

    /// Locks the buffer for a sequence of operations.
    ///
    /// The guard dereferences to [`Store`], which offers every operation of
    /// this type. Calling a `ByteBuffer` method on the same buffer while the
    /// guard is alive deadlocks.
    pub fn lock(&self) -> BufferGuard<'_> {
        self.store.lock()
    }

    /// Length of the logical content, i.e. the write cursor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Bytes allocated, written or not.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Offset of the first unread byte.
    #[must_use]
    pub fn read_position(&self) -> usize {
        self.lock().read_position()
    }

    /// Bytes written but not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lock().remaining()
    }

    /// Copies out the logical content, consumed bytes included. Reserve
    /// capacity is never part of the result.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.lock().to_vec()
    }

    /// Renders the logical content with [`hex::to_hex_string`].
    #[must_use]
    pub fn to_hex_string(&self, options: &HexOptions) -> String {
        hex::to_hex_string(self.lock().contents(), options)
    }

    /// Grows the store to hold at least `target` bytes.
    ///
    /// # Errors
    ///
    /// See [`Store::ensure_capacity`].
    pub fn ensure_capacity(&self, target: usize) -> Result<()> {
        self.lock().ensure_capacity(target)
    }

    /// Appends all of `src`. Returns the new write cursor, or `0` when `src`
    /// is empty.
    ///
    /// # Errors
    ///
    /// See [`Store::write`].
    pub fn write(&self, src: &[u8]) -> Result<usize> {
        self.lock().write(src)
    }

    /// Appends `count` bytes of `src` from `offset`, clamped to what `src`
    /// holds.
    ///
    /// # Errors
    ///
    /// See [`Store::write_range`].
    pub fn write_range(&self, src: &[u8], offset: usize, count: usize) -> Result<usize> {
        self.lock().write_range(src, offset, count)
    }

    /// Copies unread bytes into `dst` in a single pass, without consuming.
    ///
    /// # Errors
    ///
    /// See [`Store::peek_into`].
    pub fn peek_into(&self, dst: &mut [u8], strict: bool) -> Result<usize> {
        self.lock().peek_into(dst, strict)
    }

    /// Copies unread bytes into `dst` in a single pass and consumes them.
    ///
    /// # Errors
    ///
    /// See [`Store::read_into`].
    pub fn read_into(&self, dst: &mut [u8], strict: bool) -> Result<usize> {
        self.lock().read_into(dst, strict)
    }

    /// Returns the next `len` bytes without consuming them.
    ///
    /// # Errors
    ///
    /// See [`Store::peek`].
    pub fn peek(&self, len: usize, strict: bool) -> Result<Vec<u8>> {
        self.lock().peek(len, strict)
    }

    /// Returns and consumes the next `len` bytes.
    ///
    /// # Errors
    ///
    /// See [`Store::read`].
    pub fn read(&self, len: usize, strict: bool) -> Result<Vec<u8>> {
        self.lock().read(len, strict)
    }

    /// Appends a scalar in the given byte order.
    ///
    /// # Errors
    ///
    /// See [`Store::write_value`].
    pub fn write_value<T: Primitive>(&self, value: T, endian: Endian) -> Result<usize> {
        self.lock().write_value(value, endian)
    }

    /// Decodes the next scalar without consuming it.
    ///
    /// # Errors
    ///
    /// See [`Store::peek_value`].
    pub fn peek_value<T: Primitive>(&self, endian: Endian) -> Result<T> {
        self.lock().peek_value(endian)
    }

    /// Decodes and consumes the next scalar.
    ///
    /// # Errors
    ///
    /// See [`Store::read_value`].
    pub fn read_value<T: Primitive>(&self, endian: Endian) -> Result<T> {
        self.lock().read_value(endian)
    }

    /// Appends a boolean spread over `len` bytes.
    ///
    /// # Errors
    ///
    /// See [`Store::write_bool_wide`].
    pub fn write_bool_wide(&self, value: bool, len: usize, endian: Endian) -> Result<usize> {
        self.lock().write_bool_wide(value, len, endian)
    }

    /// Decodes a `len`-byte boolean without consuming it.
    ///
    /// # Errors
    ///
    /// See [`Store::peek_bool_wide`].
    pub fn peek_bool_wide(&self, len: usize, endian: Endian) -> Result<bool> {
        self.lock().peek_bool_wide(len, endian)
    }

    /// Decodes and consumes a `len`-byte boolean.
    ///
    /// # Errors
    ///
    /// See [`Store::read_bool_wide`].
    pub fn read_bool_wide(&self, len: usize, endian: Endian) -> Result<bool> {
        self.lock().read_bool_wide(len, endian)
    }

    for_each_primitive!(@lock);

    /// Appends the encoded `text` with no framing.
    ///
    /// # Errors
    ///
    /// See [`Store::write_str`].
    pub fn write_str(&self, text: &str, encoding: TextEncoding) -> Result<usize> {
        self.lock().write_str(text, encoding)
    }

    /// Appends `text` behind a length prefix, truncating it silently when it
    /// is too long for the prefix.
    ///
    /// # Errors
    ///
    /// See [`Store::write_prefixed_str`].
    pub fn write_prefixed_str(
        &self,
        text: &str,
        encoding: TextEncoding,
        prefix: LengthPrefix,
    ) -> Result<usize> {
        self.lock().write_prefixed_str(text, encoding, prefix)
    }

    /// Decodes the next `len` bytes as text without consuming them.
    ///
    /// # Errors
    ///
    /// See [`Store::peek_string`].
    pub fn peek_string(&self, len: usize, encoding: TextEncoding) -> Result<String> {
        self.lock().peek_string(len, encoding)
    }

    /// Decodes and consumes the next `len` bytes as text.
    ///
    /// # Errors
    ///
    /// See [`Store::read_string`].
    pub fn read_string(&self, len: usize, encoding: TextEncoding) -> Result<String> {
        self.lock().read_string(len, encoding)
    }

    /// Decodes a length-prefixed string without consuming it.
    ///
    /// # Errors
    ///
    /// See [`Store::peek_prefixed_string`].
    pub fn peek_prefixed_string(
        &self,
        prefix: LengthPrefix,
        encoding: TextEncoding,
    ) -> Result<String> {
        self.lock().peek_prefixed_string(prefix, encoding)
    }

    /// Decodes and consumes a length-prefixed string.
    ///
    /// # Errors
    ///
    /// See [`Store::read_prefixed_string`].
    pub fn read_prefixed_string(
        &self,
        prefix: LengthPrefix,
        encoding: TextEncoding,
    ) -> Result<String> {
        self.lock().read_prefixed_string(prefix, encoding)
    }

    /// A new buffer holding `a`'s logical content followed by `b`'s.
    #[must_use]
    pub fn concat(a: &Self, b: &Self) -> Self {
        Self::joined(&a.to_vec(), &b.to_vec())
    }

    /// A new buffer holding `a`'s logical content followed by `bytes`.
    #[must_use]
    pub fn concat_bytes(a: &Self, bytes: &[u8]) -> Self {
        Self::joined(&a.to_vec(), bytes)
    }

    /// A new buffer holding `bytes` followed by `b`'s logical content.
    #[must_use]
    pub fn bytes_concat(bytes: &[u8], b: &Self) -> Self {
        Self::joined(bytes, &b.to_vec())
    }

    fn joined(head: &[u8], tail: &[u8]) -> Self {
        let mut joined = Vec::with_capacity(head.len() + tail.len());
        joined.extend_from_slice(head);
        joined.extend_from_slice(tail);
        Self::from(joined)
    }
}

impl Clone for ByteBuffer {
    fn clone(&self) -> Self {
        Self::from_store(self.lock().clone())
    }
}

impl core::fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let store = self.lock();
        f.debug_struct("ByteBuffer")
            .field("len", &store.len())
            .field("read_position", &store.read_position())
            .field("capacity", &store.capacity())
            .finish_non_exhaustive()
    }
}

/// Buffers compare by logical content only.
impl PartialEq for ByteBuffer {
    fn eq(&self, other: &Self) -> bool {
        // Locking both at once would deadlock on `a == a`.
        core::ptr::eq(self, other) || self.to_vec() == other.to_vec()
    }
}

impl Eq for ByteBuffer {}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_store(Store::from_vec(bytes))
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Store> for ByteBuffer {
    fn from(store: Store) -> Self {
        Self::from_store(store)
    }
}

fn io_error(err: crate::BufferError) -> io::Error {
    let kind = if err.is_end_of_data() {
        io::ErrorKind::UnexpectedEof
    } else {
        io::ErrorKind::OutOfMemory
    };
    io::Error::new(kind, err)
}

impl io::Write for &ByteBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        ByteBuffer::write(*self, buf).map_err(io_error)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for ByteBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reads are non-strict: an exhausted buffer reports `Ok(0)`.
impl io::Read for &ByteBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_into(buf, false).map_err(io_error)
    }
}

impl io::Read for ByteBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut &*self, buf)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, vec};
    use std::io::{Read, Write};

    use super::*;

    #[test]
    fn seeded_buffer_starts_unread() {
        let buf = ByteBuffer::from_bytes(b"seed");
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.read_position(), 0);
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.read(4, true).unwrap(), b"seed");
    }

    #[test]
    fn to_vec_hides_reserve() {
        let buf = ByteBuffer::new();
        buf.write(&[1, 2, 3]).unwrap();
        assert_eq!(buf.to_vec(), [1, 2, 3]);
        assert!(buf.capacity() > 3);
        assert!(ByteBuffer::new().to_vec().is_empty());
    }

    #[test]
    fn equality_is_logical_content() {
        let a = ByteBuffer::from_bytes(b"abc");
        let b = ByteBuffer::new();
        b.ensure_capacity(1024).unwrap();
        b.write(b"abc").unwrap();
        b.read(1, true).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, a);
        assert_ne!(a, ByteBuffer::from_bytes(b"abd"));
    }

    #[test]
    fn concatenation_variants() {
        let a = ByteBuffer::from_bytes(b"ab");
        let b = ByteBuffer::from_bytes(b"cd");
        b.read(2, true).unwrap();
        assert_eq!(ByteBuffer::concat(&a, &b).to_vec(), b"abcd");
        assert_eq!(ByteBuffer::concat_bytes(&a, b"xy").to_vec(), b"abxy");
        assert_eq!(ByteBuffer::bytes_concat(b"xy", &b).to_vec(), b"xycd");
        assert_eq!(ByteBuffer::concat(&a, &b).read_position(), 0);
    }

    #[test]
    fn clone_keeps_cursors() {
        let a = ByteBuffer::from_bytes(b"abc");
        a.read(1, true).unwrap();
        let b = a.clone();
        assert_eq!(b.read_position(), 1);
        assert_eq!(b.read(2, true).unwrap(), b"bc");
        assert_eq!(a.remaining(), 2);
    }

    #[test]
    fn debug_shows_cursors() {
        let buf = ByteBuffer::from_bytes(b"abc");
        buf.read(1, true).unwrap();
        assert_eq!(
            format!("{buf:?}"),
            "ByteBuffer { len: 3, read_position: 1, capacity: 3, .. }"
        );
    }

    #[test]
    fn guard_runs_compound_operations() {
        let buf = ByteBuffer::new();
        {
            let mut guard = buf.lock();
            guard.write_i32(-1, Endian::Big).unwrap();
            guard.write_u8(9).unwrap();
            assert_eq!(guard.read_i32(Endian::Big).unwrap(), -1);
        }
        assert_eq!(buf.read_u8().unwrap(), 9);
    }

    #[test]
    fn io_traits() {
        let mut buf = ByteBuffer::new();
        buf.write_all(b"hello world").unwrap();
        let mut word = [0u8; 5];
        buf.read_exact(&mut word).unwrap();
        assert_eq!(&word, b"hello");

        let mut rest = vec![];
        (&buf).read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b" world");

        let err = buf.read_exact(&mut word).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn io_write_past_ceiling_is_out_of_memory() {
        let mut buf = ByteBuffer::with_options(BufferOptions {
            min_allocation: 4,
            max_capacity: 8,
        });
        buf.write_all(b"12345678").unwrap();
        let err = buf.write_all(b"9").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::OutOfMemory);
        assert_eq!(
            err.get_ref()
                .and_then(|inner| inner.downcast_ref::<crate::BufferError>()),
            Some(&crate::BufferError::CapacityExceeded {
                requested: 9,
                max: 8
            })
        );
        assert_eq!(buf.to_vec(), b"12345678");
    }

    #[test]
    fn buffer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ByteBuffer>();
    }
}
