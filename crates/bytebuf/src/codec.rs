//! Fixed-width scalar encoding on top of the raw store.

use half::f16;

use crate::{Endian, Result, Store};

/// A fixed-width scalar that can be written to and read from a buffer.
///
/// Implemented for `bool`, the 8- to 64-bit integers, [`f16`], `f32` and
/// `f64`. Single-byte types ignore the endianness argument.
pub trait Primitive: Copy {
    /// Encoded size in bytes.
    const WIDTH: usize;

    /// The encoded form, always `[u8; WIDTH]`.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// Serializes `self` in the given byte order.
    fn encode(self, endian: Endian) -> Self::Bytes;

    /// Deserializes a value stored in the given byte order.
    fn decode(bytes: Self::Bytes, endian: Endian) -> Self;
}

macro_rules! impl_primitive {
    ($($ty:ty => $width:literal),* $(,)?) => {$(
        impl Primitive for $ty {
            const WIDTH: usize = $width;
            type Bytes = [u8; $width];

            #[inline]
            fn encode(self, endian: Endian) -> Self::Bytes {
                match endian {
                    Endian::Little => self.to_le_bytes(),
                    Endian::Big => self.to_be_bytes(),
                }
            }

            #[inline]
            fn decode(bytes: Self::Bytes, endian: Endian) -> Self {
                match endian {
                    Endian::Little => <$ty>::from_le_bytes(bytes),
                    Endian::Big => <$ty>::from_be_bytes(bytes),
                }
            }
        }
    )*};
}

impl_primitive! {
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
    f16 => 2,
    f32 => 4,
    f64 => 8,
}

impl Primitive for bool {
    const WIDTH: usize = 1;
    type Bytes = [u8; 1];

    #[inline]
    fn encode(self, _: Endian) -> Self::Bytes {
        [u8::from(self)]
    }

    #[inline]
    fn decode(bytes: Self::Bytes, _: Endian) -> Self {
        bytes[0] != 0
    }
}

impl Store {
    /// Appends `value` in the given byte order. Returns the new write cursor.
    ///
    /// # Errors
    ///
    /// [`BufferError::CapacityExceeded`](crate::BufferError::CapacityExceeded)
    /// if the store cannot grow.
    pub fn write_value<T: Primitive>(&mut self, value: T, endian: Endian) -> Result<usize> {
        self.write(value.encode(endian).as_ref())
    }

    /// Decodes the next value without consuming it.
    ///
    /// # Errors
    ///
    /// [`BufferError::EndOfData`](crate::BufferError::EndOfData) if fewer
    /// than `T::WIDTH` bytes are unread.
    pub fn peek_value<T: Primitive>(&self, endian: Endian) -> Result<T> {
        let mut bytes = T::Bytes::default();
        self.peek_fill(bytes.as_mut(), true)?;
        Ok(T::decode(bytes, endian))
    }

    /// Decodes and consumes the next value.
    ///
    /// # Errors
    ///
    /// As for [`peek_value`](Self::peek_value). Nothing is consumed on error.
    pub fn read_value<T: Primitive>(&mut self, endian: Endian) -> Result<T> {
        let value = self.peek_value(endian)?;
        self.advance(T::WIDTH);
        Ok(value)
    }

    /// Appends a boolean spread over `len` bytes: all zero except a `1` at
    /// the first (little) or last (big) byte. A `len` of zero writes one
    /// byte.
    ///
    /// # Errors
    ///
    /// [`BufferError::CapacityExceeded`](crate::BufferError::CapacityExceeded)
    /// if `len` bytes cannot be allocated or the store cannot grow.
    pub fn write_bool_wide(&mut self, value: bool, len: usize, endian: Endian) -> Result<usize> {
        let len = len.max(1);
        let max = self.options().max_capacity;
        let target = self
            .len()
            .checked_add(len)
            .ok_or(crate::BufferError::CapacityExceeded {
                requested: usize::MAX,
                max,
            })?;
        self.ensure_capacity(target)?;
        let mut bytes = crate::store::zeroed(len, max)?;
        bytes[endian.flag_index(len)] = u8::from(value);
        self.write(&bytes)
    }

    /// Decodes a `len`-byte boolean without consuming it. Only the byte at
    /// the endian's flag position is inspected.
    ///
    /// # Errors
    ///
    /// [`BufferError::EndOfData`](crate::BufferError::EndOfData) if fewer
    /// than `len` bytes are unread.
    pub fn peek_bool_wide(&self, len: usize, endian: Endian) -> Result<bool> {
        let len = len.max(1);
        let bytes = self.peek(len, true)?;
        Ok(bytes[endian.flag_index(len)] != 0)
    }

    /// Decodes and consumes a `len`-byte boolean.
    ///
    /// # Errors
    ///
    /// As for [`peek_bool_wide`](Self::peek_bool_wide).
    pub fn read_bool_wide(&mut self, len: usize, endian: Endian) -> Result<bool> {
        let value = self.peek_bool_wide(len, endian)?;
        self.advance(len.max(1));
        Ok(value)
    }
}

/// Generates the `write_*`, `peek_*` and `read_*` wrappers for one scalar.
///
/// `@store` emits `&mut self` methods for [`Store`]; `@lock` emits `&self`
/// methods for a type whose `lock()` returns a guard over a `Store`.
/// Single-byte types take no endianness argument.
macro_rules! typed_accessors {
    (@store single $ty:ty => $write:ident, $peek:ident, $read:ident) => {
        #[doc = concat!("Appends a `", stringify!($ty), "`.")]
        ///
        /// # Errors
        ///
        /// Fails if the store cannot grow.
        #[inline]
        pub fn $write(&mut self, value: $ty) -> Result<usize> {
            self.write_value(value, Endian::Little)
        }

        #[doc = concat!("Decodes the next `", stringify!($ty), "` without consuming it.")]
        ///
        /// # Errors
        ///
        /// Fails if nothing is unread.
        #[inline]
        pub fn $peek(&self) -> Result<$ty> {
            self.peek_value(Endian::Little)
        }

        #[doc = concat!("Decodes and consumes the next `", stringify!($ty), "`.")]
        ///
        /// # Errors
        ///
        /// Fails if nothing is unread.
        #[inline]
        pub fn $read(&mut self) -> Result<$ty> {
            self.read_value(Endian::Little)
        }
    };
    (@store wide $ty:ty => $write:ident, $peek:ident, $read:ident) => {
        #[doc = concat!("Appends a `", stringify!($ty), "` in the given byte order.")]
        ///
        /// # Errors
        ///
        /// Fails if the store cannot grow.
        #[inline]
        pub fn $write(&mut self, value: $ty, endian: Endian) -> Result<usize> {
            self.write_value(value, endian)
        }

        #[doc = concat!("Decodes the next `", stringify!($ty), "` without consuming it.")]
        ///
        /// # Errors
        ///
        /// Fails if too few bytes are unread.
        #[inline]
        pub fn $peek(&self, endian: Endian) -> Result<$ty> {
            self.peek_value(endian)
        }

        #[doc = concat!("Decodes and consumes the next `", stringify!($ty), "`.")]
        ///
        /// # Errors
        ///
        /// Fails if too few bytes are unread.
        #[inline]
        pub fn $read(&mut self, endian: Endian) -> Result<$ty> {
            self.read_value(endian)
        }
    };
    (@lock single $ty:ty => $write:ident, $peek:ident, $read:ident) => {
        #[doc = concat!("Appends a `", stringify!($ty), "`.")]
        ///
        /// # Errors
        ///
        /// Fails if the store cannot grow.
        #[inline]
        pub fn $write(&self, value: $ty) -> Result<usize> {
            self.lock().$write(value)
        }

        #[doc = concat!("Decodes the next `", stringify!($ty), "` without consuming it.")]
        ///
        /// # Errors
        ///
        /// Fails if nothing is unread.
        #[inline]
        pub fn $peek(&self) -> Result<$ty> {
            self.lock().$peek()
        }

        #[doc = concat!("Decodes and consumes the next `", stringify!($ty), "`.")]
        ///
        /// # Errors
        ///
        /// Fails if nothing is unread.
        #[inline]
        pub fn $read(&self) -> Result<$ty> {
            self.lock().$read()
        }
    };
    (@lock wide $ty:ty => $write:ident, $peek:ident, $read:ident) => {
        #[doc = concat!("Appends a `", stringify!($ty), "` in the given byte order.")]
        ///
        /// # Errors
        ///
        /// Fails if the store cannot grow.
        #[inline]
        pub fn $write(&self, value: $ty, endian: Endian) -> Result<usize> {
            self.lock().$write(value, endian)
        }

        #[doc = concat!("Decodes the next `", stringify!($ty), "` without consuming it.")]
        ///
        /// # Errors
        ///
        /// Fails if too few bytes are unread.
        #[inline]
        pub fn $peek(&self, endian: Endian) -> Result<$ty> {
            self.lock().$peek(endian)
        }

        #[doc = concat!("Decodes and consumes the next `", stringify!($ty), "`.")]
        ///
        /// # Errors
        ///
        /// Fails if too few bytes are unread.
        #[inline]
        pub fn $read(&self, endian: Endian) -> Result<$ty> {
            self.lock().$read(endian)
        }
    };
}

pub(crate) use typed_accessors;

/// Expands `typed_accessors!` for every supported scalar. Use inside an
/// `impl` block.
macro_rules! for_each_primitive {
    (@$mode:ident) => {
        $crate::codec::typed_accessors!(@$mode single bool => write_bool, peek_bool, read_bool);
        $crate::codec::typed_accessors!(@$mode single u8 => write_u8, peek_u8, read_u8);
        $crate::codec::typed_accessors!(@$mode single i8 => write_i8, peek_i8, read_i8);
        $crate::codec::typed_accessors!(@$mode wide u16 => write_u16, peek_u16, read_u16);
        $crate::codec::typed_accessors!(@$mode wide i16 => write_i16, peek_i16, read_i16);
        $crate::codec::typed_accessors!(@$mode wide u32 => write_u32, peek_u32, read_u32);
        $crate::codec::typed_accessors!(@$mode wide i32 => write_i32, peek_i32, read_i32);
        $crate::codec::typed_accessors!(@$mode wide u64 => write_u64, peek_u64, read_u64);
        $crate::codec::typed_accessors!(@$mode wide i64 => write_i64, peek_i64, read_i64);
        $crate::codec::typed_accessors!(@$mode wide half::f16 => write_f16, peek_f16, read_f16);
        $crate::codec::typed_accessors!(@$mode wide f32 => write_f32, peek_f32, read_f32);
        $crate::codec::typed_accessors!(@$mode wide f64 => write_f64, peek_f64, read_f64);
    };
}

pub(crate) use for_each_primitive;

impl Store {
    for_each_primitive!(@store);
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::BufferError;

    #[rstest]
    #[case(Endian::Little, [0x78, 0x56, 0x34, 0x12])]
    #[case(Endian::Big, [0x12, 0x34, 0x56, 0x78])]
    fn u32_byte_order(#[case] endian: Endian, #[case] wire: [u8; 4]) {
        let mut store = Store::new();
        store.write_u32(0x1234_5678, endian).unwrap();
        assert_eq!(store.to_vec(), wire);
        assert_eq!(store.read_u32(endian).unwrap(), 0x1234_5678);
    }

    #[test]
    fn half_float_wire_format() {
        let mut store = Store::new();
        store.write_f16(f16::from_f32(1.0), Endian::Little).unwrap();
        store.write_f16(f16::from_f32(1.0), Endian::Big).unwrap();
        assert_eq!(store.to_vec(), [0x00, 0x3C, 0x3C, 0x00]);
        assert_eq!(store.read_f16(Endian::Little).unwrap(), f16::ONE);
        assert_eq!(store.read_f16(Endian::Big).unwrap(), f16::ONE);
    }

    #[test]
    fn extremes_round_trip() {
        let mut store = Store::new();
        store.write_i8(i8::MIN).unwrap();
        store.write_i16(i16::MIN, Endian::Big).unwrap();
        store.write_i64(i64::MIN, Endian::Little).unwrap();
        store.write_u64(u64::MAX - 1, Endian::Big).unwrap();
        store.write_f16(f16::MIN, Endian::Little).unwrap();
        store.write_f32(f32::MIN, Endian::Big).unwrap();
        store.write_f64(f64::MIN, Endian::Little).unwrap();
        assert_eq!(store.len(), 1 + 2 + 8 + 8 + 2 + 4 + 8);

        assert_eq!(store.read_i8().unwrap(), i8::MIN);
        assert_eq!(store.read_i16(Endian::Big).unwrap(), i16::MIN);
        assert_eq!(store.read_i64(Endian::Little).unwrap(), i64::MIN);
        assert_eq!(store.read_u64(Endian::Big).unwrap(), u64::MAX - 1);
        assert_eq!(store.read_f16(Endian::Little).unwrap(), f16::MIN);
        assert_eq!(store.read_f32(Endian::Big).unwrap().to_bits(), f32::MIN.to_bits());
        assert_eq!(store.read_f64(Endian::Little).unwrap().to_bits(), f64::MIN.to_bits());
        assert_eq!(store.remaining(), 0);
    }

    #[test]
    fn peek_value_leaves_cursor() {
        let mut store = Store::new();
        store.write_u16(0xBEEF, Endian::Big).unwrap();
        assert_eq!(store.peek_u16(Endian::Big).unwrap(), 0xBEEF);
        assert_eq!(store.peek_u16(Endian::Little).unwrap(), 0xEFBE);
        assert_eq!(store.read_position(), 0);
        assert_eq!(store.read_u8().unwrap(), 0xBE);
        assert_eq!(store.read_u8().unwrap(), 0xEF);
    }

    #[test]
    fn truncated_value_is_end_of_data() {
        let mut store = Store::new();
        store.write(&[1, 2, 3]).unwrap();
        assert_eq!(
            store.read_u32(Endian::Little).unwrap_err(),
            BufferError::EndOfData {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(store.read_position(), 0);
    }

    #[test]
    fn single_byte_bool() {
        let mut store = Store::new();
        store.write_bool(true).unwrap();
        store.write_bool(false).unwrap();
        store.write(&[0x80]).unwrap();
        assert_eq!(store.to_vec(), [1, 0, 0x80]);
        assert!(store.read_bool().unwrap());
        assert!(!store.read_bool().unwrap());
        assert!(store.read_bool().unwrap());
    }

    #[rstest]
    #[case(true, 4, Endian::Little, &[1, 0, 0, 0])]
    #[case(true, 4, Endian::Big, &[0, 0, 0, 1])]
    #[case(false, 3, Endian::Big, &[0, 0, 0])]
    #[case(true, 0, Endian::Big, &[1])]
    fn wide_bool_layout(
        #[case] value: bool,
        #[case] len: usize,
        #[case] endian: Endian,
        #[case] wire: &[u8],
    ) {
        let mut store = Store::new();
        store.write_bool_wide(value, len, endian).unwrap();
        assert_eq!(store.to_vec(), wire);
        assert_eq!(store.peek_bool_wide(len, endian).unwrap(), value);
        assert_eq!(store.read_bool_wide(len, endian).unwrap(), value);
        assert_eq!(store.remaining(), 0);
    }

    #[test]
    fn wide_bool_reads_only_flag_byte() {
        let mut store = Store::new();
        store.write(&[0, 9, 9, 1]).unwrap();
        assert!(!store.peek_bool_wide(4, Endian::Little).unwrap());
        assert!(store.read_bool_wide(4, Endian::Big).unwrap());
    }

    #[test]
    fn huge_wide_bool_is_an_error() {
        let mut store = Store::with_options(crate::BufferOptions {
            max_capacity: 64,
            ..crate::BufferOptions::default()
        });
        store.write_u8(1).unwrap();
        assert_eq!(
            store
                .write_bool_wide(true, usize::MAX, Endian::Big)
                .unwrap_err(),
            BufferError::CapacityExceeded {
                requested: usize::MAX,
                max: 64
            }
        );
        assert_eq!(
            store.write_bool_wide(true, 100, Endian::Big).unwrap_err(),
            BufferError::CapacityExceeded {
                requested: 101,
                max: 64
            }
        );
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.peek_bool_wide(usize::MAX, Endian::Little).unwrap_err(),
            BufferError::EndOfData {
                requested: usize::MAX,
                available: 1
            }
        );
    }
}
