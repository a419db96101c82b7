use crate::Primitive;

/// Byte order used when a multi-byte value is serialized.
///
/// Endianness is chosen per call and never stored on the buffer. Encode and
/// decode must agree for a value to round-trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endian {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

impl Endian {
    /// Index of the significant byte in an `len`-byte wide boolean.
    pub(crate) fn flag_index(self, len: usize) -> usize {
        match self {
            Self::Little => 0,
            Self::Big => len - 1,
        }
    }
}

/// Framing used in front of a length-prefixed string payload.
///
/// The 16- and 32-bit prefixes are signed, so their maximum payload is
/// `i16::MAX` and `i32::MAX` bytes respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthPrefix {
    /// A single unsigned byte.
    U8,
    /// A little-endian `i16`.
    I16Le,
    /// A little-endian `i32`.
    I32Le,
    /// A big-endian `i16`.
    I16Be,
    /// A big-endian `i32`.
    I32Be,
}

impl LengthPrefix {
    /// Every prefix kind, in declaration order.
    pub const ALL: [Self; 5] = [Self::U8, Self::I16Le, Self::I32Le, Self::I16Be, Self::I32Be];

    /// Number of bytes the prefix occupies.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::I16Le | Self::I16Be => 2,
            Self::I32Le | Self::I32Be => 4,
        }
    }

    /// Byte order of the prefix integer.
    #[must_use]
    pub const fn endian(self) -> Endian {
        match self {
            Self::U8 | Self::I16Le | Self::I32Le => Endian::Little,
            Self::I16Be | Self::I32Be => Endian::Big,
        }
    }

    /// Largest payload length the prefix can hold.
    #[must_use]
    pub const fn max_len(self) -> usize {
        match self {
            Self::U8 => u8::MAX as usize,
            Self::I16Le | Self::I16Be => i16::MAX as usize,
            Self::I32Le | Self::I32Be => i32::MAX as usize,
        }
    }

    /// Encodes `len` into `dst[..self.width()]`. `len` must not exceed
    /// [`max_len`](Self::max_len).
    pub(crate) fn encode(self, len: usize, dst: &mut [u8]) {
        debug_assert!(len <= self.max_len());
        let endian = self.endian();
        match self {
            Self::U8 => put(u8::try_from(len).unwrap_or(u8::MAX), endian, dst),
            Self::I16Le | Self::I16Be => put(i16::try_from(len).unwrap_or(i16::MAX), endian, dst),
            Self::I32Le | Self::I32Be => put(i32::try_from(len).unwrap_or(i32::MAX), endian, dst),
        }
    }

    /// Decodes a prefix from `src[..self.width()]`. Negative lengths are
    /// returned as-is; callers treat them as empty.
    pub(crate) fn decode(self, src: &[u8]) -> i64 {
        let endian = self.endian();
        match self {
            Self::U8 => get::<u8>(src, endian),
            Self::I16Le | Self::I16Be => get::<i16>(src, endian),
            Self::I32Le | Self::I32Be => get::<i32>(src, endian),
        }
    }
}

fn put<T: Primitive>(value: T, endian: Endian, dst: &mut [u8]) {
    dst[..T::WIDTH].copy_from_slice(value.encode(endian).as_ref());
}

fn get<T: Primitive + Into<i64>>(src: &[u8], endian: Endian) -> i64 {
    let mut bytes = T::Bytes::default();
    bytes.as_mut().copy_from_slice(&src[..T::WIDTH]);
    T::decode(bytes, endian).into()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(LengthPrefix::U8, 1, Endian::Little, 255)]
    #[case(LengthPrefix::I16Le, 2, Endian::Little, 32_767)]
    #[case(LengthPrefix::I32Le, 4, Endian::Little, 2_147_483_647)]
    #[case(LengthPrefix::I16Be, 2, Endian::Big, 32_767)]
    #[case(LengthPrefix::I32Be, 4, Endian::Big, 2_147_483_647)]
    fn prefix_geometry(
        #[case] prefix: LengthPrefix,
        #[case] width: usize,
        #[case] endian: Endian,
        #[case] max: usize,
    ) {
        assert_eq!(prefix.width(), width);
        assert_eq!(prefix.endian(), endian);
        assert_eq!(prefix.max_len(), max);
    }

    #[rstest]
    #[case(LengthPrefix::U8, &[0xC8])]
    #[case(LengthPrefix::I16Le, &[0xC8, 0x00])]
    #[case(LengthPrefix::I16Be, &[0x00, 0xC8])]
    #[case(LengthPrefix::I32Le, &[0xC8, 0x00, 0x00, 0x00])]
    #[case(LengthPrefix::I32Be, &[0x00, 0x00, 0x00, 0xC8])]
    fn prefix_wire_format(#[case] prefix: LengthPrefix, #[case] expected: &[u8]) {
        let mut dst = [0u8; 4];
        prefix.encode(200, &mut dst);
        assert_eq!(&dst[..prefix.width()], expected);
        assert_eq!(prefix.decode(expected), 200);
    }

    #[rstest]
    fn prefix_matches_scalar_codec(
        #[values(LengthPrefix::I16Le, LengthPrefix::I16Be, LengthPrefix::I32Le, LengthPrefix::I32Be)]
        prefix: LengthPrefix,
    ) {
        let mut framed = crate::Store::new();
        framed.write_prefixed_str("abc", crate::TextEncoding::Utf8, prefix).unwrap();
        let mut scalar = crate::Store::new();
        if prefix.width() == 2 {
            scalar.write_value(3_i16, prefix.endian()).unwrap();
        } else {
            scalar.write_value(3_i32, prefix.endian()).unwrap();
        }
        assert_eq!(framed.to_vec()[..prefix.width()], scalar.to_vec()[..]);
    }

    #[test]
    fn signed_prefix_decodes_negative() {
        assert_eq!(LengthPrefix::I16Le.decode(&[0xFF, 0xFF]), -1);
        assert_eq!(LengthPrefix::I32Be.decode(&[0x80, 0, 0, 0]), i64::from(i32::MIN));
    }

    #[test]
    fn default_endian_is_little() {
        assert_eq!(Endian::default(), Endian::Little);
        assert_eq!(Endian::Little.flag_index(4), 0);
        assert_eq!(Endian::Big.flag_index(4), 3);
    }
}
