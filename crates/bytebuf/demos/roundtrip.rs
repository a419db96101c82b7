//! Writes one of every supported value into a [`ByteBuffer`], reads them
//! back in the same order and prints whether each one survived.
//!
//! Every value is written twice: once through the typed methods
//! (`write_i16`, `write_prefixed_str`, ...) and once through the generic
//! [`ByteBuffer::write_value`]. Unsigned values are `MAX - 1` so that a byte
//! order mix-up cannot hide behind a palindromic bit pattern.
//!
//! Run with
//!
//! ```bash
//! cargo run -p bytebuf --example roundtrip
//! ```

use std::fmt::Debug;

use bytebuf::{
    BufferError, ByteBuffer, Endian, HexOptions, LengthPrefix, TextEncoding, f16, to_hex_string,
};

const TEXT: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const BOOL_WIDTH: usize = 4;
const ENDIAN: Endian = Endian::Little;
const ENCODING: TextEncoding = TextEncoding::Utf8;

fn report<T: PartialEq + Debug>(label: &str, peeked: &T, read: &T, expected: &T) {
    let ok = peeked == expected && read == expected;
    println!("[{ok}] {label}: read {read:?}, expected {expected:?}");
}

fn write_scalars(buf: &ByteBuffer, generic: bool) -> Result<(), BufferError> {
    buf.write_bool(true)?;
    buf.write_bool_wide(true, BOOL_WIDTH, ENDIAN)?;
    if generic {
        buf.write_value(i8::MIN, ENDIAN)?;
        buf.write_value(i16::MIN, ENDIAN)?;
        buf.write_value(i32::MIN, ENDIAN)?;
        buf.write_value(i64::MIN, ENDIAN)?;
        buf.write_value(u8::MAX - 1, ENDIAN)?;
        buf.write_value(u16::MAX - 1, ENDIAN)?;
        buf.write_value(u32::MAX - 1, ENDIAN)?;
        buf.write_value(u64::MAX - 1, ENDIAN)?;
        buf.write_value(f16::MIN, ENDIAN)?;
        buf.write_value(f32::MIN, ENDIAN)?;
        buf.write_value(f64::MIN, ENDIAN)?;
    } else {
        buf.write_i8(i8::MIN)?;
        buf.write_i16(i16::MIN, ENDIAN)?;
        buf.write_i32(i32::MIN, ENDIAN)?;
        buf.write_i64(i64::MIN, ENDIAN)?;
        buf.write_u8(u8::MAX - 1)?;
        buf.write_u16(u16::MAX - 1, ENDIAN)?;
        buf.write_u32(u32::MAX - 1, ENDIAN)?;
        buf.write_u64(u64::MAX - 1, ENDIAN)?;
        buf.write_f16(f16::MIN, ENDIAN)?;
        buf.write_f32(f32::MIN, ENDIAN)?;
        buf.write_f64(f64::MIN, ENDIAN)?;
    }
    Ok(())
}

macro_rules! check_scalar {
    ($buf:expr, $label:literal, $peek:ident, $read:ident, $expected:expr $(, $endian:expr)?) => {
        report(
            $label,
            &$buf.$peek($($endian)?)?,
            &$buf.$read($($endian)?)?,
            &$expected,
        )
    };
}

fn check_strings(buf: &ByteBuffer) -> Result<(), BufferError> {
    let len = TEXT.len();
    report(
        "unprefixed",
        &buf.peek_string(len, ENCODING)?,
        &buf.read_string(len, ENCODING)?,
        &TEXT.to_string(),
    );
    for prefix in LengthPrefix::ALL {
        report(
            &format!("{prefix:?}"),
            &buf.peek_prefixed_string(prefix, ENCODING)?,
            &buf.read_prefixed_string(prefix, ENCODING)?,
            &TEXT.to_string(),
        );
    }
    Ok(())
}

fn check_scalars(buf: &ByteBuffer) -> Result<(), BufferError> {
    check_scalar!(buf, "bool", peek_bool, read_bool, true);
    report(
        "bool (4 bytes)",
        &buf.peek_bool_wide(BOOL_WIDTH, ENDIAN)?,
        &buf.read_bool_wide(BOOL_WIDTH, ENDIAN)?,
        &true,
    );
    check_scalar!(buf, "i8", peek_i8, read_i8, i8::MIN);
    check_scalar!(buf, "i16", peek_i16, read_i16, i16::MIN, ENDIAN);
    check_scalar!(buf, "i32", peek_i32, read_i32, i32::MIN, ENDIAN);
    check_scalar!(buf, "i64", peek_i64, read_i64, i64::MIN, ENDIAN);
    check_scalar!(buf, "u8", peek_u8, read_u8, u8::MAX - 1);
    check_scalar!(buf, "u16", peek_u16, read_u16, u16::MAX - 1, ENDIAN);
    check_scalar!(buf, "u32", peek_u32, read_u32, u32::MAX - 1, ENDIAN);
    check_scalar!(buf, "u64", peek_u64, read_u64, u64::MAX - 1, ENDIAN);
    check_scalar!(buf, "f16", peek_f16, read_f16, f16::MIN, ENDIAN);
    check_scalar!(buf, "f32", peek_f32, read_f32, f32::MIN, ENDIAN);
    check_scalar!(buf, "f64", peek_f64, read_f64, f64::MIN, ENDIAN);
    Ok(())
}

fn main() -> Result<(), BufferError> {
    let raw = TEXT.as_bytes();
    let buf = ByteBuffer::new();

    buf.write(raw)?;
    for generic in [false, true] {
        buf.write_str(TEXT, ENCODING)?;
        for prefix in LengthPrefix::ALL {
            buf.write_prefixed_str(TEXT, ENCODING, prefix)?;
        }
        write_scalars(&buf, generic)?;
    }
    println!(
        "wrote {} bytes, capacity {}",
        buf.len(),
        buf.capacity()
    );

    println!("-------------- raw bytes --------------");
    let hex_options = HexOptions::default();
    let read_back = to_hex_string(&buf.read(raw.len(), true)?, &hex_options);
    let original = to_hex_string(raw, &hex_options);
    println!("[{}]\n[read] {read_back}\n[orig] {original}", read_back == original);

    for pass in ["typed", "generic"] {
        println!("-------------- strings ({pass}) --------------");
        check_strings(&buf)?;
        println!("-------------- scalars ({pass}) --------------");
        check_scalars(&buf)?;
    }

    println!("remaining: {}", buf.remaining());
    println!(
        "tail: {}",
        to_hex_string(
            &buf.to_vec()[buf.len() - 8..],
            &HexOptions {
                template: Some("0x%hex%".into()),
                splicer: ", ".into(),
                ..HexOptions::default()
            },
        )
    );
    Ok(())
}
