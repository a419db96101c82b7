#![no_main]
use arbitrary::Arbitrary;
use bytebuf::{BufferOptions, Endian, LengthPrefix, Store, TextEncoding};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Write(Vec<u8>),
    WriteRange { src: Vec<u8>, offset: u8, count: u8 },
    Peek { len: u8, strict: bool },
    Read { len: u8, strict: bool },
    WriteU32 { value: u32, big: bool },
    ReadU32 { big: bool },
    WritePrefixed { text: String, prefix: u8, encoding: u8 },
    ReadPrefixed { prefix: u8, encoding: u8 },
    Reserve(u16),
}

#[derive(Arbitrary, Debug)]
struct Input {
    min_allocation: u8,
    max_capacity: u16,
    ops: Vec<Op>,
}

fn endian(big: bool) -> Endian {
    if big { Endian::Big } else { Endian::Little }
}

fn prefix(n: u8) -> LengthPrefix {
    LengthPrefix::ALL[usize::from(n) % LengthPrefix::ALL.len()]
}

fn encoding(n: u8) -> TextEncoding {
    match n % 4 {
        0 => TextEncoding::Utf8,
        1 => TextEncoding::Utf16Le,
        2 => TextEncoding::Utf16Be,
        _ => TextEncoding::Latin1,
    }
}

/// Drives a store and a plain `Vec<u8>` model side by side: the store must
/// hold exactly the model's bytes and its read cursor must match the model's.
fn run(input: Input) {
    let mut store = Store::with_options(BufferOptions {
        min_allocation: usize::from(input.min_allocation),
        max_capacity: usize::from(input.max_capacity),
    });
    let mut model: Vec<u8> = Vec::new();
    let mut read = 0usize;

    for op in input.ops {
        match op {
            Op::Write(bytes) => {
                if store.write(&bytes).is_ok() {
                    model.extend_from_slice(&bytes);
                }
            }
            Op::WriteRange { src, offset, count } => {
                let (offset, count) = (usize::from(offset), usize::from(count));
                if store.write_range(&src, offset, count).is_ok() {
                    let end = (offset + count).min(src.len());
                    model.extend_from_slice(src.get(offset..end).unwrap_or_default());
                }
            }
            Op::Peek { len, strict } => {
                let len = usize::from(len);
                let available = model.len() - read;
                match store.peek(len, strict) {
                    Ok(got) => {
                        let n = len.min(available);
                        assert_eq!(got.len(), len);
                        assert_eq!(got[..n], model[read..read + n]);
                    }
                    Err(_) => assert!(strict && len > available),
                }
            }
            Op::Read { len, strict } => {
                let len = usize::from(len);
                let available = model.len() - read;
                match store.read(len, strict) {
                    Ok(got) => {
                        let n = len.min(available);
                        assert_eq!(got[..n], model[read..read + n]);
                        read += n;
                    }
                    Err(_) => assert!(strict && len > available),
                }
            }
            Op::WriteU32 { value, big } => {
                if store.write_u32(value, endian(big)).is_ok() {
                    model.extend_from_slice(&match endian(big) {
                        Endian::Big => value.to_be_bytes(),
                        Endian::Little => value.to_le_bytes(),
                    });
                }
            }
            Op::ReadU32 { big } => {
                if let Ok(value) = store.read_u32(endian(big)) {
                    let raw: [u8; 4] = model[read..read + 4].try_into().unwrap();
                    let expected = match endian(big) {
                        Endian::Big => u32::from_be_bytes(raw),
                        Endian::Little => u32::from_le_bytes(raw),
                    };
                    assert_eq!(value, expected);
                    read += 4;
                }
            }
            Op::WritePrefixed {
                text,
                prefix: p,
                encoding: e,
            } => {
                let before = store.len();
                if store.write_prefixed_str(&text, encoding(e), prefix(p)).is_ok() {
                    model.extend_from_slice(&store.to_vec()[before..]);
                }
            }
            Op::ReadPrefixed {
                prefix: p,
                encoding: e,
            } => {
                let before = store.read_position();
                if store.read_prefixed_string(prefix(p), encoding(e)).is_ok() {
                    assert!(store.read_position() >= before + prefix(p).width());
                    read = store.read_position();
                } else {
                    assert_eq!(store.read_position(), before);
                }
            }
            Op::Reserve(target) => {
                let _ = store.ensure_capacity(usize::from(target));
            }
        }

        store.assert_cursors();
        assert_eq!(store.to_vec(), model);
        assert_eq!(store.read_position(), read);
    }
}

fuzz_target!(|input: Input| run(input));
