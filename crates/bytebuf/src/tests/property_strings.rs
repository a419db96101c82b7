use alloc::string::String;

use quickcheck::QuickCheck;

use crate::{LengthPrefix, Store, TextEncoding};

/// Property: a prefixed string comes back whole when it fits the prefix, and
/// as its first `max_len` encoded bytes when it does not.
#[test]
fn prefixed_strings_truncate_to_prefix_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: String, padding: u16) -> bool {
        // Push some inputs past the 1-byte limit.
        let text = text + &"z".repeat(usize::from(padding % 400));
        let bytes = text.as_bytes();
        let kept = bytes.len().min(255);

        let mut store = Store::new();
        store
            .write_prefixed_str(&text, TextEncoding::Utf8, LengthPrefix::U8)
            .unwrap();
        store
            .write_prefixed_str(&text, TextEncoding::Utf8, LengthPrefix::I32Be)
            .unwrap();

        let short = store
            .read_prefixed_string(LengthPrefix::U8, TextEncoding::Utf8)
            .unwrap();
        let full = store
            .read_prefixed_string(LengthPrefix::I32Be, TextEncoding::Utf8)
            .unwrap();

        short == TextEncoding::Utf8.decode(&bytes[..kept]) && full == text && store.remaining() == 0
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(String, u16) -> bool);
}

/// Property: UTF-16 framing is lossless for any string short enough to fit.
#[test]
fn utf16_round_trip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: String, big: bool) -> bool {
        let encoding = if big {
            TextEncoding::Utf16Be
        } else {
            TextEncoding::Utf16Le
        };
        let mut store = Store::new();
        store
            .write_prefixed_str(&text, encoding, LengthPrefix::I16Le)
            .unwrap();
        store.peek_prefixed_string(LengthPrefix::I16Le, encoding).unwrap() == text
            && store.read_prefixed_string(LengthPrefix::I16Le, encoding).unwrap() == text
    }

    QuickCheck::new().quickcheck(prop as fn(String, bool) -> bool);
}
