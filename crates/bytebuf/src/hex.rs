//! Hex rendering of byte sequences.
//!
//! Each byte is printed as hex digits, optionally wrapped in a template, and
//! the pieces are joined with a splicer string.
//!
//! # Templates
//!
//! A template holds one placeholder delimited by `%`, e.g. `"0x%hex%"`. The
//! placeholder name is matched case-insensitively after trimming, so
//! `"% HEX %"` works too. A doubled `%%` is a literal percent sign and never
//! starts or ends a placeholder:
//!
//! | template      | byte `0x0A` renders as   |
//! |---------------|--------------------------|
//! | `%hex%`       | `0A`                     |
//! | `0x%hex%`     | `0x0A`                   |
//! | `%%(%hex%)%%` | `%(0A)%`                 |
//! | `--`          | `--` (no placeholder)    |
//! | `%nope%`      | `0A` (unknown name)      |
//! | `%%hex%%`     | `%hex%` (no placeholder) |
//!
//! `%%` is unescaped everywhere it appears in the output, both around the
//! placeholder and in a literal template. Renderers that treat `%%` as an
//! escape only while locating the placeholder, and copy it through
//! unchanged, would print `%%(0A)%%` for the third row above.

use alloc::{
    format,
    string::{String, ToString},
};

/// Formatting switches for [`to_hex_string`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HexOptions {
    /// Print `A`-`F` instead of `a`-`f`.
    ///
    /// # Default
    ///
    /// `true`
    pub uppercase: bool,

    /// Pad single-digit bytes with a leading zero.
    ///
    /// # Default
    ///
    /// `true`
    pub zero_fill: bool,

    /// Inserted between consecutive bytes.
    ///
    /// # Default
    ///
    /// `" "`
    pub splicer: String,

    /// Per-byte template. `None` prints bare digits.
    ///
    /// # Default
    ///
    /// `Some("%hex%")`
    pub template: Option<String>,
}

impl Default for HexOptions {
    fn default() -> Self {
        Self {
            uppercase: true,
            zero_fill: true,
            splicer: " ".to_string(),
            template: Some("%hex%".to_string()),
        }
    }
}

impl HexOptions {
    fn digits(&self, byte: u8) -> String {
        match (self.uppercase, self.zero_fill) {
            (true, true) => format!("{byte:02X}"),
            (true, false) => format!("{byte:X}"),
            (false, true) => format!("{byte:02x}"),
            (false, false) => format!("{byte:x}"),
        }
    }
}

/// Renders `bytes` as a hex string.
///
/// ```rust
/// use bytebuf::{HexOptions, to_hex_string};
///
/// assert_eq!(to_hex_string(&[0x0A, 0xFF], &HexOptions::default()), "0A FF");
///
/// let options = HexOptions {
///     uppercase: false,
///     splicer: ", ".into(),
///     template: Some("0x%hex%".into()),
///     ..Default::default()
/// };
/// assert_eq!(to_hex_string(&[0x0A, 0xFF], &options), "0x0a, 0xff");
/// ```
#[must_use]
pub fn to_hex_string(bytes: &[u8], options: &HexOptions) -> String {
    let template = options
        .template
        .as_deref()
        .map_or(Template::Bare, Template::parse);

    let mut out = String::with_capacity(bytes.len() * (3 + options.splicer.len()));
    for (i, &byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push_str(&options.splicer);
        }
        let digits = options.digits(byte);
        match &template {
            Template::Bare => out.push_str(&digits),
            Template::Literal(text) => out.push_str(text),
            Template::Wrapped { left, right } => {
                out.push_str(left);
                out.push_str(&digits);
                out.push_str(right);
            }
        }
    }
    out
}

#[derive(Debug, PartialEq)]
enum Template {
    /// Digits only.
    Bare,
    /// No placeholder: every byte renders as this text.
    Literal(String),
    /// `left` + digits + `right`.
    Wrapped { left: String, right: String },
}

impl Template {
    fn parse(src: &str) -> Self {
        let bytes = src.as_bytes();
        let mut delimiters = [0usize; 2];
        let mut found = 0;
        let mut i = 0;
        while i < bytes.len() && found < 2 {
            if bytes[i] == b'%' {
                if bytes.get(i + 1) == Some(&b'%') {
                    i += 2;
                    continue;
                }
                delimiters[found] = i;
                found += 1;
            }
            i += 1;
        }

        if found < 2 {
            let text = unescape(src);
            return if text.trim().is_empty() {
                Self::Bare
            } else {
                Self::Literal(text)
            };
        }

        let [start, end] = delimiters;
        if src[start + 1..end].trim().eq_ignore_ascii_case("hex") {
            Self::Wrapped {
                left: unescape(&src[..start]),
                right: unescape(&src[end + 1..]),
            }
        } else {
            Self::Bare
        }
    }
}

fn unescape(text: &str) -> String {
    text.replace("%%", "%")
}
