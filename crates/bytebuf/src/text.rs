//! Text encodings and string framing.

use alloc::{borrow::Cow, string::String, vec::Vec};

use bstr::ByteSlice;

use crate::{BufferError, LengthPrefix, Result, Store};

/// Character encoding used to turn strings into payload bytes.
///
/// Decoding is lossy: malformed input (for example a UTF-8 scalar cut in half
/// by a truncated prefixed write) becomes U+FFFD rather than an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextEncoding {
    /// UTF-8.
    #[default]
    Utf8,
    /// UTF-16, little-endian code units, no byte order mark.
    Utf16Le,
    /// UTF-16, big-endian code units, no byte order mark.
    Utf16Be,
    /// ISO-8859-1. Characters above U+00FF are written as `?`.
    Latin1,
}

impl TextEncoding {
    /// Encodes `text`, borrowing when the bytes are already UTF-8.
    #[must_use]
    pub fn encode(self, text: &str) -> Cow<'_, [u8]> {
        match self {
            Self::Utf8 => Cow::Borrowed(text.as_bytes()),
            Self::Utf16Le => Cow::Owned(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Self::Utf16Be => Cow::Owned(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            Self::Latin1 => Cow::Owned(
                text.chars()
                    .map(|c| u8::try_from(c).unwrap_or(b'?'))
                    .collect(),
            ),
        }
    }

    /// Decodes `bytes`, replacing anything malformed with U+FFFD. A dangling
    /// odd byte at the end of UTF-16 input is dropped.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => bytes.to_str_lossy().into_owned(),
            Self::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Self::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

impl Store {
    /// Appends the encoded `text` with no framing. The reader has to know the
    /// byte length some other way.
    ///
    /// # Errors
    ///
    /// [`BufferError::CapacityExceeded`](crate::BufferError::CapacityExceeded)
    /// if the store cannot grow.
    pub fn write_str(&mut self, text: &str, encoding: TextEncoding) -> Result<usize> {
        self.write(&encoding.encode(text))
    }

    /// Appends `text` behind a length prefix.
    ///
    /// The prefix holds the encoded byte length clamped to
    /// [`LengthPrefix::max_len`]. Payloads longer than that are cut to the
    /// first `max_len` bytes without an error; the loss is only reported as a
    /// `debug` trace event. Returns the new write cursor.
    ///
    /// # Errors
    ///
    /// [`BufferError::CapacityExceeded`](crate::BufferError::CapacityExceeded)
    /// if the store cannot grow. Nothing is written in that case.
    pub fn write_prefixed_str(
        &mut self,
        text: &str,
        encoding: TextEncoding,
        prefix: LengthPrefix,
    ) -> Result<usize> {
        let payload = encoding.encode(text);
        let len = payload.len().min(prefix.max_len());
        if len < payload.len() {
            tracing::debug!(
                encoded = payload.len(),
                written = len,
                ?prefix,
                "length-prefixed payload truncated"
            );
        }

        let width = prefix.width();
        let mut frame = Vec::with_capacity(width + len);
        frame.resize(width, 0);
        prefix.encode(len, &mut frame);
        frame.extend_from_slice(&payload[..len]);
        self.write(&frame)
    }

    /// Decodes the next `len` bytes as text without consuming them.
    ///
    /// # Errors
    ///
    /// [`BufferError::EndOfData`](crate::BufferError::EndOfData) if fewer than
    /// `len` bytes are unread.
    pub fn peek_string(&self, len: usize, encoding: TextEncoding) -> Result<String> {
        Ok(encoding.decode(&self.peek(len, true)?))
    }

    /// Decodes and consumes the next `len` bytes as text.
    ///
    /// # Errors
    ///
    /// As for [`peek_string`](Self::peek_string). Nothing is consumed on
    /// error.
    pub fn read_string(&mut self, len: usize, encoding: TextEncoding) -> Result<String> {
        Ok(encoding.decode(&self.read(len, true)?))
    }

    /// Decodes a length-prefixed string without consuming it.
    ///
    /// # Errors
    ///
    /// [`BufferError::EndOfData`](crate::BufferError::EndOfData) if the prefix
    /// or the payload it announces is not fully available.
    pub fn peek_prefixed_string(
        &self,
        prefix: LengthPrefix,
        encoding: TextEncoding,
    ) -> Result<String> {
        let (_, text) = self.peek_frame(prefix, encoding)?;
        Ok(text)
    }

    /// Decodes and consumes a length-prefixed string. A zero or negative
    /// length yields `""` and consumes only the prefix.
    ///
    /// # Errors
    ///
    /// As for [`peek_prefixed_string`](Self::peek_prefixed_string). Nothing
    /// is consumed on error.
    pub fn read_prefixed_string(
        &mut self,
        prefix: LengthPrefix,
        encoding: TextEncoding,
    ) -> Result<String> {
        let (consumed, text) = self.peek_frame(prefix, encoding)?;
        self.advance(consumed);
        Ok(text)
    }

    /// Returns the frame's total width and its decoded payload.
    fn peek_frame(&self, prefix: LengthPrefix, encoding: TextEncoding) -> Result<(usize, String)> {
        let width = prefix.width();
        let mut head = [0u8; 4];
        self.peek_fill(&mut head[..width], true)?;

        let len = match usize::try_from(prefix.decode(&head[..width])) {
            Ok(len) if len > 0 => len,
            _ => return Ok((width, String::new())),
        };
        let total = width.saturating_add(len);
        let available = self.remaining();
        if available < total {
            return Err(BufferError::EndOfData {
                requested: total,
                available,
            });
        }
        let frame = self.peek(total, true)?;
        Ok((total, encoding.decode(&frame[width..])))
    }
}
