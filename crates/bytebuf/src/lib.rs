//! A growable byte buffer with independent read and write cursors.
//!
//! Bytes are appended at the write cursor and consumed from a separate read
//! cursor. Peeks look at unread bytes without consuming them. Fixed-width
//! scalars are encoded in a byte order chosen per call, and strings can be
//! framed behind a 1-, 2- or 4-byte length prefix.
//!
//! ```rust
//! use bytebuf::{ByteBuffer, Endian, LengthPrefix, TextEncoding};
//!
//! let buf = ByteBuffer::new();
//! buf.write_i32(i32::MIN, Endian::Little)?;
//! buf.write_f64(0.5, Endian::Big)?;
//! buf.write_prefixed_str("héllo", TextEncoding::Utf8, LengthPrefix::I16Be)?;
//!
//! assert_eq!(buf.read_i32(Endian::Little)?, i32::MIN);
//! assert_eq!(buf.read_f64(Endian::Big)?, 0.5);
//! assert_eq!(
//!     buf.read_prefixed_string(LengthPrefix::I16Be, TextEncoding::Utf8)?,
//!     "héllo"
//! );
//! # Ok::<(), bytebuf::BufferError>(())
//! ```
//!
//! [`ByteBuffer`] serializes every operation behind a mutex. [`Store`] is the
//! same engine without the lock.

extern crate alloc;

mod buffer;
mod codec;
mod endian;
mod error;
pub mod hex;
mod options;
mod store;
mod text;

#[cfg(test)]
mod tests;

pub use buffer::{BufferGuard, ByteBuffer};
pub use codec::Primitive;
pub use endian::{Endian, LengthPrefix};
pub use error::{BufferError, Result};
pub use half::f16;
pub use hex::{HexOptions, to_hex_string};
pub use options::BufferOptions;
pub use store::Store;
pub use text::TextEncoding;
