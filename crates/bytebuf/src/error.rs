use thiserror::Error;

/// Errors raised by [`ByteBuffer`](crate::ByteBuffer) operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// A strict peek or read found no unread bytes left to satisfy it.
    #[error("unexpected end of data: requested {requested} bytes, {available} available")]
    EndOfData {
        /// Bytes the caller asked for.
        requested: usize,
        /// Bytes that were left in the unread window.
        available: usize,
    },
    /// The store cannot grow to the requested length.
    #[error("capacity exceeded: cannot grow store to {requested} bytes (limit {max})")]
    CapacityExceeded {
        /// Capacity the write needed.
        requested: usize,
        /// Largest capacity the buffer may allocate.
        max: usize,
    },
}

impl BufferError {
    /// Whether the error only signals that the input ran out.
    #[must_use]
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, Self::EndOfData { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, BufferError>;

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages_name_the_sizes() {
        let err = BufferError::EndOfData {
            requested: 4,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "unexpected end of data: requested 4 bytes, 1 available"
        );
        assert!(err.is_end_of_data());

        let err = BufferError::CapacityExceeded {
            requested: 300,
            max: 256,
        };
        assert_eq!(
            err.to_string(),
            "capacity exceeded: cannot grow store to 300 bytes (limit 256)"
        );
        assert!(!err.is_end_of_data());
    }
}
