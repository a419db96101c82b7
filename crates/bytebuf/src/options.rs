/// Configuration for a [`ByteBuffer`](crate::ByteBuffer)'s growth policy.
///
/// # Examples
///
/// ```rust
/// use bytebuf::{BufferOptions, ByteBuffer};
///
/// let buf = ByteBuffer::with_options(BufferOptions {
///     max_capacity: 1 << 20,
///     ..Default::default()
/// });
/// assert!(buf.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BufferOptions {
    /// Smallest capacity the store grows to on its first allocation.
    ///
    /// Every growth event allocates at least this many bytes, and at least
    /// double the previous capacity, so that appends cost amortized O(1).
    ///
    /// # Default
    ///
    /// `256`
    pub min_allocation: usize,

    /// Largest capacity the store may reach.
    ///
    /// Writes that would need more return
    /// [`BufferError::CapacityExceeded`](crate::BufferError::CapacityExceeded).
    /// Once doubling would cross this limit, the store grows straight to it
    /// instead.
    ///
    /// # Default
    ///
    /// `isize::MAX`, the largest length a `Vec<u8>` can hold.
    pub max_capacity: usize,
}

impl BufferOptions {
    /// Default floor for the first allocation.
    pub const DEFAULT_MIN_ALLOCATION: usize = 256;

    /// Default ceiling, the platform's maximum allocation size.
    #[allow(clippy::cast_sign_loss)]
    pub const DEFAULT_MAX_CAPACITY: usize = isize::MAX as usize;
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            min_allocation: Self::DEFAULT_MIN_ALLOCATION,
            max_capacity: Self::DEFAULT_MAX_CAPACITY,
        }
    }
}
