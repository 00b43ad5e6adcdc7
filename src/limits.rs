//! Protocol constants and driver configuration
//!
//! # Security-First Defaults
//!
//! The parser constants are intentionally conservative to prevent:
//! - Header flooding
//! - Unbounded buffering of incomplete request heads
//! - Memory overflows from hostile chunk sizes
//!
//! Unlike the read-side configuration, the three protocol constants are
//! fixed at compile time: they bound stack-allocated arrays and the
//! fallback accumulator, and the scanner's fencing contract is written
//! against them.

use std::time::Duration;

/// Capacity of the header-slot array.
///
/// Slot 0 carries the request line (method + URL), and one slot is
/// reserved for the empty terminator, so a request may carry at most
/// `MAX_HEADERS - 2` real headers.
pub const MAX_HEADERS: usize = 50;

/// Byte capacity of the fallback accumulator.
///
/// A request head that spans multiple socket reads is stitched together
/// here. A head fragment that still has not completed once this many
/// bytes are buffered is rejected as over-sized.
pub const MAX_FALLBACK_SIZE: usize = 4096;

/// Required writable padding past the valid bytes of every buffer
/// handed to [`HttpParser::consume`](crate::HttpParser::consume).
///
/// The scanner writes a two-byte fence (`\r`, `a`) just past the valid
/// region so that its forward CR scan always terminates inside the
/// allocation without per-byte bounds checks.
pub const MINIMUM_HTTP_POST_PADDING: usize = 32;

/// Read-side configuration for [`Connection`](crate::Connection).
///
/// Controls the size of the pre-allocated receive buffer and how long a
/// single socket read may stall before the connection is abandoned.
///
/// # Examples
/// ```
/// use stream_web::limits::ReadLimits;
/// use std::time::Duration;
///
/// let limits = ReadLimits {
///     buffer_size: 32 * 1024,
///     read_timeout: Duration::from_secs(5),
///     ..ReadLimits::default()
/// };
/// assert_eq!(limits.buffer_size, 32 * 1024);
/// ```
#[derive(Debug, Clone)]
pub struct ReadLimits {
    /// Usable receive-buffer size in bytes (default: `16 KB`).
    ///
    /// The allocation is `buffer_size + MINIMUM_HTTP_POST_PADDING` so
    /// the parser's fencing contract always holds.
    pub buffer_size: usize,

    /// Maximum duration to wait for a single socket read (default: `2 seconds`).
    ///
    /// If no data arrives within this time the read fails with
    /// [`std::io::ErrorKind::TimedOut`]. This is the primary mechanism
    /// for cleaning up stalled connections.
    pub read_timeout: Duration,

    #[doc(hidden)]
    #[allow(dead_code)]
    pub _priv: (),
}

impl Default for ReadLimits {
    #[inline(always)]
    fn default() -> Self {
        Self {
            buffer_size: 16 * 1024,
            read_timeout: Duration::from_secs(2),

            _priv: (),
        }
    }
}
