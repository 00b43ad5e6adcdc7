use std::{error, fmt, io};

/// Unrecoverable parse failures surfaced through
/// [`Outcome::Error`](crate::Outcome::Error).
///
/// There is no recovery within a connection after one of these: the
/// session state is poisoned in an unspecified way and the application
/// is expected to close the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A carriage return inside the valid region was followed by a byte
    /// other than line feed, or a header line violated the grammar.
    MalformedHead,
    /// The request head needs more slots than the fixed array provides
    /// (request line plus 48 headers).
    TooManyHeaders,
    /// An incomplete head fragment outgrew the fallback accumulator.
    OversizedHead,
    /// A `Content-Length` value contained a non-digit or overflowed the
    /// streaming counter.
    InvalidContentLength,
    /// The chunked-transfer decoder met a byte that contradicts the
    /// chunk grammar, or a chunk size overflowed.
    InvalidChunk,
}

impl ErrorKind {
    #[inline]
    const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedHead => "malformed request head",
            ErrorKind::TooManyHeaders => "too many headers",
            ErrorKind::OversizedHead => "request head too large",
            ErrorKind::InvalidContentLength => "invalid content-length",
            ErrorKind::InvalidChunk => "invalid chunked encoding",
        }
    }
}

impl error::Error for ErrorKind {}
impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ErrorKind> for io::Error {
    fn from(err: ErrorKind) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}
