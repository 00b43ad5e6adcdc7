use crate::errors::ErrorKind;
use memchr::memchr;

/// Resumable position inside a chunked-transfer body.
///
/// The decoder is a pull-style state machine: it can stop after any
/// byte (a chunk-size line split across two socket reads, a payload
/// delivered in ten pieces) and continue in the next call with the
/// state carried inside the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChunkState {
    /// Accumulating hex digits of a chunk-size line.
    Size { value: u32, any: bool },
    /// Skipping a chunk extension up to the CR of the size line.
    Ext { value: u32 },
    /// Expecting the LF that ends the size line.
    SizeLf { value: u32 },
    /// Inside a chunk payload.
    Data { remaining: u32 },
    /// Expecting the CR after a chunk payload.
    DataCr,
    /// Expecting the LF after a chunk payload.
    DataLf,
    /// Zero-size chunk seen, expecting the CR of the final blank line.
    LastCr,
    /// Expecting the LF of the final blank line.
    LastLf,
    /// Body complete.
    Done,
}

impl ChunkState {
    #[inline(always)]
    pub(crate) const fn initial() -> Self {
        ChunkState::Size { value: 0, any: false }
    }
}

// Takes one byte off the view. `Ok(None)` means the byte has not
// arrived yet; a present wrong byte is the error.
macro_rules! take_byte {
    ($data:ident == $wanted:expr) => {{
        let Some((&byte, rest)) = $data.split_first() else {
            return Ok(None);
        };
        if byte != $wanted {
            return Err(ErrorKind::InvalidChunk);
        }
        *$data = rest;
    }};
}

/// Decodes the next payload piece out of `data`, advancing the view
/// past everything consumed.
///
/// Returns `Ok(Some(piece))` for each decoded payload piece; the final
/// empty piece marks the body terminator and leaves the state at
/// [`ChunkState::Done`]. Returns `Ok(None)` when `data` ran out before
/// another piece was available. Trailer sections are not supported: any
/// byte other than CRLF after the zero-size chunk is an error.
pub(crate) fn next_chunk<'a>(
    state: &mut ChunkState,
    data: &mut &'a [u8],
) -> Result<Option<&'a [u8]>, ErrorKind> {
    loop {
        match *state {
            ChunkState::Size { value, any } => {
                let Some((&byte, rest)) = data.split_first() else {
                    return Ok(None);
                };
                match byte {
                    b';' | b'\r' if any => {
                        *data = rest;
                        *state = match byte {
                            b';' => ChunkState::Ext { value },
                            _ => ChunkState::SizeLf { value },
                        };
                    }
                    _ => {
                        let digit = hex_value(byte).ok_or(ErrorKind::InvalidChunk)?;
                        let value = value
                            .checked_mul(16)
                            .and_then(|v| v.checked_add(digit as u32))
                            .ok_or(ErrorKind::InvalidChunk)?;
                        *data = rest;
                        *state = ChunkState::Size { value, any: true };
                    }
                }
            }
            ChunkState::Ext { value } => match memchr(b'\r', data) {
                Some(pos) => {
                    *data = &data[pos + 1..];
                    *state = ChunkState::SizeLf { value };
                }
                None => {
                    *data = &[];
                    return Ok(None);
                }
            },
            ChunkState::SizeLf { value } => {
                take_byte!(data == b'\n');
                *state = match value {
                    0 => ChunkState::LastCr,
                    _ => ChunkState::Data { remaining: value },
                };
            }
            ChunkState::Data { remaining } => {
                if data.is_empty() {
                    return Ok(None);
                }
                let take = (remaining as usize).min(data.len());
                let (piece, rest) = data.split_at(take);
                *data = rest;
                *state = match remaining - take as u32 {
                    0 => ChunkState::DataCr,
                    left => ChunkState::Data { remaining: left },
                };
                return Ok(Some(piece));
            }
            ChunkState::DataCr => {
                take_byte!(data == b'\r');
                *state = ChunkState::DataLf;
            }
            ChunkState::DataLf => {
                take_byte!(data == b'\n');
                *state = ChunkState::initial();
            }
            ChunkState::LastCr => {
                take_byte!(data == b'\r');
                *state = ChunkState::LastLf;
            }
            ChunkState::LastLf => {
                take_byte!(data == b'\n');
                *state = ChunkState::Done;
                return Ok(Some(&[]));
            }
            ChunkState::Done => return Ok(None),
        }
    }
}

#[inline(always)]
fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
