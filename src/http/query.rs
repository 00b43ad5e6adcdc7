//! Query-string splitting and percent-decoding.
//!
//! Splitting is zero-copy; decoding borrows when a component contains
//! no `%XX` escapes and no `+`, and allocates only when it must.
//!
//! # Examples
//! ```rust
//! use stream_web::query;
//!
//! let raw = b"name=john%20doe&age=25&debug";
//!
//! assert_eq!(query::value(raw, b"name").unwrap().as_ref(), b"john doe");
//! assert_eq!(query::value(raw, b"age").unwrap().as_ref(), b"25");
//! assert_eq!(query::value(raw, b"debug").unwrap().as_ref(), b"");
//! assert_eq!(query::value(raw, b"missing"), None);
//! ```

use memchr::memchr;
use std::borrow::Cow;

/// Iterator over raw `key=value` pairs of a query string.
///
/// Handles all the shapes a query can take: missing `=` yields an empty
/// value, a leading `=` yields an empty key, and `&&` yields an empty
/// pair. Nothing is decoded.
///
/// # Examples
/// ```rust
/// use stream_web::query;
///
/// let mut pairs = query::pairs(b"debug&name=&key=sda");
///
/// assert_eq!(pairs.next(), Some((&b"debug"[..], &b""[..])));
/// assert_eq!(pairs.next(), Some((&b"name"[..], &b""[..])));
/// assert_eq!(pairs.next(), Some((&b"key"[..], &b"sda"[..])));
/// assert_eq!(pairs.next(), None);
/// ```
pub struct Pairs<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Pairs<'a> {
    type Item = (&'a [u8], &'a [u8]);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        // Next '&' or end of string
        let end = memchr(b'&', self.rest).unwrap_or(self.rest.len());
        let segment = &self.rest[..end];
        self.rest = match end < self.rest.len() {
            true => &self.rest[end + 1..],
            false => b"",
        };

        // '=' within the current segment
        let split = memchr(b'=', segment).unwrap_or(segment.len());
        let key = &segment[..split];
        let value = match split < segment.len() {
            true => &segment[split + 1..],
            false => b"",
        };

        Some((key, value))
    }
}

/// Returns an iterator over the raw pairs of `query`.
///
/// A leading `?` is tolerated, so `?a=1` and `a=1` are equivalent.
#[inline]
pub fn pairs(query: &[u8]) -> Pairs<'_> {
    let rest = match query.first() {
        Some(b'?') => &query[1..],
        _ => query,
    };
    Pairs { rest }
}

/// Looks up `key` in the raw query string and returns its
/// percent-decoded value. The first occurrence wins.
///
/// Keys are compared after decoding, so `na%6De=x` matches `name`.
pub fn value<'a>(query: &'a [u8], key: &[u8]) -> Option<Cow<'a, [u8]>> {
    pairs(query)
        .find(|&(raw_key, _)| decode(raw_key).as_ref() == key)
        .map(|(_, raw_value)| decode(raw_value))
}

/// Percent-decodes one query component: `%XX` escapes become their
/// byte, `+` becomes space. Malformed escapes pass through verbatim
/// rather than failing the lookup.
pub fn decode(component: &[u8]) -> Cow<'_, [u8]> {
    if !component.iter().any(|&b| b == b'%' || b == b'+') {
        return Cow::Borrowed(component);
    }

    let mut decoded = Vec::with_capacity(component.len());
    let mut at = 0;
    while at < component.len() {
        match component[at] {
            b'+' => {
                decoded.push(b' ');
                at += 1;
            }
            b'%' => match escape_value(component.get(at + 1), component.get(at + 2)) {
                Some(byte) => {
                    decoded.push(byte);
                    at += 3;
                }
                None => {
                    decoded.push(b'%');
                    at += 1;
                }
            },
            byte => {
                decoded.push(byte);
                at += 1;
            }
        }
    }

    Cow::Owned(decoded)
}

#[inline(always)]
fn escape_value(hi: Option<&u8>, lo: Option<&u8>) -> Option<u8> {
    Some(hex_digit(*hi?)? << 4 | hex_digit(*lo?)?)
}

#[inline(always)]
fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
