use crate::{
    http::{bloom::BloomFilter, head::HeadSlots, query},
    limits::MAX_HEADERS,
};
use memchr::memchr;
use std::borrow::Cow;

/// One parsed header: key and value views into the receive buffer.
///
/// Keys are always lowercase; the scanner canonicalises them in place
/// while carving the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub key: &'a [u8],
    pub value: &'a [u8],
}

impl Header<'_> {
    const EMPTY: Header<'static> = Header { key: b"", value: b"" };
}

/// Zero-copy view of one parsed request head.
///
/// Every accessor returns a reference into the receive buffer the head
/// was parsed from; nothing is copied and nothing is allocated. The
/// view is only valid inside the dispatch callback that receives it;
/// an application that needs data past that point copies it out.
///
/// Header keys and the method are observable in lowercase form only
/// (see [`Request::method`]); lookups must pass lowercase names.
#[derive(Debug)]
pub struct Request<'a> {
    headers: [Header<'a>; MAX_HEADERS],
    count: usize,
    ancient_http: bool,
    query_separator: usize,
    did_yield: bool,
    bloom: BloomFilter,
    parameters: &'a [&'a [u8]],
}

impl<'a> Request<'a> {
    /// Builds the view over a freshly scanned region. Slot 0 still
    /// carries the raw request line; the version suffix is trimmed and
    /// classified here.
    pub(crate) fn carve(region: &'a [u8], slots: &HeadSlots) -> Self {
        let mut headers = [Header::EMPTY; MAX_HEADERS];
        for (header, raw) in headers.iter_mut().zip(&slots.slot[..slots.len]) {
            header.key = &region[raw.key_start..raw.key_end];
            header.value = &region[raw.value_start..raw.value_end];
        }

        // The last byte of ` HTTP/1.x` decides the vintage; then the
        // nine-byte suffix comes off the URL, saturating for
        // pathologically short request lines.
        let line = headers[0].value;
        let ancient_http = line.last() == Some(&b'0');
        let url = &line[..line.len().saturating_sub(9)];
        headers[0].value = url;

        let query_separator = memchr(b'?', url).unwrap_or(url.len());

        let mut bloom = BloomFilter::default();
        for header in headers[1..slots.len].iter().take_while(|h| !h.key.is_empty()) {
            bloom.add(header.key);
        }

        Request {
            headers,
            count: slots.len,
            ancient_http,
            query_separator,
            did_yield: false,
            bloom,
            parameters: &[],
        }
    }

    /// The request method, lowercased (`get`, `post`, ...).
    #[inline(always)]
    pub fn method(&self) -> &'a [u8] {
        self.headers[0].key
    }

    /// The URL up to (not including) the `?`.
    #[inline(always)]
    pub fn url(&self) -> &'a [u8] {
        &self.headers[0].value[..self.query_separator]
    }

    /// The raw query string after the `?`, still encoded; empty when
    /// the request line carries none.
    #[inline(always)]
    pub fn query(&self) -> &'a [u8] {
        let line = self.headers[0].value;
        match self.query_separator < line.len() {
            true => &line[self.query_separator + 1..],
            false => b"",
        }
    }

    /// The percent-decoded value of one query parameter.
    #[inline(always)]
    pub fn query_value(&self, key: &[u8]) -> Option<Cow<'a, [u8]>> {
        query::value(self.query(), key)
    }

    /// Returns the first header with this exact lowercase name.
    ///
    /// The bloom filter over the head's keys answers definite misses
    /// without scanning the slot array.
    #[inline]
    pub fn header(&self, lowercased_name: &[u8]) -> Option<&'a [u8]> {
        if !self.bloom.might_have(lowercased_name) {
            return None;
        }
        self.iter_slots()
            .find(|h| h.key == lowercased_name)
            .map(|h| h.value)
    }

    /// The i-th route parameter, set by the router via
    /// [`set_parameters`](Self::set_parameters).
    #[inline(always)]
    pub fn parameter(&self, index: usize) -> Option<&'a [u8]> {
        self.parameters.get(index).copied()
    }

    /// Installs the route-parameter views for this dispatch.
    #[inline(always)]
    pub fn set_parameters(&mut self, parameters: &'a [&'a [u8]]) {
        self.parameters = parameters;
    }

    /// True iff the request line announced HTTP/1.0.
    #[inline(always)]
    pub const fn is_ancient(&self) -> bool {
        self.ancient_http
    }

    /// Whether the handler declined this route.
    #[inline(always)]
    pub const fn yielded(&self) -> bool {
        self.did_yield
    }

    /// Marks the request as declined so an outer router can try the
    /// next handler.
    #[inline(always)]
    pub fn set_yield(&mut self, yielded: bool) {
        self.did_yield = yielded;
    }

    /// Iterates the headers as `(key, value)` pairs, request line
    /// excluded, stopping at the first empty key.
    #[inline]
    pub fn headers(&self) -> impl Iterator<Item = (&'a [u8], &'a [u8])> + '_ {
        self.iter_slots().map(|h| (h.key, h.value))
    }

    #[inline(always)]
    fn iter_slots(&self) -> impl Iterator<Item = &Header<'a>> + '_ {
        self.headers[1..self.count]
            .iter()
            .take_while(|h| !h.key.is_empty())
    }
}
