use crate::{
    errors::ErrorKind,
    http::{
        chunked::{self, ChunkState},
        head::{self, HeadSlots, Scan},
        proxy::ProxyParser,
        request::Request,
    },
    limits::{MAX_FALLBACK_SIZE, MINIMUM_HTTP_POST_PADDING},
};

/// What a callback wants the parser to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep parsing.
    Continue,
    /// The callback took the connection over (protocol upgrade, early
    /// close): stop immediately, no further callbacks this call.
    Detach,
}

/// Result of one [`HttpParser::consume`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every supplied byte was handled; feed the next read when it
    /// arrives.
    Continue,
    /// A callback returned [`Control::Detach`]; the parser made no
    /// further callbacks and the caller should stop feeding it.
    Detached,
    /// Unrecoverable parse failure. No recovery is possible on this
    /// connection; close the socket.
    Error(ErrorKind),
}

/// Receiver of parse events.
///
/// For every request, `on_request` is called exactly once, strictly
/// before any `on_data` for its body, which in turn strictly precedes
/// the `on_request` of a pipelined successor. Bodyless requests still
/// get one `on_data(&[], true)` so every request is closed out by
/// exactly one fin.
pub trait EventSink {
    /// A complete request head. The view borrows the receive buffer
    /// and dies with this call.
    fn on_request(&mut self, request: &mut Request<'_>) -> Control;

    /// One piece of body payload. `fin` marks the last piece; the
    /// piece is empty when a bodyless or zero-length body is being
    /// closed out, or when an empty read lands mid-body.
    fn on_data(&mut self, chunk: &[u8], fin: bool) -> Control;
}

/// How far into a message body the session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyState {
    /// Between messages (or before the first).
    Idle,
    /// Counting down a `Content-Length` body; always nonzero.
    Counted(u32),
    /// Inside a chunked-transfer body.
    Chunked(ChunkState),
}

/// Bounded accumulator for a request head that spans reads.
#[derive(Debug)]
struct Fallback {
    buf: Box<[u8]>,
    len: usize,
}

impl Fallback {
    fn new() -> Self {
        Fallback {
            buf: vec![0; MAX_FALLBACK_SIZE + MINIMUM_HTTP_POST_PADDING].into_boxed_slice(),
            len: 0,
        }
    }

    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    fn extend(&mut self, bytes: &[u8]) {
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }

    #[inline(always)]
    fn clear(&mut self) {
        self.len = 0;
    }
}

/// Streaming HTTP/1.x request parser: one instance per connection.
///
/// Feed it the raw byte chunks a socket produces, in order, via
/// [`consume`](Self::consume); it emits request heads and body pieces
/// to an [`EventSink`] and keeps only the minimum state needed to
/// resume at any byte boundary: a bounded fallback buffer for split
/// heads and a body-progress marker.
///
/// # Buffer contract
///
/// `consume` borrows the receive buffer mutably: it writes a two-byte
/// fence just past the valid bytes (which is why the buffer must
/// extend [`MINIMUM_HTTP_POST_PADDING`] bytes past them) and
/// lowercases header keys in place.
///
/// # Body framing
///
/// `get` requests never carry a body. Any other method streams either
/// a `Content-Length` countdown or, when that header is absent,
/// chunked transfer encoding. `Transfer-Encoding` itself is never
/// inspected; "non-GET without Content-Length" is taken as chunked.
#[derive(Debug)]
pub struct HttpParser {
    fallback: Fallback,
    body: BodyState,
    proxy: ProxyParser,
    slots: HeadSlots,
}

impl Default for HttpParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpParser {
    pub fn new() -> Self {
        HttpParser {
            fallback: Fallback::new(),
            body: BodyState::Idle,
            proxy: ProxyParser::default(),
            slots: HeadSlots::new(),
        }
    }

    /// The connection's sticky PROXY-preamble state: proxied source and
    /// destination addresses, once a frame has been seen.
    #[inline(always)]
    pub const fn proxy(&self) -> &ProxyParser {
        &self.proxy
    }

    /// Feeds `buf[..len]`, the next chunk the socket produced, into
    /// the session.
    ///
    /// # Panics
    ///
    /// Panics if `buf` does not extend at least
    /// [`MINIMUM_HTTP_POST_PADDING`] bytes past `len`.
    pub fn consume<S: EventSink>(&mut self, buf: &mut [u8], len: usize, sink: &mut S) -> Outcome {
        assert!(
            buf.len() >= len + MINIMUM_HTTP_POST_PADDING,
            "receive buffer lacks post padding"
        );

        let mut pos = 0;

        // A body left streaming by the previous call finishes before
        // anything else is looked at.
        match self.resume_body(buf, pos, len, sink) {
            Ok(next) => pos = next,
            Err(outcome) => return outcome,
        }

        // A split head is stitched through the fallback accumulator:
        // parse one head minimally, then hand the rest of the input
        // back to the normal path.
        if !self.fallback.is_empty() {
            let had = self.fallback.len;
            let take = (MAX_FALLBACK_SIZE - had).min(len - pos);
            self.fallback.extend(&buf[pos..pos + take]);

            let stitched = self.fallback.len;
            head::fence(&mut self.fallback.buf, stitched);
            match head::scan(&mut self.fallback.buf, stitched, &mut self.proxy, &mut self.slots) {
                Scan::Complete { consumed } => {
                    match emit_head(&self.fallback.buf[..stitched], &self.slots, sink) {
                        Ok(body) => self.body = body,
                        Err(outcome) => return outcome,
                    }

                    // Only a complete head clears the fallback; this
                    // subtraction would wrap on partial consumption.
                    debug_assert!(consumed >= had);
                    self.fallback.clear();
                    pos += consumed - had;

                    match self.resume_body(buf, pos, len, sink) {
                        Ok(next) => pos = next,
                        Err(outcome) => return outcome,
                    }
                }
                Scan::Partial => {
                    return match self.fallback.len == MAX_FALLBACK_SIZE {
                        true => Outcome::Error(ErrorKind::OversizedHead),
                        false => Outcome::Continue,
                    };
                }
                Scan::Invalid(kind) => return Outcome::Error(kind),
            }
        }

        // Normal path: full-consume heads and bodies, pipelined, until
        // the input runs dry.
        head::fence(buf, len);
        while pos < len {
            match head::scan(&mut buf[pos..], len - pos, &mut self.proxy, &mut self.slots) {
                Scan::Complete { consumed } => {
                    match emit_head(&buf[pos..pos + consumed], &self.slots, sink) {
                        Ok(body) => self.body = body,
                        Err(outcome) => return outcome,
                    }
                    pos += consumed;

                    match self.resume_body(buf, pos, len, sink) {
                        Ok(next) => pos = next,
                        Err(outcome) => return outcome,
                    }
                }
                Scan::Partial => break,
                Scan::Invalid(kind) => return Outcome::Error(kind),
            }
        }

        // Whatever did not parse waits in the fallback for the next
        // read.
        if pos < len {
            let remainder = len - pos;
            if remainder >= MAX_FALLBACK_SIZE {
                return Outcome::Error(ErrorKind::OversizedHead);
            }
            self.fallback.extend(&buf[pos..len]);
        }

        Outcome::Continue
    }

    /// Streams as much of the pending body as `buf[pos..len]` holds.
    ///
    /// `Ok(next)` hands back the position after the body (now idle);
    /// `Err(outcome)` means the call is over: the body swallowed the
    /// rest of the input, a callback detached, or decoding failed.
    fn resume_body<S: EventSink>(
        &mut self,
        buf: &[u8],
        pos: usize,
        len: usize,
        sink: &mut S,
    ) -> Result<usize, Outcome> {
        match self.body {
            BodyState::Idle => Ok(pos),

            BodyState::Counted(remaining) => {
                let available = len - pos;
                if remaining as usize >= available {
                    let fin = remaining as usize == available;
                    self.body = match fin {
                        true => BodyState::Idle,
                        false => BodyState::Counted(remaining - available as u32),
                    };
                    Err(match sink.on_data(&buf[pos..len], fin) {
                        Control::Detach => Outcome::Detached,
                        Control::Continue => Outcome::Continue,
                    })
                } else {
                    self.body = BodyState::Idle;
                    match sink.on_data(&buf[pos..pos + remaining as usize], true) {
                        Control::Detach => Err(Outcome::Detached),
                        Control::Continue => Ok(pos + remaining as usize),
                    }
                }
            }

            BodyState::Chunked(state) => {
                let mut state = state;
                let mut view = &buf[pos..len];
                loop {
                    match chunked::next_chunk(&mut state, &mut view) {
                        Ok(Some(piece)) => {
                            let fin = piece.is_empty();
                            self.body = match fin {
                                true => BodyState::Idle,
                                false => BodyState::Chunked(state),
                            };
                            if sink.on_data(piece, fin) == Control::Detach {
                                return Err(Outcome::Detached);
                            }
                            if fin {
                                return Ok(len - view.len());
                            }
                        }
                        Ok(None) => {
                            self.body = BodyState::Chunked(state);
                            return Err(Outcome::Continue);
                        }
                        Err(kind) => {
                            self.body = BodyState::Chunked(state);
                            return Err(Outcome::Error(kind));
                        }
                    }
                }
            }
        }
    }
}

/// Carves the request view, announces it, and decides how the body
/// will stream. Bodyless requests (GET, `Content-Length: 0`) are
/// closed out with their empty fin right here, in both parse modes.
fn emit_head<S: EventSink>(
    region: &[u8],
    slots: &HeadSlots,
    sink: &mut S,
) -> Result<BodyState, Outcome> {
    let mut request = Request::carve(region, slots);
    if sink.on_request(&mut request) == Control::Detach {
        return Err(Outcome::Detached);
    }

    if request.method() == b"get" {
        return close_out(sink);
    }
    match request.header(b"content-length") {
        Some(value) => match parse_content_length(value) {
            Ok(0) => close_out(sink),
            Ok(total) => Ok(BodyState::Counted(total)),
            Err(kind) => Err(Outcome::Error(kind)),
        },
        // Transfer-Encoding is deliberately not consulted.
        None => Ok(BodyState::Chunked(ChunkState::initial())),
    }
}

// Empty fin chunk for a request that has no body to stream.
#[inline(always)]
fn close_out<S: EventSink>(sink: &mut S) -> Result<BodyState, Outcome> {
    match sink.on_data(&[], true) {
        Control::Detach => Err(Outcome::Detached),
        Control::Continue => Ok(BodyState::Idle),
    }
}

fn parse_content_length(value: &[u8]) -> Result<u32, ErrorKind> {
    if value.is_empty() {
        return Err(ErrorKind::InvalidContentLength);
    }

    let mut total: u32 = 0;
    for &byte in value {
        if !byte.is_ascii_digit() {
            return Err(ErrorKind::InvalidContentLength);
        }
        total = total
            .checked_mul(10)
            .and_then(|t| t.checked_add((byte - b'0') as u32))
            .ok_or(ErrorKind::InvalidContentLength)?;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::*;

    #[test]
    fn simple_get() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        let outcome = feed(&mut parser, b"GET /a HTTP/1.1\r\nHost: x\r\n\r\n", &mut sink);

        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(
            sink.events,
            [
                Event::request("get", "/a", "", false, &[("host", "x")]),
                Event::data("", true),
            ]
        );
        assert!(parser.idle());
    }

    #[test]
    fn post_split_across_reads() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        let outcome = feed(
            &mut parser,
            b"POST /p HTTP/1.1\r\nContent-Length: 5\r\n\r\nhe",
            &mut sink,
        );
        assert_eq!(outcome, Outcome::Continue);

        let outcome = feed(&mut parser, b"llo", &mut sink);
        assert_eq!(outcome, Outcome::Continue);

        assert_eq!(
            sink.events,
            [
                Event::request("post", "/p", "", false, &[("content-length", "5")]),
                Event::data("he", false),
                Event::data("llo", true),
            ]
        );
        assert!(parser.idle());
    }

    #[test]
    fn pipelined_gets() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        let outcome = feed(
            &mut parser,
            b"GET /1 HTTP/1.1\r\n\r\nGET /2 HTTP/1.1\r\n\r\n",
            &mut sink,
        );

        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(
            sink.events,
            [
                Event::request("get", "/1", "", false, &[]),
                Event::data("", true),
                Event::request("get", "/2", "", false, &[]),
                Event::data("", true),
            ]
        );
        assert!(parser.idle());
    }

    #[test]
    fn ancient_http_detection() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        feed(&mut parser, b"GET / HTTP/1.0\r\n\r\n", &mut sink);

        assert_eq!(
            sink.events,
            [Event::request("get", "/", "", true, &[]), Event::data("", true)]
        );
    }

    #[test]
    fn malformed_cr_without_lf() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        let outcome = feed(&mut parser, b"GET /\rx\r\n\r\n", &mut sink);

        assert_eq!(outcome, Outcome::Error(ErrorKind::MalformedHead));
        assert!(sink.events.is_empty());
    }

    #[test]
    fn chunked_post() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        let outcome = feed(
            &mut parser,
            b"POST /x HTTP/1.1\r\n\r\n5\r\nhello\r\n0\r\n\r\n",
            &mut sink,
        );

        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(
            sink.events,
            [
                Event::request("post", "/x", "", false, &[]),
                Event::data("hello", false),
                Event::data("", true),
            ]
        );
        assert!(parser.idle());
    }

    #[test]
    fn chunked_body_resumes_across_reads() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        feed(&mut parser, b"POST /x HTTP/1.1\r\n\r\n5\r\nhe", &mut sink);
        feed(&mut parser, b"llo\r", &mut sink);
        feed(&mut parser, b"\n0\r\n\r\nGET /next HTTP/1.1\r\n\r\n", &mut sink);

        assert_eq!(
            sink.events,
            [
                Event::request("post", "/x", "", false, &[]),
                Event::data("he", false),
                Event::data("llo", false),
                Event::data("", true),
                Event::request("get", "/next", "", false, &[]),
                Event::data("", true),
            ]
        );
        assert!(parser.idle());
    }

    #[test]
    fn counted_body_across_three_reads() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        feed(
            &mut parser,
            b"POST /u HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc",
            &mut sink,
        );
        feed(&mut parser, b"defg", &mut sink);
        feed(&mut parser, b"hij", &mut sink);

        assert_eq!(
            sink.events[1..],
            [
                Event::data("abc", false),
                Event::data("defg", false),
                Event::data("hij", true),
            ]
        );
        assert!(parser.idle());
    }

    #[test]
    fn pipelined_post_then_get_in_one_read() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        let outcome = feed(
            &mut parser,
            b"POST /a HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcGET /b HTTP/1.1\r\n\r\n",
            &mut sink,
        );

        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(
            sink.events,
            [
                Event::request("post", "/a", "", false, &[("content-length", "3")]),
                Event::data("abc", true),
                Event::request("get", "/b", "", false, &[]),
                Event::data("", true),
            ]
        );
    }

    #[test]
    fn byte_by_byte_equals_whole() {
        let inputs: [&[u8]; 4] = [
            b"GET /a?q=1 HTTP/1.1\r\nHost: x\r\nAccept: */*\r\n\r\n",
            b"POST /p HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello",
            b"POST /c HTTP/1.1\r\n\r\n3\r\nabc\r\n0\r\n\r\n",
            b"GET /1 HTTP/1.1\r\n\r\nGET /2 HTTP/1.1\r\n\r\n",
        ];

        for input in inputs {
            let mut whole_parser = HttpParser::new();
            let mut whole = Recorder::default();
            assert_eq!(feed(&mut whole_parser, input, &mut whole), Outcome::Continue);

            let mut stepped_parser = HttpParser::new();
            let mut stepped = Recorder::default();
            for byte in input {
                let outcome = feed(&mut stepped_parser, &[*byte], &mut stepped);
                assert_eq!(outcome, Outcome::Continue);
            }

            // body piece granularity follows the reads; heads, bytes
            // and fin placement may not
            assert_eq!(
                coalesced(&whole.events),
                coalesced(&stepped.events),
                "input {:?}",
                str_op(input)
            );
        }
    }

    #[test]
    fn empty_read_mid_body_emits_empty_piece() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        feed(
            &mut parser,
            b"POST /p HTTP/1.1\r\nContent-Length: 5\r\n\r\nhe",
            &mut sink,
        );

        let outcome = feed(&mut parser, b"", &mut sink);

        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(sink.events.last(), Some(&Event::data("", false)));

        feed(&mut parser, b"llo", &mut sink);
        assert_eq!(
            sink.events[1..],
            [
                Event::data("he", false),
                Event::data("", false),
                Event::data("llo", true),
            ]
        );
        assert!(parser.idle());
    }

    #[test]
    fn empty_consume_is_a_noop_when_idle() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        feed(&mut parser, b"GET / HTTP/1.1\r\n\r\n", &mut sink);
        let before = sink.events.len();

        let outcome = feed(&mut parser, b"", &mut sink);

        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(sink.events.len(), before);
    }

    #[test]
    fn content_length_zero_still_fins() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        let outcome = feed(
            &mut parser,
            b"POST /z HTTP/1.1\r\nContent-Length: 0\r\n\r\nGET /after HTTP/1.1\r\n\r\n",
            &mut sink,
        );

        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(
            sink.events,
            [
                Event::request("post", "/z", "", false, &[("content-length", "0")]),
                Event::data("", true),
                Event::request("get", "/after", "", false, &[]),
                Event::data("", true),
            ]
        );
    }

    #[test]
    fn content_length_validation() {
        let cases: [&[u8]; 3] = [
            b"POST / HTTP/1.1\r\nContent-Length: 12x\r\n\r\n",
            b"POST / HTTP/1.1\r\nContent-Length: 99999999999999999999\r\n\r\n",
            b"POST / HTTP/1.1\r\nContent-Length: -1\r\n\r\n",
        ];

        for input in cases {
            let mut parser = HttpParser::new();
            let mut sink = Recorder::default();

            let outcome = feed(&mut parser, input, &mut sink);
            assert_eq!(
                outcome,
                Outcome::Error(ErrorKind::InvalidContentLength),
                "input {:?}",
                str_op(input)
            );
            // the head itself was announced before the body decision
            assert_eq!(sink.events.len(), 1, "input {:?}", str_op(input));
        }
    }

    #[test]
    fn head_at_exactly_fallback_capacity() {
        // 27 fixed bytes; pad the header value so the whole head is
        // exactly MAX_FALLBACK_SIZE bytes.
        let mut head = String::from("GET / HTTP/1.1\r\nx-pad: ");
        head.push_str(&"a".repeat(MAX_FALLBACK_SIZE - head.len() - 4));
        head.push_str("\r\n\r\n");
        assert_eq!(head.len(), MAX_FALLBACK_SIZE);

        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        assert_eq!(feed(&mut parser, &head.as_bytes()[..100], &mut sink), Outcome::Continue);
        assert!(sink.events.is_empty());

        let outcome = feed(&mut parser, &head.as_bytes()[100..], &mut sink);
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(sink.events.len(), 2);
        assert!(parser.idle());
    }

    #[test]
    fn head_one_byte_over_fallback_capacity() {
        let mut head = String::from("GET / HTTP/1.1\r\nx-pad: ");
        head.push_str(&"a".repeat(MAX_FALLBACK_SIZE - head.len() - 3));
        head.push_str("\r\n\r\n");
        assert_eq!(head.len(), MAX_FALLBACK_SIZE + 1);

        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        assert_eq!(feed(&mut parser, &head.as_bytes()[..100], &mut sink), Outcome::Continue);
        let outcome = feed(&mut parser, &head.as_bytes()[100..], &mut sink);

        assert_eq!(outcome, Outcome::Error(ErrorKind::OversizedHead));
        assert!(sink.events.is_empty());
    }

    #[test]
    fn oversized_single_read_remainder() {
        // An incomplete head as large as the fallback itself cannot be
        // stashed.
        let mut input = String::from("GET / HTTP/1.1\r\nx-pad: ");
        input.push_str(&"a".repeat(MAX_FALLBACK_SIZE));

        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        let outcome = feed(&mut parser, input.as_bytes(), &mut sink);
        assert_eq!(outcome, Outcome::Error(ErrorKind::OversizedHead));
    }

    #[test]
    fn detach_on_request_stops_everything() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();
        sink.detach_on_request = true;

        let outcome = feed(
            &mut parser,
            b"GET /up HTTP/1.1\r\n\r\nGET /never HTTP/1.1\r\n\r\n",
            &mut sink,
        );

        assert_eq!(outcome, Outcome::Detached);
        // only the first head was announced, nothing after it
        assert_eq!(sink.events.len(), 1);
    }

    #[test]
    fn detach_on_data_stops_everything() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();
        sink.detach_on_data = true;

        let outcome = feed(
            &mut parser,
            b"POST /a HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcGET /b HTTP/1.1\r\n\r\n",
            &mut sink,
        );

        assert_eq!(outcome, Outcome::Detached);
        assert_eq!(sink.events.len(), 2);
    }

    #[test]
    fn proxy_preamble_then_request() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        let mut input = proxy_v2_frame([192, 0, 2, 1], 40000, [198, 51, 100, 7], 443);
        input.extend_from_slice(b"GET /via-proxy HTTP/1.1\r\n\r\n");

        let outcome = feed(&mut parser, &input, &mut sink);

        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(
            sink.events,
            [
                Event::request("get", "/via-proxy", "", false, &[]),
                Event::data("", true),
            ]
        );
        assert_eq!(
            parser.proxy().source(),
            Some("192.0.2.1:40000".parse().unwrap())
        );
    }

    #[test]
    fn proxy_preamble_split_across_reads() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        let mut input = proxy_v2_frame([192, 0, 2, 9], 1234, [198, 51, 100, 7], 80);
        input.extend_from_slice(b"GET /late HTTP/1.1\r\n\r\n");

        for piece in input.chunks(7) {
            assert_eq!(feed(&mut parser, piece, &mut sink), Outcome::Continue);
        }

        assert_eq!(
            sink.events,
            [
                Event::request("get", "/late", "", false, &[]),
                Event::data("", true),
            ]
        );
        assert_eq!(
            parser.proxy().source(),
            Some("192.0.2.9:1234".parse().unwrap())
        );
    }

    #[test]
    fn query_reaches_the_sink() {
        let mut parser = HttpParser::new();
        let mut sink = Recorder::default();

        feed(&mut parser, b"GET /s?a=1&b=two HTTP/1.1\r\n\r\n", &mut sink);

        assert_eq!(
            sink.events[0],
            Event::request("get", "/s", "a=1&b=two", false, &[])
        );
    }

    impl HttpParser {
        fn idle(&self) -> bool {
            self.body == BodyState::Idle && self.fallback.is_empty()
        }
    }
}
