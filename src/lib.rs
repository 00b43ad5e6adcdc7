//! stream_web - Streaming, zero-copy HTTP/1.x request parser for
//! high-performance servers
//!
//! A push-driven parser that turns the arbitrary byte chunks a
//! non-blocking socket produces into a clean sequence of request
//! events: one head per request, then its body in pieces, then the
//! next pipelined request. Between calls it keeps only a bounded
//! fallback buffer for heads split across reads and a body-progress
//! marker.
//!
//! # Features
//!
//! ## 🚀 Performance & Memory
//! - **Zero-copy** - every request view borrows the receive buffer;
//!   no per-request allocation.
//! - **Fenced scanning** - a two-byte sentinel past the valid region
//!   removes the inner-loop bounds checks from header scanning.
//! - **Bloom-filtered header lookup** - definite misses answered
//!   without scanning the header array.
//!
//! ## 🔒 Adversarial-input safety
//! - **Bounded buffering** - an incomplete head never accumulates more
//!   than [`limits::MAX_FALLBACK_SIZE`] bytes.
//! - **Validated framing** - `Content-Length` is digit-checked with
//!   overflow detection; hostile chunk sizes are rejected.
//! - **Hard-error discipline** - one [`Outcome::Error`] per broken
//!   connection, no callbacks after it.
//!
//! ## 🌐 Protocol
//! - **HTTP/1.1 and HTTP/1.0** request heads, keys canonicalised to
//!   lowercase in place.
//! - **Bodies** via `Content-Length` countdown or chunked transfer
//!   decoding, resumable at any byte boundary.
//! - **Pipelining** - back-to-back requests in one read are dispatched
//!   in order.
//! - **PROXY protocol v2** preambles, sticky per connection.
//!
//! # Quick Start
//!
//! ```rust
//! use stream_web::{Control, EventSink, HttpParser, Outcome, Request};
//! use stream_web::limits::MINIMUM_HTTP_POST_PADDING;
//!
//! struct Printer;
//!
//! impl EventSink for Printer {
//!     fn on_request(&mut self, req: &mut Request<'_>) -> Control {
//!         assert_eq!(req.method(), b"get");
//!         assert_eq!(req.url(), b"/hello");
//!         Control::Continue
//!     }
//!
//!     fn on_data(&mut self, chunk: &[u8], fin: bool) -> Control {
//!         assert!(chunk.is_empty() && fin);
//!         Control::Continue
//!     }
//! }
//!
//! let input = b"GET /hello HTTP/1.1\r\nHost: x\r\n\r\n";
//! let mut buf = input.to_vec();
//! buf.resize(input.len() + MINIMUM_HTTP_POST_PADDING, 0);
//!
//! let mut parser = HttpParser::new();
//! let outcome = parser.consume(&mut buf, input.len(), &mut Printer);
//! assert_eq!(outcome, Outcome::Continue);
//! ```
//!
//! For feeding a live socket, [`Connection`] owns a correctly padded
//! receive buffer and drives the parser from any [`tokio`] `AsyncRead`.
pub(crate) mod http {
    pub(crate) mod bloom;
    pub(crate) mod chunked;
    pub(crate) mod head;
    pub(crate) mod parser;
    pub(crate) mod proxy;
    pub mod query;
    pub(crate) mod request;
}
pub(crate) mod server {
    pub(crate) mod connection;
}
pub(crate) mod errors;
pub mod limits;

pub use crate::{
    errors::ErrorKind,
    http::{
        parser::{Control, EventSink, HttpParser, Outcome},
        proxy::ProxyParser,
        query,
        request::{Header, Request},
    },
    server::connection::Connection,
};
