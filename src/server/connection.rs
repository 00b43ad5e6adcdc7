use crate::{
    http::parser::{EventSink, HttpParser, Outcome},
    limits::{ReadLimits, MINIMUM_HTTP_POST_PADDING},
};
use std::io;
use tokio::{io::AsyncReadExt, time::sleep};

/// Owns one connection's receive buffer and parser, and pumps bytes
/// from a socket into an [`EventSink`].
///
/// The buffer is allocated once, with the parser's required post
/// padding, and reused for every read. The driver itself writes
/// nothing back and applies no connection-lifetime policy; it stops at
/// EOF, on detach, on a read timeout, or on a parse error.
///
/// # Examples
/// ```no_run
/// use stream_web::{limits::ReadLimits, Connection, Control, EventSink, Request};
/// use tokio::net::TcpListener;
///
/// struct Logger;
///
/// impl EventSink for Logger {
///     fn on_request(&mut self, req: &mut Request<'_>) -> Control {
///         println!("{}", String::from_utf8_lossy(req.url()));
///         Control::Continue
///     }
///
///     fn on_data(&mut self, _: &[u8], _: bool) -> Control {
///         Control::Continue
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
///     loop {
///         let (mut stream, _) = listener.accept().await.unwrap();
///         tokio::spawn(async move {
///             let mut conn = Connection::new(ReadLimits::default());
///             let _ = conn.drive(&mut stream, &mut Logger).await;
///         });
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Connection {
    parser: HttpParser,
    buffer: Box<[u8]>,
    limits: ReadLimits,
}

impl Connection {
    pub fn new(limits: ReadLimits) -> Self {
        let buffer = vec![0; limits.buffer_size + MINIMUM_HTTP_POST_PADDING].into_boxed_slice();

        Connection {
            parser: HttpParser::new(),
            buffer,
            limits,
        }
    }

    /// The connection's parser, e.g. for the PROXY-preamble addresses.
    #[inline(always)]
    pub const fn parser(&self) -> &HttpParser {
        &self.parser
    }

    /// Reads from `io` until EOF, detach, timeout, or a parse error,
    /// feeding everything through the parser.
    ///
    /// Returns `Ok(())` on a clean end (EOF or a callback detaching);
    /// parse failures surface as [`io::ErrorKind::InvalidData`], a
    /// stalled read as [`io::ErrorKind::TimedOut`].
    pub async fn drive<R, S>(&mut self, io: &mut R, sink: &mut S) -> Result<(), io::Error>
    where
        R: tokio::io::AsyncRead + Unpin,
        S: EventSink,
    {
        loop {
            let len = self.fill_buffer(io).await?;
            if len == 0 {
                return Ok(());
            }

            match self.parser.consume(&mut self.buffer, len, sink) {
                Outcome::Continue => {}
                Outcome::Detached => return Ok(()),
                Outcome::Error(kind) => return Err(kind.into()),
            }
        }
    }

    #[inline]
    async fn fill_buffer<R>(&mut self, io: &mut R) -> Result<usize, io::Error>
    where
        R: tokio::io::AsyncRead + Unpin,
    {
        let readable = self.buffer.len() - MINIMUM_HTTP_POST_PADDING;

        tokio::select! {
            biased;

            read_result = io.read(&mut self.buffer[..readable]) => read_result,
            _ = sleep(self.limits.read_timeout) => {
                Err(io::Error::new(io::ErrorKind::TimedOut, "read timeout"))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::*;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    fn small_limits() -> ReadLimits {
        ReadLimits {
            buffer_size: 256,
            read_timeout: Duration::from_millis(200),
            ..ReadLimits::default()
        }
    }

    #[tokio::test]
    async fn serves_requests_end_to_end() {
        let (mut client, mut server) = tokio::io::duplex(256);

        let driver = tokio::spawn(async move {
            let mut conn = Connection::new(small_limits());
            let mut sink = Recorder::default();
            conn.drive(&mut server, &mut sink).await.map(|_| sink.events)
        });

        client
            .write_all(b"POST /p HTTP/1.1\r\nContent-Length: 5\r\n\r\nhe")
            .await
            .unwrap();
        client.write_all(b"llo").await.unwrap();
        client.write_all(b"GET /2 HTTP/1.1\r\n\r\n").await.unwrap();
        drop(client); // EOF ends the drive loop

        let events = driver.await.unwrap().unwrap();
        assert_eq!(
            coalesced(&events),
            [
                Event::request("post", "/p", "", false, &[("content-length", "5")]),
                Event::data("hello", true),
                Event::request("get", "/2", "", false, &[]),
                Event::data("", true),
            ]
        );
    }

    #[tokio::test]
    async fn parse_error_surfaces_as_invalid_data() {
        let (mut client, mut server) = tokio::io::duplex(64);
        let mut conn = Connection::new(small_limits());
        let mut sink = Recorder::default();

        client.write_all(b"GET /\rx\r\n\r\n").await.unwrap();
        drop(client);

        let err = conn.drive(&mut server, &mut sink).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(sink.events.is_empty());
    }

    #[tokio::test]
    async fn detach_ends_the_drive_cleanly() {
        let (mut client, mut server) = tokio::io::duplex(64);
        let mut conn = Connection::new(small_limits());
        let mut sink = Recorder::default();
        sink.detach_on_request = true;

        client
            .write_all(b"GET /upgrade HTTP/1.1\r\n\r\n")
            .await
            .unwrap();

        conn.drive(&mut server, &mut sink).await.unwrap();
        assert_eq!(sink.events.len(), 1);
    }

    #[tokio::test]
    async fn stalled_read_times_out() {
        let (client, mut server) = tokio::io::duplex(64);
        let mut conn = Connection::new(small_limits());
        let mut sink = Recorder::default();

        // keep the writer alive so no EOF arrives
        let err = conn.drive(&mut server, &mut sink).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        drop(client);
    }
}
