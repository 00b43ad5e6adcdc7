use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

// PROXY protocol v2 preamble: 12-byte signature, version/command,
// family/protocol, 16-bit address-block length, address block.
const SIGNATURE: [u8; 12] = *b"\r\n\r\n\0\r\nQUIT\n";
const HEADER_SIZE: usize = 16;

/// Sticky per-connection PROXY protocol v2 parser.
///
/// Consulted with the connection's first bytes before any HTTP
/// scanning. Data that does not open with the v2 signature passes
/// through untouched. A successful frame stores the proxied source and
/// destination addresses; a later frame overwrites them, and a frame
/// that cannot (yet) be parsed never clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyParser {
    source: Option<SocketAddr>,
    destination: Option<SocketAddr>,
}

/// What the preamble parser made of the presented bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProxyScan {
    /// No (further) preamble: HTTP starts `consumed` bytes in.
    Done { consumed: usize },
    /// A frame may still be arriving; present more bytes later.
    Incomplete,
}

impl ProxyParser {
    /// Source address carried by the most recent PROXY frame.
    #[inline(always)]
    pub const fn source(&self) -> Option<SocketAddr> {
        self.source
    }

    /// Destination address carried by the most recent PROXY frame.
    #[inline(always)]
    pub const fn destination(&self) -> Option<SocketAddr> {
        self.destination
    }

    pub(crate) fn parse(&mut self, data: &[u8]) -> ProxyScan {
        let prefix = data.len().min(SIGNATURE.len());
        if data[..prefix] != SIGNATURE[..prefix] {
            return ProxyScan::Done { consumed: 0 };
        }
        if data.len() < HEADER_SIZE {
            return ProxyScan::Incomplete;
        }

        let ver_cmd = data[12];
        let family = data[13] >> 4;
        let block_len = u16::from_be_bytes([data[14], data[15]]) as usize;

        // Only protocol version 2 exists; anything else never completes.
        if ver_cmd & 0xf0 != 0x20 {
            return ProxyScan::Incomplete;
        }
        if data.len() < HEADER_SIZE + block_len {
            return ProxyScan::Incomplete;
        }

        let block = &data[HEADER_SIZE..HEADER_SIZE + block_len];
        let addresses = match (ver_cmd & 0x0f, family) {
            // LOCAL command: health checks et al, no proxied addresses
            (0x00, _) => None,
            (0x01, 0x1) => match parse_inet(block) {
                Some(pair) => Some(pair),
                None => return ProxyScan::Incomplete,
            },
            (0x01, 0x2) => match parse_inet6(block) {
                Some(pair) => Some(pair),
                None => return ProxyScan::Incomplete,
            },
            // AF_UNSPEC / AF_UNIX: frame is consumed, addresses unknown
            (0x01, _) => None,
            _ => return ProxyScan::Incomplete,
        };

        match addresses {
            Some((source, destination)) => {
                self.source = Some(source);
                self.destination = Some(destination);
            }
            None => {
                self.source = None;
                self.destination = None;
            }
        }

        ProxyScan::Done {
            consumed: HEADER_SIZE + block_len,
        }
    }
}

fn parse_inet(block: &[u8]) -> Option<(SocketAddr, SocketAddr)> {
    match block {
        [s0, s1, s2, s3, d0, d1, d2, d3, sp0, sp1, dp0, dp1, ..] => Some((
            SocketAddr::new(
                IpAddr::V4(Ipv4Addr::new(*s0, *s1, *s2, *s3)),
                u16::from_be_bytes([*sp0, *sp1]),
            ),
            SocketAddr::new(
                IpAddr::V4(Ipv4Addr::new(*d0, *d1, *d2, *d3)),
                u16::from_be_bytes([*dp0, *dp1]),
            ),
        )),
        _ => None,
    }
}

fn parse_inet6(block: &[u8]) -> Option<(SocketAddr, SocketAddr)> {
    let source: [u8; 16] = block.get(..16)?.try_into().ok()?;
    let destination: [u8; 16] = block.get(16..32)?.try_into().ok()?;
    let source_port = u16::from_be_bytes([*block.get(32)?, *block.get(33)?]);
    let destination_port = u16::from_be_bytes([*block.get(34)?, *block.get(35)?]);

    Some((
        SocketAddr::new(IpAddr::V6(Ipv6Addr::from(source)), source_port),
        SocketAddr::new(IpAddr::V6(Ipv6Addr::from(destination)), destination_port),
    ))
}
