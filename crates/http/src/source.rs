//! Protocol-independent header lookup over HTTP/1 and HTTP/2 transactions.

use std::borrow::Cow;
use std::fmt;

use http::HeaderName;
use micro_detect::{AppProto, Direction, Transaction};

use crate::http1::{Http1Progress, Http1Transaction};
use crate::http2::{Http2State, Http2Transaction};

/// The HTTP version an extractor or registry cell serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVersion {
    Http1,
    Http2,
}

impl HttpVersion {
    pub const ALL: [HttpVersion; 2] = [HttpVersion::Http1, HttpVersion::Http2];

    pub fn app_proto(self) -> AppProto {
        match self {
            HttpVersion::Http1 => AppProto::Http1,
            HttpVersion::Http2 => AppProto::Http2,
        }
    }

    /// Earliest progress at which the headers of `direction` are final.
    pub fn header_progress(self, direction: Direction) -> u8 {
        match (self, direction) {
            (HttpVersion::Http1, _) => Http1Progress::Headers as u8,
            (HttpVersion::Http2, Direction::ToServer) => Http2State::DataClient as u8,
            (HttpVersion::Http2, Direction::ToClient) => Http2State::DataServer as u8,
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.app_proto().name())
    }
}

/// A transaction whose headers can be looked up.
#[derive(Debug, Clone, Copy)]
pub enum HeaderSource<'tx> {
    Http1(&'tx Http1Transaction),
    Http2(&'tx Http2Transaction),
}

impl<'tx> HeaderSource<'tx> {
    pub fn from_transaction(tx: &'tx dyn Transaction) -> Option<Self> {
        let any = tx.as_any();
        if let Some(tx) = any.downcast_ref::<Http1Transaction>() {
            return Some(HeaderSource::Http1(tx));
        }
        any.downcast_ref::<Http2Transaction>().map(HeaderSource::Http2)
    }

    pub fn version(&self) -> HttpVersion {
        match self {
            HeaderSource::Http1(_) => HttpVersion::Http1,
            HeaderSource::Http2(_) => HttpVersion::Http2,
        }
    }

    /// Non-empty value of `name` in `direction`.
    ///
    /// `None` when the header table of that direction is not parsed yet, the
    /// header is missing or its value is empty.
    pub fn lookup_header(&self, direction: Direction, name: &HeaderName) -> Option<Cow<'tx, [u8]>> {
        let value = match *self {
            HeaderSource::Http1(tx) => Cow::Borrowed(tx.headers(direction)?.get(name)?.as_bytes()),
            HeaderSource::Http2(tx) => tx.get_header_value(direction, name.as_str().as_bytes())?,
        };
        (!value.is_empty()).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;
    use http::header::{ACCEPT, SERVER, USER_AGENT};

    use super::*;
    use crate::Http1Limits;

    struct OtherTx;

    impl Transaction for OtherTx {
        fn app_proto(&self) -> AppProto {
            AppProto::Dns
        }

        fn progress(&self, _direction: Direction) -> u8 {
            0
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn http1_lookup() {
        let mut tx = Http1Transaction::new();
        let source = HeaderSource::Http1(&tx);
        assert_eq!(source.lookup_header(Direction::ToServer, &USER_AGENT), None);

        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nUser-Agent: curl/8.0\r\nAccept:\r\n\r\n");
        tx.parse_request(&mut buf, &Http1Limits::default()).unwrap();

        let source = HeaderSource::from_transaction(&tx).unwrap();
        assert_eq!(source.version(), HttpVersion::Http1);
        assert_eq!(source.lookup_header(Direction::ToServer, &USER_AGENT).as_deref(), Some(&b"curl/8.0"[..]));
        assert_eq!(source.lookup_header(Direction::ToServer, &ACCEPT), None);
        assert_eq!(source.lookup_header(Direction::ToClient, &SERVER), None);
    }

    #[test]
    fn http2_lookup() {
        let mut tx = Http2Transaction::new(1);
        tx.push_headers(Direction::ToServer, [("user-agent", "Mozilla/5.0"), ("accept", "")], true);

        let source = HeaderSource::from_transaction(&tx).unwrap();
        assert_eq!(source.version(), HttpVersion::Http2);
        assert_eq!(source.lookup_header(Direction::ToServer, &USER_AGENT).as_deref(), Some(&b"Mozilla/5.0"[..]));
        assert_eq!(source.lookup_header(Direction::ToServer, &ACCEPT), None);
    }

    #[test]
    fn other_protocols_have_no_headers() {
        assert!(HeaderSource::from_transaction(&OtherTx).is_none());
    }

    #[test]
    fn header_progress() {
        assert_eq!(HttpVersion::Http1.header_progress(Direction::ToClient), 2);
        assert_eq!(HttpVersion::Http2.header_progress(Direction::ToServer), 3);
        assert_eq!(HttpVersion::Http2.header_progress(Direction::ToClient), 5);
        assert_eq!(HttpVersion::Http2.to_string(), AppProto::Http2.name());
    }
}
