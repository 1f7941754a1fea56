//! HTTP/2 transaction store.
//!
//! One [`Http2Transaction`] per stream. Header blocks arrive already decoded
//! (HPACK is the connection parser's concern) and are kept per direction in
//! arrival order with lowercased names. The stream state follows the frames
//! pushed into it and doubles as the transaction progress.

use std::any::Any;
use std::borrow::Cow;

use bytes::Bytes;
use micro_detect::{AppProto, Direction, Transaction};
use tracing::trace;

const JOIN_SEPARATOR: &[u8] = b", ";

/// Stream state, ordered by how far the stream has progressed.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Http2State {
    #[default]
    Idle = 0,
    Open = 1,
    Reserved = 2,
    DataClient = 3,
    HalfClosedClient = 4,
    DataServer = 5,
    HalfClosedServer = 6,
    Closed = 7,
}

/// A decoded header field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Http2Header {
    name: Bytes,
    value: Bytes,
}

impl Http2Header {
    pub fn new(name: &[u8], value: &[u8]) -> Self {
        Self { name: Bytes::from(name.to_ascii_lowercase()), value: Bytes::copy_from_slice(value) }
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

#[derive(Debug, Default)]
pub struct Http2Transaction {
    stream_id: u32,
    state: Http2State,
    request_headers: Vec<Http2Header>,
    response_headers: Vec<Http2Header>,
}

impl Http2Transaction {
    pub fn new(stream_id: u32) -> Self {
        Self { stream_id, ..Self::default() }
    }

    pub fn stream_id(&self) -> u32 {
        self.stream_id
    }

    pub fn state(&self) -> Http2State {
        self.state
    }

    pub fn headers(&self, direction: Direction) -> &[Http2Header] {
        match direction {
            Direction::ToServer => &self.request_headers,
            Direction::ToClient => &self.response_headers,
        }
    }

    /// Records a HEADERS (or CONTINUATION) block flowing in `direction`.
    pub fn push_headers<I, N, V>(&mut self, direction: Direction, fields: I, end_stream: bool)
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let list = match direction {
            Direction::ToServer => &mut self.request_headers,
            Direction::ToClient => &mut self.response_headers,
        };
        list.extend(fields.into_iter().map(|(name, value)| Http2Header::new(name.as_ref(), value.as_ref())));

        if self.state == Http2State::Idle {
            self.state = Http2State::Open;
        }
        if end_stream {
            self.end_stream(direction);
        }
        trace!(stream_id = self.stream_id, ?direction, state = ?self.state, "headers pushed");
    }

    /// Records a DATA frame flowing in `direction`.
    pub fn push_data(&mut self, direction: Direction, end_stream: bool) {
        if end_stream {
            self.end_stream(direction);
            return;
        }
        let data_state = match direction {
            Direction::ToServer => Http2State::DataClient,
            Direction::ToClient => Http2State::DataServer,
        };
        self.state = self.state.max(data_state);
    }

    fn end_stream(&mut self, direction: Direction) {
        use Http2State::{Closed, DataServer, HalfClosedClient, HalfClosedServer};

        self.state = match (self.state, direction) {
            (Closed, _) | (HalfClosedClient | DataServer, Direction::ToClient) | (HalfClosedServer, Direction::ToServer) => Closed,
            (_, Direction::ToClient) => HalfClosedServer,
            (_, Direction::ToServer) => HalfClosedClient,
        };
    }

    /// Value of header `name` in `direction`.
    ///
    /// A single occurrence is returned borrowed; several occurrences are joined
    /// with `", "` in arrival order.
    pub fn get_header_value(&self, direction: Direction, name: &[u8]) -> Option<Cow<'_, [u8]>> {
        let mut found = self.headers(direction).iter().filter(|header| header.name.eq_ignore_ascii_case(name));

        let first = found.next()?;
        let Some(second) = found.next() else {
            return Some(Cow::Borrowed(first.value()));
        };

        let mut joined = Vec::with_capacity(first.value.len() + JOIN_SEPARATOR.len() + second.value.len());
        joined.extend_from_slice(&first.value);
        for header in std::iter::once(second).chain(found) {
            joined.extend_from_slice(JOIN_SEPARATOR);
            joined.extend_from_slice(&header.value);
        }
        Some(Cow::Owned(joined))
    }
}

impl Transaction for Http2Transaction {
    fn app_proto(&self) -> AppProto {
        AppProto::Http2
    }

    /// The stream state is the progress of both directions.
    fn progress(&self, _direction: Direction) -> u8 {
        self.state as u8
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
