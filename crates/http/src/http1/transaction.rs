use std::any::Any;

use bytes::BytesMut;
use http::header::AsHeaderName;
use http::{HeaderMap, HeaderValue};
use micro_detect::{AppProto, Direction, Transaction};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::config::Http1Limits;
use crate::http1::{RequestHead, RequestHeadDecoder, ResponseHead, ResponseHeadDecoder};
use crate::ParseError;

/// Parser progress of one side of an HTTP/1 transaction.
///
/// `Headers` is reached once the whole head of the message is parsed.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Http1Progress {
    #[default]
    NotStarted = 0,
    Line = 1,
    Headers = 2,
    Body = 3,
    Trailer = 4,
    Complete = 5,
}

/// One request/response exchange on an HTTP/1 connection.
///
/// Header tables are absent until the corresponding head has been parsed.
#[derive(Debug, Default)]
pub struct Http1Transaction {
    request: Option<RequestHead>,
    response: Option<ResponseHead>,
    request_progress: Http1Progress,
    response_progress: Http1Progress,
}

impl Http1Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) -> Option<&RequestHead> {
        self.request.as_ref()
    }

    pub fn response(&self) -> Option<&ResponseHead> {
        self.response.as_ref()
    }

    pub fn request_headers(&self) -> Option<&HeaderMap> {
        self.request.as_ref().map(RequestHead::headers)
    }

    pub fn response_headers(&self) -> Option<&HeaderMap> {
        self.response.as_ref().map(ResponseHead::headers)
    }

    /// The header table of the message flowing in `direction`.
    pub fn headers(&self, direction: Direction) -> Option<&HeaderMap> {
        match direction {
            Direction::ToServer => self.request_headers(),
            Direction::ToClient => self.response_headers(),
        }
    }

    pub fn request_header<K: AsHeaderName>(&self, name: K) -> Option<&HeaderValue> {
        self.request_headers()?.get(name)
    }

    pub fn response_header<K: AsHeaderName>(&self, name: K) -> Option<&HeaderValue> {
        self.response_headers()?.get(name)
    }

    pub fn request_progress(&self) -> Http1Progress {
        self.request_progress
    }

    pub fn response_progress(&self) -> Http1Progress {
        self.response_progress
    }

    pub fn set_request_head(&mut self, head: RequestHead) {
        self.request = Some(head);
        self.advance_request(Http1Progress::Headers);
    }

    pub fn set_response_head(&mut self, head: ResponseHead) {
        self.response = Some(head);
        self.advance_response(Http1Progress::Headers);
    }

    /// Moves request progress forward; progress never goes back.
    pub fn advance_request(&mut self, progress: Http1Progress) {
        self.request_progress = self.request_progress.max(progress);
    }

    pub fn advance_response(&mut self, progress: Http1Progress) {
        self.response_progress = self.response_progress.max(progress);
    }

    /// Feeds request bytes; returns `true` once the request head is complete.
    pub fn parse_request(&mut self, src: &mut BytesMut, limits: &Http1Limits) -> Result<bool, ParseError> {
        if self.request.is_some() {
            return Ok(true);
        }
        match RequestHeadDecoder::new(*limits).decode(src)? {
            Some(head) => {
                trace!(method = %head.method(), uri = %head.uri(), "request head complete");
                self.set_request_head(head);
                Ok(true)
            }
            None => {
                if !src.is_empty() {
                    self.advance_request(Http1Progress::Line);
                }
                Ok(false)
            }
        }
    }

    /// Feeds response bytes; returns `true` once the response head is complete.
    pub fn parse_response(&mut self, src: &mut BytesMut, limits: &Http1Limits) -> Result<bool, ParseError> {
        if self.response.is_some() {
            return Ok(true);
        }
        match ResponseHeadDecoder::new(*limits).decode(src)? {
            Some(head) => {
                trace!(status = %head.status(), "response head complete");
                self.set_response_head(head);
                Ok(true)
            }
            None => {
                if !src.is_empty() {
                    self.advance_response(Http1Progress::Line);
                }
                Ok(false)
            }
        }
    }
}

impl Transaction for Http1Transaction {
    fn app_proto(&self) -> AppProto {
        AppProto::Http1
    }

    fn progress(&self, direction: Direction) -> u8 {
        match direction {
            Direction::ToServer => self.request_progress as u8,
            Direction::ToClient => self.response_progress as u8,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
