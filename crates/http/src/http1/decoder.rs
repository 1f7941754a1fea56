//! HTTP/1 head decoders.
//!
//! [`RequestHeadDecoder`] and [`ResponseHeadDecoder`] parse a request or
//! response head out of a byte buffer with `httparse` and split it off the
//! buffer, leaving any body bytes behind.
//!
//! Header values are not copied: the decoder records the byte ranges of every
//! name and value, freezes the head bytes and hands out slices of them. A field
//! that appears more than once is coalesced into a single value, the values
//! joined with `", "` in arrival order, so each header name maps to exactly one
//! value.

use bytes::{Bytes, BytesMut};
use http::header::Entry;
use http::{HeaderMap, HeaderName, HeaderValue, Request, Response, Version};
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::config::Http1Limits;
use crate::http1::{RequestHead, ResponseHead};
use crate::utils::ensure;
use crate::ParseError;

const COALESCE_SEPARATOR: &[u8] = b", ";

/// Decodes a request head into a [`RequestHead`].
#[derive(Debug, Clone, Default)]
pub struct RequestHeadDecoder {
    limits: Http1Limits,
}

impl RequestHeadDecoder {
    /// Creates a decoder bounded by `limits`.
    pub fn new(limits: Http1Limits) -> Self {
        Self { limits }
    }
}

impl Decoder for RequestHeadDecoder {
    type Item = RequestHead;
    type Error = ParseError;

    /// Returns `Ok(None)` while the head is incomplete.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the head has too many fields, exceeds the size
    /// limit, or carries an invalid request line or header.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let max_header_num = self.limits.max_header_num;
        let max_header_bytes = self.limits.max_header_bytes;

        let mut headers = vec![httparse::EMPTY_HEADER; max_header_num];
        let mut req = httparse::Request::new(&mut headers);

        let parsed_result = req.parse(src).map_err(|e| map_httparse_error(e, max_header_num));

        match parsed_result? {
            Status::Complete(head_size) => {
                trace!(head_size, "parsed request head");
                ensure!(head_size <= max_header_bytes, ParseError::too_large_header(head_size, max_header_bytes));

                let header_index = HeaderIndex::record(src, req.headers);
                let version = parse_version(req.version)?;

                let mut builder = Request::builder()
                    .method(req.method.ok_or(ParseError::InvalidMethod)?)
                    .uri(req.path.ok_or(ParseError::InvalidUri)?)
                    .version(version);

                let head_bytes = src.split_to(head_size).freeze();
                if let Some(headers) = builder.headers_mut() {
                    fill_headers(&head_bytes, &header_index, headers)?;
                }

                let request = builder.body(()).map_err(|e| match e {
                    e if e.is::<http::method::InvalidMethod>() => ParseError::InvalidMethod,
                    _ => ParseError::InvalidUri,
                })?;

                Ok(Some(RequestHead::from(request)))
            }
            Status::Partial => {
                ensure!(src.len() <= max_header_bytes, ParseError::too_large_header(src.len(), max_header_bytes));
                Ok(None)
            }
        }
    }
}

/// Decodes a response head into a [`ResponseHead`].
#[derive(Debug, Clone, Default)]
pub struct ResponseHeadDecoder {
    limits: Http1Limits,
}

impl ResponseHeadDecoder {
    /// Creates a decoder bounded by `limits`.
    pub fn new(limits: Http1Limits) -> Self {
        Self { limits }
    }
}

impl Decoder for ResponseHeadDecoder {
    type Item = ResponseHead;
    type Error = ParseError;

    /// Returns `Ok(None)` while the head is incomplete.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the head has too many fields, exceeds the size
    /// limit, or carries an invalid status line or header.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let max_header_num = self.limits.max_header_num;
        let max_header_bytes = self.limits.max_header_bytes;

        let mut headers = vec![httparse::EMPTY_HEADER; max_header_num];
        let mut resp = httparse::Response::new(&mut headers);

        let parsed_result = resp.parse(src).map_err(|e| map_httparse_error(e, max_header_num));

        match parsed_result? {
            Status::Complete(head_size) => {
                trace!(head_size, "parsed response head");
                ensure!(head_size <= max_header_bytes, ParseError::too_large_header(head_size, max_header_bytes));

                let header_index = HeaderIndex::record(src, resp.headers);
                let version = parse_version(resp.version)?;
                let code = resp.code.ok_or(ParseError::InvalidStatus(None))?;

                let mut builder = Response::builder().status(code).version(version);

                let head_bytes = src.split_to(head_size).freeze();
                if let Some(headers) = builder.headers_mut() {
                    fill_headers(&head_bytes, &header_index, headers)?;
                }

                let response = builder.body(()).map_err(|e| ParseError::invalid_header(format!("status {code}: {e}")))?;

                Ok(Some(ResponseHead::from(response)))
            }
            Status::Partial => {
                ensure!(src.len() <= max_header_bytes, ParseError::too_large_header(src.len(), max_header_bytes));
                Ok(None)
            }
        }
    }
}

/// Maps an `httparse` failure onto the matching [`ParseError`].
fn map_httparse_error(e: Error, max_header_num: usize) -> ParseError {
    match e {
        Error::TooManyHeaders => ParseError::too_many_headers(max_header_num),
        Error::Status => ParseError::InvalidStatus(None),
        Error::Version => ParseError::InvalidVersion(None),
        e => ParseError::invalid_header(e.to_string()),
    }
}

/// Only HTTP/1.0 and HTTP/1.1 heads are accepted.
fn parse_version(version: Option<u8>) -> Result<Version, ParseError> {
    match version {
        Some(0) => Ok(Version::HTTP_10),
        Some(1) => Ok(Version::HTTP_11),
        _ => Err(ParseError::InvalidVersion(version)),
    }
}

/// Builds the header map from the recorded ranges, coalescing repeated names.
fn fill_headers(head_bytes: &Bytes, header_index: &[HeaderIndex], headers: &mut HeaderMap) -> Result<(), ParseError> {
    headers.reserve(header_index.len());

    for index in header_index {
        let name = HeaderName::from_bytes(&head_bytes[index.name.0..index.name.1]).map_err(ParseError::invalid_header)?;
        let value = HeaderValue::from_maybe_shared(head_bytes.slice(index.value.0..index.value.1)).map_err(ParseError::invalid_header)?;

        match headers.entry(name) {
            Entry::Occupied(mut entry) => {
                let joined = coalesce(entry.get(), &value)?;
                entry.insert(joined);
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }

    Ok(())
}

fn coalesce(first: &HeaderValue, next: &HeaderValue) -> Result<HeaderValue, ParseError> {
    let mut joined = BytesMut::with_capacity(first.len() + COALESCE_SEPARATOR.len() + next.len());
    joined.extend_from_slice(first.as_bytes());
    joined.extend_from_slice(COALESCE_SEPARATOR);
    joined.extend_from_slice(next.as_bytes());
    HeaderValue::from_maybe_shared(joined.freeze()).map_err(ParseError::invalid_header)
}

/// Byte ranges of a header's name and value within the head buffer.
#[derive(Clone, Copy)]
struct HeaderIndex {
    name: (usize, usize),
    value: (usize, usize),
}

impl HeaderIndex {
    fn record(bytes: &[u8], headers: &[httparse::Header<'_>]) -> Vec<HeaderIndex> {
        let bytes_ptr = bytes.as_ptr() as usize;
        headers
            .iter()
            .map(|header| {
                let name_start = header.name.as_ptr() as usize - bytes_ptr;
                let value_start = header.value.as_ptr() as usize - bytes_ptr;
                HeaderIndex {
                    name: (name_start, name_start + header.name.len()),
                    value: (value_start, value_start + header.value.len()),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};
    use indoc::indoc;

    #[test]
    fn test_bytes_mut_lens() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        123"##};

        let mut bytes = BytesMut::from(str);

        let result = RequestHeadDecoder::default().decode(&mut bytes).unwrap();

        assert!(result.is_some());
        assert_eq!(&bytes[..], &b"123"[..]);
    }

    #[test]
    fn from_curl() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##};

        let mut buf = BytesMut::from(str);

        let head = RequestHeadDecoder::default().decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.method(), &Method::GET);
        assert_eq!(head.version(), Version::HTTP_11);
        assert_eq!(head.uri().path(), "/index.html");
        assert_eq!(head.headers().len(), 3);
        assert_eq!(head.headers().get(http::header::ACCEPT), Some(&HeaderValue::from_static("*/*")));
        assert_eq!(head.headers().get("user-agent"), Some(&HeaderValue::from_static("curl/7.79.1")));
        assert!(buf.is_empty());
    }

    #[test]
    fn partial_head() {
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nUser-Agent: cu");

        assert!(RequestHeadDecoder::default().decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 30);
    }

    #[test]
    fn repeated_fields_are_coalesced() {
        let str = indoc! {r##"
        GET / HTTP/1.1
        Accept: text/html
        Host: example.com
        accept: application/json
        ACCEPT: */*

        "##};

        let mut buf = BytesMut::from(str);
        let head = RequestHeadDecoder::default().decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.headers().len(), 2);
        assert_eq!(head.headers().get_all(http::header::ACCEPT).iter().count(), 1);
        assert_eq!(head.headers().get(http::header::ACCEPT).unwrap().as_bytes(), b"text/html, application/json, */*");
    }

    #[test]
    fn empty_value_is_kept() {
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nUser-Agent:\r\n\r\n");
        let head = RequestHeadDecoder::default().decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.headers().get(http::header::USER_AGENT).map(HeaderValue::len), Some(0));
    }

    #[test]
    fn too_many_headers() {
        let limits = Http1Limits { max_header_num: 2, ..Http1Limits::default() };
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\nC: 3\r\n\r\n");

        let err = RequestHeadDecoder::new(limits).decode(&mut buf).unwrap_err();
        assert!(matches!(err, ParseError::TooManyHeaders { max_num: 2 }));
    }

    #[test]
    fn too_large_partial_head() {
        let limits = Http1Limits { max_header_bytes: 32, ..Http1Limits::default() };
        let mut buf = BytesMut::from("GET / HTTP/1.1\r\nUser-Agent: a-very-long-user-agent-value");

        let err = RequestHeadDecoder::new(limits).decode(&mut buf).unwrap_err();
        assert!(matches!(err, ParseError::TooLargeHeader { max_size: 32, .. }));
    }

    #[test]
    fn response_head() {
        let str = indoc! {r##"
        HTTP/1.1 302 Found
        Server: nginx
        Location: /login
        Set-Cookie: a=1
        Set-Cookie: b=2

        body"##};

        let mut buf = BytesMut::from(str);
        let head = ResponseHeadDecoder::default().decode(&mut buf).unwrap().unwrap();

        assert_eq!(head.status(), StatusCode::FOUND);
        assert_eq!(head.version(), Version::HTTP_11);
        assert_eq!(head.headers().get(http::header::SERVER).unwrap().as_bytes(), b"nginx");
        assert_eq!(head.headers().get(http::header::SET_COOKIE).unwrap().as_bytes(), b"a=1, b=2");
        assert_eq!(&buf[..], b"body");
    }

    #[test]
    fn invalid_response_version() {
        let mut buf = BytesMut::from("HTTP/2.0 200 OK\r\n\r\n");

        assert!(ResponseHeadDecoder::default().decode(&mut buf).is_err());
    }
}
