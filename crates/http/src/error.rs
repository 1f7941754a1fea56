use std::io;

use http::header::InvalidHeaderName;
use thiserror::Error;

/// Errors of the HTTP/1 head decoders.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("invalid http method")]
    InvalidMethod,

    #[error("invalid http uri")]
    InvalidUri,

    #[error("invalid http status: {0:?}")]
    InvalidStatus(Option<u16>),

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Errors while reading header keyword definitions.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid header name '{header}': {source}")]
    InvalidHeaderName {
        header: String,
        #[source]
        source: InvalidHeaderName,
    },

    #[error("invalid keyword config: {reason}")]
    InvalidKeyword { reason: String },

    #[error("json error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn invalid_header_name<S: ToString>(header: S, source: InvalidHeaderName) -> Self {
        Self::InvalidHeaderName { header: header.to_string(), source }
    }

    pub fn invalid_keyword<S: ToString>(str: S) -> Self {
        Self::InvalidKeyword { reason: str.to_string() }
    }
}
