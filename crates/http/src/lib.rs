//! Per-header HTTP sticky-buffer keywords for the micro detection engine.
//!
//! Each keyword exposes the value of one named HTTP header as an inspection
//! buffer, so rules can match content against e.g. the `User-Agent` of a request
//! with `http.user_agent; content:"curl";`.
//!
//! # Architecture
//!
//! - [`http1`]: HTTP/1 transaction store and `httparse` based head decoders
//! - [`http2`]: HTTP/2 per-stream transaction store
//! - [`HeaderSource`]: one header lookup over both stores
//! - [`HeaderKeyword`]: the keyword template: registration, setup hook and
//!   the [`HeaderExtractor`] that fills inspection buffers
//! - [`HTTP_HEADER_KEYWORDS`]: the built-in keyword catalog
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use bytes::BytesMut;
//! use micro_detect::{DetectEngineBuilder, DetectEngineCtx, DetectEngineThreadCtx, Direction, Signature};
//! use micro_detect_http::http1::Http1Transaction;
//! use micro_detect_http::{Http1Limits, register_http_header_keywords};
//!
//! let mut builder = DetectEngineBuilder::new();
//! register_http_header_keywords(&mut builder).unwrap();
//! let engine = Arc::new(builder.build());
//!
//! let mut sig = Signature::new(1);
//! sig.apply_keyword(&engine, "http.user_agent", "").unwrap();
//! sig.add_content("curl").unwrap();
//! let ctx = DetectEngineCtx::build(engine, vec![sig]).unwrap();
//!
//! let mut tx = Http1Transaction::new();
//! let mut buf = BytesMut::from("GET / HTTP/1.1\r\nUser-Agent: curl/8.0\r\n\r\n");
//! tx.parse_request(&mut buf, &Http1Limits::default()).unwrap();
//!
//! let mut det_ctx = DetectEngineThreadCtx::new();
//! assert_eq!(ctx.detect_tx(&mut det_ctx, Direction::ToServer, &tx), vec![1]);
//! ```

pub mod http1;
pub mod http2;

mod config;
mod error;
mod keyword;
mod source;
mod utils;

pub use config::{DEFAULT_MAX_HEADER_BYTES, DEFAULT_MAX_HEADER_NUM, HeaderKeywordConfig, Http1Limits, load_keywords_json};
pub use error::{ConfigError, ParseError};
pub use keyword::{CatalogEntry, HTTP_HEADER_KEYWORDS, HeaderExtractor, HeaderKeyword, register_http_header_keywords};
pub use source::{HeaderSource, HttpVersion};
