//! HTTP/1 transaction store.

mod decoder;
mod message;
mod transaction;

pub use decoder::{RequestHeadDecoder, ResponseHeadDecoder};
pub use message::{RequestHead, ResponseHead};
pub use transaction::{Http1Progress, Http1Transaction};
