//! Parsed HTTP/1 message heads.
//!
//! Thin wrappers over the bodyless `http::Request<()>` / `http::Response<()>`
//! produced by the head decoders.

use http::{HeaderMap, Method, Request, Response, StatusCode, Uri, Version};

/// A decoded request line plus header fields.
#[derive(Debug)]
pub struct RequestHead {
    inner: Request<()>,
}

impl AsRef<Request<()>> for RequestHead {
    fn as_ref(&self) -> &Request<()> {
        &self.inner
    }
}

impl RequestHead {
    /// Consumes the head and returns the inner `Request<()>`.
    pub fn into_inner(self) -> Request<()> {
        self.inner
    }

    /// Returns a reference to the request's HTTP method.
    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    /// Returns a reference to the request's URI.
    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    /// Returns the HTTP version of the message.
    pub fn version(&self) -> Version {
        self.inner.version()
    }

    /// Returns the header fields; repeated fields are already coalesced.
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }
}

impl From<Request<()>> for RequestHead {
    #[inline]
    fn from(inner: Request<()>) -> Self {
        Self { inner }
    }
}

/// A decoded status line plus header fields.
#[derive(Debug)]
pub struct ResponseHead {
    inner: Response<()>,
}

impl AsRef<Response<()>> for ResponseHead {
    fn as_ref(&self) -> &Response<()> {
        &self.inner
    }
}

impl ResponseHead {
    /// Consumes the head and returns the inner `Response<()>`.
    pub fn into_inner(self) -> Response<()> {
        self.inner
    }

    /// Returns the response status code.
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Returns the HTTP version of the message.
    pub fn version(&self) -> Version {
        self.inner.version()
    }

    /// Returns the header fields; repeated fields are already coalesced.
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }
}

impl From<Response<()>> for ResponseHead {
    #[inline]
    fn from(inner: Response<()>) -> Self {
        Self { inner }
    }
}
