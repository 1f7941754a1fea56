//! The built-in header keywords.

use std::sync::Arc;

use micro_detect::{DetectEngineBuilder, Direction, DirectionSet, RegistrationError};
use tracing::error;

use crate::HeaderKeywordConfig;
use crate::keyword::HeaderKeyword;

/// Static parameters of a built-in header keyword.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub id: u16,
    pub name: &'static str,
    pub legacy_name: Option<&'static str>,
    pub buffer_name: &'static str,
    pub buffer_desc: &'static str,
    pub doc: &'static str,
    pub header: &'static str,
    pub directions: DirectionSet,
}

impl From<&CatalogEntry> for HeaderKeywordConfig {
    fn from(entry: &CatalogEntry) -> Self {
        HeaderKeywordConfig {
            id: entry.id,
            name: entry.name.to_owned(),
            legacy_name: entry.legacy_name.map(str::to_owned),
            buffer_name: entry.buffer_name.to_owned(),
            buffer_desc: entry.buffer_desc.to_owned(),
            doc: entry.doc.to_owned(),
            header: entry.header.to_owned(),
            directions: entry.directions.directions().collect::<Vec<Direction>>(),
        }
    }
}

const BOTH: DirectionSet = DirectionSet::TO_SERVER.union(DirectionSet::TO_CLIENT);

pub const HTTP_HEADER_KEYWORDS: &[CatalogEntry] = &[
    CatalogEntry {
        id: 200,
        name: "http.accept",
        legacy_name: Some("http_accept"),
        buffer_name: "http_accept",
        buffer_desc: "http accept header",
        doc: "http-keywords.html#http-accept",
        header: "Accept",
        directions: DirectionSet::TO_SERVER,
    },
    CatalogEntry {
        id: 201,
        name: "http.accept_enc",
        legacy_name: Some("http_accept_enc"),
        buffer_name: "http_accept_enc",
        buffer_desc: "http accept encoding header",
        doc: "http-keywords.html#http-accept-enc",
        header: "Accept-Encoding",
        directions: DirectionSet::TO_SERVER,
    },
    CatalogEntry {
        id: 202,
        name: "http.accept_lang",
        legacy_name: Some("http_accept_lang"),
        buffer_name: "http_accept_lang",
        buffer_desc: "http accept language header",
        doc: "http-keywords.html#http-accept-lang",
        header: "Accept-Language",
        directions: DirectionSet::TO_SERVER,
    },
    CatalogEntry {
        id: 203,
        name: "http.referer",
        legacy_name: Some("http_referer"),
        buffer_name: "http_referer",
        buffer_desc: "http referer header",
        doc: "http-keywords.html#http-referer",
        header: "Referer",
        directions: DirectionSet::TO_SERVER,
    },
    CatalogEntry {
        id: 204,
        name: "http.user_agent",
        legacy_name: Some("http_user_agent"),
        buffer_name: "http_user_agent",
        buffer_desc: "http user agent header",
        doc: "http-keywords.html#http-user-agent",
        header: "User-Agent",
        directions: DirectionSet::TO_SERVER,
    },
    CatalogEntry {
        id: 205,
        name: "http.connection",
        legacy_name: Some("http_connection"),
        buffer_name: "http_connection",
        buffer_desc: "http connection header",
        doc: "http-keywords.html#http-connection",
        header: "Connection",
        directions: BOTH,
    },
    CatalogEntry {
        id: 206,
        name: "http.server",
        legacy_name: None,
        buffer_name: "http.server",
        buffer_desc: "http server response header",
        doc: "http-keywords.html#http-server",
        header: "Server",
        directions: DirectionSet::TO_CLIENT,
    },
    CatalogEntry {
        id: 207,
        name: "http.location",
        legacy_name: None,
        buffer_name: "http.location",
        buffer_desc: "http location response header",
        doc: "http-keywords.html#http-location",
        header: "Location",
        directions: DirectionSet::TO_CLIENT,
    },
];

/// Registers every keyword of [`HTTP_HEADER_KEYWORDS`].
pub fn register_http_header_keywords(builder: &mut DetectEngineBuilder) -> Result<Vec<Arc<HeaderKeyword>>, RegistrationError> {
    HTTP_HEADER_KEYWORDS
        .iter()
        .map(|entry| {
            let keyword = HeaderKeyword::new(entry.into()).map_err(RegistrationError::invalid_keyword)?;
            keyword.register(builder).inspect_err(|e| error!(keyword = entry.name, cause = %e, "failed to register header keyword"))
        })
        .collect()
}
