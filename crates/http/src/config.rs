//! Configuration records of the HTTP crate.
//!
//! [`Http1Limits`] bounds the HTTP/1 head decoders. [`HeaderKeywordConfig`]
//! describes one per-header sticky-buffer keyword and can be loaded from JSON,
//! so deployments can add keywords for headers the built-in catalog lacks.

use micro_detect::{Direction, DirectionSet};
use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::utils::ensure;

/// Default maximum number of header fields in one HTTP/1 head.
pub const DEFAULT_MAX_HEADER_NUM: usize = 64;

/// Default maximum size in bytes of one HTTP/1 head.
pub const DEFAULT_MAX_HEADER_BYTES: usize = 8 * 1024;

/// Limits of the HTTP/1 head decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Http1Limits {
    pub max_header_num: usize,
    pub max_header_bytes: usize,
}

impl Default for Http1Limits {
    fn default() -> Self {
        Self { max_header_num: DEFAULT_MAX_HEADER_NUM, max_header_bytes: DEFAULT_MAX_HEADER_BYTES }
    }
}

/// Parameters of one header keyword instantiation.
///
/// ```json
/// {
///   "id": 300,
///   "name": "http.x_forwarded_for",
///   "buffer_name": "http_x_forwarded_for",
///   "buffer_desc": "http x-forwarded-for header",
///   "doc": "http-keywords.html#http-x-forwarded-for",
///   "header": "X-Forwarded-For",
///   "directions": ["to_server"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderKeywordConfig {
    pub id: u16,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_name: Option<String>,
    pub buffer_name: String,
    pub buffer_desc: String,
    pub doc: String,
    pub header: String,
    pub directions: Vec<Direction>,
}

impl HeaderKeywordConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn direction_set(&self) -> DirectionSet {
        self.directions.iter().copied().collect()
    }

    /// Checks the fields that cannot be expressed in the type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(!self.name.is_empty(), ConfigError::invalid_keyword("empty keyword name"));
        ensure!(!self.buffer_name.is_empty(), ConfigError::invalid_keyword(format!("{}: empty buffer name", self.name)));
        ensure!(!self.directions.is_empty(), ConfigError::invalid_keyword(format!("{}: no direction", self.name)));
        if let Some(legacy) = &self.legacy_name {
            ensure!(!legacy.is_empty() && legacy != &self.name, ConfigError::invalid_keyword(format!("{}: bad legacy name '{legacy}'", self.name)));
        }
        Ok(())
    }
}

/// Reads a JSON array of keyword configs.
pub fn load_keywords_json(json: &str) -> Result<Vec<HeaderKeywordConfig>, ConfigError> {
    let configs: Vec<HeaderKeywordConfig> = serde_json::from_str(json)?;
    for config in &configs {
        config.validate()?;
    }
    Ok(configs)
}
