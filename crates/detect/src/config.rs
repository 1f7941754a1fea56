use serde::Deserialize;

/// Default number of slots in the keyword table.
pub const DEFAULT_KEYWORD_CAPACITY: usize = 512;

/// Default limit of transforms on one sticky buffer.
pub const DEFAULT_MAX_TRANSFORMS: usize = 16;

/// Engine wide settings, fixed for the lifetime of a [`DetectEngine`](crate::DetectEngine).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Size of the keyword table; keyword ids must be below it.
    pub keyword_capacity: usize,
    /// Maximum length of the transform chain of a sticky buffer.
    pub max_transforms: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { keyword_capacity: DEFAULT_KEYWORD_CAPACITY, max_transforms: DEFAULT_MAX_TRANSFORMS }
    }
}
