use thiserror::Error;

use crate::{AppProto, Direction};

/// Failures while filling the engine tables at startup.
///
/// Any of these is fatal: the engine refuses to start with a half-registered keyword.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("keyword id {id} exceed the keyword table capacity {capacity}")]
    KeywordIdOutOfRange { id: u16, capacity: usize },

    #[error("keyword slot {id} already taken by '{existing}'")]
    KeywordSlotTaken { id: u16, existing: String },

    #[error("keyword name '{name}' already registered")]
    DuplicateKeywordName { name: String },

    #[error("buffer type '{name}' already registered by another keyword")]
    BufferNameCollision { name: String },

    #[error("invalid keyword definition: {reason}")]
    InvalidKeyword { reason: String },
}

impl RegistrationError {
    pub fn keyword_id_out_of_range(id: u16, capacity: usize) -> Self {
        Self::KeywordIdOutOfRange { id, capacity }
    }

    pub fn keyword_slot_taken<S: ToString>(id: u16, existing: S) -> Self {
        Self::KeywordSlotTaken { id, existing: existing.to_string() }
    }

    pub fn duplicate_keyword_name<S: ToString>(name: S) -> Self {
        Self::DuplicateKeywordName { name: name.to_string() }
    }

    pub fn buffer_name_collision<S: ToString>(name: S) -> Self {
        Self::BufferNameCollision { name: name.to_string() }
    }

    pub fn invalid_keyword<S: ToString>(reason: S) -> Self {
        Self::InvalidKeyword { reason: reason.to_string() }
    }
}

/// Failures while applying keywords to a signature or compiling a rule set.
///
/// The rule is skipped; the message is meant for the rule writer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("unknown keyword '{name}'")]
    UnknownKeyword { name: String },

    #[error("keyword '{keyword}' takes no option, got '{option}'")]
    UnexpectedOption { keyword: String, option: String },

    #[error("keyword '{keyword}' only accepts 'to_server' or 'to_client', got '{option}'")]
    InvalidDirection { keyword: String, option: String },

    #[error("signature is already pinned to app-layer protocol {current}, can't use {requested}")]
    AppProtoConflict { current: AppProto, requested: AppProto },

    #[error("buffer of keyword '{keyword}' is not registered")]
    BufferUnresolved { keyword: String },

    #[error("unknown buffer id {list_id}")]
    UnknownBuffer { list_id: u32 },

    #[error("'{keyword}' needs a sticky buffer before it")]
    NoActiveList { keyword: String },

    #[error("signature is already {current}, can't switch to {requested}")]
    DirectionConflict { current: Direction, requested: Direction },

    #[error("too many transforms on one buffer, the limit is {max}")]
    TooManyTransforms { max: usize },

    #[error("signature {sig} uses buffers that share no inspection direction")]
    NoDirection { sig: u32 },

    #[error("signature {sig} uses buffer '{buffer}' which is not inspected {direction}")]
    BufferNotInDirection { sig: u32, buffer: String, direction: Direction },

    #[error("signature {sig} has no content after sticky buffer '{buffer}'")]
    EmptyStickyBuffer { sig: u32, buffer: String },
}

impl SetupError {
    pub fn unknown_keyword<S: ToString>(name: S) -> Self {
        Self::UnknownKeyword { name: name.to_string() }
    }

    pub fn unexpected_option<K: ToString, O: ToString>(keyword: K, option: O) -> Self {
        Self::UnexpectedOption { keyword: keyword.to_string(), option: option.to_string() }
    }

    pub fn invalid_direction<K: ToString, O: ToString>(keyword: K, option: O) -> Self {
        Self::InvalidDirection { keyword: keyword.to_string(), option: option.to_string() }
    }

    pub fn app_proto_conflict(current: AppProto, requested: AppProto) -> Self {
        Self::AppProtoConflict { current, requested }
    }

    pub fn buffer_unresolved<S: ToString>(keyword: S) -> Self {
        Self::BufferUnresolved { keyword: keyword.to_string() }
    }

    pub fn no_active_list<S: ToString>(keyword: S) -> Self {
        Self::NoActiveList { keyword: keyword.to_string() }
    }
}
