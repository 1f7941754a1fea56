//! Transforms applied to a sticky buffer before content matching.

use serde::{Deserialize, Serialize};

/// A single buffer transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// ASCII lowercase every byte.
    ToLowercase,
    /// ASCII uppercase every byte.
    ToUppercase,
    /// Remove all ASCII whitespace.
    StripWhitespace,
    /// Collapse each run of ASCII whitespace to its first byte.
    CompressWhitespace,
}

impl Transform {
    /// The rule-language name of the transform.
    pub fn name(self) -> &'static str {
        match self {
            Transform::ToLowercase => "to_lowercase",
            Transform::ToUppercase => "to_uppercase",
            Transform::StripWhitespace => "strip_whitespace",
            Transform::CompressWhitespace => "compress_whitespace",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "to_lowercase" => Some(Transform::ToLowercase),
            "to_uppercase" => Some(Transform::ToUppercase),
            "strip_whitespace" => Some(Transform::StripWhitespace),
            "compress_whitespace" => Some(Transform::CompressWhitespace),
            _ => None,
        }
    }

    /// Applies the transform in place.
    pub fn apply(self, buf: &mut Vec<u8>) {
        match self {
            Transform::ToLowercase => buf.make_ascii_lowercase(),
            Transform::ToUppercase => buf.make_ascii_uppercase(),
            Transform::StripWhitespace => buf.retain(|b| !b.is_ascii_whitespace()),
            Transform::CompressWhitespace => {
                let mut prev_space = false;
                buf.retain(|b| {
                    let space = b.is_ascii_whitespace();
                    let keep = !(space && prev_space);
                    prev_space = space;
                    keep
                });
            }
        }
    }
}

/// An ordered chain of transforms attached to one sticky buffer of a signature.
///
/// Two signatures using the same buffer with different chains inspect
/// different bytes, so the chain is part of the identity of an inspection slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DetectEngineTransforms {
    transforms: Vec<Transform>,
}

impl DetectEngineTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Transform> + '_ {
        self.transforms.iter().copied()
    }

    pub(crate) fn push(&mut self, transform: Transform) {
        self.transforms.push(transform);
    }

    /// Runs every transform of the chain, in order, over `buf`.
    pub fn apply(&self, buf: &mut Vec<u8>) {
        for transform in &self.transforms {
            transform.apply(buf);
        }
    }
}

impl FromIterator<Transform> for DetectEngineTransforms {
    fn from_iter<I: IntoIterator<Item = Transform>>(iter: I) -> Self {
        Self { transforms: iter.into_iter().collect() }
    }
}
