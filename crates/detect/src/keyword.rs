//! The keyword dispatch table.
//!
//! Every rule keyword owns one slot of the table, addressed by a [`KeywordId`].
//! A slot carries the static metadata of the keyword and the setup hook the rule
//! compiler calls when it meets the keyword in a signature.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::utils::ensure;
use crate::{DetectEngine, RegistrationError, SetupError, Signature};

/// Slot of a keyword in the keyword table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeywordId(pub u16);

impl fmt::Display for KeywordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

bitflags! {
    /// How the rule parser treats a keyword.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SigMatchFlags: u16 {
        /// The keyword takes no option.
        const NOOPT = 1 << 0;
        /// The keyword may take an option.
        const OPTIONAL_OPT = 1 << 1;
        /// The keyword is a sticky buffer.
        const INFO_STICKY_BUFFER = 1 << 2;
        /// The keyword accepts a `to_server` / `to_client` modifier.
        const SUPPORT_DIR = 1 << 3;
    }
}

/// Hook run when a keyword is applied to a signature under construction.
pub trait KeywordSetup: Send + Sync {
    fn setup(&self, engine: &DetectEngine, sig: &mut Signature, option: &str) -> Result<(), SetupError>;
}

impl<F> KeywordSetup for F
where
    F: Fn(&DetectEngine, &mut Signature, &str) -> Result<(), SetupError> + Send + Sync,
{
    fn setup(&self, engine: &DetectEngine, sig: &mut Signature, option: &str) -> Result<(), SetupError> {
        (self)(engine, sig, option)
    }
}

/// Metadata of one keyword.
#[derive(Clone)]
pub struct SigTableElmt {
    name: String,
    alias: Option<String>,
    desc: String,
    url: String,
    flags: SigMatchFlags,
    setup: Option<Arc<dyn KeywordSetup>>,
}

impl SigTableElmt {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            alias: None,
            desc: String::new(),
            url: String::new(),
            flags: SigMatchFlags::empty(),
            setup: None,
        }
    }

    #[must_use]
    pub fn with_alias<S: Into<String>>(mut self, alias: S) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn with_desc<S: Into<String>>(mut self, desc: S) -> Self {
        self.desc = desc.into();
        self
    }

    #[must_use]
    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: SigMatchFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_setup(mut self, setup: Arc<dyn KeywordSetup>) -> Self {
        self.setup = Some(setup);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn flags(&self) -> SigMatchFlags {
        self.flags
    }

    pub fn setup(&self) -> Option<&Arc<dyn KeywordSetup>> {
        self.setup.as_ref()
    }

    fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.alias.as_deref() == Some(name)
    }
}

impl fmt::Debug for SigTableElmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigTableElmt")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("desc", &self.desc)
            .field("url", &self.url)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Fixed capacity table of keywords.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    slots: Vec<Option<SigTableElmt>>,
}

impl KeywordTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: vec![None; capacity] }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Checks that `elmt` could be stored at `id` without touching the table.
    pub fn check(&self, id: KeywordId, name: &str, alias: Option<&str>) -> Result<(), RegistrationError> {
        let slot = self.slots.get(usize::from(id.0)).ok_or_else(|| RegistrationError::keyword_id_out_of_range(id.0, self.capacity()))?;

        if let Some(existing) = slot {
            return Err(RegistrationError::keyword_slot_taken(id.0, existing.name()));
        }

        ensure!(self.find(name).is_none(), RegistrationError::duplicate_keyword_name(name));
        if let Some(alias) = alias {
            ensure!(alias != name && self.find(alias).is_none(), RegistrationError::duplicate_keyword_name(alias));
        }

        Ok(())
    }

    pub fn insert(&mut self, id: KeywordId, elmt: SigTableElmt) -> Result<(), RegistrationError> {
        self.check(id, elmt.name(), elmt.alias())?;
        self.slots[usize::from(id.0)] = Some(elmt);
        Ok(())
    }

    pub fn get(&self, id: KeywordId) -> Option<&SigTableElmt> {
        self.slots.get(usize::from(id.0)).and_then(Option::as_ref)
    }

    /// Looks a keyword up by its name or its legacy alias.
    pub fn find(&self, name: &str) -> Option<(KeywordId, &SigTableElmt)> {
        self.iter().find(|(_, elmt)| elmt.answers_to(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeywordId, &SigTableElmt)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|elmt| (KeywordId(u16::try_from(index).unwrap_or(u16::MAX)), elmt)))
    }
}
