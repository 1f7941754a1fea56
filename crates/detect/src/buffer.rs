//! Buffer types and the per-thread inspection buffers they address.
//!
//! A buffer type is an engine-wide name (`http_user_agent`) resolved once to a
//! [`BufferId`]. At inspection time the id addresses an [`InspectionBuffer`]
//! slot in the worker's [`DetectEngineThreadCtx`](crate::DetectEngineThreadCtx).
//!
//! # Slot lifecycle
//!
//! A slot is either *empty* or *filled*. The only transition is `empty -> filled`,
//! done by the first extractor call for a transaction. Later calls see the
//! filled slot and return it untouched. The slot is emptied again when the
//! engine finishes inspecting the transaction.
//!
//! The bytes are copied into the slot, so a filled slot never borrows from the
//! transaction it was filled from.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU32;

use crate::DetectEngineTransforms;

/// Handle of a registered buffer type. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(NonZeroU32);

impl BufferId {
    /// Builds the id of the `index`-th buffer (0 based).
    pub(crate) fn from_index(index: usize) -> Self {
        let offset = u32::try_from(index).unwrap_or(u32::MAX - 1);
        Self(NonZeroU32::MIN.saturating_add(offset))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self.0.get() as usize
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct BufferType {
    id: BufferId,
    name: String,
    description: Option<String>,
}

impl BufferType {
    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Name to id registry of buffer types.
///
/// Registering a name twice returns the id of the first registration, so the
/// prefilter and inspection wiring of one keyword resolve to the same buffer.
#[derive(Debug, Default, Clone)]
pub struct BufferTypeRegistry {
    by_name: HashMap<String, BufferId>,
    types: Vec<BufferType>,
}

impl BufferTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_by_name(&mut self, name: &str) -> BufferId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }

        let id = BufferId::from_index(self.types.len());
        self.types.push(BufferType { id, name: name.to_owned(), description: None });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    pub fn get_by_name(&self, name: &str) -> Option<BufferId> {
        self.by_name.get(name).copied()
    }

    /// Records the human description of a buffer type.
    ///
    /// Returns `None` if no buffer type with that name exists.
    pub fn set_description_by_name(&mut self, name: &str, description: &str) -> Option<BufferId> {
        let id = self.get_by_name(name)?;
        let buffer_type = self.types.get_mut(id.slot() - 1)?;
        buffer_type.description = Some(description.to_owned());
        Some(id)
    }

    pub fn get(&self, id: BufferId) -> Option<&BufferType> {
        self.types.get(id.slot() - 1)
    }

    pub fn name(&self, id: BufferId) -> Option<&str> {
        self.get(id).map(BufferType::name)
    }

    pub fn description(&self, id: BufferId) -> Option<&str> {
        self.get(id).and_then(BufferType::description)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BufferType> {
        self.types.iter()
    }
}

/// Scratch slot holding the bytes a sticky buffer resolved to for the current transaction.
#[derive(Debug, Default, Clone)]
pub struct InspectionBuffer {
    orig: Vec<u8>,
    inspect: Vec<u8>,
    filled: bool,
}

impl InspectionBuffer {
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// The bytes content matches run against, after transforms.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.inspect
    }

    /// The bytes as installed, before transforms.
    #[inline]
    pub fn original(&self) -> &[u8] {
        &self.orig
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inspect.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inspect.is_empty()
    }

    /// Copies `data` in and applies the transform chain.
    ///
    /// A filled slot is left as is.
    pub fn setup_and_apply_transforms(&mut self, data: &[u8], transforms: &DetectEngineTransforms) {
        if self.filled {
            return;
        }

        self.orig.clear();
        self.orig.extend_from_slice(data);
        self.inspect.clear();
        self.inspect.extend_from_slice(data);
        transforms.apply(&mut self.inspect);
        self.filled = true;
    }

    /// Empties the slot, keeping its allocations for the next transaction.
    pub fn clear(&mut self) {
        self.orig.clear();
        self.inspect.clear();
        self.filled = false;
    }
}
