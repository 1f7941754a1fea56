//! Signatures under construction.
//!
//! A signature is built by applying keywords in rule order. Sticky buffer
//! keywords switch the *active list*; content and transform keywords that follow
//! attach to that list.

use bytes::Bytes;
use tracing::debug;

use crate::utils::ensure;
use crate::{AppProto, BufferId, DetectEngine, DetectEngineTransforms, Direction, DirectionSet, SetupError, SigMatchFlags, Transform};

pub type SigId = u32;

/// A literal pattern matched against a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pattern: Bytes,
    nocase: bool,
}

impl Content {
    pub fn new<B: Into<Bytes>>(pattern: B) -> Self {
        Self { pattern: pattern.into(), nocase: false }
    }

    pub fn nocase<B: Into<Bytes>>(pattern: B) -> Self {
        Self { pattern: pattern.into(), nocase: true }
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn is_nocase(&self) -> bool {
        self.nocase
    }

    /// Returns true if the pattern occurs anywhere in `haystack`.
    pub fn matches(&self, haystack: &[u8]) -> bool {
        let needle = self.pattern.as_ref();
        if needle.is_empty() {
            return true;
        }
        if self.nocase {
            haystack.windows(needle.len()).any(|w| w.eq_ignore_ascii_case(needle))
        } else {
            haystack.windows(needle.len()).any(|w| w == needle)
        }
    }
}

/// The matches a signature runs against one buffer type.
#[derive(Debug, Clone)]
pub struct SigBufferList {
    list_id: BufferId,
    slot_id: BufferId,
    transforms: DetectEngineTransforms,
    contents: Vec<Content>,
}

impl SigBufferList {
    fn new(list_id: BufferId) -> Self {
        Self { list_id, slot_id: list_id, transforms: DetectEngineTransforms::new(), contents: Vec::new() }
    }

    /// The registered buffer type.
    pub fn list_id(&self) -> BufferId {
        self.list_id
    }

    /// The inspection slot of this list; differs from [`list_id`](Self::list_id)
    /// when the list carries transforms.
    pub fn slot_id(&self) -> BufferId {
        self.slot_id
    }

    pub(crate) fn set_slot_id(&mut self, slot_id: BufferId) {
        self.slot_id = slot_id;
    }

    pub fn transforms(&self) -> &DetectEngineTransforms {
        &self.transforms
    }

    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    /// The longest content, used as the prefilter pattern.
    pub fn fast_pattern(&self) -> Option<&Content> {
        self.contents.iter().rev().max_by_key(|c| c.pattern().len())
    }
}

#[derive(Debug, Clone)]
pub struct Signature {
    id: SigId,
    app_proto: AppProto,
    direction: Option<Direction>,
    directions: DirectionSet,
    lists: Vec<SigBufferList>,
    active_list: Option<usize>,
}

impl Signature {
    pub fn new(id: SigId) -> Self {
        Self { id, app_proto: AppProto::Unknown, direction: None, directions: DirectionSet::all(), lists: Vec::new(), active_list: None }
    }

    pub fn id(&self) -> SigId {
        self.id
    }

    pub fn app_proto(&self) -> AppProto {
        self.app_proto
    }

    /// The direction the rule writer pinned the signature to, if any.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Directions the signature is evaluated in. Final once the signature is
    /// part of a [`DetectEngineCtx`](crate::DetectEngineCtx).
    pub fn directions(&self) -> DirectionSet {
        self.directions
    }

    pub(crate) fn set_directions(&mut self, directions: DirectionSet) {
        self.directions = directions;
    }

    pub fn lists(&self) -> &[SigBufferList] {
        &self.lists
    }

    pub(crate) fn lists_mut(&mut self) -> &mut [SigBufferList] {
        &mut self.lists
    }

    /// The buffer subsequent content matches target.
    pub fn active_list(&self) -> Option<BufferId> {
        self.active_list.map(|index| self.lists[index].list_id)
    }

    /// Makes `list_id` the active sticky buffer.
    pub fn set_active_list(&mut self, engine: &DetectEngine, list_id: BufferId) -> Result<(), SetupError> {
        ensure!(engine.buffer_name(list_id).is_some(), SetupError::UnknownBuffer { list_id: list_id.get() });

        let index = match self.lists.iter().position(|list| list.list_id == list_id) {
            Some(index) => index,
            None => {
                self.lists.push(SigBufferList::new(list_id));
                self.lists.len() - 1
            }
        };
        self.active_list = Some(index);
        Ok(())
    }

    /// Pins the signature to `alproto`, narrowing an earlier family pin.
    pub fn set_app_proto(&mut self, alproto: AppProto) -> Result<(), SetupError> {
        self.app_proto = self.app_proto.merge(alproto).ok_or_else(|| SetupError::app_proto_conflict(self.app_proto, alproto))?;
        Ok(())
    }

    pub fn set_direction(&mut self, direction: Direction) -> Result<(), SetupError> {
        if let Some(current) = self.direction {
            ensure!(current == direction, SetupError::DirectionConflict { current, requested: direction });
        }
        self.direction = Some(direction);
        Ok(())
    }

    /// Applies keyword `name` with `option`, the way the rule parser does.
    ///
    /// The option is validated against the keyword flags before the setup hook
    /// runs. A direction modifier on a keyword that supports one pins the
    /// signature direction.
    pub fn apply_keyword(&mut self, engine: &DetectEngine, name: &str, option: &str) -> Result<(), SetupError> {
        let (_, elmt) = engine.find_keyword(name).ok_or_else(|| SetupError::unknown_keyword(name))?;
        let flags = elmt.flags();
        let option = option.trim();

        let mut direction = None;
        if !option.is_empty() {
            ensure!(
                !flags.contains(SigMatchFlags::NOOPT) && flags.contains(SigMatchFlags::OPTIONAL_OPT),
                SetupError::unexpected_option(elmt.name(), option)
            );
            if flags.contains(SigMatchFlags::SUPPORT_DIR) {
                direction = Some(Direction::from_option(option).ok_or_else(|| SetupError::invalid_direction(elmt.name(), option))?);
            }
        }

        if let (Some(requested), Some(current)) = (direction, self.direction) {
            ensure!(requested == current, SetupError::DirectionConflict { current, requested });
        }

        if let Some(setup) = elmt.setup() {
            setup.setup(engine, self, option).inspect_err(|e| debug!(keyword = elmt.name(), cause = %e, "keyword setup rejected"))?;
        }

        if let Some(direction) = direction {
            self.set_direction(direction)?;
        }

        Ok(())
    }

    /// Adds a case-sensitive content match to the active list.
    pub fn add_content<B: Into<Bytes>>(&mut self, pattern: B) -> Result<(), SetupError> {
        self.push_content(Content::new(pattern))
    }

    /// Adds a case-insensitive content match to the active list.
    pub fn add_content_nocase<B: Into<Bytes>>(&mut self, pattern: B) -> Result<(), SetupError> {
        self.push_content(Content::nocase(pattern))
    }

    fn push_content(&mut self, content: Content) -> Result<(), SetupError> {
        let index = self.active_list.ok_or_else(|| SetupError::no_active_list("content"))?;
        self.lists[index].contents.push(content);
        Ok(())
    }

    /// Appends `transform` to the chain of the active list.
    pub fn add_transform(&mut self, engine: &DetectEngine, transform: Transform) -> Result<(), SetupError> {
        let index = self.active_list.ok_or_else(|| SetupError::no_active_list(transform.name()))?;
        let max = engine.config().max_transforms;
        let list = &mut self.lists[index];
        ensure!(list.transforms.len() < max, SetupError::TooManyTransforms { max });
        list.transforms.push(transform);
        Ok(())
    }
}
