//! Engine construction.
//!
//! Registration happens in two phases. During startup a single thread fills a
//! [`DetectEngineBuilder`]: keywords, buffer types, prefilter and inspection
//! entries. [`DetectEngineBuilder::build`] then freezes everything into a
//! [`DetectEngine`], which is immutable and shared by all workers without
//! synchronisation.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::registry::AppLayerRegistry;
use crate::{
    AppLayerInspectEngine, AppLayerMpm, AppProto, BufferExtractor, BufferId, BufferTypeRegistry, Direction, DirectionSet, EngineConfig,
    InspectEngineFn, KeywordId, KeywordTable, PrefilterRegisterFn, RegistrationError, SigTableElmt,
};

/// Mutable engine tables, alive only during startup.
#[derive(Debug)]
pub struct DetectEngineBuilder {
    config: EngineConfig,
    keywords: KeywordTable,
    buffer_types: BufferTypeRegistry,
    app_layer: AppLayerRegistry,
}

impl Default for DetectEngineBuilder {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl DetectEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let keywords = KeywordTable::with_capacity(config.keyword_capacity);
        Self { config, keywords, buffer_types: BufferTypeRegistry::new(), app_layer: AppLayerRegistry::default() }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Checks that a keyword could be registered at `id` without changing anything.
    pub fn check_keyword(&self, id: KeywordId, name: &str, alias: Option<&str>) -> Result<(), RegistrationError> {
        self.keywords.check(id, name, alias)
    }

    /// Fills the keyword slot `id`.
    pub fn register_keyword(&mut self, id: KeywordId, elmt: SigTableElmt) -> Result<(), RegistrationError> {
        trace!(id = id.0, name = elmt.name(), "register keyword");
        self.keywords.insert(id, elmt)
    }

    pub fn keyword(&self, id: KeywordId) -> Option<&SigTableElmt> {
        self.keywords.get(id)
    }

    /// Registers a prefilter entry for buffer `name` and returns the buffer id.
    ///
    /// The buffer type is created on first use of `name`.
    #[allow(clippy::too_many_arguments, reason = "mirrors the app-layer registration call")]
    pub fn register_mpm(
        &mut self,
        name: &str,
        direction: Direction,
        priority: u8,
        registrar: PrefilterRegisterFn,
        extractor: Arc<dyn BufferExtractor>,
        alproto: AppProto,
        progress: u8,
    ) -> BufferId {
        let list_id = self.buffer_types.register_by_name(name);
        debug!(buffer = name, %list_id, %direction, %alproto, progress, priority, "register prefilter mpm");
        self.app_layer.mpm.push(AppLayerMpm {
            name: name.to_owned(),
            list_id,
            direction,
            priority,
            registrar,
            extractor,
            alproto,
            progress,
        });
        list_id
    }

    /// Registers an inspection engine for buffer `name` and returns the buffer id.
    pub fn register_inspect_engine(
        &mut self,
        name: &str,
        alproto: AppProto,
        direction: Direction,
        progress: u8,
        inspect: InspectEngineFn,
        extractor: Arc<dyn BufferExtractor>,
    ) -> BufferId {
        let list_id = self.buffer_types.register_by_name(name);
        debug!(buffer = name, %list_id, %direction, %alproto, progress, "register inspect engine");
        self.app_layer.inspect.push(AppLayerInspectEngine { list_id, alproto, direction, progress, inspect, extractor });
        list_id
    }

    pub fn buffer_type_get_by_name(&self, name: &str) -> Option<BufferId> {
        self.buffer_types.get_by_name(name)
    }

    pub fn buffer_type_set_description_by_name(&mut self, name: &str, description: &str) -> Option<BufferId> {
        self.buffer_types.set_description_by_name(name, description)
    }

    /// Freezes the tables.
    pub fn build(self) -> DetectEngine {
        debug!(
            keywords = self.keywords.iter().count(),
            buffers = self.buffer_types.len(),
            mpm = self.app_layer.mpm.len(),
            inspect = self.app_layer.inspect.len(),
            "detect engine tables frozen"
        );
        DetectEngine {
            config: self.config,
            keywords: self.keywords,
            buffer_types: self.buffer_types,
            app_layer: self.app_layer,
        }
    }
}

/// Frozen engine tables.
#[derive(Debug)]
pub struct DetectEngine {
    config: EngineConfig,
    keywords: KeywordTable,
    buffer_types: BufferTypeRegistry,
    app_layer: AppLayerRegistry,
}

impl DetectEngine {
    pub fn builder() -> DetectEngineBuilder {
        DetectEngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn keyword(&self, id: KeywordId) -> Option<&SigTableElmt> {
        self.keywords.get(id)
    }

    /// Looks a keyword up by name or legacy alias.
    pub fn find_keyword(&self, name: &str) -> Option<(KeywordId, &SigTableElmt)> {
        self.keywords.find(name)
    }

    pub fn keywords(&self) -> impl Iterator<Item = (KeywordId, &SigTableElmt)> {
        self.keywords.iter()
    }

    pub fn buffer_types(&self) -> &BufferTypeRegistry {
        &self.buffer_types
    }

    pub fn buffer_type_get_by_name(&self, name: &str) -> Option<BufferId> {
        self.buffer_types.get_by_name(name)
    }

    pub fn buffer_name(&self, list_id: BufferId) -> Option<&str> {
        self.buffer_types.name(list_id)
    }

    pub fn mpm_entries(&self) -> &[AppLayerMpm] {
        &self.app_layer.mpm
    }

    pub fn inspect_engines(&self) -> &[AppLayerInspectEngine] {
        &self.app_layer.inspect
    }

    pub fn has_mpm(&self, list_id: BufferId, alproto: AppProto, direction: Direction) -> bool {
        self.app_layer.find_mpm(list_id, alproto, direction).is_some()
    }

    pub fn inspect_engine(&self, list_id: BufferId, alproto: AppProto, direction: Direction) -> Option<&AppLayerInspectEngine> {
        self.app_layer.find_inspect(list_id, alproto, direction)
    }

    /// Directions in which the buffer can be inspected at all.
    pub fn buffer_directions(&self, list_id: BufferId) -> DirectionSet {
        self.app_layer.directions(list_id)
    }

    /// Highest prefilter priority registered for the buffer, if it has any prefilter entry.
    pub fn mpm_priority(&self, list_id: BufferId) -> Option<u8> {
        self.app_layer.mpm_priority(list_id)
    }
}
