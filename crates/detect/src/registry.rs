//! App-layer prefilter and inspection registries.
//!
//! A buffer type becomes inspectable for a protocol and direction by adding a
//! prefilter (MPM) entry and an inspection-engine entry for that cell. Both
//! carry the [`BufferExtractor`] that turns a transaction into the buffer bytes,
//! and the parser progress from which the buffer is final.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::prefilter::{MpmPattern, PrefilterEngine};
use crate::{AppProto, BufferId, DetectEngineThreadCtx, DetectEngineTransforms, Direction, DirectionSet, InspectionBuffer, SigBufferList};

/// A transaction as seen by the detection engine.
///
/// Concrete protocol stores implement this; extractors get the concrete type
/// back through [`Transaction::as_any`].
pub trait Transaction {
    /// The concrete protocol of the transaction.
    fn app_proto(&self) -> AppProto;

    /// Parser progress of the transaction in `direction`.
    ///
    /// Values are protocol defined and only compared with the progress an
    /// entry was registered with.
    fn progress(&self, direction: Direction) -> u8;

    fn as_any(&self) -> &dyn Any;
}

/// Resolves a transaction into the inspection buffer of one buffer type.
///
/// Implementations fill the slot of `list_id` on the first call for a
/// transaction and return the filled slot on later calls. `None` means the
/// buffer is not available in this transaction yet, or at all.
pub trait BufferExtractor: Send + Sync {
    fn get_data<'a>(
        &self,
        det_ctx: &'a mut DetectEngineThreadCtx,
        transforms: &DetectEngineTransforms,
        flow_flags: Direction,
        tx: &dyn Transaction,
        list_id: BufferId,
    ) -> Option<&'a InspectionBuffer>;
}

/// Builds the prefilter engine of one MPM cell from the fast patterns that use it.
pub type PrefilterRegisterFn = fn(&AppLayerMpm, BufferId, &DetectEngineTransforms, Vec<MpmPattern>) -> PrefilterEngine;

/// Runs one signature buffer list against a transaction.
pub type InspectEngineFn = fn(&mut DetectEngineThreadCtx, &AppLayerInspectEngine, &SigBufferList, Direction, &dyn Transaction) -> bool;

/// Prefilter registration of a buffer type for one protocol and direction.
#[derive(Clone)]
pub struct AppLayerMpm {
    pub(crate) name: String,
    pub(crate) list_id: BufferId,
    pub(crate) direction: Direction,
    pub(crate) priority: u8,
    pub(crate) registrar: PrefilterRegisterFn,
    pub(crate) extractor: Arc<dyn BufferExtractor>,
    pub(crate) alproto: AppProto,
    pub(crate) progress: u8,
}

impl AppLayerMpm {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn list_id(&self) -> BufferId {
        self.list_id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn alproto(&self) -> AppProto {
        self.alproto
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn extractor(&self) -> &Arc<dyn BufferExtractor> {
        &self.extractor
    }

    pub fn registrar(&self) -> PrefilterRegisterFn {
        self.registrar
    }
}

impl fmt::Debug for AppLayerMpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppLayerMpm")
            .field("name", &self.name)
            .field("list_id", &self.list_id)
            .field("direction", &self.direction)
            .field("priority", &self.priority)
            .field("alproto", &self.alproto)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

/// Inspection registration of a buffer type for one protocol and direction.
#[derive(Clone)]
pub struct AppLayerInspectEngine {
    pub(crate) list_id: BufferId,
    pub(crate) alproto: AppProto,
    pub(crate) direction: Direction,
    pub(crate) progress: u8,
    pub(crate) inspect: InspectEngineFn,
    pub(crate) extractor: Arc<dyn BufferExtractor>,
}

impl AppLayerInspectEngine {
    pub fn list_id(&self) -> BufferId {
        self.list_id
    }

    pub fn alproto(&self) -> AppProto {
        self.alproto
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn extractor(&self) -> &Arc<dyn BufferExtractor> {
        &self.extractor
    }

    pub fn inspect_fn(&self) -> InspectEngineFn {
        self.inspect
    }
}

impl fmt::Debug for AppLayerInspectEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppLayerInspectEngine")
            .field("list_id", &self.list_id)
            .field("alproto", &self.alproto)
            .field("direction", &self.direction)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct AppLayerRegistry {
    pub(crate) mpm: Vec<AppLayerMpm>,
    pub(crate) inspect: Vec<AppLayerInspectEngine>,
}

impl AppLayerRegistry {
    pub(crate) fn find_mpm(&self, list_id: BufferId, alproto: AppProto, direction: Direction) -> Option<&AppLayerMpm> {
        self.mpm.iter().find(|e| e.list_id == list_id && e.alproto == alproto && e.direction == direction)
    }

    pub(crate) fn find_inspect(&self, list_id: BufferId, alproto: AppProto, direction: Direction) -> Option<&AppLayerInspectEngine> {
        self.inspect.iter().find(|e| e.list_id == list_id && e.alproto == alproto && e.direction == direction)
    }

    /// Directions in which `list_id` has an inspection engine, for any protocol.
    pub(crate) fn directions(&self, list_id: BufferId) -> DirectionSet {
        self.inspect.iter().filter(|e| e.list_id == list_id).map(|e| e.direction).collect()
    }

    pub(crate) fn mpm_priority(&self, list_id: BufferId) -> Option<u8> {
        self.mpm.iter().filter(|e| e.list_id == list_id).map(|e| e.priority).max()
    }
}
