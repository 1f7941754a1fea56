//! Prefilter (multi-pattern match) engines.
//!
//! Each prefilter engine watches one buffer in one protocol and direction and
//! holds the fast patterns of every signature whose best buffer it is. Running
//! it marks candidate signatures; only candidates are fully inspected.

use std::fmt;
use std::sync::Arc;

use crate::{AppLayerMpm, AppProto, BufferExtractor, BufferId, Content, DetectEngineThreadCtx, DetectEngineTransforms, Direction, Transaction};

/// Priority the generic HTTP header buffers register with.
pub const DEFAULT_MPM_PRIORITY: u8 = 2;

/// A fast pattern and the index of the signature it belongs to.
#[derive(Debug, Clone)]
pub struct MpmPattern {
    pub content: Content,
    pub sig_index: usize,
}

pub struct PrefilterEngine {
    name: String,
    slot_id: BufferId,
    direction: Direction,
    alproto: AppProto,
    progress: u8,
    transforms: DetectEngineTransforms,
    extractor: Arc<dyn BufferExtractor>,
    patterns: Vec<MpmPattern>,
}

impl PrefilterEngine {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot_id(&self) -> BufferId {
        self.slot_id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn alproto(&self) -> AppProto {
        self.alproto
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn patterns(&self) -> &[MpmPattern] {
        &self.patterns
    }

    /// Returns true if the engine applies to a transaction of `alproto` at `progress` in `direction`.
    pub fn applies_to(&self, alproto: AppProto, direction: Direction, progress: u8) -> bool {
        self.alproto == alproto && self.direction == direction && progress >= self.progress
    }

    /// Extracts the buffer and marks the signatures whose pattern occurs in it.
    pub fn run(&self, det_ctx: &mut DetectEngineThreadCtx, tx: &dyn Transaction, candidates: &mut [bool]) {
        let Some(buffer) = self.extractor.get_data(det_ctx, &self.transforms, self.direction, tx, self.slot_id) else {
            return;
        };

        let bytes = buffer.bytes();
        for pattern in &self.patterns {
            if pattern.content.matches(bytes) {
                candidates[pattern.sig_index] = true;
            }
        }
    }
}

impl fmt::Debug for PrefilterEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefilterEngine")
            .field("name", &self.name)
            .field("slot_id", &self.slot_id)
            .field("direction", &self.direction)
            .field("alproto", &self.alproto)
            .field("progress", &self.progress)
            .field("patterns", &self.patterns.len())
            .finish_non_exhaustive()
    }
}

/// The generic registrar: one engine per cell, naive multi-pattern scan.
pub fn prefilter_generic_mpm_register(
    mpm: &AppLayerMpm,
    slot_id: BufferId,
    transforms: &DetectEngineTransforms,
    patterns: Vec<MpmPattern>,
) -> PrefilterEngine {
    PrefilterEngine {
        name: mpm.name().to_owned(),
        slot_id,
        direction: mpm.direction(),
        alproto: mpm.alproto(),
        progress: mpm.progress(),
        transforms: transforms.clone(),
        extractor: Arc::clone(mpm.extractor()),
        patterns,
    }
}
