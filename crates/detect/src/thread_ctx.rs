use crate::{BufferId, DetectEngineTransforms, InspectionBuffer};

/// Per-worker detection state.
///
/// Each worker owns one context and passes it to every extractor it runs, so
/// inspection buffers are never shared between threads.
#[derive(Debug, Default)]
pub struct DetectEngineThreadCtx {
    buffers: Vec<InspectionBuffer>,
}

impl DetectEngineThreadCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot addressed by `list_id`, allocating it on first use.
    pub fn inspection_buffer(&mut self, list_id: BufferId) -> &mut InspectionBuffer {
        let slot = list_id.slot();
        if self.buffers.len() <= slot {
            self.buffers.resize_with(slot + 1, InspectionBuffer::default);
        }
        &mut self.buffers[slot]
    }

    /// Returns the slot of `list_id` if it is filled.
    pub fn filled_buffer(&self, list_id: BufferId) -> Option<&InspectionBuffer> {
        self.buffers.get(list_id.slot()).filter(|buffer| buffer.is_filled())
    }

    /// Installs `data` in the slot of `list_id` and applies `transforms`.
    pub fn setup_and_apply_transforms(&mut self, list_id: BufferId, data: &[u8], transforms: &DetectEngineTransforms) -> &InspectionBuffer {
        let buffer = self.inspection_buffer(list_id);
        buffer.setup_and_apply_transforms(data, transforms);
        buffer
    }

    /// Empties every slot; called when inspection of a transaction ends.
    pub fn clear_buffers(&mut self) {
        for buffer in &mut self.buffers {
            buffer.clear();
        }
    }
}
