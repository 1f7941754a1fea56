use crate::{AppLayerInspectEngine, DetectEngineThreadCtx, Direction, SigBufferList, Transaction};

/// Generic buffer inspection: extract the buffer, then every content of the list must occur in it.
///
/// An absent buffer never matches.
pub fn inspect_buffer_generic(
    det_ctx: &mut DetectEngineThreadCtx,
    engine: &AppLayerInspectEngine,
    list: &SigBufferList,
    flow_flags: Direction,
    tx: &dyn Transaction,
) -> bool {
    match engine.extractor().get_data(det_ctx, list.transforms(), flow_flags, tx, list.slot_id()) {
        Some(buffer) => list.contents().iter().all(|content| content.matches(buffer.bytes())),
        None => false,
    }
}
