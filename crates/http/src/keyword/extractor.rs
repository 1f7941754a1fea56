use http::HeaderName;
use micro_detect::{BufferExtractor, BufferId, DetectEngineThreadCtx, DetectEngineTransforms, Direction, InspectionBuffer, Transaction};
use tracing::debug;

use crate::source::{HeaderSource, HttpVersion};

/// Fills the inspection buffer of a header keyword from one transaction side.
///
/// One extractor serves one (direction, HTTP version) cell. The extractor of
/// the cell that matches the running flow direction is the one invoked, so
/// `flow_flags` always equals `direction` in practice.
#[derive(Debug, Clone)]
pub struct HeaderExtractor {
    header: HeaderName,
    direction: Direction,
    version: HttpVersion,
}

impl HeaderExtractor {
    pub fn new(header: HeaderName, direction: Direction, version: HttpVersion) -> Self {
        Self { header, direction, version }
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }
}

impl BufferExtractor for HeaderExtractor {
    fn get_data<'a>(
        &self,
        det_ctx: &'a mut DetectEngineThreadCtx,
        transforms: &DetectEngineTransforms,
        _flow_flags: Direction,
        tx: &dyn Transaction,
        list_id: BufferId,
    ) -> Option<&'a InspectionBuffer> {
        if det_ctx.inspection_buffer(list_id).is_filled() {
            return det_ctx.filled_buffer(list_id);
        }

        let source = HeaderSource::from_transaction(tx).filter(|source| source.version() == self.version)?;
        let Some(value) = source.lookup_header(self.direction, &self.header) else {
            debug!(header = %self.header, direction = %self.direction, version = %self.version, "header not available");
            return None;
        };

        Some(det_ctx.setup_and_apply_transforms(list_id, &value, transforms))
    }
}
