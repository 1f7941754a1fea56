//! Compiled rule sets and the per-transaction detection pass.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::trace;

use crate::prefilter::{MpmPattern, PrefilterEngine};
use crate::utils::ensure;
use crate::{AppProto, BufferId, DetectEngine, DetectEngineThreadCtx, DetectEngineTransforms, Direction, DirectionSet, SetupError, SigId, Signature, Transaction};

/// A rule set compiled against a frozen [`DetectEngine`].
///
/// Shared read-only between workers; all per-inspection state lives in the
/// worker's [`DetectEngineThreadCtx`].
#[derive(Debug)]
pub struct DetectEngineCtx {
    engine: Arc<DetectEngine>,
    signatures: Vec<Signature>,
    prefilter: Vec<PrefilterEngine>,
    // (protocol, direction) cells in which a signature is reached through a prefilter engine
    prefilter_cells: Vec<Vec<(AppProto, Direction)>>,
}

impl DetectEngineCtx {
    /// Finalises `signatures` and builds the prefilter engines.
    ///
    /// # Errors
    ///
    /// Returns the first [`SetupError`] of a signature that can't be inspected:
    /// a sticky buffer without content, or buffers that share no direction.
    pub fn build(engine: Arc<DetectEngine>, mut signatures: Vec<Signature>) -> Result<Self, SetupError> {
        for sig in &mut signatures {
            finalize_directions(&engine, sig)?;
        }
        assign_slots(&engine, &mut signatures);

        let (prefilter, prefilter_cells) = build_prefilter(&engine, &signatures);
        trace!(signatures = signatures.len(), prefilter = prefilter.len(), "rule set compiled");

        Ok(Self { engine, signatures, prefilter, prefilter_cells })
    }

    pub fn engine(&self) -> &DetectEngine {
        &self.engine
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn prefilter_engines(&self) -> &[PrefilterEngine] {
        &self.prefilter
    }

    /// Runs the rule set against `tx` in `direction` and returns the matching signature ids.
    ///
    /// The worker's inspection buffers are cleared before returning.
    pub fn detect_tx(&self, det_ctx: &mut DetectEngineThreadCtx, direction: Direction, tx: &dyn Transaction) -> Vec<SigId> {
        let alproto = tx.app_proto();
        let progress = tx.progress(direction);

        let mut candidates = vec![false; self.signatures.len()];
        for engine in &self.prefilter {
            if engine.applies_to(alproto, direction, progress) {
                engine.run(det_ctx, tx, &mut candidates);
            }
        }

        let mut matches = Vec::new();
        for (index, sig) in self.signatures.iter().enumerate() {
            let prefiltered = self.prefilter_cells[index].contains(&(alproto, direction));
            if prefiltered && !candidates[index] {
                continue;
            }
            if self.inspect_signature(det_ctx, sig, direction, tx) {
                matches.push(sig.id());
            }
        }

        det_ctx.clear_buffers();
        trace!(%alproto, %direction, progress, matches = matches.len(), "transaction inspected");
        matches
    }

    fn inspect_signature(&self, det_ctx: &mut DetectEngineThreadCtx, sig: &Signature, direction: Direction, tx: &dyn Transaction) -> bool {
        let alproto = tx.app_proto();
        if !sig.directions().has(direction) || !sig.app_proto().matches(alproto) {
            return false;
        }

        let progress = tx.progress(direction);
        sig.lists().iter().all(|list| match self.engine.inspect_engine(list.list_id(), alproto, direction) {
            Some(engine) if progress >= engine.progress() => (engine.inspect_fn())(det_ctx, engine, list, direction, tx),
            _ => false,
        })
    }
}

fn finalize_directions(engine: &DetectEngine, sig: &mut Signature) -> Result<(), SetupError> {
    let mut allowed = DirectionSet::all();
    for list in sig.lists() {
        let buffer_name = || engine.buffer_name(list.list_id()).unwrap_or_default().to_owned();
        if list.contents().is_empty() {
            return Err(SetupError::EmptyStickyBuffer { sig: sig.id(), buffer: buffer_name() });
        }

        let directions = engine.buffer_directions(list.list_id());
        if let Some(direction) = sig.direction() {
            if !directions.has(direction) {
                return Err(SetupError::BufferNotInDirection { sig: sig.id(), buffer: buffer_name(), direction });
            }
        }
        allowed &= directions;
    }

    let directions = sig.direction().map_or(allowed, Into::into);
    ensure!(!directions.is_empty(), SetupError::NoDirection { sig: sig.id() });
    sig.set_directions(directions);
    Ok(())
}

/// Gives every (buffer, transform chain) pair its own inspection slot.
fn assign_slots(engine: &DetectEngine, signatures: &mut [Signature]) {
    let base = engine.buffer_types().len();
    let mut derived: HashMap<(BufferId, DetectEngineTransforms), BufferId> = HashMap::new();

    for sig in signatures {
        for list in sig.lists_mut() {
            if list.transforms().is_empty() {
                continue;
            }
            let next = BufferId::from_index(base + derived.len());
            let slot_id = *derived.entry((list.list_id(), list.transforms().clone())).or_insert(next);
            list.set_slot_id(slot_id);
        }
    }
}

type PrefilterBuckets = BTreeMap<(usize, BufferId), (DetectEngineTransforms, Vec<MpmPattern>)>;

fn build_prefilter(engine: &DetectEngine, signatures: &[Signature]) -> (Vec<PrefilterEngine>, Vec<Vec<(AppProto, Direction)>>) {
    let mut buckets = PrefilterBuckets::new();
    let mut cells = vec![Vec::new(); signatures.len()];

    for (sig_index, sig) in signatures.iter().enumerate() {
        // highest priority buffer wins, the first one on ties
        let best = sig
            .lists()
            .iter()
            .filter_map(|list| Some((engine.mpm_priority(list.list_id())?, list, list.fast_pattern()?)))
            .rev()
            .max_by_key(|(priority, _, _)| *priority);
        let Some((_, list, content)) = best else {
            continue;
        };

        for (mpm_index, mpm) in engine.mpm_entries().iter().enumerate() {
            if mpm.list_id() != list.list_id() || !sig.directions().has(mpm.direction()) || !sig.app_proto().matches(mpm.alproto()) {
                continue;
            }
            buckets
                .entry((mpm_index, list.slot_id()))
                .or_insert_with(|| (list.transforms().clone(), Vec::new()))
                .1
                .push(MpmPattern { content: content.clone(), sig_index });
            cells[sig_index].push((mpm.alproto(), mpm.direction()));
        }
    }

    let prefilter = buckets
        .into_iter()
        .map(|((mpm_index, slot_id), (transforms, patterns))| {
            let mpm = &engine.mpm_entries()[mpm_index];
            (mpm.registrar())(mpm, slot_id, &transforms, patterns)
        })
        .collect();

    (prefilter, cells)
}
