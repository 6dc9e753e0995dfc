// Handler for the maintenance pass that re-derives every reading chain.
use shared::utils;

use crate::billing::rebuild_chains;
use crate::data::{Ledger, RecordStore};
use crate::error::EngineResult;

pub fn handle_recompute_all<S: RecordStore>(ledger: &mut Ledger<S>) -> EngineResult<usize> {
    let now = utils::now_timestamp();
    let changed = ledger.commit(|l| Ok(rebuild_chains(l.records_mut(), now)))?;
    tracing::info!(changed, "Reading chains recomputed");
    Ok(changed)
}
