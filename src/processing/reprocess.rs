use anyhow::Result;
use tracing::{info, instrument};

use crate::{
    notes::{
        entities::{NormalizedRecord, RawEntry},
        expand::normalize,
    },
    storage::{NormalizedStore, RawEntrySource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReprocessSummary {
    pub entries: usize,
    pub records: usize,
}

/// Replays the raw history through the current grammar. Output order follows the raw log, and
/// records of a single entry follow the sorted category then domain order, so the same log always
/// gives the same output.
pub fn reprocess(entries: &[RawEntry]) -> Vec<NormalizedRecord> {
    entries.iter().flat_map(normalize).collect()
}

/// Reads everything from `source` and overwrites `store` with the result. Callers must make sure
/// only one run touches a store at a time, see [super::gate::ReprocessGate].
#[instrument(skip_all)]
pub async fn run_reprocess(
    source: &impl RawEntrySource,
    store: &impl NormalizedStore,
) -> Result<ReprocessSummary> {
    let entries = source.read_raw_entries().await?;
    let records = reprocess(&entries);
    store.replace_all(&records).await?;

    let summary = ReprocessSummary {
        entries: entries.len(),
        records: records.len(),
    };
    info!("Reprocessed {} entries into {} records", summary.entries, summary.records);
    Ok(summary)
}
