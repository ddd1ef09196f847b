//! Writing notes into the raw log. [save_record] is what the capture surface calls for every
//! submitted note, [backfill] adds notes after the fact.

use anyhow::Result;
use chrono::NaiveDateTime;
use rand::Rng;
use tracing::{error, info, warn};

use crate::{
    notes::{entities::RawEntry, expand::normalize},
    storage::{raw_log::RawLog, vocabulary::VocabularyStore},
    utils::{
        clock::Clock,
        time::{format_timestamp, parse_range_end, parse_timestamp},
    },
};

/// Stores a note with the current time. Blank notes are dropped. Failures end up in the log only,
/// the capture surface has no way of showing them.
pub async fn save_record(log: &RawLog, clock: &impl Clock, text: &str) -> Option<RawEntry> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let entry = RawEntry::new(format_timestamp(clock.now()), text);
    match log.append(&entry).await {
        Ok(()) => {
            info!("Saved note {}", entry.timestamp);
            Some(entry)
        }
        Err(e) => {
            error!("Error saving note {e:?}");
            None
        }
    }
}

/// Feeds the tags of a freshly captured note into the vocabulary. Returns whether new tags were
/// found.
pub async fn update_vocabulary(store: &VocabularyStore, entry: &RawEntry) -> Result<bool> {
    let records = normalize(entry);
    if records.is_empty() {
        return Ok(false);
    }

    let (vocabulary, changed) = store.load().await?.merge(&records);
    if changed {
        store.save(&vocabulary).await?;
    }
    Ok(changed)
}

/// Picks a moment between `start` and `end`, both inclusive. An empty or inverted range yields
/// `start`.
pub fn random_moment(
    start: NaiveDateTime,
    end: NaiveDateTime,
    rng: &mut impl Rng,
) -> NaiveDateTime {
    let seconds = (end - start).num_seconds();
    if seconds <= 0 {
        return start;
    }
    start + chrono::Duration::seconds(rng.random_range(0..=seconds))
}

/// Appends notes that happened sometime between `from` and `to`. Each note gets its own random
/// moment in the range. `to` given as a bare date stands for the end of that day.
pub async fn backfill(
    log: &RawLog,
    from: &str,
    to: &str,
    texts: &[String],
    rng: &mut impl Rng,
) -> Result<Vec<RawEntry>> {
    let start = parse_timestamp(from)
        .ok_or_else(|| anyhow::anyhow!("Can't parse {from} as the start of the range"))?;
    let end = parse_range_end(to)
        .ok_or_else(|| anyhow::anyhow!("Can't parse {to} as the end of the range"))?;

    let mut added = vec![];
    for text in texts {
        let text = text.trim();
        if text.is_empty() {
            warn!("Skipping blank note");
            continue;
        }
        let entry = RawEntry::new(format_timestamp(random_moment(start, end, rng)), text);
        log.append(&entry).await?;
        added.push(entry);
    }
    Ok(added)
}
