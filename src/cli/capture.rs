use std::path::Path;

use anyhow::Result;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use crate::{
    capture::{backfill, save_record, update_vocabulary},
    processing::{gate::ReprocessGate, reprocess::run_reprocess},
    storage::{
        normalized::NormalizedLog, raw_log::RawLog, vocabulary::VocabularyStore,
        REPROCESS_LOCK_FILE,
    },
    utils::clock::DefaultClock,
};

/// Stores a note. When no text is given the note is read from stdin, which allows piping from an
/// editor or a hotkey script.
pub async fn process_note_command(dir: &Path, text: Option<String>) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            text
        }
    };

    let Some(entry) = save_record(&RawLog::new(dir), &DefaultClock, &text).await else {
        println!("Nothing saved");
        return Ok(());
    };
    println!("Saved {}", entry.timestamp);

    // The note is already stored, a broken vocabulary shouldn't turn that into a failure.
    match update_vocabulary(&VocabularyStore::new(dir), &entry).await {
        Ok(true) => info!("Vocabulary updated"),
        Ok(false) => {}
        Err(e) => error!("Failed to update vocabulary {e:?}"),
    }
    Ok(())
}

pub async fn process_backfill_command(
    dir: &Path,
    from: &str,
    to: &str,
    texts: &[String],
) -> Result<()> {
    let added = backfill(&RawLog::new(dir), from, to, texts, &mut rand::rng()).await?;
    for entry in &added {
        let preview = entry.raw_content.chars().take(30).collect::<String>();
        println!("[added] {} | {}", entry.timestamp, preview.replace('\n', " "));
    }
    println!("Added {} notes", added.len());
    Ok(())
}

pub async fn process_reprocess_command(dir: &Path) -> Result<()> {
    let gate = ReprocessGate::acquire(&dir.join(REPROCESS_LOCK_FILE)).await?;
    let result = run_reprocess(&RawLog::new(dir), &NormalizedLog::new(dir)).await;
    gate.release().await?;

    let summary = result?;
    println!(
        "Parsed {} notes into {} records",
        summary.entries, summary.records
    );
    Ok(())
}

pub async fn process_hints_command(dir: &Path) -> Result<()> {
    let vocabulary = VocabularyStore::new(dir).load().await?;
    for hint in vocabulary.hints() {
        println!("{hint}");
    }
    Ok(())
}
