//!  Storage is organized as a data directory with a few files:
//!   - The raw log, where every captured note is appended once and never touched again.
//!   - The normalized store, which is rebuilt from the raw log by the reprocessor.
//!   - The vocabulary, tags seen so far, used for hints during capture.

pub mod normalized;
pub mod raw_log;
pub mod vocabulary;

use std::future::Future;

use anyhow::Result;

use crate::notes::entities::{NormalizedRecord, RawEntry};

pub const RAW_LOG_FILE: &str = "daily_log.jsonl";
pub const NORMALIZED_FILE: &str = "parsed_logs.jsonl";
pub const VOCABULARY_FILE: &str = "hints_config.json";
pub const REPROCESS_LOCK_FILE: &str = "reprocess.lock";

/// Interface for abstracting where raw notes are read from.
pub trait RawEntrySource {
    /// Every raw entry in the order it was captured. Nothing stored yet means an empty vector.
    fn read_raw_entries(&self) -> impl Future<Output = Result<Vec<RawEntry>>>;
}

/// Interface for abstracting storage of normalized records.
pub trait NormalizedStore {
    /// Replaces everything stored with `records`.
    fn replace_all(&self, records: &[NormalizedRecord]) -> impl Future<Output = Result<()>>;

    fn read_all(&self) -> impl Future<Output = Result<Vec<NormalizedRecord>>>;
}
