//! Rebuilding of the normalized store. The raw log is the source of truth, whenever the grammar
//! changes the whole history is replayed through [reprocess::reprocess].

pub mod gate;
pub mod reprocess;
