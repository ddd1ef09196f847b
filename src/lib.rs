//! Tag-based activity journal. Notes are stored as they were written, parsed into one record per
//! tag combination and summarized as heatmaps and statistics from a terminal.
//!

pub mod capture;
pub mod cli;
pub mod fs;
pub mod notes;
pub mod processing;
pub mod report;
pub mod storage;
pub mod utils;
