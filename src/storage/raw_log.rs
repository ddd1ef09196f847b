use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::{
    fs::operations::{append_json_line, read_json_lines},
    notes::entities::RawEntry,
};

use super::{RawEntrySource, RAW_LOG_FILE};

/// Append only log of captured notes.
pub struct RawLog {
    path: PathBuf,
}

impl RawLog {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(RAW_LOG_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, entry: &RawEntry) -> Result<()> {
        append_json_line(&self.path, entry).await
    }
}

impl RawEntrySource for RawLog {
    async fn read_raw_entries(&self) -> Result<Vec<RawEntry>> {
        read_json_lines(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;
    use tempfile::tempdir;

    use crate::{
        notes::entities::RawEntry,
        storage::{RawEntrySource, RAW_LOG_FILE},
    };

    use super::RawLog;

    #[tokio::test]
    async fn appends_in_capture_order() -> Result<()> {
        let dir = tempdir()?;
        let log = RawLog::new(dir.path());
        assert!(log.read_raw_entries().await?.is_empty());

        let first = RawEntry::new("2026-01-01 11:00:00", "## 工作");
        let second = RawEntry::new("2026-01-01 12:00:00", "### 做饭");
        log.append(&first).await?;
        log.append(&second).await?;

        assert_eq!(log.read_raw_entries().await?, vec![first, second]);
        assert_eq!(log.path(), dir.path().join(RAW_LOG_FILE));
        Ok(())
    }

    #[tokio::test]
    async fn capture_after_crash_survives() -> Result<()> {
        let dir = tempdir()?;
        let log = RawLog::new(dir.path());
        let first = RawEntry::new("2026-01-01 10:00:00", "## a");
        log.append(&first).await?;
        std::fs::OpenOptions::new()
            .append(true)
            .open(log.path())?
            .write_all(br#"{"timestamp": "2026-01-01 11:00:00", "raw_cont"#)?;

        let second = RawEntry::new("2026-01-01 12:00:00", "## b");
        log.append(&second).await?;

        assert_eq!(log.read_raw_entries().await?, vec![first, second]);
        Ok(())
    }
}
