use std::path::Path;

use anyhow::{Context, Result};
use fs4::tokio::AsyncFileExt;
use tokio::fs::File;
use tracing::debug;

/// Exclusive lock held around a reprocessing run. Two runs against the same data directory would
/// race on the overwrite of the normalized store, so the second one waits here.
pub struct ReprocessGate {
    file: File,
}

impl ReprocessGate {
    pub async fn acquire(lock_path: &Path) -> Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .await
            .with_context(|| format!("Failed to open lock {lock_path:?}"))?;
        file.lock_exclusive()?;
        debug!("Acquired {lock_path:?}");
        Ok(Self { file })
    }

    pub async fn release(self) -> Result<()> {
        self.file.unlock_async().await?;
        Ok(())
    }
}
