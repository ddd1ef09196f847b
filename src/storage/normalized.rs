use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::{
    fs::operations::{overwrite_json_lines, read_json_lines},
    notes::entities::NormalizedRecord,
};

use super::{NormalizedStore, NORMALIZED_FILE};

/// File backed [NormalizedStore]. Only the reprocessor writes here.
pub struct NormalizedLog {
    path: PathBuf,
}

impl NormalizedLog {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(NORMALIZED_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NormalizedStore for NormalizedLog {
    async fn replace_all(&self, records: &[NormalizedRecord]) -> Result<()> {
        overwrite_json_lines(&self.path, records).await
    }

    async fn read_all(&self) -> Result<Vec<NormalizedRecord>> {
        read_json_lines(&self.path).await
    }
}
