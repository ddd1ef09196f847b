use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::notes::entities::NormalizedRecord;

use super::VOCABULARY_FILE;

/// Tags seen so far. Used only for rendering hints at capture time, so it is fine for it to lag
/// behind the raw log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        fn owned(values: &[&str]) -> Vec<String> {
            values.iter().map(|v| v.to_string()).collect()
        }

        Self {
            categories: owned(&["学习", "工作", "游乐", "想法"]),
            actions: owned(&["读论文", "数据处理", "写代码", "看书"]),
            domains: owned(&["统计", "心理学", "数学"]),
        }
    }
}

impl Vocabulary {
    /// Adds values never seen before, keeping the order they first appeared in. The flag tells
    /// whether the vocabulary has to be saved.
    pub fn merge<'a>(
        mut self,
        records: impl IntoIterator<Item = &'a NormalizedRecord>,
    ) -> (Self, bool) {
        let mut changed = false;
        for record in records {
            changed |= push_new(&mut self.categories, record.category.as_deref());
            changed |= push_new(&mut self.actions, record.action.as_deref());
            changed |= push_new(&mut self.domains, record.domain.as_deref());
        }
        (self, changed)
    }

    /// Lines shown next to the capture input.
    pub fn hints(&self) -> Vec<String> {
        vec![
            format!("## {}", self.categories.join(" ")),
            format!("### {}", self.actions.join(" ")),
            format!("@ {}", self.domains.join(" ")),
            "$$ reference material worth keeping for later".to_string(),
            "“” a line your future self might smile at".to_string(),
        ]
    }
}

fn push_new(known: &mut Vec<String>, value: Option<&str>) -> bool {
    match value {
        Some(value) if !known.iter().any(|v| v == value) => {
            known.push(value.to_string());
            true
        }
        _ => false,
    }
}

pub struct VocabularyStore {
    path: PathBuf,
}

impl VocabularyStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(VOCABULARY_FILE),
        }
    }

    /// Loads the vocabulary. A missing file is created with the defaults, an unreadable one falls
    /// back to the defaults without being overwritten.
    pub async fn load(&self) -> Result<Vocabulary> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let vocabulary = Vocabulary::default();
                self.save(&vocabulary).await?;
                return Ok(vocabulary);
            }
            Err(e) => {
                warn!("Failed to read vocabulary {:?}: {e}", self.path);
                return Ok(Vocabulary::default());
            }
        };

        match serde_json::from_str(&content) {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!("Vocabulary {:?} is corrupted {e}", self.path);
                Ok(Vocabulary::default())
            }
        }
    }

    pub async fn save(&self, vocabulary: &Vocabulary) -> Result<()> {
        let content = serde_json::to_string_pretty(vocabulary)?;
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to save vocabulary {:?}", self.path))?;
        info!("Saved vocabulary {:?}", self.path);
        Ok(())
    }
}
