use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A note exactly as it was captured. The timestamp doubles as the identifier of the note, so it
/// is never rewritten once the line is in the raw log.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize, Clone)]
pub struct RawEntry {
    pub timestamp: Arc<str>,
    pub raw_content: Arc<str>,
}

impl RawEntry {
    pub fn new(timestamp: impl Into<Arc<str>>, raw_content: impl Into<Arc<str>>) -> Self {
        Self {
            timestamp: timestamp.into(),
            raw_content: raw_content.into(),
        }
    }
}

/// One category × domain combination of a note. Several records may share a timestamp, in which
/// case `action`, `reference` and `thoughts` point to the same strings.
///
/// Absent facets are serialized as `null` rather than skipped, the reporting side relies on every
/// key being present.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize, Clone)]
pub struct NormalizedRecord {
    pub timestamp: Arc<str>,
    pub raw_content: Arc<str>,
    pub category: Option<Arc<str>>,
    pub action: Option<Arc<str>>,
    pub domain: Option<Arc<str>>,
    pub reference: Option<Arc<str>>,
    pub thoughts: Option<Arc<str>>,
}

impl NormalizedRecord {
    pub fn with_category(self, category: Option<&str>) -> Self {
        Self {
            category: category.map(Into::into),
            ..self
        }
    }

    pub fn with_domain(self, domain: Option<&str>) -> Self {
        Self {
            domain: domain.map(Into::into),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::{NormalizedRecord, RawEntry};

    #[test]
    fn raw_entry_ignores_unknown_keys() -> Result<()> {
        let entry: RawEntry = serde_json::from_str(
            r###"{"timestamp": "2026-01-01 12:00:00", "raw_content": "## 工作", "parsed": null}"###,
        )?;
        assert_eq!(entry, RawEntry::new("2026-01-01 12:00:00", "## 工作"));
        Ok(())
    }

    #[test]
    fn normalized_record_keeps_null_keys() -> Result<()> {
        let record = NormalizedRecord {
            timestamp: "2026-01-01 12:00:00".into(),
            raw_content: "“hi”".into(),
            category: None,
            action: None,
            domain: None,
            reference: None,
            thoughts: Some("hi".into()),
        };
        assert_eq!(
            serde_json::to_string(&record)?,
            r#"{"timestamp":"2026-01-01 12:00:00","raw_content":"“hi”","category":null,"action":null,"domain":null,"reference":null,"thoughts":"hi"}"#
        );
        Ok(())
    }
}
