use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Arc,
};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::{notes::entities::NormalizedRecord, utils::time::parse_timestamp};

/// A captured note folded back together from its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub moment: NaiveDateTime,
    pub categories: BTreeSet<Arc<str>>,
    pub domains: BTreeSet<Arc<str>>,
    pub action: Option<Arc<str>>,
    pub thoughts: Option<Arc<str>>,
}

/// Groups records by timestamp. Notes are returned oldest first.
pub fn aggregate_notes(records: &[NormalizedRecord]) -> Vec<NoteSummary> {
    let mut notes = BTreeMap::<(NaiveDateTime, Arc<str>), NoteSummary>::new();

    for record in records {
        let Some(moment) = parse_timestamp(&record.timestamp) else {
            warn!("Skipping record with illegal timestamp {}", record.timestamp);
            continue;
        };
        let note = notes
            .entry((moment, record.timestamp.clone()))
            .or_insert_with(|| NoteSummary {
                moment,
                categories: BTreeSet::new(),
                domains: BTreeSet::new(),
                action: None,
                thoughts: None,
            });
        note.categories.extend(record.category.clone());
        note.domains.extend(record.domain.clone());
        if note.action.is_none() {
            note.action = record.action.clone();
        }
        if note.thoughts.is_none() {
            note.thoughts = record.thoughts.clone();
        }
    }

    notes.into_values().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    pub total_notes: usize,
    pub active_days: usize,
    pub top_domain: Option<Arc<str>>,
    pub top_activity: Option<Arc<str>>,
}

/// Headline numbers of a period. The top domain is counted over notes, so a note tagged with two
/// categories doesn't count its domain twice. The top activity is counted over all category and
/// action values of records.
pub fn overview(records: &[NormalizedRecord], notes: &[NoteSummary]) -> Overview {
    let active_days = notes
        .iter()
        .map(|v| v.moment.date())
        .collect::<BTreeSet<_>>()
        .len();

    let top_domain = most_frequent(notes.iter().flat_map(|v| v.domains.iter()));
    let top_activity = most_frequent(
        records
            .iter()
            .flat_map(|v| v.category.iter().chain(v.action.iter())),
    );

    Overview {
        total_notes: notes.len(),
        active_days,
        top_domain,
        top_activity,
    }
}

/// Ties go to the smallest value, so the result doesn't depend on the record order.
fn most_frequent<'a>(values: impl Iterator<Item = &'a Arc<str>>) -> Option<Arc<str>> {
    let mut counts = HashMap::<&Arc<str>, usize>::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(value, _)| value.clone())
}

/// Number of notes per day from the first to the last note, days without notes included.
pub fn daily_activity(notes: &[NoteSummary]) -> Vec<(NaiveDate, usize)> {
    let mut per_day = BTreeMap::<NaiveDate, usize>::new();
    for note in notes {
        *per_day.entry(note.moment.date()).or_default() += 1;
    }

    let (Some(first), Some(last)) = (
        per_day.first_key_value().map(|v| *v.0),
        per_day.last_key_value().map(|v| *v.0),
    ) else {
        return vec![];
    };

    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| (day, per_day.get(&day).copied().unwrap_or(0)))
        .collect()
}

/// Newest notes first.
pub fn recent_notes(notes: &[NoteSummary], limit: usize) -> Vec<&NoteSummary> {
    notes.iter().rev().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::notes::{
        entities::{NormalizedRecord, RawEntry},
        expand::normalize,
    };

    use super::{aggregate_notes, daily_activity, overview, recent_notes};

    fn records(notes: &[(&str, &str)]) -> Vec<NormalizedRecord> {
        notes
            .iter()
            .flat_map(|(timestamp, text)| normalize(&RawEntry::new(*timestamp, *text)))
            .collect()
    }

    fn sample() -> Vec<NormalizedRecord> {
        records(&[
            ("2026-01-03 10:00:00", "## 生活\n### 做饭\n“好吃”"),
            ("2026-01-01 11:00:00", "## 学习 工作\n### 写代码\n@ 统计 心理学\n“first”"),
            ("2026-01-01 12:00:00", "## 工作\n@ 统计"),
            ("not a time", "## 工作"),
        ])
    }

    #[test]
    fn folds_records_back_into_notes() {
        let notes = aggregate_notes(&sample());
        assert_eq!(notes.len(), 3);

        let first = &notes[0];
        assert_eq!(first.moment.to_string(), "2026-01-01 11:00:00");
        assert_eq!(first.categories.len(), 2);
        assert_eq!(first.domains.len(), 2);
        assert_eq!(first.action.as_deref(), Some("写代码"));
        assert_eq!(first.thoughts.as_deref(), Some("first"));

        assert_eq!(notes[2].thoughts.as_deref(), Some("好吃"));
        assert!(notes[2].domains.is_empty());
    }

    #[test]
    fn overview_counts() {
        let records = sample();
        let notes = aggregate_notes(&records);
        let overview = overview(&records, &notes);
        assert_eq!(overview.total_notes, 3);
        assert_eq!(overview.active_days, 2);
        assert_eq!(overview.top_domain.as_deref(), Some("统计"));
        // 写代码 and 工作 both show up in 4 records, the smaller value wins
        assert_eq!(overview.top_activity.as_deref(), Some("写代码"));
    }

    #[test]
    fn overview_of_nothing() {
        let overview = overview(&[], &[]);
        assert_eq!(overview.total_notes, 0);
        assert_eq!(overview.top_domain, None);
        assert_eq!(overview.top_activity, None);
    }

    #[test]
    fn daily_activity_fills_gaps() {
        let notes = aggregate_notes(&sample());
        let date = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
        assert_eq!(
            daily_activity(&notes),
            vec![(date(1), 2), (date(2), 0), (date(3), 1)]
        );
        assert!(daily_activity(&[]).is_empty());
    }

    #[test]
    fn recent_notes_are_newest_first() {
        let notes = aggregate_notes(&sample());
        let recent = recent_notes(&notes, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].action.as_deref(), Some("做饭"));
        assert_eq!(recent[1].moment.to_string(), "2026-01-01 12:00:00");
    }
}
