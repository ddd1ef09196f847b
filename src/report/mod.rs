//! Reports over normalized records. [bucketing] splits a period into calendar columns,
//! [heatmap] counts facet values per column and [analysis] computes the rest of the dashboard.

pub mod analysis;
pub mod bucketing;
pub mod heatmap;

use chrono::{Duration, NaiveDate};
use tracing::warn;

use crate::{notes::entities::NormalizedRecord, utils::time::timestamp_date};

use self::{
    bucketing::{BucketSequence, Granularity},
    heatmap::{build_heatmap, Facet, Heatmap},
};

/// Length of the period shown when the user didn't ask for one.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Inclusive range of days a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The last [DEFAULT_WINDOW_DAYS] days before the newest record, but never before the oldest
    /// one.
    pub fn recent(records: &[NormalizedRecord]) -> Option<Self> {
        let (min, max) = record_range(records)?;
        Some(Self {
            start: min.max(max - Duration::days(DEFAULT_WINDOW_DAYS)),
            end: max,
        })
    }
}

/// Oldest and newest day among the records. Records with broken timestamps don't count.
pub fn record_range(records: &[NormalizedRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = records.iter().filter_map(|v| timestamp_date(&v.timestamp));
    let first = dates.next()?;
    Some(dates.fold((first, first), |(min, max), date| {
        (min.min(date), max.max(date))
    }))
}

/// Records captured within `window`.
pub fn filter_window(records: &[NormalizedRecord], window: DateWindow) -> Vec<NormalizedRecord> {
    records
        .iter()
        .filter(|record| match timestamp_date(&record.timestamp) {
            Some(date) => window.contains(date),
            None => {
                warn!("Skipping record with illegal timestamp {}", record.timestamp);
                false
            }
        })
        .cloned()
        .collect()
}

/// Builds one heatmap per facet. All of them share the columns, which span every record
/// regardless of whether it carries the facet.
pub fn build_heatmaps(
    records: &[NormalizedRecord],
    facets: &[Facet],
    granularity: Option<Granularity>,
) -> Vec<(Facet, Heatmap)> {
    let Some((min, max)) = record_range(records) else {
        return facets.iter().map(|v| (*v, Heatmap::NoData)).collect();
    };
    let buckets = match granularity {
        Some(granularity) => BucketSequence::with_granularity(min, max, granularity),
        None => BucketSequence::spanning(min, max),
    };

    facets
        .iter()
        .map(|facet| (*facet, build_heatmap(records, *facet, &buckets)))
        .collect()
}
