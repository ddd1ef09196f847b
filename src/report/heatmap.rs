use std::{collections::BTreeMap, fmt::Display, sync::Arc};

use clap::ValueEnum;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::{notes::entities::NormalizedRecord, utils::time::timestamp_date};

use super::bucketing::{BucketSequence, Granularity};

/// Facet a heatmap is built over.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Domain,
    Action,
    Category,
}

impl Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facet::Domain => write!(f, "domain"),
            Facet::Action => write!(f, "action"),
            Facet::Category => write!(f, "category"),
        }
    }
}

impl Facet {
    pub fn value<'a>(&self, record: &'a NormalizedRecord) -> Option<&'a Arc<str>> {
        match self {
            Facet::Domain => record.domain.as_ref(),
            Facet::Action => record.action.as_ref(),
            Facet::Category => record.category.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapRow {
    pub label: Arc<str>,
    /// One value per column, zero where nothing happened.
    pub counts: Vec<u32>,
    pub total: u32,
}

/// Facet value × bucket counts. Rows go from the least active value to the most active one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapMatrix {
    pub facet: Facet,
    pub granularity: Granularity,
    pub columns: Vec<String>,
    pub rows: Vec<HeatmapRow>,
    pub first_label: String,
    pub last_label: String,
}

impl HeatmapMatrix {
    pub fn row_labels(&self) -> Vec<Arc<str>> {
        self.rows.iter().map(|v| v.label.clone()).collect()
    }

    pub fn values(&self) -> Vec<Vec<u32>> {
        self.rows.iter().map(|v| v.counts.clone()).collect()
    }

    pub fn max_count(&self) -> u32 {
        self.rows
            .iter()
            .flat_map(|v| v.counts.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heatmap {
    /// No record carries the facet.
    NoData,
    Matrix(HeatmapMatrix),
}

/// Counts records per facet value and bucket. Records without the facet are dropped. Every
/// column of `buckets` is present in the result even when it counted nothing.
#[instrument(skip(records, buckets))]
pub fn build_heatmap(
    records: &[NormalizedRecord],
    facet: Facet,
    buckets: &BucketSequence,
) -> Heatmap {
    let mut rows = BTreeMap::<Arc<str>, Vec<u32>>::new();

    for record in records {
        let Some(value) = facet.value(record) else {
            continue;
        };
        let Some(date) = timestamp_date(&record.timestamp) else {
            warn!("Skipping record with illegal timestamp {}", record.timestamp);
            continue;
        };
        let Some(column) = buckets.position(date) else {
            debug!("Record {} is outside of the heatmap range", record.timestamp);
            continue;
        };
        let counts = rows
            .entry(value.clone())
            .or_insert_with(|| vec![0; buckets.len()]);
        counts[column] += 1;
    }

    if rows.is_empty() {
        return Heatmap::NoData;
    }

    let mut rows = rows
        .into_iter()
        .map(|(label, counts)| HeatmapRow {
            total: counts.iter().sum(),
            label,
            counts,
        })
        .collect::<Vec<_>>();
    // Stable, rows with the same total keep the label order of the map.
    rows.sort_by_key(|v| v.total);

    Heatmap::Matrix(HeatmapMatrix {
        facet,
        granularity: buckets.granularity(),
        columns: buckets.buckets().iter().map(|v| v.label.clone()).collect(),
        rows,
        first_label: buckets.first_label().unwrap_or_default(),
        last_label: buckets.last_label().unwrap_or_default(),
    })
}
