use std::fmt::Display;

use chrono::{Datelike, Days, Months, NaiveDate};
use clap::ValueEnum;
use serde::Serialize;

/// Days between 0001-01-01 and 1970-01-01. Multi-day blocks are counted from the unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Size of a heatmap column. Ordered from the finest to the coarsest.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    Daily,
    TwoDays,
    FourDays,
    Weekly,
    Monthly,
}

impl Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Daily => write!(f, "per day"),
            Granularity::TwoDays => write!(f, "per 2 days"),
            Granularity::FourDays => write!(f, "per 4 days"),
            Granularity::Weekly => write!(f, "per week"),
            Granularity::Monthly => write!(f, "per month"),
        }
    }
}

impl Granularity {
    /// Picks a granularity that keeps the number of columns readable. `days_span` counts both ends,
    /// a range within a single day is 1 day long.
    pub fn for_range(min: NaiveDate, max: NaiveDate) -> Self {
        let days_span = (max - min).num_days() + 1;
        if days_span > 196 {
            Granularity::Monthly
        } else if days_span > 112 {
            Granularity::Weekly
        } else if days_span > 56 {
            Granularity::FourDays
        } else if days_span > 28 {
            Granularity::TwoDays
        } else {
            Granularity::Daily
        }
    }

    /// First day of the bucket containing `date`.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date,
            Granularity::TwoDays => floor_days(date, 2),
            Granularity::FourDays => floor_days(date, 4),
            Granularity::Weekly => date - Days::new(date.weekday().num_days_from_monday() as u64),
            Granularity::Monthly => date - Days::new(date.day0() as u64),
        }
    }

    /// First day of the bucket following the one starting at `start`. None only at the end of
    /// the calendar.
    fn next_start(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Daily => start.checked_add_days(Days::new(1)),
            Granularity::TwoDays => start.checked_add_days(Days::new(2)),
            Granularity::FourDays => start.checked_add_days(Days::new(4)),
            Granularity::Weekly => start.checked_add_days(Days::new(7)),
            Granularity::Monthly => start.checked_add_months(Months::new(1)),
        }
    }

    /// Sortable identifier of the bucket starting at `start`.
    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            Granularity::Monthly => start.format("%Y-%m").to_string(),
            _ => start.format("%Y-%m-%d").to_string(),
        }
    }

    /// Short label used on the heatmap boundaries. Daily columns drop the year.
    pub fn display_label(&self, start: NaiveDate) -> String {
        match self {
            Granularity::Daily => start.format("%m-%d").to_string(),
            _ => self.label(start),
        }
    }
}

fn floor_days(date: NaiveDate, days: i32) -> NaiveDate {
    let since_epoch = date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE;
    date - Days::new(since_epoch.rem_euclid(days) as u64)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub start: NaiveDate,
    pub label: String,
}

/// Every bucket between two dates, including the empty ones. Serves as the column skeleton of a
/// heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSequence {
    granularity: Granularity,
    buckets: Vec<Bucket>,
}

impl BucketSequence {
    /// Covers `[min, max]` with the granularity chosen by [Granularity::for_range].
    pub fn spanning(min: NaiveDate, max: NaiveDate) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self::with_granularity(min, max, Granularity::for_range(min, max))
    }

    pub fn with_granularity(min: NaiveDate, max: NaiveDate, granularity: Granularity) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let buckets = std::iter::successors(Some(granularity.bucket_start(min)), |start| {
            granularity.next_start(*start)
        })
        .take_while(|start| *start <= max)
        .map(|start| Bucket {
            start,
            label: granularity.label(start),
        })
        .collect();

        Self {
            granularity,
            buckets,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Column index of the bucket containing `date`, None when the date is out of range.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        let start = self.granularity.bucket_start(date);
        self.buckets
            .binary_search_by(|bucket| bucket.start.cmp(&start))
            .ok()
    }

    pub fn first_label(&self) -> Option<String> {
        self.buckets
            .first()
            .map(|v| self.granularity.display_label(v.start))
    }

    pub fn last_label(&self) -> Option<String> {
        self.buckets
            .last()
            .map(|v| self.granularity.display_label(v.start))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Days, NaiveDate, Weekday};

    use super::{BucketSequence, Granularity};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn span(days: u64) -> (NaiveDate, NaiveDate) {
        let start = date(2025, 3, 14);
        (start, start + Days::new(days - 1))
    }

    #[test]
    fn granularity_thresholds() {
        let cases = [
            (1, Granularity::Daily),
            (10, Granularity::Daily),
            (28, Granularity::Daily),
            (29, Granularity::TwoDays),
            (30, Granularity::TwoDays),
            (56, Granularity::TwoDays),
            (57, Granularity::FourDays),
            (112, Granularity::FourDays),
            (113, Granularity::Weekly),
            (196, Granularity::Weekly),
            (197, Granularity::Monthly),
            (200, Granularity::Monthly),
            (900, Granularity::Monthly),
        ];
        for (days, expected) in cases {
            let (min, max) = span(days);
            assert_eq!(Granularity::for_range(min, max), expected, "{days}");
        }
    }

    #[test]
    fn bucket_starts() {
        let day = date(2026, 1, 15);
        assert_eq!(Granularity::Daily.bucket_start(day), day);
        assert_eq!(Granularity::Weekly.bucket_start(day), date(2026, 1, 12));
        assert_eq!(Granularity::Weekly.bucket_start(date(2026, 1, 12)), date(2026, 1, 12));
        assert_eq!(Granularity::Weekly.bucket_start(date(2026, 1, 18)), date(2026, 1, 12));
        assert_eq!(Granularity::Monthly.bucket_start(day), date(2026, 1, 1));

        // 1970-01-01 starts both block kinds
        assert_eq!(Granularity::TwoDays.bucket_start(date(1970, 1, 2)), date(1970, 1, 1));
        assert_eq!(Granularity::FourDays.bucket_start(date(1970, 1, 4)), date(1970, 1, 1));
        assert_eq!(Granularity::FourDays.bucket_start(date(1970, 1, 5)), date(1970, 1, 5));
        assert_eq!(Granularity::FourDays.bucket_start(date(1969, 12, 31)), date(1969, 12, 28));
    }

    #[test]
    fn labels() {
        assert_eq!(Granularity::Monthly.label(date(2026, 2, 1)), "2026-02");
        assert_eq!(Granularity::Weekly.label(date(2026, 1, 12)), "2026-01-12");
        assert_eq!(Granularity::Daily.display_label(date(2026, 1, 12)), "01-12");
        assert_eq!(Granularity::Monthly.display_label(date(2026, 2, 1)), "2026-02");
    }

    #[test]
    fn sequence_covers_range_without_gaps() {
        for granularity in [
            Granularity::Daily,
            Granularity::TwoDays,
            Granularity::FourDays,
            Granularity::Weekly,
            Granularity::Monthly,
        ] {
            let (min, max) = (date(2025, 11, 27), date(2026, 3, 3));
            let sequence = BucketSequence::with_granularity(min, max, granularity);

            let buckets = sequence.buckets();
            assert!(buckets[0].start <= min, "{granularity:?}");
            assert_eq!(sequence.position(max), Some(buckets.len() - 1), "{granularity:?}");
            for pair in buckets.windows(2) {
                assert!(pair[0].label < pair[1].label, "{granularity:?}");
            }

            let mut day = min;
            while day <= max {
                let position = sequence.position(day).unwrap();
                assert!(buckets[position].start <= day);
                if let Some(next) = buckets.get(position + 1) {
                    assert!(day < next.start);
                }
                day = day.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn weekly_sequence_starts_on_monday() {
        let sequence =
            BucketSequence::with_granularity(date(2026, 1, 1), date(2026, 1, 31), Granularity::Weekly);
        assert_eq!(sequence.len(), 5);
        assert!(sequence
            .buckets()
            .iter()
            .all(|v| v.start.weekday() == Weekday::Mon));
        assert_eq!(sequence.first_label().unwrap(), "2025-12-29");
        assert_eq!(sequence.last_label().unwrap(), "2026-01-26");
    }

    #[test]
    fn monthly_sequence_includes_empty_months() {
        let sequence = BucketSequence::spanning(date(2025, 1, 20), date(2025, 12, 2));
        assert_eq!(sequence.granularity(), Granularity::Monthly);
        let labels = sequence
            .buckets()
            .iter()
            .map(|v| v.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels.len(), 12);
        assert_eq!(labels[0], "2025-01");
        assert_eq!(labels[11], "2025-12");
    }

    #[test]
    fn degenerate_range_has_one_bucket() {
        let day = date(2026, 1, 1);
        let sequence = BucketSequence::spanning(day, day);
        assert_eq!(sequence.granularity(), Granularity::Daily);
        assert_eq!(sequence.len(), 1);
        assert_eq!(sequence.position(day), Some(0));
        assert_eq!(sequence.first_label(), sequence.last_label());
    }

    #[test]
    fn dates_outside_range_have_no_bucket() {
        let sequence = BucketSequence::spanning(date(2026, 1, 1), date(2026, 1, 10));
        assert_eq!(sequence.position(date(2025, 12, 31)), None);
        assert_eq!(sequence.position(date(2026, 1, 11)), None);
    }

    #[test]
    fn inverted_range_matches_ordered_one() {
        let (min, max) = (date(2025, 1, 1), date(2025, 12, 31));
        let inverted = BucketSequence::spanning(max, min);
        assert_eq!(inverted.granularity(), Granularity::Monthly);
        assert_eq!(inverted, BucketSequence::spanning(min, max));
    }
}
