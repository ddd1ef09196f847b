use std::fmt::Display;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use crate::{
    notes::entities::NormalizedRecord,
    report::{filter_window, record_range, DateWindow},
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct RangeArgs {
    #[arg(
        long = "start",
        short,
        help = "Start of the range. Examples are \"yesterday\", \"2 weeks ago\", \"15/03/2026\". Defaults to 30 days before the newest note"
    )]
    start_date: Option<String>,
    #[arg(
        long = "end",
        short,
        help = "End of the range. Examples are \"today\", \"15/03/2026\". Defaults to the newest note"
    )]
    end_date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(long, help = "Use every note ever taken", conflicts_with_all = ["start_date", "end_date"])]
    all: bool,
}

impl RangeArgs {
    /// Narrows `records` down to the requested days.
    pub fn apply(&self, records: Vec<NormalizedRecord>) -> Result<Vec<NormalizedRecord>> {
        if self.all {
            return Ok(records);
        }
        match self.window(&records)? {
            Some(window) => Ok(filter_window(&records, window)),
            None => Ok(records),
        }
    }

    fn window(&self, records: &[NormalizedRecord]) -> Result<Option<DateWindow>> {
        if self.start_date.is_none() && self.end_date.is_none() {
            return Ok(DateWindow::recent(records));
        }

        let range = record_range(records);
        let start = match &self.start_date {
            Some(value) => self.parse_date(value, "start")?,
            None => match range {
                Some((min, _)) => min,
                None => return Ok(None),
            },
        };
        let end = match &self.end_date {
            Some(value) => self.parse_date(value, "end")?,
            None => range.map(|v| v.1).unwrap_or_else(|| Local::now().date_naive()),
        };
        if start > end {
            return Err(validation_error(format!(
                "Start date {start} is after end date {end}"
            )));
        }
        Ok(Some(DateWindow { start, end }))
    }

    fn parse_date(&self, value: &str, name: &str) -> Result<NaiveDate> {
        match parse_date_string(value, Local::now(), self.date_style.into()) {
            Ok(v) => Ok(v.with_timezone(&Local).date_naive()),
            Err(e) => Err(validation_error(format!(
                "Failed to validate {name} date {e}"
            ))),
        }
    }
}

fn validation_error(message: String) -> anyhow::Error {
    Args::command()
        .error(clap::error::ErrorKind::ValueValidation, message)
        .into()
}
