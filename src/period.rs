//! Monthly reporting period.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::error::{IngestError, Result};

/// A (year, month) pair. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1900..=2100).contains(&year) {
            return Err(IngestError::InvalidPeriod(format!("year {year} out of range")));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(IngestError::InvalidPeriod(format!("month {month} out of range")));
        }
        Ok(Self { year, month })
    }

    /// Parses a month string such as `"01"` or `"7"`.
    pub fn parse(month: &str, year: i32) -> Result<Self> {
        let m: u32 = month
            .trim()
            .parse()
            .map_err(|_| IngestError::InvalidPeriod(format!("month {month:?} is not a number")))?;
        Self::new(year, m)
    }

    /// Two-digit month used in source file names.
    pub fn month_str(&self) -> String {
        format!("{:02}", self.month)
    }

    /// `{year}_{mm}` suffix shared by every monthly file name.
    pub fn file_suffix(&self) -> String {
        format!("{}_{}", self.year, self.month_str())
    }

    /// Parses an inclusive year span: `2015`, `2015..2016` or `2015..=2016`.
    pub fn parse_years(span: &str) -> Result<Vec<i32>> {
        let year = |s: &str| {
            s.trim()
                .parse::<i32>()
                .map_err(|_| IngestError::InvalidPeriod(format!("year {s:?} is not a number")))
        };
        let (start, end) = match span.split_once("..") {
            Some((a, b)) => (year(a)?, year(b.strip_prefix('=').unwrap_or(b))?),
            None => {
                let y = year(span)?;
                (y, y)
            }
        };
        if end < start {
            return Err(IngestError::InvalidPeriod(format!(
                "year span {span:?} ends before it starts"
            )));
        }
        Ok((start..=end).collect())
    }

    /// Every period for the given years and months, in chronological order.
    pub fn range(years: &[i32], months: &[u32]) -> Result<Vec<Period>> {
        let mut periods = Vec::with_capacity(years.len() * months.len());
        for &y in years {
            for &m in months {
                periods.push(Period::new(y, m)?);
            }
        }
        periods.sort();
        periods.dedup();
        Ok(periods)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
