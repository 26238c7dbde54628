//! Summary statistics for produced tables.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::error::Result;
use crate::loaders::PanelRow;
use crate::period::Period;

/// Row count and per-column coverage of any serialisable table.
#[derive(Debug, Default, Serialize)]
pub struct TableSummary {
    pub generated_at: DateTime<Utc>,
    pub table: String,
    pub rows: usize,
    /// Non-absent values per column.
    pub present: BTreeMap<String, usize>,
    pub periods: Vec<String>,
    pub skipped_periods: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel: Option<PanelSummary>,
}

impl TableSummary {
    pub fn from_rows<T: Serialize>(table: &str, rows: &[T]) -> Result<Self> {
        let mut present: BTreeMap<String, usize> = BTreeMap::new();

        for row in rows {
            if let serde_json::Value::Object(fields) = serde_json::to_value(row)? {
                for (name, value) in fields {
                    let count = present.entry(name).or_default();
                    if !value.is_null() {
                        *count += 1;
                    }
                }
            }
        }

        Ok(Self {
            generated_at: Utc::now(),
            table: table.to_string(),
            rows: rows.len(),
            present,
            ..Default::default()
        })
    }

    pub fn with_periods(mut self, loaded: &[Period], skipped: &[Period]) -> Self {
        self.periods = loaded.iter().map(Period::to_string).collect();
        self.skipped_periods = skipped.iter().map(Period::to_string).collect();
        self
    }

    pub fn with_panel(mut self, panel: PanelSummary) -> Self {
        self.panel = Some(panel);
        self
    }

    /// Share of rows where `column` is present, in percent.
    pub fn coverage_pct(&self, column: &str) -> f64 {
        pct(self.present.get(column).copied().unwrap_or(0), self.rows)
    }
}

/// Plan/enrollment panel statistics.
#[derive(Debug, Default, Serialize)]
pub struct PanelSummary {
    pub rows: usize,
    pub distinct_plans: usize,
    pub matched_enrollment: usize,
    pub total_enrollment: f64,
}

impl PanelSummary {
    pub fn from_panel(rows: &[PanelRow]) -> Self {
        let plans: HashSet<_> = rows.iter().map(PanelRow::key).collect();
        Self {
            rows: rows.len(),
            distinct_plans: plans.len(),
            matched_enrollment: rows.iter().filter(|r| r.has_enrollment_match()).count(),
            total_enrollment: rows.iter().filter_map(|r| r.enrollment).sum(),
        }
    }

    pub fn match_pct(&self) -> f64 {
        pct(self.matched_enrollment, self.rows)
    }
}

pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        a: Option<f64>,
        b: Option<String>,
    }

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(pct(10, 0), 0.0);
        assert_eq!(pct(1, 4), 25.0);
    }

    #[test]
    fn test_table_summary_counts_present_values() {
        let rows = vec![
            Row { a: Some(1.0), b: None },
            Row { a: None, b: None },
            Row { a: Some(2.0), b: Some("x".into()) },
        ];
        let s = TableSummary::from_rows("test", &rows).unwrap();
        assert_eq!(s.rows, 3);
        assert_eq!(s.present["a"], 2);
        assert_eq!(s.present["b"], 1);
        assert!((s.coverage_pct("a") - 66.666).abs() < 0.01);
        assert_eq!(s.coverage_pct("missing"), 0.0);
    }

    #[test]
    fn test_panel_summary() {
        let rows = vec![
            PanelRow {
                contractid: Some("H1".into()),
                planid: Some(1.0),
                county: Some("Autauga".into()),
                enrollment: Some(20.0),
                ..Default::default()
            },
            PanelRow {
                contractid: Some("H1".into()),
                planid: Some(1.0),
                county: Some("Baldwin".into()),
                enrollment: None,
                ..Default::default()
            },
            PanelRow {
                contractid: Some("H2".into()),
                planid: Some(1.0),
                ..Default::default()
            },
        ];
        let s = PanelSummary::from_panel(&rows);
        assert_eq!(s.rows, 3);
        assert_eq!(s.distinct_plans, 2);
        assert_eq!(s.matched_enrollment, 2);
        assert_eq!(s.total_enrollment, 20.0);
    }

    #[test]
    fn test_panel_stats_nest_in_one_document() {
        let rows = vec![PanelRow {
            contractid: Some("H1".into()),
            planid: Some(1.0),
            enrollment: Some(12.0),
            ..Default::default()
        }];
        let summary = TableSummary::from_rows("enrollment", &rows)
            .unwrap()
            .with_panel(PanelSummary::from_panel(&rows));

        let text = serde_json::to_string_pretty(&summary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["table"], "enrollment");
        assert_eq!(value["panel"]["distinct_plans"], 1);
        assert_eq!(value["panel"]["total_enrollment"], 12.0);
    }

    #[test]
    fn test_panel_omitted_for_other_tables() {
        let rows = vec![Row { a: None, b: None }];
        let value = serde_json::to_value(TableSummary::from_rows("penetration", &rows).unwrap()).unwrap();
        assert!(value.get("panel").is_none());
    }
}
