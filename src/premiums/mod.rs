//! Yearly plan premiums: MA-only and MA-PD landscape tables, reconciled into
//! one premium row per contract/plan/county.

pub mod group;
pub mod merge;

pub use merge::{PlanPremiumRow, mapd_clean_merge};

use csv::ReaderBuilder;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

use crate::coerce::MissingValues;
use crate::error::Result;
use crate::readers::{RawRow, decode_latin1, ensure_exists};

/// Part C premium for an MA-only plan in one county.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaPremiumRow {
    pub contractid: Option<String>,
    pub planid: Option<f64>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub premium: Option<f64>,
}

/// Part C and Part D premiums for an MA-PD plan in one county.
///
/// `planid` is kept as text; some landscape years publish it with letters
/// or padding and it is coerced during the merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapdPremiumRow {
    pub contractid: Option<String>,
    pub planid: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub premium_partc: Option<f64>,
    pub premium_partd_basic: Option<f64>,
    pub premium_partd_supp: Option<f64>,
    pub premium_partd_total: Option<f64>,
    pub partd_deductible: Option<f64>,
}

/// Header-addressed view over a landscape CSV.
struct NamedColumns {
    index: HashMap<String, usize>,
}

impl NamedColumns {
    fn new(headers: &[String], wanted: &[&str], path: &Path) -> Self {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
            .collect();

        let absent: Vec<&str> = wanted
            .iter()
            .copied()
            .filter(|w| !index.contains_key(*w))
            .collect();
        if !absent.is_empty() {
            warn!(path = %path.display(), columns = ?absent, "Landscape file lacks columns");
        }

        Self { index }
    }

    fn get<'a>(&self, row: &'a RawRow, name: &str) -> Option<&'a str> {
        self.index.get(name).and_then(|&i| row.get(i))
    }
}

fn read_landscape(path: &Path, kind: &'static str) -> Result<(Vec<String>, Vec<RawRow>)> {
    ensure_exists(kind, path)?;
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = rdr.byte_headers()?.iter().map(decode_latin1).collect();
    let mut rows = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        rows.push(RawRow::new(record.iter().map(decode_latin1).collect()));
    }

    debug!(path = %path.display(), kind, rows = rows.len(), "Read landscape file");
    Ok((headers, rows))
}

const MA_COLUMNS: &[&str] = &["contractid", "planid", "state", "county", "premium"];

const MAPD_COLUMNS: &[&str] = &[
    "contractid",
    "planid",
    "state",
    "county",
    "premium_partc",
    "premium_partd_basic",
    "premium_partd_supp",
    "premium_partd_total",
    "partd_deductible",
];

fn landscape_missing() -> MissingValues {
    MissingValues::standard().with(&["*", "-", "--"])
}

/// Reads a yearly MA-only premium table, selecting columns by header name.
pub fn read_ma_premiums(path: &Path) -> Result<Vec<MaPremiumRow>> {
    let (headers, raw) = read_landscape(path, "MA premium")?;
    let cols = NamedColumns::new(&headers, MA_COLUMNS, path);
    let mv = landscape_missing();

    Ok(raw
        .iter()
        .map(|r| MaPremiumRow {
            contractid: mv.text(cols.get(r, "contractid")),
            planid: mv.float(cols.get(r, "planid")),
            state: mv.text(cols.get(r, "state")),
            county: mv.text(cols.get(r, "county")),
            premium: mv.currency(cols.get(r, "premium")),
        })
        .collect())
}

/// Reads a yearly MA-PD premium table, selecting columns by header name.
pub fn read_mapd_premiums(path: &Path) -> Result<Vec<MapdPremiumRow>> {
    let (headers, raw) = read_landscape(path, "MA-PD premium")?;
    let cols = NamedColumns::new(&headers, MAPD_COLUMNS, path);
    let mv = landscape_missing();

    Ok(raw
        .iter()
        .map(|r| MapdPremiumRow {
            contractid: mv.text(cols.get(r, "contractid")),
            planid: mv.text(cols.get(r, "planid")),
            state: mv.text(cols.get(r, "state")),
            county: mv.text(cols.get(r, "county")),
            premium_partc: mv.currency(cols.get(r, "premium_partc")),
            premium_partd_basic: mv.currency(cols.get(r, "premium_partd_basic")),
            premium_partd_supp: mv.currency(cols.get(r, "premium_partd_supp")),
            premium_partd_total: mv.currency(cols.get(r, "premium_partd_total")),
            partd_deductible: mv.currency(cols.get(r, "partd_deductible")),
        })
        .collect())
}
