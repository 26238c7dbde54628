//! `MA_Cnty_SA` extract: counties served by each contract.

use serde::Serialize;
use std::path::Path;
use tracing::warn;

use super::{PositionalRecord, RawRow, read_records};
use crate::coerce::MissingValues;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceAreaRecord {
    pub contractid: Option<String>,
    pub org_name: Option<String>,
    pub org_type: Option<String>,
    pub plan_type: Option<String>,
    /// Partial-county coverage. Absent when the literal is not `TRUE`/`FALSE`.
    pub partial: Option<bool>,
    pub eghp: Option<String>,
    pub ssa: Option<f64>,
    pub fips: Option<f64>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub notes: Option<String>,
}

impl PositionalRecord for ServiceAreaRecord {
    const COLUMNS: &'static [&'static str] = &[
        "contractid",
        "org_name",
        "org_type",
        "plan_type",
        "partial",
        "eghp",
        "ssa",
        "fips",
        "county",
        "state",
        "notes",
    ];
    const KIND: &'static str = "service area";

    fn missing_values() -> MissingValues {
        MissingValues::standard().with(&["*"])
    }

    fn from_raw(row: &RawRow, mv: &MissingValues) -> Self {
        Self {
            contractid: mv.text(row.get(0)),
            org_name: mv.text(row.get(1)),
            org_type: mv.text(row.get(2)),
            plan_type: mv.text(row.get(3)),
            partial: mv.boolean(row.get(4)),
            eghp: mv.text(row.get(5)),
            ssa: mv.float(row.get(6)),
            fips: mv.float(row.get(7)),
            county: mv.text(row.get(8)),
            state: mv.text(row.get(9)),
            notes: mv.text(row.get(10)),
        }
    }
}

/// Reads a service area extract.
///
/// Unrecognised `partial` literals are left absent and counted in a single
/// warning for the file.
pub fn read_service_area(path: &Path) -> Result<Vec<ServiceAreaRecord>> {
    let rows: Vec<ServiceAreaRecord> = read_records(path)?;

    let undefined = rows.iter().filter(|r| r.partial.is_none()).count();
    if undefined > 0 {
        warn!(
            path = %path.display(),
            undefined,
            "Service area rows with unrecognised partial flag"
        );
    }

    Ok(rows)
}
