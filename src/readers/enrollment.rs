//! `CPSC_Enrollment_Info` extract: enrollment per contract/plan/county.

use serde::Serialize;
use std::path::Path;

use super::{PositionalRecord, RawRow, read_records};
use crate::coerce::MissingValues;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrollmentRecord {
    pub contractid: Option<String>,
    pub planid: Option<f64>,
    pub ssa: Option<f64>,
    pub fips: Option<f64>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub enrollment: Option<f64>,
}

impl PositionalRecord for EnrollmentRecord {
    const COLUMNS: &'static [&'static str] = &[
        "contractid",
        "planid",
        "ssa",
        "fips",
        "state",
        "county",
        "enrollment",
    ];
    const KIND: &'static str = "enrollment";

    /// CMS suppresses counts of ten or fewer as `*`.
    fn missing_values() -> MissingValues {
        MissingValues::standard().with(&["*"])
    }

    fn from_raw(row: &RawRow, mv: &MissingValues) -> Self {
        Self {
            contractid: mv.text(row.get(0)),
            planid: mv.float(row.get(1)),
            ssa: mv.float(row.get(2)),
            fips: mv.float(row.get(3)),
            state: mv.text(row.get(4)),
            county: mv.text(row.get(5)),
            enrollment: mv.float(row.get(6)),
        }
    }
}

/// Reads an enrollment info extract.
pub fn read_enroll(path: &Path) -> Result<Vec<EnrollmentRecord>> {
    read_records(path)
}
