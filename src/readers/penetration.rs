//! `State_County_Penetration_MA` extract: eligibles, enrolled and
//! penetration per county.

use serde::Serialize;
use std::path::Path;

use super::{PositionalRecord, RawRow, read_records};
use crate::coerce::MissingValues;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PenetrationRecord {
    pub state: Option<String>,
    pub county: Option<String>,
    pub fips_state: Option<i64>,
    pub fips_cnty: Option<i64>,
    pub fips: Option<f64>,
    pub ssa_state: Option<i64>,
    pub ssa_cnty: Option<i64>,
    pub ssa: Option<f64>,
    pub eligibles: Option<f64>,
    pub enrolled: Option<f64>,
    /// In percent units, as published.
    pub penetration: Option<f64>,
}

impl PositionalRecord for PenetrationRecord {
    const COLUMNS: &'static [&'static str] = &[
        "state",
        "county",
        "fips_state",
        "fips_cnty",
        "fips",
        "ssa_state",
        "ssa_cnty",
        "ssa",
        "eligibles",
        "enrolled",
        "penetration",
    ];
    const KIND: &'static str = "penetration";

    fn missing_values() -> MissingValues {
        MissingValues::standard().with(&["", "NA", "*", "-", "--"])
    }

    fn from_raw(row: &RawRow, mv: &MissingValues) -> Self {
        Self {
            state: mv.text(row.get(0)),
            county: mv.text(row.get(1)),
            fips_state: mv.integer(row.get(2)),
            fips_cnty: mv.integer(row.get(3)),
            fips: mv.float(row.get(4)),
            ssa_state: mv.integer(row.get(5)),
            ssa_cnty: mv.integer(row.get(6)),
            ssa: mv.float(row.get(7)),
            eligibles: mv.formatted_number(row.get(8)),
            enrolled: mv.formatted_number(row.get(9)),
            penetration: mv.formatted_number(row.get(10)),
        }
    }
}

/// Reads a state/county penetration extract.
pub fn read_penetration(path: &Path) -> Result<Vec<PenetrationRecord>> {
    read_records(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_penetration_formatted_numbers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "State Name,County Name,FIPS State,FIPS Cnty,FIPS,SSA State,SSA Cnty,SSA,Eligibles,Enrolled,Penetration").unwrap();
        writeln!(file, "Alabama,Autauga,01,001,01001,01,000,01000,\"10,512\",\"3,025\",28.78%").unwrap();
        writeln!(file, "Alabama,Baldwin,01,003,01003,01,010,01010,--,*,-").unwrap();
        writeln!(file, "Alabama,Pending,NA,,,01,x,,n/a,12,").unwrap();

        let rows = read_penetration(file.path()).unwrap();
        assert_eq!(rows.len(), 3);

        let a = &rows[0];
        assert_eq!(a.fips_state, Some(1));
        assert_eq!(a.fips_cnty, Some(1));
        assert_eq!(a.fips, Some(1001.0));
        assert_eq!(a.ssa_cnty, Some(0));
        assert_eq!(a.eligibles, Some(10512.0));
        assert_eq!(a.enrolled, Some(3025.0));
        assert_eq!(a.penetration, Some(28.78));

        let b = &rows[1];
        assert_eq!(b.eligibles, None);
        assert_eq!(b.enrolled, None);
        assert_eq!(b.penetration, None);

        let c = &rows[2];
        assert_eq!(c.fips_state, None);
        assert_eq!(c.fips_cnty, None);
        assert_eq!(c.ssa_cnty, None);
        assert_eq!(c.eligibles, None);
        assert_eq!(c.enrolled, Some(12.0));
    }
}
