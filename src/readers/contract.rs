//! `CPSC_Contract_Info` extract: one row per contract/plan.

use serde::Serialize;
use std::path::Path;

use super::{PositionalRecord, RawRow, read_records};
use crate::coerce::MissingValues;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContractRecord {
    pub contractid: Option<String>,
    pub planid: Option<f64>,
    pub org_type: Option<String>,
    pub plan_type: Option<String>,
    pub partd: Option<String>,
    pub snp: Option<String>,
    pub eghp: Option<String>,
    pub org_name: Option<String>,
    pub org_marketing_name: Option<String>,
    pub plan_name: Option<String>,
    pub parent_org: Option<String>,
    pub contract_date: Option<String>,
}

impl PositionalRecord for ContractRecord {
    const COLUMNS: &'static [&'static str] = &[
        "contractid",
        "planid",
        "org_type",
        "plan_type",
        "partd",
        "snp",
        "eghp",
        "org_name",
        "org_marketing_name",
        "plan_name",
        "parent_org",
        "contract_date",
    ];
    const KIND: &'static str = "contract";

    fn missing_values() -> MissingValues {
        MissingValues::standard()
    }

    fn from_raw(row: &RawRow, mv: &MissingValues) -> Self {
        Self {
            contractid: mv.text(row.get(0)),
            planid: mv.float(row.get(1)),
            org_type: mv.text(row.get(2)),
            plan_type: mv.text(row.get(3)),
            partd: mv.text(row.get(4)),
            snp: mv.text(row.get(5)),
            eghp: mv.text(row.get(6)),
            org_name: mv.text(row.get(7)),
            org_marketing_name: mv.text(row.get(8)),
            plan_name: mv.text(row.get(9)),
            parent_org: mv.text(row.get(10)),
            contract_date: mv.text(row.get(11)),
        }
    }
}

/// Reads a contract info extract.
pub fn read_contract(path: &Path) -> Result<Vec<ContractRecord>> {
    read_records(path)
}
