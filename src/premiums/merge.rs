//! MA / MA-PD premium reconciliation.

use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::info;

use super::group::{GroupRow, collapse_groups, fill};
use super::{MaPremiumRow, MapdPremiumRow};
use crate::coerce::parse_float;
use crate::key::PlanCountyKey;

/// One plan/county premium row for a year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanPremiumRow {
    pub contractid: Option<String>,
    pub planid: Option<f64>,
    pub state: Option<String>,
    pub county: Option<String>,
    /// MA-only premium; absent for plans only in the MA-PD table.
    pub premium: Option<f64>,
    pub premium_partc: Option<f64>,
    pub premium_partd_basic: Option<f64>,
    pub premium_partd_supp: Option<f64>,
    pub premium_partd_total: Option<f64>,
    pub partd_deductible: Option<f64>,
    pub year: i32,
}

impl PlanPremiumRow {
    pub fn key(&self) -> PlanCountyKey {
        PlanCountyKey::new(
            self.contractid.as_deref(),
            self.planid,
            self.state.as_deref(),
            self.county.as_deref(),
        )
    }
}

impl GroupRow for MaPremiumRow {
    fn group_key(&self) -> PlanCountyKey {
        PlanCountyKey::new(
            self.contractid.as_deref(),
            self.planid,
            self.state.as_deref(),
            self.county.as_deref(),
        )
    }

    fn fill_from(&mut self, other: &Self) {
        fill(&mut self.premium, &other.premium);
    }
}

/// MA-PD row with a numeric plan id.
#[derive(Debug, Clone, Default, PartialEq)]
struct PartDPremium {
    contractid: Option<String>,
    planid: Option<f64>,
    state: Option<String>,
    county: Option<String>,
    premium_partc: Option<f64>,
    premium_partd_basic: Option<f64>,
    premium_partd_supp: Option<f64>,
    premium_partd_total: Option<f64>,
    partd_deductible: Option<f64>,
}

impl From<&MapdPremiumRow> for PartDPremium {
    fn from(r: &MapdPremiumRow) -> Self {
        Self {
            contractid: r.contractid.clone(),
            planid: r.planid.as_deref().and_then(parse_float),
            state: r.state.clone(),
            county: r.county.clone(),
            premium_partc: r.premium_partc,
            premium_partd_basic: r.premium_partd_basic,
            premium_partd_supp: r.premium_partd_supp,
            premium_partd_total: r.premium_partd_total,
            partd_deductible: r.partd_deductible,
        }
    }
}

impl GroupRow for PartDPremium {
    fn group_key(&self) -> PlanCountyKey {
        PlanCountyKey::new(
            self.contractid.as_deref(),
            self.planid,
            self.state.as_deref(),
            self.county.as_deref(),
        )
    }

    fn fill_from(&mut self, other: &Self) {
        fill(&mut self.premium_partc, &other.premium_partc);
        fill(&mut self.premium_partd_basic, &other.premium_partd_basic);
        fill(&mut self.premium_partd_supp, &other.premium_partd_supp);
        fill(&mut self.premium_partd_total, &other.premium_partd_total);
        fill(&mut self.partd_deductible, &other.partd_deductible);
    }
}

/// Reconciles a year's MA-only and MA-PD premium tables.
///
/// Each side is collapsed to one row per (contractid, planid, state, county)
/// and the two are outer-joined on that key, so a plan/county present in
/// only one table still appears with the other table's fields absent.
/// Output is ordered by key and every row carries `year`.
pub fn mapd_clean_merge(
    ma: &[MaPremiumRow],
    mapd: &[MapdPremiumRow],
    year: i32,
) -> Vec<PlanPremiumRow> {
    let ma = collapse_groups(ma.to_vec());
    let mapd = collapse_groups(mapd.iter().map(PartDPremium::from).collect());

    let mut joined: BTreeMap<PlanCountyKey, PlanPremiumRow> = BTreeMap::new();

    for r in &ma {
        joined.insert(
            r.group_key(),
            PlanPremiumRow {
                contractid: r.contractid.clone(),
                planid: r.planid,
                state: r.state.clone(),
                county: r.county.clone(),
                premium: r.premium,
                year,
                ..Default::default()
            },
        );
    }

    let mut matched = 0usize;
    for r in &mapd {
        let row = match joined.entry(r.group_key()) {
            Entry::Occupied(e) => {
                matched += 1;
                e.into_mut()
            }
            Entry::Vacant(e) => e.insert(PlanPremiumRow {
                contractid: r.contractid.clone(),
                planid: r.planid,
                state: r.state.clone(),
                county: r.county.clone(),
                year,
                ..Default::default()
            }),
        };
        row.premium_partc = r.premium_partc;
        row.premium_partd_basic = r.premium_partd_basic;
        row.premium_partd_supp = r.premium_partd_supp;
        row.premium_partd_total = r.premium_partd_total;
        row.partd_deductible = r.partd_deductible;
    }

    let rows: Vec<PlanPremiumRow> = joined.into_values().collect();
    info!(
        year,
        ma = ma.len(),
        mapd = mapd.len(),
        matched,
        rows = rows.len(),
        "Merged plan premiums"
    );
    rows
}
