//! Monthly loaders: resolve a period's files, read them, and stamp every row
//! with the period.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use crate::config::DataLayout;
use crate::error::Result;
use crate::key::PlanKey;
use crate::period::Period;
use crate::readers::{
    ContractRecord, EnrollmentRecord, PenetrationRecord, ServiceAreaRecord, ensure_exists,
    read_contract, read_enroll, read_penetration, read_service_area,
};

/// A contract/plan left-joined with its enrollment rows, for one month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PanelRow {
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

    // enrollment side, absent when unmatched
    pub ssa: Option<f64>,
    pub fips: Option<f64>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub enrollment: Option<f64>,

    pub month: u32,
    pub year: i32,
}

impl PanelRow {
    fn from_parts(c: &ContractRecord, e: Option<&EnrollmentRecord>, period: Period) -> Self {
        Self {
            contractid: c.contractid.clone(),
            planid: c.planid,
            org_type: c.org_type.clone(),
            plan_type: c.plan_type.clone(),
            partd: c.partd.clone(),
            snp: c.snp.clone(),
            eghp: c.eghp.clone(),
            org_name: c.org_name.clone(),
            org_marketing_name: c.org_marketing_name.clone(),
            plan_name: c.plan_name.clone(),
            parent_org: c.parent_org.clone(),
            contract_date: c.contract_date.clone(),
            ssa: e.and_then(|e| e.ssa),
            fips: e.and_then(|e| e.fips),
            state: e.and_then(|e| e.state.clone()),
            county: e.and_then(|e| e.county.clone()),
            enrollment: e.and_then(|e| e.enrollment),
            month: period.month,
            year: period.year,
        }
    }

    pub fn key(&self) -> PlanKey {
        PlanKey::new(self.contractid.as_deref(), self.planid)
    }

    /// Whether an enrollment row was found for this contract/plan.
    pub fn has_enrollment_match(&self) -> bool {
        self.ssa.is_some()
            || self.fips.is_some()
            || self.state.is_some()
            || self.county.is_some()
            || self.enrollment.is_some()
    }
}

/// A service area row stamped with its period.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceAreaRow {
    pub contractid: Option<String>,
    pub org_name: Option<String>,
    pub org_type: Option<String>,
    pub plan_type: Option<String>,
    pub partial: Option<bool>,
    pub eghp: Option<String>,
    pub ssa: Option<f64>,
    pub fips: Option<f64>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub notes: Option<String>,
    pub month: u32,
    pub year: i32,
}

impl ServiceAreaRow {
    fn stamp(r: ServiceAreaRecord, period: Period) -> Self {
        Self {
            contractid: r.contractid,
            org_name: r.org_name,
            org_type: r.org_type,
            plan_type: r.plan_type,
            partial: r.partial,
            eghp: r.eghp,
            ssa: r.ssa,
            fips: r.fips,
            county: r.county,
            state: r.state,
            notes: r.notes,
            month: period.month,
            year: period.year,
        }
    }
}

/// A penetration row stamped with its period.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PenetrationRow {
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
    pub penetration: Option<f64>,
    pub month: u32,
    pub year: i32,
}

impl PenetrationRow {
    fn stamp(r: PenetrationRecord, period: Period) -> Self {
        Self {
            state: r.state,
            county: r.county,
            fips_state: r.fips_state,
            fips_cnty: r.fips_cnty,
            fips: r.fips,
            ssa_state: r.ssa_state,
            ssa_cnty: r.ssa_cnty,
            ssa: r.ssa,
            eligibles: r.eligibles,
            enrolled: r.enrolled,
            penetration: r.penetration,
            month: period.month,
            year: period.year,
        }
    }
}

/// Keeps the first contract row for each (contractid, planid).
pub fn dedup_contracts(rows: Vec<ContractRecord>) -> Vec<ContractRecord> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|r| seen.insert(PlanKey::new(r.contractid.as_deref(), r.planid)))
        .collect()
}

/// Left-joins enrollment onto contracts by (contractid, planid).
///
/// Every contract row appears at least once: once per matching enrollment
/// row, or once with the enrollment fields absent. Contract order is kept,
/// and matches follow enrollment file order.
pub fn join_enrollment(
    contracts: &[ContractRecord],
    enrollment: &[EnrollmentRecord],
    period: Period,
) -> Vec<PanelRow> {
    let mut by_key: HashMap<PlanKey, Vec<&EnrollmentRecord>> = HashMap::new();
    for e in enrollment {
        by_key
            .entry(PlanKey::new(e.contractid.as_deref(), e.planid))
            .or_default()
            .push(e);
    }

    let mut rows = Vec::with_capacity(contracts.len());
    for c in contracts {
        let key = PlanKey::new(c.contractid.as_deref(), c.planid);
        match by_key.get(&key) {
            Some(matches) => {
                rows.extend(matches.iter().map(|e| PanelRow::from_parts(c, Some(*e), period)))
            }
            None => rows.push(PanelRow::from_parts(c, None, period)),
        }
    }
    rows
}

/// Loads one month of plan/enrollment data.
///
/// Both files are checked before either is parsed.
#[tracing::instrument(skip(layout, period), fields(period = %period))]
pub fn load_month(layout: &DataLayout, period: Period) -> Result<Vec<PanelRow>> {
    let c_path = layout.contract_path(period);
    let e_path = layout.enrollment_path(period);

    ensure_exists("contract", &c_path)?;
    ensure_exists("enrollment", &e_path)?;

    let contracts = dedup_contracts(read_contract(&c_path)?);
    let enrollment = read_enroll(&e_path)?;
    let rows = join_enrollment(&contracts, &enrollment, period);

    info!(
        contracts = contracts.len(),
        enrollment = enrollment.len(),
        rows = rows.len(),
        "Loaded plan/enrollment month"
    );
    Ok(rows)
}

/// Loads one month of service area data.
#[tracing::instrument(skip(layout, period), fields(period = %period))]
pub fn load_month_sa(layout: &DataLayout, period: Period) -> Result<Vec<ServiceAreaRow>> {
    let path = layout.service_area_path(period);
    ensure_exists("service area", &path)?;

    let rows: Vec<ServiceAreaRow> = read_service_area(&path)?
        .into_iter()
        .map(|r| ServiceAreaRow::stamp(r, period))
        .collect();

    info!(rows = rows.len(), "Loaded service area month");
    Ok(rows)
}

/// Loads one month of penetration data.
#[tracing::instrument(skip(layout, period), fields(period = %period))]
pub fn load_month_pen(layout: &DataLayout, period: Period) -> Result<Vec<PenetrationRow>> {
    let path = layout.penetration_path(period);
    ensure_exists("penetration", &path)?;

    let rows: Vec<PenetrationRow> = read_penetration(&path)?
        .into_iter()
        .map(|r| PenetrationRow::stamp(r, period))
        .collect();

    info!(rows = rows.len(), "Loaded penetration month");
    Ok(rows)
}

/// Rows loaded across several periods.
#[derive(Debug)]
pub struct RangeLoad<T> {
    pub rows: Vec<T>,
    pub loaded: Vec<Period>,
    pub skipped: Vec<Period>,
}

/// Runs a monthly loader over `periods` and concatenates the results in
/// period order.
///
/// A period whose input files are missing is skipped; any other error stops
/// the load.
pub fn load_range<T, F>(periods: &[Period], mut load: F) -> Result<RangeLoad<T>>
where
    F: FnMut(Period) -> Result<Vec<T>>,
{
    let mut periods = periods.to_vec();
    periods.sort();

    let mut out = RangeLoad {
        rows: Vec::new(),
        loaded: Vec::new(),
        skipped: Vec::new(),
    };

    for period in periods {
        match load(period) {
            Ok(rows) => {
                out.rows.extend(rows);
                out.loaded.push(period);
            }
            Err(e) if e.is_missing_file() => {
                warn!(period = %period, error = %e, "Skipping period");
                out.skipped.push(period);
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        loaded = out.loaded.len(),
        skipped = out.skipped.len(),
        rows = out.rows.len(),
        "Range load complete"
    );
    Ok(out)
}
