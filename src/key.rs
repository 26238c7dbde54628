//! Record keys used for de-duplication, joins and group sorting.
//!
//! Absent key components compare equal to each other and sort after every
//! present value. Plan ids are floats (they may be absent in the source), so
//! equality and hashing go through their bit pattern.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Sorts `None` after every `Some`.
fn cmp_absent_last<T, F>(a: &Option<T>, b: &Option<T>, cmp: F) -> Ordering
where
    F: FnOnce(&T, &T) -> Ordering,
{
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// -0.0 and 0.0 are the same plan
fn normalize(f: f64) -> f64 {
    if f == 0.0 { 0.0 } else { f }
}

fn plan_bits(v: Option<f64>) -> Option<u64> {
    v.map(|f| normalize(f).to_bits())
}

fn cmp_plan(a: &Option<f64>, b: &Option<f64>) -> Ordering {
    cmp_absent_last(a, b, |x, y| normalize(*x).total_cmp(&normalize(*y)))
}

fn cmp_text(a: &Option<String>, b: &Option<String>) -> Ordering {
    cmp_absent_last(a, b, |x, y| x.as_bytes().cmp(y.as_bytes()))
}

/// (contractid, planid)
#[derive(Debug, Clone)]
pub struct PlanKey {
    pub contractid: Option<String>,
    pub planid: Option<f64>,
}

impl PlanKey {
    pub fn new(contractid: Option<&str>, planid: Option<f64>) -> Self {
        Self {
            contractid: contractid.map(str::to_string),
            planid,
        }
    }
}

impl PartialEq for PlanKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PlanKey {}

impl Hash for PlanKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.contractid.hash(state);
        plan_bits(self.planid).hash(state);
    }
}

impl Ord for PlanKey {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_text(&self.contractid, &other.contractid).then_with(|| cmp_plan(&self.planid, &other.planid))
    }
}

impl PartialOrd for PlanKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// (contractid, planid, state, county)
#[derive(Debug, Clone)]
pub struct PlanCountyKey {
    pub plan: PlanKey,
    pub state: Option<String>,
    pub county: Option<String>,
}

impl PlanCountyKey {
    pub fn new(
        contractid: Option<&str>,
        planid: Option<f64>,
        state: Option<&str>,
        county: Option<&str>,
    ) -> Self {
        Self {
            plan: PlanKey::new(contractid, planid),
            state: state.map(str::to_string),
            county: county.map(str::to_string),
        }
    }
}

impl PartialEq for PlanCountyKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PlanCountyKey {}

impl Hash for PlanCountyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.plan.hash(state);
        self.state.hash(state);
        self.county.hash(state);
    }
}

impl Ord for PlanCountyKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.plan
            .cmp(&other.plan)
            .then_with(|| cmp_text(&self.state, &other.state))
            .then_with(|| cmp_text(&self.county, &other.county))
    }
}

impl PartialOrd for PlanCountyKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
