//! Sort, fill and collapse rows that share a (contractid, planid, state,
//! county) key.
//!
//! Rows are stable-sorted by [`PlanCountyKey`]. Within a run of equal keys,
//! each absent field is forward-filled from the previous row and then
//! back-filled from the next, and only the first row of the run is kept.
//! The kept row carries, per field, the first present value in sort order.

use std::collections::HashSet;

use crate::key::PlanCountyKey;

/// A row that belongs to a plan/county group and can borrow absent fields
/// from a neighbour.
pub trait GroupRow {
    fn group_key(&self) -> PlanCountyKey;

    /// Copies every field that is absent on `self` and present on `other`.
    /// Key fields are left alone.
    fn fill_from(&mut self, other: &Self);
}

/// Fills `target` from `source` when `target` is absent.
pub fn fill<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if target.is_none() {
        target.clone_from(source);
    }
}

/// Stable sort by group key, absent components last.
pub fn sort_groups<T: GroupRow>(rows: &mut [T]) {
    rows.sort_by_cached_key(|r| r.group_key());
}

/// Propagates values down each run of equal keys. Expects sorted input.
pub fn forward_fill<T: GroupRow>(rows: &mut [T]) {
    for i in 1..rows.len() {
        let (head, tail) = rows.split_at_mut(i);
        let prev = &head[i - 1];
        if prev.group_key() == tail[0].group_key() {
            tail[0].fill_from(prev);
        }
    }
}

/// Propagates values up each run of equal keys. Expects sorted input.
pub fn backward_fill<T: GroupRow>(rows: &mut [T]) {
    for i in (1..rows.len()).rev() {
        let (head, tail) = rows.split_at_mut(i);
        let next = &tail[0];
        if head[i - 1].group_key() == next.group_key() {
            head[i - 1].fill_from(next);
        }
    }
}

/// Keeps the first row for each group key.
pub fn dedup_first<T: GroupRow>(rows: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter().filter(|r| seen.insert(r.group_key())).collect()
}

/// Sort, fill both ways, and keep one row per group.
///
/// The kept row holds, per field, the first present value in sort order,
/// even when that value sits on a later row of the group. A forward fill
/// alone would leave the first row's absent fields absent.
pub fn collapse_groups<T: GroupRow>(mut rows: Vec<T>) -> Vec<T> {
    sort_groups(&mut rows);
    forward_fill(&mut rows);
    backward_fill(&mut rows);
    dedup_first(rows)
}
