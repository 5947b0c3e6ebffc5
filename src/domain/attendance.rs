//! Attendance records and the per-student-per-day projection
//!
//! Storage holds one row per `(student, date, pair)`. Reads collapse those
//! rows into [`AttendanceDayView`]s: one presence array per student per day,
//! where every pair that was never marked counts as present.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::{AttendanceDate, PairIndex, StudentId};

fn present_by_default() -> bool {
    true
}

/// One stored presence mark, keyed by `(student_id, date, pair_index)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student_id: StudentId,
    pub date: AttendanceDate,
    pub pair_index: PairIndex,
    #[serde(default = "present_by_default")]
    pub is_present: bool,
}

impl AttendanceRecord {
    pub fn new(
        student_id: StudentId,
        date: AttendanceDate,
        pair_index: PairIndex,
        is_present: bool,
    ) -> Self {
        Self {
            student_id,
            date,
            pair_index,
            is_present,
        }
    }

    /// Whether this record occupies the same slot as `other`
    pub fn same_slot(&self, other: &Self) -> bool {
        self.student_id == other.student_id
            && self.date == other.date
            && self.pair_index == other.pair_index
    }
}

/// Presence array for one student on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDayView {
    pub student_id: StudentId,
    pub date: AttendanceDate,
    pub pairs: Vec<bool>,
}

impl AttendanceDayView {
    fn empty(student_id: StudentId, date: AttendanceDate) -> Self {
        Self {
            student_id,
            date,
            pairs: Vec::new(),
        }
    }

    fn mark(&mut self, pair_index: PairIndex, is_present: bool) {
        let slot = pair_index.slot();
        if self.pairs.len() <= slot {
            self.pairs.resize(slot + 1, true);
        }
        self.pairs[slot] = is_present;
    }
}

/// Collapse records into day views.
///
/// Views are emitted in the order their first record appears in `records`,
/// so callers control output order through the order they fetch rows in.
/// A view's `pairs` is exactly as long as its highest marked pair plus one.
pub fn group_by_student_day<I>(records: I) -> Vec<AttendanceDayView>
where
    I: IntoIterator<Item = AttendanceRecord>,
{
    let mut views: Vec<AttendanceDayView> = Vec::new();
    let mut positions: HashMap<(StudentId, AttendanceDate), usize> = HashMap::new();

    for record in records {
        let key = (record.student_id, record.date);
        let position = match positions.get(&key) {
            Some(&position) => position,
            None => {
                let position = views.len();
                views.push(AttendanceDayView::empty(key.0.clone(), key.1.clone()));
                positions.insert(key, position);
                position
            }
        };
        views[position].mark(record.pair_index, record.is_present);
    }

    views
}
