//! Newtypes for roster and attendance identifiers
//!
//! Identifiers and dates are carried through unvalidated: the roster accepts
//! whatever the caller assigns. Only the pair index has a structural rule,
//! since it addresses a slot in the per-day presence array.

use nutype::nutype;
#[allow(unused_imports)] // These are used by nutype derive macros
use serde::{Deserialize, Serialize};

/// Externally assigned student identifier
#[nutype(derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRef,
    Display
))]
pub struct StudentId(String);

/// Display name of a student
#[nutype(derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRef,
    Display
))]
pub struct StudentName(String);

/// Calendar day in `YYYY-MM-DD` form, stored as text
#[nutype(derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRef,
    Display
))]
pub struct AttendanceDate(String);

impl AttendanceDate {
    pub fn in_month(&self, month: &MonthFilter) -> bool {
        self.as_ref().starts_with(month.as_ref())
    }
}

/// Zero-based index of a class period within a day
#[nutype(
    validate(greater_or_equal = 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        Hash,
        PartialOrd,
        Ord,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct PairIndex(i32);

impl PairIndex {
    /// Position of this pair in a day's presence array
    pub fn slot(self) -> usize {
        self.into_inner().unsigned_abs() as usize
    }
}

/// `YYYY-MM` prefix restricting attendance reads to one month
#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRef, Display)
)]
pub struct MonthFilter(String);

impl MonthFilter {
    /// Interpret an optional query value; an empty value means no filter
    pub fn from_query(value: Option<&str>) -> Option<Self> {
        value.and_then(|month| Self::try_new(month.to_string()).ok())
    }
}
