//! Storage seams used by the services
//!
//! Every method is one unit of work: implementations acquire whatever
//! connection or lock they need inside the call and release it before
//! returning, on success and on error alike.

use async_trait::async_trait;

use crate::domain::{AttendanceRecord, MonthFilter, Student, StudentId, StudentRemoval};
use crate::Result;

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Records ordered by `(date, pair_index)`, optionally limited to one month
    async fn fetch_attendance(&self, month: Option<&MonthFilter>) -> Result<Vec<AttendanceRecord>>;

    /// Insert the record, or overwrite `is_present` on the row with the same slot
    async fn upsert_attendance(&self, record: &AttendanceRecord) -> Result<()>;
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// All students ordered by name
    async fn list_students(&self) -> Result<Vec<Student>>;

    /// Insert unless the id is taken. Returns whether a row was written.
    async fn insert_student(&self, student: &Student) -> Result<bool>;

    /// Delete the student's attendance rows, then the student row
    async fn remove_student(&self, id: &StudentId) -> Result<StudentRemoval>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn health_check(&self) -> Result<()>;
}

/// A backend serving both services
pub trait Store: AttendanceRepository + StudentRepository + HealthCheck {}

impl<T> Store for T where T: AttendanceRepository + StudentRepository + HealthCheck {}
