//! In-process store with the same semantics as the PostgreSQL tables
//!
//! Used by the test suite and for running the service without a database
//! (`database.backend = "memory"`). Each call takes the table lock once and
//! drops it before returning, mirroring one connection per unit of work.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::repository::{AttendanceRepository, HealthCheck, StudentRepository};
use crate::domain::{AttendanceRecord, MonthFilter, Student, StudentId, StudentRemoval};
use crate::Result;

#[derive(Debug, Default)]
struct Tables {
    students: Vec<Student>,
    attendance: Vec<AttendanceRecord>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored attendance rows, across all students
    pub fn attendance_row_count(&self) -> usize {
        self.tables.lock().attendance.len()
    }

    /// Number of stored roster rows
    pub fn student_row_count(&self) -> usize {
        self.tables.lock().students.len()
    }
}

#[async_trait]
impl HealthCheck for InMemoryStore {
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryStore {
    async fn fetch_attendance(&self, month: Option<&MonthFilter>) -> Result<Vec<AttendanceRecord>> {
        let tables = self.tables.lock();
        let mut records: Vec<AttendanceRecord> = tables
            .attendance
            .iter()
            .filter(|record| month.is_none_or(|month| record.date.in_month(month)))
            .cloned()
            .collect();
        // Stable sort: rows tied on (date, pair) keep insertion order.
        records.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.pair_index.cmp(&b.pair_index))
        });
        Ok(records)
    }

    async fn upsert_attendance(&self, record: &AttendanceRecord) -> Result<()> {
        let mut tables = self.tables.lock();
        match tables
            .attendance
            .iter_mut()
            .find(|existing| existing.same_slot(record))
        {
            Some(existing) => existing.is_present = record.is_present,
            None => tables.attendance.push(record.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl StudentRepository for InMemoryStore {
    async fn list_students(&self) -> Result<Vec<Student>> {
        let mut students = self.tables.lock().students.clone();
        students.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(students)
    }

    async fn insert_student(&self, student: &Student) -> Result<bool> {
        let mut tables = self.tables.lock();
        if tables.students.iter().any(|existing| existing.id == student.id) {
            return Ok(false);
        }
        tables.students.push(student.clone());
        Ok(true)
    }

    async fn remove_student(&self, id: &StudentId) -> Result<StudentRemoval> {
        let mut tables = self.tables.lock();

        let attendance_before = tables.attendance.len();
        tables.attendance.retain(|record| &record.student_id != id);
        let attendance_rows = (attendance_before - tables.attendance.len()) as u64;

        let students_before = tables.students.len();
        tables.students.retain(|student| &student.id != id);
        let student_rows = (students_before - tables.students.len()) as u64;

        Ok(StudentRemoval {
            attendance_rows,
            student_rows,
        })
    }
}
