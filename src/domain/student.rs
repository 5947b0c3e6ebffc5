use serde::{Deserialize, Serialize};

use super::types::{StudentId, StudentName};

/// Roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: StudentName,
}

impl Student {
    pub fn new(id: StudentId, name: StudentName) -> Self {
        Self { id, name }
    }
}

/// Rows removed by deleting a student together with its attendance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudentRemoval {
    pub attendance_rows: u64,
    pub student_rows: u64,
}

impl StudentRemoval {
    pub fn is_noop(&self) -> bool {
        self.attendance_rows == 0 && self.student_rows == 0
    }
}
