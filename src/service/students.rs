//! Roster handler
//!
//! `GET` lists students by name, `POST` adds one (keeping any existing row
//! with the same id), and `DELETE` removes a student together with every
//! attendance row that references it.

use async_trait::async_trait;
use http::{Method, StatusCode};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::request::{Acknowledgement, RequestHandler, ServiceRequest, ServiceResponse};
use crate::domain::{Student, StudentId, StudentRemoval};
use crate::infrastructure::{log_messages, StudentRepository};
use crate::Result;

pub struct StudentService {
    repository: Arc<dyn StudentRepository>,
}

impl StudentService {
    pub const ALLOWED_METHODS: &'static str = "GET, POST, DELETE, OPTIONS";

    pub fn new(repository: Arc<dyn StudentRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Student>> {
        let students = self.repository.list_students().await?;
        info!(students = students.len(), "{}", log_messages::students::LISTED);
        Ok(students)
    }

    /// Add a student. An id that already exists is left untouched and still
    /// reported as created.
    #[instrument(skip(self, student), fields(student_id = %student.id))]
    pub async fn create(&self, student: &Student) -> Result<StudentId> {
        if self.repository.insert_student(student).await? {
            info!("{}", log_messages::students::CREATED);
        } else {
            info!("{}", log_messages::students::ALREADY_EXISTS);
        }
        Ok(student.id.clone())
    }

    #[instrument(skip(self), fields(student_id = %id))]
    pub async fn delete(&self, id: &StudentId) -> Result<StudentRemoval> {
        let removal = self.repository.remove_student(id).await?;
        info!(
            attendance_rows = removal.attendance_rows,
            student_rows = removal.student_rows,
            "{}",
            log_messages::students::REMOVED
        );
        Ok(removal)
    }
}

#[async_trait]
impl RequestHandler for StudentService {
    fn allowed_methods(&self) -> &'static str {
        Self::ALLOWED_METHODS
    }

    async fn handle(&self, request: ServiceRequest) -> Result<ServiceResponse> {
        match request.method {
            Method::OPTIONS => Ok(ServiceResponse::preflight(self.allowed_methods())),
            Method::GET => {
                let students = self.list().await?;
                ServiceResponse::json(StatusCode::OK, &students)
            }
            Method::POST => {
                let student: Student = request.json_body()?;
                let id = self.create(&student).await?;
                ServiceResponse::json(StatusCode::CREATED, &Acknowledgement::created(id))
            }
            Method::DELETE => {
                match request.query_param("id") {
                    Some(id) => {
                        self.delete(&StudentId::new(id.to_string())).await?;
                    }
                    None => info!("{}", log_messages::students::REMOVE_WITHOUT_ID),
                }
                ServiceResponse::json(StatusCode::OK, &Acknowledgement::success())
            }
            _ => {
                warn!(
                    method = %request.method,
                    "{}",
                    log_messages::request_processing::METHOD_NOT_ALLOWED
                );
                ServiceResponse::method_not_allowed()
            }
        }
    }
}
