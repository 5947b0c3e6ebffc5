//! Attendance handler
//!
//! `GET` returns day views, optionally for one month; `POST` records a single
//! presence mark. Nothing is validated beyond what the body types enforce.

use async_trait::async_trait;
use http::{Method, StatusCode};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::request::{Acknowledgement, RequestHandler, ServiceRequest, ServiceResponse};
use crate::domain::{group_by_student_day, AttendanceDayView, AttendanceRecord, MonthFilter};
use crate::infrastructure::{log_messages, AttendanceRepository};
use crate::Result;

pub struct AttendanceService {
    repository: Arc<dyn AttendanceRepository>,
}

impl AttendanceService {
    pub const ALLOWED_METHODS: &'static str = "GET, POST, OPTIONS";

    pub fn new(repository: Arc<dyn AttendanceRepository>) -> Self {
        Self { repository }
    }

    /// Day views for every stored record, or only those in `month`
    #[instrument(skip(self))]
    pub async fn list(&self, month: Option<&MonthFilter>) -> Result<Vec<AttendanceDayView>> {
        let records = self.repository.fetch_attendance(month).await?;
        let views = group_by_student_day(records);
        info!(views = views.len(), "{}", log_messages::attendance::LISTED);
        Ok(views)
    }

    /// Record one presence mark, overwriting an existing mark for the same slot
    #[instrument(
        skip(self, record),
        fields(
            student_id = %record.student_id,
            date = %record.date,
            pair_index = %record.pair_index,
            is_present = record.is_present
        )
    )]
    pub async fn upsert(&self, record: &AttendanceRecord) -> Result<()> {
        self.repository.upsert_attendance(record).await?;
        info!("{}", log_messages::attendance::RECORDED);
        Ok(())
    }
}

#[async_trait]
impl RequestHandler for AttendanceService {
    fn allowed_methods(&self) -> &'static str {
        Self::ALLOWED_METHODS
    }

    async fn handle(&self, request: ServiceRequest) -> Result<ServiceResponse> {
        match request.method {
            Method::OPTIONS => Ok(ServiceResponse::preflight(self.allowed_methods())),
            Method::GET => {
                let month = MonthFilter::from_query(request.query_param("month"));
                let views = self.list(month.as_ref()).await?;
                ServiceResponse::json(StatusCode::OK, &views)
            }
            Method::POST => {
                let record: AttendanceRecord = request.json_body()?;
                self.upsert(&record).await?;
                ServiceResponse::json(StatusCode::CREATED, &Acknowledgement::success())
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
