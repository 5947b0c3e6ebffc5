use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool, Row};
use tracing::{debug, info, instrument};

use super::log_messages;
use super::repository::{AttendanceRepository, HealthCheck, StudentRepository};
use crate::config::DatabaseSettings;
use crate::domain::{
    AttendanceDate, AttendanceRecord, MonthFilter, PairIndex, Student, StudentId, StudentName,
    StudentRemoval,
};
use crate::{Error, Result};

const SELECT_ATTENDANCE: &str =
    "SELECT student_id, date, pair_index, is_present FROM attendance ORDER BY date, pair_index";

const SELECT_ATTENDANCE_FOR_MONTH: &str = "SELECT student_id, date, pair_index, is_present \
     FROM attendance WHERE starts_with(date, $1) ORDER BY date, pair_index";

const UPSERT_ATTENDANCE: &str = "INSERT INTO attendance (student_id, date, pair_index, is_present) \
     VALUES ($1, $2, $3, $4) \
     ON CONFLICT (student_id, date, pair_index) DO UPDATE SET is_present = EXCLUDED.is_present";

const SELECT_STUDENTS: &str = "SELECT id, name FROM students ORDER BY name";

const INSERT_STUDENT: &str =
    "INSERT INTO students (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING";

const DELETE_STUDENT_ATTENDANCE: &str = "DELETE FROM attendance WHERE student_id = $1";

const DELETE_STUDENT: &str = "DELETE FROM students WHERE id = $1";

#[derive(Debug, FromRow)]
struct AttendanceRow {
    student_id: String,
    date: String,
    pair_index: i32,
    is_present: bool,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = Error;

    fn try_from(row: AttendanceRow) -> Result<Self> {
        let pair_index =
            PairIndex::try_new(row.pair_index).map_err(|_| Error::invalid_input("pair_index"))?;
        Ok(AttendanceRecord::new(
            StudentId::new(row.student_id),
            AttendanceDate::new(row.date),
            pair_index,
            row.is_present,
        ))
    }
}

#[derive(Debug, FromRow)]
struct StudentRow {
    id: String,
    name: String,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student::new(StudentId::new(row.id), StudentName::new(row.name))
    }
}

/// PostgreSQL-backed store
///
/// Reads borrow a single pooled connection for the duration of the call.
/// Writes run inside a transaction that is committed before returning; if
/// any statement fails the transaction guard is dropped, which rolls it back
/// and hands the connection back to the pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(settings), fields(max_connections = settings.max_connections))]
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.url)
            .await?;
        info!("{}", log_messages::database::CONNECTION_ESTABLISHED);
        Ok(Self::new(pool))
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("{}", log_messages::database::MIGRATION_STARTED);
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("{}", log_messages::database::MIGRATION_COMPLETED);
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for PostgresStore {
    async fn health_check(&self) -> Result<()> {
        let row = sqlx::query("SELECT 1 as health_check")
            .fetch_one(&self.pool)
            .await?;

        let health_check: i32 = row.try_get("health_check")?;

        if health_check == 1 {
            Ok(())
        } else {
            Err(Error::application(
                log_messages::database::HEALTH_CHECK_FAILED,
            ))
        }
    }
}

#[async_trait]
impl AttendanceRepository for PostgresStore {
    async fn fetch_attendance(&self, month: Option<&MonthFilter>) -> Result<Vec<AttendanceRecord>> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<AttendanceRow> = match month {
            Some(month) => {
                sqlx::query_as(SELECT_ATTENDANCE_FOR_MONTH)
                    .bind(month.to_string())
                    .fetch_all(&mut *conn)
                    .await?
            }
            None => {
                sqlx::query_as(SELECT_ATTENDANCE)
                    .fetch_all(&mut *conn)
                    .await?
            }
        };

        rows.into_iter().map(AttendanceRecord::try_from).collect()
    }

    async fn upsert_attendance(&self, record: &AttendanceRecord) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(UPSERT_ATTENDANCE)
            .bind(record.student_id.as_ref())
            .bind(record.date.as_ref())
            .bind(record.pair_index.into_inner())
            .bind(record.is_present)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(rows = result.rows_affected(), "attendance upserted");
        Ok(())
    }
}

#[async_trait]
impl StudentRepository for PostgresStore {
    async fn list_students(&self) -> Result<Vec<Student>> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<StudentRow> = sqlx::query_as(SELECT_STUDENTS)
            .fetch_all(&mut *conn)
            .await?;

        Ok(rows.into_iter().map(Student::from).collect())
    }

    async fn insert_student(&self, student: &Student) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(INSERT_STUDENT)
            .bind(student.id.as_ref())
            .bind(student.name.as_ref())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_student(&self, id: &StudentId) -> Result<StudentRemoval> {
        // Both deletes share one transaction, attendance first so that no
        // committed state ever has attendance rows without their student.
        let mut tx = self.pool.begin().await?;

        let attendance = sqlx::query(DELETE_STUDENT_ATTENDANCE)
            .bind(id.as_ref())
            .execute(&mut *tx)
            .await?;

        let student = sqlx::query(DELETE_STUDENT)
            .bind(id.as_ref())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(StudentRemoval {
            attendance_rows: attendance.rows_affected(),
            student_rows: student.rows_affected(),
        })
    }
}
