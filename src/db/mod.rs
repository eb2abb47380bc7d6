use crate::models::complaint::{Complaint, NewComplaint, Submitter};
use crate::models::student::{NewStudent, Student};
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        ensure_sqlite_file(db_url).await?;

        let mut options = ConnectOptions::new(db_url.to_string());
        options
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .with_context(|| format!("Failed to connect to {db_url}"))?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply migrations")?;

        info!(
            pool_min = min_connections,
            pool_max = max_connections,
            "Database ready"
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn student_repo(&self) -> repositories::student::StudentRepository {
        repositories::student::StudentRepository::new(self.conn.clone())
    }

    fn complaint_repo(&self) -> repositories::complaint::ComplaintRepository {
        repositories::complaint::ComplaintRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Students
    // ========================================================================

    pub async fn insert_student(&self, student: &NewStudent) -> Result<Student, DbErr> {
        self.student_repo().insert(student).await
    }

    pub async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        self.student_repo().get_by_email(email).await
    }

    pub async fn get_student_credentials(&self, email: &str) -> Result<Option<(Student, String)>> {
        self.student_repo().get_with_password_hash(email).await
    }

    pub async fn update_student_password_hash(&self, id: i32, password_hash: String) -> Result<()> {
        self.student_repo()
            .update_password_hash(id, password_hash)
            .await
    }

    pub async fn list_students(&self) -> Result<Vec<Student>> {
        self.student_repo().list_all().await
    }

    pub async fn student_photo_paths(&self) -> Result<Vec<String>> {
        self.student_repo().photo_paths().await
    }

    pub async fn count_students(&self) -> Result<u64> {
        self.student_repo().count().await
    }

    // ========================================================================
    // Complaints
    // ========================================================================

    pub async fn insert_complaint(
        &self,
        submitter: &Submitter,
        complaint: &NewComplaint,
    ) -> Result<Complaint> {
        self.complaint_repo().insert(submitter, complaint).await
    }

    pub async fn list_complaints(&self) -> Result<Vec<Complaint>> {
        self.complaint_repo().list_all().await
    }

    pub async fn list_complaints_by_email(&self, email: &str) -> Result<Vec<Complaint>> {
        self.complaint_repo().list_by_email(email).await
    }

    pub async fn count_complaints(&self) -> Result<u64> {
        self.complaint_repo().count().await
    }
}

/// SQLite will not create a missing database file through a plain
/// `sqlite:` URL, so create it and its parent directory up front.
async fn ensure_sqlite_file(db_url: &str) -> Result<()> {
    if db_url.contains(":memory:") {
        return Ok(());
    }

    let path = Path::new(db_url.trim_start_matches("sqlite:").trim_start_matches("//"));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        tokio::fs::File::create(path)
            .await
            .with_context(|| format!("Failed to create database file {}", path.display()))?;
    }

    Ok(())
}
