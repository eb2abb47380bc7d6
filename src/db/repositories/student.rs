use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{prelude::*, students};
use crate::models::student::{NewStudent, Student};

impl From<students::Model> for Student {
    fn from(model: students::Model) -> Self {
        Self {
            id: model.id,
            enrollment_number: model.enrollment_number,
            student_name: model.student_name,
            email: model.email,
            department: model.department,
            course: model.course,
            photo_path: model.photo_path,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct StudentRepository {
    conn: DatabaseConnection,
}

impl StudentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a student. The raw `DbErr` is returned so callers can tell a
    /// uniqueness violation apart from other failures.
    pub async fn insert(&self, student: &NewStudent) -> Result<Student, DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = students::ActiveModel {
            enrollment_number: Set(student.enrollment_number.clone()),
            student_name: Set(student.student_name.clone()),
            email: Set(student.email.clone()),
            department: Set(student.department.clone()),
            course: Set(student.course.clone()),
            password_hash: Set(student.password_hash.clone()),
            photo_path: Set(student.photo_path.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        Ok(Student::from(model))
    }

    /// Get student by (already normalized) email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Student>> {
        let student = Students::find()
            .filter(students::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query student by email")?;

        Ok(student.map(Student::from))
    }

    /// Get student together with the stored password hash
    pub async fn get_with_password_hash(&self, email: &str) -> Result<Option<(Student, String)>> {
        let student = Students::find()
            .filter(students::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query student for credentials")?;

        Ok(student.map(|s| {
            let password_hash = s.password_hash.clone();
            (Student::from(s), password_hash)
        }))
    }

    pub async fn update_password_hash(&self, id: i32, password_hash: String) -> Result<()> {
        let student = Students::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query student for password update")?
            .ok_or_else(|| anyhow::anyhow!("Student not found: {id}"))?;

        let mut active: students::ActiveModel = student.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active
            .update(&self.conn)
            .await
            .context("Failed to update password hash")?;

        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<Student>> {
        let rows = Students::find()
            .order_by_asc(students::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list students")?;

        Ok(rows.into_iter().map(Student::from).collect())
    }

    /// Every photo filename currently referenced by a student
    pub async fn photo_paths(&self) -> Result<Vec<String>> {
        let paths: Vec<Option<String>> = Students::find()
            .select_only()
            .column(students::Column::PhotoPath)
            .filter(students::Column::PhotoPath.is_not_null())
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to list student photo paths")?;

        Ok(paths.into_iter().flatten().collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Students::find()
            .count(&self.conn)
            .await
            .context("Failed to count students")
    }
}
