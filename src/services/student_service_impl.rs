//! `SeaORM` implementation of the `StudentService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::models::student::{NewStudent, Registration, Student, normalize_email};
use crate::services::credentials::PasswordEncoder;
use crate::services::student_service::{StudentError, StudentService};

pub struct SeaOrmStudentService {
    store: Store,
    encoder: Arc<dyn PasswordEncoder>,
}

impl SeaOrmStudentService {
    #[must_use]
    pub fn new(store: Store, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { store, encoder }
    }
}

#[async_trait]
impl StudentService for SeaOrmStudentService {
    async fn register(
        &self,
        registration: Registration,
        photo_path: Option<String>,
    ) -> Result<Student, StudentError> {
        let password_hash = self.encoder.encode(&registration.password).await?;

        let new_student = NewStudent {
            enrollment_number: registration.enrollment_number.trim().to_string(),
            student_name: registration.student_name.trim().to_string(),
            email: normalize_email(&registration.email),
            department: registration.department.trim().to_string(),
            course: registration.course.trim().to_string(),
            password_hash,
            photo_path,
        };

        let student = self.store.insert_student(&new_student).await?;

        metrics::counter!("students_registered_total").increment(1);
        info!(
            student_id = student.id,
            enrollment_number = %student.enrollment_number,
            "Student registered"
        );

        Ok(student)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, StudentError> {
        Ok(self
            .store
            .get_student_by_email(&normalize_email(email))
            .await?)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Student, StudentError> {
        let Some((student, password_hash)) = self
            .store
            .get_student_credentials(&normalize_email(email))
            .await?
        else {
            return Err(StudentError::InvalidCredentials);
        };

        if !self.encoder.matches(password, &password_hash).await? {
            return Err(StudentError::InvalidCredentials);
        }

        Ok(student)
    }

    async fn change_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), StudentError> {
        let email = normalize_email(email);
        let (student, password_hash) = self
            .store
            .get_student_credentials(&email)
            .await?
            .ok_or_else(|| StudentError::NotFound(email.clone()))?;

        if !self.encoder.matches(current_password, &password_hash).await? {
            return Err(StudentError::IncorrectCurrentPassword);
        }

        if new_password != confirm_password {
            return Err(StudentError::ConfirmationMismatch);
        }

        if new_password.is_empty() {
            return Err(StudentError::Validation(
                "New password cannot be empty".to_string(),
            ));
        }

        let new_hash = self.encoder.encode(new_password).await?;
        self.store
            .update_student_password_hash(student.id, new_hash)
            .await?;

        info!(student_id = student.id, "Password changed");

        Ok(())
    }

    async fn list_students(&self) -> Result<Vec<Student>, StudentError> {
        Ok(self.store.list_students().await?)
    }
}
