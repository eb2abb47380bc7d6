use serde::{Deserialize, Serialize};

use crate::constants::paths::{DEFAULT_PROFILE_IMAGE, PHOTO_URL_PREFIX};

/// A registered student, without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i32,
    pub enrollment_number: String,
    pub student_name: String,
    pub email: String,
    pub department: String,
    pub course: String,
    pub photo_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Student {
    /// URL the student's photo is displayed from.
    #[must_use]
    pub fn profile_image_url(&self) -> String {
        profile_image_url(self.photo_path.as_deref())
    }
}

/// Resolves a stored photo filename to its public URL, or the placeholder.
#[must_use]
pub fn profile_image_url(photo_path: Option<&str>) -> String {
    match photo_path {
        Some(name) if !name.is_empty() => format!("{PHOTO_URL_PREFIX}/{name}"),
        _ => DEFAULT_PROFILE_IMAGE.to_string(),
    }
}

/// Registration input as submitted. `password` is the raw password and is
/// hashed before anything is persisted.
#[derive(Clone)]
pub struct Registration {
    pub enrollment_number: String,
    pub student_name: String,
    pub email: String,
    pub department: String,
    pub course: String,
    pub password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("enrollment_number", &self.enrollment_number)
            .field("student_name", &self.student_name)
            .field("email", &self.email)
            .field("department", &self.department)
            .field("course", &self.course)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Row to insert once the password is hashed and the photo is stored.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub enrollment_number: String,
    pub student_name: String,
    pub email: String,
    pub department: String,
    pub course: String,
    pub password_hash: String,
    pub photo_path: Option<String>,
}

/// Emails are compared case-insensitively everywhere.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
