use serde::{Deserialize, Serialize};

use super::student::Student;

/// A stored complaint. Submitter fields are a point-in-time copy of the
/// student record and do not track later profile changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: i32,
    pub enrollment_number: String,
    pub name: String,
    pub email: String,
    pub course: String,
    pub department: String,
    pub complaint_type: String,
    pub description: String,
    pub created_at: String,
}

/// Submitter snapshot taken from the authenticated student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitter {
    pub enrollment_number: String,
    pub name: String,
    pub email: String,
    pub course: String,
    pub department: String,
}

impl From<&Student> for Submitter {
    fn from(student: &Student) -> Self {
        Self {
            enrollment_number: student.enrollment_number.clone(),
            name: student.student_name.clone(),
            email: student.email.clone(),
            course: student.course.clone(),
            department: student.department.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComplaint {
    pub complaint_type: String,
    pub description: String,
}
