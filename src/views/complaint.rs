use std::fmt::Write;

use super::{alert, attr, layout, text};
use crate::models::complaint::Complaint;
use crate::models::student::Student;

/// Categories offered on the complaint form. The stored value is free text.
const COMPLAINT_TYPES: &[&str] = &[
    "Academic",
    "Examination",
    "Hostel",
    "Library",
    "Infrastructure",
    "Transport",
    "Fees",
    "Other",
];

#[must_use]
pub fn complaint_form_page(student: &Student, error: Option<&str>) -> String {
    let mut options = String::new();
    for kind in COMPLAINT_TYPES {
        let _ = write!(options, r#"<option value="{0}">{0}</option>"#, attr(kind));
    }

    let body = format!(
        r#"{alert}
<form method="post" action="/registerComplaint" class="card">
  <label>Enrollment number <input name="enrollmentNumber" value="{enrollment}" readonly></label>
  <label>Name <input name="name" value="{name}" readonly></label>
  <label>Email <input name="email" value="{email}" readonly></label>
  <label>Course <input name="course" value="{course}" readonly></label>
  <label>Department <input name="department" value="{department}" readonly></label>
  <label>Complaint type <select name="complaintType" required>{options}</select></label>
  <label>Description <textarea name="description" rows="6" required></textarea></label>
  <button type="submit">Submit complaint</button>
</form>"#,
        alert = alert("error", error),
        enrollment = attr(&student.enrollment_number),
        name = attr(&student.student_name),
        email = attr(&student.email),
        course = attr(&student.course),
        department = attr(&student.department),
    );
    layout("File a complaint", Some(student), &body)
}

#[must_use]
pub fn complaints_page(title: &str, student: &Student, complaints: &[Complaint]) -> String {
    let mut body = String::new();

    if complaints.is_empty() {
        body.push_str(r#"<p class="empty">No complaints yet.</p>"#);
    } else {
        body.push_str(
            r#"<table class="complaints">
<thead><tr><th>#</th><th>Filed</th><th>Enrollment</th><th>Name</th><th>Email</th><th>Course</th><th>Department</th><th>Type</th><th>Description</th></tr></thead>
<tbody>"#,
        );
        for c in complaints {
            let _ = write!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"description\">{}</td></tr>",
                c.id,
                text(&c.created_at),
                text(&c.enrollment_number),
                text(&c.name),
                text(&c.email),
                text(&c.course),
                text(&c.department),
                text(&c.complaint_type),
                text(&c.description),
            );
        }
        body.push_str("</tbody></table>");
    }

    layout(title, Some(student), &body)
}
