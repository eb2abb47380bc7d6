use super::{alert, attr, details_table, layout, text};
use crate::models::student::Student;

/// Non-sensitive registration fields echoed back when the form is
/// re-rendered. The password is never echoed.
#[derive(Debug, Default, Clone)]
pub struct RegisterFormValues {
    pub enrollment_number: String,
    pub student_name: String,
    pub email: String,
    pub department: String,
    pub course: String,
}

#[must_use]
pub fn register_page(error: Option<&str>, values: &RegisterFormValues) -> String {
    let body = format!(
        r#"{alert}
<form method="post" action="/student/register" enctype="multipart/form-data" class="card">
  <label>Enrollment number <input name="enrollmentNumber" value="{enrollment}" required></label>
  <label>Name <input name="studentName" value="{name}" required></label>
  <label>Email <input type="email" name="email" value="{email}" required></label>
  <label>Department <input name="department" value="{department}" required></label>
  <label>Course <input name="course" value="{course}" required></label>
  <label>Password <input type="password" name="password" required></label>
  <label>Photo <input type="file" name="photo" accept="image/*"></label>
  <button type="submit">Register</button>
</form>
<p>Already registered? <a href="/student/login">Log in</a></p>"#,
        alert = alert("error", error),
        enrollment = attr(&values.enrollment_number),
        name = attr(&values.student_name),
        email = attr(&values.email),
        department = attr(&values.department),
        course = attr(&values.course),
    );
    layout("Student registration", None, &body)
}

#[must_use]
pub fn login_page(error: Option<&str>, notice: Option<&str>) -> String {
    let body = format!(
        r#"{error}{notice}
<form method="post" action="/student/login" class="card">
  <label>Email <input type="email" name="email" required autofocus></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Log in</button>
</form>
<p>New here? <a href="/student/register">Create an account</a></p>"#,
        error = alert("error", error),
        notice = alert("info", notice),
    );
    layout("Student login", None, &body)
}

fn student_card(student: &Student) -> String {
    format!(
        r#"<section class="card profile">
  <img class="photo" src="{img}" alt="Profile photo of {alt}">
  {details}
</section>"#,
        img = attr(&student.profile_image_url()),
        alt = attr(&student.student_name),
        details = details_table(&[
            ("Enrollment number", student.enrollment_number.as_str()),
            ("Name", student.student_name.as_str()),
            ("Email", student.email.as_str()),
            ("Department", student.department.as_str()),
            ("Course", student.course.as_str()),
        ]),
    )
}

#[must_use]
pub fn dashboard_page(student: &Student, flash: Option<&str>) -> String {
    let body = format!(
        r#"{flash}
<p>Welcome, {name}.</p>
{card}"#,
        flash = alert("success", flash),
        name = text(&student.student_name),
        card = student_card(student),
    );
    layout("Dashboard", Some(student), &body)
}

#[must_use]
pub fn profile_page(student: &Student, error: Option<&str>) -> String {
    let body = format!(
        r#"{card}
<h2>Change password</h2>
{alert}
<form method="post" action="/student/updatePassword" class="card">
  <label>Current password <input type="password" name="currentPassword" required></label>
  <label>New password <input type="password" name="newPassword" required></label>
  <label>Confirm new password <input type="password" name="confirmPassword" required></label>
  <button type="submit">Update password</button>
</form>"#,
        card = student_card(student),
        alert = alert("error", error),
    );
    layout("Student profile", Some(student), &body)
}
