//! Server-rendered HTML pages.
//!
//! Every value that originates from a user passes through [`text`] or
//! [`attr`] before it is placed in markup.

mod complaint;
mod student;

use std::borrow::Cow;
use std::fmt::Write;

pub use complaint::{complaint_form_page, complaints_page};
pub use student::{
    RegisterFormValues, dashboard_page, login_page, profile_page, register_page,
};

use crate::models::student::Student;

/// Escapes text content.
fn text(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

/// Escapes a double-quoted attribute value.
fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

fn alert(kind: &str, message: Option<&str>) -> String {
    message.map_or_else(String::new, |m| {
        format!(r#"<div class="alert alert-{kind}" role="alert">{}</div>"#, text(m))
    })
}

fn nav(student: Option<&Student>) -> String {
    let Some(student) = student else {
        return String::new();
    };

    format!(
        r#"<nav class="nav">
  <img class="avatar" src="{img}" alt="Profile photo">
  <span class="who">{name}</span>
  <a href="/student/dashboard">Dashboard</a>
  <a href="/complaint">New complaint</a>
  <a href="/student/myComplaints">My complaints</a>
  <a href="/student/allComplaints">All complaints</a>
  <a href="/student/student_profile">Profile</a>
  <form method="post" action="/student/logout" class="inline"><button type="submit">Log out</button></form>
</nav>"#,
        img = attr(&student.profile_image_url()),
        name = text(&student.student_name),
    )
}

fn layout(title: &str, student: Option<&Student>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Complaint Desk</title>
<link rel="stylesheet" href="/css/app.css">
</head>
<body>
{nav}
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>"#,
        title = text(title),
        nav = nav(student),
    )
}

/// Generic page for errors that have no form to return to.
#[must_use]
pub fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        r#"{}
<p><a href="/student/dashboard">Back to dashboard</a></p>"#,
        alert("error", Some(message))
    );
    layout(title, None, &body)
}

fn details_table(rows: &[(&str, &str)]) -> String {
    let mut out = String::from(r#"<table class="details">"#);
    for (label, value) in rows {
        let _ = write!(
            out,
            "<tr><th>{}</th><td>{}</td></tr>",
            text(label),
            text(value)
        );
    }
    out.push_str("</table>");
    out
}
