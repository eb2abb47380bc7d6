//! List students command handler

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_list_students(config: Config) -> anyhow::Result<()> {
    let shared = SharedState::new(config).await?;
    let students = shared.student_service.list_students().await?;

    if students.is_empty() {
        println!("No students registered.");
        return Ok(());
    }

    println!("Registered Students ({} total)", students.len());
    println!("{:-<70}", "");

    for student in students {
        println!(
            "{} {} <{}>",
            student.enrollment_number, student.student_name, student.email
        );
        println!(
            "  ID: {} | {} / {} | Photo: {}",
            student.id,
            student.department,
            student.course,
            student.photo_path.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
