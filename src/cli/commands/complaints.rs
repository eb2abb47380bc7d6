//! List complaints command handler

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_list_complaints(config: Config, email: Option<&str>) -> anyhow::Result<()> {
    let shared = SharedState::new(config).await?;
    let service = &shared.complaint_service;

    let complaints = match email {
        Some(email) => service.list_by_email(email).await?,
        None => service.list_all().await?,
    };

    if complaints.is_empty() {
        println!("No complaints found.");
        return Ok(());
    }

    println!("Complaints ({} total)", complaints.len());
    println!("{:-<70}", "");

    for complaint in complaints {
        println!(
            "#{} [{}] {} <{}> {}",
            complaint.id,
            complaint.complaint_type,
            complaint.name,
            complaint.email,
            complaint.created_at
        );
        for line in complaint.description.lines() {
            println!("    {line}");
        }
    }

    Ok(())
}
