//! Config and database health check

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_check(config: &Config) -> anyhow::Result<()> {
    println!("Configuration OK");
    println!("  Database:   {}", config.general.database_path);
    println!("  Photo dir:  {}", config.uploads.photo_dir);
    println!(
        "  Listening:  {}:{}",
        config.server.bind_address, config.server.port
    );

    let store = Store::new(&config.general.database_path).await?;
    store.ping().await?;

    let students = store.count_students().await?;
    let complaints = store.count_complaints().await?;

    println!("Database OK ({students} students, {complaints} complaints)");
    Ok(())
}
