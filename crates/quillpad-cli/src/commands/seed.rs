use std::path::Path;

use anyhow::{Result, anyhow};
use colored::Colorize;
use quillpad_service::Blog;

use crate::utils::{load_config, open_database};

pub async fn cmd_seed(config: Option<&Path>, email: &str, username: &str, password: &str) -> Result<()> {
    let config = load_config(config)?;
    let db = open_database(&config).await?;

    let admin = Blog::new(db)
        .seed_admin(email, username, password)
        .await
        .map_err(|e| anyhow!("seed admin: {e}"))?;
    println!(
        "{} admin '{}' <{}> (id {})",
        "seeded".green(),
        admin.username,
        admin.email,
        admin.id
    );
    Ok(())
}
