use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::utils::{load_config, open_database};

pub async fn cmd_migrate(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    open_database(&config).await?;
    println!("{} schema is up to date", "ok".green());
    Ok(())
}
