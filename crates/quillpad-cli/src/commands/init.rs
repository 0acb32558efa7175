use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use quillpad_config::QuillpadConfig;

/// Writes the default config to `target`, or ./quillpad.json.
pub fn cmd_init(target: Option<&Path>) -> Result<()> {
    let path = target.map_or_else(|| PathBuf::from(QuillpadConfig::FILE_NAME), Path::to_path_buf);
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(&QuillpadConfig::default())
        .context("serialize default config")?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    println!("{} {}", "created".green(), path.display());
    Ok(())
}
