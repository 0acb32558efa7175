use anyhow::{Context, Result};
use quillpad_config::QuillpadConfig;

pub fn cmd_schema() -> Result<()> {
    println!("{}", config_schema()?);
    Ok(())
}

fn config_schema() -> Result<String> {
    let schema = schemars::schema_for!(QuillpadConfig);
    serde_json::to_string_pretty(&schema).context("serialize config schema")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn schema_lists_top_level_sections() {
        let schema: Value = serde_json::from_str(&config_schema().unwrap()).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for key in ["server", "database", "auth", "cache", "pitfall", "log"] {
            assert!(properties.contains_key(key), "missing {key}");
        }
    }
}
