use std::path::Path;

use anyhow::{Context, Result};
use quillpad_server::{AppState, TokenIssuer};
use quillpad_service::Blog;
use tracing::warn;

use crate::utils::{init_logging, load_config, open_database};

pub async fn cmd_serve(config: Option<&Path>, bind: Option<String>) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    init_logging(&config.log)?;
    if config.auth.uses_default_secret() {
        warn!("auth.jwtSecret is the built-in development secret; set QUILLPAD_JWT_SECRET in production");
    }

    let db = open_database(&config).await?;
    let blog = Blog::from_config(db, &config).context("compile pitfall headings")?;
    let state = AppState::new(blog, TokenIssuer::from_config(&config.auth));

    quillpad_server::serve(state, config.server.bind())
        .await
        .with_context(|| format!("serve on {}", config.server.bind()))
}
