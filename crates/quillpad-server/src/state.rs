use std::sync::Arc;

use quillpad_service::Blog;

use crate::auth::TokenIssuer;

/// Shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub blog: Blog,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(blog: Blog, tokens: TokenIssuer) -> Self {
        Self {
            blog,
            tokens: Arc::new(tokens),
        }
    }
}
