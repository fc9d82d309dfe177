//! Encyclopedia links for key terms in summaries

mod hyperlink;
mod wikipedia;

pub use hyperlink::{find_terms, insert_links, Hyperlinker, TermMatch};
pub use wikipedia::{LookupError, Wikipedia};

use async_trait::async_trait;

/// Resolves a term to an article URL; `None` when there is nothing to link
#[async_trait]
pub trait LinkSource: Send + Sync {
    async fn link_for(&self, term: &str) -> Option<String>;
}
