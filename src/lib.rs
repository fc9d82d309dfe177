//! arxiv-digest: search arXiv, screen papers by length, and read summarized
//! leading pages
//!
//! Searches run against the arXiv export API. Hits are screened by the word
//! count of their first PDF pages, and a detail page extracts those pages,
//! summarizes them chunk by chunk and links key terms to Wikipedia.

pub mod arxiv;
pub mod cache;
pub mod config;
pub mod linker;
pub mod network;
pub mod pdf;
pub mod search;
pub mod summarize;
pub mod text;
pub mod web;

pub use arxiv::Article;
pub use config::Settings;
pub use search::{ScreenedArticle, Screener};
pub use summarize::{Digest, Digester};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
