//! Summarization of article text
//!
//! Backends implement [`Summarizer`]; the [`Digester`] drives extraction,
//! chunking, per-chunk summarization and term linking for one article.

mod extractive;
mod huggingface;
mod pipeline;
mod traits;

pub use extractive::Extractive;
pub use huggingface::HuggingFace;
pub use pipeline::{ChunkSummaries, Digest, Digester};
pub use traits::{LengthBounds, Summarizer};

use crate::config::{SummarizerBackend, SummarizerSettings};
use crate::network::HttpClient;
use std::sync::Arc;
use tracing::info;

/// Instantiate the configured backend; `None` when summaries are disabled
pub fn build_summarizer(
    settings: &SummarizerSettings,
    client: &HttpClient,
) -> Option<Arc<dyn Summarizer>> {
    let summarizer: Arc<dyn Summarizer> = match settings.backend {
        SummarizerBackend::HuggingFace => Arc::new(HuggingFace::new(client.clone(), settings)),
        SummarizerBackend::Extractive => Arc::new(Extractive::new()),
        SummarizerBackend::Disabled => {
            info!("Summarization disabled");
            return None;
        }
    };
    info!("Using {} summarizer", summarizer.name());
    Some(summarizer)
}
