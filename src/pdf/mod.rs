//! PDF text extraction
//!
//! Downloads a paper and keeps the text of its first few pages, which is what
//! the screening step counts words over and what the summarizer reads.

mod clean;
mod extract;

pub use clean::{clean_extracted_text, leading_pages, word_count};
pub use extract::{PdfError, PdfExtractor};

use async_trait::async_trait;

/// Anything that can turn a PDF link into leading-page text.
///
/// Failures are reported as `None`; implementations log the reason.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn leading_text(&self, pdf_url: &str) -> Option<String>;
}
