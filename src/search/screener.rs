//! Search and word-count screening

use crate::arxiv::{Article, ArxivClient};
use crate::config::PdfSettings;
use crate::pdf::{word_count, TextSource};
use anyhow::Result;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// An article that passed screening
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenedArticle {
    #[serde(flatten)]
    pub article: Article,
    /// Words in the extracted leading pages
    pub word_count: usize,
}

/// Searches arXiv and keeps only short-enough papers
#[derive(Clone)]
pub struct Screener {
    arxiv: ArxivClient,
    source: Arc<dyn TextSource>,
    /// Default screening threshold
    max_word_count: usize,
    /// Concurrent extractions while screening
    concurrency: usize,
}

impl Screener {
    pub fn new(arxiv: ArxivClient, source: Arc<dyn TextSource>, settings: &PdfSettings) -> Self {
        Self {
            arxiv,
            source,
            max_word_count: settings.max_word_count,
            concurrency: settings.concurrency.max(1),
        }
    }

    /// Configured screening threshold
    pub fn max_word_count(&self) -> usize {
        self.max_word_count
    }

    /// Search arXiv; failures are logged and yield no articles
    pub async fn search(&self, query: &str, start: u32, max_results: u32) -> Vec<Article> {
        match self.arxiv.search(query, start, max_results).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("arXiv search for '{}' failed: {}", query, e);
                Vec::new()
            }
        }
    }

    /// Look up one article by arXiv identifier
    pub async fn lookup(&self, id: &str) -> Result<Option<Article>> {
        self.arxiv.fetch(id).await
    }

    /// Search, then screen the results by word count
    pub async fn fetch_and_filter(
        &self,
        query: &str,
        start: u32,
        max_results: u32,
        max_word_count: usize,
    ) -> Vec<ScreenedArticle> {
        let articles = self.search(query, start, max_results).await;
        self.screen(articles, max_word_count).await
    }

    /// Extract leading text for every article and keep those with at most
    /// `max_word_count` words.
    ///
    /// Extractions run concurrently up to the configured bound; results keep
    /// the input order. Articles whose text cannot be extracted are dropped.
    pub async fn screen(&self, articles: Vec<Article>, max_word_count: usize) -> Vec<ScreenedArticle> {
        let total = articles.len();
        let start = Instant::now();

        let screened: Vec<ScreenedArticle> = stream::iter(articles)
            .map(|article| async move {
                let words = self
                    .source
                    .leading_text(&article.pdf_link)
                    .await
                    .map(|text| word_count(&text));
                (article, words)
            })
            .buffered(self.concurrency)
            .filter_map(|(article, words)| async move {
                match words {
                    Some(words) if words <= max_word_count => Some(ScreenedArticle {
                        article,
                        word_count: words,
                    }),
                    Some(words) => {
                        debug!("Skipping {} ({} words > {})", article.id, words, max_word_count);
                        None
                    }
                    None => {
                        debug!("Skipping {} (no text)", article.id);
                        None
                    }
                }
            })
            .collect()
            .await;

        info!(
            "Screened {} articles, kept {} in {:?}",
            total,
            screened.len(),
            start.elapsed()
        );
        screened
    }
}
