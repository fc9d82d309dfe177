//! Article digestion: extract, chunk, summarize, link

use super::build_summarizer;
use super::traits::{LengthBounds, Summarizer};
use crate::arxiv::Article;
use crate::cache::{DigestCache, LinkCache};
use crate::config::Settings;
use crate::linker::{Hyperlinker, Wikipedia};
use crate::network::HttpClient;
use crate::pdf::{word_count, TextSource};
use crate::text::{chunk_text, ChunkLimits, SubwordEstimator, TokenCounter};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything the detail page shows for one article
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub article: Article,
    /// Leading-page text; `None` when the PDF could not be read
    pub text: Option<String>,
    pub word_count: usize,
    /// Whether a summary was asked for
    pub summary_requested: bool,
    /// Linked, HTML-escaped summary
    pub summary_html: Option<String>,
    /// Chunks sent to the summarizer
    pub chunks: usize,
}

/// Output of [`Digester::summarize_chunks`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSummaries {
    pub chunks: usize,
    pub summaries: Vec<String>,
}

/// Turns an article into a [`Digest`]
pub struct Digester {
    /// Leading-page text provider
    source: Arc<dyn TextSource>,
    /// Summarization backend; `None` disables summaries
    summarizer: Option<Arc<dyn Summarizer>>,
    /// Key term linker; `None` leaves summaries plain
    linker: Option<Hyperlinker>,
    counter: Arc<dyn TokenCounter>,
    limits: ChunkLimits,
    cache: DigestCache,
}

impl Digester {
    pub fn new(source: Arc<dyn TextSource>, summarizer: Option<Arc<dyn Summarizer>>) -> Self {
        Self {
            source,
            summarizer,
            linker: None,
            counter: Arc::new(SubwordEstimator::default()),
            limits: ChunkLimits::default(),
            cache: DigestCache::default(),
        }
    }

    /// Wire up the configured backend, chunk limits, term linker and cache
    pub fn from_settings(
        settings: &Settings,
        client: &HttpClient,
        source: Arc<dyn TextSource>,
    ) -> Self {
        let summarizer = build_summarizer(&settings.summarizer, client);
        let limits = ChunkLimits {
            max_tokens: settings.summarizer.max_tokens,
            max_words: settings.summarizer.max_words,
            word_cap: settings.summarizer.word_cap,
        };
        let cache = DigestCache::new(settings.cache.ttl_seconds, settings.cache.max_capacity);

        let mut digester = Self::new(source, summarizer)
            .with_limits(limits)
            .with_cache(cache);

        if settings.linker.enabled && !settings.linker.keywords.is_empty() {
            let wikipedia = Wikipedia::new(client.clone(), &settings.linker);
            digester = digester.with_linker(Hyperlinker::new(
                Arc::new(wikipedia),
                settings.linker.keywords.clone(),
                LinkCache::new(settings.cache.ttl_seconds, settings.cache.max_capacity),
            ));
        }
        digester
    }

    pub fn with_linker(mut self, linker: Hyperlinker) -> Self {
        self.linker = Some(linker);
        self
    }

    pub fn with_limits(mut self, limits: ChunkLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    pub fn with_cache(mut self, cache: DigestCache) -> Self {
        self.cache = cache;
        self
    }

    /// Whether a summarization backend is configured
    pub fn can_summarize(&self) -> bool {
        self.summarizer.is_some()
    }

    /// Chunk `text` and summarize each chunk in order.
    ///
    /// A failing chunk is logged and skipped; the others still count.
    pub async fn summarize_chunks(&self, text: &str) -> ChunkSummaries {
        let Some(summarizer) = &self.summarizer else {
            return ChunkSummaries::default();
        };

        let chunks = chunk_text(text, &self.limits, self.counter.as_ref());
        let mut summaries = Vec::with_capacity(chunks.len());

        for (i, chunk) in chunks.iter().enumerate() {
            debug!(
                "Summarizing chunk {}/{} ({} tokens) with {}",
                i + 1,
                chunks.len(),
                self.counter.count(chunk),
                summarizer.name()
            );
            match summarizer.summarize(chunk, LengthBounds::for_text(chunk)).await {
                Ok(summary) if !summary.is_empty() => summaries.push(summary),
                Ok(_) => debug!("Chunk {} produced an empty summary", i + 1),
                Err(e) => warn!("Failed to summarize chunk {}: {}", i + 1, e),
            }
        }

        ChunkSummaries {
            chunks: chunks.len(),
            summaries,
        }
    }

    /// Summarize `text` and return it as linked HTML.
    ///
    /// `None` when no backend is configured or every chunk failed.
    pub async fn process(&self, text: &str) -> Option<String> {
        self.process_counted(text).await.0
    }

    async fn process_counted(&self, text: &str) -> (Option<String>, usize) {
        let ChunkSummaries { chunks, summaries } = self.summarize_chunks(text).await;
        if summaries.is_empty() {
            return (None, chunks);
        }

        let joined = summaries.join(" ");
        let html = match &self.linker {
            Some(linker) => linker.link(&joined).await,
            None => tera::escape_html(&joined),
        };
        (Some(html), chunks)
    }

    /// Build the digest for `article`, reusing a cached one when present
    pub async fn digest(&self, article: Article, summarize: bool) -> Arc<Digest> {
        let summarize = summarize && self.can_summarize();
        if let Some(cached) = self.cache.get(&article.id, summarize).await {
            debug!("Digest cache hit for {}", article.id);
            return cached;
        }

        let start = Instant::now();
        let text = self.source.leading_text(&article.pdf_link).await;
        let words = text.as_deref().map(word_count).unwrap_or(0);

        let (summary_html, chunks) = match (&text, summarize) {
            (Some(text), true) => self.process_counted(text).await,
            _ => (None, 0),
        };

        info!(
            "Digested {} ({} words, {} chunks) in {:?}",
            article.id,
            words,
            chunks,
            start.elapsed()
        );

        let digest = Arc::new(Digest {
            article,
            text,
            word_count: words,
            summary_requested: summarize,
            summary_html,
            chunks,
        });

        // failed extractions and failed summaries are retried on the next request
        let failed_summary = digest.summary_requested && digest.summary_html.is_none();
        if digest.text.is_some() && !failed_summary {
            self.cache
                .set(&digest.article.id, summarize, digest.clone())
                .await;
        }
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SummarizerBackend;
    use crate::linker::LinkSource;
    use crate::text::WordCounter;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubText {
        text: Option<String>,
        calls: AtomicUsize,
    }

    impl StubText {
        fn new(text: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                text: text.map(str::to_string),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextSource for StubText {
        async fn leading_text(&self, _pdf_url: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.text.clone()
        }
    }

    /// Echoes the first word of each chunk; fails on chunks mentioning "fail"
    struct FirstWord;

    #[async_trait]
    impl Summarizer for FirstWord {
        fn name(&self) -> &str {
            "first-word"
        }

        async fn summarize(&self, text: &str, _bounds: LengthBounds) -> anyhow::Result<String> {
            if text.contains("fail") {
                bail!("model unavailable");
            }
            Ok(text.split_whitespace().next().unwrap_or_default().to_string())
        }
    }

    /// Fails its first call, then behaves like `FirstWord`
    struct FlakyOnce {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Summarizer for FlakyOnce {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn summarize(&self, text: &str, bounds: LengthBounds) -> anyhow::Result<String> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                bail!("model loading");
            }
            FirstWord.summarize(text, bounds).await
        }
    }

    struct FixedLink;

    #[async_trait]
    impl LinkSource for FixedLink {
        async fn link_for(&self, term: &str) -> Option<String> {
            Some(format!("https://en.wikipedia.org/wiki/{}", term.replace(' ', "_")))
        }
    }

    fn article() -> Article {
        Article {
            id: "2101.00001v1".to_string(),
            title: "A Paper".to_string(),
            authors: vec!["Ada Lovelace".to_string()],
            published: "2021-01-01T00:00:00Z".to_string(),
            summary: None,
            abs_link: "http://arxiv.org/abs/2101.00001v1".to_string(),
            pdf_link: "http://arxiv.org/pdf/2101.00001v1.pdf".to_string(),
        }
    }

    fn small_chunks() -> ChunkLimits {
        ChunkLimits {
            max_tokens: 4,
            max_words: 4,
            word_cap: 100,
        }
    }

    #[tokio::test]
    async fn test_summarize_chunks_skips_failures() {
        let digester = Digester::new(StubText::new(None), Some(Arc::new(FirstWord)))
            .with_limits(small_chunks())
            .with_counter(Arc::new(WordCounter));

        let result = digester
            .summarize_chunks("Alpha beta gamma. Then we fail here. Omega ends it.")
            .await;
        assert_eq!(result.chunks, 3);
        assert_eq!(result.summaries, vec!["Alpha", "Omega"]);
    }

    #[tokio::test]
    async fn test_process_links_terms() {
        let digester = Digester::new(StubText::new(None), Some(Arc::new(FirstWord)))
            .with_limits(small_chunks())
            .with_counter(Arc::new(WordCounter))
            .with_linker(Hyperlinker::new(
                Arc::new(FixedLink),
                vec!["AI".to_string()],
                LinkCache::new(60, 10),
            ));

        let html = digester.process("AI rocks. Systems <win> now.").await.unwrap();
        assert_eq!(
            html,
            r#"AI <a href="https://en.wikipedia.org/wiki/AI" target="_blank" rel="noopener" class="term-link">[Learn more]</a> Systems"#
        );
    }

    #[test]
    fn test_from_settings() {
        let client = HttpClient::new().unwrap();
        let mut settings = Settings::default();
        settings.summarizer.backend = SummarizerBackend::Disabled;

        let digester = Digester::from_settings(&settings, &client, StubText::new(None));
        assert!(!digester.can_summarize());
        assert!(digester.linker.is_some());
        assert_eq!(digester.limits.max_tokens, 500);

        settings.summarizer.backend = SummarizerBackend::Extractive;
        settings.linker.enabled = false;
        let digester = Digester::from_settings(&settings, &client, StubText::new(None));
        assert!(digester.can_summarize());
        assert!(digester.linker.is_none());
    }

    #[tokio::test]
    async fn test_process_without_backend() {
        let digester = Digester::new(StubText::new(None), None);
        assert!(!digester.can_summarize());
        assert_eq!(digester.process("Some text.").await, None);
    }

    #[tokio::test]
    async fn test_digest_caches_successful_extractions() {
        let source = StubText::new(Some("Deep results here. More results follow."));
        let digester = Digester::new(source.clone(), Some(Arc::new(FirstWord)))
            .with_counter(Arc::new(WordCounter));

        let first = digester.digest(article(), true).await;
        assert_eq!(first.word_count, 6);
        assert_eq!(first.chunks, 1);
        assert_eq!(first.summary_html.as_deref(), Some("Deep"));

        let second = digester.digest(article(), true).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        // text-only digests are cached separately
        let plain = digester.digest(article(), false).await;
        assert!(!plain.summary_requested);
        assert!(plain.summary_html.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_digest_without_text() {
        let source = StubText::new(None);
        let digester = Digester::new(source.clone(), Some(Arc::new(FirstWord)));

        let digest = digester.digest(article(), true).await;
        assert!(digest.text.is_none());
        assert_eq!(digest.word_count, 0);
        assert!(digest.summary_html.is_none());

        digester.digest(article(), true).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_digest_retries_failed_summary() {
        let source = StubText::new(Some("Deep results here. More results follow."));
        let summarizer = Arc::new(FlakyOnce {
            calls: AtomicUsize::new(0),
        });
        let digester = Digester::new(source.clone(), Some(summarizer))
            .with_counter(Arc::new(WordCounter));

        let first = digester.digest(article(), true).await;
        assert!(first.text.is_some());
        assert!(first.summary_html.is_none());

        let second = digester.digest(article(), true).await;
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.summary_html.as_deref(), Some("Deep"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        let third = digester.digest(article(), true).await;
        assert!(Arc::ptr_eq(&second, &third));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
