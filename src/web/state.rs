//! Application state shared across handlers

use crate::arxiv::ArxivClient;
use crate::config::Settings;
use crate::network::HttpClient;
use crate::pdf::{PdfExtractor, TextSource};
use crate::search::Screener;
use crate::summarize::Digester;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search and screening
    pub screener: Arc<Screener>,
    /// Extraction and summarization
    pub digester: Arc<Digester>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, client: HttpClient) -> anyhow::Result<Self> {
        let source: Arc<dyn TextSource> = Arc::new(PdfExtractor::new(client.clone(), &settings.pdf));
        let arxiv = ArxivClient::new(client.clone(), &settings.arxiv);
        let screener = Screener::new(arxiv, source.clone(), &settings.pdf);
        let digester = Digester::from_settings(&settings, &client, source);

        Self::from_parts(settings, screener, digester)
    }

    /// Assemble state from already built components
    pub fn from_parts(
        settings: Settings,
        screener: Screener,
        digester: Digester,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            settings: Arc::new(settings),
            screener: Arc::new(screener),
            digester: Arc::new(digester),
            templates: Arc::new(super::Templates::new()?),
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
