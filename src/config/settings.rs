//! Settings structures for arxiv-digest configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main settings structure, mirrors `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub arxiv: ArxivSettings,
    pub pdf: PdfSettings,
    pub summarizer: SummarizerSettings,
    pub linker: LinkerSettings,
    pub cache: CacheSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (ARXIV_DIGEST_* prefix, plus HF_API_TOKEN)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable source
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("ARXIV_DIGEST_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = lookup("ARXIV_DIGEST_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("ARXIV_DIGEST_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("ARXIV_DIGEST_BASE_URL") {
            self.server.base_url = Some(val);
        }
        if let Some(val) = lookup("HF_API_TOKEN") {
            if !val.is_empty() {
                self.summarizer.api_token = Some(val);
            }
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name displayed in UI
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "arXiv Digest".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Base URL for the instance
    pub base_url: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_address: "127.0.0.1".to_string(),
            base_url: None,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Suffix appended to the user agent (contact address, deployment name)
    pub useragent_suffix: Option<String>,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 20.0,
            useragent_suffix: None,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// arXiv API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArxivSettings {
    /// Query endpoint
    pub api_url: String,
    /// Results requested per search
    pub max_results: u32,
    /// Minimum spacing between API queries in milliseconds (0 disables)
    pub request_interval_ms: u64,
}

impl Default for ArxivSettings {
    fn default() -> Self {
        Self {
            api_url: "https://export.arxiv.org/api/query".to_string(),
            max_results: 10,
            request_interval_ms: 3000,
        }
    }
}

/// PDF download and screening settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    /// Leading pages to extract
    pub max_pages: usize,
    /// Articles with more extracted words than this are screened out
    pub max_word_count: usize,
    /// Refuse PDFs larger than this many bytes
    pub max_download_bytes: usize,
    /// Concurrent downloads while screening
    pub concurrency: usize,
    /// Screen search results by word count unless the request says otherwise
    pub filter_by_default: bool,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            max_pages: 3,
            max_word_count: 3050,
            max_download_bytes: 50 * 1024 * 1024,
            concurrency: 8,
            filter_by_default: true,
        }
    }
}

/// Which summarization backend to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarizerBackend {
    /// Hosted model on the Hugging Face Inference API
    #[default]
    #[serde(rename = "huggingface")]
    HuggingFace,
    /// Lead-sentence extraction, no network
    Extractive,
    /// Never summarize
    Disabled,
}

/// Summarization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerSettings {
    pub backend: SummarizerBackend,
    /// Inference endpoint; the model name is appended
    pub endpoint: String,
    /// Model identifier
    pub model: String,
    /// Bearer token for the inference API
    pub api_token: Option<String>,
    /// Inference timeout in seconds
    pub timeout: f64,
    /// Token budget per chunk
    pub max_tokens: usize,
    /// Word budget per chunk
    pub max_words: usize,
    /// Stop chunking once this many words have been taken
    pub word_cap: usize,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            backend: SummarizerBackend::default(),
            endpoint: "https://api-inference.huggingface.co/models".to_string(),
            model: "t5-small".to_string(),
            api_token: None,
            timeout: 120.0,
            max_tokens: 500,
            max_words: 4000,
            word_cap: 4000,
        }
    }
}

/// Key term linking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerSettings {
    /// Enable hyperlinking of key terms in summaries
    pub enabled: bool,
    /// Wikipedia language edition
    pub language: String,
    /// MediaWiki API URL; `{lang}` is substituted
    pub api_url: String,
    /// Terms to link
    pub keywords: Vec<String>,
}

impl Default for LinkerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            language: "en".to_string(),
            api_url: "https://{lang}.wikipedia.org/w/api.php".to_string(),
            keywords: vec![
                "machine learning".to_string(),
                "neural networks".to_string(),
                "AI".to_string(),
                "deep learning".to_string(),
            ],
        }
    }
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Lifetime of cached digests and links in seconds
    pub ttl_seconds: u64,
    /// Maximum cached entries per cache
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600,
            max_capacity: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5000);
        assert!(!settings.general.debug);
        assert_eq!(settings.pdf.max_pages, 3);
        assert_eq!(settings.pdf.max_word_count, 3050);
        assert_eq!(settings.summarizer.backend, SummarizerBackend::HuggingFace);
        assert_eq!(settings.linker.keywords.len(), 4);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
server:
  port: 9000
summarizer:
  backend: extractive
  max_tokens: 300
linker:
  keywords: ["transformer"]
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.bind_address, "127.0.0.1");
        assert_eq!(settings.summarizer.backend, SummarizerBackend::Extractive);
        assert_eq!(settings.summarizer.max_tokens, 300);
        assert_eq!(settings.summarizer.max_words, 4000);
        assert_eq!(settings.linker.keywords, vec!["transformer".to_string()]);
        assert_eq!(settings.arxiv.max_results, 10);
    }

    #[test]
    fn test_backend_names() {
        let backend: SummarizerBackend = serde_yaml::from_str("huggingface").unwrap();
        assert_eq!(backend, SummarizerBackend::HuggingFace);
        let backend: SummarizerBackend = serde_yaml::from_str("disabled").unwrap();
        assert_eq!(backend, SummarizerBackend::Disabled);
    }

    #[test]
    fn test_merge_vars() {
        let vars: HashMap<&str, &str> = [
            ("ARXIV_DIGEST_PORT", "8080"),
            ("ARXIV_DIGEST_DEBUG", "true"),
            ("HF_API_TOKEN", "hf_secret"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.merge_vars(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.server.port, 8080);
        assert!(settings.general.debug);
        assert_eq!(settings.summarizer.api_token.as_deref(), Some("hf_secret"));
        assert_eq!(settings.server.bind_address, "127.0.0.1");
    }

    #[test]
    fn test_merge_vars_ignores_bad_port() {
        let mut settings = Settings::default();
        settings.merge_vars(|key| (key == "ARXIV_DIGEST_PORT").then(|| "http".to_string()));
        assert_eq!(settings.server.port, 5000);
    }
}
