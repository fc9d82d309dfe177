//! Wikipedia page lookup through the MediaWiki action API

use super::LinkSource;
use crate::config::LinkerSettings;
use crate::network::{accept_json, HttpClient, HttpRequest};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("\"{title}\" may refer to {} pages", .options.len())]
    Disambiguation { title: String, options: Vec<String> },
    #[error("\"{0}\" does not match any pages")]
    PageMissing(String),
    #[error("\"{0}\" redirects to a page that cannot be resolved")]
    Redirect(String),
    #[error("timed out looking up \"{0}\"")]
    Timeout(String),
    #[error("lookup failed: {0}")]
    Http(String),
}

/// Wikipedia client resolving terms to canonical article URLs
#[derive(Clone)]
pub struct Wikipedia {
    client: HttpClient,
    api_url: String,
}

impl Wikipedia {
    pub fn new(client: HttpClient, settings: &LinkerSettings) -> Self {
        Self {
            client,
            api_url: api_url_for(&settings.api_url, &settings.language),
        }
    }

    /// Resolve `term` to a page URL, picking the best title by search first
    pub async fn page_url(&self, term: &str) -> Result<String, LookupError> {
        let title = self.search_title(term).await?;
        self.resolve(&title).await
    }

    /// Best matching page title for a free-text term
    pub async fn search_title(&self, term: &str) -> Result<String, LookupError> {
        let request = self
            .request()
            .param("list", "search")
            .param("srsearch", term)
            .param("srlimit", "1");
        let json = self.query(request, term).await?;

        json.pointer("/query/search/0/title")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| LookupError::PageMissing(term.to_string()))
    }

    /// Resolve an exact title to its canonical URL, following redirects
    pub async fn resolve(&self, title: &str) -> Result<String, LookupError> {
        let request = self
            .request()
            .param("titles", title)
            .param("redirects", "1")
            .param("prop", "info|pageprops")
            .param("inprop", "url")
            .param("ppprop", "disambiguation");
        let json = self.query(request, title).await?;

        let query = json
            .get("query")
            .ok_or_else(|| LookupError::PageMissing(title.to_string()))?;

        if query.get("interwiki").is_some() {
            return Err(LookupError::Redirect(title.to_string()));
        }

        let page = query
            .pointer("/pages/0")
            .ok_or_else(|| LookupError::PageMissing(title.to_string()))?;

        let redirected = query
            .get("redirects")
            .and_then(Value::as_array)
            .map(|r| !r.is_empty())
            .unwrap_or(false);

        if flag(page, "missing") || flag(page, "invalid") {
            return Err(if redirected {
                LookupError::Redirect(title.to_string())
            } else {
                LookupError::PageMissing(title.to_string())
            });
        }

        let resolved_title = page
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(title)
            .to_string();

        if page.pointer("/pageprops/disambiguation").is_some() {
            let options = self.disambiguation_options(&resolved_title).await?;
            return Err(LookupError::Disambiguation {
                title: resolved_title,
                options,
            });
        }

        page.get("fullurl")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(LookupError::PageMissing(resolved_title))
    }

    async fn disambiguation_options(&self, title: &str) -> Result<Vec<String>, LookupError> {
        let request = self
            .request()
            .param("titles", title)
            .param("prop", "links")
            .param("plnamespace", "0")
            .param("pllimit", "max");
        let json = self.query(request, title).await?;

        Ok(json
            .pointer("/query/pages/0/links")
            .and_then(Value::as_array)
            .map(|links| {
                links
                    .iter()
                    .filter_map(|l| l.get("title").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    fn request(&self) -> HttpRequest {
        HttpRequest::get(&self.api_url)
            .header("Accept", accept_json())
            .param("action", "query")
            .param("format", "json")
            .param("formatversion", "2")
    }

    async fn query(&self, request: HttpRequest, term: &str) -> Result<Value, LookupError> {
        let response = self.client.execute(request).await.map_err(|e| {
            if HttpClient::is_timeout(&e) {
                LookupError::Timeout(term.to_string())
            } else {
                LookupError::Http(e.to_string())
            }
        })?;

        if !response.is_success() {
            return Err(LookupError::Http(format!("status {}", response.status)));
        }

        response
            .json::<Value>()
            .map_err(|e| LookupError::Http(e.to_string()))
    }
}

#[async_trait]
impl LinkSource for Wikipedia {
    /// Canonical URL for `term`.
    ///
    /// An ambiguous term resolves to its first alternative; every other
    /// failure means no link.
    async fn link_for(&self, term: &str) -> Option<String> {
        match self.page_url(term).await {
            Ok(url) => Some(url),
            Err(LookupError::Disambiguation { title, options }) => {
                let first = options.first()?;
                debug!("\"{}\" is ambiguous, using \"{}\"", title, first);
                match self.resolve(first).await {
                    Ok(url) => Some(url),
                    Err(e) => {
                        debug!("No link for {}: {}", term, e);
                        None
                    }
                }
            }
            Err(e) => {
                debug!("No link for {}: {}", term, e);
                None
            }
        }
    }
}

fn flag(page: &Value, key: &str) -> bool {
    match page.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(_) => true,
        None => false,
    }
}

/// Substitute the language edition into the API URL template
fn api_url_for(template: &str, lang: &str) -> String {
    let lang = if lang == "all" || lang.is_empty() {
        "en"
    } else {
        lang.split('-').next().unwrap_or("en")
    };
    template.replace("{lang}", lang)
}
