//! arXiv API client
//!
//! Builds `search_query`/`id_list` requests against the export API and parses
//! the Atom response. Queries are spaced out with a rate limiter because arXiv
//! asks clients to wait between calls.

use super::feed::{parse_feed, ApiError};
use super::models::Article;
use crate::config::ArxivSettings;
use crate::network::{accept_atom, HttpClient, HttpRequest};
use anyhow::{anyhow, Result};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Client for the arXiv export API
#[derive(Clone)]
pub struct ArxivClient {
    client: HttpClient,
    api_url: String,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ArxivClient {
    pub fn new(client: HttpClient, settings: &ArxivSettings) -> Self {
        let limiter = Quota::with_period(Duration::from_millis(settings.request_interval_ms))
            .map(|quota| Arc::new(RateLimiter::direct(quota)));

        Self {
            client,
            api_url: settings.api_url.clone(),
            limiter,
        }
    }

    /// Build a full-text search request
    pub fn search_request(&self, query: &str, start: u32, max_results: u32) -> HttpRequest {
        HttpRequest::get(&self.api_url)
            .header("Accept", accept_atom())
            .param("search_query", format!("all:{}", query.trim()))
            .param("start", start.to_string())
            .param("max_results", max_results.to_string())
    }

    /// Build a request for one article by identifier
    pub fn lookup_request(&self, id: &str) -> HttpRequest {
        HttpRequest::get(&self.api_url)
            .header("Accept", accept_atom())
            .param("id_list", id.trim())
            .param("max_results", "1")
    }

    /// Search all fields for `query`
    pub async fn search(&self, query: &str, start: u32, max_results: u32) -> Result<Vec<Article>> {
        let request = self.search_request(query, start, max_results);
        let articles = self.run(request).await?;
        debug!("arXiv returned {} articles for '{}'", articles.len(), query);
        Ok(articles)
    }

    /// Fetch one article by identifier.
    ///
    /// An identifier arXiv rejects is reported as no article; only transport
    /// and status failures are errors.
    pub async fn fetch(&self, id: &str) -> Result<Option<Article>> {
        let request = self.lookup_request(id);
        match self.run(request).await {
            Ok(articles) => Ok(articles.into_iter().next()),
            Err(e) if e.is::<ApiError>() => {
                debug!("arXiv rejected id {}: {}", id, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn run(&self, request: HttpRequest) -> Result<Vec<Article>> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let response = self.client.execute(request).await?;
        if !response.is_success() {
            // bad queries come back as 400 with an error entry in the feed
            if let Err(e) = parse_feed(&response.text()) {
                if e.is::<ApiError>() {
                    return Err(e);
                }
            }
            return Err(anyhow!("Error fetching articles (status {})", response.status));
        }

        parse_feed(&response.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arxiv::feed::tests::{ERROR_FEED, SAMPLE_FEED};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(api_url: String) -> ArxivClient {
        let settings = ArxivSettings {
            api_url,
            request_interval_ms: 0,
            ..Default::default()
        };
        ArxivClient::new(HttpClient::new().unwrap(), &settings)
    }

    #[test]
    fn test_search_request() {
        let arxiv = client_for("https://export.arxiv.org/api/query".to_string());
        let request = arxiv.search_request("machine learning", 0, 5);

        assert!(request.url.contains("arxiv.org"));
        assert_eq!(request.get_param("search_query"), Some("all:machine learning"));
        assert_eq!(request.get_param("start"), Some("0"));
        assert_eq!(request.get_param("max_results"), Some("5"));
    }

    #[test]
    fn test_zero_interval_disables_limiter() {
        let arxiv = client_for("http://localhost".to_string());
        assert!(arxiv.limiter.is_none());

        let limited = ArxivClient::new(HttpClient::new().unwrap(), &ArxivSettings::default());
        assert!(limited.limiter.is_some());
    }

    #[tokio::test]
    async fn test_search_parses_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/query"))
            .and(query_param("search_query", "all:graphs"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_FEED))
            .mount(&server)
            .await;

        let arxiv = client_for(format!("{}/api/query", server.uri()));
        let articles = arxiv.search("graphs", 0, 10).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, "2101.00001v1");
    }

    #[tokio::test]
    async fn test_fetch_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("id_list", "2101.00001v1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_FEED))
            .mount(&server)
            .await;

        let arxiv = client_for(server.uri());
        let article = arxiv.fetch("2101.00001v1").await.unwrap();
        assert_eq!(article.map(|a| a.title), Some("Graph Neural Networks for Everything".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_rejected_id_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string(ERROR_FEED))
            .mount(&server)
            .await;

        let arxiv = client_for(server.uri());
        assert_eq!(arxiv.fetch("nope").await.unwrap(), None);

        // the same entry is still an error for searches
        let err = arxiv.search("nope", 0, 10).await.unwrap_err();
        assert!(err.is::<ApiError>());
    }

    #[tokio::test]
    async fn test_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let arxiv = client_for(server.uri());
        let err = arxiv.search("graphs", 0, 10).await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }
}
