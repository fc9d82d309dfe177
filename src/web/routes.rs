//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Main routes
        .route("/", get(handlers::index))
        .route("/search", get(handlers::search))
        // old-style ids contain a slash: hep-th/9901001
        .route("/paper/*id", get(handlers::paper))
        // API routes
        .route("/health", get(handlers::health))
        // Add middleware
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Add state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arxiv::{ArxivClient, ERROR_FEED, SAMPLE_FEED};
    use crate::config::{ArxivSettings, Settings};
    use crate::network::HttpClient;
    use crate::pdf::TextSource;
    use crate::search::Screener;
    use crate::summarize::{Digester, Extractive};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EMPTY_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom"><title>ArXiv Query</title></feed>"#;

    const OLD_STYLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/abs/hep-th/9901001v2</id>
    <published>1999-01-01T00:00:00Z</published>
    <title>Strings &amp; Things</title>
    <author><name>Grace Hopper</name></author>
    <link href="http://arxiv.org/abs/hep-th/9901001v2" rel="alternate" type="text/html"/>
  </entry>
</feed>"#;

    struct StubText;

    #[async_trait]
    impl TextSource for StubText {
        async fn leading_text(&self, pdf_url: &str) -> Option<String> {
            if pdf_url.contains("2101.00001") {
                Some("Deep learning improves graph models. We test it widely.".to_string())
            } else {
                None
            }
        }
    }

    async fn app(server: &MockServer) -> Router {
        let mut settings = Settings::default();
        settings.arxiv = ArxivSettings {
            api_url: format!("{}/api/query", server.uri()),
            request_interval_ms: 0,
            ..Default::default()
        };

        let source: Arc<dyn TextSource> = Arc::new(StubText);
        let arxiv = ArxivClient::new(HttpClient::new().unwrap(), &settings.arxiv);
        let screener = Screener::new(arxiv, source.clone(), &settings.pdf);
        let digester = Digester::new(source, Some(Arc::new(Extractive::new())));

        create_router(AppState::from_parts(settings, screener, digester).unwrap())
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8_lossy(&body).to_string();
        (status, location.unwrap_or(body))
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        let (status, body) = get(app(&server).await, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn test_index() {
        let server = MockServer::start().await;
        let (status, body) = get(app(&server).await, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("action=\"/search\""));
    }

    #[tokio::test]
    async fn test_empty_query_redirects() {
        let server = MockServer::start().await;
        let (status, location) = get(app(&server).await, "/search?query=%20").await;
        assert!(status.is_redirection());
        assert_eq!(location, "/");
    }

    #[tokio::test]
    async fn test_search_json_filtered() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("search_query", "all:graphs"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_FEED))
            .mount(&server)
            .await;

        let (status, body) = get(app(&server).await, "/search?query=graphs&format=json").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["filtered"], true);
        assert_eq!(json["number_of_results"], 1);
        assert_eq!(json["results"][0]["id"], "2101.00001v1");
        assert_eq!(json["results"][0]["word_count"], 9);
    }

    #[tokio::test]
    async fn test_search_html_unfiltered() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("search_query", "all:strings"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_FEED))
            .mount(&server)
            .await;

        let (status, body) = get(app(&server).await, "/search?query=strings&filter=off").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Graph Neural Networks for Everything"));
        assert!(body.contains("Strings &amp; Things"));
    }

    #[tokio::test]
    async fn test_search_huge_start() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("start", "4294967295"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_FEED))
            .mount(&server)
            .await;

        let (status, body) =
            get(app(&server).await, "/search?query=x&filter=off&start=4294967295").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No articles found."));
        assert!(body.contains("start=4294967285"));
        assert!(body.contains("start=4294967295"));
    }

    #[tokio::test]
    async fn test_paper_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("id_list", "2101.00001v1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_FEED))
            .mount(&server)
            .await;

        let (status, body) = get(app(&server).await, "/paper/2101.00001v1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Graph Neural Networks for Everything"));
        assert!(body.contains("class=\"summary\""));
        assert!(body.contains("9 words"));
    }

    #[tokio::test]
    async fn test_paper_old_style_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("id_list", "hep-th/9901001v2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(OLD_STYLE_FEED))
            .mount(&server)
            .await;

        let (status, body) = get(app(&server).await, "/paper/hep-th/9901001v2?summarize=off").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Strings &amp; Things"));
        assert!(body.contains("could not be extracted"));
        assert!(!body.contains("Summary unavailable"));
    }

    #[tokio::test]
    async fn test_unknown_paper_is_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_FEED))
            .mount(&server)
            .await;

        let (status, _) = get(app(&server).await, "/paper/9999.99999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejected_id_is_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("id_list", "nope"))
            .respond_with(ResponseTemplate::new(400).set_body_string(ERROR_FEED))
            .mount(&server)
            .await;

        let (status, body) = get(app(&server).await, "/paper/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("No arXiv article with id nope."));
    }

    #[tokio::test]
    async fn test_arxiv_outage_is_502() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let (status, _) = get(app(&server).await, "/paper/2101.00001v1").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
