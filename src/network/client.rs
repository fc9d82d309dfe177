//! HTTP client for talking to arXiv, PDF hosts, the summarizer and Wikipedia

use super::request::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use super::user_agent::user_agent;
use crate::config::OutgoingSettings;
use anyhow::{bail, Result};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper carrying the outgoing configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout: Duration::from_secs_f64(settings.request_timeout),
            user_agent: user_agent(settings.useragent_suffix.as_deref()),
            extra_headers: settings.extra_headers.clone(),
        })
    }

    /// Execute a request, reading the whole body
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = self.send(request).await?;
        Self::parse_response(response, None).await
    }

    /// Execute a request, failing once the body grows past `max_bytes`
    pub async fn execute_limited(
        &self,
        request: HttpRequest,
        max_bytes: usize,
    ) -> Result<HttpResponse> {
        let response = self.send(request).await?;
        if let Some(len) = response.content_length() {
            if len as usize > max_bytes {
                bail!("response body of {} bytes exceeds limit of {}", len, max_bytes);
            }
        }
        Self::parse_response(response, Some(max_bytes)).await
    }

    async fn send(&self, request: HttpRequest) -> Result<Response> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder
            .timeout(request.timeout.unwrap_or(self.default_timeout))
            .header("User-Agent", &self.user_agent);

        for (key, value) in self.extra_headers.iter().chain(request.headers.iter()) {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if let Some(RequestBody::Json(json)) = request.data {
            req_builder = req_builder.json(&json);
        }

        debug!("{:?} {}", request.method, request.url);

        Ok(req_builder.send().await?)
    }

    async fn parse_response(mut response: Response, limit: Option<usize>) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string(), v.to_string());
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
            if let Some(max) = limit {
                if body.len() > max {
                    bail!("response body exceeds limit of {} bytes", max);
                }
            }
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
            url,
        })
    }

    /// Current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Whether an error returned by this client was a timeout
    pub fn is_timeout(error: &anyhow::Error) -> bool {
        error
            .downcast_ref::<reqwest::Error>()
            .map(|e| e.is_timeout())
            .unwrap_or(false)
    }
}
