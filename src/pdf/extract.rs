//! PDF download and leading-page text extraction

use super::clean::{clean_extracted_text, leading_pages};
use super::TextSource;
use crate::config::PdfSettings;
use crate::network::{accept_pdf, HttpClient, HttpRequest};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("failed to download PDF: {0}")]
    Download(String),
    #[error("error downloading PDF (status {0})")]
    Status(u16),
    #[error("failed to extract text: {0}")]
    Parse(String),
    #[error("PDF parser panicked")]
    Panicked,
    #[error("no text found in leading pages")]
    Empty,
}

/// Downloads PDFs and extracts text from their first pages
#[derive(Clone)]
pub struct PdfExtractor {
    client: HttpClient,
    max_pages: usize,
    max_bytes: usize,
}

impl PdfExtractor {
    pub fn new(client: HttpClient, settings: &PdfSettings) -> Self {
        Self {
            client,
            max_pages: settings.max_pages.max(1),
            max_bytes: settings.max_download_bytes,
        }
    }

    /// Download `pdf_url` and return the cleaned text of its leading pages
    pub async fn try_leading_text(&self, pdf_url: &str) -> Result<String, PdfError> {
        let request = HttpRequest::get(pdf_url).header("Accept", accept_pdf());
        let response = self
            .client
            .execute_limited(request, self.max_bytes)
            .await
            .map_err(|e| PdfError::Download(e.to_string()))?;

        if !response.is_success() {
            return Err(PdfError::Status(response.status));
        }

        if let Some(content_type) = response.content_type() {
            if !content_type.contains("pdf") {
                debug!("Unexpected content type {} for {}", content_type, pdf_url);
            }
        }

        // pdf-extract parses the whole document; the download cap bounds the work
        let body = response.body;
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&body)
        })
        .await
        .map_err(|_| PdfError::Panicked)?
        .map_err(|e| PdfError::Parse(e.to_string()))?;

        debug!("Extracted {} pages from {}", pages.len(), pdf_url);

        let text = clean_extracted_text(&leading_pages(&pages, self.max_pages));
        if text.is_empty() {
            return Err(PdfError::Empty);
        }
        Ok(text)
    }
}

#[async_trait]
impl TextSource for PdfExtractor {
    async fn leading_text(&self, pdf_url: &str) -> Option<String> {
        match self.try_leading_text(pdf_url).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("{} ({})", e, pdf_url);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn extractor() -> PdfExtractor {
        PdfExtractor::new(HttpClient::new().unwrap(), &PdfSettings::default())
    }

    #[tokio::test]
    async fn test_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pdf/1234.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/pdf/1234.pdf", server.uri());
        let err = extractor().try_leading_text(&url).await.unwrap_err();
        assert!(matches!(err, PdfError::Status(404)));
        assert_eq!(extractor().leading_text(&url).await, None);
    }

    #[tokio::test]
    async fn test_garbage_body_is_no_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"definitely not a pdf".to_vec()))
            .mount(&server)
            .await;

        let err = extractor().try_leading_text(&server.uri()).await.unwrap_err();
        assert!(matches!(err, PdfError::Parse(_) | PdfError::Panicked));
        assert_eq!(extractor().leading_text(&server.uri()).await, None);
    }

    #[tokio::test]
    async fn test_oversize_download() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 4096]))
            .mount(&server)
            .await;

        let settings = PdfSettings {
            max_download_bytes: 1024,
            ..Default::default()
        };
        let extractor = PdfExtractor::new(HttpClient::new().unwrap(), &settings);
        let err = extractor.try_leading_text(&server.uri()).await.unwrap_err();
        assert!(matches!(err, PdfError::Download(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let err = extractor()
            .try_leading_text("http://127.0.0.1:1/paper.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, PdfError::Download(_)));
    }
}
