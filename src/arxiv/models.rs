//! Article record

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use url::Url;

/// One paper from an arXiv search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// arXiv identifier including version, e.g. `2101.00001v2`
    pub id: String,
    pub title: String,
    /// Author names in feed order
    pub authors: Vec<String>,
    /// Publication timestamp as received (RFC 3339)
    pub published: String,
    /// Abstract
    pub summary: Option<String>,
    /// Landing page
    pub abs_link: String,
    /// Direct PDF download
    pub pdf_link: String,
}

impl Article {
    /// Publication date, when the timestamp parses
    pub fn published_date(&self) -> Option<NaiveDate> {
        DateTime::parse_from_rfc3339(self.published.trim())
            .ok()
            .map(|dt| dt.date_naive())
    }

    /// Authors joined for display
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }
}

/// Rewrite an arXiv abstract link into its PDF link.
///
/// `/abs/` becomes `/pdf/` and `.pdf` is appended. Links that already point
/// at a PDF come back unchanged.
pub fn pdf_link_from_abs(link: &str) -> String {
    match Url::parse(link) {
        Ok(mut url) => {
            let path = rewrite_path(url.path());
            url.set_path(&path);
            url.to_string()
        }
        Err(_) => rewrite_path(link),
    }
}

fn rewrite_path(path: &str) -> String {
    let path = path.replacen("/abs/", "/pdf/", 1);
    if path.ends_with(".pdf") {
        path
    } else {
        format!("{}.pdf", path)
    }
}

/// Extract the identifier from an abs or pdf link
pub fn id_from_link(link: &str) -> Option<String> {
    let (_, tail) = link
        .split_once("/abs/")
        .or_else(|| link.split_once("/pdf/"))?;
    let id = tail.trim_end_matches('/').trim_end_matches(".pdf");
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
