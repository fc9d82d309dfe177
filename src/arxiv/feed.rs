//! Atom feed parsing for arXiv API responses

use super::models::{id_from_link, pdf_link_from_abs, Article};
use anyhow::Result;
use serde::Deserialize;
use thiserror::Error;

/// Error entry returned by the arXiv API in place of results
#[derive(Error, Debug)]
#[error("arXiv API error: {0}")]
pub struct ApiError(pub String);

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    published: String,
    #[serde(rename = "author", default)]
    authors: Vec<Author>,
    #[serde(rename = "link", default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Author {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href", default)]
    href: String,
    #[serde(rename = "@rel", default)]
    rel: Option<String>,
}

/// Parse an Atom feed into articles, in feed order.
///
/// arXiv reports query errors as a single entry whose id lives under
/// `/api/errors`; that entry is turned into an error.
pub fn parse_feed(xml: &str) -> Result<Vec<Article>> {
    let feed: Feed = quick_xml::de::from_str(xml)?;
    let mut articles = Vec::with_capacity(feed.entries.len());

    for entry in feed.entries {
        if entry.id.contains("/api/errors") {
            let message = entry
                .summary
                .as_deref()
                .map(normalize_whitespace)
                .unwrap_or_else(|| entry.id.clone());
            return Err(ApiError(message).into());
        }

        if let Some(article) = entry.into_article() {
            articles.push(article);
        }
    }

    Ok(articles)
}

impl Entry {
    fn into_article(self) -> Option<Article> {
        let title = normalize_whitespace(&self.title);
        if title.is_empty() {
            return None;
        }

        let abs_link = self
            .links
            .iter()
            .find(|l| l.rel.as_deref() == Some("alternate"))
            .or_else(|| self.links.first())
            .map(|l| l.href.trim().to_string())
            .filter(|href| !href.is_empty())
            .unwrap_or_else(|| self.id.trim().to_string());

        if abs_link.is_empty() {
            return None;
        }

        let id = id_from_link(self.id.trim())
            .or_else(|| id_from_link(&abs_link))
            .unwrap_or_else(|| self.id.trim().to_string());

        Some(Article {
            id,
            title,
            authors: self
                .authors
                .into_iter()
                .map(|a| normalize_whitespace(&a.name))
                .filter(|name| !name.is_empty())
                .collect(),
            published: self.published.trim().to_string(),
            summary: self
                .summary
                .map(|s| normalize_whitespace(&s))
                .filter(|s| !s.is_empty()),
            pdf_link: pdf_link_from_abs(&abs_link),
            abs_link,
        })
    }
}

/// Collapse runs of whitespace, including the line breaks arXiv wraps titles with
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
