//! Key term hyperlinking for rendered summaries

use super::LinkSource;
use crate::cache::LinkCache;
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#?[A-Za-z0-9]+;").expect("entity pattern is valid"));

/// A keyword occurrence in escaped text, as byte offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    pub start: usize,
    pub end: usize,
}

/// Appends "Learn more" links after the first occurrence of each keyword
pub struct Hyperlinker {
    source: Arc<dyn LinkSource>,
    keywords: Vec<String>,
    cache: LinkCache,
}

impl Hyperlinker {
    pub fn new(source: Arc<dyn LinkSource>, keywords: Vec<String>, cache: LinkCache) -> Self {
        Self {
            source,
            keywords,
            cache,
        }
    }

    /// HTML-escape `text` and insert links for the configured keywords.
    ///
    /// The result is safe to embed in a page as-is.
    pub async fn link(&self, text: &str) -> String {
        let escaped = tera::escape_html(text);
        let matches = find_terms(&escaped, &self.keywords);
        let links = join_all(
            matches
                .iter()
                .map(|m| self.lookup(&escaped[m.start..m.end])),
        )
        .await;
        insert_links(&escaped, &matches, &links)
    }

    async fn lookup(&self, term: &str) -> Option<String> {
        let key = term.to_lowercase();
        if let Some(cached) = self.cache.get(&key).await {
            return cached;
        }
        let link = self.source.link_for(term).await;
        self.cache.set(key, link.clone()).await;
        link
    }
}

/// First whole-word, case-insensitive occurrence of each keyword.
///
/// Keywords equal up to case count once. Occurrences inside an HTML entity
/// such as `&lt;` are ignored. When two occurrences overlap the one starting
/// earlier wins. Matches come back ordered by position.
pub fn find_terms(text: &str, keywords: &[String]) -> Vec<TermMatch> {
    let entities: Vec<(usize, usize)> = ENTITY
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();
    let in_entity =
        |start: usize, end: usize| entities.iter().any(|&(s, e)| start < e && s < end);

    let mut seen = HashSet::new();
    let mut found: Vec<TermMatch> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty() && seen.insert(k.to_lowercase()))
        .filter_map(|k| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(&tera::escape_html(k)));
            let re = Regex::new(&pattern).ok()?;
            let found = re
                .find_iter(text)
                .find(|m| !in_entity(m.start(), m.end()))
                .map(|m| TermMatch {
                    start: m.start(),
                    end: m.end(),
                });
            found
        })
        .collect();

    found.sort_by_key(|m| (m.start, std::cmp::Reverse(m.end)));

    let mut kept: Vec<TermMatch> = Vec::with_capacity(found.len());
    for m in found {
        if kept.last().map_or(true, |last| m.start >= last.end) {
            kept.push(m);
        }
    }
    kept
}

/// Insert an anchor after each match that has a link
pub fn insert_links(text: &str, matches: &[TermMatch], links: &[Option<String>]) -> String {
    let mut out = String::with_capacity(text.len() + matches.len() * 96);
    let mut cursor = 0;

    for (m, link) in matches.iter().zip(links) {
        out.push_str(&text[cursor..m.end]);
        if let Some(url) = link {
            out.push_str(&format!(
                r#" <a href="{}" target="_blank" rel="noopener" class="term-link">[Learn more]</a>"#,
                escape_attr(url)
            ));
        }
        cursor = m.end;
    }

    out.push_str(&text[cursor..]);
    out
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
