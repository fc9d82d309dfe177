//! Post-processing for text pulled out of PDFs

use once_cell::sync::Lazy;
use regex::Regex;

static SECTION_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^(preface|acknowledgments?|references?|appendix)")
        .expect("section pattern is valid")
});

/// Strip back-matter heading words and blank lines, trimming every line
pub fn clean_extracted_text(text: &str) -> String {
    let text = SECTION_WORDS.replace_all(text, "");
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whitespace-separated word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Join the first `max_pages` pages
pub fn leading_pages(pages: &[String], max_pages: usize) -> String {
    pages
        .iter()
        .take(max_pages)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}
