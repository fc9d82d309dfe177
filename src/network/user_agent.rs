//! User agent and accept headers
//!
//! arXiv asks API clients to identify themselves, so the agent string is
//! stable rather than rotated.

/// Build the user agent, optionally with a deployment suffix
pub fn user_agent(suffix: Option<&str>) -> String {
    let base = format!("arxiv-digest/{}", crate::VERSION);
    match suffix.map(str::trim).filter(|s| !s.is_empty()) {
        Some(suffix) => format!("{} ({})", base, suffix),
        None => base,
    }
}

/// Accept header for Atom feeds
pub fn accept_atom() -> &'static str {
    "application/atom+xml,application/xml;q=0.9,*/*;q=0.1"
}

/// Accept header for PDF downloads
pub fn accept_pdf() -> &'static str {
    "application/pdf,*/*;q=0.1"
}

/// Accept header for JSON APIs
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent() {
        assert_eq!(user_agent(None), format!("arxiv-digest/{}", crate::VERSION));
        assert_eq!(user_agent(Some("  ")), user_agent(None));
        assert!(user_agent(Some("mailto:ops@example.org")).ends_with("(mailto:ops@example.org)"));
    }
}
