//! Sentence segmentation tuned for paper prose

/// Words that end in a period without ending the sentence
const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "cf", "etc", "vs", "al", "fig", "figs", "eq", "eqs", "sec", "ref", "refs",
    "no", "vol", "pp", "approx", "resp", "dr", "prof", "mr", "mrs", "ms", "st", "thm", "def",
];

/// Split text into sentences.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace and a word that
/// does not start in lowercase. Abbreviations and initials never end a
/// sentence. Internal whitespace, including PDF line breaks, is collapsed.
pub fn split_sentences(text: &str) -> Vec<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars: Vec<(usize, char)> = normalized.char_indices().collect();

    let mut sentences = Vec::new();
    let mut start = 0;

    for (idx, &(pos, c)) in chars.iter().enumerate() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        match chars.get(idx + 1) {
            None => {}
            Some(&(_, next)) if next == ' ' => {}
            _ => continue,
        }

        if let Some(&(_, first)) = chars.get(idx + 2) {
            if first.is_lowercase() {
                continue;
            }
        }

        if c == '.' && ends_with_abbreviation(&normalized[start..pos]) {
            continue;
        }

        let end = pos + c.len_utf8();
        push_trimmed(&mut sentences, &normalized[start..end]);
        start = end;
    }

    push_trimmed(&mut sentences, &normalized[start..]);
    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, s: &str) {
    let s = s.trim();
    if !s.is_empty() {
        sentences.push(s.to_string());
    }
}

fn ends_with_abbreviation(before: &str) -> bool {
    let last = before.rsplit(' ').next().unwrap_or_default();
    let word = last
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();

    // single-letter initials: "J. Smith"
    if word.chars().count() == 1 && word.chars().all(char::is_alphabetic) {
        return true;
    }
    ABBREVIATIONS.contains(&word.as_str())
}
