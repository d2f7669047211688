//! Text normalization for lexical matching.
//!
//! Lowercases, folds German umlauts and ß into ASCII digraphs, replaces
//! everything outside `[a-z0-9 ]` with a space and collapses whitespace.

/// ASCII digraph for characters that need more than one letter.
fn fold(c: char) -> Option<&'static str> {
    match c {
        'ä' => Some("ae"),
        'ö' => Some("oe"),
        'ü' => Some("ue"),
        'ß' => Some("ss"),
        _ => None,
    }
}

/// Canonicalize raw text. Idempotent.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if let Some(digraph) = fold(c) {
            folded.push_str(digraph);
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            folded.push(c);
        } else {
            folded.push(' ');
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True when `phrase` appears as whole words in normalized text.
pub fn has_phrase(t_norm: &str, phrase: &str) -> bool {
    let haystack = format!(" {} ", t_norm);
    let needle = format!(" {} ", phrase);
    haystack.contains(&needle)
}
