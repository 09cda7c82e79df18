/// Common English words dropped before vectorization.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in",
    "is", "it", "its", "of", "on", "that", "the", "to", "was", "will", "with", "or",
    "but", "not", "this", "these", "they", "them", "their", "there", "then", "than",
    "so", "if", "when", "where", "why", "how", "what", "which", "who", "whom", "whose",
    "can", "could", "should", "would", "may", "might", "must", "shall", "do", "does",
    "did", "have", "had", "having",
];

/// Tokens of this many characters or fewer are dropped.
const MIN_TOKEN_CHARS: usize = 2;

/// Suffix rules in precedence order: `(suffix, replacement, token must be longer than)`.
const STEM_RULES: &[(&str, &str, usize)] = &[
    ("ies", "y", 3),
    ("ied", "y", 3),
    ("s", "", 3),
    ("ed", "", 4),
    ("ing", "", 5),
    ("ly", "", 4),
    ("er", "", 4),
    ("est", "", 5),
];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Turn free text into the token sequence used for all vector math.
///
/// Lowercases, replaces non-word characters with spaces, splits on
/// whitespace, drops stopwords and tokens of two characters or fewer, then
/// stems what remains.
pub fn normalize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_word_char(c) || c.is_whitespace() { c } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .filter(|t| !STOP_WORDS.contains(t))
        .filter(|t| t.chars().count() > MIN_TOKEN_CHARS)
        .map(stem)
        .collect()
}

/// Strip the first matching suffix. Length guards keep a stem from
/// collapsing to nothing.
pub fn stem(token: &str) -> String {
    let len = token.chars().count();
    for &(suffix, replacement, min_len) in STEM_RULES {
        if len <= min_len {
            continue;
        }
        // "ss" endings ("class", "process") are not plurals.
        if suffix == "s" && token.ends_with("ss") {
            continue;
        }
        if let Some(root) = token.strip_suffix(suffix) {
            return format!("{root}{replacement}");
        }
    }
    token.to_string()
}
