use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static EDGE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[\s"'`.,;:]+|[\s"'`,;:]+$"#).expect("valid pattern"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid pattern"));
static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid pattern"));

/// Words a model may add around an identifier without changing it.
const FILLER: &[&str] = &[
    "years", "year", "yrs", "yr", "old", "age", "aged", "mr", "mrs", "ms", "smt", "shri", "sri", "dr",
];

/// Cleans extracted values and checks identifiers against the user's text.
pub struct ValueNormalizer;

impl ValueNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Trim quotes and stray punctuation, collapse whitespace.
    pub fn normalize(&self, value: &str) -> String {
        let collapsed = WHITESPACE.replace_all(value.trim(), " ");
        EDGE_PUNCTUATION.replace_all(&collapsed, "").to_string()
    }

    /// True when every meaningful token of `value` appears in `source`.
    /// Numbers are matched against the digits of the source so that
    /// "98765 43210" is found in "9876543210".
    pub fn is_grounded(&self, value: &str, source: &str) -> bool {
        let words: HashSet<String> = tokens(source).collect();
        let digits: String = source.chars().filter(char::is_ascii_digit).collect();

        let mut checked = 0;
        for token in tokens(value) {
            if FILLER.contains(&token.as_str()) {
                continue;
            }
            checked += 1;

            let found = if token.chars().all(|c| c.is_ascii_digit()) {
                digits.contains(&token)
            } else {
                words.contains(&token)
            };
            if !found {
                return false;
            }
        }
        checked > 0
    }
}

impl Default for ValueNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|t| t.len() > 1 || t.chars().all(|c| c.is_ascii_digit()))
}
