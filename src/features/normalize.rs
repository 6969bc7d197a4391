// Token normalization applied before dictionary lookup.

/// Lowercase a token and drop every character outside `a-z`, `'`, `-` and `@`.
///
/// This is a filter, not a tokenizer: "don't!" becomes "don't" and
/// "co-op2" becomes "co-op", but nothing is ever split.
pub fn clean_token(token: &str) -> String {
    token
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| is_word_char(*c))
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_lowercase() || matches!(c, '\'' | '-' | '@')
}
