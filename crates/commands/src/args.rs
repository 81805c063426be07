//! Positional argument tokenization.
//!
//! Command arguments are hand-parsed positional tokens: splitting
//! happens on runs of whitespace, the last part is greedy, and empty
//! parts never appear.

/// Split `input` into at most `max_parts` whitespace-separated parts,
/// the last one keeping its internal whitespace.
pub fn split_args(input: &str, max_parts: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = input.trim();

    while !rest.is_empty() && parts.len() + 1 < max_parts {
        match rest.find(char::is_whitespace) {
            Some(idx) => {
                let (head, tail) = rest.split_at(idx);
                parts.push(head);
                rest = tail.trim_start();
            }
            None => {
                parts.push(rest);
                return parts;
            }
        }
    }

    if !rest.is_empty() {
        parts.push(rest);
    }
    parts
}

/// Parse a token that consists only of ASCII digits.
pub fn parse_slot(token: &str) -> Option<i64> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Strip a leading `@` and normalize the user identifier.
pub fn parse_user(token: &str) -> Option<String> {
    let name = token.strip_prefix('@')?.trim();
    if name.is_empty() {
        return None;
    }
    Some(name.to_lowercase())
}
