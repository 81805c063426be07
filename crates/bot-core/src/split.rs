//! Splitting long bodies for transports with a per-message size limit.

/// Maximum body length accepted by the transport.
pub const MAX_BODY_CHARS: usize = 1500;

/// Split `body` into chunks of at most [`MAX_BODY_CHARS`] characters.
///
/// Splits on line boundaries where possible, packing as many lines as
/// fit into each chunk. A single line longer than the limit is hard-cut
/// at character boundaries.
pub fn split_body(body: &str) -> Vec<String> {
    split_with_limit(body, MAX_BODY_CHARS)
}

fn split_with_limit(body: &str, limit: usize) -> Vec<String> {
    if body.chars().count() <= limit {
        return vec![body.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in body.split('\n') {
        let line_len = line.chars().count();

        if line_len >= limit {
            // Flush what we have, then hard-cut the oversized line.
            if current_len > 0 {
                chunks.push(current.clone());
                current.clear();
                current_len = 0;
            }
            chunks.extend(hard_cut(line, limit));
            continue;
        }

        if current_len == 0 {
            current.push_str(line);
            current_len = line_len;
        } else if current_len + 1 + line_len <= limit {
            current.push('\n');
            current.push_str(line);
            current_len += 1 + line_len;
        } else {
            chunks.push(current.clone());
            current.clear();
            current.push_str(line);
            current_len = line_len;
        }
    }

    if current_len > 0 {
        chunks.push(current);
    }

    chunks
}

fn hard_cut(line: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(limit)
        .map(|c| c.iter().collect::<String>())
        .collect()
}
