//! Filename sanitization
//!
//! Turns arbitrary filenames from imported data into names that are safe to
//! store under the managed root. Pure string rewriting, never fails.

/// Characters stripped outright from filenames
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Substitute name when sanitization leaves nothing usable
pub const FALLBACK_FILENAME: &str = "file";

/// Sanitize a filename for storage under the managed root.
///
/// Removes forbidden characters, maps whitespace runs and parentheses to
/// underscores, collapses underscore runs, and drops underscores that end up
/// at the edges of the name or against a dot. Idempotent; returns
/// [`FALLBACK_FILENAME`] rather than an empty or dot-only name.
pub fn sanitize_filename(name: &str) -> String {
    let mut replaced = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for ch in name.chars() {
        if FORBIDDEN_CHARS.contains(&ch) {
            continue;
        }
        if ch.is_whitespace() {
            // one underscore per run of whitespace
            if !in_whitespace {
                replaced.push('_');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if ch == '(' || ch == ')' {
            replaced.push('_');
        } else {
            replaced.push(ch);
        }
    }

    let collapsed = collapse_underscores(&replaced);
    let trimmed = strip_loose_underscores(&collapsed);

    if trimmed.trim_matches('.').is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed
    }
}

/// Collapse runs of two or more underscores into a single one
fn collapse_underscores(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;
    for ch in name.chars() {
        if ch == '_' {
            if prev_underscore {
                continue;
            }
            prev_underscore = true;
        } else {
            prev_underscore = false;
        }
        out.push(ch);
    }
    out
}

/// Drop underscores at the ends of the name or directly next to a dot, so
/// `wedding _1_.jpg` style names come out as `wedding_1.jpg`
fn strip_loose_underscores(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len());
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' {
            let prev = if i == 0 { None } else { Some(chars[i - 1]) };
            let next = chars.get(i + 1).copied();
            let at_edge = prev.is_none() || next.is_none();
            let against_dot = prev == Some('.') || next == Some('.');
            if at_edge || against_dot {
                continue;
            }
        }
        out.push(ch);
    }
    out
}
