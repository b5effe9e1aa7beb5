//! Sanitizers for text placed into diagram markup.
//!
//! Labels and identifiers have different injection surfaces, so they get
//! separate sanitizers: labels only need to avoid breaking delimiters, while
//! entity identifiers must stay bare tokens.

/// Characters that can break out of a label or open a directive
const UNSAFE_TEXT_CHARS: &[char] = &['\r', '\n', '"', '{', '}', '%', ';'];

/// Remove characters that would break a diagram label or comment.
///
/// Strips CR, LF, double quotes, curly braces, `%` and `;`.
pub fn sanitize_text(s: &str) -> String {
    s.chars().filter(|c| !UNSAFE_TEXT_CHARS.contains(c)).collect()
}

/// Replace `.` and space with `_` so a name parses as one entity token
pub fn sanitize_entity_name(s: &str) -> String {
    s.chars()
        .map(|c| if c == '.' || c == ' ' { '_' } else { c })
        .collect()
}

/// Arbitrary identifier as a bare dialect token (entity ids, column names).
///
/// Anything left that is not alphanumeric or `_` becomes `_`.
pub fn entity_token(s: &str) -> String {
    sanitize_entity_name(&sanitize_text(s))
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
