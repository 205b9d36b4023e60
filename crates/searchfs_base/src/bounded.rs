//! Bounded string helpers.
//!
//! Descriptions and paths handed across the search-path contract are plain owned strings,
//! but callers may still ask for output that fits a fixed length. These helpers truncate
//! instead of overflowing and never split a UTF-8 sequence.

/// Characters that separate directories in logical paths and patterns.
pub const PATH_SEPARATORS: [char; 3] = ['/', '\\', ':'];

/// Returns the longest prefix of `text` that is at most `limit` bytes long and ends on a
/// char boundary.
pub fn truncate_to(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Whether the path already ends in `/` or `\`, so a relative path can be appended directly.
pub fn ends_with_separator(path: &str) -> bool {
    path.ends_with('/') || path.ends_with('\\')
}

/// ASCII case-insensitive equality, the comparison used for mount de-duplication.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
