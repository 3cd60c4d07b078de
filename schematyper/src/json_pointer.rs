//! Schema paths as URI-fragment JSON Pointers (RFC 6901).
//!
//! Every node is keyed by the same string a `$ref` would use to reach it:
//! the document root is `#`, and segments are `/`-separated with `~`
//! escaped as `~0` and `/` escaped as `~1`.

/// Path of the document root.
pub const ROOT: &str = "#";

/// Appends a segment to a schema path, applying RFC 6901 escaping.
///
/// Escaping rules: `~` -> `~0`, `/` -> `~1`
pub fn push_segment(path: &mut String, segment: &str) {
    path.push('/');
    for c in segment.chars() {
        match c {
            '~' => path.push_str("~0"),
            '/' => path.push_str("~1"),
            other => path.push(other),
        }
    }
}

/// Returns a new schema path by appending segments to the given path.
#[must_use]
pub fn format(path: &str, segments: &[&str]) -> String {
    let mut result: String = path.to_string();
    for segment in segments {
        push_segment(&mut result, segment);
    }
    result
}
