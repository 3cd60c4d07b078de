//! Identifier synthesis: arbitrary schema names to host-safe identifiers.

use crate::error::SchemaTyperError;

/// Initialisms kept all-caps instead of title-cased (golint's list).
const INITIALISMS: &[&str] = &[
    "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID", "IP",
    "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS", "TTL",
    "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XSRF", "XSS",
];

/// Lowercase letter or digit immediately followed by an uppercase letter.
const CAMEL_BOUNDARY: &str = r"[\p{Ll}\p{N}]\p{Lu}";

/// Turns raw schema names and titles into identifiers.
///
/// Holds the compiled camel-case boundary pattern so it is built once per run.
pub struct IdentifierSynthesizer {
    camel_boundary: regress::Regex,
}

impl IdentifierSynthesizer {
    /// # Errors
    ///
    /// Returns `SchemaTyperError::Pattern` if the boundary pattern fails to compile.
    pub fn new() -> Result<Self, SchemaTyperError> {
        Ok(Self {
            camel_boundary: regress::Regex::with_flags(CAMEL_BOUNDARY, "u")?,
        })
    }

    /// Synthesize an identifier from `raw`.
    ///
    /// Words are split on `-`, `_`, whitespace and camel-case boundaries,
    /// title-cased (initialisms all-caps) and joined. Unexported names get
    /// only their first character lower-cased, so a leading initialism keeps
    /// the rest of its capitals: `url_path` -> `uRLPath`, not `urlPath`.
    /// Characters that can't appear in a
    /// bare identifier are dropped. Returns `None` when nothing is left.
    #[must_use]
    pub fn synthesize(&self, raw: &str, exported: bool) -> Option<String> {
        let spaced: String = self.split_camel_case(&raw.replace(['-', '_'], " "));
        let mut joined: String = spaced
            .split(' ')
            .map(identifier_part)
            .collect::<String>();

        if !exported {
            joined = lower_first(&joined);
        }

        let mut identifier = String::with_capacity(joined.len());
        for c in joined.chars() {
            if c.is_alphabetic() || c == '_' || (c.is_ascii_digit() && !identifier.is_empty()) {
                identifier.push(c);
            }
        }

        if identifier.is_empty() {
            None
        } else {
            Some(identifier)
        }
    }

    /// Insert a space at every camel-case boundary (`userID` -> `user ID`).
    fn split_camel_case(&self, s: &str) -> String {
        let mut result = String::with_capacity(s.len() + 8);
        let mut last: usize = 0;
        for m in self.camel_boundary.find_iter(s) {
            let start: usize = m.start();
            let split_at: usize = start + s[start..].chars().next().map_or(0, char::len_utf8);
            result.push_str(&s[last..split_at]);
            result.push(' ');
            last = split_at;
        }
        result.push_str(&s[last..]);
        result
    }
}

/// Title-case a word, or all-caps it when it is a known initialism.
fn identifier_part(part: &str) -> String {
    let upper: String = part.to_uppercase();
    if INITIALISMS.contains(&upper.as_str()) {
        return upper;
    }
    title_case(&part.to_lowercase())
}

/// Upper-case every letter that starts a word inside `s`.
fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut at_word_start: bool = true;
    for c in s.chars() {
        if at_word_start {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    result
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}
