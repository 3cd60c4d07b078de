//! Singularization of container names, for naming element and value types.

/// Appended when no distinct singular form can be derived.
pub const ITEM_SUFFIX: &str = "Item";

/// Words whose singular and plural forms coincide.
const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "feedback",
    "fish",
    "information",
    "media",
    "metadata",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
];

/// Whole-word plural to singular exceptions.
const IRREGULAR: &[(&str, &str)] = &[
    ("aliases", "alias"),
    ("analyses", "analysis"),
    ("buses", "bus"),
    ("children", "child"),
    ("cookies", "cookie"),
    ("criteria", "criterion"),
    ("echoes", "echo"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("heroes", "hero"),
    ("indices", "index"),
    ("knives", "knife"),
    ("lives", "life"),
    ("matrices", "matrix"),
    ("men", "man"),
    ("mice", "mouse"),
    ("movies", "movie"),
    ("oxen", "ox"),
    ("people", "person"),
    ("potatoes", "potato"),
    ("statuses", "status"),
    ("teeth", "tooth"),
    ("vertices", "vertex"),
    ("wives", "wife"),
    ("women", "woman"),
];

/// Suffix rewrites, tried in order; the first match wins.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("lves", "lf"),
    ("rves", "rf"),
    ("eaves", "eaf"),
    ("sses", "ss"),
    ("xes", "x"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("zzes", "z"),
];

/// Endings that look plural but are already singular.
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is"];

/// Derive the element name for a container named `name`.
///
/// `Tags` -> `Tag`, `categories` -> `category`, `people` -> `person`.
/// When the heuristic can't tell a singular apart (`Data`, `book`),
/// [`ITEM_SUFFIX`] is appended so the element never shares the container's name.
#[must_use]
pub fn singularize(name: &str) -> String {
    match singular_form(name) {
        Some(singular) if singular != name && !singular.is_empty() => singular,
        _ => format!("{name}{ITEM_SUFFIX}"),
    }
}

fn singular_form(name: &str) -> Option<String> {
    let lower: String = name.to_ascii_lowercase();

    if UNCOUNTABLE
        .iter()
        .any(|word| ends_with_word(name, &lower, word))
    {
        return None;
    }

    if let Some((plural, singular)) = IRREGULAR
        .iter()
        .find(|(plural, _)| ends_with_word(name, &lower, plural))
    {
        return Some(replace_tail(name, plural.len(), singular));
    }

    if let Some((suffix, replacement)) = SUFFIX_RULES
        .iter()
        .find(|(suffix, _)| lower.len() > suffix.len() && lower.ends_with(suffix))
    {
        return Some(replace_tail(name, suffix.len(), replacement));
    }

    if SINGULAR_ENDINGS.iter().any(|ending| lower.ends_with(ending)) {
        return None;
    }

    if lower.len() > 1 && lower.ends_with('s') {
        return Some(name[..name.len() - 1].to_string());
    }

    None
}

/// True when `lower` ends with `word` and that tail starts a word in `name`:
/// at the start, after a non-letter, or at a camel-case hump.
fn ends_with_word(name: &str, lower: &str, word: &str) -> bool {
    if !lower.ends_with(word) {
        return false;
    }
    let start: usize = lower.len() - word.len();
    if start == 0 {
        return true;
    }
    let starts_upper: bool = name[start..].chars().next().is_some_and(char::is_uppercase);
    let after_non_letter: bool = name[..start]
        .chars()
        .next_back()
        .is_some_and(|c| !c.is_alphabetic());
    starts_upper || after_non_letter
}

/// Replace the last `tail_len` bytes of `name` with `replacement`, following
/// the tail's casing (all caps, capitalized, or lower).
fn replace_tail(name: &str, tail_len: usize, replacement: &str) -> String {
    let split: usize = name.len() - tail_len;
    let (head, tail) = name.split_at(split);
    let all_caps: bool = tail.chars().all(|c| !c.is_lowercase()) && tail.len() > 1;
    let capitalized: bool = tail.chars().next().is_some_and(char::is_uppercase);

    let replaced: String = if all_caps {
        replacement.to_uppercase()
    } else if capitalized {
        let mut chars = replacement.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => first.to_uppercase().chain(chars).collect(),
        }
    } else {
        replacement.to_string()
    };
    format!("{head}{replaced}")
}
