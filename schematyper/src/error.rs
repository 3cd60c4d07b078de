use thiserror::Error;

/// Error type for schema-to-type generation.
#[derive(Debug, Error)]
pub enum SchemaTyperError {
    /// I/O error (e.g., reading the schema file, writing the output file).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The input is not valid JSON, or not a JSON Schema object.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A type or field name reduced to nothing after sanitization.
    #[error("can't generate a name from {raw:?} at {path}")]
    EmptyIdentifier { raw: String, path: String },

    /// Schema nodes that can only be resolved through each other.
    #[error("unresolvable reference cycle: {}", cycle.join(" -> "))]
    ReferenceCycle { cycle: Vec<String> },

    /// A `$ref` whose target never becomes a type.
    #[error("unresolved reference at {from}: nothing generated for {target}")]
    UnresolvedReference { from: String, target: String },

    /// Two schema paths resolved to the same type name.
    #[error("type name {name} generated for both {first} and {second}")]
    TypeNameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// A built-in pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(String),
}

impl From<regress::Error> for SchemaTyperError {
    fn from(pattern_error: regress::Error) -> Self {
        Self::Pattern(pattern_error.to_string())
    }
}
