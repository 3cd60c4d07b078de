//! Settings for type generation.

/// Settings that control naming during type generation.
#[derive(Debug, Clone, Default)]
pub struct GenerateSettings {
    /// Name of the root type. When unset, the caller's default applies
    /// (the schema file's base name for file input, `Root` otherwise).
    pub root_type_name: Option<String>,

    /// Prefix prepended to every non-root type name. A non-empty prefix
    /// always produces exported names.
    pub type_name_prefix: String,

    /// When true, generated types live in an isolated namespace and
    /// non-root type names are left unexported (first letter lower-cased,
    /// `pub(crate)` visibility).
    ///
    /// **Default: false.** Types are exported.
    pub isolated_namespace: bool,
}

impl GenerateSettings {
    /// Whether non-root type names are synthesized as exported identifiers.
    #[must_use]
    pub fn exports_types(&self) -> bool {
        !self.isolated_namespace || !self.type_name_prefix.is_empty()
    }
}
