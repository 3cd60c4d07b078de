//! The resolved type model handed to the emitter.

/// Built-in value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
    Null,
    /// `format: date-time`
    Timestamp,
    /// Untyped placeholder for shapes outside the supported subset.
    Any,
}

/// A reference to a type, as used by fields, array elements and map values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Primitive(Primitive),
    /// A generated type, by name.
    Named(String),
    Array(Box<TypeExpr>),
    /// String-keyed map.
    Map(Box<TypeExpr>),
}

impl TypeExpr {
    #[must_use]
    pub fn any() -> Self {
        Self::Primitive(Primitive::Any)
    }

    #[must_use]
    pub fn uses_timestamp(&self) -> bool {
        match self {
            Self::Primitive(p) => *p == Primitive::Timestamp,
            Self::Named(_) => false,
            Self::Array(inner) | Self::Map(inner) => inner.uses_timestamp(),
        }
    }

    #[must_use]
    pub fn uses_map(&self) -> bool {
        match self {
            Self::Primitive(_) | Self::Named(_) => false,
            Self::Array(inner) => inner.uses_map(),
            Self::Map(_) => true,
        }
    }

    /// Name of the generated type referenced directly (not through an
    /// array or map).
    #[must_use]
    pub fn direct_name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }
}

/// One field of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Exported identifier synthesized from the title or property key.
    pub name: String,
    pub type_expr: TypeExpr,
    pub nullable: bool,
    /// JSON property key, for (de)serialization.
    pub property_name: String,
    pub required: bool,
    /// The field's type contains the enclosing record through direct fields,
    /// so it needs indirection in the host language.
    pub recursive: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Alias(Primitive),
    Array(TypeExpr),
    Map(TypeExpr),
    /// Fields ordered by name.
    Record(Vec<FieldDef>),
}

/// A generated type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
    pub nullable: bool,
    pub description: Option<String>,
    /// Schema path the type was generated from.
    pub path: String,
    /// An array or map type whose elements lead back to itself through
    /// other arrays and maps only; it can't be a plain type alias.
    pub recursive: bool,
}

impl TypeDef {
    fn type_exprs(&self) -> Vec<&TypeExpr> {
        match &self.kind {
            TypeKind::Alias(_) => Vec::new(),
            TypeKind::Array(element) | TypeKind::Map(element) => vec![element],
            TypeKind::Record(fields) => fields.iter().map(|f| &f.type_expr).collect(),
        }
    }

    #[must_use]
    pub fn uses_timestamp(&self) -> bool {
        matches!(self.kind, TypeKind::Alias(Primitive::Timestamp))
            || self.type_exprs().into_iter().any(TypeExpr::uses_timestamp)
    }

    #[must_use]
    pub fn uses_map(&self) -> bool {
        matches!(self.kind, TypeKind::Map(_))
            || self.type_exprs().into_iter().any(TypeExpr::uses_map)
    }
}

/// Output of a resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Ordered by name.
    pub types: Vec<TypeDef>,
    /// Some type refers to the timestamp primitive.
    pub needs_timestamp: bool,
}

impl Generation {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn needs_map(&self) -> bool {
        self.types.iter().any(TypeDef::uses_map)
    }
}
