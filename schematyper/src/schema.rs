//! Typed view of the supported JSON Schema subset.
//!
//! Keywords whose JSON shape varies (`type`, `items`, `additionalProperties`)
//! are read as raw `serde_json::Value` fragments and re-parsed into tagged
//! enums once, here, so the resolver never has to sniff shapes itself.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single JSON Schema type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    String,
    Integer,
    Number,
    Boolean,
    Null,
    Array,
    Object,
    /// Any name outside the JSON Schema type vocabulary.
    Unknown,
}

impl JsonType {
    fn from_name(name: &str) -> Self {
        match name {
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "null" => Self::Null,
            "array" => Self::Array,
            "object" => Self::Object,
            _ => Self::Unknown,
        }
    }
}

/// The `type` keyword, parsed once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeSpec {
    /// No `type` keyword.
    #[default]
    Missing,
    /// `"type": "<name>"`
    Single(JsonType),
    /// `"type": ["<name>", "null"]` in either order.
    NullableUnion(JsonType),
    /// Any other union, or a value that is not a type name.
    Unsupported,
}

impl TypeSpec {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Missing,
            Value::String(name) => Self::Single(JsonType::from_name(name)),
            Value::Array(names) => match names.as_slice() {
                [Value::String(first), Value::String(second)] if first == "null" => {
                    Self::NullableUnion(JsonType::from_name(second))
                }
                [Value::String(first), Value::String(second)] if second == "null" => {
                    Self::NullableUnion(JsonType::from_name(first))
                }
                _ => Self::Unsupported,
            },
            _ => Self::Unsupported,
        }
    }
}

impl<'de> Deserialize<'de> for TypeSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v: Value = Deserialize::deserialize(deserializer)?;
        Ok(Self::from_value(&v))
    }
}

/// The `items` keyword.
#[derive(Debug, Clone)]
pub enum Items {
    /// One schema for every element.
    Single(Box<SchemaNode>),
    /// Tuple form: one schema per position.
    List(Vec<SchemaNode>),
}

impl<'de> Deserialize<'de> for Items {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v: Value = Deserialize::deserialize(deserializer)?;
        match v {
            Value::Array(fragments) => fragments
                .iter()
                .map(SchemaNode::from_fragment)
                .collect::<Result<Vec<SchemaNode>, serde_json::Error>>()
                .map(Items::List)
                .map_err(serde::de::Error::custom),
            other => Ok(Items::Single(Box::new(
                SchemaNode::from_fragment(&other).map_err(serde::de::Error::custom)?,
            ))),
        }
    }
}

/// The `additionalProperties` keyword.
#[derive(Debug, Clone)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaNode>),
}

impl AdditionalProperties {
    /// True for `true` or any schema; false for `false`.
    #[must_use]
    pub fn allowed(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Schema(_) => true,
        }
    }

    /// The value schema, when one is given.
    #[must_use]
    pub fn schema(&self) -> Option<&SchemaNode> {
        match self {
            Self::Bool(_) => None,
            Self::Schema(node) => Some(node),
        }
    }
}

impl<'de> Deserialize<'de> for AdditionalProperties {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v: Value = Deserialize::deserialize(deserializer)?;
        match v {
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Object(_) => Ok(Self::Schema(Box::new(
                SchemaNode::from_fragment(&v).map_err(serde::de::Error::custom)?,
            ))),
            // Neither a boolean nor a schema: treated like an absent keyword.
            _ => Ok(Self::Bool(false)),
        }
    }
}

/// Root or nested JSON Schema node.
///
/// Only the keywords the resolver understands are modeled; everything else
/// is ignored. `properties` and `definitions` keep document order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaNode {
    #[serde(default, rename = "$ref")]
    pub reference: Option<String>,

    #[serde(default)]
    pub r#type: TypeSpec,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub properties: IndexMap<String, SchemaNode>,

    #[serde(default)]
    pub items: Option<Items>,

    #[serde(default, rename = "additionalProperties")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(default)]
    pub definitions: IndexMap<String, SchemaNode>,

    #[serde(default, rename = "$defs")]
    pub defs: IndexMap<String, SchemaNode>,
}

impl SchemaNode {
    /// Parses an arbitrary schema fragment. Fragments that are not objects
    /// (e.g. `"items": true`) become an empty node, which resolves to an
    /// untyped placeholder.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when an object fragment has keywords of
    /// the wrong JSON type (e.g. a non-string `title`).
    pub fn from_fragment(fragment: &Value) -> Result<Self, serde_json::Error> {
        if fragment.is_object() {
            Self::deserialize(fragment)
        } else {
            Ok(Self::default())
        }
    }

    /// Non-empty `title`.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Non-empty `description`, trimmed.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Non-empty `$ref`.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.is_empty())
    }

    #[must_use]
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }

    /// True when `additionalProperties` is `true` or a schema.
    #[must_use]
    pub fn allows_additional_properties(&self) -> bool {
        self.additional_properties
            .as_ref()
            .is_some_and(AdditionalProperties::allowed)
    }

    /// The `additionalProperties` value schema, if any.
    #[must_use]
    pub fn additional_properties_schema(&self) -> Option<&SchemaNode> {
        self.additional_properties
            .as_ref()
            .and_then(AdditionalProperties::schema)
    }
}
