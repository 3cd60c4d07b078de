//! Rust source rendering of a resolved [`Generation`].

use std::io::Write;

use heck::ToSnakeCase;

use crate::json_pointer::ROOT;
use crate::model::{FieldDef, Generation, Primitive, TypeDef, TypeExpr, TypeKind};
use crate::settings::GenerateSettings;

/// Keywords usable as raw identifiers (`r#type`).
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that can't be raw identifiers; these get a trailing underscore.
const RESERVED_PATH_KEYWORDS: &[&str] = &["crate", "self", "super"];

/// Type names that would clash with a keyword that can't be raw, a primitive,
/// or a name the generated module already uses. These get a trailing underscore.
const RESERVED_TYPE_NAMES: &[&str] = &[
    "Self", "bool", "char", "str", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16",
    "u32", "u64", "u128", "usize", "f32", "f64", "String", "Vec", "Option", "Box", "Result",
    "Some", "None", "Ok", "Err", "BTreeMap", "DateTime", "Utc", "Serialize", "Deserialize",
];

/// Escape a string for use inside a Rust double-quoted attribute.
fn escape_for_rust_attr(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn primitive_type(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::String => "String",
        Primitive::Integer => "i64",
        Primitive::Number => "f64",
        Primitive::Boolean => "bool",
        Primitive::Null => "()",
        Primitive::Timestamp => "DateTime<Utc>",
        Primitive::Any => "serde_json::Value",
    }
}

fn render_type(expr: &TypeExpr) -> String {
    match expr {
        TypeExpr::Primitive(primitive) => primitive_type(*primitive).to_string(),
        TypeExpr::Named(name) => type_ident(name),
        TypeExpr::Array(element) => format!("Vec<{}>", render_type(element)),
        TypeExpr::Map(value) => format!("BTreeMap<String, {}>", render_type(value)),
    }
}

/// Identifier for a type name, escaped the same way wherever it appears.
fn type_ident(name: &str) -> String {
    if RESERVED_PATH_KEYWORDS.contains(&name) || RESERVED_TYPE_NAMES.contains(&name) {
        format!("{name}_")
    } else if RAW_KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Snake-case field identifier for a synthesized field name, plus whether
/// it still matches the JSON key once raw-identifier escaping is undone.
fn field_ident(field: &FieldDef) -> (String, bool) {
    let snake: String = field.name.to_snake_case();
    if RESERVED_PATH_KEYWORDS.contains(&snake.as_str()) {
        return (format!("{snake}_"), false);
    }
    let matches_key: bool = snake == field.property_name;
    if RAW_KEYWORDS.contains(&snake.as_str()) {
        (format!("r#{snake}"), matches_key)
    } else {
        (snake, matches_key)
    }
}

/// Emit a doc comment from a description: each line becomes a `///` line.
/// `line_prefix` is prepended to each line (e.g. `""` for types, `"    "` for fields).
fn emit_doc_comment<W: Write>(
    writer: &mut W,
    description: Option<&str>,
    line_prefix: &str,
) -> std::io::Result<()> {
    let Some(desc) = description else {
        return Ok(());
    };
    let trimmed: &str = desc.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    for line in trimmed.lines() {
        let line: &str = line.trim_end();
        if line.is_empty() {
            writeln!(writer, "{line_prefix}///")?;
        } else {
            writeln!(writer, "{line_prefix}/// {line}")?;
        }
    }
    Ok(())
}

fn emit_field<W: Write>(field: &FieldDef, writer: &mut W) -> std::io::Result<()> {
    emit_doc_comment(writer, field.description.as_deref(), "    ")?;

    let (ident, matches_key) = field_ident(field);
    if !matches_key {
        let escaped: String = escape_for_rust_attr(&field.property_name);
        writeln!(writer, "    #[serde(rename = \"{escaped}\")]")?;
    }

    let untyped: bool = field.type_expr == TypeExpr::any();
    if !field.required {
        let skip: &str = if untyped {
            "serde_json::Value::is_null"
        } else {
            "Option::is_none"
        };
        writeln!(
            writer,
            "    #[serde(default, skip_serializing_if = \"{skip}\")]"
        )?;
    }

    let mut type_str: String = render_type(&field.type_expr);
    if field.recursive {
        type_str = format!("Box<{type_str}>");
    }
    if !untyped && (field.nullable || !field.required) {
        type_str = format!("Option<{type_str}>");
    }
    writeln!(writer, "    pub {ident}: {type_str},")
}

/// An array or map type: an alias, or a transparent newtype when it refers
/// to itself.
fn emit_container<W: Write>(
    name: &str,
    container: &str,
    recursive: bool,
    visibility: &str,
    writer: &mut W,
) -> std::io::Result<()> {
    if recursive {
        writeln!(writer, "#[derive(Debug, Clone, Serialize, Deserialize)]")?;
        writeln!(writer, "#[serde(transparent)]")?;
        writeln!(writer, "{visibility} struct {name}(pub {container});")
    } else {
        writeln!(writer, "{visibility} type {name} = {container};")
    }
}

/// Emit one type definition followed by a blank line.
fn emit_type<W: Write>(def: &TypeDef, exported: bool, writer: &mut W) -> std::io::Result<()> {
    emit_doc_comment(writer, def.description.as_deref(), "")?;
    let visibility: &str = if exported {
        "pub"
    } else {
        writeln!(writer, "#[allow(non_camel_case_types)]")?;
        "pub(crate)"
    };

    let name: String = type_ident(&def.name);
    match &def.kind {
        TypeKind::Alias(primitive) => {
            writeln!(
                writer,
                "{visibility} type {name} = {};",
                primitive_type(*primitive)
            )?;
        }
        TypeKind::Array(element) => {
            let container: String = format!("Vec<{}>", render_type(element));
            emit_container(&name, &container, def.recursive, visibility, writer)?;
        }
        TypeKind::Map(value) => {
            let container: String = format!("BTreeMap<String, {}>", render_type(value));
            emit_container(&name, &container, def.recursive, visibility, writer)?;
        }
        TypeKind::Record(fields) => {
            writeln!(writer, "#[derive(Debug, Clone, Serialize, Deserialize)]")?;
            writeln!(writer, "{visibility} struct {name} {{")?;
            for field in fields {
                emit_field(field, writer)?;
            }
            writeln!(writer, "}}")?;
        }
    }
    writeln!(writer)
}

/// Render `generation` as a Rust module.
///
/// Types are written in the generation's (name) order. With an isolated
/// namespace and no prefix, every type but the root is crate-private.
///
/// # Errors
///
/// Returns any error from `writer`.
pub fn emit_rust<W: Write>(
    generation: &Generation,
    settings: &GenerateSettings,
    writer: &mut W,
) -> std::io::Result<()> {
    writeln!(writer, "//! Generated by schematyper. Do not edit manually.")?;
    writeln!(writer)?;
    writeln!(writer, "use serde::{{Deserialize, Serialize}};")?;
    if generation.needs_map() {
        writeln!(writer, "use std::collections::BTreeMap;")?;
    }
    if generation.needs_timestamp {
        writeln!(writer, "use chrono::{{DateTime, Utc}};")?;
    }
    writeln!(writer)?;

    for def in &generation.types {
        let exported: bool = settings.exports_types() || def.path == ROOT;
        emit_type(def, exported, writer)?;
    }
    Ok(())
}
