//! Generate typed declarations from JSON Schema.
//!
//! A schema document is parsed into [`SchemaNode`]s, resolved into a
//! [`Generation`] of named type definitions, and rendered as Rust source.

mod emit;
mod error;
mod graph;
mod inflect;
mod json_pointer;
mod model;
mod naming;
mod resolve;
mod schema;
mod settings;

pub use emit::emit_rust;
pub use error::SchemaTyperError;
pub use inflect::singularize;
pub use model::{FieldDef, Generation, Primitive, TypeDef, TypeExpr, TypeKind};
pub use naming::IdentifierSynthesizer;
pub use resolve::{Resolution, Resolver, TypeRef};
pub use schema::{AdditionalProperties, Items, JsonType, SchemaNode, TypeSpec};
pub use settings::GenerateSettings;

use std::io::Write;
use std::path::Path;

use tracing::debug;

/// Root type name used when generating from a string with no override.
pub const DEFAULT_ROOT_TYPE_NAME: &str = "Root";

/// Root type name derived from a schema file: its base name up to the first `.`.
///
/// `schemas/user.schema.json` -> `user`
#[must_use]
pub fn default_root_type_name(schema_path: &Path) -> String {
    schema_path
        .file_name()
        .and_then(std::ffi::OsStr::to_str)
        .and_then(|name| name.split('.').next())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(DEFAULT_ROOT_TYPE_NAME)
        .to_string()
}

/// Resolve a JSON Schema string into a type model.
///
/// The root type is named after `settings.root_type_name`, or
/// [`DEFAULT_ROOT_TYPE_NAME`].
///
/// # Errors
///
/// Returns `SchemaTyperError` if the schema JSON is invalid, a name can't be
/// synthesized, a `$ref` can't be resolved, or two types get the same name.
pub fn generate(
    schema_json: &str,
    settings: &GenerateSettings,
) -> Result<Generation, SchemaTyperError> {
    let document: SchemaNode = serde_json::from_str(schema_json)?;
    let root_name: &str = settings
        .root_type_name
        .as_deref()
        .unwrap_or(DEFAULT_ROOT_TYPE_NAME);
    debug!(root = root_name, "resolving schema");
    Resolver::new(settings, root_name)?.resolve_document(&document)
}

/// Generate Rust types from a JSON Schema string and write them to `writer`.
///
/// The writer can be any type implementing `Write`, such as `File`, `Vec<u8>`, or
/// `Cursor<Vec<u8>>`, enabling easy unit testing without file system interaction.
///
/// # Errors
///
/// Returns `SchemaTyperError` for any [`generate`] error, or if writing to the
/// writer fails.
pub fn generate_to_writer<W: Write>(
    schema_json: &str,
    writer: &mut W,
    settings: &GenerateSettings,
) -> Result<(), SchemaTyperError> {
    let generation: Generation = generate(schema_json, settings)?;
    emit_rust(&generation, settings, writer)?;
    Ok(())
}

/// Generate Rust types from a JSON Schema file and write them to an output file.
///
/// Unless `settings.root_type_name` is set, the root type is named after the
/// input file (see [`default_root_type_name`]). Nothing is written when
/// generation fails.
///
/// # Errors
///
/// Returns `SchemaTyperError` if reading the input file fails, generation
/// fails, or writing the output file fails.
pub fn generate_from_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    settings: &GenerateSettings,
) -> Result<(), SchemaTyperError> {
    let input_path: &Path = input_path.as_ref();
    let schema_json: String = std::fs::read_to_string(input_path)?;

    let mut file_settings: GenerateSettings = settings.clone();
    if file_settings.root_type_name.is_none() {
        file_settings.root_type_name = Some(default_root_type_name(input_path));
    }

    let mut output: Vec<u8> = Vec::new();
    generate_to_writer(&schema_json, &mut output, &file_settings)?;
    std::fs::write(output_path, output)?;
    Ok(())
}
