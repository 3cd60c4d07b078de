//! Example matching the README: a schema exercising references, maps,
//! arrays, nullable unions and timestamps.
//!
//! Contains only the input JSON Schema and the conversion logic; generated
//! Rust is written to stdout.

use std::io;

const SCHEMA_JSON: &str = r##"{
  "type": "object",
  "description": "A blog post.",
  "required": ["id", "title"],
  "definitions": {
    "person": {
      "type": "object",
      "required": ["name"],
      "properties": {
        "name": { "type": "string" },
        "homepage_url": { "type": ["string", "null"] }
      }
    }
  },
  "properties": {
    "id": { "type": "integer" },
    "title": { "type": "string", "description": "Headline shown in listings." },
    "author": { "$ref": "#/definitions/person" },
    "published_at": { "type": "string", "format": "date-time" },
    "comments": {
      "type": "array",
      "items": {
        "type": "object",
        "properties": {
          "body": { "type": "string" },
          "replyTo": { "$ref": "#" }
        }
      }
    },
    "Tags": { "type": "object", "additionalProperties": { "type": "string" } }
  }
}"##;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout: io::Stdout = io::stdout();
    let settings = schematyper::GenerateSettings {
        root_type_name: Some("post".to_string()),
        ..schematyper::GenerateSettings::default()
    };
    schematyper::generate_to_writer(SCHEMA_JSON, &mut stdout, &settings)?;
    Ok(())
}
