//! Binary to generate Rust types from a JSON Schema file.
//!
//! Usage: `schematyper [OPTIONS] <SCHEMA>`
//!
//! Writes `<root>_schematype.rs` next to the working directory, or to stdout
//! with `-c`. Set `RUST_LOG=schematyper=debug` to trace resolution on stderr.

use std::io::{Write, stdout};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use schematyper::{
    GenerateSettings, SchemaTyperError, default_root_type_name, generate_from_file,
    generate_to_writer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate Rust types from a JSON Schema document.
#[derive(Parser, Debug)]
#[command(name = "schematyper", version, about)]
struct Cli {
    /// JSON Schema file to read
    #[arg(value_name = "SCHEMA")]
    schema: PathBuf,

    /// write generated code to stdout instead of a file (overrides -o)
    #[arg(short = 'c', long = "stdout")]
    stdout: bool,

    /// output file (default: <root type name, lowercased>_schematype.rs)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// name of the root type (default: schema file name up to the first '.')
    #[arg(long = "root-type", value_name = "NAME")]
    root_type: Option<String>,

    /// prefix for every non-root type name
    #[arg(long = "prefix", value_name = "PREFIX", default_value = "")]
    prefix: String,

    /// leave non-root type names unexported (crate-private)
    #[arg(long = "private")]
    private: bool,
}

fn run(cli: Cli) -> Result<(), SchemaTyperError> {
    let root_type_name: String = cli
        .root_type
        .unwrap_or_else(|| default_root_type_name(&cli.schema));
    let settings = GenerateSettings {
        root_type_name: Some(root_type_name.clone()),
        type_name_prefix: cli.prefix,
        isolated_namespace: cli.private,
    };

    if cli.stdout {
        let schema_json: String = std::fs::read_to_string(&cli.schema)?;
        let mut out = stdout().lock();
        generate_to_writer(&schema_json, &mut out, &settings)?;
        out.flush()?;
        return Ok(());
    }

    let output: PathBuf = cli.output.unwrap_or_else(|| {
        PathBuf::from(format!("{}_schematype.rs", root_type_name.to_lowercase()))
    });
    generate_from_file(&cli.schema, &output, &settings)?;
    info!(output = %output.display(), "wrote generated types");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli: Cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
