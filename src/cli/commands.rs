//! CLI command implementations
//!
//! Each command prints exactly one JSON object on stdout. Failures print an
//! error object and exit non-zero.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::context::{ActorContext, Settings, StaticSettings};
use crate::hydrator::{Hydrator, RawInput};
use crate::observability;
use crate::schema::{FieldDescriptor, Schema, SchemaDocument, SchemaLoader};

use super::args::{Cli, Command};
use super::errors::CliResult;
use super::io::{read_input, write_error, write_hydrated, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    observability::init();
    let cli = Cli::parse_args();
    run_command(cli.command).inspect_err(|e| {
        // stdout may be gone; the caller still reports on stderr
        let _ = write_error(e.code_str(), e.message());
    })
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Run {
            schema,
            input,
            settings,
            authenticated,
            abilities,
        } => hydrate(&schema, &input, settings.as_deref(), authenticated, abilities),
        Command::Inspect { schema } => inspect(&schema),
        Command::List { schema_dir } => list(&schema_dir),
    }
}

/// Hydrate one input document
pub fn hydrate(
    schema_path: &Path,
    input_path: &Path,
    settings_path: Option<&Path>,
    authenticated: bool,
    abilities: Vec<String>,
) -> CliResult<()> {
    let schema = Arc::new(SchemaDocument::from_file(schema_path)?.build()?);
    let raw = RawInput::from_json_str(&read_input(input_path)?)?;

    let hydrator = Hydrator::from_settings(load_settings(settings_path)?)?;
    let actor = if !abilities.is_empty() {
        ActorContext::with_abilities(abilities)
    } else if authenticated {
        ActorContext::authenticated()
    } else {
        ActorContext::anonymous()
    };

    let object = hydrator.hydrate_schema(&schema, &raw, &actor)?;
    write_hydrated(&object)
}

/// Print the descriptors of a schema document
pub fn inspect(schema_path: &Path) -> CliResult<()> {
    let schema = SchemaDocument::from_file(schema_path)?.build()?;
    write_response(describe_schema(&schema))
}

/// List the schemas of a directory
pub fn list(schema_dir: &Path) -> CliResult<()> {
    let mut loader = SchemaLoader::new(schema_dir);
    loader.load_all()?;

    let schemas: Vec<Value> = loader
        .schema_names()
        .filter_map(|name| loader.get(name))
        .map(|schema| json!({"name": schema.name(), "fields": schema.len()}))
        .collect();
    write_response(json!({ "schemas": schemas }))
}

/// Settings from `HYDRATE_*` variables, overlaid with a settings file
fn load_settings(path: Option<&Path>) -> CliResult<Arc<dyn Settings>> {
    let env = StaticSettings::from_env();
    let settings = match path {
        Some(path) => env.merge(StaticSettings::from_json_file(path)?),
        None => env,
    };
    Ok(Arc::new(settings))
}

fn describe_schema(schema: &Schema) -> Value {
    json!({
        "name": schema.name(),
        "fields": schema.fields().iter().map(describe_field).collect::<Vec<_>>()
    })
}

fn describe_field(field: &FieldDescriptor) -> Value {
    json!({
        "name": field.name(),
        "key": field.key(),
        "type": field.declared_type().describe(),
        "nullable": field.nullable(),
        "element_type": field.element_type().map(|tag| tag.describe()),
        "has_default_rule": field.has_default_rule(),
        "has_custom_cast": field.has_custom_cast(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DeclaredType, FieldDecl, SchemaBuilder};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_describe_field() {
        let schema = SchemaBuilder::new("Post")
            .field(FieldDecl::new("dates", DeclaredType::collection_of(DeclaredType::DateTime)).nullable())
            .build()
            .unwrap();

        let described = describe_schema(&schema);
        assert_eq!(
            described["fields"][0],
            json!({
                "name": "dates",
                "key": "dates",
                "type": "collection",
                "nullable": true,
                "element_type": "datetime",
                "has_default_rule": false,
                "has_custom_cast": false,
            })
        );
    }

    #[test]
    fn test_settings_file_overlays_environment() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"list_delimiter": "|"}"#).unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.string("list_delimiter").as_deref(), Some("|"));
    }

    #[test]
    fn test_hydrate_reports_schema_errors() {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("bad.json");
        fs::write(&schema, "{").unwrap();

        let err = hydrate(&schema, Path::new("-"), None, false, Vec::new()).unwrap_err();
        assert_eq!(err.code_str(), "HYDRATE_MALFORMED_SCHEMA");
    }
}
