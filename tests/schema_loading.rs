//! Schema Loading Tests
//!
//! Schemas declared as JSON documents on disk:
//! - Every document in the directory loads, in name order
//! - Registered schemas are immutable
//! - Malformed and unsupported documents fail the load
//! - Loaded schemas hydrate like reflected ones

use std::fs;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use hydrate::schema::{SchemaDocument, TypeDocument};
use hydrate::{ActorContext, Hydrator, RawInput, SchemaErrorCode, SchemaLoader, TypeTag};

// =============================================================================
// Helper Functions
// =============================================================================

fn post_document() -> serde_json::Value {
    json!({
        "name": "posts",
        "description": "Post creation payload",
        "fields": [
            {"name": "title", "type": {"kind": "string"}},
            {
                "name": "tags",
                "type": {"kind": "list", "element": {"kind": "string"}},
                "default": {"rule": "constant", "value": ["generic", "post"], "when_empty": true}
            },
            {
                "name": "status",
                "key": "post_status",
                "type": {"kind": "enum", "name": "PostStatus", "cases": {"Draft": "draft", "Published": "published"}}
            },
            {"name": "published_at", "type": {"kind": "datetime"}, "nullable": true},
            {
                "name": "visibility",
                "type": {"kind": "string"},
                "default": {"rule": "authorized", "if_true": "members", "if_false": "public"}
            },
            {
                "name": "author",
                "nullable": true,
                "type": {"kind": "object", "schema": {
                    "name": "author",
                    "fields": [{"name": "email", "type": {"kind": "string"}}]
                }}
            }
        ]
    })
}

fn setup_schema_dir() -> (TempDir, SchemaLoader) {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("posts.json"),
        serde_json::to_string_pretty(&post_document()).unwrap(),
    )
    .unwrap();
    fs::write(
        tmp.path().join("tags.json"),
        r#"{"name": "tags", "fields": [{"name": "name", "type": {"kind": "string"}}]}"#,
    )
    .unwrap();
    fs::write(tmp.path().join("README.md"), "not a schema").unwrap();

    let mut loader = SchemaLoader::new(tmp.path());
    loader.load_all().unwrap();
    (tmp, loader)
}

// =============================================================================
// Loading Tests
// =============================================================================

/// Every JSON document loads; other files are ignored.
#[test]
fn test_load_all_documents() {
    let (_tmp, loader) = setup_schema_dir();

    assert_eq!(loader.schema_count(), 2);
    assert!(loader.exists("posts"));
    assert!(loader.exists("tags"));
    assert_eq!(loader.schema_names().collect::<Vec<_>>(), ["posts", "tags"]);
}

/// Document types map onto the same tags as declared types.
#[test]
fn test_document_type_mapping() {
    let (_tmp, loader) = setup_schema_dir();
    let schema = loader.require("posts").unwrap();

    let tags = schema.field("tags").unwrap();
    assert_eq!(tags.declared_type().describe(), "list<string>");
    assert!(tags.has_default_rule());

    let status = schema.field("status").unwrap();
    assert_eq!(status.key(), "post_status");
    assert!(matches!(status.declared_type(), TypeTag::Enum(e) if e.name() == "PostStatus"));

    assert!(schema.field("published_at").unwrap().nullable());
    assert_eq!(schema.field("author").unwrap().declared_type().describe(), "object<author>");
}

/// A missing schema directory holds no schemas.
#[test]
fn test_missing_directory_is_empty() {
    let tmp = TempDir::new().unwrap();
    let mut loader = SchemaLoader::new(&tmp.path().join("absent"));
    assert_eq!(loader.load_all().unwrap(), 0);
    assert_eq!(loader.schema_count(), 0);
}

/// Unknown names fail with a coded error.
#[test]
fn test_unknown_schema() {
    let (_tmp, loader) = setup_schema_dir();
    let err = loader.require("comments").unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::UnknownSchema);
}

/// Registering the same name twice fails and keeps the first schema.
#[test]
fn test_schema_immutable() {
    let (tmp, mut loader) = setup_schema_dir();
    let before = loader.require("tags").unwrap();

    let err = loader.load_file(&tmp.path().join("tags.json")).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::SchemaImmutable);
    assert!(Arc::ptr_eq(&before, &loader.require("tags").unwrap()));
}

/// Malformed JSON fails the whole load.
#[test]
fn test_malformed_document_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("broken.json"), "{ not json").unwrap();

    let mut loader = SchemaLoader::new(tmp.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::MalformedSchema);
}

/// Unsupported field types fail the load.
#[test]
fn test_unsupported_type_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("pairs.json"),
        r#"{"name": "pairs", "fields": [{"name": "pair", "type": {"kind": "tuple", "members": [{"kind": "int"}, {"kind": "int"}]}}]}"#,
    )
    .unwrap();

    let mut loader = SchemaLoader::new(tmp.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::UnsupportedType);
    assert_eq!(err.field(), Some("pair"));
}

/// Saved documents load back into an equal document.
#[test]
fn test_save_and_reload_document() {
    let tmp = TempDir::new().unwrap();
    let loader = SchemaLoader::new(&tmp.path().join("schemas"));
    let document: SchemaDocument = serde_json::from_value(post_document()).unwrap();

    let path = loader.save_document(&document).unwrap();
    assert_eq!(SchemaDocument::from_file(&path).unwrap(), document);

    let err = loader.save_document(&document).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::SchemaImmutable);
}

/// Enum documents keep their cases in order.
#[test]
fn test_enum_document_cases() {
    let document: SchemaDocument = serde_json::from_value(post_document()).unwrap();
    let status = &document.fields[2].ty;
    match status {
        TypeDocument::Enum { name, cases } => {
            assert_eq!(name, "PostStatus");
            assert_eq!(cases.keys().collect::<Vec<_>>(), ["Draft", "Published"]);
        }
        other => panic!("unexpected type {:?}", other),
    }
}

// =============================================================================
// Hydration Tests
// =============================================================================

/// Loaded schemas hydrate with coercion, defaults and nested objects.
#[test]
fn test_hydrate_loaded_schema() {
    let (_tmp, loader) = setup_schema_dir();
    let schema = loader.require("posts").unwrap();

    let raw = RawInput::from_json(&json!({
        "title": "Hello world",
        "tags": "",
        "post_status": "draft",
        "published_at": "2023-09-06T17:35:53+02:00",
        "author": {"email": "taylor@hello.com"},
    }))
    .unwrap();

    let data = Hydrator::default()
        .hydrate_schema(&schema, &raw, &ActorContext::authenticated())
        .unwrap();

    assert_eq!(data.schema_name(), "posts");
    assert_eq!(data.get_as::<Vec<String>>("tags").unwrap(), ["generic", "post"]);
    assert_eq!(data.get("status").unwrap().as_enum().unwrap().case(), "Draft");
    assert_eq!(data.get_as::<String>("visibility").unwrap(), "members");
    assert!(data.get("published_at").unwrap().as_temporal().is_some());

    let author = data.get("author").unwrap().as_object().unwrap();
    assert_eq!(author.schema_name(), "author");
    assert!(author.was_filled("email"));
}

/// Nested failures report the dotted field path.
#[test]
fn test_nested_failure_path() {
    let (_tmp, loader) = setup_schema_dir();
    let schema = loader.require("posts").unwrap();

    let raw = RawInput::from_json(&json!({
        "title": "Hello world",
        "post_status": "draft",
        "author": {},
    }))
    .unwrap();

    let err = Hydrator::default()
        .hydrate_schema(&schema, &raw, &false)
        .unwrap_err();
    assert_eq!(err.code(), "HYDRATE_MISSING_VALUE");
    assert_eq!(err.field_path().as_deref(), Some("author.email"));
}
