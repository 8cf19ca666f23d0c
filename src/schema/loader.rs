//! Schema loader for schema documents on disk
//!
//! - One JSON document per schema, `<name>.json`
//! - Names are unique; a registered schema is never replaced
//! - Malformed documents fail the load
//!
//! Documents spell the same type vocabulary as `DeclaredType`. Computed
//! defaults need code and are only available to `DataObject` declarations.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::defaults::DefaultRule;
use crate::observability::Event;
use crate::value::{EnumBacking, Value};

use super::declare::{DeclaredType, FieldDecl, SchemaBuilder};
use super::errors::{SchemaError, SchemaResult};
use super::types::{EnumType, Schema, SchemaRef};

/// A schema declaration as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Unique schema name
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field declarations, in hydration order
    pub fields: Vec<FieldDocument>,
}

/// One field of a schema document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDocument {
    pub name: String,
    /// Raw input key, defaults to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeDocument,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultDocument>,
}

/// Field type of a schema document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDocument {
    String,
    Int,
    Float,
    Bool,
    Uuid,
    Mixed,
    Null,
    Array,
    Datetime,
    Json,
    List {
        element: Box<TypeDocument>,
    },
    Collection {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        element: Option<Box<TypeDocument>>,
    },
    Enum {
        name: String,
        /// Case name to backing value (string or integer)
        cases: IndexMap<String, serde_json::Value>,
    },
    Object {
        schema: Box<SchemaDocument>,
    },
    Union {
        members: Vec<TypeDocument>,
    },
    Map {
        key: Box<TypeDocument>,
        value: Box<TypeDocument>,
    },
    Tuple {
        members: Vec<TypeDocument>,
    },
}

/// Default rule of a schema document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultDocument {
    #[serde(flatten)]
    pub rule: RuleDocument,
    /// Also replace explicitly supplied empty values
    #[serde(default)]
    pub when_empty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleDocument {
    Constant {
        value: serde_json::Value,
    },
    Authorized {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ability: Option<String>,
        if_true: serde_json::Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        if_false: Option<serde_json::Value>,
    },
    Setting {
        key: String,
        if_true: serde_json::Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        if_false: Option<serde_json::Value>,
    },
}

impl SchemaDocument {
    /// Parses a document from JSON text
    pub fn from_json_str(content: &str, origin: &str) -> SchemaResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed_schema(origin, format!("Invalid JSON: {}", e)))
    }

    /// Reads a document from a file
    pub fn from_file(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    /// Builds the schema this document declares
    pub fn build(&self) -> SchemaResult<Schema> {
        let mut builder = SchemaBuilder::new(&self.name);
        for field in &self.fields {
            builder = builder.field(field.to_decl(&self.name)?);
        }
        builder.build()
    }
}

impl FieldDocument {
    fn to_decl(&self, schema: &str) -> SchemaResult<FieldDecl> {
        let mut decl = FieldDecl::new(&self.name, self.ty.to_declared(schema, &self.name)?);
        if let Some(key) = &self.key {
            decl = decl.from_key(key);
        }
        if self.nullable {
            decl = decl.nullable();
        }
        if let Some(default) = &self.default {
            decl = decl.default(default.to_rule());
        }
        Ok(decl)
    }
}

impl TypeDocument {
    fn to_declared(&self, schema: &str, field: &str) -> SchemaResult<DeclaredType> {
        let nested = |doc: &TypeDocument| doc.to_declared(schema, field);
        let many = |docs: &[TypeDocument]| docs.iter().map(nested).collect::<SchemaResult<Vec<_>>>();

        Ok(match self {
            TypeDocument::String => DeclaredType::String,
            TypeDocument::Int => DeclaredType::Int,
            TypeDocument::Float => DeclaredType::Float,
            TypeDocument::Bool => DeclaredType::Bool,
            TypeDocument::Uuid => DeclaredType::Uuid,
            TypeDocument::Mixed => DeclaredType::Mixed,
            TypeDocument::Null => DeclaredType::Null,
            TypeDocument::Array => DeclaredType::Array,
            TypeDocument::Datetime => DeclaredType::DateTime,
            TypeDocument::Json => DeclaredType::Json,
            TypeDocument::List { element } => DeclaredType::list(nested(element)?),
            TypeDocument::Collection { element } => {
                DeclaredType::Collection(element.as_deref().map(nested).transpose()?.map(Box::new))
            }
            TypeDocument::Enum { name, cases } => {
                let mut enum_type = EnumType::new(name);
                for (case, backing) in cases {
                    let backing = match backing {
                        serde_json::Value::String(s) => EnumBacking::String(s.clone()),
                        serde_json::Value::Number(n) if n.is_i64() => {
                            EnumBacking::Int(n.as_i64().unwrap_or_default())
                        }
                        other => {
                            return Err(SchemaError::unsupported_type(
                                schema,
                                field,
                                format!("enum case '{}' has backing value {}", case, other),
                            ))
                        }
                    };
                    enum_type = enum_type.case(case, backing);
                }
                DeclaredType::Enum(enum_type)
            }
            TypeDocument::Object { schema: document } => {
                DeclaredType::Object(SchemaRef::inline(document.build()?))
            }
            TypeDocument::Union { members } => DeclaredType::Union(many(members)?),
            TypeDocument::Map { key, value } => {
                DeclaredType::Map(Box::new(nested(key)?), Box::new(nested(value)?))
            }
            TypeDocument::Tuple { members } => DeclaredType::Tuple(many(members)?),
        })
    }
}

impl DefaultDocument {
    fn to_rule(&self) -> DefaultRule {
        let rule = match &self.rule {
            RuleDocument::Constant { value } => DefaultRule::constant(Value::from(value.clone())),
            RuleDocument::Authorized {
                ability: None,
                if_true,
                if_false,
            } => DefaultRule::when_authenticated(
                Value::from(if_true.clone()),
                if_false.clone().map(Value::from),
            ),
            RuleDocument::Authorized {
                ability: Some(ability),
                if_true,
                if_false,
            } => DefaultRule::when_allowed(
                ability,
                Value::from(if_true.clone()),
                if_false.clone().map(Value::from),
            ),
            RuleDocument::Setting {
                key,
                if_true,
                if_false,
            } => DefaultRule::when_setting(
                key,
                Value::from(if_true.clone()),
                if_false.clone().map(Value::from),
            ),
        };
        if self.when_empty {
            rule.also_when_empty()
        } else {
            rule
        }
    }
}

/// Schema loader that reads schema documents from a directory and keeps an
/// in-memory registry by name.
pub struct SchemaLoader {
    /// Directory containing schema documents
    schema_dir: PathBuf,
    /// Loaded schemas indexed by name
    schemas: IndexMap<String, Arc<Schema>>,
}

impl SchemaLoader {
    /// Creates a loader for the given schema directory.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: IndexMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` document in the schema directory.
    ///
    /// A missing directory holds no schemas.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        if !self.schema_dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        // directory order is platform dependent
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }

        info!(
            event = %Event::SchemasLoaded,
            dir = %self.schema_dir.display(),
            count = paths.len(),
            "schemas loaded"
        );
        Ok(paths.len())
    }

    /// Loads a single schema document.
    pub fn load_file(&mut self, path: &Path) -> SchemaResult<Arc<Schema>> {
        let document = SchemaDocument::from_file(path)?;
        self.register_document(&document)
    }

    /// Builds and registers a document.
    pub fn register_document(&mut self, document: &SchemaDocument) -> SchemaResult<Arc<Schema>> {
        self.register(document.build()?)
    }

    /// Registers a schema directly.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<Arc<Schema>> {
        if self.schemas.contains_key(schema.name()) {
            return Err(SchemaError::schema_immutable(schema.name()));
        }

        let schema = Arc::new(schema);
        self.schemas
            .insert(schema.name().to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Gets a schema by name.
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }

    /// Gets a schema by name, failing when it is unknown.
    pub fn require(&self, name: &str) -> SchemaResult<Arc<Schema>> {
        self.get(name)
            .ok_or_else(|| SchemaError::unknown_schema(name))
    }

    /// Checks if a schema exists.
    pub fn exists(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Returns registered schema names in registration order.
    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Returns the number of loaded schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Saves a document into the schema directory as `<name>.json`.
    pub fn save_document(&self, document: &SchemaDocument) -> SchemaResult<PathBuf> {
        let path = self.schema_dir.join(format!("{}.json", document.name));

        if path.exists() {
            return Err(SchemaError::schema_immutable(&document.name));
        }

        if !self.schema_dir.exists() {
            fs::create_dir_all(&self.schema_dir).map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to create schema directory: {}", e),
                )
            })?;
        }

        let content = serde_json::to_string_pretty(document).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to serialize schema: {}", e),
            )
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to write file: {}", e),
            )
        })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaErrorCode, TypeTag};
    use serde_json::json;
    use tempfile::TempDir;

    fn post_document() -> SchemaDocument {
        serde_json::from_value(json!({
            "name": "CreatePostData",
            "fields": [
                {"name": "title", "type": {"kind": "string"}},
                {"name": "tags", "type": {"kind": "list", "element": {"kind": "string"}},
                 "default": {"rule": "constant", "value": ["generic", "post"], "when_empty": true}},
                {"name": "post_status", "key": "postStatus",
                 "type": {"kind": "enum", "name": "PostStatus",
                          "cases": {"Draft": "draft", "Published": "published"}}},
                {"name": "published_at", "type": {"kind": "datetime"}, "nullable": true},
                {"name": "dates", "type": {"kind": "collection", "element": {"kind": "datetime"}},
                 "nullable": true}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_document_builds_schema() {
        let schema = post_document().build().unwrap();

        assert_eq!(schema.name(), "CreatePostData");
        assert_eq!(schema.len(), 5);
        assert_eq!(schema.field("post_status").unwrap().key(), "postStatus");
        assert!(schema.field("tags").unwrap().has_default_rule());
        assert!(schema.field("published_at").unwrap().nullable());
        assert_eq!(
            schema.field("dates").unwrap().element_type(),
            Some(&TypeTag::Temporal)
        );
    }

    #[test]
    fn test_register_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        loader.register_document(&post_document()).unwrap();

        assert!(loader.exists("CreatePostData"));
        assert_eq!(loader.require("CreatePostData").unwrap().len(), 5);
    }

    #[test]
    fn test_schema_immutability() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        loader.register_document(&post_document()).unwrap();
        let err = loader.register_document(&post_document()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::SchemaImmutable);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(temp_dir.path());
        loader.save_document(&post_document()).unwrap();

        let mut reloaded = SchemaLoader::new(temp_dir.path());
        assert_eq!(reloaded.load_all().unwrap(), 1);
        assert!(reloaded.exists("CreatePostData"));
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(temp_dir.path());
        loader.save_document(&post_document()).unwrap();
        assert!(loader.save_document(&post_document()).is_err());
    }

    #[test]
    fn test_unknown_schema() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(temp_dir.path());

        assert!(loader.get("nonexistent").is_none());
        assert_eq!(
            loader.require("nonexistent").unwrap_err().code(),
            SchemaErrorCode::UnknownSchema
        );
    }

    #[test]
    fn test_load_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(&temp_dir.path().join("absent"));
        assert_eq!(loader.load_all().unwrap(), 0);
        assert_eq!(loader.schema_count(), 0);
    }

    #[test]
    fn test_malformed_document() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.json"), "{\"name\": ").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MalformedSchema);
        assert!(err.message().contains("broken.json"));
    }

    #[test]
    fn test_non_scalar_enum_backing_rejected() {
        let document: SchemaDocument = serde_json::from_value(json!({
            "name": "Bad",
            "fields": [{"name": "status", "type": {"kind": "enum", "name": "S", "cases": {"A": [1]}}}]
        }))
        .unwrap();
        let err = document.build().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnsupportedType);
    }

    #[test]
    fn test_nested_object_document() {
        let document: SchemaDocument = serde_json::from_value(json!({
            "name": "Post",
            "fields": [{"name": "author", "type": {"kind": "object", "schema": {
                "name": "Author",
                "fields": [{"name": "email", "type": {"kind": "string"}}]
            }}}]
        }))
        .unwrap();

        let schema = document.build().unwrap();
        match schema.field("author").unwrap().declared_type() {
            TypeTag::NestedObjectOf(nested) => {
                assert_eq!(nested.name(), "Author");
                assert!(nested.resolve().unwrap().field("email").is_some());
            }
            other => panic!("unexpected tag {:?}", other),
        }
    }
}
