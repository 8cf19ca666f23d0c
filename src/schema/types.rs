//! Schema type definitions
//!
//! Type tags (closed set the coercer acts on):
//! - scalar: string, int, float, bool, uuid
//! - enum: backed enum with string or int cases
//! - datetime: temporal value
//! - json: generic structured value
//! - list<T>: homogeneous list
//! - object<S>: nested object with its own schema
//! - collection: container wrapper, element type on the descriptor
//! - mixed: unknown, passed through

use std::fmt;
use std::sync::Arc;

use crate::coerce::CustomCast;
use crate::defaults::DefaultRule;
use crate::value::{EnumBacking, EnumMember, Value};

use super::errors::SchemaResult;

/// Scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// UUID
    Uuid,
}

impl ScalarKind {
    /// Returns the type name
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Bool => "bool",
            ScalarKind::Uuid => "uuid",
        }
    }

    /// Whether the value already has this scalar kind
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ScalarKind::String, Value::String(_))
                | (ScalarKind::Int, Value::Int(_))
                | (ScalarKind::Float, Value::Float(_))
                | (ScalarKind::Bool, Value::Bool(_))
                | (ScalarKind::Uuid, Value::Uuid(_))
        )
    }
}

/// A backed enum declaration: named cases, each with a string or int value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: Arc<str>,
    cases: Vec<(String, EnumBacking)>,
}

impl EnumType {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            cases: Vec::new(),
        }
    }

    /// Adds a case
    pub fn case(mut self, name: impl Into<String>, backing: impl Into<EnumBacking>) -> Self {
        self.cases.push((name.into(), backing.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[(String, EnumBacking)] {
        &self.cases
    }

    /// Whether the member was resolved from this enum
    pub fn owns(&self, member: &EnumMember) -> bool {
        member.enum_name() == self.name()
            && self
                .cases
                .iter()
                .any(|(case, backing)| case == member.case() && backing == member.backing())
    }

    /// Resolves a scalar to the case whose backing value matches it.
    ///
    /// Strings match string backings exactly and int backings when they parse
    /// as that integer; ints match int backings and string backings holding
    /// their decimal form. Whole floats match int backings. Other scalars
    /// never match.
    pub fn resolve(&self, raw: &Value) -> Option<EnumMember> {
        self.cases
            .iter()
            .find(|(_, backing)| match (backing, raw) {
                (EnumBacking::String(b), Value::String(s)) => b == s,
                (EnumBacking::Int(b), Value::String(s)) => s.trim().parse::<i64>() == Ok(*b),
                (EnumBacking::Int(b), Value::Int(i)) => b == i,
                (EnumBacking::String(b), Value::Int(i)) => *b == i.to_string(),
                (EnumBacking::Int(b), Value::Float(f)) => f.fract() == 0.0 && *f == *b as f64,
                _ => false,
            })
            .map(|(case, backing)| EnumMember::new(Arc::clone(&self.name), case, backing.clone()))
    }
}

/// A Rust enum that hydrates from a backed enum declaration.
pub trait BackedEnum: Sized {
    fn enum_type() -> EnumType;

    fn from_member(member: &EnumMember) -> Option<Self>;
}

/// Reference to the schema of a nested object.
///
/// Typed references resolve lazily through the reflector cache, which keeps
/// self-referential data objects declarable.
#[derive(Clone)]
pub enum SchemaRef {
    /// Schema reflected from a Rust type on first use
    Typed {
        type_name: &'static str,
        resolve: fn() -> SchemaResult<Arc<Schema>>,
    },
    /// Schema built up front (e.g. loaded from a document)
    Inline(Arc<Schema>),
}

impl SchemaRef {
    pub fn inline(schema: Schema) -> Self {
        SchemaRef::Inline(Arc::new(schema))
    }

    /// Name used for descriptions; the Rust type name for typed references
    pub fn name(&self) -> &str {
        match self {
            SchemaRef::Typed { type_name, .. } => type_name,
            SchemaRef::Inline(schema) => schema.name(),
        }
    }

    pub fn resolve(&self) -> SchemaResult<Arc<Schema>> {
        match self {
            SchemaRef::Typed { resolve, .. } => resolve(),
            SchemaRef::Inline(schema) => Ok(Arc::clone(schema)),
        }
    }
}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SchemaRef").field(&self.name()).finish()
    }
}

impl PartialEq for SchemaRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SchemaRef::Inline(a), SchemaRef::Inline(b)) => Arc::ptr_eq(a, b),
            _ => self.name() == other.name(),
        }
    }
}

/// Type category of a field
#[derive(Debug, Clone, PartialEq)]
pub enum TypeTag {
    Scalar(ScalarKind),
    Enum(EnumType),
    Temporal,
    GenericStructured,
    ListOf(Box<TypeTag>),
    NestedObjectOf(SchemaRef),
    Collection,
    Unknown,
}

impl TypeTag {
    /// Returns the category name for log fields
    pub fn category(&self) -> &'static str {
        match self {
            TypeTag::Scalar(kind) => kind.type_name(),
            TypeTag::Enum(_) => "enum",
            TypeTag::Temporal => "datetime",
            TypeTag::GenericStructured => "json",
            TypeTag::ListOf(_) => "list",
            TypeTag::NestedObjectOf(_) => "object",
            TypeTag::Collection => "collection",
            TypeTag::Unknown => "mixed",
        }
    }

    /// Full description, e.g. `list<datetime>` or `enum<PostStatus>`
    pub fn describe(&self) -> String {
        match self {
            TypeTag::Enum(e) => format!("enum<{}>", e.name()),
            TypeTag::ListOf(inner) => format!("list<{}>", inner.describe()),
            TypeTag::NestedObjectOf(schema) => format!("object<{}>", schema.name()),
            other => other.category().to_string(),
        }
    }

    /// Whether list elements of this type get coerced one by one.
    pub fn is_concrete_element(&self) -> bool {
        matches!(
            self,
            TypeTag::Enum(_)
                | TypeTag::Temporal
                | TypeTag::GenericStructured
                | TypeTag::NestedObjectOf(_)
        )
    }

    /// Whether a delimited string may be split into a list of this type.
    pub fn splits_from_string(&self) -> bool {
        matches!(
            self,
            TypeTag::Scalar(_) | TypeTag::Unknown | TypeTag::Enum(_) | TypeTag::Temporal
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Immutable description of one field of a schema.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    key: String,
    declared_type: TypeTag,
    nullable: bool,
    element_type: Option<TypeTag>,
    default_rule: Option<DefaultRule>,
    cast: Option<Arc<dyn CustomCast>>,
}

impl FieldDescriptor {
    pub(crate) fn new(
        name: String,
        key: String,
        declared_type: TypeTag,
        nullable: bool,
        element_type: Option<TypeTag>,
        default_rule: Option<DefaultRule>,
        cast: Option<Arc<dyn CustomCast>>,
    ) -> Self {
        Self {
            name,
            key,
            declared_type,
            nullable,
            element_type,
            default_rule,
            cast,
        }
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw input key the field is read from
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn declared_type(&self) -> &TypeTag {
        &self.declared_type
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Element type of container fields
    pub fn element_type(&self) -> Option<&TypeTag> {
        self.element_type.as_ref()
    }

    pub fn has_default_rule(&self) -> bool {
        self.default_rule.is_some()
    }

    pub fn has_custom_cast(&self) -> bool {
        self.cast.is_some()
    }

    pub fn default_rule(&self) -> Option<&DefaultRule> {
        self.default_rule.as_ref()
    }

    pub fn cast(&self) -> Option<&Arc<dyn CustomCast>> {
        self.cast.as_ref()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("declared_type", &self.declared_type)
            .field("nullable", &self.nullable)
            .field("element_type", &self.element_type)
            .field("has_default_rule", &self.has_default_rule())
            .field("has_custom_cast", &self.has_custom_cast())
            .finish()
    }
}

/// Ordered set of field descriptors for one target shape.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub(crate) fn new(name: String, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field descriptors in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declaration index of a field
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
