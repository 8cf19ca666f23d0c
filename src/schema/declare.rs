//! Declaring target shapes
//!
//! A target shape is declared with the host-shape vocabulary of
//! `DeclaredType`, which is wider than what the coercer understands (unions,
//! maps, tuples). `SchemaBuilder::build` maps declarations into type tags and
//! rejects what has no tag.

use std::collections::HashSet;
use std::sync::Arc;

use crate::coerce::CustomCast;
use crate::defaults::{DefaultRule, RuleKind};

use super::errors::{SchemaError, SchemaResult};
use super::types::{BackedEnum, EnumType, FieldDescriptor, ScalarKind, Schema, SchemaRef, TypeTag};

/// A declared field type, as the target shape spells it.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    String,
    Int,
    Float,
    Bool,
    Uuid,
    /// Anything; implicitly nullable
    Mixed,
    /// The null type, only meaningful inside a union
    Null,
    /// Untyped array
    Array,
    /// Typed list
    List(Box<DeclaredType>),
    /// Container wrapper with an optional element type
    Collection(Option<Box<DeclaredType>>),
    DateTime,
    /// Generic structured value
    Json,
    Enum(EnumType),
    Object(SchemaRef),
    Optional(Box<DeclaredType>),
    Union(Vec<DeclaredType>),
    Map(Box<DeclaredType>, Box<DeclaredType>),
    Tuple(Vec<DeclaredType>),
}

/// Result of mapping a declared type
struct Mapped {
    tag: TypeTag,
    nullable: bool,
    element: Option<TypeTag>,
}

impl DeclaredType {
    pub fn list(element: DeclaredType) -> Self {
        DeclaredType::List(Box::new(element))
    }

    pub fn collection() -> Self {
        DeclaredType::Collection(None)
    }

    pub fn collection_of(element: DeclaredType) -> Self {
        DeclaredType::Collection(Some(Box::new(element)))
    }

    pub fn optional(inner: DeclaredType) -> Self {
        DeclaredType::Optional(Box::new(inner))
    }

    pub fn enumeration<E: BackedEnum>() -> Self {
        DeclaredType::Enum(E::enum_type())
    }

    pub fn object<T: DataObject>() -> Self {
        DeclaredType::Object(SchemaRef::Typed {
            type_name: std::any::type_name::<T>(),
            resolve: super::reflector::reflect::<T>,
        })
    }

    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            DeclaredType::String => "string".into(),
            DeclaredType::Int => "int".into(),
            DeclaredType::Float => "float".into(),
            DeclaredType::Bool => "bool".into(),
            DeclaredType::Uuid => "uuid".into(),
            DeclaredType::Mixed => "mixed".into(),
            DeclaredType::Null => "null".into(),
            DeclaredType::Array => "array".into(),
            DeclaredType::List(inner) => format!("list<{}>", inner.describe()),
            DeclaredType::Collection(None) => "collection".into(),
            DeclaredType::Collection(Some(inner)) => format!("collection<{}>", inner.describe()),
            DeclaredType::DateTime => "datetime".into(),
            DeclaredType::Json => "json".into(),
            DeclaredType::Enum(e) => format!("enum<{}>", e.name()),
            DeclaredType::Object(schema) => format!("object<{}>", schema.name()),
            DeclaredType::Optional(inner) => format!("?{}", inner.describe()),
            DeclaredType::Union(members) => members
                .iter()
                .map(DeclaredType::describe)
                .collect::<Vec<_>>()
                .join("|"),
            DeclaredType::Map(k, v) => format!("map<{}, {}>", k.describe(), v.describe()),
            DeclaredType::Tuple(members) => format!(
                "({})",
                members
                    .iter()
                    .map(DeclaredType::describe)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    fn to_mapped(&self) -> Result<Mapped, String> {
        let plain = |tag| {
            Ok(Mapped {
                tag,
                nullable: false,
                element: None,
            })
        };

        match self {
            DeclaredType::String => plain(TypeTag::Scalar(ScalarKind::String)),
            DeclaredType::Int => plain(TypeTag::Scalar(ScalarKind::Int)),
            DeclaredType::Float => plain(TypeTag::Scalar(ScalarKind::Float)),
            DeclaredType::Bool => plain(TypeTag::Scalar(ScalarKind::Bool)),
            DeclaredType::Uuid => plain(TypeTag::Scalar(ScalarKind::Uuid)),
            DeclaredType::DateTime => plain(TypeTag::Temporal),
            DeclaredType::Json => plain(TypeTag::GenericStructured),
            DeclaredType::Enum(e) => plain(TypeTag::Enum(e.clone())),
            DeclaredType::Object(schema) => plain(TypeTag::NestedObjectOf(schema.clone())),
            DeclaredType::Mixed => Ok(Mapped {
                tag: TypeTag::Unknown,
                nullable: true,
                element: None,
            }),
            DeclaredType::Array => Ok(Mapped {
                tag: TypeTag::ListOf(Box::new(TypeTag::Unknown)),
                nullable: false,
                element: Some(TypeTag::Unknown),
            }),
            DeclaredType::List(inner) => {
                // element nullability is not tracked
                let element = inner.to_mapped()?.tag;
                Ok(Mapped {
                    tag: TypeTag::ListOf(Box::new(element.clone())),
                    nullable: false,
                    element: Some(element),
                })
            }
            DeclaredType::Collection(inner) => Ok(Mapped {
                tag: TypeTag::Collection,
                nullable: false,
                element: inner.as_ref().map(|i| i.to_mapped()).transpose()?.map(|m| m.tag),
            }),
            DeclaredType::Optional(inner) => {
                let mapped = inner.to_mapped()?;
                Ok(Mapped {
                    nullable: true,
                    ..mapped
                })
            }
            DeclaredType::Union(members) => {
                let has_null = members.iter().any(|m| *m == DeclaredType::Null);
                let non_null: Vec<&DeclaredType> =
                    members.iter().filter(|m| **m != DeclaredType::Null).collect();
                match non_null.as_slice() {
                    [single] => {
                        let mapped = single.to_mapped()?;
                        Ok(Mapped {
                            nullable: mapped.nullable || has_null,
                            ..mapped
                        })
                    }
                    [] => Err("a union needs at least one non-null member".into()),
                    _ => Err(format!("union types are not supported ({})", self.describe())),
                }
            }
            DeclaredType::Null => Err("null is only valid inside a union".into()),
            DeclaredType::Map(_, _) => {
                Err(format!("keyed maps are not supported ({})", self.describe()))
            }
            DeclaredType::Tuple(_) => Err(format!("tuples are not supported ({})", self.describe())),
        }
    }
}

/// Declaration of one field.
#[derive(Clone)]
pub struct FieldDecl {
    name: String,
    key: Option<String>,
    ty: DeclaredType,
    default: Option<DefaultRule>,
    cast: Option<Arc<dyn CustomCast>>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            key: None,
            ty,
            default: None,
            cast: None,
        }
    }

    /// Reads the field from a different raw input key
    pub fn from_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.ty = DeclaredType::optional(self.ty);
        self
    }

    pub fn default(mut self, rule: DefaultRule) -> Self {
        self.default = Some(rule);
        self
    }

    /// Replaces the type coercer for this field
    pub fn cast_with(mut self, cast: Arc<dyn CustomCast>) -> Self {
        self.cast = Some(cast);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &DeclaredType {
        &self.ty
    }
}

/// Collects field declarations and builds a `Schema`.
#[derive(Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDecl>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maps every declaration into a field descriptor.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if:
    /// - A field type has no type tag (HYDRATE_UNSUPPORTED_TYPE)
    /// - A field name repeats (HYDRATE_DUPLICATE_FIELD)
    /// - A computed default depends on an undeclared field (HYDRATE_UNKNOWN_DEPENDENCY)
    pub fn build(self) -> SchemaResult<Schema> {
        let mut seen = HashSet::new();
        for decl in &self.fields {
            if !seen.insert(decl.name.as_str()) {
                return Err(SchemaError::duplicate_field(&self.name, &decl.name));
            }
        }

        for decl in &self.fields {
            if let Some(RuleKind::Computed { depends_on, .. }) = decl.default.as_ref().map(DefaultRule::kind) {
                if let Some(missing) = depends_on.iter().find(|dep| !seen.contains(dep.as_str())) {
                    return Err(SchemaError::unknown_dependency(&self.name, &decl.name, missing));
                }
            }
        }

        let mut descriptors = Vec::with_capacity(self.fields.len());
        for decl in self.fields {
            let mapped = decl
                .ty
                .to_mapped()
                .map_err(|reason| SchemaError::unsupported_type(&self.name, &decl.name, reason))?;
            let key = decl.key.unwrap_or_else(|| decl.name.clone());
            descriptors.push(FieldDescriptor::new(
                decl.name,
                key,
                mapped.tag,
                mapped.nullable,
                mapped.element,
                decl.default,
                decl.cast,
            ));
        }

        Ok(Schema::new(self.name, descriptors))
    }
}

/// A target shape that can be reflected into a schema.
pub trait DataObject: 'static {
    fn declare() -> SchemaBuilder;
}
