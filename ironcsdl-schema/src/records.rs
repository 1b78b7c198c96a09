//! Raw schema records.
//!
//! This module contains the declarations read out of CSDL documents before
//! any resolution takes place: entity types, complex types, enumerations and
//! type definitions, grouped by namespace.

use std::collections::BTreeMap;

/// Declarations of every loaded document, grouped by namespace.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// Namespace name to the declarations found in it.
    pub namespaces: BTreeMap<String, SchemaRecords>,
}

impl RecordSet {
    /// Creates an empty record set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges every schema of a parsed document into the set.
    ///
    /// Schemas declaring a namespace that is already present are appended to
    /// it, so a later declaration of the same name shadows the earlier one when
    /// the type model is built.
    pub fn add_document(&mut self, document: Document) {
        for schema in document.schemas {
            self.namespaces
                .entry(schema.namespace.clone())
                .or_insert_with(|| SchemaRecords::new(schema.namespace.clone()))
                .extend(schema);
        }
    }

    /// Looks up the declarations of a namespace.
    #[must_use]
    pub fn get(&self, namespace: &str) -> Option<&SchemaRecords> {
        self.namespaces.get(namespace)
    }

    /// Returns the number of namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Returns true if no namespace has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

/// One parsed EDMX document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// EDMX version attribute.
    pub version: Option<String>,
    /// Schemas found under `DataServices`.
    pub schemas: Vec<SchemaRecords>,
}

/// Declarations of a single namespace.
#[derive(Debug, Clone, Default)]
pub struct SchemaRecords {
    /// Namespace name.
    pub namespace: String,
    /// Namespace alias, if declared.
    pub alias: Option<String>,
    /// Entity type declarations.
    pub entity_types: Vec<EntityTypeDecl>,
    /// Complex type declarations.
    pub complex_types: Vec<ComplexTypeDecl>,
    /// Enumeration declarations.
    pub enum_types: Vec<EnumTypeDecl>,
    /// Type definition (alias) declarations.
    pub type_definitions: Vec<TypeDefinitionDecl>,
}

impl SchemaRecords {
    /// Creates an empty namespace record.
    #[must_use]
    pub fn new(namespace: String) -> Self {
        Self {
            namespace,
            ..Self::default()
        }
    }

    /// Appends the declarations of another record of the same namespace.
    pub fn extend(&mut self, other: Self) {
        if self.alias.is_none() {
            self.alias = other.alias;
        }
        self.entity_types.extend(other.entity_types);
        self.complex_types.extend(other.complex_types);
        self.enum_types.extend(other.enum_types);
        self.type_definitions.extend(other.type_definitions);
    }

    /// Returns the total number of declarations.
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.entity_types.len()
            + self.complex_types.len()
            + self.enum_types.len()
            + self.type_definitions.len()
    }
}

/// Entity type declaration.
#[derive(Debug, Clone, Default)]
pub struct EntityTypeDecl {
    /// Type name.
    pub name: String,
    /// Qualified base type name.
    pub base_type: Option<String>,
    /// Abstract flag.
    pub is_abstract: bool,
    /// Open type flag.
    pub open_type: bool,
    /// Media entity flag.
    pub has_stream: bool,
    /// Key property references, kept as-is.
    pub key: Vec<String>,
    /// Structural properties in declaration order.
    pub properties: Vec<PropertyDecl>,
    /// Navigation properties in declaration order.
    pub navigation_properties: Vec<NavigationPropertyDecl>,
    /// Annotations in declaration order.
    pub annotations: Vec<Annotation>,
}

impl EntityTypeDecl {
    /// Creates an entity type declaration with no members.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Complex type declaration.
#[derive(Debug, Clone, Default)]
pub struct ComplexTypeDecl {
    /// Type name.
    pub name: String,
    /// Qualified base type name.
    pub base_type: Option<String>,
    /// Abstract flag.
    pub is_abstract: bool,
    /// Open type flag.
    pub open_type: bool,
    /// Structural properties in declaration order.
    pub properties: Vec<PropertyDecl>,
    /// Navigation properties in declaration order.
    pub navigation_properties: Vec<NavigationPropertyDecl>,
    /// Annotations in declaration order.
    pub annotations: Vec<Annotation>,
}

impl ComplexTypeDecl {
    /// Creates a complex type declaration with no members.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Structural property declaration.
#[derive(Debug, Clone, Default)]
pub struct PropertyDecl {
    /// Property name.
    pub name: String,
    /// Declared type reference, possibly `Collection(...)`.
    pub type_name: String,
    /// Explicit nullability, `None` when unspecified.
    pub nullable: Option<bool>,
    /// Annotations in declaration order.
    pub annotations: Vec<Annotation>,
}

impl PropertyDecl {
    /// Creates a property declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Sets explicit nullability.
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }
}

/// Navigation property declaration.
#[derive(Debug, Clone, Default)]
pub struct NavigationPropertyDecl {
    /// Property name.
    pub name: String,
    /// Declared type reference, possibly `Collection(...)`.
    pub type_name: String,
    /// Explicit nullability, `None` when unspecified.
    pub nullable: Option<bool>,
    /// Partner navigation property.
    pub partner: Option<String>,
    /// Containment flag.
    pub contains_target: bool,
    /// Annotations in declaration order.
    pub annotations: Vec<Annotation>,
}

impl NavigationPropertyDecl {
    /// Creates a navigation property declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }
}

/// Enumeration declaration.
#[derive(Debug, Clone, Default)]
pub struct EnumTypeDecl {
    /// Type name.
    pub name: String,
    /// Underlying integer type, if declared.
    pub underlying_type: Option<String>,
    /// Flags enumeration.
    pub is_flags: bool,
    /// Members in declaration order.
    pub members: Vec<EnumMemberDecl>,
    /// Annotations in declaration order.
    pub annotations: Vec<Annotation>,
}

impl EnumTypeDecl {
    /// Creates an enumeration declaration with no members.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Enumeration member declaration.
#[derive(Debug, Clone, Default)]
pub struct EnumMemberDecl {
    /// Member name.
    pub name: String,
    /// Literal value, if declared.
    pub value: Option<String>,
}

/// Type definition declaration.
#[derive(Debug, Clone, Default)]
pub struct TypeDefinitionDecl {
    /// Alias name.
    pub name: String,
    /// Underlying type name.
    pub underlying_type: String,
}

/// Annotation attached to a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Term name, e.g. `OData.AdditionalProperties`.
    pub term: String,
    /// Qualifier, if any.
    pub qualifier: Option<String>,
    /// Inline literal value.
    pub value: AnnotationValue,
}

impl Annotation {
    /// Creates an annotation.
    #[must_use]
    pub fn new(term: impl Into<String>, value: AnnotationValue) -> Self {
        Self {
            term: term.into(),
            qualifier: None,
            value,
        }
    }

    /// Returns the boolean value, if this is a boolean annotation.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self.value {
            AnnotationValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

/// Inline annotation literal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnnotationValue {
    /// No inline literal (value given as a child expression or absent).
    #[default]
    None,
    /// `String` attribute.
    String(String),
    /// `Bool` attribute.
    Bool(bool),
    /// `Int` attribute.
    Int(i64),
    /// `Decimal` attribute.
    Decimal(f64),
    /// `EnumMember` attribute.
    EnumMember(String),
}
