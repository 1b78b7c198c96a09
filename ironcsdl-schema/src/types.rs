//! Abstract type model records.
//!
//! A [`Type`] is the resolution engine's view of one entity type, complex type
//! or enumeration. Records are built from raw declarations, mutated in place
//! while folding, and read-only afterwards.

use std::collections::BTreeMap;

/// Literal prefix of a collection-wrapped type reference.
pub const COLLECTION_PREFIX: &str = "Collection(";

/// Abstract schema type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Type {
    /// Type name.
    pub name: String,
    /// Owning namespace, e.g. `Chassis.v1_0_0`.
    pub namespace: String,
    /// Qualified base type name, empty when the type has no base.
    pub base_type: String,
    /// Properties keyed by name.
    pub properties: BTreeMap<String, PropertyType>,
    /// Enumeration members in declaration order.
    pub members: Vec<EnumMember>,
    /// Complex (embeddable) rather than entity (addressable) type.
    pub is_complex: bool,
    /// Open type accepting arbitrary dynamically named properties.
    pub is_wildcard: bool,
}

impl Type {
    /// Creates an entity type record.
    #[must_use]
    pub fn entity(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Creates a complex type record.
    #[must_use]
    pub fn complex(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            is_complex: true,
            ..Self::entity(namespace, name)
        }
    }

    /// Sets the base type.
    #[must_use]
    pub fn with_base(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = base_type.into();
        self
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, property: PropertyType) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    /// Returns the qualified name `namespace.name`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }

    /// Returns true if this record describes an enumeration.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        !self.members.is_empty()
    }

    /// Returns true if the base chain has been fully merged.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.base_type.is_empty()
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyType> {
        self.properties.get(name)
    }

    /// Looks up an enumeration member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Copies every property of `base` that this type does not declare.
    ///
    /// Returns the number of properties added.
    pub fn inherit_from(&mut self, base: &Self) -> usize {
        let mut added = 0;
        for (name, property) in &base.properties {
            if !self.properties.contains_key(name) {
                self.properties.insert(name.clone(), property.clone());
                added += 1;
            }
        }
        added
    }
}

/// Property of a [`Type`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyType {
    /// Declared type reference, qualified or primitive, possibly
    /// `Collection(...)`.
    pub declared_type: String,
    /// Reference to another addressable entity.
    pub is_navigation: bool,
    /// Value may be null.
    pub is_nullable: bool,
    /// Serialized field name override.
    pub json_name: Option<String>,
}

impl PropertyType {
    /// Creates a nullable structural property.
    #[must_use]
    pub fn new(declared_type: impl Into<String>) -> Self {
        Self {
            declared_type: declared_type.into(),
            is_navigation: false,
            is_nullable: true,
            json_name: None,
        }
    }

    /// Creates a nullable navigation property.
    #[must_use]
    pub fn navigation(declared_type: impl Into<String>) -> Self {
        Self {
            is_navigation: true,
            ..Self::new(declared_type)
        }
    }

    /// Sets nullability.
    #[must_use]
    pub fn nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    /// Sets the serialized name override.
    #[must_use]
    pub fn json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = Some(json_name.into());
        self
    }

    /// Returns true if the declared type is collection-wrapped.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        unwrap_collection(&self.declared_type).1
    }
}

/// Enumeration member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Member name.
    pub name: String,
    /// Literal value, if declared.
    pub value: Option<String>,
}

impl EnumMember {
    /// Creates a member without an explicit value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Returns the literal value as an integer, if it is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_deref().and_then(|v| v.parse().ok())
    }
}

/// Joins a namespace and a type name into a qualified name.
#[must_use]
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        return name.to_string();
    }
    format!("{namespace}.{name}")
}

/// Strips a `Collection(...)` wrapper.
///
/// Returns the inner type name and whether a wrapper was present.
#[must_use]
pub fn unwrap_collection(declared: &str) -> (&str, bool) {
    match declared.strip_prefix(COLLECTION_PREFIX) {
        Some(inner) => (inner.strip_suffix(')').unwrap_or(inner), true),
        None => (declared, false),
    }
}
