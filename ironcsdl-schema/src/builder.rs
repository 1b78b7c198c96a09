//! Type model builder.
//!
//! Converts raw declarations into [`Type`] records. Nothing is validated here:
//! partially specified declarations are accepted as-is and repaired or
//! rejected while folding.

use crate::model::{AliasTable, TypeModel};
use crate::records::{
    Annotation, ComplexTypeDecl, EntityTypeDecl, EnumTypeDecl, NavigationPropertyDecl,
    PropertyDecl, RecordSet,
};
use crate::types::{EnumMember, PropertyType, Type, qualify};

/// Annotation term suffix marking dynamically named properties.
pub const DYNAMIC_PROPERTY_PATTERNS: &str = "DynamicPropertyPatterns";

/// Annotation term allowing additional properties when set to true.
pub const ADDITIONAL_PROPERTIES: &str = "OData.AdditionalProperties";

impl TypeModel {
    /// Builds the unfolded type model and the alias table from raw records.
    #[must_use]
    pub fn build(records: &RecordSet) -> (Self, AliasTable) {
        let mut model = Self::new();
        let mut aliases = AliasTable::new();

        for (namespace, schema) in &records.namespaces {
            for decl in &schema.entity_types {
                model.insert(Type::from_entity_type(decl, namespace));
            }
            for decl in &schema.enum_types {
                model.insert(Type::from_enum_type(decl, namespace));
            }
            for decl in &schema.complex_types {
                model.insert(Type::from_complex_type(decl, namespace));
            }
            for decl in &schema.type_definitions {
                aliases.insert(qualify(namespace, &decl.name), decl.underlying_type.clone());
            }
        }

        tracing::debug!(
            "built type model: {} types, {} aliases from {} namespaces",
            model.len(),
            aliases.len(),
            records.len()
        );

        (model, aliases)
    }
}

impl Type {
    /// Creates an entity type record from its declaration.
    #[must_use]
    pub fn from_entity_type(decl: &EntityTypeDecl, namespace: &str) -> Self {
        let mut ty = Self::entity(namespace, &decl.name);
        ty.base_type = decl.base_type.clone().unwrap_or_default();
        add_properties(&mut ty, &decl.properties, &decl.navigation_properties);
        ty
    }

    /// Creates a complex type record from its declaration.
    ///
    /// A complex type without properties is a wildcard when it is annotated
    /// with dynamic property patterns or allows additional properties.
    #[must_use]
    pub fn from_complex_type(decl: &ComplexTypeDecl, namespace: &str) -> Self {
        let mut ty = Self::complex(namespace, &decl.name);
        ty.base_type = decl.base_type.clone().unwrap_or_default();
        add_properties(&mut ty, &decl.properties, &decl.navigation_properties);
        if ty.properties.is_empty() {
            ty.is_wildcard = decl.annotations.iter().any(marks_wildcard);
        }
        ty
    }

    /// Creates an enumeration record from its declaration.
    #[must_use]
    pub fn from_enum_type(decl: &EnumTypeDecl, namespace: &str) -> Self {
        let mut ty = Self::entity(namespace, &decl.name);
        for member in &decl.members {
            if ty.member(&member.name).is_some() {
                continue;
            }
            ty.members.push(EnumMember {
                name: member.name.clone(),
                value: member.value.clone(),
            });
        }
        ty
    }
}

fn add_properties(ty: &mut Type, properties: &[PropertyDecl], navigation: &[NavigationPropertyDecl]) {
    for p in properties {
        let property = PropertyType::new(&p.type_name).nullable(p.nullable.unwrap_or(true));
        ty.properties.insert(p.name.clone(), property);
    }
    for p in navigation {
        let property = PropertyType::navigation(&p.type_name).nullable(p.nullable.unwrap_or(true));
        ty.properties.insert(p.name.clone(), property);
    }
}

fn marks_wildcard(annotation: &Annotation) -> bool {
    annotation.term.ends_with(DYNAMIC_PROPERTY_PATTERNS)
        || (annotation.term == ADDITIONAL_PROPERTIES && annotation.as_bool() == Some(true))
}
