//! Declaration planning.
//!
//! Turns each folded [`Type`] into a [`TypeDecl`]: the declaration kind, the
//! ordered field list with resolved field types and serde hints, or the
//! enumeration members. Renderers consume only these plans.

use crate::error::CodegenError;
use crate::naming::{field_name, to_pascal_case, type_name, unraw};
use ironcsdl_schema::resolve::OEM_ACTIONS_SUFFIX;
use ironcsdl_schema::version::compare_qualified;
use ironcsdl_schema::{Primitive, PropertyType, Resolver, SharedShape, Target, Type};
use std::collections::{BTreeMap, BTreeSet};

/// Name of the entity identity field.
pub const ODATA_ID: &str = "@odata.id";
/// Name of the type discriminator field.
pub const ODATA_TYPE: &str = "@odata.type";
/// Name of the context URL field.
pub const ODATA_CONTEXT: &str = "@odata.context";

/// Bare name of the polymorphic item shape, skipped on emission.
const ITEM_OR_COLLECTION: &str = "ItemOrCollection";

/// Planned declaration for one type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    /// Struct with fields.
    Struct(StructDecl),
    /// Enumeration.
    Enum(EnumDecl),
    /// Intentionally empty declaration, nothing is emitted.
    Empty,
}

impl TypeDecl {
    /// Returns the Rust type name, if anything is emitted.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Struct(s) => Some(&s.name),
            Self::Enum(e) => Some(&e.name),
            Self::Empty => None,
        }
    }
}

/// Planned struct.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    /// Rust type name.
    pub name: String,
    /// Qualified name of the source type.
    pub qualified_name: String,
    /// Fields in emission order.
    pub fields: Vec<FieldDecl>,
}

impl StructDecl {
    /// Looks up a field by its serialized name.
    #[must_use]
    pub fn field(&self, json_name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.json_name == json_name)
    }
}

/// Value type of a field, before wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Primitive value.
    Primitive(Primitive),
    /// Shared shape.
    Shared(SharedShape),
    /// Generated type, by Rust name.
    Named(String),
    /// Reference to another entity.
    OdataId,
    /// Action map.
    Actions,
    /// Open-ended object map.
    OpenMap,
    /// Untyped JSON value.
    Opaque,
}

impl FieldType {
    /// Returns the Rust type name.
    #[must_use]
    pub fn rust_type(&self) -> String {
        match self {
            Self::Primitive(p) => p.rust_type().to_string(),
            Self::Shared(s) => s.rust_type().to_string(),
            Self::Named(name) => name.clone(),
            Self::OdataId => "OdataId".to_string(),
            Self::Actions => "BTreeMap<String, Action>".to_string(),
            Self::OpenMap => "OpenMap".to_string(),
            Self::Opaque => "serde_json::Value".to_string(),
        }
    }

    /// Returns true if the type has its own empty value and is never
    /// wrapped in `Option`.
    #[must_use]
    pub fn has_empty_value(&self) -> bool {
        matches!(self, Self::Actions | Self::OpenMap | Self::Opaque)
    }
}

/// Wrapping applied around a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapping {
    /// Bare value.
    Required,
    /// `Option<T>`.
    Optional,
    /// `Vec<T>`.
    Collection,
}

/// Planned struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Rust field identifier.
    pub name: String,
    /// Serialized name.
    pub json_name: String,
    /// Value type.
    pub ty: FieldType,
    /// Wrapping around the value type.
    pub wrapping: Wrapping,
    /// Value type can contain the enclosing struct and must be boxed.
    pub boxed: bool,
    /// Omitted when empty on serialization and defaulted when absent.
    pub omit_if_empty: bool,
}

impl FieldDecl {
    /// Returns the full Rust type of the field.
    #[must_use]
    pub fn rust_type(&self) -> String {
        let inner = if self.boxed {
            format!("Box<{}>", self.ty.rust_type())
        } else {
            self.ty.rust_type()
        };
        match self.wrapping {
            Wrapping::Required => inner,
            Wrapping::Optional => format!("Option<{inner}>"),
            Wrapping::Collection => format!("Vec<{inner}>"),
        }
    }

    /// Returns the emptiness predicate for `skip_serializing_if`.
    #[must_use]
    pub fn skip_predicate(&self) -> Option<&'static str> {
        if !self.omit_if_empty {
            return None;
        }
        Some(match (self.wrapping, &self.ty) {
            (Wrapping::Collection, _) => "Vec::is_empty",
            (Wrapping::Optional, _) => "Option::is_none",
            (Wrapping::Required, FieldType::Opaque) => "serde_json::Value::is_null",
            (Wrapping::Required, FieldType::Actions | FieldType::OpenMap) => "BTreeMap::is_empty",
            (Wrapping::Required, _) => return None,
        })
    }

    /// Returns true if the serialized name differs from the identifier.
    #[must_use]
    pub fn needs_rename(&self) -> bool {
        unraw(&self.name) != self.json_name
    }
}

/// Planned enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    /// Rust type name.
    pub name: String,
    /// Qualified name of the source type.
    pub qualified_name: String,
    /// Members in declaration order.
    pub members: Vec<VariantDecl>,
}

impl EnumDecl {
    /// Returns the integer discriminants if every member declares one.
    #[must_use]
    pub fn discriminants(&self) -> Option<Vec<i64>> {
        self.members.iter().map(|m| m.value).collect()
    }
}

/// Planned enumeration variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDecl {
    /// Rust variant identifier.
    pub name: String,
    /// Serialized member name.
    pub json_name: String,
    /// Integer value, if declared.
    pub value: Option<i64>,
}

/// Plans the declaration for a folded type.
///
/// # Arguments
/// * `ty` - Folded type
/// * `resolver` - Resolver over the folded model
///
/// # Errors
/// Returns [`CodegenError::UnrecognizedShape`] if the type has neither
/// properties nor members and is not a known empty shape.
pub fn plan_type(ty: &Type, resolver: &Resolver<'_>) -> Result<TypeDecl, CodegenError> {
    if !ty.properties.is_empty() {
        return Ok(TypeDecl::Struct(plan_struct(ty, ty, resolver)));
    }
    if ty.is_enum() {
        return Ok(TypeDecl::Enum(plan_enum(ty)));
    }
    if is_empty_shape(ty) {
        return Ok(TypeDecl::Empty);
    }
    if !ty.namespace.contains('.') {
        if let Some(sibling) = newest_sibling(ty, resolver) {
            tracing::debug!(
                "{} planned from {}",
                ty.qualified_name(),
                sibling.qualified_name()
            );
            return Ok(TypeDecl::Struct(plan_struct(ty, sibling, resolver)));
        }
    }
    Err(CodegenError::unrecognized(ty.qualified_name()))
}

/// Returns true for shapes that are intentionally emitted as nothing.
#[must_use]
pub fn is_empty_shape(ty: &Type) -> bool {
    ty.name.ends_with(OEM_ACTIONS_SUFFIX) || ty.name == ITEM_OR_COLLECTION || ty.is_wildcard
}

fn newest_sibling<'a>(ty: &Type, resolver: &Resolver<'a>) -> Option<&'a Type> {
    let prefix = format!("{}.", ty.namespace);
    resolver
        .model()
        .iter()
        .filter(|(name, t)| {
            name.starts_with(&prefix) && t.name == ty.name && !t.properties.is_empty()
        })
        .max_by(|a, b| compare_qualified(a.0, b.0))
        .map(|(_, t)| t)
}

/// Plans a struct named after `ty` with the properties of `source`.
fn plan_struct(ty: &Type, source: &Type, resolver: &Resolver<'_>) -> StructDecl {
    let mut plan = StructPlan::new(ty, resolver);
    let mut remaining: Vec<&str> = source.properties.keys().map(String::as_str).collect();

    if !ty.is_complex {
        plan.push(FieldDecl {
            name: "odata_id".to_string(),
            json_name: ODATA_ID.to_string(),
            ty: FieldType::Primitive(Primitive::String),
            wrapping: Wrapping::Required,
            boxed: false,
            omit_if_empty: false,
        });
        plan.take_property(source, "Id", &mut remaining);
    }
    for (name, json_name) in [("odata_type", ODATA_TYPE), ("odata_context", ODATA_CONTEXT)] {
        plan.push(FieldDecl {
            name: name.to_string(),
            json_name: json_name.to_string(),
            ty: FieldType::Primitive(Primitive::String),
            wrapping: Wrapping::Optional,
            boxed: false,
            omit_if_empty: true,
        });
    }
    plan.take_property(source, "Name", &mut remaining);
    plan.take_property(source, "Description", &mut remaining);

    for name in remaining {
        if let Some(property) = source.property(name) {
            plan.add_property(name, property);
        }
    }

    StructDecl {
        name: type_name(ty),
        qualified_name: ty.qualified_name(),
        fields: plan.fields,
    }
}

/// Field list under construction, with identifier and serialized name
/// uniqueness.
struct StructPlan<'r, 'a> {
    resolver: &'r Resolver<'a>,
    self_name: String,
    fields: Vec<FieldDecl>,
    idents: BTreeSet<String>,
    json_names: BTreeSet<String>,
}

impl<'r, 'a> StructPlan<'r, 'a> {
    fn new(ty: &Type, resolver: &'r Resolver<'a>) -> Self {
        Self {
            resolver,
            self_name: type_name(ty),
            fields: Vec::new(),
            idents: BTreeSet::new(),
            json_names: BTreeSet::new(),
        }
    }

    fn push(&mut self, mut field: FieldDecl) {
        if !self.json_names.insert(field.json_name.clone()) {
            tracing::debug!(
                "{}: dropping duplicate serialized name {}",
                self.self_name,
                field.json_name
            );
            return;
        }
        let base = field.name.clone();
        let mut n = 1;
        while !self.idents.insert(field.name.clone()) {
            n += 1;
            field.name = format!("{}_{n}", unraw(&base));
        }
        self.fields.push(field);
    }

    fn take_property(&mut self, source: &Type, name: &str, remaining: &mut Vec<&str>) {
        if let Some(property) = source.property(name) {
            self.add_property(name, property);
            remaining.retain(|r| *r != name);
        }
    }

    fn add_property(&mut self, name: &str, property: &PropertyType) {
        let field = plan_field(name, property, self.resolver, &self.self_name);
        self.push(field);
    }
}

/// Plans a single field.
fn plan_field(
    name: &str,
    property: &PropertyType,
    resolver: &Resolver<'_>,
    self_name: &str,
) -> FieldDecl {
    let json_name = property
        .json_name
        .clone()
        .unwrap_or_else(|| name.to_string());
    let ident = field_name(name);

    match name {
        "Actions" => {
            return FieldDecl {
                name: ident,
                json_name,
                ty: FieldType::Actions,
                wrapping: Wrapping::Required,
                boxed: false,
                omit_if_empty: true,
            };
        }
        "Oem" => {
            return FieldDecl {
                name: ident,
                json_name,
                ty: FieldType::OpenMap,
                wrapping: Wrapping::Required,
                boxed: false,
                omit_if_empty: true,
            };
        }
        _ => {}
    }

    let (ty, collection) = if property.is_navigation {
        (FieldType::OdataId, property.is_collection())
    } else {
        let type_ref = resolver.resolve(&property.declared_type);
        (field_type(&type_ref.target, resolver), type_ref.collection)
    };

    let wrapping = if collection {
        Wrapping::Collection
    } else if property.is_nullable && !ty.has_empty_value() {
        Wrapping::Optional
    } else {
        Wrapping::Required
    };
    let boxed = !collection && matches!(&ty, FieldType::Named(n) if n == self_name);
    let omit_if_empty = property.is_nullable
        || property.is_navigation
        || collection
        || ty.has_empty_value();

    FieldDecl {
        name: ident,
        json_name,
        ty,
        wrapping,
        boxed,
        omit_if_empty,
    }
}

/// Boxes every inline field whose value type can reach back to the
/// enclosing struct.
///
/// Only struct-valued fields outside a `Vec` count as edges, since a `Vec`
/// already breaks the cycle. Decls from every output module must be passed
/// together for cycles across modules to be found.
pub fn box_recursive_fields<'d>(decls: impl IntoIterator<Item = &'d mut TypeDecl>) {
    let mut structs: Vec<&mut StructDecl> = decls
        .into_iter()
        .filter_map(|decl| match decl {
            TypeDecl::Struct(s) => Some(s),
            _ => None,
        })
        .collect();

    let edges: BTreeMap<String, BTreeSet<String>> = structs
        .iter()
        .map(|s| {
            let targets = s.fields.iter().filter_map(inline_target);
            (s.name.clone(), targets.map(str::to_string).collect())
        })
        .collect();

    for decl in &mut structs {
        let name = decl.name.clone();
        for field in &mut decl.fields {
            if inline_target(field).is_some_and(|target| reaches(&edges, target, &name)) {
                if !field.boxed {
                    tracing::debug!("{name}: boxing recursive field {}", field.json_name);
                }
                field.boxed = true;
            }
        }
    }
}

fn inline_target(field: &FieldDecl) -> Option<&str> {
    match (&field.ty, field.wrapping) {
        (_, Wrapping::Collection) => None,
        (FieldType::Named(name), _) => Some(name),
        _ => None,
    }
}

fn reaches(edges: &BTreeMap<String, BTreeSet<String>>, from: &str, to: &str) -> bool {
    let mut visited = BTreeSet::new();
    let mut stack = vec![from];
    while let Some(name) = stack.pop() {
        if name == to {
            return true;
        }
        if !visited.insert(name) {
            continue;
        }
        if let Some(next) = edges.get(name) {
            stack.extend(next.iter().map(String::as_str));
        }
    }
    false
}

fn field_type(target: &Target, resolver: &Resolver<'_>) -> FieldType {
    match target {
        Target::Primitive(p) => FieldType::Primitive(*p),
        Target::Shared(s) => FieldType::Shared(*s),
        Target::OpenMap => FieldType::OpenMap,
        Target::Opaque => FieldType::Opaque,
        Target::Model(qualified) => match resolver.model().get(qualified) {
            Some(ty) if !is_empty_shape(ty) => FieldType::Named(type_name(ty)),
            _ => FieldType::Opaque,
        },
    }
}

fn plan_enum(ty: &Type) -> EnumDecl {
    let mut seen = BTreeSet::new();
    let members = ty
        .members
        .iter()
        .map(|member| {
            let mut name = to_pascal_case(&member.name);
            if name.starts_with(|c: char| c.is_ascii_digit()) {
                name.insert(0, 'V');
            }
            if name == "Self" {
                name.push('_');
            }
            let base = name.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                n += 1;
                name = format!("{base}{n}");
            }
            VariantDecl {
                name,
                json_name: member.name.clone(),
                value: member.as_i64(),
            }
        })
        .collect();

    EnumDecl {
        name: type_name(ty),
        qualified_name: ty.qualified_name(),
        members,
    }
}
