//! Property type resolution.
//!
//! Maps a declared type reference to a primitive, a well-known shared shape,
//! an open-ended map, or a type in the folded model.

use crate::model::{AliasTable, TypeModel};
use crate::types::{Type, unwrap_collection};
use crate::version::{compare_qualified, unversioned};

/// Suffix of vendor action containers, resolved to an open map.
pub const OEM_ACTIONS_SUFFIX: &str = "OemActions";

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Boolean.
    Bool,
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// UTF-8 string.
    String,
    /// Calendar date.
    Date,
    /// Timestamp with offset.
    DateTimeOffset,
    /// ISO 8601 duration.
    Duration,
    /// UUID.
    Uuid,
}

impl Primitive {
    /// Returns the Rust type name used in generated code.
    #[must_use]
    pub const fn rust_type(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "String",
            Self::Date => "Date",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Duration => "Duration",
            Self::Uuid => "Uuid",
        }
    }
}

/// Well-known shapes emitted once and shared by every schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharedShape {
    /// `Resource.Status`.
    ResourceStatus,
    /// `Resource.PowerState`.
    ResourcePowerState,
}

impl SharedShape {
    /// Returns the Rust type name used in generated code.
    #[must_use]
    pub const fn rust_type(&self) -> &'static str {
        match self {
            Self::ResourceStatus => "ResourceStatus",
            Self::ResourcePowerState => "ResourcePowerState",
        }
    }
}

/// Resolution target of a type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// Primitive value.
    Primitive(Primitive),
    /// Shared shape.
    Shared(SharedShape),
    /// Open-ended object map.
    OpenMap,
    /// Type in the folded model, by qualified name.
    Model(String),
    /// Untyped value.
    Opaque,
}

/// Resolved type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Resolved target.
    pub target: Target,
    /// Declared as `Collection(...)`.
    pub collection: bool,
}

impl TypeRef {
    /// Returns true if the target is untyped.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.target == Target::Opaque
    }
}

/// Resolves type references against a folded model.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    model: &'a TypeModel,
    aliases: &'a AliasTable,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over a folded model.
    #[must_use]
    pub fn new(model: &'a TypeModel, aliases: &'a AliasTable) -> Self {
        Self { model, aliases }
    }

    /// Returns the underlying model.
    #[must_use]
    pub fn model(&self) -> &'a TypeModel {
        self.model
    }

    /// Returns the alias table.
    #[must_use]
    pub fn aliases(&self) -> &'a AliasTable {
        self.aliases
    }

    /// Resolves a declared type reference.
    ///
    /// An unresolvable reference degrades to [`Target::Opaque`] and is logged.
    #[must_use]
    pub fn resolve(&self, declared: &str) -> TypeRef {
        let (inner, collection) = unwrap_collection(declared);
        let inner = self.aliases.substitute(inner);
        TypeRef {
            target: self.resolve_target(inner),
            collection,
        }
    }

    fn resolve_target(&self, name: &str) -> Target {
        if name.ends_with(OEM_ACTIONS_SUFFIX) {
            return Target::OpenMap;
        }
        if let Some(target) = builtin_target(name) {
            return target;
        }
        match self.lookup(name) {
            Some(ty) if ty.is_wildcard => Target::OpenMap,
            Some(ty) => Target::Model(ty.qualified_name()),
            None => {
                tracing::warn!("unknown type reference: {name}");
                Target::Opaque
            }
        }
    }

    /// Looks up a type by qualified name, falling back to any version of the
    /// same vendor and bare name.
    ///
    /// When several versions match, the newest one wins.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&'a Type> {
        if let Some(ty) = self.model.get(name) {
            return Some(ty);
        }
        let wanted = unversioned(name);
        self.model
            .iter()
            .filter(|(candidate, _)| unversioned(candidate) == wanted)
            .max_by(|a, b| compare_qualified(a.0, b.0))
            .map(|(_, ty)| ty)
    }
}

/// Maps primitive and shared shape names to their fixed targets.
#[must_use]
pub fn builtin_target(name: &str) -> Option<Target> {
    let primitive = match name {
        "Edm.Boolean" => Primitive::Bool,
        "Edm.Byte" => Primitive::U8,
        "Edm.Date" => Primitive::Date,
        "Edm.DateTimeOffset" => Primitive::DateTimeOffset,
        "Edm.Decimal" | "Edm.Double" => Primitive::F64,
        "Edm.Duration" => Primitive::Duration,
        "Edm.Int16" => Primitive::I16,
        "Edm.Int32" => Primitive::I32,
        "Edm.Int64" => Primitive::I64,
        "Edm.SByte" => Primitive::I8,
        "Edm.Single" => Primitive::F32,
        "Edm.String" | "Resource.Description" | "Resource.Name" => Primitive::String,
        "Edm.Guid" | "Resource.UUID" => Primitive::Uuid,
        "Edm.PrimitiveType" => return Some(Target::Opaque),
        "Resource.Oem" => return Some(Target::OpenMap),
        "Resource.Status" => return Some(Target::Shared(SharedShape::ResourceStatus)),
        "Resource.PowerState" => return Some(Target::Shared(SharedShape::ResourcePowerState)),
        _ => return None,
    };
    Some(Target::Primitive(primitive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropertyType;

    fn model() -> TypeModel {
        let mut attributes = Type::complex("Bios.v1_0_0", "Attributes");
        attributes.is_wildcard = true;
        [
            Type::entity("Widget.v1_0_0", "Widget")
                .with_property("Size", PropertyType::new("Edm.Int64")),
            Type::entity("Widget.v2_3_1", "Widget")
                .with_property("Size", PropertyType::new("Edm.Int64")),
            Type::complex("Gadget.v2_3_1", "Part"),
            attributes,
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_primitive_table() {
        let model = TypeModel::new();
        let aliases = AliasTable::new();
        let resolver = Resolver::new(&model, &aliases);

        let cases = [
            ("Edm.Boolean", Target::Primitive(Primitive::Bool)),
            ("Edm.Byte", Target::Primitive(Primitive::U8)),
            ("Edm.SByte", Target::Primitive(Primitive::I8)),
            ("Edm.Decimal", Target::Primitive(Primitive::F64)),
            ("Edm.Single", Target::Primitive(Primitive::F32)),
            ("Edm.Int32", Target::Primitive(Primitive::I32)),
            ("Resource.UUID", Target::Primitive(Primitive::Uuid)),
            ("Resource.Name", Target::Primitive(Primitive::String)),
            ("Edm.PrimitiveType", Target::Opaque),
            ("Resource.Oem", Target::OpenMap),
            ("Resource.Status", Target::Shared(SharedShape::ResourceStatus)),
            ("Chassis.v1_0_0.OemActions", Target::OpenMap),
        ];
        for (declared, expected) in cases {
            assert_eq!(resolver.resolve(declared).target, expected, "{declared}");
        }
    }

    #[test]
    fn test_collection_wrapping_round_trips() {
        let model = model();
        let aliases = AliasTable::new();
        let resolver = Resolver::new(&model, &aliases);

        for inner in ["Edm.String", "Widget.v1_0_0.Widget", "Gadget.Part", "Nope.Nothing"] {
            let plain = resolver.resolve(inner);
            let wrapped = resolver.resolve(&format!("Collection({inner})"));
            assert!(!plain.collection);
            assert!(wrapped.collection);
            assert_eq!(plain.target, wrapped.target);
        }
    }

    #[test]
    fn test_exact_lookup() {
        let model = model();
        let aliases = AliasTable::new();
        let resolver = Resolver::new(&model, &aliases);
        assert_eq!(
            resolver.resolve("Widget.v1_0_0.Widget").target,
            Target::Model("Widget.v1_0_0.Widget".to_string())
        );
    }

    #[test]
    fn test_version_insensitive_fallback() {
        let model = model();
        let aliases = AliasTable::new();
        let resolver = Resolver::new(&model, &aliases);

        let old = resolver.resolve("Gadget.v1_0_0.Part");
        let new = resolver.resolve("Gadget.v2_3_1.Part");
        assert_eq!(old, new);
        assert_eq!(old.target, Target::Model("Gadget.v2_3_1.Part".to_string()));
        assert_eq!(
            resolver.resolve("Gadget.Part").target,
            Target::Model("Gadget.v2_3_1.Part".to_string())
        );
    }

    #[test]
    fn test_fallback_prefers_newest() {
        let model = model();
        let aliases = AliasTable::new();
        let resolver = Resolver::new(&model, &aliases);
        assert_eq!(
            resolver.resolve("Widget.Widget").target,
            Target::Model("Widget.v2_3_1.Widget".to_string())
        );
    }

    #[test]
    fn test_alias_substitution_inside_collection() {
        let model = model();
        let aliases: AliasTable = [("Widget.Tag", "Edm.String")].into_iter().collect();
        let resolver = Resolver::new(&model, &aliases);

        let resolved = resolver.resolve("Collection(Widget.Tag)");
        assert!(resolved.collection);
        assert_eq!(resolved.target, Target::Primitive(Primitive::String));
    }

    #[test]
    fn test_wildcard_resolves_to_open_map() {
        let model = model();
        let aliases = AliasTable::new();
        let resolver = Resolver::new(&model, &aliases);
        assert_eq!(resolver.resolve("Bios.v1_0_0.Attributes").target, Target::OpenMap);
    }

    #[test]
    fn test_unknown_is_opaque() {
        let model = model();
        let aliases = AliasTable::new();
        let resolver = Resolver::new(&model, &aliases);
        assert!(resolver.resolve("Missing.v1_0_0.Thing").is_opaque());
    }
}
