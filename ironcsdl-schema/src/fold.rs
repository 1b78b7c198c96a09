//! Inheritance folding.
//!
//! Folding merges every property a type inherits into the type itself and
//! rewrites its base chain until the base is empty. Types whose chain ends in
//! an unknown base are deleted from the model.

use crate::error::SchemaError;
use crate::model::{AliasTable, FoldStatus, TypeModel};
use crate::types::{PropertyType, Type};

/// Legacy root resource base, synthesized when no document declares it.
pub const LEGACY_RESOURCE_ROOT: &str = "Resource.v1_0_0.Resource";

/// Links base, synthesized when no document declares it.
pub const LEGACY_LINKS: &str = "Resource.Links";

/// Outcome of a folding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldReport {
    /// Qualified names folded during this run, in fold order.
    pub folded: Vec<String>,
    /// Qualified names deleted because their base chain dead-ended.
    pub deleted: Vec<String>,
}

impl FoldReport {
    /// Returns true if no type was deleted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.deleted.is_empty()
    }
}

/// Folds every unfolded type in the model.
///
/// Names are sorted by namespace version and walked newest first, so a base
/// that sorts lower may already be folded when it is consulted.
///
/// # Arguments
/// * `model` - Unfolded type model, mutated in place
/// * `aliases` - Type definition aliases used to resolve base names
///
/// # Errors
/// Returns [`SchemaError::CircularReference`] if a base chain loops.
pub fn fold_model(model: &mut TypeModel, aliases: &AliasTable) -> Result<FoldReport, SchemaError> {
    let mut report = FoldReport::default();

    for name in model.sorted_names().into_iter().rev() {
        if model.status(&name) != Some(FoldStatus::Unfolded) {
            continue;
        }
        if fold_type(model, aliases, &name)?.is_some() {
            report.folded.push(name);
        } else {
            report.deleted.push(name);
        }
    }

    tracing::debug!(
        "folded {} types, deleted {}",
        report.folded.len(),
        report.deleted.len()
    );
    Ok(report)
}

/// Folds a single type and returns the folded record.
///
/// Folding an already folded type returns it unchanged. Returns `None` if the
/// type does not exist, was deleted earlier, or is deleted now because its
/// base chain ends in an unknown base.
///
/// # Errors
/// Returns [`SchemaError::CircularReference`] if the base chain loops.
pub fn fold_type<'m>(
    model: &'m mut TypeModel,
    aliases: &AliasTable,
    name: &str,
) -> Result<Option<&'m Type>, SchemaError> {
    match model.status(name) {
        None | Some(FoldStatus::Deleted) => return Ok(None),
        Some(FoldStatus::Folded) => return Ok(model.get(name)),
        Some(FoldStatus::Unfolded) => {}
    }

    let mut chain = vec![name.to_string()];
    loop {
        let Some(base_type) = model.get(name).map(|t| t.base_type.clone()) else {
            return Ok(None);
        };
        if base_type.is_empty() {
            break;
        }

        let Some(base_name) = resolve_base(model, aliases, &base_type) else {
            if !apply_dead_end(model, name, &base_type) {
                model.delete(name);
                tracing::debug!("deleted {name}: unknown base type {base_type}");
                return Ok(None);
            }
            break;
        };

        if chain.contains(&base_name) {
            return Err(SchemaError::circular(&chain, &base_name));
        }
        let Some(base) = model.get(&base_name).cloned() else {
            return Ok(None);
        };
        chain.push(base_name);

        if let Some(ty) = model.get_mut(name) {
            ty.inherit_from(&base);
            ty.base_type = base.base_type;
        }
    }

    model.set_status(name, FoldStatus::Folded);
    Ok(model.get(name))
}

fn resolve_base(model: &TypeModel, aliases: &AliasTable, base_type: &str) -> Option<String> {
    if model.contains(base_type) {
        return Some(base_type.to_string());
    }
    aliases
        .get(base_type)
        .filter(|aliased| model.contains(aliased))
        .map(str::to_string)
}

/// Properties synthesized for a well-known base that no document declares.
///
/// Returns `None` for any other base name.
#[must_use]
pub fn synthesized_properties(base_type: &str) -> Option<Vec<(&'static str, PropertyType)>> {
    match base_type {
        LEGACY_RESOURCE_ROOT => Some(vec![
            (
                "Id",
                PropertyType::new("Edm.String")
                    .nullable(false)
                    .json_name("@odata.id"),
            ),
            (
                "Type",
                PropertyType::new("Edm.String")
                    .nullable(false)
                    .json_name("@odata.type"),
            ),
            ("Name", PropertyType::new("Edm.String")),
            ("Description", PropertyType::new("Edm.String")),
        ]),
        LEGACY_LINKS => Some(vec![("Oem", PropertyType::new("Resource.Oem"))]),
        _ => None,
    }
}

/// Ends a chain at an undeclared base. Returns false if the base is unknown.
fn apply_dead_end(model: &mut TypeModel, name: &str, base_type: &str) -> bool {
    let Some(synthesized) = synthesized_properties(base_type) else {
        return false;
    };
    if let Some(ty) = model.get_mut(name) {
        for (property, property_type) in synthesized {
            ty.properties
                .entry(property.to_string())
                .or_insert(property_type);
        }
        ty.base_type.clear();
    }
    tracing::debug!("{name}: synthesized base {base_type}");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(declared: &str) -> PropertyType {
        PropertyType::new(declared)
    }

    fn chain_model() -> TypeModel {
        [
            Type::entity("Widget.v1_0_0", "Base")
                .with_property("Name", prop("Edm.String"))
                .with_property("Size", prop("Edm.Int64")),
            Type::entity("Widget.v1_1_0", "Middle")
                .with_base("Widget.v1_0_0.Base")
                .with_property("Size", prop("Edm.Int32"))
                .with_property("Color", prop("Edm.String")),
            Type::entity("Widget.v1_2_0", "Leaf")
                .with_base("Widget.v1_1_0.Middle")
                .with_property("Weight", prop("Edm.Double")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_fold_unions_ancestor_properties() {
        let mut model = chain_model();
        let report = fold_model(&mut model, &AliasTable::new()).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.folded.len(), 3);

        let leaf = model.get("Widget.v1_2_0.Leaf").unwrap();
        assert!(leaf.is_root());
        let names: Vec<&str> = leaf.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Color", "Name", "Size", "Weight"]);
        assert_eq!(leaf.property("Size").unwrap().declared_type, "Edm.Int32");
        assert_eq!(
            model.status("Widget.v1_2_0.Leaf"),
            Some(FoldStatus::Folded)
        );
    }

    #[test]
    fn test_fold_is_idempotent() {
        let mut model = chain_model();
        let aliases = AliasTable::new();
        let first = fold_type(&mut model, &aliases, "Widget.v1_2_0.Leaf")
            .unwrap()
            .cloned()
            .unwrap();
        let second = fold_type(&mut model, &aliases, "Widget.v1_2_0.Leaf")
            .unwrap()
            .cloned()
            .unwrap();
        assert_eq!(first, second);

        let before = model.clone();
        let report = fold_model(&mut model, &aliases).unwrap();
        assert!(!report.folded.contains(&"Widget.v1_2_0.Leaf".to_string()));
        assert_eq!(
            model.get("Widget.v1_2_0.Leaf"),
            before.get("Widget.v1_2_0.Leaf")
        );
    }

    #[test]
    fn test_legacy_root_synthesizes_four_properties() {
        let mut model: TypeModel = [Type::entity("Widget.v1_0_0", "Widget").with_base(LEGACY_RESOURCE_ROOT)]
            .into_iter()
            .collect();
        fold_model(&mut model, &AliasTable::new()).unwrap();

        let widget = model.get("Widget.v1_0_0.Widget").unwrap();
        assert!(widget.is_root());
        assert_eq!(widget.properties.len(), 4);

        let id = widget.property("Id").unwrap();
        assert!(!id.is_nullable);
        assert_eq!(id.json_name.as_deref(), Some("@odata.id"));
        let ty = widget.property("Type").unwrap();
        assert!(!ty.is_nullable);
        assert_eq!(ty.json_name.as_deref(), Some("@odata.type"));
        assert!(widget.property("Name").unwrap().is_nullable);
        assert!(widget.property("Description").unwrap().is_nullable);
    }

    #[test]
    fn test_legacy_root_keeps_own_declarations() {
        let mut model: TypeModel = [Type::entity("Widget.v1_0_0", "Widget")
            .with_base(LEGACY_RESOURCE_ROOT)
            .with_property("Name", prop("Edm.String").nullable(false))]
        .into_iter()
        .collect();
        fold_model(&mut model, &AliasTable::new()).unwrap();

        let widget = model.get("Widget.v1_0_0.Widget").unwrap();
        assert_eq!(widget.properties.len(), 4);
        assert!(!widget.property("Name").unwrap().is_nullable);
    }

    #[test]
    fn test_legacy_links() {
        let mut model: TypeModel = [Type::complex("Widget.v1_0_0", "Links").with_base(LEGACY_LINKS)]
            .into_iter()
            .collect();
        fold_model(&mut model, &AliasTable::new()).unwrap();

        let links = model.get("Widget.v1_0_0.Links").unwrap();
        assert_eq!(links.properties.len(), 1);
        assert_eq!(links.property("Oem").unwrap().declared_type, "Resource.Oem");
        assert!(links.property("Oem").unwrap().is_nullable);
    }

    #[test]
    fn test_unknown_base_deletes_type() {
        let mut model = chain_model();
        model.insert(Type::entity("Gadget.v1_0_0", "Gadget").with_base("Nowhere.v1_0_0.Base"));
        let report = fold_model(&mut model, &AliasTable::new()).unwrap();

        assert_eq!(report.deleted, vec!["Gadget.v1_0_0.Gadget".to_string()]);
        assert!(model.get("Gadget.v1_0_0.Gadget").is_none());
        assert_eq!(
            model.status("Gadget.v1_0_0.Gadget"),
            Some(FoldStatus::Deleted)
        );
        assert!(model.get("Widget.v1_2_0.Leaf").is_some());
        assert_eq!(
            fold_type(&mut model, &AliasTable::new(), "Gadget.v1_0_0.Gadget").unwrap(),
            None
        );
    }

    #[test]
    fn test_deletion_cascades_to_derived_types() {
        let mut model: TypeModel = [
            Type::entity("Gadget.v1_0_0", "Base").with_base("Nowhere.Base"),
            Type::entity("Gadget.v1_1_0", "Derived").with_base("Gadget.v1_0_0.Base"),
        ]
        .into_iter()
        .collect();
        let report = fold_model(&mut model, &AliasTable::new()).unwrap();

        assert!(report.folded.is_empty());
        assert_eq!(report.deleted.len(), 2);
        assert!(model.is_empty());
    }

    #[test]
    fn test_base_through_alias() {
        let mut model: TypeModel = [
            Type::complex("Widget.v1_0_0", "Real").with_property("Size", prop("Edm.Int64")),
            Type::complex("Widget.v1_0_0", "Child").with_base("Widget.v1_0_0.Alias"),
        ]
        .into_iter()
        .collect();
        let aliases: AliasTable = [("Widget.v1_0_0.Alias", "Widget.v1_0_0.Real")]
            .into_iter()
            .collect();
        let report = fold_model(&mut model, &aliases).unwrap();

        assert!(report.is_clean());
        assert!(model.get("Widget.v1_0_0.Child").unwrap().property("Size").is_some());
    }

    #[test]
    fn test_cycle_is_error() {
        let mut model: TypeModel = [
            Type::entity("Loop.v1_0_0", "A").with_base("Loop.v1_0_0.B"),
            Type::entity("Loop.v1_0_0", "B").with_base("Loop.v1_0_0.A"),
        ]
        .into_iter()
        .collect();
        let err = fold_model(&mut model, &AliasTable::new()).unwrap_err();
        assert!(matches!(err, SchemaError::CircularReference { .. }));
    }

    #[test]
    fn test_self_reference_is_error() {
        let mut model: TypeModel = [Type::entity("Loop.v1_0_0", "A").with_base("Loop.v1_0_0.A")]
            .into_iter()
            .collect();
        let err = fold_type(&mut model, &AliasTable::new(), "Loop.v1_0_0.A").unwrap_err();
        assert!(err.to_string().contains("Loop.v1_0_0.A"));
    }

    #[test]
    fn test_enums_fold_unchanged() {
        let mut color = Type::entity("Widget", "Color");
        color.members.push(crate::types::EnumMember::new("Red"));
        let mut model: TypeModel = [color.clone()].into_iter().collect();
        fold_model(&mut model, &AliasTable::new()).unwrap();
        assert_eq!(model.get("Widget.Color"), Some(&color));
    }
}
