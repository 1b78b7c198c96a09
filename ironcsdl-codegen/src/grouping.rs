//! Output grouping and duplicate reconciliation.
//!
//! Every folded type lands in the group of its vendor prefix. Within a group
//! types are keyed by bare name, so the versions of one type collapse into a
//! single declaration.

use ironcsdl_schema::Type;
use ironcsdl_schema::version::{compare_qualified, vendor_of};
use std::collections::BTreeMap;

/// Namespace prefix of message registries.
const MESSAGE_REGISTRY_PREFIX: &str = "MessageRegistry";

/// Message shape replicated in every registry namespace.
const MESSAGE: &str = "Message";

/// Types destined for one output module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileGroup<'a> {
    /// Group name: the vendor prefix.
    pub name: String,
    types: BTreeMap<String, &'a Type>,
}

impl<'a> FileGroup<'a> {
    /// Creates an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: BTreeMap::new(),
        }
    }

    /// Offers a type to the group.
    ///
    /// A held type with the same bare name is kept if it has more properties
    /// or more members; otherwise the offered type replaces it. Registry
    /// `Message` types are never entered.
    ///
    /// Returns true if the type is now held.
    pub fn add_type(&mut self, ty: &'a Type) -> bool {
        if ty.namespace.starts_with(MESSAGE_REGISTRY_PREFIX) && ty.name == MESSAGE {
            return false;
        }
        if let Some(existing) = self.types.get(&ty.name) {
            if existing.properties.len() > ty.properties.len()
                || existing.members.len() > ty.members.len()
            {
                tracing::debug!(
                    "{}: keeping {} over {}",
                    self.name,
                    existing.qualified_name(),
                    ty.qualified_name()
                );
                return false;
            }
        }
        self.types.insert(ty.name.clone(), ty);
        true
    }

    /// Looks up a held type by bare name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a Type> {
        self.types.get(name).copied()
    }

    /// Iterates held types by bare name.
    pub fn types(&self) -> impl Iterator<Item = &'a Type> + '_ {
        self.types.values().copied()
    }

    /// Returns the number of held types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if the group holds no type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Groups types by vendor prefix.
///
/// Types are offered oldest first, so among equally complete versions the
/// newest one is kept.
#[must_use]
pub fn group_types<'a, I>(types: I) -> Vec<FileGroup<'a>>
where
    I: IntoIterator<Item = &'a Type>,
{
    let mut types: Vec<(String, &'a Type)> = types
        .into_iter()
        .map(|t| (t.qualified_name(), t))
        .collect();
    types.sort_by(|a, b| compare_qualified(&a.0, &b.0));

    let mut groups: BTreeMap<String, FileGroup<'a>> = BTreeMap::new();
    for (_, ty) in types {
        let vendor = vendor_of(&ty.namespace).to_string();
        groups
            .entry(vendor.clone())
            .or_insert_with(|| FileGroup::new(vendor))
            .add_type(ty);
    }
    groups.into_values().filter(|g| !g.is_empty()).collect()
}
