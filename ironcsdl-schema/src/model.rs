//! Type model arena and alias table.
//!
//! [`TypeModel`] owns every [`Type`] keyed by qualified name together with a
//! per-entry [`FoldStatus`]. Deleted entries stay in the arena as tombstones,
//! so folding never depends on map iteration order while it mutates entries.

use crate::types::Type;
use crate::version::compare_qualified;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Folding state of a model entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoldStatus {
    /// Base chain not yet merged.
    Unfolded,
    /// Base chain fully merged; `base_type` is empty.
    Folded,
    /// Removed because its base chain dead-ended.
    Deleted,
}

/// Model entry: a type record and its folding state.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Type record.
    pub ty: Type,
    /// Folding state.
    pub status: FoldStatus,
}

/// Arena of type records keyed by qualified name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeModel {
    entries: BTreeMap<String, Entry>,
}

impl TypeModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a type, replacing any earlier record with the same qualified
    /// name. The new entry starts unfolded.
    ///
    /// Returns the replaced record, if any.
    pub fn insert(&mut self, ty: Type) -> Option<Type> {
        let entry = Entry {
            ty,
            status: FoldStatus::Unfolded,
        };
        self.entries
            .insert(entry.ty.qualified_name(), entry)
            .map(|old| old.ty)
    }

    /// Looks up a live (not deleted) type.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Type> {
        self.entries
            .get(name)
            .filter(|e| e.status != FoldStatus::Deleted)
            .map(|e| &e.ty)
    }

    /// Looks up a live type mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Type> {
        self.entries
            .get_mut(name)
            .filter(|e| e.status != FoldStatus::Deleted)
            .map(|e| &mut e.ty)
    }

    /// Returns true if a live type with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the folding state of an entry, including deleted ones.
    #[must_use]
    pub fn status(&self, name: &str) -> Option<FoldStatus> {
        self.entries.get(name).map(|e| e.status)
    }

    /// Sets the folding state of an entry.
    ///
    /// Returns false if no entry with this name exists.
    pub fn set_status(&mut self, name: &str, status: FoldStatus) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => false,
        }
    }

    /// Marks an entry deleted. Its record stays in the arena as a tombstone.
    pub fn delete(&mut self, name: &str) -> bool {
        self.set_status(name, FoldStatus::Deleted)
    }

    /// Iterates live types in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.entries
            .iter()
            .filter(|(_, e)| e.status != FoldStatus::Deleted)
            .map(|(name, e)| (name.as_str(), &e.ty))
    }

    /// Returns the number of live types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if no live type exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the names of all live types ordered by namespace version,
    /// oldest first.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.iter().map(|(name, _)| name.to_string()).collect();
        names.sort_by(|a, b| compare_qualified(a, b));
        names
    }
}

impl FromIterator<Type> for TypeModel {
    fn from_iter<I: IntoIterator<Item = Type>>(iter: I) -> Self {
        let mut model = Self::new();
        for ty in iter {
            model.insert(ty);
        }
        model
    }
}

/// Type definition aliases: qualified alias name to underlying type name.
///
/// Built once while the model is built and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    /// Creates an empty alias table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an alias.
    pub fn insert(&mut self, alias: impl Into<String>, underlying: impl Into<String>) {
        self.aliases.insert(alias.into(), underlying.into());
    }

    /// Looks up the underlying type of an alias.
    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Returns the underlying type if `name` is an alias, otherwise `name`.
    #[must_use]
    pub fn substitute<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).unwrap_or(name)
    }

    /// Returns the number of aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns true if no alias is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Iterates aliases in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.aliases.iter()
    }
}

impl<A: Into<String>, U: Into<String>> FromIterator<(A, U)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (A, U)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (alias, underlying) in iter {
            table.insert(alias, underlying);
        }
        table
    }
}
