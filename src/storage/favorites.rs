use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::errors::StoreError;
use crate::domain::lookup;
use crate::domain::models::{Bookmark, Group};
use crate::domain::quick_pick;

/// Group name -> files and group-scoped bookmarks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FavoritesStore {
    groups: BTreeMap<String, Group>,
}

impl FavoritesStore {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&String, &Group)> {
        self.groups.iter()
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub(crate) fn insert(&mut self, name: String, group: Group) {
        self.groups.insert(name, group);
    }

    /// The group holding `path`, if any. Files belong to at most one group
    /// in practice; the first one in name order wins otherwise.
    pub fn group_of(&self, path: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|(_, group)| group.contains_file(path))
            .map(|(name, _)| name.as_str())
    }

    pub fn create_group(&mut self, name: &str) -> Result<(), StoreError> {
        let name = validate_name(name)?;
        if self.groups.contains_key(name) {
            return Err(StoreError::GroupExists(name.to_string()));
        }
        self.groups.insert(name.to_string(), Group::default());
        debug!(group = name, "created group");
        Ok(())
    }

    /// Move a group to a new name.
    ///
    /// Renaming onto an existing group is refused unless `overwrite` is set,
    /// in which case the target's previous contents are discarded.
    pub fn rename_group(
        &mut self,
        old_name: &str,
        new_name: &str,
        overwrite: bool,
    ) -> Result<bool, StoreError> {
        let new_name = validate_name(new_name)?;
        if !self.groups.contains_key(old_name) {
            return Err(self.not_found(old_name));
        }
        if old_name == new_name {
            return Ok(false);
        }
        if self.groups.contains_key(new_name) && !overwrite {
            return Err(StoreError::GroupExists(new_name.to_string()));
        }

        let Some(group) = self.groups.remove(old_name) else {
            return Err(self.not_found(old_name));
        };
        self.groups.insert(new_name.to_string(), group);
        debug!(from = old_name, to = new_name, overwrite, "renamed group");
        Ok(true)
    }

    pub fn delete_group(&mut self, name: &str) -> bool {
        self.groups.remove(name).is_some()
    }

    /// Append `path` to an existing group. Returns `false` when the file
    /// was already there.
    pub fn add_file(&mut self, group_name: &str, path: &str) -> Result<bool, StoreError> {
        match self.groups.get_mut(group_name) {
            Some(group) => Ok(push_unique(group, path)),
            None => Err(self.not_found(group_name)),
        }
    }

    /// Append `path`, creating the group first when it does not exist.
    pub fn add_file_creating_group(
        &mut self,
        group_name: &str,
        path: &str,
    ) -> Result<bool, StoreError> {
        let name = validate_name(group_name)?;
        let group = self.groups.entry(name.to_string()).or_default();
        Ok(push_unique(group, path))
    }

    /// Remove `path` from whichever group holds it. Returns the group name.
    pub fn remove_file(&mut self, path: &str) -> Option<String> {
        let name = self.group_of(path)?.to_string();
        if let Some(group) = self.groups.get_mut(&name) {
            group.files.retain(|f| f != path);
        }
        Some(name)
    }

    /// Move `from` to the index currently held by `to` within one group.
    pub fn reorder_file(&mut self, group_name: &str, from: &str, to: &str) -> bool {
        if from == to {
            return false;
        }
        let Some(group) = self.groups.get_mut(group_name) else {
            return false;
        };
        let (Some(from_idx), Some(to_idx)) = (
            group.files.iter().position(|f| f == from),
            group.files.iter().position(|f| f == to),
        ) else {
            return false;
        };

        let moved = group.files.remove(from_idx);
        group.files.insert(to_idx, moved);
        true
    }

    pub fn add_group_bookmark(
        &mut self,
        group_name: &str,
        bookmark: Bookmark,
    ) -> Result<(), StoreError> {
        let name = validate_name(group_name)?;
        if bookmark.line == 0 {
            return Err(StoreError::InvalidLine(bookmark.line));
        }
        self.groups
            .entry(name.to_string())
            .or_default()
            .bookmarks
            .push(bookmark);
        Ok(())
    }

    pub fn remove_group_bookmark(
        &mut self,
        group_name: &str,
        file_path: &str,
        label: &str,
    ) -> Option<Bookmark> {
        let group = self.groups.get_mut(group_name)?;
        let index = lookup::find_position(&group.bookmarks, file_path, label)?;
        Some(group.bookmarks.remove(index))
    }

    pub fn rename_group_bookmark(
        &mut self,
        group_name: &str,
        file_path: &str,
        label: &str,
        description: &str,
    ) -> bool {
        let Some(group) = self.groups.get_mut(group_name) else {
            return false;
        };
        match lookup::find_mut(&mut group.bookmarks, file_path, label) {
            Some(bookmark) => {
                bookmark.set_description(description);
                true
            }
            None => false,
        }
    }

    pub fn clear_group_bookmarks(&mut self, group_name: &str) -> Result<usize, StoreError> {
        match self.groups.get_mut(group_name) {
            Some(group) => Ok(std::mem::take(&mut group.bookmarks).len()),
            None => Err(self.not_found(group_name)),
        }
    }

    pub fn file_count(&self) -> usize {
        self.groups.values().map(|g| g.files.len()).sum()
    }

    pub fn bookmark_count(&self) -> usize {
        self.groups.values().map(|g| g.bookmarks.len()).sum()
    }

    fn not_found(&self, name: &str) -> StoreError {
        StoreError::GroupNotFound {
            name: name.to_string(),
            suggestion: quick_pick::suggest(self.group_names(), name),
        }
    }
}

fn validate_name(name: &str) -> Result<&str, StoreError> {
    if name.trim().is_empty() {
        Err(StoreError::InvalidGroupName)
    } else {
        Ok(name)
    }
}

fn push_unique(group: &mut Group, path: &str) -> bool {
    if group.contains_file(path) {
        return false;
    }
    group.files.push(path.to_string());
    true
}
