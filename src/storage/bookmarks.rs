use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::errors::StoreError;
use crate::domain::lookup;
use crate::domain::models::Bookmark;

/// File path -> bookmarks that belong to no group.
///
/// A key never maps to an empty list; it is dropped as soon as its last
/// bookmark goes away. The key, not a record's own `filePath`, addresses
/// the bookmarks listed under it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct GlobalBookmarkStore {
    files: BTreeMap<String, Vec<Bookmark>>,
}

impl GlobalBookmarkStore {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn bookmark_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn for_file(&self, file_path: &str) -> &[Bookmark] {
        self.files
            .get(file_path)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn files(&self) -> impl Iterator<Item = (&String, &Vec<Bookmark>)> {
        self.files.iter()
    }

    pub fn add_bookmark(
        &mut self,
        file_path: &str,
        line: u32,
        description: Option<String>,
    ) -> Result<Bookmark, StoreError> {
        if line == 0 {
            return Err(StoreError::InvalidLine(line));
        }
        let bookmark = Bookmark::new(file_path, line, description);
        self.files
            .entry(file_path.to_string())
            .or_default()
            .push(bookmark.clone());
        Ok(bookmark)
    }

    pub fn remove_bookmark(&mut self, file_path: &str, label: &str) -> Option<Bookmark> {
        let list = self.files.get_mut(file_path)?;
        let index = lookup::position_by_label(list, label)?;
        let removed = list.remove(index);
        if list.is_empty() {
            self.files.remove(file_path);
        }
        Some(removed)
    }

    pub fn rename_bookmark(&mut self, file_path: &str, label: &str, description: &str) -> bool {
        let Some(list) = self.files.get_mut(file_path) else {
            return false;
        };
        match lookup::find_by_label_mut(list, label) {
            Some(bookmark) => {
                bookmark.set_description(description);
                true
            }
            None => false,
        }
    }

    /// Drop every bookmark of one file. Returns how many were removed.
    pub fn clear_file(&mut self, file_path: &str) -> usize {
        self.files.remove(file_path).map_or(0, |list| list.len())
    }

    pub fn clear_all(&mut self) -> usize {
        let count = self.bookmark_count();
        self.files.clear();
        count
    }

    /// Drops keys left empty by hand-edited or imported data.
    pub(crate) fn prune_empty(&mut self) {
        self.files.retain(|_, list| !list.is_empty());
    }
}
