//! Upgrades of older persisted and imported shapes into the current
//! `{ group: { files, bookmarks } }` layout.

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::errors::StoreError;
use crate::domain::models::{Bookmark, Group};
use crate::storage::bookmarks::GlobalBookmarkStore;
use crate::storage::favorites::FavoritesStore;

/// Name of the group synthesized for imports whose `favorites` is a bare
/// list of paths.
pub const IMPORTED_GROUP: &str = "Imported Group";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub favorites: FavoritesStore,
    /// Whether the raw value was in the legacy shape and was rewritten.
    pub upgraded: bool,
}

/// True when the persisted favorites use the legacy `group -> [files]`
/// shape. Any group holding a bare array counts, so partially upgraded
/// data is rewritten too.
pub fn is_legacy_shape(raw: &Value) -> bool {
    match raw {
        Value::Object(groups) => groups.values().any(Value::is_array),
        _ => false,
    }
}

/// Convert a persisted favorites value into the current shape.
///
/// `null` (nothing stored yet) yields an empty store. Running this on an
/// already-current value returns it unchanged.
pub fn migrate(raw: &Value) -> Result<Migration, StoreError> {
    let upgraded = is_legacy_shape(raw);
    let favorites = match raw {
        Value::Null => FavoritesStore::default(),
        Value::Object(groups) => normalize_groups(groups)?,
        other => {
            return Err(StoreError::InvalidFormat(format!(
                "favorites must be an object, found {}",
                kind(other)
            )))
        }
    };

    if upgraded {
        debug!(groups = favorites.len(), "upgraded legacy favorites shape");
    }
    Ok(Migration {
        favorites,
        upgraded,
    })
}

/// Normalized payload of an import document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportData {
    pub favorites: FavoritesStore,
    pub bookmarks: GlobalBookmarkStore,
}

/// Accept the current export format and every legacy variant of it.
pub fn normalize_import(document: &Value) -> Result<ImportData, StoreError> {
    let Value::Object(root) = document else {
        return Err(StoreError::InvalidFormat(
            "import document must be a JSON object".to_string(),
        ));
    };
    let raw_favorites = root.get("favorites").ok_or_else(|| {
        StoreError::InvalidFormat("missing required 'favorites' field".to_string())
    })?;

    let favorites = match raw_favorites {
        Value::Array(_) => {
            let files = string_list(raw_favorites, IMPORTED_GROUP)?;
            let mut store = FavoritesStore::default();
            store.insert(IMPORTED_GROUP.to_string(), Group::with_files(files));
            store
        }
        Value::Object(groups) => normalize_groups(groups)?,
        other => {
            return Err(StoreError::InvalidFormat(format!(
                "'favorites' must be an object or an array, found {}",
                kind(other)
            )))
        }
    };

    let bookmarks = match root.get("bookmarks") {
        None | Some(Value::Null) => GlobalBookmarkStore::default(),
        Some(value) => serde_json::from_value(value.clone()).map_err(|err| {
            StoreError::InvalidFormat(format!("'bookmarks' has an unexpected shape: {err}"))
        })?,
    };

    Ok(ImportData {
        favorites,
        bookmarks,
    })
}

fn normalize_groups(groups: &Map<String, Value>) -> Result<FavoritesStore, StoreError> {
    let mut store = FavoritesStore::default();
    for (name, value) in groups {
        store.insert(name.clone(), normalize_group(name, value)?);
    }
    Ok(store)
}

fn normalize_group(name: &str, value: &Value) -> Result<Group, StoreError> {
    match value {
        Value::Array(_) => Ok(Group::with_files(string_list(value, name)?)),
        Value::Object(fields) => {
            let files = match fields.get("files") {
                None | Some(Value::Null) => Vec::new(),
                Some(files) => string_list(files, name)?,
            };
            let bookmarks = match fields.get("bookmarks") {
                None | Some(Value::Null) => Vec::new(),
                Some(bookmarks) => serde_json::from_value::<Vec<Bookmark>>(bookmarks.clone())
                    .map_err(|err| {
                        StoreError::InvalidFormat(format!(
                            "group '{name}' has malformed bookmarks: {err}"
                        ))
                    })?,
            };
            Ok(Group { files, bookmarks })
        }
        other => Err(StoreError::InvalidFormat(format!(
            "group '{name}' must be a list of files or an object, found {}",
            kind(other)
        ))),
    }
}

fn string_list(value: &Value, group: &str) -> Result<Vec<String>, StoreError> {
    let files: Vec<String> = serde_json::from_value(value.clone()).map_err(|_| {
        StoreError::InvalidFormat(format!("group '{group}' files must be a list of paths"))
    })?;

    let mut unique = Vec::with_capacity(files.len());
    for file in files {
        if !unique.contains(&file) {
            unique.push(file);
        }
    }
    Ok(unique)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
