use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::migration;
use crate::storage::bookmarks::GlobalBookmarkStore;
use crate::storage::favorites::FavoritesStore;

/// Per-workspace persisted state: the two root stores plus display aliases.
///
/// Loading runs the favorites migration and writes the upgraded shape back
/// before the state is handed out, so every reader sees the current layout.
#[derive(Debug, Clone)]
pub struct WorkspaceState {
    path: PathBuf,
    pub favorites: FavoritesStore,
    pub bookmarks: GlobalBookmarkStore,
    pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawState {
    #[serde(default)]
    favorites: Value,
    #[serde(default)]
    bookmarks: Option<GlobalBookmarkStore>,
    #[serde(default, rename = "favoriteAliases")]
    favorite_aliases: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct PersistedState<'a> {
    favorites: &'a FavoritesStore,
    bookmarks: &'a GlobalBookmarkStore,
    #[serde(rename = "favoriteAliases", skip_serializing_if = "BTreeMap::is_empty")]
    favorite_aliases: &'a BTreeMap<String, String>,
}

impl WorkspaceState {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let raw = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read state file: {}", path.display()))?;
            if content.trim().is_empty() {
                RawState::default()
            } else {
                serde_json::from_str::<RawState>(&content)
                    .with_context(|| format!("failed to parse state file: {}", path.display()))?
            }
        } else {
            RawState::default()
        };

        let migrated = migration::migrate(&raw.favorites)
            .with_context(|| format!("failed to migrate favorites in {}", path.display()))?;
        let mut bookmarks = raw.bookmarks.unwrap_or_default();
        bookmarks.prune_empty();

        let state = Self {
            path,
            favorites: migrated.favorites,
            bookmarks,
            aliases: raw.favorite_aliases,
        };

        if migrated.upgraded {
            state.save().context("failed to persist migrated favorites")?;
            info!(
                path = %state.path.display(),
                groups = state.favorites.len(),
                "migrated legacy favorites"
            );
        }

        Ok(state)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when neither a group nor a global bookmark exists.
    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty() && self.bookmarks.is_empty()
    }

    pub fn alias(&self, file_path: &str) -> Option<&str> {
        self.aliases.get(file_path).map(String::as_str)
    }

    pub fn set_alias(&mut self, file_path: &str, alias: &str) {
        if alias.trim().is_empty() {
            self.aliases.remove(file_path);
        } else {
            self.aliases
                .insert(file_path.to_string(), alias.to_string());
        }
    }

    pub fn remove_alias(&mut self, file_path: &str) -> bool {
        self.aliases.remove(file_path).is_some()
    }

    /// Swap both root stores for imported data. Aliases are left alone.
    pub fn replace(&mut self, favorites: FavoritesStore, bookmarks: GlobalBookmarkStore) {
        self.favorites = favorites;
        self.bookmarks = bookmarks;
        self.bookmarks.prune_empty();
    }

    /// Write the whole state through a temp file and rename it into place.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create state directory: {}", parent.display())
            })?;
        }

        let body = serde_json::to_string_pretty(&PersistedState {
            favorites: &self.favorites,
            bookmarks: &self.bookmarks,
            favorite_aliases: &self.aliases,
        })
        .context("failed to serialize workspace state")?;

        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        fs::write(&tmp, body)
            .with_context(|| format!("failed to write state file: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace state file: {}", self.path.display()))?;

        debug!(path = %self.path.display(), "saved workspace state");
        Ok(())
    }
}
