//! Export, backup and import of the whole workspace state as a portable
//! JSON document.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::errors::StoreError;
use crate::domain::migration::{self, ImportData};
use crate::integrations::prompt::Prompt;
use crate::storage::bookmarks::GlobalBookmarkStore;
use crate::storage::favorites::FavoritesStore;
use crate::storage::state::WorkspaceState;

pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub groups: usize,
    pub files: usize,
    pub group_bookmarks: usize,
    pub global_bookmarks: usize,
    pub total_bookmarks: usize,
}

impl Statistics {
    pub fn collect(favorites: &FavoritesStore, bookmarks: &GlobalBookmarkStore) -> Self {
        let group_bookmarks = favorites.bookmark_count();
        let global_bookmarks = bookmarks.bookmark_count();
        Self {
            groups: favorites.len(),
            files: favorites.file_count(),
            group_bookmarks,
            global_bookmarks,
            total_bookmarks: group_bookmarks + global_bookmarks,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} groups, {} files, {} bookmarks ({} in groups, {} global)",
            self.groups,
            self.files,
            self.total_bookmarks,
            self.group_bookmarks,
            self.global_bookmarks
        )
    }
}

/// Export and backup documents share one layout; only the date key differs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransferDocument {
    pub favorites: FavoritesStore,
    pub bookmarks: GlobalBookmarkStore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_date: Option<String>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
}

impl TransferDocument {
    pub fn export(state: &WorkspaceState) -> Self {
        Self {
            export_date: Some(iso_now()),
            backup_date: None,
            ..Self::snapshot(state)
        }
    }

    pub fn backup(state: &WorkspaceState) -> Self {
        Self {
            export_date: None,
            backup_date: Some(iso_now()),
            ..Self::snapshot(state)
        }
    }

    fn snapshot(state: &WorkspaceState) -> Self {
        Self {
            favorites: state.favorites.clone(),
            bookmarks: state.bookmarks.clone(),
            export_date: None,
            backup_date: None,
            version: FORMAT_VERSION.to_string(),
            statistics: Some(Statistics::collect(&state.favorites, &state.bookmarks)),
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let body = serde_json::to_string_pretty(self).context("failed to serialize document")?;
        fs::write(path, body)
            .with_context(|| format!("failed to write document: {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Applied {
        backup: Option<PathBuf>,
        statistics: Statistics,
    },
    Declined {
        backup: Option<PathBuf>,
    },
}

pub fn export_to(state: &WorkspaceState, destination: &Path) -> Result<Statistics> {
    let document = TransferDocument::export(state);
    document.write_to(destination)?;

    let statistics = document.statistics.unwrap_or_default();
    info!(
        path = %destination.display(),
        groups = statistics.groups,
        bookmarks = statistics.total_bookmarks,
        "exported workspace data"
    );
    Ok(statistics)
}

/// Read and normalize an import file without touching any state.
pub fn read_import(source: &Path) -> Result<ImportData> {
    let content = fs::read_to_string(source)
        .with_context(|| format!("failed to read import file: {}", source.display()))?;
    parse_import(&content).with_context(|| format!("invalid import file: {}", source.display()))
}

pub fn parse_import(content: &str) -> Result<ImportData, StoreError> {
    let document: Value = serde_json::from_str(content)
        .map_err(|err| StoreError::InvalidFormat(format!("not valid JSON: {err}")))?;
    migration::normalize_import(&document)
}

/// Where backups go: the first workspace root when it exists, else `$HOME`.
pub fn backup_dir(workspace_root: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = workspace_root.filter(|root| root.is_dir()) {
        return Ok(root.to_path_buf());
    }
    env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| anyhow!("no workspace root and HOME is not set; cannot place backup"))
}

pub fn write_backup(state: &WorkspaceState, dir: &Path) -> Result<PathBuf> {
    let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ");
    let path = dir.join(format!("favorites-backup-{stamp}.json"));
    TransferDocument::backup(state)
        .write_to(&path)
        .context("failed to write backup before import")?;
    info!(path = %path.display(), "wrote backup");
    Ok(path)
}

/// Validate, back up, confirm, then replace both stores wholesale.
///
/// Nothing in `state` changes unless the prompt answers yes and the new
/// state is persisted.
pub fn import_from(
    state: &mut WorkspaceState,
    source: &Path,
    workspace_root: Option<&Path>,
    prompt: &mut dyn Prompt,
) -> Result<ImportOutcome> {
    let data = read_import(source)?;

    let backup = if state.is_empty() {
        None
    } else {
        let dir = backup_dir(workspace_root)?;
        Some(write_backup(state, &dir)?)
    };

    let incoming = Statistics::collect(&data.favorites, &data.bookmarks);
    let question = format!(
        "Importing replaces all current favorites and bookmarks with {}. Continue?",
        incoming.summary()
    );
    if !prompt.confirm(&question)? {
        warn!(path = %source.display(), "import declined");
        return Ok(ImportOutcome::Declined { backup });
    }

    let previous = (state.favorites.clone(), state.bookmarks.clone());
    state.replace(data.favorites, data.bookmarks);
    if let Err(err) = state.save() {
        state.replace(previous.0, previous.1);
        return Err(err.context("failed to persist imported data"));
    }

    let statistics = Statistics::collect(&state.favorites, &state.bookmarks);
    info!(
        path = %source.display(),
        groups = statistics.groups,
        bookmarks = statistics.total_bookmarks,
        "imported workspace data"
    );
    Ok(ImportOutcome::Applied { backup, statistics })
}

fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
