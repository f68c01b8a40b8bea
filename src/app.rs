use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::domain::commands::{Command, HELP};
use crate::domain::errors::StoreError;
use crate::domain::lookup;
use crate::domain::models::{Bookmark, BookmarkKey, BookmarkScope};
use crate::integrations::prompt::{FixedAnswer, InputPrompt, LineInput, Prompt};
use crate::storage::config::RuntimeConfig;
use crate::storage::state::WorkspaceState;
use crate::storage::transfer::{self, ImportOutcome, Statistics};
use crate::ui::{tree, Shell};

/// Command-line settings that override the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub debug: bool,
    pub state_path: Option<PathBuf>,
    pub workspace: Option<PathBuf>,
    pub assume_yes: bool,
    pub command: Vec<String>,
}

pub struct App {
    pub running: bool,
    pub status_message: String,
    /// Multi-line output of the last command (tree, stats, help).
    pub output: Option<String>,
    state: WorkspaceState,
    workspace_root: Option<PathBuf>,
    prompt: Box<dyn Prompt>,
    confirm_import: bool,
}

impl App {
    pub fn new(state: WorkspaceState, prompt: Box<dyn Prompt>) -> Self {
        Self {
            running: true,
            status_message: "Ready".to_string(),
            output: None,
            state,
            workspace_root: None,
            prompt,
            confirm_import: true,
        }
    }

    pub fn with_workspace_root(mut self, root: Option<PathBuf>) -> Self {
        self.workspace_root = root;
        self
    }

    pub fn with_import_confirmation(mut self, confirm: bool) -> Self {
        self.confirm_import = confirm;
        self
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::collect(&self.state.favorites, &self.state.bookmarks)
    }

    pub fn execute_line(&mut self, input: &str) -> Result<()> {
        let command = Command::parse(input)?;
        self.execute(command)
    }

    pub fn execute(&mut self, command: Command) -> Result<()> {
        self.output = None;

        match command {
            Command::AddFile { group, path } => {
                let added = self.mutate(|state| {
                    Ok(state.favorites.add_file_creating_group(&group, &path)?)
                })?;
                self.status_message = if added {
                    format!("Added {path} to {group}")
                } else {
                    format!("{path} is already in {group}")
                };
            }
            Command::AddToGroup { group, path } => {
                let added = self.mutate(|state| Ok(state.favorites.add_file(&group, &path)?))?;
                self.status_message = if added {
                    format!("Added {path} to {group}")
                } else {
                    format!("{path} is already in {group}")
                };
            }
            Command::CreateGroup(name) => {
                self.mutate(|state| {
                    state.favorites.create_group(&name)?;
                    Ok(true)
                })?;
                self.status_message = format!("Created group {name}");
            }
            Command::RenameGroup {
                from,
                to,
                overwrite,
            } => {
                let overwrite = overwrite || self.confirm_overwrite(&from, &to)?;
                let renamed =
                    self.mutate(|state| Ok(state.favorites.rename_group(&from, &to, overwrite)?))?;
                self.status_message = if renamed {
                    format!("Renamed group {from} to {to}")
                } else {
                    format!("Group {from} already has that name")
                };
            }
            Command::DeleteGroup(name) => {
                if self.mutate(|state| Ok(state.favorites.delete_group(&name)))? {
                    self.status_message = format!("Deleted group {name}");
                } else {
                    self.nothing_to_do(format!("no group named {name}"));
                }
            }
            Command::RemoveFavorite(path) => {
                let mut owner = None;
                self.mutate(|state| {
                    owner = state.favorites.remove_file(&path);
                    Ok(owner.is_some())
                })?;
                match owner {
                    Some(group) => self.status_message = format!("Removed {path} from {group}"),
                    None => self.nothing_to_do(format!("{path} is not in any group")),
                }
            }
            Command::MoveFile { group, from, to } => {
                if self.mutate(|state| Ok(state.favorites.reorder_file(&group, &from, &to)))? {
                    self.status_message = format!("Moved {from} in {group}");
                } else {
                    self.nothing_to_do(format!(
                        "cannot move {from} onto {to}: both must be distinct files of {group}"
                    ));
                }
            }
            Command::AddBookmark {
                group,
                path,
                line,
                description,
            } => {
                self.mutate(|state| {
                    match &group {
                        Some(group) => state.favorites.add_group_bookmark(
                            group,
                            Bookmark::new(path.clone(), line, description.clone()),
                        )?,
                        None => {
                            state
                                .bookmarks
                                .add_bookmark(&path, line, description.clone())?;
                        }
                    }
                    Ok(true)
                })?;
                self.status_message = match group {
                    Some(group) => format!("Bookmarked {path}:{line} in {group}"),
                    None => format!("Bookmarked {path}:{line}"),
                };
            }
            Command::RemoveBookmark(key) => {
                self.warn_if_ambiguous(&key);
                let removed = self.mutate(|state| {
                    let removed = match &key.scope {
                        BookmarkScope::Global => {
                            state.bookmarks.remove_bookmark(&key.file_path, &key.label)
                        }
                        BookmarkScope::Group(group) => state.favorites.remove_group_bookmark(
                            group,
                            &key.file_path,
                            &key.label,
                        ),
                    };
                    Ok(removed.is_some())
                })?;
                if removed {
                    self.status_message = format!("Removed bookmark {key}");
                } else {
                    self.nothing_to_do(format!("no bookmark {key}"));
                }
            }
            Command::RenameBookmark { key, description } => {
                self.warn_if_ambiguous(&key);
                let renamed = self.mutate(|state| {
                    Ok(match &key.scope {
                        BookmarkScope::Global => state.bookmarks.rename_bookmark(
                            &key.file_path,
                            &key.label,
                            &description,
                        ),
                        BookmarkScope::Group(group) => state.favorites.rename_group_bookmark(
                            group,
                            &key.file_path,
                            &key.label,
                            &description,
                        ),
                    })
                })?;
                if renamed {
                    self.status_message = format!("Renamed bookmark {key}");
                } else {
                    self.nothing_to_do(format!("no bookmark {key}"));
                }
            }
            Command::ClearFile(path) => {
                let mut cleared = 0;
                self.mutate(|state| {
                    cleared = state.bookmarks.clear_file(&path);
                    Ok(cleared > 0)
                })?;
                if cleared > 0 {
                    self.status_message = format!("Cleared {cleared} bookmarks from {path}");
                } else {
                    self.nothing_to_do(format!("{path} has no bookmarks"));
                }
            }
            Command::ClearBookmarks => {
                let mut cleared = 0;
                self.mutate(|state| {
                    cleared = state.bookmarks.clear_all();
                    Ok(cleared > 0)
                })?;
                if cleared > 0 {
                    self.status_message = format!("Cleared {cleared} global bookmarks");
                } else {
                    self.nothing_to_do("there are no global bookmarks".to_string());
                }
            }
            Command::ClearGroupBookmarks(group) => {
                let mut cleared = 0;
                self.mutate(|state| {
                    cleared = state.favorites.clear_group_bookmarks(&group)?;
                    Ok(cleared > 0)
                })?;
                if cleared > 0 {
                    self.status_message = format!("Cleared {cleared} bookmarks from {group}");
                } else {
                    self.nothing_to_do(format!("{group} has no bookmarks"));
                }
            }
            Command::Alias { path, alias } => {
                self.mutate(|state| {
                    state.set_alias(&path, &alias);
                    Ok(true)
                })?;
                self.status_message = format!("{path} is shown as {alias}");
            }
            Command::Unalias(path) => {
                if self.mutate(|state| Ok(state.remove_alias(&path)))? {
                    self.status_message = format!("Removed alias of {path}");
                } else {
                    self.nothing_to_do(format!("{path} has no alias"));
                }
            }
            Command::Export(destination) => {
                let statistics = transfer::export_to(&self.state, &destination)
                    .with_context(|| format!("export to {} failed", destination.display()))?;
                self.status_message = format!(
                    "Exported {} to {}",
                    statistics.summary(),
                    destination.display()
                );
            }
            Command::Import(source) => self.import(&source)?,
            Command::List(query) => {
                let items = tree::build(&self.state, self.workspace_root.as_deref(), &query);
                self.status_message = format!("{} groups", self.state.favorites.len());
                self.output = Some(tree::render(&items));
            }
            Command::Stats => {
                self.status_message = self.statistics().summary();
            }
            Command::Help => {
                self.status_message = "Commands:".to_string();
                self.output = Some(HELP.to_string());
            }
            Command::Quit => {
                self.running = false;
                self.status_message = "Bye".to_string();
            }
        }

        Ok(())
    }

    /// Run one store operation against the state and persist it when it
    /// reports a change. A failed save rolls the in-memory state back.
    fn mutate<F>(&mut self, op: F) -> Result<bool>
    where
        F: FnOnce(&mut WorkspaceState) -> Result<bool>,
    {
        let snapshot = self.state.clone();
        let changed = match op(&mut self.state) {
            Ok(changed) => changed,
            Err(err) => {
                self.state = snapshot;
                return Err(err);
            }
        };

        if changed {
            if let Err(err) = self.state.save() {
                self.state = snapshot;
                return Err(err);
            }
        }
        Ok(changed)
    }

    fn import(&mut self, source: &std::path::Path) -> Result<()> {
        let mut assume_yes = FixedAnswer(true);
        let prompt: &mut dyn Prompt = if self.confirm_import {
            self.prompt.as_mut()
        } else {
            &mut assume_yes
        };

        let outcome = transfer::import_from(
            &mut self.state,
            source,
            self.workspace_root.as_deref(),
            prompt,
        )
        .with_context(|| format!("import from {} failed", source.display()))?;

        let backup_note = |backup: &Option<PathBuf>| match backup {
            Some(path) => format!(" (backup: {})", path.display()),
            None => String::new(),
        };
        self.status_message = match &outcome {
            ImportOutcome::Applied { backup, statistics } => {
                format!("Imported {}{}", statistics.summary(), backup_note(backup))
            }
            ImportOutcome::Declined { backup } => {
                format!("Import cancelled{}", backup_note(backup))
            }
        };
        Ok(())
    }

    fn confirm_overwrite(&mut self, from: &str, to: &str) -> Result<bool> {
        if from == to || self.state.favorites.group(to).is_none() {
            return Ok(false);
        }
        if self.state.favorites.group(from).is_none() {
            return Ok(false);
        }
        let confirmed = self.prompt.confirm(&format!(
            "Group \"{to}\" already exists and its contents will be lost. Replace it with \"{from}\"?"
        ))?;
        if !confirmed {
            return Err(StoreError::GroupExists(to.to_string()).into());
        }
        Ok(true)
    }

    fn warn_if_ambiguous(&self, key: &BookmarkKey) {
        let count = match &key.scope {
            BookmarkScope::Global => {
                lookup::count_by_label(self.state.bookmarks.for_file(&key.file_path), &key.label)
            }
            BookmarkScope::Group(group) => self
                .state
                .favorites
                .group(group)
                .map_or(0, |g| lookup::match_count(&g.bookmarks, &key.file_path, &key.label)),
        };
        if count > 1 {
            warn!(%key, count, "ambiguous bookmark label; acting on the first match");
        }
    }

    fn nothing_to_do(&mut self, reason: String) {
        warn!(reason = %reason, "command had no effect");
        self.status_message = format!("Nothing to do: {reason}");
    }
}

pub fn run(options: RunOptions) -> Result<()> {
    init_tracing(options.debug);

    let mut config = RuntimeConfig::load().context("load runtime config")?;
    if let Some(path) = options.state_path {
        config.storage.state_path = Some(path);
    }
    if let Some(root) = options.workspace {
        config.workspace.root = Some(root);
    }

    let state_path = config.state_path();
    let state = WorkspaceState::open(&state_path).context("open workspace state")?;
    info!(path = %state_path.display(), "workspace state ready");

    let input = LineInput::stdin();
    let prompt: Box<dyn Prompt> = if options.assume_yes {
        Box::new(FixedAnswer(true))
    } else {
        Box::new(InputPrompt::new(input.clone()))
    };
    let mut app = App::new(state, prompt)
        .with_workspace_root(config.workspace.root.clone())
        .with_import_confirmation(config.import.confirm);

    match options.command.split_first() {
        Some((name, args)) => {
            let command = Command::from_args(name, args)?;
            app.execute(command)?;
            if let Some(output) = &app.output {
                print!("{output}");
            }
            println!("{}", app.status_message);
            Ok(())
        }
        None => Shell::new().run(&mut app, &input),
    }
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "favmarks=debug" } else { "favmarks=info" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .try_init();
}
