use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

const STATE_DIR: &str = ".favmarks";
const STATE_FILE: &str = "state.json";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    pub state_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceConfig {
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Ask before an import replaces the current data.
    pub confirm: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { confirm: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub storage: StorageConfig,
    pub workspace: WorkspaceConfig,
    pub import: ImportConfig,
}

impl RuntimeConfig {
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("FAVMARKS_CONFIG") {
            return PathBuf::from(path);
        }
        home_dir().join(".config/favmarks/config.toml")
    }

    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_file(path)?;
        config.merge_env()?;
        Ok(config)
    }

    /// Explicit path first, then `<workspace>/.favmarks/state.json`, then the
    /// per-user fallback.
    pub fn state_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.state_path {
            return path.clone();
        }
        match &self.workspace.root {
            Some(root) => root.join(STATE_DIR).join(STATE_FILE),
            None => home_dir().join(".config/favmarks").join(STATE_FILE),
        }
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading config file: {}", path.display()))?;
        self.merge_toml_text(&content)
            .with_context(|| format!("failed parsing config TOML: {}", path.display()))
    }

    fn merge_toml_text(&mut self, content: &str) -> Result<()> {
        for entry in parse_entries(content)? {
            self.apply_entry(&entry)
                .with_context(|| format!("line {}: [{}] {}", entry.line, entry.section, entry.key))?;
        }
        Ok(())
    }

    fn apply_entry(&mut self, entry: &Entry) -> Result<()> {
        match (entry.section.as_str(), entry.key.as_str()) {
            ("storage", "state_path") => {
                self.storage.state_path = entry.value.path()?;
            }
            ("workspace", "root") => {
                self.workspace.root = entry.value.path()?;
            }
            ("import", "confirm") => {
                self.import.confirm = entry.value.flag()?;
            }
            (section, key) => debug!(section, key, "ignoring unknown config key"),
        }
        Ok(())
    }

    fn merge_env(&mut self) -> Result<()> {
        if let Ok(path) = env::var("FAVMARKS_STATE_PATH") {
            self.storage.state_path = non_empty(path).map(PathBuf::from);
        }
        if let Ok(root) = env::var("FAVMARKS_WORKSPACE_ROOT") {
            self.workspace.root = non_empty(root).map(PathBuf::from);
        }
        if let Ok(confirm) = env::var("FAVMARKS_IMPORT_CONFIRM") {
            self.import.confirm = parse_bool(&confirm).context("invalid FAVMARKS_IMPORT_CONFIRM")?;
        }

        Ok(())
    }
}

fn home_dir() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(anyhow!("invalid boolean '{value}' (expected true or false)")),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// One `key = value` line together with the table it appeared under.
#[derive(Debug)]
struct Entry {
    line: usize,
    section: String,
    key: String,
    value: Scalar,
}

#[derive(Debug)]
enum Scalar {
    Text(String),
    Flag(bool),
}

impl Scalar {
    fn path(&self) -> Result<Option<PathBuf>> {
        match self {
            Self::Text(text) => Ok(non_empty(text.clone()).map(PathBuf::from)),
            Self::Flag(_) => Err(anyhow!("expected a quoted path")),
        }
    }

    fn flag(&self) -> Result<bool> {
        match self {
            Self::Flag(flag) => Ok(*flag),
            Self::Text(text) => parse_bool(text),
        }
    }
}

/// Minimal TOML subset: `[table]` headers, `key = "string"` and
/// `key = true|false`, `#` comments outside quotes.
fn parse_entries(content: &str) -> Result<Vec<Entry>> {
    let mut section = String::new();
    let mut entries = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = without_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or_else(|| anyhow!("line {line_no}: unterminated table header"))?;
            section = name.trim().to_string();
            continue;
        }

        let Some((key, raw_value)) = line.split_once('=') else {
            return Err(anyhow!("line {line_no}: expected key = value"));
        };
        let value = scalar(raw_value.trim()).with_context(|| format!("line {line_no}"))?;
        entries.push(Entry {
            line: line_no,
            section: section.clone(),
            key: key.trim().to_string(),
            value,
        });
    }

    Ok(entries)
}

fn without_comment(line: &str) -> &str {
    let mut quoted = false;
    for (idx, ch) in line.char_indices() {
        if ch == '"' {
            quoted = !quoted;
        } else if ch == '#' && !quoted {
            return &line[..idx];
        }
    }
    line
}

fn scalar(raw: &str) -> Result<Scalar> {
    if let Some(body) = raw.strip_prefix('"') {
        let text = body
            .strip_suffix('"')
            .ok_or_else(|| anyhow!("unterminated string"))?;
        return Ok(Scalar::Text(text.to_string()));
    }
    Ok(match raw {
        "true" => Scalar::Flag(true),
        "false" => Scalar::Flag(false),
        other => Scalar::Text(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_file_sections() {
        let mut config = RuntimeConfig::default();
        config
            .merge_toml_text(
                r#"
                    # per-user settings
                    [storage]
                    state_path = "/tmp/favmarks/state.json"

                    [workspace]
                    root = "/home/dev/project"

                    [import]
                    confirm = false
                "#,
            )
            .expect("merge config text");

        assert_eq!(
            config.storage.state_path,
            Some(PathBuf::from("/tmp/favmarks/state.json"))
        );
        assert_eq!(
            config.workspace.root,
            Some(PathBuf::from("/home/dev/project"))
        );
        assert!(!config.import.confirm);
    }

    #[test]
    fn state_path_falls_back_to_workspace_root() {
        let mut config = RuntimeConfig::default();
        config.workspace.root = Some(PathBuf::from("/work/app"));
        assert_eq!(
            config.state_path(),
            PathBuf::from("/work/app/.favmarks/state.json")
        );

        config.storage.state_path = Some(PathBuf::from("/elsewhere.json"));
        assert_eq!(config.state_path(), PathBuf::from("/elsewhere.json"));
    }

    #[test]
    fn invalid_boolean_in_file_is_rejected() {
        let mut config = RuntimeConfig::default();
        let err = config
            .merge_toml_text(
                r#"
                    [import]
                    confirm = "sometimes"
                "#,
            )
            .expect_err("invalid boolean should fail");
        assert!(format!("{err:#}").contains("invalid boolean"));
        assert!(err.to_string().contains("[import] confirm"));
    }

    #[test]
    fn unknown_keys_are_ignored_and_bad_headers_fail() {
        let mut config = RuntimeConfig::default();
        config
            .merge_toml_text("[ui]\ntheme = \"dark\"\n")
            .expect("unknown keys are ignored");
        assert_eq!(config, RuntimeConfig::default());

        let err = config
            .merge_toml_text("[storage\nstate_path = \"/x\"\n")
            .expect_err("bad header");
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn hash_inside_quotes_is_not_a_comment() {
        let mut config = RuntimeConfig::default();
        config
            .merge_toml_text("[workspace]\nroot = \"/src/#proj\" # trailing\n")
            .expect("merge config text");
        assert_eq!(config.workspace.root, Some(PathBuf::from("/src/#proj")));
    }
}
