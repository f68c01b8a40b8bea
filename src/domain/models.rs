use std::fmt;

use serde::{Deserialize, Serialize};

/// A marked line in a file.
///
/// Bookmarks carry no persisted identifier. They are addressed through
/// [`BookmarkKey`], built from the owning scope, the file path and the
/// effective label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub file_path: String,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub timestamp: i64,
}

impl Bookmark {
    pub fn new(file_path: impl Into<String>, line: u32, description: Option<String>) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            description: description.filter(|d| !d.is_empty()),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// The display string that doubles as the bookmark's identity.
    pub fn effective_label(&self) -> String {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => description.to_string(),
            _ => format!("Line {}", self.line),
        }
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = if description.is_empty() {
            None
        } else {
            Some(description.to_string())
        };
    }
}

/// A named, ordered set of files plus the bookmarks scoped to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

impl Group {
    pub fn with_files(files: Vec<String>) -> Self {
        Self {
            files,
            bookmarks: Vec::new(),
        }
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.files.iter().any(|f| f == path)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.bookmarks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BookmarkScope {
    Global,
    Group(String),
}

impl fmt::Display for BookmarkScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Group(name) => write!(f, "group '{name}'"),
        }
    }
}

/// Derived identity of a bookmark: `(scope, file path, effective label)`.
///
/// Two bookmarks sharing all three parts are indistinguishable; lookups
/// resolve to the first one in storage order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookmarkKey {
    pub scope: BookmarkScope,
    pub file_path: String,
    pub label: String,
}

impl BookmarkKey {
    pub fn global(file_path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            scope: BookmarkScope::Global,
            file_path: file_path.into(),
            label: label.into(),
        }
    }

    pub fn in_group(
        group: impl Into<String>,
        file_path: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            scope: BookmarkScope::Group(group.into()),
            file_path: file_path.into(),
            label: label.into(),
        }
    }

    pub fn of(scope: BookmarkScope, bookmark: &Bookmark) -> Self {
        Self {
            scope,
            file_path: bookmark.file_path.clone(),
            label: bookmark.effective_label(),
        }
    }
}

impl fmt::Display for BookmarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} ({})", self.label, self.file_path, self.scope)
    }
}
