use std::fmt::Write as _;
use std::path::Path;

use crate::domain::models::{BookmarkKey, BookmarkScope};
use crate::domain::quick_pick;
use crate::storage::state::WorkspaceState;

/// One row of the favorites tree. Each kind carries only what it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Group {
        name: String,
    },
    File {
        group: String,
        path: String,
        label: String,
    },
    GroupBookmarks {
        group: String,
        count: usize,
    },
    Bookmark {
        key: BookmarkKey,
        line: u32,
    },
    BookmarksRoot {
        count: usize,
    },
    BookmarkFile {
        path: String,
        label: String,
        count: usize,
    },
}

impl TreeNode {
    pub fn label(&self) -> String {
        match self {
            Self::Group { name } => name.clone(),
            Self::File { label, .. } => label.clone(),
            Self::GroupBookmarks { count, .. } => format!("Bookmarks ({count})"),
            Self::Bookmark { key, line } => {
                if key.label == format!("Line {line}") {
                    key.label.clone()
                } else {
                    format!("{} (line {line})", key.label)
                }
            }
            Self::BookmarksRoot { count } => format!("Bookmarks ({count})"),
            Self::BookmarkFile { label, count, .. } => format!("{label} ({count})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub node: TreeNode,
    pub children: Vec<TreeItem>,
}

impl TreeItem {
    fn leaf(node: TreeNode) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }
}

/// Groups (fuzzy-filtered by `query`) followed by the global bookmarks.
pub fn build(state: &WorkspaceState, workspace_root: Option<&Path>, query: &str) -> Vec<TreeItem> {
    let mut items = Vec::new();

    for name in quick_pick::rank(state.favorites.group_names(), query) {
        let Some(group) = state.favorites.group(&name) else {
            continue;
        };

        let mut children: Vec<TreeItem> = group
            .files
            .iter()
            .map(|path| {
                TreeItem::leaf(TreeNode::File {
                    group: name.clone(),
                    path: path.clone(),
                    label: display_path(state, workspace_root, path),
                })
            })
            .collect();

        if !group.bookmarks.is_empty() {
            children.push(TreeItem {
                node: TreeNode::GroupBookmarks {
                    group: name.clone(),
                    count: group.bookmarks.len(),
                },
                children: group
                    .bookmarks
                    .iter()
                    .map(|bookmark| {
                        TreeItem::leaf(TreeNode::Bookmark {
                            key: BookmarkKey::of(BookmarkScope::Group(name.clone()), bookmark),
                            line: bookmark.line,
                        })
                    })
                    .collect(),
            });
        }

        items.push(TreeItem {
            node: TreeNode::Group { name },
            children,
        });
    }

    if !state.bookmarks.is_empty() && query.trim().is_empty() {
        let files = state
            .bookmarks
            .files()
            .map(|(path, list)| TreeItem {
                node: TreeNode::BookmarkFile {
                    path: path.clone(),
                    label: display_path(state, workspace_root, path),
                    count: list.len(),
                },
                children: list
                    .iter()
                    .map(|bookmark| {
                        TreeItem::leaf(TreeNode::Bookmark {
                            key: BookmarkKey::global(path.clone(), bookmark.effective_label()),
                            line: bookmark.line,
                        })
                    })
                    .collect(),
            })
            .collect();

        items.push(TreeItem {
            node: TreeNode::BookmarksRoot {
                count: state.bookmarks.bookmark_count(),
            },
            children: files,
        });
    }

    items
}

pub fn render(items: &[TreeItem]) -> String {
    let mut out = String::new();
    for item in items {
        render_item(&mut out, item, 0);
    }
    out
}

fn render_item(out: &mut String, item: &TreeItem, depth: usize) {
    let _ = writeln!(out, "{}{}", "  ".repeat(depth), item.node.label());
    for child in &item.children {
        render_item(out, child, depth + 1);
    }
}

/// Alias if one is set, else the path relative to the workspace root.
fn display_path(state: &WorkspaceState, workspace_root: Option<&Path>, path: &str) -> String {
    if let Some(alias) = state.alias(path) {
        return alias.to_string();
    }
    workspace_root
        .and_then(|root| Path::new(path).strip_prefix(root).ok())
        .map(|relative| relative.display().to_string())
        .unwrap_or_else(|| path.to_string())
}
