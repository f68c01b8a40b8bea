use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::domain::models::BookmarkKey;

pub const HELP: &str = "\
add <group> <path>                         add a file, creating the group if needed
add-to-group <group> <path>                add a file to an existing group
create-group <name>                        create an empty group
rename-group <old> <new> [--force]         rename; --force replaces an existing target
delete-group <name>                        delete a group and its bookmarks
remove-favorite <path>                     remove a file from its group
move <group> <from> <to>                   move <from> to the position of <to>
bookmark <path> <line> [description]       add a global bookmark
group-bookmark <group> <path> <line> [description]
remove-bookmark <path> <label>             remove a global bookmark
remove-group-bookmark <group> <path> <label>
rename-bookmark <path> <label> <description>
rename-group-bookmark <group> <path> <label> <description>
clear-file <path>                          remove all global bookmarks of a file
clear-bookmarks                            remove every global bookmark
clear-group-bookmarks <group>              remove every bookmark of a group
alias <path> <alias>                       show <alias> instead of the path
unalias <path>
export <file>                              write favorites and bookmarks to <file>
import <file>                              replace everything with the contents of <file>
list [query]                               print the tree, optionally fuzzy-filtered
stats
help
quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddFile {
        group: String,
        path: String,
    },
    AddToGroup {
        group: String,
        path: String,
    },
    CreateGroup(String),
    RenameGroup {
        from: String,
        to: String,
        overwrite: bool,
    },
    DeleteGroup(String),
    RemoveFavorite(String),
    MoveFile {
        group: String,
        from: String,
        to: String,
    },
    AddBookmark {
        group: Option<String>,
        path: String,
        line: u32,
        description: Option<String>,
    },
    RemoveBookmark(BookmarkKey),
    RenameBookmark {
        key: BookmarkKey,
        description: String,
    },
    ClearFile(String),
    ClearBookmarks,
    ClearGroupBookmarks(String),
    Alias {
        path: String,
        alias: String,
    },
    Unalias(String),
    Export(PathBuf),
    Import(PathBuf),
    List(String),
    Stats,
    Help,
    Quit,
}

impl Command {
    /// Parse one shell line such as `/rename-group "Old name" New`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if !trimmed.starts_with('/') {
            return Err(anyhow!("commands must start with '/'"));
        }

        let words = split_words(&trimmed[1..])?;
        let (name, args) = words
            .split_first()
            .ok_or_else(|| anyhow!("empty command"))?;
        Self::from_args(name, args)
    }

    /// Build a command from already-split words (command-line arguments).
    pub fn from_args(name: &str, args: &[String]) -> Result<Self> {
        let mut args = Args::new(name, args);

        let command = match name {
            "add" => Self::AddFile {
                group: args.required("group")?,
                path: args.required("path")?,
            },
            "add-to-group" => Self::AddToGroup {
                group: args.required("group")?,
                path: args.required("path")?,
            },
            "create-group" => Self::CreateGroup(args.rest_required("name")?),
            "rename-group" => {
                let overwrite = args.take_flag("--force");
                Self::RenameGroup {
                    from: args.required("old name")?,
                    to: args.required("new name")?,
                    overwrite,
                }
            }
            "delete-group" => Self::DeleteGroup(args.rest_required("name")?),
            "remove-favorite" => Self::RemoveFavorite(args.required("path")?),
            "move" => Self::MoveFile {
                group: args.required("group")?,
                from: args.required("from")?,
                to: args.required("to")?,
            },
            "bookmark" => Self::AddBookmark {
                group: None,
                path: args.required("path")?,
                line: args.line()?,
                description: args.rest(),
            },
            "group-bookmark" => Self::AddBookmark {
                group: Some(args.required("group")?),
                path: args.required("path")?,
                line: args.line()?,
                description: args.rest(),
            },
            "remove-bookmark" => {
                let path = args.required("path")?;
                Self::RemoveBookmark(BookmarkKey::global(path, args.rest_required("label")?))
            }
            "remove-group-bookmark" => {
                let group = args.required("group")?;
                let path = args.required("path")?;
                Self::RemoveBookmark(BookmarkKey::in_group(
                    group,
                    path,
                    args.rest_required("label")?,
                ))
            }
            "rename-bookmark" => {
                let path = args.required("path")?;
                let label = args.required("label")?;
                Self::RenameBookmark {
                    key: BookmarkKey::global(path, label),
                    description: args.rest().unwrap_or_default(),
                }
            }
            "rename-group-bookmark" => {
                let group = args.required("group")?;
                let path = args.required("path")?;
                let label = args.required("label")?;
                Self::RenameBookmark {
                    key: BookmarkKey::in_group(group, path, label),
                    description: args.rest().unwrap_or_default(),
                }
            }
            "clear-file" => Self::ClearFile(args.required("path")?),
            "clear-bookmarks" => Self::ClearBookmarks,
            "clear-group-bookmarks" => Self::ClearGroupBookmarks(args.rest_required("group")?),
            "alias" => Self::Alias {
                path: args.required("path")?,
                alias: args.rest_required("alias")?,
            },
            "unalias" => Self::Unalias(args.required("path")?),
            "export" => Self::Export(PathBuf::from(args.required("file")?)),
            "import" => Self::Import(PathBuf::from(args.required("file")?)),
            "list" | "ls" => Self::List(args.rest().unwrap_or_default()),
            "stats" => Self::Stats,
            "help" => Self::Help,
            "quit" | "q" => Self::Quit,
            _ => return Err(anyhow!("unknown command: {name}")),
        };

        args.finish()?;
        Ok(command)
    }
}

struct Args<'a> {
    command: &'a str,
    words: Vec<&'a str>,
}

impl<'a> Args<'a> {
    fn new(command: &'a str, words: &'a [String]) -> Self {
        Self {
            command,
            words: words.iter().map(String::as_str).collect(),
        }
    }

    fn required(&mut self, what: &str) -> Result<String> {
        if self.words.is_empty() {
            return Err(anyhow!("{}: missing <{what}>", self.command));
        }
        Ok(self.words.remove(0).to_string())
    }

    fn line(&mut self) -> Result<u32> {
        let raw = self.required("line")?;
        let line = raw
            .parse::<u32>()
            .map_err(|_| anyhow!("{}: line must be a positive integer, got '{raw}'", self.command))?;
        if line == 0 {
            return Err(anyhow!("{}: line must be >= 1", self.command));
        }
        Ok(line)
    }

    fn take_flag(&mut self, flag: &str) -> bool {
        let before = self.words.len();
        self.words.retain(|word| *word != flag);
        self.words.len() != before
    }

    /// Remaining words joined by single spaces, if any.
    fn rest(&mut self) -> Option<String> {
        if self.words.is_empty() {
            return None;
        }
        let joined = self.words.join(" ");
        self.words.clear();
        Some(joined)
    }

    fn rest_required(&mut self, what: &str) -> Result<String> {
        self.rest()
            .ok_or_else(|| anyhow!("{}: missing <{what}>", self.command))
    }

    fn finish(self) -> Result<()> {
        if self.words.is_empty() {
            Ok(())
        } else {
            Err(anyhow!(
                "{}: unexpected arguments: {}",
                self.command,
                self.words.join(" ")
            ))
        }
    }
}

/// Whitespace split honoring double quotes, so `"Imported Group"` stays whole.
pub fn split_words(input: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    words.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err(anyhow!("unterminated quote"));
    }
    if !current.is_empty() || quoted {
        words.push(current);
    }
    Ok(words)
}
