use thiserror::Error;

/// Failures of store operations that the caller is expected to report.
///
/// No-op conditions (removing something that is not there) are not errors;
/// the operations return `false` for those instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("group not found: {name}{}", did_you_mean(.suggestion))]
    GroupNotFound {
        name: String,
        suggestion: Option<String>,
    },

    #[error("group already exists: {0}")]
    GroupExists(String),

    #[error("group name cannot be empty")]
    InvalidGroupName,

    #[error("line numbers start at 1 (got {0})")]
    InvalidLine(u32),

    #[error("invalid data format: {0}")]
    InvalidFormat(String),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{name}'?)"),
        None => String::new(),
    }
}
