pub mod bookmarks;
pub mod config;
pub mod favorites;
pub mod state;
pub mod transfer;
