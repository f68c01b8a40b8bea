pub mod commands;
pub mod errors;
pub mod lookup;
pub mod migration;
pub mod models;
pub mod quick_pick;
