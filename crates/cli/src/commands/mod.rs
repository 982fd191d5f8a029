//! CLI commands for the NBB game-data store.

pub mod game_ids;
pub mod import;
pub mod setup;

pub use game_ids::{run_game_ids, GameIdsArgs};
pub use import::{run_import, ImportArgs};
pub use setup::run_setup;
