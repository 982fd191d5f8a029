//! PostgreSQL persistence for NBB game data.
//!
//! This crate provides:
//! - A bounded connection pool ([`ConnectionPool`])
//! - Transaction scopes with commit-or-rollback release ([`TransactionScope`])
//! - Idempotent schema creation ([`SchemaManager`])
//! - Typed entity records and one repository per table, each with a fixed
//!   conflict policy

pub mod error;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;
pub mod scope;

pub use error::{ConstraintKind, StoreError};
pub use pool::ConnectionPool;
pub use schema::SchemaManager;
pub use scope::TransactionScope;

// Re-export models
pub use models::{Game, KeyedRecord, Player, RosterSeasonLink, Shot, Team};

// Re-export repositories
pub use repositories::{
    GameRepository, PlayerRepository, RosterRepository, ShotRepository, TeamRepository,
    WriteOutcome, WriteSummary,
};
