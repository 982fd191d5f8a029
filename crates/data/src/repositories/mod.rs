//! Write and read paths, one repository per table.
//!
//! Repositories run on a borrowed connection, normally the one held by a
//! [`crate::TransactionScope`]. Each table has a fixed conflict policy:
//! teams, players and roster links keep the first write, games keep the
//! last write, shots append.

pub mod game_repo;
pub mod player_repo;
pub mod roster_repo;
pub mod shot_repo;
pub mod team_repo;

pub use game_repo::GameRepository;
pub use player_repo::PlayerRepository;
pub use roster_repo::RosterRepository;
pub use shot_repo::ShotRepository;
pub use team_repo::TeamRepository;

use std::fmt::Display;

use tracing::{error, warn};

use crate::error::StoreError;
use crate::models::KeyedRecord;

/// What a single write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A new row was stored.
    Inserted,
    /// An existing row was overwritten.
    Updated,
    /// The key already existed; the stored row was left as is.
    Ignored,
    /// A key field was missing; nothing was sent to the database.
    Skipped { missing: &'static str },
}

impl WriteOutcome {
    /// True if the write changed the table.
    #[must_use]
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Inserted | Self::Updated)
    }

    fn from_rows_affected(rows: u64) -> Self {
        if rows == 0 {
            Self::Ignored
        } else {
            Self::Inserted
        }
    }
}

/// Tally of a batch write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub inserted: usize,
    pub updated: usize,
    pub ignored: usize,
    pub skipped: usize,
}

impl WriteSummary {
    pub fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Inserted => self.inserted += 1,
            WriteOutcome::Updated => self.updated += 1,
            WriteOutcome::Ignored => self.ignored += 1,
            WriteOutcome::Skipped { .. } => self.skipped += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.ignored + self.skipped
    }
}

/// Checks the key fields; logs and returns the skip outcome when one is absent.
fn precheck<R: KeyedRecord>(record: &R) -> Option<WriteOutcome> {
    let missing = record.missing_key()?;
    warn!(
        "Skipping {} without {}: {:?}",
        R::ENTITY,
        missing,
        record
    );
    Some(WriteOutcome::Skipped { missing })
}

fn write_failed(entity: &str, key: impl Display, err: sqlx::Error) -> StoreError {
    let err = StoreError::from(err);
    error!("Failed to write {} {}: {}", entity, key, err);
    err
}
