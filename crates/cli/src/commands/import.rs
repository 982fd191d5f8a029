//! Import command.
//!
//! Reads scraper output saved as JSON lines and writes it in a single
//! transaction. Each line carries a `kind` tag next to the record fields:
//!
//! ```text
//! {"kind": "team", "id": "FLA", "name": "Flamengo"}
//! {"kind": "shot", "player_id": 5, "game_id": 10, "team_id": "FLA", "shot_type": "3PT"}
//! ```
//!
//! Records are written in file order, so referenced rows must come first.

use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{Context, Result};
use clap::Args;
use nbb_data::{
    ConnectionPool, Game, Player, RosterSeasonLink, Shot, StoreError, Team, TransactionScope,
    WriteSummary,
};
use serde::Deserialize;

/// Arguments for the import command.
#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// JSON-lines file produced by the scraper
    #[arg(short, long)]
    pub file: String,
}

/// One line of the import file.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Team(Team),
    Player(Player),
    RosterLink(RosterSeasonLink),
    Game(Game),
    Shot(Shot),
}

/// Per-table tallies of an import.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub teams: WriteSummary,
    pub players: WriteSummary,
    pub roster_links: WriteSummary,
    pub games: WriteSummary,
    pub shots: WriteSummary,
    /// Records that changed a table (inserted or updated).
    pub written: usize,
}

impl ImportReport {
    fn lines(&self) -> [(&'static str, &WriteSummary); 5] {
        [
            ("teams", &self.teams),
            ("players", &self.players),
            ("roster links", &self.roster_links),
            ("games", &self.games),
            ("shots", &self.shots),
        ]
    }
}

/// Parses JSON lines, ignoring blank lines.
///
/// # Errors
/// Returns an error naming the first line that is not a valid record.
pub fn parse_records(reader: impl BufRead) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(&line)
            .with_context(|| format!("Invalid record on line {}", index + 1))?;
        records.push(record);
    }
    Ok(records)
}

async fn write_records(
    scope: &mut TransactionScope,
    records: &[Record],
) -> Result<ImportReport, StoreError> {
    let mut report = ImportReport::default();
    for record in records {
        let (summary, outcome) = match record {
            Record::Team(team) => (&mut report.teams, scope.insert_team(team).await?),
            Record::Player(player) => (&mut report.players, scope.insert_player(player).await?),
            Record::RosterLink(link) => {
                (&mut report.roster_links, scope.insert_roster_link(link).await?)
            }
            Record::Game(game) => (&mut report.games, scope.insert_game(game).await?),
            Record::Shot(shot) => (&mut report.shots, scope.insert_shot(shot).await?),
        };
        if outcome.is_written() {
            report.written += 1;
        }
        summary.record(outcome);
    }
    Ok(report)
}

/// Runs the import command.
///
/// # Errors
/// Returns an error if the file cannot be parsed or any record is rejected
/// by the database; nothing from the file is kept in that case.
pub async fn run_import(pool: &ConnectionPool, args: ImportArgs) -> Result<()> {
    let file = File::open(&args.file).with_context(|| format!("Failed to open {}", args.file))?;
    let records = parse_records(BufReader::new(file))?;
    tracing::info!("Importing {} record(s) from {}", records.len(), args.file);

    let report = pool
        .run_in_scope(move |scope| Box::pin(async move { write_records(scope, &records).await }))
        .await
        .context("Import rolled back")?;

    if report.written == 0 {
        println!("Nothing new to store.");
    }

    for (table, summary) in report.lines() {
        if summary.total() == 0 {
            continue;
        }
        println!(
            "{:<13} inserted {:>5}  updated {:>5}  unchanged {:>5}  skipped {:>5}",
            table, summary.inserted, summary.updated, summary.ignored, summary.skipped
        );
    }

    Ok(())
}
