//! Entity records as they arrive from the scraper.
//!
//! Every field is optional: the upstream pipeline may leave any of them out.
//! Writers check the key fields through [`KeyedRecord::missing_key`] and
//! skip records that cannot be stored.

pub mod game;
pub mod player;
pub mod roster;
pub mod shot;
pub mod team;

pub use game::Game;
pub use player::Player;
pub use roster::RosterSeasonLink;
pub use shot::Shot;
pub use team::Team;

use serde::{Deserialize, Deserializer};

/// A record with key fields that must be present before it can be written.
pub trait KeyedRecord: std::fmt::Debug {
    /// Entity name used in log lines.
    const ENTITY: &'static str;

    /// Name of the first absent key field, or `None` if the record is complete.
    fn missing_key(&self) -> Option<&'static str>;
}

/// Blank strings count as absent.
pub(crate) fn has_text(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// The scraper reports unknown ids as 0.
pub(crate) fn has_id(value: Option<i32>) -> bool {
    value.is_some_and(|v| v != 0)
}

/// Accepts a label the scraper may emit either as text or as a bare number
/// (`"23"` or `23`).
pub(crate) fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(Option::<Label>::deserialize(deserializer)?.map(|label| match label {
        Label::Text(s) => s,
        Label::Signed(n) => n.to_string(),
        Label::Unsigned(n) => n.to_string(),
    }))
}
