//! Player record.

use serde::{Deserialize, Serialize};

use super::{has_id, KeyedRecord};

/// A player. Written once; later writes with the same id are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Player {
    #[serde(alias = "player_id")]
    pub id: Option<i32>,
    #[serde(alias = "player_name")]
    pub name: Option<String>,
    #[serde(alias = "player_icon_url")]
    pub icon_url: Option<String>,
}

impl Player {
    #[must_use]
    pub fn new(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_icon_url(mut self, url: impl Into<String>) -> Self {
        self.icon_url = Some(url.into());
        self
    }
}

impl KeyedRecord for Player {
    const ENTITY: &'static str = "player";

    fn missing_key(&self) -> Option<&'static str> {
        (!has_id(self.id)).then_some("id")
    }
}
