//! Team record.

use serde::{Deserialize, Serialize};

use super::{has_text, KeyedRecord};

/// A club. Written once; later writes with the same id are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Team {
    /// Short code used by the league site (e.g. "FLA")
    #[serde(alias = "team_id")]
    pub id: Option<String>,
    #[serde(alias = "team_name")]
    pub name: Option<String>,
    /// Logo image URL
    #[serde(alias = "team_logo")]
    pub logo: Option<String>,
}

impl Team {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }
}

impl KeyedRecord for Team {
    const ENTITY: &'static str = "team";

    fn missing_key(&self) -> Option<&'static str> {
        (!has_text(self.id.as_ref())).then_some("id")
    }
}
