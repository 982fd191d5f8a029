//! Shot event record.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::{has_id, has_text, KeyedRecord};

/// One shot attempt plotted on the shot chart.
///
/// Shots have no natural key: every accepted write appends a row, and `id`
/// is assigned by the database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Shot {
    /// Surrogate id, `None` until stored
    pub id: Option<i64>,
    pub player_id: Option<i32>,
    pub game_id: Option<i32>,
    pub team_id: Option<String>,
    #[serde(alias = "shot_quarter")]
    pub quarter: Option<String>,
    /// Game clock at the attempt
    #[serde(alias = "shot_time")]
    pub time: Option<NaiveTime>,
    pub shot_type: Option<String>,
    #[serde(alias = "shot_x_location")]
    pub x: Option<f64>,
    #[serde(alias = "shot_y_location")]
    pub y: Option<f64>,
}

impl Shot {
    pub fn new(player_id: i32, game_id: i32, team_id: impl Into<String>) -> Self {
        Self {
            player_id: Some(player_id),
            game_id: Some(game_id),
            team_id: Some(team_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn at(mut self, quarter: impl Into<String>, time: NaiveTime) -> Self {
        self.quarter = Some(quarter.into());
        self.time = Some(time);
        self
    }

    #[must_use]
    pub fn located(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    #[must_use]
    pub fn with_type(mut self, shot_type: impl Into<String>) -> Self {
        self.shot_type = Some(shot_type.into());
        self
    }
}

impl KeyedRecord for Shot {
    const ENTITY: &'static str = "shot";

    fn missing_key(&self) -> Option<&'static str> {
        if !has_id(self.player_id) {
            Some("player_id")
        } else if !has_id(self.game_id) {
            Some("game_id")
        } else if !has_text(self.team_id.as_ref()) {
            Some("team_id")
        } else {
            None
        }
    }
}
