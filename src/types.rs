//! Core data model: player identities and the persisted per-player record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Current on-disk layout version for [`PlayerRecord`].
pub const PLAYER_SCHEMA_VERSION: u8 = 1;

/// Stable player identity (the game server's UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new_random() -> Self {
        PlayerId(Uuid::new_v4())
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(PlayerId)
    }
}

impl From<Uuid> for PlayerId {
    fn from(value: Uuid) -> Self {
        PlayerId(value)
    }
}

/// Persisted life-steal state for one player.
///
/// `max_health` is stored in half-heart units, so a player with 10 hearts has
/// `max_health == 20.0`. Other plugins may write odd values; [`PlayerRecord::hearts`]
/// truncates rather than rounds so those values read back the same way everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub schema_version: u8,
    pub uuid: PlayerId,
    pub name: String,
    pub max_health: f64,
    pub lives: i32,
    pub ban_count: i32,
    pub revive_count: i32,
    pub hearts_gained: i32,
    pub hearts_lost: i32,
    pub killed_other_players: i32,
    pub first_join: DateTime<Utc>,
}

impl PlayerRecord {
    pub fn new(uuid: PlayerId, name: impl Into<String>, hearts: u32) -> Self {
        Self {
            schema_version: PLAYER_SCHEMA_VERSION,
            uuid,
            name: name.into(),
            max_health: f64::from(hearts) * 2.0,
            lives: 1,
            ban_count: 0,
            revive_count: 0,
            hearts_gained: 0,
            hearts_lost: 0,
            killed_other_players: 0,
            first_join: Utc::now(),
        }
    }

    /// Whole hearts currently granted (`max_health / 2`, truncated).
    pub fn hearts(&self) -> i64 {
        (self.max_health / 2.0) as i64
    }
}
