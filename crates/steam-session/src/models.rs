//! Identity, token, and statistics types, plus the endpoint response bodies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity issued by the Auth Endpoint after a Steam login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub steam_id: String,
    pub username: String,
    pub avatar_url: String,
}

/// Opaque bearer credential. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(<{} chars>)", self.0.len())
    }
}

/// Snapshot of a player's counters as computed by the Stats Endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub headshots: i64,
    pub kd_ratio: f64,
    pub matches_played: i64,
    pub matches_won: i64,
    pub win_rate: f64,
    pub headshot_rate: f64,
    pub playtime_hours: f64,
    pub level: i64,
    pub experience: i64,
    pub rank: i64,
}

/// Partial stats update. Only `Some` fields are sent.
///
/// The endpoint recomputes `kd_ratio`, `win_rate`, `headshot_rate` and
/// `rank` itself and ignores them in updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kills: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deaths: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assists: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headshots: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kd_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches_played: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches_won: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headshot_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playtime_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
}

impl PlayerStatsPatch {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The `user` half of a stats payload. The Stats Endpoint does not echo the
/// numeric id, so it is optional here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub steam_id: String,
    pub username: String,
    pub avatar_url: String,
}

/// `{ user, stats }` as returned by both stats operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub user: StatsUser,
    pub stats: PlayerStats,
}

/// Login initiation response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRedirect {
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// Callback completion response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub session_token: Option<SessionToken>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Token verification response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub user: Option<User>,
}
