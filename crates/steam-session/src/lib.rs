//! Steam-backed session lifecycle for gamehub.
//!
//! This crate provides:
//! - [`SessionManager`]: login, provider callback, verify, logout
//! - [`StatsClient`]: read and patch the signed-in player's stats
//! - Typed Auth and Stats Endpoint clients behind [`AuthApi`] / [`StatsApi`]
//! - Profile assembly with level progress and achievements
//!
//! Persistence goes through [`hub_storage::SessionStore`], so the same code
//! runs against a file on disk or an in-memory map.

mod auth_client;
mod callback;
mod error;
mod http;
mod models;
mod navigator;
mod profile;
mod session;
mod stats;

pub use auth_client::{AuthApi, AuthRequest, HttpAuthClient};
pub use callback::{CallbackParams, AUTH_CALLBACK_PARAM, CLAIMED_ID_PARAM};
pub use error::{AuthError, AuthResult};
pub use models::{
    CallbackResponse, LoginRedirect, PlayerStats, PlayerStatsPatch, SessionToken, StatsSnapshot,
    StatsUser, User, VerifyResponse,
};
pub use navigator::{Navigator, RecordingNavigator};
pub use profile::{
    load_profile, Achievement, AchievementProgress, LevelProgress, Profile, ProfileLoad,
    EXPERIENCE_PER_LEVEL,
};
pub use session::{AuthCheck, SessionManager, SessionState};
pub use stats::{HttpStatsClient, StatsApi, StatsClient};
