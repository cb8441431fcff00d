//! Profile page data: the cached user plus whatever stats can be fetched.

use crate::models::{PlayerStats, User};
use crate::session::SessionManager;
use crate::stats::StatsClient;
use serde::Serialize;
use tracing::debug;

/// Experience needed to go up one level.
pub const EXPERIENCE_PER_LEVEL: i64 = 1000;

/// Result of [`load_profile`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileLoad {
    /// No cached user; the host should send the visitor home.
    RedirectHome,
    Ready(Profile),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub user: User,
    /// `None` when the stats fetch failed.
    pub stats: Option<PlayerStats>,
}

impl Profile {
    pub fn level_progress(&self) -> Option<LevelProgress> {
        self.stats
            .as_ref()
            .map(|stats| LevelProgress::from_experience(stats.experience))
    }

    pub fn achievements(&self) -> Vec<AchievementProgress> {
        self.stats
            .as_ref()
            .map(AchievementProgress::all)
            .unwrap_or_default()
    }
}

/// Load the profile for the current session.
///
/// Only the cached user gates the page; stats are fetched best-effort.
pub async fn load_profile(session: &SessionManager, stats: &StatsClient) -> ProfileLoad {
    let Some(user) = session.cached_user() else {
        debug!("No cached user, profile unavailable");
        return ProfileLoad::RedirectHome;
    };

    let stats = stats.fetch_stats().await.map(|snapshot| snapshot.stats);
    ProfileLoad::Ready(Profile { user, stats })
}

/// Experience within the current level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelProgress {
    pub current: i64,
    pub required: i64,
    pub percent: f64,
}

impl LevelProgress {
    pub fn from_experience(experience: i64) -> Self {
        let current = experience.rem_euclid(EXPERIENCE_PER_LEVEL);
        Self {
            current,
            required: EXPERIENCE_PER_LEVEL,
            percent: current as f64 / EXPERIENCE_PER_LEVEL as f64 * 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    /// 1000 headshot kills.
    Headshots1000,
    /// 100 matches won.
    Wins100,
}

impl Achievement {
    pub const ALL: [Achievement; 2] = [Achievement::Headshots1000, Achievement::Wins100];

    pub fn title(&self) -> &'static str {
        match self {
            Achievement::Headshots1000 => "Sniper",
            Achievement::Wins100 => "Winner",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::Headshots1000 => "1000+ headshot kills",
            Achievement::Wins100 => "100+ matches won",
        }
    }

    pub fn target(&self) -> i64 {
        match self {
            Achievement::Headshots1000 => 1000,
            Achievement::Wins100 => 100,
        }
    }

    fn current(&self, stats: &PlayerStats) -> i64 {
        match self {
            Achievement::Headshots1000 => stats.headshots,
            Achievement::Wins100 => stats.matches_won,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementProgress {
    pub achievement: Achievement,
    pub current: i64,
    pub target: i64,
    pub completed: bool,
}

impl AchievementProgress {
    pub fn new(achievement: Achievement, stats: &PlayerStats) -> Self {
        let current = achievement.current(stats);
        let target = achievement.target();
        Self {
            achievement,
            current,
            target,
            completed: current >= target,
        }
    }

    pub fn all(stats: &PlayerStats) -> Vec<Self> {
        Achievement::ALL
            .iter()
            .map(|achievement| Self::new(*achievement, stats))
            .collect()
    }
}
