#![allow(dead_code)]

use hub_storage::{memory_store, SessionStore};
use serde_json::{json, Value};
use std::sync::Arc;
use steam_session::{
    HttpAuthClient, HttpStatsClient, RecordingNavigator, SessionManager, StatsClient, User,
};
use url::Url;
use wiremock::MockServer;

pub const ORIGIN: &str = "http://localhost:5173";

pub const CALLBACK_QUERY: &str = "auth_callback=true\
    &openid.ns=http%3A%2F%2Fspecs.openid.net%2Fauth%2F2.0\
    &openid.mode=id_res\
    &openid.claimed_id=https%3A%2F%2Fsteamcommunity.com%2Fopenid%2Fid%2F76561198000000001\
    &openid.identity=https%3A%2F%2Fsteamcommunity.com%2Fopenid%2Fid%2F76561198000000001\
    &openid.sig=c2lnbmF0dXJl";

/// Session manager and stats client wired to mock endpoints over one store.
pub struct Harness {
    pub store: SessionStore,
    pub session: SessionManager,
    pub stats: StatsClient,
    pub navigator: Arc<RecordingNavigator>,
}

pub fn harness(auth: &MockServer, stats: &MockServer) -> Harness {
    harness_with_store(memory_store(), auth, stats)
}

pub fn harness_with_store(store: SessionStore, auth: &MockServer, stats: &MockServer) -> Harness {
    let navigator = Arc::new(RecordingNavigator::new());
    let session = SessionManager::new(
        store.clone(),
        Arc::new(HttpAuthClient::new(server_url(auth))),
        navigator.clone(),
        Url::parse(ORIGIN).expect("valid origin"),
    );
    let stats = StatsClient::new(
        store.clone(),
        Arc::new(HttpStatsClient::new(server_url(stats))),
    );

    Harness {
        store,
        session,
        stats,
        navigator,
    }
}

pub fn server_url(server: &MockServer) -> Url {
    Url::parse(&server.uri()).expect("mock server uri")
}

pub fn pro_gamer() -> User {
    User {
        id: 1,
        steam_id: "76561198000000001".to_string(),
        username: "ProGamer".to_string(),
        avatar_url: "https://avatars.steamstatic.com/progamer_full.jpg".to_string(),
    }
}

pub fn user_json(user: &User) -> Value {
    serde_json::to_value(user).expect("user serializes")
}

pub fn stats_json(kills: i64) -> Value {
    json!({
        "user": {
            "username": "ProGamer",
            "avatar_url": "https://avatars.steamstatic.com/progamer_full.jpg",
            "steam_id": "76561198000000001"
        },
        "stats": {
            "kills": kills,
            "deaths": 80,
            "assists": 30,
            "headshots": 50,
            "kd_ratio": 1.25,
            "matches_played": 20,
            "matches_won": 11,
            "win_rate": 55.0,
            "headshot_rate": 50.0,
            "playtime_hours": 14.5,
            "level": 4,
            "experience": 3200,
            "rank": 12
        }
    })
}
