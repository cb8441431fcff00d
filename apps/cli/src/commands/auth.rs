//! Authentication commands.

use super::{clients, clients_with_navigator};
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use hub_config_and_utils::{Config, Paths};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use steam_session::{AuthCheck, RecordingNavigator, User};
use url::Url;

/// User as shown by `whoami`, `callback` and `verify`.
#[derive(Serialize)]
struct UserView<'a> {
    #[serde(flatten)]
    user: &'a User,
}

impl fmt::Display for UserView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Username: {}", self.user.username)?;
        writeln!(f, "Steam ID: {}", self.user.steam_id)?;
        write!(f, "User ID:  {}", self.user.id)
    }
}

/// Sign in through Steam.
pub async fn login(
    paths: &Paths,
    config: &Config,
    print_only: bool,
    format: &OutputFormat,
) -> Result<()> {
    let recorder = Arc::new(RecordingNavigator::new());
    let clients = if print_only {
        clients_with_navigator(paths, config, recorder.clone())?
    } else {
        clients(paths, config)?
    };

    if let Some(user) = clients.session.cached_user() {
        output::print_success(&format!("Already logged in as {}", user.username), format);
        return Ok(());
    }

    let Some(url) = clients.session.initiate_login().await else {
        output::print_error("Could not start Steam sign-in", format);
        return Ok(());
    };

    match format {
        OutputFormat::Text => {
            if print_only {
                println!("Open this URL to sign in with Steam:");
            } else {
                println!("Opened Steam sign-in in your browser:");
            }
            println!("  {}", url);
            println!();
            println!("When Steam redirects back, run:");
            println!("  gamehub callback '<redirected url>'");
        }
        OutputFormat::Json => output::print_json(&serde_json::json!({
            "redirect_url": url.as_str(),
            "opened": !print_only,
        })),
    }

    Ok(())
}

/// Complete sign-in from the redirected page URL.
pub async fn callback(paths: &Paths, config: &Config, url: &str, format: &OutputFormat) -> Result<()> {
    let page_url = Url::parse(url.trim()).context("Invalid callback URL")?;
    let clients = clients(paths, config)?;

    match clients.session.check_auth(&page_url).await {
        AuthCheck::CallbackCompleted(user) => {
            output::print_success(&format!("Logged in as {}", user.username), format);
        }
        AuthCheck::Verified(user) => {
            output::print_success(
                &format!("Not a sign-in callback; session valid for {}", user.username),
                format,
            );
        }
        AuthCheck::Anonymous => output::print_error("Sign-in failed", format),
    }

    Ok(())
}

/// Check the stored session with the server.
pub async fn verify(paths: &Paths, config: &Config, format: &OutputFormat) -> Result<()> {
    let clients = clients(paths, config)?;

    if !clients.session.is_authenticated() {
        output::print_error("Not logged in", format);
        return Ok(());
    }

    match clients.session.verify().await {
        Some(user) => output::print(&UserView { user: &user }, format),
        None => output::print_error("Session is no longer valid; logged out", format),
    }

    Ok(())
}

/// Logout and clear session.
pub async fn logout(paths: &Paths, config: &Config, format: &OutputFormat) -> Result<()> {
    let clients = clients(paths, config)?;

    if let Some(remote) = clients.session.logout() {
        // Give the server-side logout a moment before the process exits.
        let wait = config.request_timeout().min(Duration::from_secs(5));
        let _ = tokio::time::timeout(wait, remote).await;
    }

    output::print_success("Logged out successfully", format);
    Ok(())
}

/// Show the cached user without contacting the server.
pub fn whoami(paths: &Paths, config: &Config, format: &OutputFormat) -> Result<()> {
    let clients = clients(paths, config)?;

    match clients.session.cached_user() {
        Some(user) => output::print(&UserView { user: &user }, format),
        None => output::print_error("Not logged in", format),
    }

    Ok(())
}

/// Check authentication status.
pub fn status(paths: &Paths, config: &Config, format: &OutputFormat) -> Result<()> {
    let clients = clients(paths, config)?;
    let session = &clients.session;
    let user = session.cached_user();

    match format {
        OutputFormat::Text => {
            let auth = if session.is_authenticated() {
                "logged in"
            } else {
                "not logged in"
            };
            println!("Auth:     {}", auth);
            println!("State:    {}", session.state());
            if let Some(user) = &user {
                println!("User:     {} ({})", user.username, user.steam_id);
            }
        }
        OutputFormat::Json => output::print_json(&serde_json::json!({
            "logged_in": session.is_authenticated(),
            "state": session.state(),
            "user": user,
        })),
    }

    Ok(())
}
