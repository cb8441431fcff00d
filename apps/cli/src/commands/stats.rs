//! Player stats commands.

use super::clients;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use hub_config_and_utils::{Config, Paths};
use steam_session::{PlayerStats, PlayerStatsPatch, StatsSnapshot};

/// Show player stats.
pub async fn stats_show(paths: &Paths, config: &Config, format: &OutputFormat) -> Result<()> {
    let clients = clients(paths, config)?;
    if !clients.session.is_authenticated() {
        output::print_error("Not logged in", format);
        return Ok(());
    }

    match clients.stats.fetch_stats().await {
        Some(snapshot) => print_snapshot(&snapshot, format),
        None => output::print_error("Failed to load stats", format),
    }

    Ok(())
}

/// Update player stats with the given fields.
pub async fn stats_update(
    paths: &Paths,
    config: &Config,
    patch: &PlayerStatsPatch,
    format: &OutputFormat,
) -> Result<()> {
    let clients = clients(paths, config)?;
    if !clients.session.is_authenticated() {
        output::print_error("Not logged in", format);
        return Ok(());
    }
    if patch.is_empty() {
        output::print_error("No fields to update (try --kills 10)", format);
        return Ok(());
    }

    match clients.stats.patch_stats(patch).await {
        Some(snapshot) => print_snapshot(&snapshot, format),
        None => output::print_error("Failed to update stats", format),
    }

    Ok(())
}

fn print_snapshot(snapshot: &StatsSnapshot, format: &OutputFormat) {
    match format {
        OutputFormat::Text => {
            output::print_heading(&format!("Stats for {}", snapshot.user.username));
            print_stats(&snapshot.stats);
        }
        OutputFormat::Json => output::print_json(snapshot),
    }
}

/// Stats as label/value rows.
pub(super) fn print_stats(stats: &PlayerStats) {
    output::print_row("Rank", &format!("#{}", stats.rank));
    output::print_row("Level", &stats.level.to_string());
    output::print_row("Kills", &stats.kills.to_string());
    output::print_row("Deaths", &stats.deaths.to_string());
    output::print_row("Assists", &stats.assists.to_string());
    output::print_row("K/D", &format!("{:.2}", stats.kd_ratio));
    output::print_row("Headshots", &format!("{} ({:.1}%)", stats.headshots, stats.headshot_rate));
    output::print_row(
        "Matches",
        &format!("{} played, {} won", stats.matches_played, stats.matches_won),
    );
    output::print_row("Win rate", &format!("{:.1}%", stats.win_rate));
    output::print_row("Playtime", &format!("{:.1} h", stats.playtime_hours));
}
