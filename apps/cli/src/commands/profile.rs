//! Profile command.

use super::clients;
use super::stats::print_stats;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use hub_config_and_utils::{Config, Paths};
use steam_session::{load_profile, ProfileLoad};

/// Show the profile with level progress and achievements.
pub async fn profile(paths: &Paths, config: &Config, format: &OutputFormat) -> Result<()> {
    let clients = clients(paths, config)?;

    let profile = match load_profile(&clients.session, &clients.stats).await {
        ProfileLoad::Ready(profile) => profile,
        ProfileLoad::RedirectHome => {
            output::print_error("Not logged in. Run 'gamehub login' first", format);
            return Ok(());
        }
    };

    if let OutputFormat::Json = format {
        output::print_json(&serde_json::json!({
            "user": profile.user,
            "stats": profile.stats,
            "level_progress": profile.level_progress(),
            "achievements": profile.achievements(),
        }));
        return Ok(());
    }

    output::print_heading(&profile.user.username);
    output::print_row("Steam ID", &profile.user.steam_id);
    if !profile.user.avatar_url.is_empty() {
        output::print_row("Avatar", &profile.user.avatar_url);
    }

    let Some(stats) = &profile.stats else {
        println!("\nStats unavailable");
        return Ok(());
    };

    if let Some(progress) = profile.level_progress() {
        output::print_row(
            "Experience",
            &format!(
                "{} / {} ({:.0}%)",
                progress.current, progress.required, progress.percent
            ),
        );
    }
    print_stats(stats);

    output::print_heading("Achievements");
    for progress in profile.achievements() {
        let status = if progress.completed {
            "done".to_string()
        } else {
            format!("{}/{}", progress.current, progress.target)
        };
        output::print_row(
            progress.achievement.title(),
            &format!("{} - {}", status, progress.achievement.description()),
        );
    }

    Ok(())
}
