//! Gamehub CLI - Steam login and player stats from the terminal.

mod browser;
mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use hub_config_and_utils::{init_logging, Config, Paths};
use steam_session::PlayerStatsPatch;
use tracing::debug;

/// Gamehub CLI - Sign in with Steam and manage your player stats.
#[derive(Parser)]
#[command(name = "gamehub")]
#[command(about = "Gamehub CLI for Steam sign-in and player stats")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error); defaults to the config file
    #[arg(long, global = true, env = "GAMEHUB_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in through Steam
    Login {
        /// Print the Steam URL instead of opening a browser
        #[arg(long)]
        print_only: bool,
    },

    /// Finish sign-in with the URL Steam redirected the browser to
    Callback {
        /// Full redirected URL, including its query string
        url: String,
    },

    /// Check the stored session with the server
    Verify,

    /// Logout and clear session
    Logout,

    /// Show the cached user
    Whoami,

    /// Check authentication status
    Status,

    /// Show player stats
    Stats,

    /// Update player stats
    StatsUpdate(StatsUpdateArgs),

    /// Show the profile with level progress and achievements
    Profile,
}

/// Fields accepted by the Stats Endpoint. Only the given ones are sent.
#[derive(Args)]
struct StatsUpdateArgs {
    #[arg(long)]
    kills: Option<i64>,
    #[arg(long)]
    deaths: Option<i64>,
    #[arg(long)]
    assists: Option<i64>,
    #[arg(long)]
    headshots: Option<i64>,
    #[arg(long)]
    matches_played: Option<i64>,
    #[arg(long)]
    matches_won: Option<i64>,
    #[arg(long)]
    playtime_hours: Option<f64>,
    #[arg(long)]
    level: Option<i64>,
    #[arg(long)]
    experience: Option<i64>,
}

impl From<StatsUpdateArgs> for PlayerStatsPatch {
    fn from(args: StatsUpdateArgs) -> Self {
        PlayerStatsPatch {
            kills: args.kills,
            deaths: args.deaths,
            assists: args.assists,
            headshots: args.headshots,
            matches_played: args.matches_played,
            matches_won: args.matches_won,
            playtime_hours: args.playtime_hours,
            level: args.level,
            experience: args.experience,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let paths = match Paths::new() {
        Ok(paths) => paths,
        Err(e) => {
            output::print_error(&e.to_string(), &cli.format);
            std::process::exit(1);
        }
    };
    let config = match Config::load(&paths) {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&format!("Failed to load config: {}", e), &cli.format);
            std::process::exit(1);
        }
    };

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    // CLI doesn't need stderr output by default
    init_logging("cli", level, &paths, false);
    debug!(base_dir = %paths.base_dir().display(), "Loaded configuration");

    let format = cli.format;
    let result = match cli.command {
        Commands::Login { print_only } => {
            commands::login(&paths, &config, print_only, &format).await
        }
        Commands::Callback { url } => commands::callback(&paths, &config, &url, &format).await,
        Commands::Verify => commands::verify(&paths, &config, &format).await,
        Commands::Logout => commands::logout(&paths, &config, &format).await,
        Commands::Whoami => commands::whoami(&paths, &config, &format),
        Commands::Status => commands::status(&paths, &config, &format),
        Commands::Stats => commands::stats_show(&paths, &config, &format).await,
        Commands::StatsUpdate(args) => {
            commands::stats_update(&paths, &config, &args.into(), &format).await
        }
        Commands::Profile => commands::profile(&paths, &config, &format).await,
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e), &format);
        std::process::exit(1);
    }
}
