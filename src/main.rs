use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use finddirs::{AppConfig, Environment, Finder, Platform, ProcessEnv};
use log::info;

#[derive(Parser, Debug)]
#[command(version, about = "Print platform directories as JSON")]
struct Cli {
    /// Resolve for this platform instead of the detected one
    #[arg(long, global = true)]
    platform: Option<Platform>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Config, state and cache directories of an application
    App(AppArgs),
    /// Personal folders of the current user
    User,
}

#[derive(Args, Debug)]
struct AppArgs {
    /// JSON file with the application config; flags override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resolve system-wide directories instead of per-user ones
    #[arg(long)]
    system: bool,

    /// Application subdirectory, e.g. "acme/app"
    #[arg(long)]
    subdir: Option<String>,

    /// Appended to the config dir when it collides with another dir
    #[arg(long)]
    config_suffix: Option<String>,

    /// Appended to the state dir when it collides with another dir
    #[arg(long)]
    state_suffix: Option<String>,

    /// Appended to the cache dir when it collides with another dir
    #[arg(long)]
    cache_suffix: Option<String>,

    /// Use the roaming profile for the config dir (Windows)
    #[arg(long)]
    roaming: bool,
}

impl AppArgs {
    fn app_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_json_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(subdir) = &self.subdir {
            config.subdir = subdir.clone();
        }
        if let Some(suffix) = &self.config_suffix {
            config.subdir_config = suffix.clone();
        }
        if let Some(suffix) = &self.state_suffix {
            config.subdir_state = suffix.clone();
        }
        if let Some(suffix) = &self.cache_suffix {
            config.subdir_cache = suffix.clone();
        }
        config.use_roaming |= self.roaming;

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let finder = match cli.platform {
        Some(platform) => {
            info!("Using platform {}", platform);
            let env: Arc<dyn Environment> = Arc::new(ProcessEnv);
            Finder::new(platform, env)
        }
        None => Finder::detect(),
    };

    let json = match &cli.command {
        Command::App(args) => {
            let config = args.app_config()?;
            let dirs = finder
                .app_dirs(args.system, &config)
                .context("Failed to resolve application directories")?;
            serde_json::to_string_pretty(&dirs)?
        }
        Command::User => {
            let dirs = finder
                .user_dirs()
                .context("Failed to resolve user directories")?;
            serde_json::to_string_pretty(&dirs)?
        }
    };

    println!("{}", json);
    Ok(())
}
