use std::path::{Path, PathBuf};

use clap::{arg, Parser};

use serde::{Deserialize, Serialize};

use config::Config;

pub const DEFAULT_SUBREDDIT: &str = "earthporn";
pub const DEFAULT_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_MONITORS: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct RedpaperConfig {
    pub subreddit: String,
    pub cache_dir: String,
    /// Seconds to wait between wallpaper changes.
    pub interval: u64,
    /// Number of monitors to target (XFCE4 only).
    pub monitors: u32,
    /// Platform identifier selecting the wallpaper setter. Unrecognized
    /// values fall back to the generic Linux setter.
    pub platform: String,
}

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(long, required = false)]
    pub config_path: Option<String>,
    #[command(subcommand)]
    pub subcommand: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum SubCommand {
    Run(RunArgs),
}

#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    #[arg(long)]
    pub subreddit: Option<String>,
    #[arg(long)]
    pub cache_dir: Option<String>,
    #[arg(long)]
    pub interval: Option<u64>,
    #[arg(long)]
    pub monitors: Option<u32>,
    #[arg(long)]
    pub platform: Option<String>,
}

impl RedpaperConfig {
    pub fn load(config_path: &Option<String>, run_args: &RunArgs) -> RedpaperConfig {
        let config_path = if let Some(path) = config_path {
            path
        } else {
            "./config.toml"
        };
        let mut config = RedpaperConfig::default();
        let config_path = Path::new(config_path);
        if config_path.exists() {
            let settings = Config::builder()
                .add_source(config::File::from(config_path))
                .build()
                .unwrap_or_else(|_| panic!("[!] Fail to load config file {}", config_path.display()));
            config = settings.try_deserialize::<RedpaperConfig>().unwrap_or_else(|_| {
                panic!("[!] Fail to parse config file {}", config_path.display())
            });
        }
        if let Some(subreddit) = &run_args.subreddit {
            config.subreddit = subreddit.trim().trim_start_matches("r/").to_string();
        }
        if let Some(cache_dir) = &run_args.cache_dir {
            config.cache_dir = cache_dir.clone();
        }
        if let Some(interval) = run_args.interval {
            config.interval = interval;
        }
        if let Some(monitors) = run_args.monitors {
            config.monitors = monitors;
        }
        if let Some(platform) = &run_args.platform {
            config.platform = platform.trim().to_string();
        }
        if config.subreddit.is_empty() {
            config.subreddit = DEFAULT_SUBREDDIT.to_string();
        }
        if config.cache_dir.is_empty() {
            config.cache_dir = default_cache_dir();
        }
        if config.interval == 0 {
            config.interval = DEFAULT_INTERVAL_SECS;
        }
        if config.monitors == 0 {
            config.monitors = DEFAULT_MONITORS;
        }
        if config.platform.is_empty() {
            config.platform = std::env::consts::OS.to_string();
        }
        config
    }

    pub fn cache_dir(&self) -> PathBuf {
        PathBuf::from(&self.cache_dir)
    }
}

fn default_cache_dir() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wallpaper")
        .to_string_lossy()
        .into_owned()
}
