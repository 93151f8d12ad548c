use std::time::Duration;

use colored::Colorize;
use indicatif::ProgressBar;
use reqwest::Client;
use tokio::time::sleep;

use crate::cache::{CacheOutcome, WallpaperCache};
use crate::config::RedpaperConfig;
use crate::error::Result;
use crate::reddit;
use crate::reddit::Listing;
use crate::setter;
use crate::setter::WallpaperSetter;

const FETCH_RETRY_DELAY: Duration = Duration::from_secs(10);

pub struct Redpaper {
    config: RedpaperConfig,
    client: Client,
    cache: WallpaperCache,
    setter: Box<dyn WallpaperSetter>,
}

impl Redpaper {
    pub fn new(config: RedpaperConfig) -> Result<Self> {
        let cache = WallpaperCache::open(config.cache_dir())?;
        let setter = setter::for_platform(&config.platform, config.monitors);
        Ok(Redpaper {
            config,
            client: Client::new(),
            cache,
            setter,
        })
    }

    /// Runs until externally killed: fetch the listing, walk its links one
    /// at a time, start over. Download failures propagate and end the
    /// process; apply failures are printed and skipped.
    pub async fn run(&self) -> Result<()> {
        let interval = Duration::from_secs(self.config.interval);
        println!(
            "{} wallpapers cached in {}",
            self.cache.count(),
            self.config.cache_dir().display()
        );
        loop {
            let listing = self.fetch_with_retry().await;
            let links = reddit::image_links(&listing);
            println!(
                "***** r/{}: {} image links",
                self.config.subreddit,
                links.len()
            );
            if links.is_empty() {
                // Wait out one interval rather than hammering the listing.
                sleep(interval).await;
                continue;
            }
            let bar = ProgressBar::new(links.len() as u64);
            for link in &links {
                let resolved = self.cache.resolve(&self.client, link).await?;
                if resolved.outcome == CacheOutcome::Hit {
                    bar.println(format!("cache hit {}", resolved.path.display()));
                }
                if let Err(err) = self.setter.apply(&resolved.path) {
                    bar.println(format!("{} {}", "warning:".yellow(), err));
                }
                bar.inc(1);
                sleep(interval).await;
            }
            bar.finish();
        }
    }

    // The listing endpoint flakes; keep trying at a fixed pace until it
    // answers. Unbounded on purpose.
    async fn fetch_with_retry(&self) -> Listing {
        loop {
            match reddit::fetch_listing(&self.client, &self.config.subreddit).await {
                Ok(listing) => return listing,
                Err(err) => {
                    eprintln!(
                        "{} {}",
                        "listing fetch failed, retrying in 10 seconds:".yellow(),
                        err
                    );
                    sleep(FETCH_RETRY_DELAY).await;
                }
            }
        }
    }
}
