use clap::Parser;

use redpaper::config::{Cli, RedpaperConfig, SubCommand};
use redpaper::redpaper::Redpaper;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli: Cli = Cli::parse();

    match cli.subcommand {
        SubCommand::Run(args) => {
            let config = RedpaperConfig::load(&cli.config_path, &args);
            println!(
                "Setting wallpapers from r/{} every {} seconds ...",
                config.subreddit, config.interval
            );
            let redpaper = Redpaper::new(config)?;
            redpaper.run().await?;
        }
    }

    Ok(())
}
