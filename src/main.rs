use anyhow::Error;
use clap::Parser;
use wallgrab::Wallgrab;

/// Downloads a wallpaper and sets it as the desktop background
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The query to search for; defaults to the stored one
    #[arg(long, short)]
    query: Option<String>,

    /// Stop after this many failed download attempts instead of
    /// retrying forever
    #[arg(long, value_name = "N")]
    max_attempts: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    let mut wallgrab = Wallgrab::new().await?;
    wallgrab.run(cli.query, cli.max_attempts).await
}
