mod commands;
mod notify;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reelbox", version, about = "Search movies and keep them in personal collections")]
struct Cli {
    /// OMDb API key (overrides the one stored in the keychain)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match commands::run(cli.command, cli.api_key).await {
        Err(e) if e.is::<commands::Reported>() => std::process::exit(1),
        other => other,
    }
}
