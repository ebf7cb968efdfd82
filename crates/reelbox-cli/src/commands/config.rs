use clap::Subcommand;
use reelbox_auth::{CredentialStore, KeyringStore, OMDB_CREDENTIAL_KEY};
use reelbox_core::config::ReelboxConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Initialize ~/.reelbox/ directory with default config and database
    Init,
    /// Show current configuration
    Show,
    /// Store the OMDb API key in the OS keychain
    SetKey {
        /// API key (will prompt if not provided)
        #[arg(long)]
        key: Option<String>,
    },
}

pub fn run(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let home = ReelboxConfig::init()?;
            let db_path = ReelboxConfig::db_path()?;

            // Ensure database is created with schema
            reelbox_store::open_db(&db_path)?;

            println!("Initialized reelbox at {}", home.display());
            println!("  config: {}", ReelboxConfig::config_path()?.display());
            println!("  database: {}", db_path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = ReelboxConfig::load()?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{toml_str}");

            let has_key = KeyringStore::new().get(OMDB_CREDENTIAL_KEY)?.is_some();
            println!("# OMDb API key stored: {}", if has_key { "yes" } else { "no" });
            Ok(())
        }
        ConfigAction::SetKey { key } => {
            let key = match key {
                Some(k) => k,
                None => {
                    eprint!("Enter OMDb API key: ");
                    let mut input = String::new();
                    std::io::stdin().read_line(&mut input)?;
                    input.trim().to_string()
                }
            };

            if key.trim().is_empty() {
                anyhow::bail!("API key cannot be empty");
            }

            KeyringStore::new().store(OMDB_CREDENTIAL_KEY, key.trim())?;
            println!("API key stored in OS keychain as '{OMDB_CREDENTIAL_KEY}'");
            Ok(())
        }
    }
}
