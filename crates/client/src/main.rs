//! Combat client binary.
//!
//! ```bash
//! COMBAT_ENCOUNTER="Ossuary" COMBAT_SEED=7 COMBAT_TIME_SCALE=8 cargo run -p combat-client
//! ```

use anyhow::Result;
use combat_client::{ClientConfig, logging, session};
use combat_core::Side;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!("Starting combat client");
    tracing::debug!(?config, "client configuration");

    let content = session::load_content(&config)?;
    let battle = session::build_battle(&config, &content)?;
    let outcome = session::run(&config, battle, std::io::stdout()).await?;

    for survivor in outcome.survivors(Side::Ally) {
        tracing::info!(
            name = %survivor.name,
            health = survivor.health,
            sanity = ?survivor.sanity,
            "survivor"
        );
    }
    tracing::info!(won = outcome.won, "Client shutdown complete");
    Ok(())
}
