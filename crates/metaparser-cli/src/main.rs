//! metaparser: play a Metaparser game in the terminal
//!
//! Drives the INSTEAD engine through the boundary adapter. Host commands:
//! `:save [N]`, `:load N`, `:slots`, `:quit`.

use anyhow::Result;
use metaparser_bridge::ffi::InsteadEngine;
use metaparser_bridge::logging::init_logging;
use metaparser_bridge::{GameSession, MetaparserInteractor};
use metaparser_cli::{config_from_args, play};
use tokio::io::BufReader;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let config = config_from_args(&args)?;
    info!("Starting metaparser, app dir: {:?}", config.app_dir);

    let Some(engine) = InsteadEngine::acquire() else {
        anyhow::bail!("INSTEAD engine is already in use");
    };
    let mut session = GameSession::new(MetaparserInteractor::new(engine, &config));
    session.start().await?;

    let result = play(
        &mut session,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await;

    if let Err(e) = session.finish().await {
        warn!("Autosave on exit failed: {}", e);
    }
    result
}
