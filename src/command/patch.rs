//! Patch release command implementation.
use log::*;

use crate::{Result, console, orchestrator::Orchestrator};

/// Execute a patch release of `tag`.
pub async fn execute(orchestrator: &Orchestrator, tag: &str) -> Result<()> {
    info!("starting patch release: {tag}");
    console::heading(&format!("Patch release {tag}"));

    orchestrator.patch(tag).await
}
