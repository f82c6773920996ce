//! Major release command implementation.
use log::*;

use crate::{
    Result, console,
    orchestrator::{MajorOptions, Orchestrator},
};

/// Execute a major release of `options.tag`.
pub async fn execute(
    orchestrator: &Orchestrator,
    options: MajorOptions,
) -> Result<()> {
    info!("starting major release: {:?}", options);
    console::heading(&format!("Major release {}", options.tag));

    orchestrator.major(options).await
}
