//! Common functionality shared between release commands
use log::*;
use std::rc::Rc;

use crate::{
    Result,
    cli::Args,
    config::ReleaseConfig,
    console::{Prompt, TerminalPrompt},
    forge::{github::Github, manager::ForgeManager},
    orchestrator::Orchestrator,
    toolchain::{GoToolchain, Toolchain},
    vcs::{GitVcs, Vcs},
};

/// Load the release configuration, applying CLI overrides.
pub fn load_config(args: &Args) -> Result<ReleaseConfig> {
    let mut config = ReleaseConfig::load(&args.config)?;

    if let Some(workdir) = args.workdir.as_ref() {
        config.workdir = workdir.clone();
    }

    debug!("release configuration: {:#?}", config);

    Ok(config)
}

/// Build an orchestrator talking to GitHub. Mutations only happen when
/// `real` is set.
pub fn build_orchestrator(
    args: &Args,
    config: ReleaseConfig,
    real: bool,
) -> Result<Orchestrator> {
    let remote_config = args.remote_config(&config.owner, real)?;

    if !real {
        warn!("running in preview mode: nothing will be created or pushed");
    }

    let github = Github::new(remote_config.clone())?;
    let forge = Rc::new(ForgeManager::new(Box::new(github)));
    let vcs: Rc<dyn Vcs> = Rc::new(GitVcs::new(remote_config));
    let toolchain: Rc<dyn Toolchain> =
        Rc::new(GoToolchain::new(config.go_proxy.clone()));
    let prompt: Rc<dyn Prompt> = Rc::new(TerminalPrompt::new());

    Orchestrator::builder()
        .config(Rc::new(config))
        .forge(forge)
        .vcs(vcs)
        .toolchain(toolchain)
        .prompt(prompt)
        .build()
}
