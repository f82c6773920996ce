//! Common test utilities for orchestrator tests.

use std::{path::PathBuf, rc::Rc};

use crate::{
    config::ReleaseConfig,
    console::MockPrompt,
    forge::{
        config::RemoteConfig,
        manager::ForgeManager,
        request::{PullRequest, Release, ReleaseNotes},
        traits::MockForge,
    },
    orchestrator::{Orchestrator, OrchestratorParams},
    resolver::ReleaseInformation,
    toolchain::MockToolchain,
    vcs::MockVcs,
};

pub const TEST_WORKDIR: &str = "release-workdir";

/// Mock collaborators of an orchestrator. Set expectations on the fields
/// before calling [`TestMocks::build`].
pub struct TestMocks {
    pub forge: MockForge,
    pub vcs: MockVcs,
    pub toolchain: MockToolchain,
    pub prompt: MockPrompt,
}

impl TestMocks {
    /// Mocks whose forge runs in preview mode.
    pub fn preview() -> Self {
        Self::with_mode(false)
    }

    /// Mocks whose forge runs in real mode.
    pub fn real() -> Self {
        Self::with_mode(true)
    }

    fn with_mode(real: bool) -> Self {
        let mut forge = MockForge::new();
        forge.expect_remote_config().returning(move || RemoteConfig {
            owner: "goravel".into(),
            real,
            ..Default::default()
        });

        Self {
            forge,
            vcs: MockVcs::new(),
            toolchain: MockToolchain::new(),
            prompt: MockPrompt::new(),
        }
    }

    pub fn build(self) -> Orchestrator {
        self.build_with_config(ReleaseConfig::default())
    }

    pub fn build_with_config(self, config: ReleaseConfig) -> Orchestrator {
        let config = ReleaseConfig {
            workdir: PathBuf::from(TEST_WORKDIR),
            ..config
        };

        Orchestrator::new(OrchestratorParams {
            config: Rc::new(config),
            forge: Rc::new(ForgeManager::new(Box::new(self.forge))),
            vcs: Rc::new(self.vcs),
            toolchain: Rc::new(self.toolchain),
            prompt: Rc::new(self.prompt),
        })
    }
}

/// Clone directory of `repo` under the test working directory.
pub fn clone_dir(repo: &str) -> PathBuf {
    PathBuf::from(TEST_WORKDIR).join(repo)
}

pub fn pull_request(repo: &str, number: u64, merged: bool) -> PullRequest {
    PullRequest {
        number,
        html_url: format!("https://github.com/goravel/{repo}/pull/{number}"),
        title: "chore: Upgrade framework to v1.16.0 (auto)".into(),
        body: "".into(),
        merged,
    }
}

pub fn release(repo: &str, tag: &str) -> Release {
    Release {
        tag_name: tag.into(),
        name: tag.into(),
        body: "".into(),
        html_url: format!(
            "https://github.com/goravel/{repo}/releases/tag/{tag}"
        ),
    }
}

pub fn release_information(repo: &str, tag: &str) -> ReleaseInformation {
    ReleaseInformation {
        repo: repo.into(),
        tag: tag.into(),
        latest_tag: "".into(),
        current_tag: None,
        branch: "master".into(),
        notes: ReleaseNotes {
            name: tag.into(),
            body: "## What's Changed".into(),
        },
    }
}

/// Config with a single package and a single patch application, keeping
/// end-to-end flows short.
pub fn small_config() -> ReleaseConfig {
    let mut config = ReleaseConfig::default();
    config.packages = vec!["gin".into()];
    config.applications = config
        .applications
        .into_iter()
        .filter(|a| a.name == "goravel-lite" || a.name == "installer")
        .collect();
    config
}
