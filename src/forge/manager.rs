//! Manager that wraps forge implementations
use log::*;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        request::{
            CreatePrRequest, CreateReleaseRequest, GenerateNotesRequest,
            GetFileContentRequest, PrState, PullRequest, Release, ReleaseNotes,
        },
        traits::Forge,
    },
};

pub struct ForgeManager {
    forge: Box<dyn Forge>,
    remote_config: RemoteConfig,
}

impl ForgeManager {
    /// Wrap a forge implementation. Mutating calls are only forwarded when
    /// the forge's remote configuration enables real mode.
    pub fn new(forge: Box<dyn Forge>) -> Self {
        let remote_config = forge.remote_config();
        Self {
            forge,
            remote_config,
        }
    }

    pub fn owner(&self) -> &str {
        &self.remote_config.owner
    }

    pub fn is_real(&self) -> bool {
        self.remote_config.real
    }

    pub async fn check_branch_exists(
        &self,
        repo: &str,
        branch: &str,
    ) -> Result<bool> {
        debug!("checking whether {}/{repo} has branch {branch}", self.owner());
        self.forge.check_branch_exists(repo, branch).await
    }

    pub async fn generate_release_notes(
        &self,
        req: GenerateNotesRequest,
    ) -> Result<ReleaseNotes> {
        self.forge.generate_release_notes(req).await
    }

    pub async fn get_latest_release(
        &self,
        repo: &str,
        tag: &str,
    ) -> Result<Option<Release>> {
        self.forge.get_latest_release(repo, tag).await
    }

    pub async fn get_pull_request(
        &self,
        repo: &str,
        number: u64,
    ) -> Result<PullRequest> {
        self.forge.get_pull_request(repo, number).await
    }

    pub async fn get_pull_requests(
        &self,
        repo: &str,
        state: PrState,
    ) -> Result<Vec<PullRequest>> {
        self.forge.get_pull_requests(repo, state).await
    }

    pub async fn get_releases(
        &self,
        repo: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Release>> {
        self.forge.get_releases(repo, page, per_page).await
    }

    pub async fn get_raw_file(
        &self,
        req: GetFileContentRequest,
    ) -> Result<Option<String>> {
        debug!(
            "reading {} from {}/{} on branch {}",
            req.path,
            self.owner(),
            req.repo,
            req.branch
        );
        self.forge.get_raw_file(req).await
    }

    pub async fn create_pull_request(
        &self,
        req: CreatePrRequest,
    ) -> Result<PullRequest> {
        if !self.remote_config.real {
            warn!("preview: would create PR: req: {:#?}", req);
            return Ok(PullRequest {
                number: 0,
                html_url: self
                    .remote_config
                    .pull_url(&req.repo, &req.head_branch),
                title: req.title,
                body: req.body,
                merged: false,
            });
        }

        self.forge.create_pull_request(req).await
    }

    pub async fn create_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<Release> {
        if !self.remote_config.real {
            warn!(
                "preview: would create release: repo: {}, tag: {}, target: {}",
                req.repo, req.tag, req.target_commitish
            );
            return Ok(Release {
                html_url: self.remote_config.release_url(&req.repo, &req.tag),
                tag_name: req.tag,
                name: req.name,
                body: req.body,
            });
        }

        self.forge.create_release(req).await
    }

    pub async fn set_default_branch(
        &self,
        repo: &str,
        branch: &str,
    ) -> Result<()> {
        if !self.remote_config.real {
            warn!(
                "preview: would set default branch of {}/{repo} to {branch}",
                self.owner()
            );
            return Ok(());
        }

        self.forge.set_default_branch(repo, branch).await
    }
}
