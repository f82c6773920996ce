//! Traits related to remote git forges
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        request::{
            CreatePrRequest, CreateReleaseRequest, GenerateNotesRequest,
            GetFileContentRequest, PrState, PullRequest, Release, ReleaseNotes,
        },
    },
};

/// Operations the release flows need from the forge. Every operation takes
/// the repository name; the owner comes from the remote configuration.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge {
    fn remote_config(&self) -> RemoteConfig;

    /// Whether `branch` exists on `repo`. A missing branch is not an error.
    async fn check_branch_exists(&self, repo: &str, branch: &str)
    -> Result<bool>;

    async fn create_pull_request(
        &self,
        req: CreatePrRequest,
    ) -> Result<PullRequest>;

    async fn create_release(&self, req: CreateReleaseRequest)
    -> Result<Release>;

    async fn generate_release_notes(
        &self,
        req: GenerateNotesRequest,
    ) -> Result<ReleaseNotes>;

    /// Most relevant release for `tag`: the newest one on the same minor
    /// line, else the newest one overall. `None` when nothing was released.
    async fn get_latest_release(
        &self,
        repo: &str,
        tag: &str,
    ) -> Result<Option<Release>>;

    async fn get_pull_request(
        &self,
        repo: &str,
        number: u64,
    ) -> Result<PullRequest>;

    async fn get_pull_requests(
        &self,
        repo: &str,
        state: PrState,
    ) -> Result<Vec<PullRequest>>;

    async fn get_releases(
        &self,
        repo: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Release>>;

    /// Raw file content, `None` when the file does not exist on the branch.
    async fn get_raw_file(
        &self,
        req: GetFileContentRequest,
    ) -> Result<Option<String>>;

    async fn set_default_branch(&self, repo: &str, branch: &str) -> Result<()>;
}
