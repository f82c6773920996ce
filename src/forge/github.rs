//! Implements the Forge trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::{Octocrab, params};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::{
    ReleaseError, Result,
    forge::{
        config::{
            LATEST_RELEASE_PAGE_SIZE, PULL_REQUEST_PAGE_SIZE, RemoteConfig,
        },
        request::{
            CreatePrRequest, CreateReleaseRequest, GenerateNotesRequest,
            GetFileContentRequest, PrState, PullRequest, Release, ReleaseNotes,
        },
        traits::Forge,
        util::select_latest_release,
    },
};

#[derive(Debug, Serialize)]
struct GenerateNotesBody {
    tag_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    previous_tag_name: String,
    target_commitish: String,
}

#[derive(Debug, Deserialize)]
struct GeneratedNotes {
    name: String,
    body: String,
}

#[derive(Debug, Serialize)]
struct DefaultBranchBody {
    default_branch: String,
}

impl From<octocrab::models::pulls::PullRequest> for PullRequest {
    fn from(pr: octocrab::models::pulls::PullRequest) -> Self {
        Self {
            number: pr.number,
            html_url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
            title: pr.title.unwrap_or_default(),
            body: pr.body.unwrap_or_default(),
            merged: pr.merged.unwrap_or(false) || pr.merged_at.is_some(),
        }
    }
}

impl From<octocrab::models::repos::Release> for Release {
    fn from(release: octocrab::models::repos::Release) -> Self {
        Self {
            name: release.name.unwrap_or_else(|| release.tag_name.clone()),
            tag_name: release.tag_name,
            body: release.body.unwrap_or_default(),
            html_url: release.html_url.to_string(),
        }
    }
}

/// Whether an octocrab error is a GitHub 404 response.
fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(
        err,
        octocrab::Error::GitHub { source, .. }
            if source.status_code == StatusCode::NOT_FOUND
    )
}

/// GitHub forge implementation using Octocrab for API interactions with
/// releases, pull requests and branches, and reqwest for raw file content.
pub struct Github {
    config: RemoteConfig,
    base_uri: String,
    raw_base_uri: String,
    instance: Octocrab,
    http: reqwest::Client,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = format!("{}://api.{}", config.scheme, config.host);
        let raw_base_uri = format!("{}://{}", config.scheme, config.raw_host);
        let builder = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(base_uri.clone())?;
        let instance = builder.build()?;

        Ok(Self {
            config,
            base_uri,
            raw_base_uri,
            instance,
            http: reqwest::Client::new(),
        })
    }

    fn repo_error(
        &self,
        repo: &str,
        action: &str,
        err: ReleaseError,
    ) -> ReleaseError {
        match err {
            ReleaseError::ForgeError(msg) => ReleaseError::forge(format!(
                "{}/{repo}: failed to {action}: {msg}",
                self.config.owner
            )),
            other => other,
        }
    }
}

#[async_trait]
impl Forge for Github {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn check_branch_exists(
        &self,
        repo: &str,
        branch: &str,
    ) -> Result<bool> {
        let endpoint = format!(
            "{}/repos/{}/{}/branches/{}",
            self.base_uri, self.config.owner, repo, branch
        );

        let result: std::result::Result<serde_json::Value, octocrab::Error> =
            self.instance.get(endpoint, None::<&()>).await;

        match result {
            Ok(_) => Ok(true),
            Err(err) if is_not_found(&err) => {
                debug!(
                    "branch {branch} not found on {}/{repo}",
                    self.config.owner
                );
                Ok(false)
            }
            Err(err) => {
                Err(self.repo_error(repo, "check branch", err.into()))
            }
        }
    }

    async fn create_pull_request(
        &self,
        req: CreatePrRequest,
    ) -> Result<PullRequest> {
        info!(
            "creating pull request {} -> {} on {}/{}",
            req.head_branch, req.base_branch, self.config.owner, req.repo
        );

        let pr = self
            .instance
            .pulls(&self.config.owner, &req.repo)
            .create(req.title, req.head_branch, req.base_branch)
            .body(req.body)
            .send()
            .await
            .map_err(|e| {
                self.repo_error(&req.repo, "create pull request", e.into())
            })?;

        Ok(pr.into())
    }

    async fn create_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<Release> {
        info!(
            "creating release {} on {}/{} targeting {}",
            req.tag, self.config.owner, req.repo, req.target_commitish
        );

        let release = self
            .instance
            .repos(&self.config.owner, &req.repo)
            .releases()
            .create(&req.tag)
            .name(&req.name)
            .body(&req.body)
            .target_commitish(&req.target_commitish)
            .draft(false)
            .prerelease(false)
            .send()
            .await
            .map_err(|e| {
                self.repo_error(&req.repo, "create release", e.into())
            })?;

        Ok(release.into())
    }

    async fn generate_release_notes(
        &self,
        req: GenerateNotesRequest,
    ) -> Result<ReleaseNotes> {
        let endpoint = format!(
            "{}/repos/{}/{}/releases/generate-notes",
            self.base_uri, self.config.owner, req.repo
        );

        let body = serde_json::json!(GenerateNotesBody {
            tag_name: req.tag.clone(),
            previous_tag_name: req.previous_tag.clone(),
            target_commitish: req.target_commitish.clone(),
        });

        debug!("generating release notes: {:#?}", req);

        let notes: GeneratedNotes = self
            .instance
            .post(endpoint, Some(&body))
            .await
            .map_err(|e| {
                self.repo_error(&req.repo, "generate release notes", e.into())
            })?;

        Ok(ReleaseNotes {
            name: notes.name,
            body: notes.body,
        })
    }

    async fn get_latest_release(
        &self,
        repo: &str,
        tag: &str,
    ) -> Result<Option<Release>> {
        let result = self
            .instance
            .repos(&self.config.owner, repo)
            .releases()
            .list()
            .per_page(LATEST_RELEASE_PAGE_SIZE)
            .page(1u32)
            .send()
            .await;

        match result {
            Err(err) if is_not_found(&err) => {
                info!("no releases found for {}/{repo}", self.config.owner);
                Ok(None)
            }
            Err(err) => {
                Err(self.repo_error(repo, "list releases", err.into()))
            }
            Ok(page) => {
                let releases = page
                    .into_iter()
                    .map(Release::from)
                    .collect::<Vec<Release>>();

                Ok(select_latest_release(releases, tag))
            }
        }
    }

    async fn get_pull_request(
        &self,
        repo: &str,
        number: u64,
    ) -> Result<PullRequest> {
        let pr = self
            .instance
            .pulls(&self.config.owner, repo)
            .get(number)
            .await
            .map_err(|e| {
                self.repo_error(repo, "get pull request", e.into())
            })?;

        Ok(pr.into())
    }

    async fn get_pull_requests(
        &self,
        repo: &str,
        state: PrState,
    ) -> Result<Vec<PullRequest>> {
        let state = match state {
            PrState::Open => params::State::Open,
            PrState::Closed => params::State::Closed,
            PrState::All => params::State::All,
        };

        let prs = self
            .instance
            .pulls(&self.config.owner, repo)
            .list()
            .state(state)
            .per_page(PULL_REQUEST_PAGE_SIZE)
            .send()
            .await
            .map_err(|e| {
                self.repo_error(repo, "list pull requests", e.into())
            })?;

        let mut pull_requests = vec![];

        for pr in prs {
            pull_requests.push(PullRequest::from(pr));
        }

        Ok(pull_requests)
    }

    async fn get_releases(
        &self,
        repo: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Release>> {
        let releases = self
            .instance
            .repos(&self.config.owner, repo)
            .releases()
            .list()
            .page(page)
            .per_page(per_page)
            .send()
            .await
            .map_err(|e| self.repo_error(repo, "list releases", e.into()))?;

        Ok(releases.into_iter().map(Release::from).collect())
    }

    async fn get_raw_file(
        &self,
        req: GetFileContentRequest,
    ) -> Result<Option<String>> {
        let url = format!(
            "{}/{}/{}/refs/heads/{}/{}",
            self.raw_base_uri,
            self.config.owner,
            req.repo,
            req.branch,
            req.path
        );

        let response = self
            .http
            .get(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("token {}", self.config.token.expose_secret()),
            )
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            info!("no file found for path: {url}");
            return Ok(None);
        }

        let content = response.error_for_status()?.text().await?;

        Ok(Some(content))
    }

    async fn set_default_branch(&self, repo: &str, branch: &str) -> Result<()> {
        let endpoint = format!(
            "{}/repos/{}/{}",
            self.base_uri, self.config.owner, repo
        );

        info!(
            "setting default branch of {}/{repo} to {branch}",
            self.config.owner
        );

        let body = serde_json::json!(DefaultBranchBody {
            default_branch: branch.to_string(),
        });

        let _: serde_json::Value = self
            .instance
            .patch(endpoint, Some(&body))
            .await
            .map_err(|e| {
                self.repo_error(repo, "set default branch", e.into())
            })?;

        Ok(())
    }
}
