//! Dependency upgrade pull requests.
//!
//! An upgrade PR bumps a repository's sibling modules to a freshly released
//! tag. Its body starts with a hidden marker so a later run can find and
//! reuse the PR instead of opening a duplicate:
//!
//! ```text
//! <!--{"upgrade":{"repo":"gin","tag":"v1.16.0","base":"master"}}-->
//! ```
use color_eyre::eyre::WrapErr;
use log::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::LazyLock};

use crate::{
    Result, console,
    forge::request::{CreatePrRequest, PrState, PullRequest},
    orchestrator::Orchestrator,
};

/// Prefix of upgrade branches.
pub const UPGRADE_BRANCH_PREFIX: &str = "auto-upgrade";

static METADATA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?ms)^<!--(?<metadata>.*?)-->"#).unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeMetadata {
    pub repo: String,
    pub tag: String,
    pub base: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct UpgradeMarker {
    upgrade: UpgradeMetadata,
}

pub fn upgrade_branch(tag: &str) -> String {
    format!("{UPGRADE_BRANCH_PREFIX}/{tag}")
}

pub fn upgrade_title(tag: &str) -> String {
    format!("chore: Upgrade framework to {tag} (auto)")
}

/// PR body: marker comment followed by the bumped requirements.
pub fn upgrade_body(
    metadata: &UpgradeMetadata,
    requirements: &[String],
) -> Result<String> {
    let marker = serde_json::to_string(&UpgradeMarker {
        upgrade: metadata.clone(),
    })?;

    let list = requirements
        .iter()
        .map(|r| format!("- `{r}`"))
        .collect::<Vec<String>>()
        .join("\n");

    Ok(format!(
        "<!--{marker}-->\nUpgrade dependencies to {}:\n\n{list}\n",
        metadata.tag
    ))
}

/// Marker metadata of a PR body, if it carries one.
pub fn parse_upgrade_metadata(body: &str) -> Option<UpgradeMetadata> {
    let captures = METADATA_REGEX.captures(body)?;
    let json = captures.name("metadata")?.as_str().trim();

    match serde_json::from_str::<UpgradeMarker>(json) {
        Ok(marker) => Some(marker.upgrade),
        Err(err) => {
            debug!("ignoring unrecognized PR metadata: {err}");
            None
        }
    }
}

/// Open PR matching `metadata` by marker, else by exact title for PRs opened
/// before markers existed.
pub fn find_upgrade_pr(
    prs: Vec<PullRequest>,
    metadata: &UpgradeMetadata,
    title: &str,
) -> Option<PullRequest> {
    let by_marker = prs.iter().position(|pr| {
        parse_upgrade_metadata(&pr.body).as_ref() == Some(metadata)
    });

    let index = by_marker.or_else(|| {
        prs.iter().position(|pr| {
            pr.title == title && parse_upgrade_metadata(&pr.body).is_none()
        })
    })?;

    prs.into_iter().nth(index)
}

impl Orchestrator {
    /// Open (or reuse) the PR bumping `requirements` in `repo` on top of
    /// `base`. Returns `None` when the repository is already up to date.
    ///
    /// The clone is always removed, whatever the outcome.
    pub async fn create_upgrade_pr(
        &self,
        repo: &str,
        base: &str,
        tag: &str,
        requirements: &[String],
    ) -> Result<Option<PullRequest>> {
        let metadata = UpgradeMetadata {
            repo: repo.to_string(),
            tag: tag.to_string(),
            base: base.to_string(),
        };

        let request = CreatePrRequest {
            repo: repo.to_string(),
            head_branch: upgrade_branch(tag),
            base_branch: base.to_string(),
            title: upgrade_title(tag),
            body: upgrade_body(&metadata, requirements)?,
        };

        if !self.forge.is_real() {
            console::notice(&format!(
                "Preview mode, skip creating upgrade PR for {repo}"
            ));
            return Ok(Some(self.forge.create_pull_request(request).await?));
        }

        console::plain(&format!("Creating upgrade PR for {repo}..."));

        let dir = self.clone_dir(repo);
        let result = self
            .push_upgrade_branch(&dir, &metadata, &request, requirements)
            .await;
        let cleanup = self.vcs.remove(&dir);

        let pushed = result.wrap_err_with(|| {
            format!("failed to create upgrade PR for {}/{repo}", self.owner())
        })?;
        cleanup?;

        if !pushed {
            console::notice(&format!(
                "{}/{repo} is already up to date",
                self.owner()
            ));
            return Ok(None);
        }

        let open = self.forge.get_pull_requests(repo, PrState::Open).await?;

        if let Some(pr) = find_upgrade_pr(open, &metadata, &request.title) {
            info!(
                "reusing upgrade PR #{} for {}/{repo}",
                pr.number,
                self.owner()
            );
            return Ok(Some(pr));
        }

        let pr = self.forge.create_pull_request(request).await?;
        console::success(&format!("Upgrade PR created: {}", pr.html_url));

        Ok(Some(pr))
    }

    /// Clone, bump and push the upgrade branch. Returns false when the bump
    /// left the working tree unchanged.
    async fn push_upgrade_branch(
        &self,
        dir: &Path,
        metadata: &UpgradeMetadata,
        request: &CreatePrRequest,
        requirements: &[String],
    ) -> Result<bool> {
        self.vcs.clone_repo(&metadata.repo, &metadata.base, dir)?;
        self.vcs.create_branch(dir, &request.head_branch)?;
        self.toolchain.upgrade(dir, requirements).await?;

        if !self.vcs.has_changes(dir)? {
            return Ok(false);
        }

        self.vcs.commit_all(dir, &request.title)?;
        self.vcs.push_branch(dir, &request.head_branch)?;

        Ok(true)
    }
}
