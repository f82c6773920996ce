//! Release information resolution.
//!
//! Gathers everything the operator needs to confirm a release of one
//! repository: the latest related release, the branch the release targets,
//! the version embedded in the code and the generated release notes.
use color_eyre::eyre::WrapErr;
use log::*;
use regex::Regex;
use std::{rc::Rc, sync::LazyLock};

use crate::{
    ReleaseError, Result,
    config::{ReleaseConfig, RepositoryConfig},
    forge::{
        manager::ForgeManager,
        request::{GenerateNotesRequest, GetFileContentRequest, ReleaseNotes},
    },
};

static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Version\s*.*?=\s*"(?<version>[^"]+)""#).unwrap()
});

/// Everything known about one pending release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInformation {
    pub repo: String,
    /// Tag to release.
    pub tag: String,
    /// Latest related release, empty when the repository was never released.
    pub latest_tag: String,
    /// Version embedded in the code, for repositories that embed one.
    pub current_tag: Option<String>,
    /// Branch the release targets.
    pub branch: String,
    pub notes: ReleaseNotes,
}

impl ReleaseInformation {
    /// Whether the embedded version disagrees with the tag to release.
    pub fn has_version_mismatch(&self) -> bool {
        self.current_tag
            .as_ref()
            .is_some_and(|current| current != &self.tag)
    }
}

/// Extract the version assigned to a `Version` constant.
pub fn extract_version(content: &str) -> Option<String> {
    VERSION_REGEX
        .captures(content)
        .map(|caps| caps["version"].to_string())
}

/// Parse a `v`-prefixed tag.
pub fn parse_tag(tag: &str) -> Result<semver::Version> {
    let version = semver::Version::parse(tag.trim_start_matches('v'))?;
    Ok(version)
}

/// `{major}.{minor}.x` branch of a tag: `v1.16.2` becomes `v1.16.x`.
pub fn minor_branch(tag: &str) -> Result<String> {
    let version = parse_tag(tag)?;
    Ok(format!("v{}.{}.x", version.major, version.minor))
}

/// Maintenance branch opened by a tag. Only tags starting a minor line
/// (`vX.Y.0`) open one.
pub fn maintenance_branch(tag: &str) -> Result<Option<String>> {
    let version = parse_tag(tag)?;

    if version.patch != 0 || !version.pre.is_empty() {
        return Ok(None);
    }

    Ok(Some(minor_branch(tag)?))
}

pub struct Resolver {
    config: Rc<ReleaseConfig>,
    forge: Rc<ForgeManager>,
}

impl Resolver {
    pub fn new(config: Rc<ReleaseConfig>, forge: Rc<ForgeManager>) -> Self {
        Self { config, forge }
    }

    /// Build the release information of `repo` for `tag`.
    pub async fn resolve(
        &self,
        repo: &RepositoryConfig,
        tag: &str,
    ) -> Result<ReleaseInformation> {
        let info = self.resolve_inner(repo, tag).await.wrap_err_with(|| {
            format!(
                "failed to resolve release information of {}/{}",
                self.config.owner, repo.name
            )
        })?;

        Ok(info)
    }

    async fn resolve_inner(
        &self,
        repo: &RepositoryConfig,
        tag: &str,
    ) -> Result<ReleaseInformation> {
        info!("resolving release information for {}", repo.name);

        let latest_tag = self.latest_tag(&repo.name, tag).await?;
        let branch = self.branch_from_tag(&repo.name, tag).await?;

        let current_tag = if repo.embeds_version {
            Some(self.current_tag(&repo.name, &branch).await?)
        } else {
            None
        };

        let notes = self
            .generate_notes(&repo.name, tag, &latest_tag, &branch)
            .await?;

        Ok(ReleaseInformation {
            repo: repo.name.clone(),
            tag: tag.to_string(),
            latest_tag,
            current_tag,
            branch,
            notes,
        })
    }

    /// Tag of the latest related release, empty when there is none.
    pub async fn latest_tag(&self, repo: &str, tag: &str) -> Result<String> {
        let latest = self.forge.get_latest_release(repo, tag).await?;
        Ok(latest.map(|r| r.tag_name).unwrap_or_default())
    }

    /// Target branch of `tag`: its minor branch when present on the
    /// repository, the base branch otherwise.
    pub async fn branch_from_tag(
        &self,
        repo: &str,
        tag: &str,
    ) -> Result<String> {
        let branch = minor_branch(tag)?;

        if self.forge.check_branch_exists(repo, &branch).await? {
            debug!("{repo}: releasing from {branch}");
            return Ok(branch);
        }

        Ok(self.config.base_branch.clone())
    }

    /// Version embedded in the version file of `repo` on `branch`.
    pub async fn current_tag(
        &self,
        repo: &str,
        branch: &str,
    ) -> Result<String> {
        let content = self
            .forge
            .get_raw_file(GetFileContentRequest {
                repo: repo.to_string(),
                branch: branch.to_string(),
                path: self.config.version_file.clone(),
            })
            .await?;

        content
            .as_deref()
            .and_then(extract_version)
            .ok_or_else(|| ReleaseError::VersionNotFound {
                owner: self.config.owner.clone(),
                repo: repo.to_string(),
                path: self.config.version_file.clone(),
            })
    }

    pub async fn generate_notes(
        &self,
        repo: &str,
        tag: &str,
        previous_tag: &str,
        branch: &str,
    ) -> Result<ReleaseNotes> {
        self.forge
            .generate_release_notes(GenerateNotesRequest {
                repo: repo.to_string(),
                tag: tag.to_string(),
                previous_tag: previous_tag.to_string(),
                target_commitish: branch.to_string(),
            })
            .await
    }
}
