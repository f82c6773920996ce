//! Git working copy operations used by upgrade pull requests and maintenance
//! branches.
//!
//! Every operation works on a local clone directory. Clones are shallow
//! (depth 1) and authenticate over HTTPS with the configured token.
use git2::RemoteCallbacks;
use log::*;
use secrecy::ExposeSecret;
use std::path::Path;

use crate::{Result, forge::config::RemoteConfig};

/// Remote name used for clones.
const DEFAULT_REMOTE: &str = "origin";
/// Username paired with a token for HTTPS authentication.
const TOKEN_USER: &str = "x-access-token";

/// Create Git authentication callbacks for username/token authentication.
fn get_auth_callbacks<'r>(user: String, token: String) -> RemoteCallbacks<'r> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(move |_url, _username, _allowed| {
        git2::Cred::userpass_plaintext(&user, &token)
    });
    callbacks
}

/// Typed git operations on a local clone.
#[cfg_attr(test, mockall::automock)]
pub trait Vcs {
    /// Shallow clone `branch` of `repo` into `dir`, replacing any previous
    /// clone at that path.
    fn clone_repo(&self, repo: &str, branch: &str, dir: &Path) -> Result<()>;
    /// Create `branch` from HEAD (overwriting an existing one) and check it
    /// out.
    fn create_branch(&self, dir: &Path, branch: &str) -> Result<()>;
    /// Whether the working tree has staged, unstaged or untracked changes.
    fn has_changes(&self, dir: &Path) -> Result<bool>;
    /// Stage every change and commit it on the current branch.
    fn commit_all(&self, dir: &Path, message: &str) -> Result<()>;
    /// Force push `branch` to the remote.
    fn push_branch(&self, dir: &Path, branch: &str) -> Result<()>;
    /// Remove a clone directory. A missing directory is not an error.
    fn remove(&self, dir: &Path) -> Result<()>;
}

/// [`Vcs`] implementation backed by libgit2.
pub struct GitVcs {
    config: RemoteConfig,
}

impl GitVcs {
    pub fn new(config: RemoteConfig) -> Self {
        Self { config }
    }

    fn callbacks<'r>(&self) -> RemoteCallbacks<'r> {
        get_auth_callbacks(
            TOKEN_USER.to_string(),
            self.config.token.expose_secret().to_string(),
        )
    }
}

impl Vcs for GitVcs {
    fn clone_repo(&self, repo: &str, branch: &str, dir: &Path) -> Result<()> {
        self.remove(dir)?;

        let url = self.config.clone_url(repo);
        info!("cloning {url} ({branch}) into {}", dir.display());

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.depth(1);
        fetch_options.remote_callbacks(self.callbacks());

        let mut builder = git2::build::RepoBuilder::new();
        builder
            .fetch_options(fetch_options)
            .branch(branch)
            .clone(&url, dir)?;

        Ok(())
    }

    fn create_branch(&self, dir: &Path, branch: &str) -> Result<()> {
        info!("creating branch: {branch}");
        let repo = git2::Repository::open(dir)?;
        let commit = repo.head()?.peel_to_commit()?;
        repo.branch(branch, &commit, true)?;

        let ref_name = format!("refs/heads/{}", branch);
        let target_obj = repo.revparse_single(&ref_name)?;
        repo.checkout_tree(&target_obj, None)?;
        repo.set_head(&ref_name)?;
        Ok(())
    }

    fn has_changes(&self, dir: &Path) -> Result<bool> {
        let repo = git2::Repository::open(dir)?;
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true);
        let statuses = repo.statuses(Some(&mut opts))?;
        debug!("{} changed entries in {}", statuses.len(), dir.display());
        Ok(!statuses.is_empty())
    }

    fn commit_all(&self, dir: &Path, message: &str) -> Result<()> {
        debug!("committing changes with msg: {message}");
        let repo = git2::Repository::open(dir)?;

        let mut index = repo.index()?;
        index.add_all(["."], git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;

        let config = repo.config()?.snapshot()?;
        let user = config.get_str("user.name")?;
        let email = config.get_str("user.email")?;
        debug!("using committer: user: {user}, email: {email}");

        let oid = index.write_tree()?;
        let tree = repo.find_tree(oid)?;
        let committer = git2::Signature::now(user, email)?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };
        let parents = parent.iter().collect::<Vec<&git2::Commit>>();

        repo.commit(
            Some("HEAD"),
            &committer,
            &committer,
            message,
            &tree,
            &parents,
        )?;
        Ok(())
    }

    fn push_branch(&self, dir: &Path, branch: &str) -> Result<()> {
        info!("pushing branch {branch}");
        let repo = git2::Repository::open(dir)?;
        let mut push_opts = git2::PushOptions::default();
        push_opts.remote_callbacks(self.callbacks());

        let mut remote = repo.find_remote(DEFAULT_REMOTE)?;

        // + indicates "force" push
        let ref_spec = format!("+refs/heads/{branch}:refs/heads/{branch}");
        remote.push(&[ref_spec], Some(&mut push_opts))?;

        Ok(())
    }

    fn remove(&self, dir: &Path) -> Result<()> {
        if dir.exists() {
            debug!("removing {}", dir.display());
            std::fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}
