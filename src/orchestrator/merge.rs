//! Operator-paced wait for upgrade pull requests to merge.
use log::*;

use crate::{
    Result, console,
    forge::request::PullRequest,
    orchestrator::Orchestrator,
};

/// Upgrade pull requests by repository, in processing order. `None` means
/// the repository needed no upgrade.
pub type TrackedPullRequests = Vec<(String, Option<PullRequest>)>;

/// Question asked before every merge status check.
pub const CHECK_QUESTION: &str = "Check PRs merge status?";
/// Only choice offered by the merge status prompt.
pub const CHECK_CHOICE: &str = "Check";

/// One line per tracked entry: the files view of its PR or a no-op notice.
pub fn tracked_summary(tracked: &TrackedPullRequests) -> Vec<String> {
    tracked
        .iter()
        .map(|(repo, pr)| match pr {
            Some(pr) => format!("{repo:<10}: {}/files", pr.html_url),
            None => format!("{repo:<10}: no need to upgrade"),
        })
        .collect()
}

impl Orchestrator {
    /// Wait until every tracked pull request is merged.
    ///
    /// Each round starts with a choice prompt; merged entries are dropped and
    /// the loop ends once nothing remains. A prompt error ends the loop with
    /// that error.
    pub async fn check_prs_merge_status(
        &self,
        mut tracked: TrackedPullRequests,
    ) -> Result<()> {
        for line in tracked_summary(&tracked) {
            console::plain(&line);
        }

        let choices = vec![CHECK_CHOICE.to_string()];

        loop {
            let choice = self.prompt.choice(CHECK_QUESTION, &choices)?;

            if choice != CHECK_CHOICE {
                continue;
            }

            let mut not_merged = vec![];

            for (repo, entry) in tracked.iter_mut() {
                let Some(number) = entry.as_ref().map(|pr| pr.number) else {
                    continue;
                };

                if self.check_pr_merge_status(repo, number).await? {
                    console::success(&format!(
                        "{}/{} merged",
                        self.owner(),
                        repo
                    ));
                    *entry = None;
                } else {
                    not_merged.push(format!("{}/{}", self.owner(), repo));
                }
            }

            if not_merged.is_empty() {
                return Ok(());
            }

            console::notice(&format!(
                "Not merged PRs: {}",
                not_merged.join(", ")
            ));
        }
    }

    /// Whether PR `number` of `repo` is merged. Always true outside real
    /// mode.
    pub async fn check_pr_merge_status(
        &self,
        repo: &str,
        number: u64,
    ) -> Result<bool> {
        if !self.forge.is_real() {
            console::notice(&format!(
                "Preview mode, skip checking merge status for {}/{}",
                self.owner(),
                repo
            ));
            return Ok(true);
        }

        let pr = self.forge.get_pull_request(repo, number).await?;
        debug!("{}/{repo}#{number} merged: {}", self.owner(), pr.merged);

        Ok(pr.merged)
    }
}
