//! Operator-facing panels and summaries.
use colored::Colorize;

use crate::{config::ReleaseConfig, console, resolver::ReleaseInformation};

const DIVIDER_WIDTH: usize = 60;

/// Panel describing one pending release.
pub fn release_information(owner: &str, info: &ReleaseInformation) -> String {
    let mut lines = vec![
        "-".repeat(DIVIDER_WIDTH),
        format!("Please check {owner}/{} information:", info.repo)
            .yellow()
            .to_string(),
        String::new(),
        format!("The latest tag is:     {}", info.latest_tag.red()),
        format!("The tag to release is: {}", info.tag.red()),
        format!("The target branch is:  {}", info.branch.red()),
    ];

    if let Some(current) = info.current_tag.as_deref() {
        lines.push(format!("The current tag is:    {}", current.red()));

        if info.has_version_mismatch() {
            lines.push(String::new());
            lines.push(
                "The current tag is not the same as the tag to release"
                    .red()
                    .to_string(),
            );
        }
    }

    lines.push(String::new());
    lines.push(info.notes.name.clone());
    lines.push(info.notes.body.clone());

    lines.join("\n")
}

/// Follow-ups left to the operator after a major release.
pub fn major_follow_ups(
    config: &ReleaseConfig,
    maintenance_branch: Option<&str>,
) -> Vec<String> {
    let owner = &config.owner;
    let mut jobs = vec![
        format!(
            "Install the new version via {owner}/installer and test the \
             project works fine"
        ),
        format!(
            "Merge the upgrade document PR: \
             https://github.com/{owner}/docs/pulls"
        ),
        "Update the support policy with the new release".to_string(),
    ];

    if let Some(branch) = maintenance_branch {
        for app in config.applications.iter().filter(|a| a.default_branch) {
            jobs.push(format!(
                "Verify {owner}/{name} uses {branch} as default branch: \
                 https://github.com/{owner}/{name}/settings",
                name = app.name
            ));
        }
    }

    jobs.iter()
        .enumerate()
        .map(|(i, job)| format!("{}. {job}", i + 1))
        .collect()
}

pub fn major_success(
    config: &ReleaseConfig,
    tag: &str,
    maintenance_branch: Option<&str>,
) {
    console::success(&format!(
        "Release {}/{} and sub-packages {tag} success!",
        config.owner, config.framework.name
    ));
    console::notice("The rest jobs:");

    for job in major_follow_ups(config, maintenance_branch) {
        console::plain(&job);
    }
}

pub fn patch_success(config: &ReleaseConfig, tag: &str) {
    let applications = config
        .patch_applications()
        .into_iter()
        .map(|a| format!("{}/{}", config.owner, a.name))
        .collect::<Vec<String>>();

    console::success(&format!(
        "Release {}/{} {tag} success!",
        config.owner, config.framework.name
    ));

    if !applications.is_empty() {
        console::success(&format!("Upgraded: {}", applications.join(", ")));
    }
}
