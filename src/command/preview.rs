//! Release information preview command implementation.
use crate::{Result, console, orchestrator::Orchestrator};

/// Print the release information of `tag` for the framework, the patch
/// applications and, when `packages` is set, every package.
pub async fn execute(
    orchestrator: &Orchestrator,
    tag: &str,
    packages: bool,
) -> Result<()> {
    console::heading(&format!("Preview {tag}"));

    let infos = orchestrator.preview(tag, packages).await?;

    let mismatched = infos
        .iter()
        .filter(|i| i.has_version_mismatch())
        .map(|i| i.repo.as_str())
        .collect::<Vec<&str>>();

    if !mismatched.is_empty() {
        console::warning(&format!(
            "Version constant differs from {tag} in: {}",
            mismatched.join(", ")
        ));
    }

    console::success(&format!("Previewed {} repositories", infos.len()));

    Ok(())
}
