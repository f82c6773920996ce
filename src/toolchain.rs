//! Go toolchain runner: dependency bumps, streamed test runs and module proxy
//! refreshes.
use async_trait::async_trait;
use color_eyre::eyre::eyre;
use colored::Colorize;
use log::*;
use std::{
    path::Path,
    process::Stdio,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
};

use crate::{ReleaseError, Result};

/// Marker `go test` prints for a failing test.
const FAILURE_MARKER: &str = "--- FAIL";

/// Whether a line of `go test` output reports a failing test.
pub fn is_failure_line(line: &str) -> bool {
    line.contains(FAILURE_MARKER)
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Toolchain {
    /// Require every `module@version` in `requirements` and tidy the module.
    async fn upgrade(&self, dir: &Path, requirements: &[String]) -> Result<()>;

    /// Run the whole test suite, streaming its output.
    async fn test(&self, dir: &Path) -> Result<()>;

    /// Ask the module proxy to fetch `module@version` so fresh tags resolve.
    async fn refresh_proxy(&self, module: &str, version: &str) -> Result<()>;
}

/// [`Toolchain`] implementation that shells out to `go`.
pub struct GoToolchain {
    proxy: String,
    http: reqwest::Client,
}

impl GoToolchain {
    pub fn new(proxy: impl Into<String>) -> Self {
        Self {
            proxy: proxy.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn run(&self, dir: &Path, args: &[&str]) -> Result<()> {
        let purpose = format!("run go {}", args.join(" "));
        debug!("{purpose} in {}", dir.display());

        let output = Command::new("go")
            .args(args)
            .current_dir(dir)
            .output()
            .await?;

        if !output.status.success() {
            let mut message =
                String::from_utf8_lossy(&output.stderr).to_string();
            message.push_str(&String::from_utf8_lossy(&output.stdout));
            return Err(ReleaseError::command_failed(purpose, message.trim()));
        }

        Ok(())
    }
}

/// Print every line of `reader` and raise `failed` on a failure marker.
/// Output that is not valid UTF-8 is decoded lossily.
async fn drain_lines<R>(
    reader: R,
    failed: Arc<AtomicBool>,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut segments = BufReader::new(reader).split(b'\n');

    while let Some(segment) = segments.next_segment().await? {
        let segment = segment.strip_suffix(b"\r").unwrap_or(&segment[..]);
        let line = String::from_utf8_lossy(segment);

        if is_failure_line(&line) {
            failed.store(true, Ordering::SeqCst);
            println!("{}", line.red());
        } else {
            println!("{line}");
        }
    }

    Ok(())
}

#[async_trait]
impl Toolchain for GoToolchain {
    async fn upgrade(
        &self,
        dir: &Path,
        requirements: &[String],
    ) -> Result<()> {
        for requirement in requirements {
            info!("go get {requirement}");
            self.run(dir, &["get", requirement.as_str()]).await?;
        }

        self.run(dir, &["mod", "tidy"]).await
    }

    async fn test(&self, dir: &Path) -> Result<()> {
        info!("running go test ./... in {}", dir.display());

        let mut child = Command::new("go")
            .args(["test", "./..."])
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| eyre!("failed to capture go test stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| eyre!("failed to capture go test stderr"))?;

        let failed = Arc::new(AtomicBool::new(false));
        let out_task = tokio::spawn(drain_lines(stdout, Arc::clone(&failed)));
        let err_task = tokio::spawn(drain_lines(stderr, Arc::clone(&failed)));

        // the child is always reaped before a reader error is reported
        let out_result = out_task.await;
        let err_result = err_task.await;
        let status = child.wait().await?;

        out_result
            .map_err(|e| eyre!("go test stdout reader failed: {e}"))??;
        err_result
            .map_err(|e| eyre!("go test stderr reader failed: {e}"))??;

        if failed.load(Ordering::SeqCst) || !status.success() {
            return Err(ReleaseError::TestFailed(dir.display().to_string()));
        }

        Ok(())
    }

    async fn refresh_proxy(&self, module: &str, version: &str) -> Result<()> {
        let url = format!("{}/{}/@v/{}.info", self.proxy, module, version);
        info!("refreshing module proxy: {url}");

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReleaseError::command_failed(
                format!("refresh {module}@{version}"),
                format!("{status}: {}", body.trim()),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_failure_marker() {
        assert!(is_failure_line("--- FAIL: TestRelease (0.00s)"));
        assert!(is_failure_line("    --- FAIL: TestRelease/nested (0.01s)"));
    }

    #[test]
    fn ignores_passing_output() {
        assert!(!is_failure_line("--- PASS: TestRelease (0.00s)"));
        assert!(!is_failure_line("ok  github.com/goravel/gin 0.123s"));
        assert!(!is_failure_line("FAIL github.com/goravel/gin 0.123s"));
    }

    #[test]
    fn proxy_trailing_slash_is_trimmed() {
        let toolchain = GoToolchain::new("https://proxy.golang.org/");
        assert_eq!(toolchain.proxy, "https://proxy.golang.org");
    }

    #[tokio::test]
    async fn drain_lines_raises_flag_on_failure() {
        let output: &[u8] = b"=== RUN TestA\n--- FAIL: TestA (0.00s)\nFAIL\n";
        let failed = Arc::new(AtomicBool::new(false));

        drain_lines(output, Arc::clone(&failed)).await.unwrap();

        assert!(failed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn drain_lines_keeps_flag_clear_on_success() {
        let output: &[u8] = b"=== RUN TestA\n--- PASS: TestA (0.00s)\nok\n";
        let failed = Arc::new(AtomicBool::new(false));

        drain_lines(output, Arc::clone(&failed)).await.unwrap();

        assert!(!failed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn drain_lines_tolerates_invalid_utf8() {
        let output: &[u8] =
            b"=== RUN TestA\n\xff\xfe binary log\n--- PASS: TestA\n";
        let failed = Arc::new(AtomicBool::new(false));

        drain_lines(output, Arc::clone(&failed)).await.unwrap();

        assert!(!failed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn drain_lines_finds_failure_after_invalid_utf8() {
        let output: &[u8] =
            b"\xc3\x28 garbage\r\n--- FAIL: TestB (0.00s)\r\nFAIL";
        let failed = Arc::new(AtomicBool::new(false));

        drain_lines(output, Arc::clone(&failed)).await.unwrap();

        assert!(failed.load(Ordering::SeqCst));
    }
}
