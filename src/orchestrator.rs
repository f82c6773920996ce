use color_eyre::eyre::WrapErr;
use derive_builder::Builder;
use log::*;
use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{
    ReleaseError, Result,
    config::{ReleaseConfig, RepositoryConfig},
    console::{self, Prompt},
    forge::{
        config::RELEASE_EXIST_PAGE_SIZE, manager::ForgeManager,
        request::CreateReleaseRequest,
    },
    resolver::{ReleaseInformation, Resolver, maintenance_branch, parse_tag},
    toolchain::Toolchain,
    vcs::Vcs,
};

pub mod display;
pub mod merge;
pub mod upgrade;

pub use merge::TrackedPullRequests;

/// Gate asked before the optional sub-package smoke test.
pub const TESTED_QUESTION: &str = "Did you test in sub-packages?";
/// Gate asked before the per-repository confirmation.
pub const CONFIRMED_QUESTION: &str =
    "Did you confirm the release information?";

/// Options of a major release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MajorOptions {
    pub tag: String,
    /// Refresh the module proxy before releasing.
    pub refresh: bool,
    /// Framework branch the sub-packages are tested and refreshed against.
    pub framework_branch: Option<String>,
}

#[derive(Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct OrchestratorParams {
    pub config: Rc<ReleaseConfig>,
    pub forge: Rc<ForgeManager>,
    pub vcs: Rc<dyn Vcs>,
    pub toolchain: Rc<dyn Toolchain>,
    pub prompt: Rc<dyn Prompt>,
}

impl OrchestratorParamsBuilder {
    pub fn build(&self) -> Result<Orchestrator> {
        let params = self._build().map_err(|e| {
            ReleaseError::invalid_config(format!(
                "Failed to build orchestrator: {}",
                e
            ))
        })?;
        Ok(Orchestrator::new(params))
    }
}

pub struct Orchestrator {
    config: Rc<ReleaseConfig>,
    forge: Rc<ForgeManager>,
    vcs: Rc<dyn Vcs>,
    toolchain: Rc<dyn Toolchain>,
    prompt: Rc<dyn Prompt>,
    resolver: Resolver,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorParamsBuilder {
        OrchestratorParamsBuilder::default()
    }

    pub fn new(params: OrchestratorParams) -> Self {
        Self {
            resolver: Resolver::new(
                Rc::clone(&params.config),
                Rc::clone(&params.forge),
            ),
            config: params.config,
            forge: params.forge,
            vcs: params.vcs,
            toolchain: params.toolchain,
            prompt: params.prompt,
        }
    }

    fn owner(&self) -> &str {
        &self.config.owner
    }

    fn clone_dir(&self, repo: &str) -> PathBuf {
        self.config.workdir.join(repo)
    }

    /// `module@version` requirement for every dependency.
    fn requirements(
        &self,
        dependencies: &[String],
        version: &str,
    ) -> Vec<String> {
        dependencies
            .iter()
            .map(|d| format!("{}@{}", self.config.module_path(d), version))
            .collect()
    }

    /// Release the framework, every package and every releasable
    /// application at `tag`.
    pub async fn major(&self, options: MajorOptions) -> Result<()> {
        let tag = options.tag.as_str();
        parse_tag(tag)?;

        let framework_branch = options
            .framework_branch
            .clone()
            .unwrap_or_else(|| self.config.base_branch.clone());

        if options.refresh {
            self.refresh_proxy(&framework_branch).await?;
        }

        if !self.prompt.confirm(TESTED_QUESTION)? {
            self.smoke_test_packages(&framework_branch).await?;
        }

        let framework_info =
            self.resolver.resolve(&self.config.framework, tag).await?;

        let packages = self.config.package_repositories();
        let mut package_infos = vec![];
        for package in packages.iter() {
            package_infos.push(self.resolver.resolve(package, tag).await?);
        }

        let releasable = self
            .config
            .applications
            .iter()
            .filter(|a| a.release)
            .collect::<Vec<&RepositoryConfig>>();
        let mut application_infos = vec![];
        for application in releasable {
            application_infos
                .push(self.resolver.resolve(application, tag).await?);
        }

        if !self.prompt.confirm(CONFIRMED_QUESTION)? {
            let mut infos = vec![framework_info.clone()];
            infos.extend(package_infos.iter().cloned());
            infos.extend(application_infos.iter().cloned());
            self.confirm_release_informations(&infos)?;
        }

        self.release_repo(&framework_info).await?;

        let mut tracked: TrackedPullRequests = vec![];
        for package in packages.iter() {
            let pr = self
                .create_upgrade_pr(
                    &package.name,
                    &self.config.base_branch,
                    tag,
                    &self.requirements(&package.dependencies, tag),
                )
                .await?;
            tracked.push((package.name.clone(), pr));
        }

        self.check_prs_merge_status(tracked)
            .await
            .wrap_err("failed to check upgrade PRs merge status")?;

        for info in package_infos.iter() {
            self.release_repo(info).await?;
        }

        let mut tracked: TrackedPullRequests = vec![];
        for application in self.config.applications.iter() {
            let pr = if application.dependencies.is_empty() {
                None
            } else {
                self.create_upgrade_pr(
                    &application.name,
                    &self.config.base_branch,
                    tag,
                    &self.requirements(&application.dependencies, tag),
                )
                .await?
            };
            tracked.push((application.name.clone(), pr));
        }

        self.check_prs_merge_status(tracked)
            .await
            .wrap_err("failed to check upgrade PRs merge status")?;

        for info in application_infos.iter() {
            self.release_repo(info).await?;
        }

        let maintenance = maintenance_branch(tag)?;

        if let Some(branch) = maintenance.as_deref() {
            self.open_maintenance_line(branch).await?;
        }

        display::major_success(&self.config, tag, maintenance.as_deref());

        Ok(())
    }

    /// Release the framework and the patch applications at `tag`, each from
    /// its own target branch.
    pub async fn patch(&self, tag: &str) -> Result<()> {
        parse_tag(tag)?;

        let framework_info =
            self.resolver.resolve(&self.config.framework, tag).await?;

        let applications = self.config.patch_applications();
        let mut application_infos = vec![];
        for application in applications.iter() {
            application_infos
                .push(self.resolver.resolve(application, tag).await?);
        }

        if !self.prompt.confirm(CONFIRMED_QUESTION)? {
            let mut infos = vec![framework_info.clone()];
            infos.extend(application_infos.iter().cloned());
            self.confirm_release_informations(&infos)?;
        }

        self.release_repo(&framework_info).await?;

        let framework = vec![self.config.framework.name.clone()];
        let mut tracked: TrackedPullRequests = vec![];
        for (application, info) in
            applications.iter().zip(application_infos.iter())
        {
            let pr = if application.dependencies.is_empty() {
                None
            } else {
                self.create_upgrade_pr(
                    &application.name,
                    &info.branch,
                    tag,
                    &self.requirements(&framework, tag),
                )
                .await?
            };
            tracked.push((application.name.clone(), pr));
        }

        self.check_prs_merge_status(tracked)
            .await
            .wrap_err("failed to check upgrade PRs merge status")?;

        for (application, info) in
            applications.iter().zip(application_infos.iter())
        {
            if application.release {
                self.release_repo(info).await?;
            }
        }

        display::patch_success(&self.config, tag);

        Ok(())
    }

    /// Resolve and print what a release of `tag` would contain. Never
    /// prompts or mutates anything.
    pub async fn preview(
        &self,
        tag: &str,
        packages: bool,
    ) -> Result<Vec<ReleaseInformation>> {
        parse_tag(tag)?;

        let mut repositories = vec![self.config.framework.clone()];
        if packages {
            repositories.extend(self.config.package_repositories());
        }
        repositories.extend(self.config.patch_applications());

        let mut infos = vec![];
        for repository in repositories.iter() {
            let info = self.resolver.resolve(repository, tag).await?;
            console::plain(&display::release_information(
                self.owner(),
                &info,
            ));
            infos.push(info);
        }

        Ok(infos)
    }

    /// Show every release information and ask the operator to confirm each
    /// repository. The first rejection aborts.
    pub fn confirm_release_informations(
        &self,
        infos: &[ReleaseInformation],
    ) -> Result<()> {
        for info in infos {
            console::plain(&display::release_information(self.owner(), info));

            let question =
                format!("{}/{} confirmed?", self.owner(), info.repo);
            if !self.prompt.confirm(&question)? {
                return Err(ReleaseError::not_confirmed(
                    self.owner(),
                    &info.repo,
                ));
            }
        }

        Ok(())
    }

    /// Whether `tag` is among the most recent releases of `repo`.
    pub async fn is_release_exist(
        &self,
        repo: &str,
        tag: &str,
    ) -> Result<bool> {
        let releases = self
            .forge
            .get_releases(repo, 1, RELEASE_EXIST_PAGE_SIZE)
            .await?;

        Ok(releases.iter().any(|r| r.tag_name == tag))
    }

    /// Create the release described by `info` unless it already exists.
    pub async fn release_repo(&self, info: &ReleaseInformation) -> Result<()> {
        let exists = self
            .is_release_exist(&info.repo, &info.tag)
            .await
            .wrap_err_with(|| {
                format!(
                    "failed to check release {} for {}/{}",
                    info.tag,
                    self.owner(),
                    info.repo
                )
            })?;

        if exists {
            console::notice(&format!(
                "{}/{} {} has already been released",
                self.owner(),
                info.repo,
                info.tag
            ));
            return Ok(());
        }

        let release = self
            .forge
            .create_release(CreateReleaseRequest {
                repo: info.repo.clone(),
                tag: info.tag.clone(),
                target_commitish: info.branch.clone(),
                name: info.notes.name.clone(),
                body: info.notes.body.clone(),
            })
            .await
            .wrap_err_with(|| {
                format!(
                    "failed to create release {} for {}/{}",
                    info.tag,
                    self.owner(),
                    info.repo
                )
            })?;

        console::success(&format!(
            "[{}/{}] release {} success!",
            self.owner(),
            info.repo,
            info.tag
        ));
        console::success(&format!("Release link: {}", release.html_url));

        Ok(())
    }

    /// Push `branch` for every repository keeping a maintenance line and make
    /// it the default branch where configured.
    async fn open_maintenance_line(&self, branch: &str) -> Result<()> {
        let mut repositories = vec![&self.config.framework];
        repositories.extend(self.config.applications.iter());

        for repository in repositories {
            if !repository.maintenance_branch {
                continue;
            }

            self.push_branch(&repository.name, branch)?;

            if repository.default_branch {
                self.forge
                    .set_default_branch(&repository.name, branch)
                    .await?;
            }
        }

        Ok(())
    }

    /// Create `branch` from the base branch of `repo` and force push it.
    pub fn push_branch(&self, repo: &str, branch: &str) -> Result<()> {
        if !self.forge.is_real() {
            console::notice(&format!(
                "Preview mode, skip pushing branch {branch} for {repo}"
            ));
            return Ok(());
        }

        let dir = self.clone_dir(repo);
        let result = self.push_branch_from_clone(repo, branch, &dir);
        let cleanup = self.vcs.remove(&dir);

        result.wrap_err_with(|| {
            format!("failed to push branch {branch} for {repo}")
        })?;
        cleanup
    }

    fn push_branch_from_clone(
        &self,
        repo: &str,
        branch: &str,
        dir: &Path,
    ) -> Result<()> {
        self.vcs.clone_repo(repo, &self.config.base_branch, dir)?;
        self.vcs.create_branch(dir, branch)?;
        self.vcs.push_branch(dir, branch)
    }

    /// Ask the module proxy to fetch the framework and every package at
    /// `version`.
    pub async fn refresh_proxy(&self, version: &str) -> Result<()> {
        let mut repositories = vec![self.config.framework.name.clone()];
        repositories.extend(self.config.packages.iter().cloned());

        for repo in repositories {
            self.toolchain
                .refresh_proxy(&self.config.module_path(&repo), version)
                .await?;
        }

        console::success("Refreshing module proxy success!");

        Ok(())
    }

    /// Bump every package to the framework at `framework_branch` and run its
    /// tests.
    pub async fn smoke_test_packages(
        &self,
        framework_branch: &str,
    ) -> Result<()> {
        let requirements = self.requirements(
            &[self.config.framework.name.clone()],
            framework_branch,
        );

        for package in self.config.packages.iter() {
            let dir = self.clone_dir(package);
            let result =
                self.smoke_test_package(package, &requirements, &dir).await;
            let cleanup = self.vcs.remove(&dir);

            result.wrap_err_with(|| format!("failed to test in {package}"))?;
            cleanup?;
        }

        console::success("Testing in sub-packages success!");

        Ok(())
    }

    async fn smoke_test_package(
        &self,
        package: &str,
        requirements: &[String],
        dir: &Path,
    ) -> Result<()> {
        info!("testing {package} against {}", requirements.join(", "));
        self.vcs.clone_repo(package, &self.config.base_branch, dir)?;
        self.toolchain.upgrade(dir, requirements).await?;
        self.toolchain.test(dir).await
    }
}
