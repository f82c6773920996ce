use super::common::*;
use crate::{
    ReleaseError,
    forge::request::{GetFileContentRequest, ReleaseNotes},
    orchestrator::{CONFIRMED_QUESTION, MajorOptions, TESTED_QUESTION},
    resolver::ReleaseInformation,
};

/// Forge reads answering every resolution: the latest release is one patch
/// behind, the minor branch exists when `minor_branch_exists` and the version
/// file embeds `embedded`.
fn expect_resolution(
    mocks: &mut TestMocks,
    minor_branch_exists: bool,
    embedded: &'static str,
) {
    mocks
        .forge
        .expect_get_latest_release()
        .returning(|repo, _| Ok(Some(release(repo, "v1.16.1"))));
    mocks
        .forge
        .expect_check_branch_exists()
        .returning(move |_, _| Ok(minor_branch_exists));
    mocks
        .forge
        .expect_get_raw_file()
        .withf(|req: &GetFileContentRequest| {
            req.path == "support/constant.go"
        })
        .returning(move |_| {
            Ok(Some(format!(
                "package support\n\nconst Version string = \"{embedded}\"\n"
            )))
        });
    mocks
        .forge
        .expect_generate_release_notes()
        .returning(|req| {
            Ok(ReleaseNotes {
                name: req.tag.clone(),
                body: format!("**Full Changelog**: {}", req.previous_tag),
            })
        });
}

fn repos(infos: &[ReleaseInformation]) -> Vec<&str> {
    infos.iter().map(|i| i.repo.as_str()).collect()
}

#[tokio::test]
async fn preview_resolves_framework_and_patch_applications() {
    let mut mocks = TestMocks::preview();
    expect_resolution(&mut mocks, true, "v1.16.2");

    let orchestrator = mocks.build_with_config(small_config());

    let infos = orchestrator.preview("v1.16.2", false).await.unwrap();

    assert_eq!(repos(&infos), vec!["framework", "goravel-lite"]);
    assert_eq!(infos[0].latest_tag, "v1.16.1");
    assert_eq!(infos[0].branch, "v1.16.x");
    assert_eq!(infos[0].current_tag.as_deref(), Some("v1.16.2"));
    assert!(!infos[0].has_version_mismatch());
    assert_eq!(infos[1].current_tag, None);
    assert_eq!(infos[1].notes.body, "**Full Changelog**: v1.16.1");
}

#[tokio::test]
async fn preview_with_packages_and_base_branch() {
    let mut mocks = TestMocks::preview();
    expect_resolution(&mut mocks, false, "v1.16.1");

    let orchestrator = mocks.build_with_config(small_config());

    let infos = orchestrator.preview("v1.17.0", true).await.unwrap();

    assert_eq!(repos(&infos), vec!["framework", "gin", "goravel-lite"]);
    assert!(infos.iter().all(|i| i.branch == "master"));
    assert!(infos[0].has_version_mismatch());
}

#[tokio::test]
async fn preview_rejects_invalid_tag() {
    let orchestrator = TestMocks::preview().build();

    let result = orchestrator.preview("latest", false).await;

    assert!(matches!(result, Err(ReleaseError::InvalidVersion(_))));
}

#[tokio::test]
async fn patch_runs_end_to_end_in_preview() {
    let mut mocks = TestMocks::preview();
    expect_resolution(&mut mocks, true, "v1.16.2");

    mocks
        .prompt
        .expect_confirm()
        .withf(|message| message == CONFIRMED_QUESTION)
        .times(1)
        .returning(|_| Ok(true));
    mocks
        .prompt
        .expect_choice()
        .times(1)
        .returning(|_, choices| Ok(choices[0].clone()));

    // framework and goravel-lite are released, installer is not patched
    mocks
        .forge
        .expect_get_releases()
        .withf(|repo, _, _| repo == "framework" || repo == "goravel-lite")
        .times(2)
        .returning(|_, _, _| Ok(vec![]));
    mocks.forge.expect_create_release().never();
    mocks.forge.expect_create_pull_request().never();
    mocks.forge.expect_get_pull_request().never();

    let orchestrator = mocks.build_with_config(small_config());

    orchestrator.patch("v1.16.2").await.unwrap();
}

#[tokio::test]
async fn patch_aborts_when_a_repository_is_rejected() {
    let mut mocks = TestMocks::real();
    expect_resolution(&mut mocks, true, "v1.16.2");

    // the gate is declined, then the framework is rejected
    mocks
        .prompt
        .expect_confirm()
        .times(2)
        .returning(|_| Ok(false));
    mocks.forge.expect_get_releases().never();
    mocks.forge.expect_create_release().never();

    let orchestrator = mocks.build_with_config(small_config());

    let err = orchestrator.patch("v1.16.2").await.unwrap_err();

    assert!(matches!(
        err,
        ReleaseError::NotConfirmed { ref owner, ref repo }
            if owner == "goravel" && repo == "framework"
    ));
}

#[tokio::test]
async fn major_rejects_invalid_tag_before_prompting() {
    let orchestrator = TestMocks::real().build();

    let result = orchestrator
        .major(MajorOptions {
            tag: "1.x".into(),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(ReleaseError::InvalidVersion(_))));
}

#[tokio::test]
async fn major_opens_maintenance_line_in_real_mode() {
    let mut mocks = TestMocks::real();
    expect_resolution(&mut mocks, false, "v1.17.0");

    mocks
        .prompt
        .expect_confirm()
        .withf(|message| {
            message == TESTED_QUESTION || message == CONFIRMED_QUESTION
        })
        .times(2)
        .returning(|_| Ok(true));
    // one round for packages, one for applications
    mocks
        .prompt
        .expect_choice()
        .times(2)
        .returning(|_, choices| Ok(choices[0].clone()));

    // gin and goravel-lite are already up to date
    mocks.vcs.expect_clone_repo().returning(|_, _, _| Ok(()));
    mocks.vcs.expect_create_branch().returning(|_, _| Ok(()));
    mocks.vcs.expect_has_changes().times(2).returning(|_| Ok(false));
    mocks.vcs.expect_remove().returning(|_| Ok(()));
    mocks
        .toolchain
        .expect_upgrade()
        .times(2)
        .returning(|_, _| Ok(()));
    mocks.forge.expect_create_pull_request().never();

    // framework, gin, goravel-lite and installer
    mocks
        .forge
        .expect_get_releases()
        .times(4)
        .returning(|_, _, _| Ok(vec![]));
    mocks
        .forge
        .expect_create_release()
        .withf(|req| req.tag == "v1.17.0" && req.target_commitish == "master")
        .times(4)
        .returning(|req| Ok(release(&req.repo, &req.tag)));

    // framework and goravel-lite keep a maintenance line
    mocks
        .vcs
        .expect_push_branch()
        .withf(|_, branch| branch == "v1.17.x")
        .times(2)
        .returning(|_, _| Ok(()));
    mocks
        .forge
        .expect_set_default_branch()
        .withf(|repo, branch| repo == "goravel-lite" && branch == "v1.17.x")
        .times(1)
        .returning(|_, _| Ok(()));

    let orchestrator = mocks.build_with_config(small_config());

    orchestrator
        .major(MajorOptions {
            tag: "v1.17.0".into(),
            ..Default::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn major_smoke_tests_packages_when_gate_declined() {
    let mut mocks = TestMocks::real();
    mocks
        .prompt
        .expect_confirm()
        .withf(|message| message == TESTED_QUESTION)
        .times(1)
        .returning(|_| Ok(false));
    mocks
        .vcs
        .expect_clone_repo()
        .withf(|repo, branch, _| repo == "gin" && branch == "master")
        .times(1)
        .returning(|_, _, _| Ok(()));
    mocks
        .toolchain
        .expect_upgrade()
        .withf(|_, reqs| reqs == ["github.com/goravel/framework@dev"])
        .times(1)
        .returning(|_, _| Ok(()));
    mocks
        .toolchain
        .expect_test()
        .times(1)
        .returning(|_| Err(ReleaseError::TestFailed("gin".into())));
    mocks.vcs.expect_remove().times(1).returning(|_| Ok(()));
    mocks.forge.expect_get_latest_release().never();
    mocks.forge.expect_create_release().never();

    let orchestrator = mocks.build_with_config(small_config());

    let err = orchestrator
        .major(MajorOptions {
            tag: "v1.17.0".into(),
            framework_branch: Some("dev".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "failed to test in gin");
}

#[tokio::test]
async fn refresh_proxy_covers_framework_and_packages() {
    let mut mocks = TestMocks::real();
    mocks
        .toolchain
        .expect_refresh_proxy()
        .withf(|module, version| {
            (module == "github.com/goravel/framework"
                || module == "github.com/goravel/gin")
                && version == "v1.17.0"
        })
        .times(2)
        .returning(|_, _| Ok(()));

    let orchestrator = mocks.build_with_config(small_config());

    orchestrator.refresh_proxy("v1.17.0").await.unwrap();
}

#[tokio::test]
async fn smoke_test_removes_clone_on_failure() {
    let mut mocks = TestMocks::real();
    mocks
        .vcs
        .expect_clone_repo()
        .withf(|repo, branch, _| repo == "gin" && branch == "master")
        .times(1)
        .returning(|_, _, _| Ok(()));
    mocks
        .toolchain
        .expect_upgrade()
        .withf(|_, reqs| reqs == ["github.com/goravel/framework@master"])
        .times(1)
        .returning(|_, _| Ok(()));
    mocks
        .toolchain
        .expect_test()
        .times(1)
        .returning(|_| Err(ReleaseError::TestFailed("gin".into())));
    mocks
        .vcs
        .expect_remove()
        .withf(|dir| dir == clone_dir("gin").as_path())
        .times(1)
        .returning(|_| Ok(()));

    let orchestrator = mocks.build_with_config(small_config());

    let err = orchestrator.smoke_test_packages("master").await.unwrap_err();

    assert_eq!(err.to_string(), "failed to test in gin");
}
