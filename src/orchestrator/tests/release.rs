use super::common::*;
use crate::{
    ReleaseError, forge::request::CreateReleaseRequest,
    resolver::ReleaseInformation,
};

#[tokio::test]
async fn release_exist_matches_tag_exactly() {
    let mut mocks = TestMocks::real();
    mocks
        .forge
        .expect_get_releases()
        .withf(|repo, page, per_page| {
            repo == "framework" && *page == 1 && *per_page == 10
        })
        .times(2)
        .returning(|repo, _, _| Ok(vec![release(repo, "V1.16.0")]));

    let orchestrator = mocks.build();

    assert!(
        !orchestrator
            .is_release_exist("framework", "v1.16.0")
            .await
            .unwrap()
    );
    assert!(
        orchestrator
            .is_release_exist("framework", "V1.16.0")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn release_repo_skips_existing_release() {
    let mut mocks = TestMocks::real();
    mocks
        .forge
        .expect_get_releases()
        .returning(|repo, _, _| {
            Ok(vec![release(repo, "v1.16.1"), release(repo, "v1.16.0")])
        });
    mocks.forge.expect_create_release().never();

    let orchestrator = mocks.build();
    let info = release_information("framework", "v1.16.0");

    orchestrator.release_repo(&info).await.unwrap();
}

#[tokio::test]
async fn release_repo_targets_resolved_branch() {
    let mut mocks = TestMocks::real();
    mocks
        .forge
        .expect_get_releases()
        .returning(|_, _, _| Ok(vec![]));
    mocks
        .forge
        .expect_create_release()
        .withf(|req: &CreateReleaseRequest| {
            req.repo == "framework"
                && req.tag == "v1.16.2"
                && req.target_commitish == "v1.16.x"
                && req.name == "v1.16.2"
                && req.body == "## What's Changed"
        })
        .times(1)
        .returning(|req| Ok(release(&req.repo, &req.tag)));

    let orchestrator = mocks.build();
    let info = ReleaseInformation {
        branch: "v1.16.x".into(),
        ..release_information("framework", "v1.16.2")
    };

    orchestrator.release_repo(&info).await.unwrap();
}

#[tokio::test]
async fn release_repo_in_preview_never_creates() {
    let mut mocks = TestMocks::preview();
    mocks
        .forge
        .expect_get_releases()
        .times(1)
        .returning(|_, _, _| Ok(vec![]));
    mocks.forge.expect_create_release().never();

    let orchestrator = mocks.build();
    let info = release_information("gin", "v1.16.0");

    orchestrator.release_repo(&info).await.unwrap();
}

#[tokio::test]
async fn release_repo_propagates_forge_failure() {
    let mut mocks = TestMocks::real();
    mocks
        .forge
        .expect_get_releases()
        .returning(|_, _, _| Ok(vec![]));
    mocks
        .forge
        .expect_create_release()
        .returning(|_| Err(ReleaseError::forge("boom")));

    let orchestrator = mocks.build();
    let info = release_information("gin", "v1.16.0");

    let err = orchestrator.release_repo(&info).await.unwrap_err();
    let ReleaseError::Other(report) = err else {
        panic!("expected wrapped error");
    };
    assert_eq!(
        report.to_string(),
        "failed to create release v1.16.0 for goravel/gin"
    );
    assert!(report.root_cause().to_string().contains("boom"));
}

#[tokio::test]
async fn release_repo_names_repository_when_lookup_fails() {
    let mut mocks = TestMocks::real();
    mocks
        .forge
        .expect_get_releases()
        .returning(|_, _, _| Err(ReleaseError::forge("not found")));
    mocks.forge.expect_create_release().never();

    let orchestrator = mocks.build();
    let info = release_information("gin", "v1.16.0");

    let err = orchestrator.release_repo(&info).await.unwrap_err();

    let ReleaseError::Other(report) = err else {
        panic!("expected wrapped error");
    };
    assert_eq!(
        report.to_string(),
        "failed to check release v1.16.0 for goravel/gin"
    );
    assert!(report.root_cause().to_string().contains("not found"));
}
