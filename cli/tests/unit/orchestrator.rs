//! The run/install/both state machine end to end, against fakes.

use std::path::PathBuf;

use pullrun_cli::application::{LaunchRequest, orchestrate};
use pullrun_cli::domain::{LaunchError, LaunchStrategy, RunStage};
use pullrun_cli::infra::bundle_fs::MANIFEST_FILE;
use pullrun_common::{ArtifactCoordinate, Mode};

use crate::helpers::{names, tar_gz};
use crate::mocks::{FakeHost, RecordingReporter};

fn request(work_dir: PathBuf, mode: Mode) -> LaunchRequest {
    LaunchRequest {
        coordinate: ArtifactCoordinate::new("ghcr.io", "org/demo", "v2.3.0"),
        mode,
        work_dir,
        bin_dir: PathBuf::from("/home/me/.local/bin"),
        command_override: None,
        program_args: Vec::new(),
    }
}

fn demo_host() -> FakeHost {
    let bundle = tar_gz(&[("demo-2.3.0-py3-none-any.pkg", b"demo package")]);
    FakeHost::with_tools().with_bundle(&[("demo.tar.gz", &bundle)])
}

#[tokio::test]
async fn test_run_mode_demo_bundle_launches_packaged_program() {
    let host = demo_host();
    let reporter = RecordingReporter::default();
    let work = tempfile::tempdir().expect("tempdir");

    let outcome = orchestrate(&request(work.path().to_path_buf(), Mode::Run), &host, &reporter)
        .await
        .expect("run succeeds");

    assert_eq!(host.os_queries.get(), 1);
    assert_eq!(
        pullrun_cli::infra::bundle_fs::list_dir(work.path()).expect("list"),
        names(&[MANIFEST_FILE, "demo-2.3.0-py3-none-any.pkg"])
    );
    let selection = outcome.selection.expect("selection");
    assert_eq!(
        selection.strategy,
        LaunchStrategy::PackagedProgramReference {
            path: work.path().join("demo-2.3.0-py3-none-any.pkg"),
            command: "demo".to_string(),
        }
    );
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(
        outcome.stages,
        vec![
            RunStage::Idle,
            RunStage::Provisioning,
            RunStage::Fetching,
            RunStage::Running,
            RunStage::Done
        ]
    );

    let handoffs = host.handoffs.borrow();
    assert_eq!(handoffs.len(), 1);
    assert_eq!(handoffs[0].program, PathBuf::from("uv"));
    assert_eq!(handoffs[0].args[..2], ["tool", "run"]);
    assert_eq!(handoffs[0].cwd, work.path());
}

#[tokio::test]
async fn test_run_mode_forwards_program_args_and_exit_code() {
    let host = FakeHost {
        exit_code: 3,
        ..FakeHost::with_tools().with_bundle(&[("run.sh", b"exec demo \"$@\"\n")])
    };
    let reporter = RecordingReporter::default();
    let work = tempfile::tempdir().expect("tempdir");
    let mut req = request(work.path().to_path_buf(), Mode::Run);
    req.program_args = names(&["--port", "8080"]);

    let outcome = orchestrate(&req, &host, &reporter).await.expect("run");

    assert_eq!(outcome.exit_code, 3);
    let handoffs = host.handoffs.borrow();
    assert_eq!(handoffs[0].program, PathBuf::from("sh"));
    assert_eq!(
        handoffs[0].args,
        vec![
            work.path().join("run.sh").to_string_lossy().into_owned(),
            "--port".to_string(),
            "8080".to_string()
        ]
    );
}

#[tokio::test]
async fn test_run_mode_ambiguous_bundle_warns_without_failing() {
    let host = FakeHost::with_tools().with_bundle(&[("b-1.0.whl", b"b"), ("a-1.0.whl", b"a")]);
    let reporter = RecordingReporter::default();
    let work = tempfile::tempdir().expect("tempdir");

    let outcome = orchestrate(&request(work.path().to_path_buf(), Mode::Run), &host, &reporter)
        .await
        .expect("ambiguity is not fatal");

    assert_eq!(outcome.exit_code, 0);
    let warnings = reporter.warnings.borrow();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("b-1.0.whl"), "{}", warnings[0]);
}

#[tokio::test]
async fn test_install_mode_installs_and_launches_nothing() {
    let host = demo_host();
    let reporter = RecordingReporter::default();
    let work = tempfile::tempdir().expect("tempdir");

    let outcome = orchestrate(
        &request(work.path().to_path_buf(), Mode::Install),
        &host,
        &reporter,
    )
    .await
    .expect("install succeeds");

    assert_eq!(outcome.installed.expect("installed").command, "demo");
    assert!(outcome.selection.is_none());
    assert!(host.handoffs.borrow().is_empty());
    assert_eq!(outcome.stages[3], RunStage::Installing);
}

#[tokio::test]
async fn test_both_mode_runs_installed_command_after_install() {
    let host = demo_host();
    let reporter = RecordingReporter::default();
    let work = tempfile::tempdir().expect("tempdir");

    let outcome = orchestrate(
        &request(work.path().to_path_buf(), Mode::Both),
        &host,
        &reporter,
    )
    .await
    .expect("both succeeds");

    assert_eq!(host.program_installs.borrow().len(), 1);
    let handoffs = host.handoffs.borrow();
    assert_eq!(handoffs.len(), 1);
    assert_eq!(
        handoffs[0].program,
        PathBuf::from("/home/me/.local/bin").join("demo")
    );
    assert_eq!(outcome.stages[3], RunStage::InstallingThenRunning);
}

#[tokio::test]
async fn test_both_mode_install_failure_never_launches() {
    let host = FakeHost {
        fail_program_install: true,
        ..demo_host()
    };
    let reporter = RecordingReporter::default();
    let work = tempfile::tempdir().expect("tempdir");

    let err = orchestrate(
        &request(work.path().to_path_buf(), Mode::Both),
        &host,
        &reporter,
    )
    .await
    .expect_err("install fails");

    assert!(matches!(
        err.downcast_ref::<LaunchError>(),
        Some(LaunchError::InstallFailed { .. })
    ));
    assert!(host.handoffs.borrow().is_empty());
}

#[tokio::test]
async fn test_unsupported_platform_stops_before_provisioning() {
    let host = FakeHost {
        os: "Plan9".to_string(),
        ..demo_host()
    };
    let reporter = RecordingReporter::default();
    let work = tempfile::tempdir().expect("tempdir");

    let err = orchestrate(&request(work.path().to_path_buf(), Mode::Run), &host, &reporter)
        .await
        .expect_err("unsupported");

    assert!(matches!(
        err.downcast_ref::<LaunchError>(),
        Some(LaunchError::UnsupportedPlatform { .. })
    ));
    assert!(host.probes.borrow().is_empty());
    assert!(host.pulls.borrow().is_empty());
}

#[tokio::test]
async fn test_provisioning_failure_stops_before_fetch() {
    let host = FakeHost {
        fail_tool_install: true,
        ..FakeHost::default()
    };
    let reporter = RecordingReporter::default();
    let work = tempfile::tempdir().expect("tempdir");

    let err = orchestrate(&request(work.path().to_path_buf(), Mode::Run), &host, &reporter)
        .await
        .expect_err("provisioning fails");

    assert!(matches!(
        err.downcast_ref::<LaunchError>(),
        Some(LaunchError::ProvisioningFailed { .. })
    ));
    assert!(host.pulls.borrow().is_empty());
}

#[tokio::test]
async fn test_fetched_bundle_without_launchable_is_no_artifact_found() {
    let host = FakeHost::with_tools().with_bundle(&[("README.md", b"docs")]);
    let reporter = RecordingReporter::default();
    let work = tempfile::tempdir().expect("tempdir");

    let err = orchestrate(&request(work.path().to_path_buf(), Mode::Run), &host, &reporter)
        .await
        .expect_err("nothing recognizable");

    assert!(matches!(
        err.downcast_ref::<LaunchError>(),
        Some(LaunchError::NoArtifactFound { .. })
    ));
    assert!(host.handoffs.borrow().is_empty());
}

#[tokio::test]
async fn test_tools_are_provisioned_in_order_with_client_first() {
    let host = demo_host();
    let reporter = RecordingReporter::default();
    let work = tempfile::tempdir().expect("tempdir");

    orchestrate(&request(work.path().to_path_buf(), Mode::Run), &host, &reporter)
        .await
        .expect("run");

    let probes = host.probes.borrow();
    assert_eq!(probes[0], PathBuf::from("oras"));
    assert_eq!(probes[1], PathBuf::from("uv"));
}
