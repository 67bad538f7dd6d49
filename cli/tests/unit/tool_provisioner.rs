//! Tool provisioning with a fake probe and installer.

use std::path::{Path, PathBuf};

use pullrun_cli::application::services::provision::ensure;
use pullrun_cli::domain::{Capability, LaunchError};
use pullrun_common::{Arch, Os, Platform};

use crate::mocks::{FakeHost, RecordingReporter};

const LINUX: Platform = Platform {
    os: Os::Linux,
    arch: Arch::Amd64,
};

fn bin_dir() -> &'static Path {
    Path::new("/home/me/.local/bin")
}

#[tokio::test]
async fn test_ensure_tool_on_path_installs_nothing() {
    let host = FakeHost::with_tools();
    let reporter = RecordingReporter::default();

    let handle = ensure(Capability::RegistryClient, LINUX, bin_dir(), &host, &reporter)
        .await
        .expect("ensure");

    assert_eq!(handle.program, PathBuf::from("oras"));
    assert!(host.tool_installs.borrow().is_empty());
    assert!(reporter.steps.borrow().is_empty());
}

#[tokio::test]
async fn test_ensure_twice_installs_at_most_once() {
    let host = FakeHost::default();
    let reporter = RecordingReporter::default();

    let first = ensure(Capability::Helper, LINUX, bin_dir(), &host, &reporter)
        .await
        .expect("first ensure");
    let second = ensure(Capability::Helper, LINUX, bin_dir(), &host, &reporter)
        .await
        .expect("second ensure");

    assert_eq!(host.tool_installs.borrow().len(), 1);
    assert_eq!(first, second);
    assert_eq!(first.program, bin_dir().join("uv"));
}

#[tokio::test]
async fn test_ensure_finds_previously_placed_binary_off_path() {
    let host = FakeHost::default();
    host.make_callable(bin_dir().join("oras"));
    let reporter = RecordingReporter::default();

    let handle = ensure(Capability::RegistryClient, LINUX, bin_dir(), &host, &reporter)
        .await
        .expect("ensure");

    assert_eq!(handle.program, bin_dir().join("oras"));
    assert!(host.tool_installs.borrow().is_empty());
}

#[tokio::test]
async fn test_ensure_downloads_pinned_release_for_platform() {
    let host = FakeHost::default();
    let reporter = RecordingReporter::default();

    ensure(Capability::RegistryClient, LINUX, bin_dir(), &host, &reporter)
        .await
        .expect("ensure");

    let installs = host.tool_installs.borrow();
    assert!(installs[0].url.ends_with("/v1.2.0/oras_1.2.0_linux_amd64.tar.gz"));
    assert_eq!(reporter.steps.borrow().as_slice(), ["Installing oras 1.2.0..."]);
}

#[tokio::test]
async fn test_ensure_download_failure_is_provisioning_failed() {
    let host = FakeHost {
        fail_tool_install: true,
        ..FakeHost::default()
    };
    let reporter = RecordingReporter::default();

    let err = ensure(Capability::Helper, LINUX, bin_dir(), &host, &reporter)
        .await
        .expect_err("install fails");

    match err.downcast_ref::<LaunchError>() {
        Some(LaunchError::ProvisioningFailed { capability, .. }) => {
            assert_eq!(*capability, Capability::Helper);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(format!("{err:#}").contains("404 Not Found"));
}

#[tokio::test]
async fn test_ensure_warns_when_install_dir_not_on_path() {
    let host = FakeHost {
        path_var: Some("/usr/bin".into()),
        ..FakeHost::default()
    };
    let reporter = RecordingReporter::default();

    ensure(Capability::Helper, LINUX, bin_dir(), &host, &reporter)
        .await
        .expect("ensure");

    let warnings = reporter.warnings.borrow();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("export PATH="), "{}", warnings[0]);
}

#[tokio::test]
async fn test_ensure_no_path_warning_when_dir_is_on_path() {
    let host = FakeHost::default();
    let reporter = RecordingReporter::default();

    ensure(Capability::Helper, LINUX, bin_dir(), &host, &reporter)
        .await
        .expect("ensure");

    assert!(reporter.warnings.borrow().is_empty());
}
