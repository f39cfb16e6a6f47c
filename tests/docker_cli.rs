//! Checks against a real Docker installation.
//!
//! These require a running Docker daemon and are marked `#[ignore]`.
//! Run with: `cargo test -- --ignored`

use std::time::Duration;

use launchbox::docker::{ContainerEngine, DockerCli, run_bounded};

fn docker() -> DockerCli {
    DockerCli::new("docker", Duration::from_secs(5))
}

#[test]
#[ignore]
fn version_reports_docker() {
    let version = docker().version().expect("docker should be installed");
    assert!(version.to_lowercase().contains("docker"), "unexpected: {version}");
}

#[test]
#[ignore]
fn unknown_container_is_not_running() {
    let running = docker()
        .is_running("launchbox-test-no-such-container")
        .expect("docker ps should succeed");
    assert!(!running);
}

#[test]
#[ignore]
fn ps_answers_within_tool_timeout() {
    let out = run_bounded(
        "docker",
        &DockerCli::ps_args("launchbox-test"),
        Duration::from_secs(5),
    )
    .expect("docker should spawn");
    assert!(!out.timed_out);
    assert!(out.success, "stderr: {}", out.stderr);
}
