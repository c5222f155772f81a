//! CLI integration tests for catalyst.
//!
//! These tests verify the full CLI workflow from project creation through
//! graph generation.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the catalyst binary command.
fn catalyst() -> Command {
    Command::cargo_bin("catalyst").unwrap()
}

fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// catalyst new / init
// ============================================================================

#[test]
fn test_new_creates_executable_project() {
    let tmp = temp_dir();
    let project_dir = tmp.path().join("myapp");

    catalyst()
        .args(["new", "myapp"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(project_dir.join("catalyst.yaml").exists());
    assert!(project_dir.join("src/main.cpp").exists());

    let manifest = fs::read_to_string(project_dir.join("catalyst.yaml")).unwrap();
    assert!(manifest.contains("name: myapp"));
    assert!(manifest.contains("type: executable"));
}

#[test]
fn test_new_creates_library_project() {
    let tmp = temp_dir();
    let project_dir = tmp.path().join("mylib");

    catalyst()
        .args(["new", "mylib", "--lib"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(project_dir.join("include/mylib/mylib.h").exists());
    assert!(project_dir.join("src/mylib.c").exists());

    let manifest = fs::read_to_string(project_dir.join("catalyst.yaml")).unwrap();
    assert!(manifest.contains("type: static-library"));
}

#[test]
fn test_new_fails_if_directory_exists() {
    let tmp = temp_dir();
    fs::create_dir(tmp.path().join("existing")).unwrap();

    catalyst()
        .args(["new", "existing"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_uses_directory_name() {
    let tmp = temp_dir();
    let project_dir = tmp.path().join("inited");
    fs::create_dir(&project_dir).unwrap();

    catalyst()
        .args(["init"])
        .current_dir(&project_dir)
        .assert()
        .success();

    let manifest = fs::read_to_string(project_dir.join("catalyst.yaml")).unwrap();
    assert!(manifest.contains("name: inited"));
}

// ============================================================================
// catalyst generate
// ============================================================================

#[test]
fn test_generate_writes_ninja_graph() {
    let tmp = temp_dir();
    catalyst()
        .args(["new", "app"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let project_dir = tmp.path().join("app");

    catalyst()
        .args(["generate"])
        .current_dir(&project_dir)
        .assert()
        .success();

    let graph = fs::read_to_string(project_dir.join("build/build.ninja")).unwrap();
    assert!(graph.contains("rule cxx_compile"));
    assert!(graph.contains("build/app"));
    assert!(graph.contains("-DCATALYST_BUILD=1"));
}

#[test]
fn test_generate_backend_override() {
    let tmp = temp_dir();
    catalyst()
        .args(["new", "app"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let project_dir = tmp.path().join("app");

    catalyst()
        .args(["generate", "--backend", "make"])
        .current_dir(&project_dir)
        .assert()
        .success();

    let graph = fs::read_to_string(project_dir.join("build/Makefile")).unwrap();
    assert!(graph.contains(".DEFAULT_GOAL"));
    assert!(graph.contains("$(cxx)"));
}

#[test]
fn test_generate_release_profile_changes_flags() {
    let tmp = temp_dir();
    catalyst()
        .args(["new", "app"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let project_dir = tmp.path().join("app");

    catalyst()
        .args(["generate", "--profile", "release"])
        .current_dir(&project_dir)
        .assert()
        .success();

    let graph = fs::read_to_string(project_dir.join("build/build.ninja")).unwrap();
    assert!(graph.contains("-O2"));
    assert!(graph.contains("profiles: common, release"));
}

#[test]
fn test_generate_unknown_profile_fails() {
    let tmp = temp_dir();
    catalyst()
        .args(["new", "app"])
        .current_dir(tmp.path())
        .assert()
        .success();

    catalyst()
        .args(["generate", "--profile", "nope"])
        .current_dir(tmp.path().join("app"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("profile `nope` not found"));
}

#[test]
fn test_generate_duplicate_profile_fails() {
    let tmp = temp_dir();
    catalyst()
        .args(["new", "app"])
        .current_dir(tmp.path())
        .assert()
        .success();

    catalyst()
        .args(["generate", "--profile", "release", "--profile", "release"])
        .current_dir(tmp.path().join("app"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate profile `release`"));
}

// ============================================================================
// catalyst add
// ============================================================================

#[test]
fn test_add_then_generate_carries_the_flags() {
    let tmp = temp_dir();
    catalyst()
        .args(["new", "app"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let project_dir = tmp.path().join("app");

    catalyst()
        .args([
            "add",
            "mylib",
            "--source",
            "system",
            "--include",
            "/opt/mylib/include",
            "--lib",
            "/opt/mylib/lib",
        ])
        .current_dir(&project_dir)
        .assert()
        .success();

    catalyst()
        .args(["generate"])
        .current_dir(&project_dir)
        .assert()
        .success();

    let graph = fs::read_to_string(project_dir.join("build/build.ninja")).unwrap();
    assert!(graph.contains("-I/opt/mylib/include"));
    assert!(graph.contains("-L/opt/mylib/lib"));
    assert!(graph.contains("-lmylib"));
}

#[test]
fn test_add_duplicate_fails() {
    let tmp = temp_dir();
    catalyst()
        .args(["new", "app"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let project_dir = tmp.path().join("app");

    catalyst()
        .args(["add", "zlib"])
        .current_dir(&project_dir)
        .assert()
        .success();
    catalyst()
        .args(["add", "zlib"])
        .current_dir(&project_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already declared"));
}

// ============================================================================
// catalyst clean
// ============================================================================

#[test]
fn test_clean_removes_generated_graph() {
    let tmp = temp_dir();
    catalyst()
        .args(["new", "app"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let project_dir = tmp.path().join("app");

    catalyst()
        .args(["generate"])
        .current_dir(&project_dir)
        .assert()
        .success();
    assert!(project_dir.join("build").exists());

    catalyst()
        .args(["clean"])
        .current_dir(&project_dir)
        .assert()
        .success();
    assert!(!project_dir.join("build").exists());
}

// ============================================================================
// catalyst completions
// ============================================================================

#[test]
fn test_completions_emit_bash_script() {
    catalyst()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("catalyst"));
}

// ============================================================================
// hooks
// ============================================================================

#[test]
#[cfg(unix)]
fn test_generate_hooks_run() {
    let tmp = temp_dir();
    catalyst()
        .args(["new", "app"])
        .current_dir(tmp.path())
        .assert()
        .success();
    let project_dir = tmp.path().join("app");

    // Append hooks to the common profile of the consolidated document.
    let manifest = fs::read_to_string(project_dir.join("catalyst.yaml")).unwrap();
    let with_hooks = manifest.replace(
        "common:\n",
        "common:\n  hooks:\n    pre-generate: 'touch pre.txt'\n    post-generate: 'touch post.txt'\n",
    );
    fs::write(project_dir.join("catalyst.yaml"), with_hooks).unwrap();

    catalyst()
        .args(["generate"])
        .current_dir(&project_dir)
        .assert()
        .success();

    assert!(project_dir.join("pre.txt").exists());
    assert!(project_dir.join("post.txt").exists());
}
