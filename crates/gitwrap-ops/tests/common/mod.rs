#![allow(dead_code)]

use gitwrap_ops::{CloneOptions, GitRepository, SystemInvoker};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const IDENTITY: [(&str, &str); 5] = [
    ("GIT_AUTHOR_NAME", "Test User"),
    ("GIT_AUTHOR_EMAIL", "test@example.com"),
    ("GIT_COMMITTER_NAME", "Test User"),
    ("GIT_COMMITTER_EMAIL", "test@example.com"),
    ("GIT_CONFIG_NOSYSTEM", "1"),
];

/// Whether a usable `git` is on PATH. Tests return early without it.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// System invoker with a fixed commit identity.
pub fn invoker() -> SystemInvoker {
    IDENTITY
        .iter()
        .fold(SystemInvoker::new(), |inv, (k, v)| inv.with_env(*k, *v))
}

/// Run git directly (not through the crate) and return trimmed stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .envs(IDENTITY)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Like [`git`] but returns None on failure.
pub fn try_git(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .envs(IDENTITY)
        .output()
        .ok()?;
    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        None
    }
}

/// Create a temp dir holding `bare.git`: a bare repository whose `master`
/// has a single commit with `README.md`.
pub fn init_bare_fixture() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let seed = dir.path().join("seed");
    fs::create_dir_all(&seed).expect("failed to create seed dir");

    git(&seed, &["init", "-q"]);
    git(&seed, &["symbolic-ref", "HEAD", "refs/heads/master"]);
    create_file(&seed, "README.md", "# Test Repo\n");
    commit_all(&seed, "Initial commit");

    git(dir.path(), &["clone", "-q", "--bare", "seed", "bare.git"]);
    let bare = dir.path().join("bare.git");
    (dir, bare)
}

/// Clone the fixture into `root/name` through the crate.
pub fn clone_fixture(
    bare: &Path,
    root: &Path,
    name: &str,
    opts: &CloneOptions,
) -> GitRepository<SystemInvoker> {
    GitRepository::clone_repo(
        invoker(),
        bare.to_str().expect("utf-8 temp path"),
        &root.join(name),
        opts,
    )
    .expect("clone failed")
}

/// Clone options for a repository other clones may push into.
pub fn push_target_options() -> CloneOptions {
    CloneOptions {
        config: vec!["receive.denyCurrentBranch=ignore".to_string()],
        ..Default::default()
    }
}

/// Create a file in the working tree with the given content.
pub fn create_file(repo_path: &Path, name: &str, content: &str) {
    let file_path = repo_path.join(name);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).expect("failed to create parent dirs");
    }
    fs::write(&file_path, content).expect("failed to write file");
}

/// Stage everything and commit.
pub fn commit_all(repo_path: &Path, message: &str) {
    git(repo_path, &["add", "-A"]);
    git(repo_path, &["commit", "-q", "-m", message]);
}

/// Commit `file` on a new branch, then return to the previous branch.
pub fn commit_on_branch(repo_path: &Path, branch: &str, file: &str, message: &str) {
    let previous = git(repo_path, &["rev-parse", "--abbrev-ref", "HEAD"]);
    git(repo_path, &["checkout", "-q", "-b", branch]);
    create_file(repo_path, file, "blahblahblah\n");
    commit_all(repo_path, message);
    git(repo_path, &["checkout", "-q", &previous]);
}

pub fn head_sha(repo_path: &Path) -> String {
    git(repo_path, &["rev-parse", "HEAD"])
}

pub fn rev_parse(repo_path: &Path, rev: &str) -> Option<String> {
    try_git(repo_path, &["rev-parse", "--verify", "--quiet", rev])
}

/// Whether `file` is tracked in `rev` (checks the tree, not the working copy).
pub fn tracked_in(repo_path: &Path, rev: &str, file: &str) -> bool {
    try_git(repo_path, &["ls-tree", "--name-only", rev, "--", file])
        .map(|out| out.lines().any(|l| l == file))
        .unwrap_or(false)
}
