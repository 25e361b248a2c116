//! Build script for albumcat-cms
//!
//! Stamps the binary with what `/buildinfo` reports: commit, whether the
//! working tree had local edits, build time and cargo profile.

use std::process::Command;

/// Trimmed stdout of a successful `git` invocation
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok().map(|s| s.trim().to_string())
}

fn main() {
    let git_hash = git(&["rev-parse", "--short=8", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    // Outside a repository there is nothing to compare against
    let git_dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .map(|changes| !changes.is_empty())
        .unwrap_or(false);

    let built_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    for (key, value) in [
        ("GIT_HASH", git_hash),
        ("GIT_DIRTY", git_dirty.to_string()),
        ("BUILD_TIMESTAMP", built_at),
        ("BUILD_PROFILE", profile),
    ] {
        println!("cargo:rustc-env={}={}", key, value);
    }
}
