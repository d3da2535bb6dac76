use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn main() {
    println!("cargo:rustc-env=SAPIN_GIT_HASH={}", short_hash());

    let Some(git_dir) = locate_git_dir() else {
        return;
    };
    for watched in ["HEAD", "refs", "packed-refs"] {
        let path = git_dir.join(watched);
        if path.exists() {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}

/// Abbreviated commit hash, or "unknown" outside a git checkout.
fn short_hash() -> String {
    let output = match Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        Ok(output) if output.status.success() => output,
        _ => return "unknown".to_string(),
    };
    let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if hash.is_empty() {
        "unknown".to_string()
    } else {
        hash
    }
}

fn locate_git_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os("GIT_DIR") {
        return Some(PathBuf::from(dir));
    }
    let dot_git = PathBuf::from(".git");
    if dot_git.is_dir() {
        return Some(dot_git);
    }
    // Linked worktrees keep a `gitdir: <path>` file instead of a directory.
    let pointer = fs::read_to_string(&dot_git).ok()?;
    let target = PathBuf::from(pointer.strip_prefix("gitdir:")?.trim());
    Some(if target.is_relative() {
        PathBuf::from(".").join(target)
    } else {
        target
    })
}
