use std::process::Command;
use chrono::Local;

fn main() {
    // Packagers building from a tarball can pin the hash explicitly
    println!("cargo:rerun-if-env-changed=BINDAYS_BUILD_HASH");
    if let Ok(pinned) = std::env::var("BINDAYS_BUILD_HASH") {
        println!("cargo:rustc-env=BUILD_HASH={}", pinned);
        return;
    }

    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    // Tracked files modified since HEAD (untracked files don't count)
    let dirty = Command::new("git")
        .args(["diff", "--quiet", "HEAD"])
        .status()
        .map(|s| !s.success())
        .unwrap_or(false);

    let build_hash = if dirty && git_hash != "unknown" {
        format!("{}-dirty-{}", git_hash, Local::now().format("%Y%m%d-%H%M%S"))
    } else {
        git_hash
    };

    println!("cargo:rustc-env=BUILD_HASH={}", build_hash);

    // .git lives at the workspace root, two levels up
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/index");
}
