use std::process::Command;

fn main() {
    // Capture the git commit so `--version` can report it
    let commit = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|commit| !commit.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=HOSTFETCH_GIT_COMMIT={}", commit);
    println!("cargo:rerun-if-changed=.git/HEAD");
}
