use std::process::Command;

/// Hash reported by `/status`. An explicit `GIT_HASH` wins so builds
/// outside a checkout (container images, tarballs) can still stamp one.
fn resolve_hash() -> String {
    if let Ok(hash) = std::env::var("GIT_HASH") {
        let hash = hash.trim();
        if !hash.is_empty() {
            return hash.to_string();
        }
    }

    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    println!("cargo:rustc-env=GIT_HASH={}", resolve_hash());
    println!("cargo:rerun-if-env-changed=GIT_HASH");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");
}
