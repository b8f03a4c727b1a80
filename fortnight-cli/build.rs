use std::process::Command;

/// Short commit for `fortnight --version`. Packagers building outside a
/// checkout can set `FORTNIGHT_BUILD_SHA` themselves.
fn main() {
    println!("cargo:rerun-if-env-changed=FORTNIGHT_BUILD_SHA");

    let sha = std::env::var("FORTNIGHT_BUILD_SHA")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(git_describe)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=FORTNIGHT_BUILD_SHA={sha}");
}

fn git_describe() -> Option<String> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").ok()?;
    let out = Command::new("git")
        .current_dir(manifest_dir)
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    let described = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (out.status.success() && !described.is_empty()).then_some(described)
}
