// SVCCTL_VERSION: `<pkg version>+<short commit>[.dirty]` when built from a
// git checkout, the bare package version otherwise.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let pkg = env!("CARGO_PKG_VERSION");
    let version = match git(&["rev-parse", "--short", "HEAD"]) {
        Some(commit) => {
            let dirty = git(&["status", "--porcelain"]).is_some_and(|s| !s.is_empty());
            format!("{}+{}{}", pkg, commit, if dirty { ".dirty" } else { "" })
        }
        None => pkg.to_string(),
    };
    println!("cargo:rustc-env=SVCCTL_VERSION={}", version);
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}
