#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};

/// Run the CLI with a custom HOME directory for isolated session storage.
pub fn run_cli_with_env(args: &[&str], home: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_svcctl"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("SVCCTL_API_URL", api_url);
    cmd.env_remove("SVCCTL_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd.output().expect("Failed to execute CLI")
}

/// Same as [`run_cli_with_env`], off the async runtime.
pub async fn svcctl(args: &[&str], home: &Path, api_url: &str) -> Output {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let home = home.to_path_buf();
    let api_url = api_url.to_string();
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_cli_with_env(&args, &home, &api_url)
    })
    .await
    .unwrap()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Where the CLI stores its session under `home`.
pub fn session_file(home: &Path) -> PathBuf {
    home.join("data").join("svcctl").join("session.json")
}

pub fn jwt(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({"sub": "u-1", "exp": exp}).to_string());
    format!("{}.{}.sig", header, payload)
}

pub fn user_json(role: &str) -> Value {
    json!({
        "id": "u-1",
        "username": "alice",
        "email": "alice@example.com",
        "first_name": "Alice",
        "last_name": "Liddell",
        "role": role
    })
}

pub fn login_body(token: &str, role: &str) -> Value {
    json!({
        "token": token,
        "refresh_token": "refresh-1",
        "user": user_json(role)
    })
}

/// Write a session record as a previous run would have left it.
pub fn seed_session(home: &Path, token: &str) {
    let path = session_file(home);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let record = json!({
        "token": token,
        "refresh_token": "refresh-1",
        "user": user_json("user").to_string()
    });
    std::fs::write(path, record.to_string()).unwrap();
}
