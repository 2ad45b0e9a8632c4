//! CLI regression tests for the `waymark` binary.
//!
//! These run the binary as a subprocess to catch regressions in flag names,
//! exit codes and output formats.
//!
//! Run with: `cargo test -p waymark-test`
//! Requires the `waymark` binary to be built first (`cargo build -p waymark`).

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use crate::ManifestDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns an assert_cmd Command wrapping the `waymark` binary.
fn waymark() -> Command {
    // cargo_bin is deprecated for custom build-dir setups; fine for standard workspace use.
    #[allow(deprecated)]
    Command::cargo_bin("waymark").expect("waymark binary not found, run `cargo build -p waymark` first")
}

/// Absolute path to the shared test fixtures directory.
fn fixtures() -> PathBuf {
    // CARGO_MANIFEST_DIR = .../crates/waymark-test
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("crates/")
        .parent()
        .expect("workspace root")
        .join("tests/fixtures")
}

fn match_route(fixture: &str, method: &str, url: &str) -> Command {
    let mut cmd = waymark();
    cmd.args(["match", "--routes"])
        .arg(fixtures().join(fixture))
        .args(["--method", method, "--url", url]);
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout is JSON")
}

// ---------------------------------------------------------------------------
// waymark check
// ---------------------------------------------------------------------------

#[test]
fn check_valid_manifest_reports_route_count() {
    waymark()
        .args(["check", "--routes"])
        .arg(fixtures().join("routes.yaml"))
        .assert()
        .success()
        .stdout(contains("ok: 8 routes"));
}

#[test]
fn check_accepts_json_manifests() {
    waymark()
        .args(["check", "--routes"])
        .arg(fixtures().join("routes.json"))
        .assert()
        .success()
        .stdout(contains("ok: 2 routes"));
}

#[test]
fn check_missing_path_exits_one() {
    waymark()
        .args(["check", "--routes"])
        .arg(fixtures().join("missing-path.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2001").and(contains("broken")));
}

#[test]
fn check_missing_methods_exits_one() {
    waymark()
        .args(["check", "--routes"])
        .arg(fixtures().join("missing-methods.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2002").and(contains("noMethods")));
}

#[test]
fn check_bad_pattern_exits_one() {
    waymark()
        .args(["check", "--routes"])
        .arg(fixtures().join("bad-pattern.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2010").and(contains("tooGreedy")));
}

#[test]
fn check_bad_method_exits_one() {
    waymark()
        .args(["check", "--routes"])
        .arg(fixtures().join("bad-method.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2004").and(contains("weird")));
}

#[test]
fn check_missing_file_exits_one() {
    waymark()
        .args(["check", "--routes", "this-file-does-not-exist.yaml"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("failed to read"));
}

#[test]
fn check_duplicate_route_names_exit_one() {
    let dir = ManifestDir::new().expect("temp dir");
    let path = dir
        .write(
            "dup.yaml",
            "routes:\n  a:\n    path: /a\n    methods: [GET]\n  a:\n    path: /b\n    methods: [GET]\n",
        )
        .expect("write manifest");

    waymark()
        .args(["check", "--routes"])
        .arg(path)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("duplicate route name 'a'"));
}

#[test]
fn check_empty_manifest_has_zero_routes() {
    let dir = ManifestDir::new().expect("temp dir");
    let path = dir.write_manifest("empty.yaml", "routes: {}\n").expect("valid manifest");

    waymark()
        .args(["check", "--routes"])
        .arg(path)
        .assert()
        .success()
        .stdout(contains("ok: 0 routes"));
}

// ---------------------------------------------------------------------------
// waymark routes
// ---------------------------------------------------------------------------

#[test]
fn routes_text_lists_in_file_order() {
    let output = waymark()
        .args(["routes", "--routes"])
        .arg(fixtures().join("routes.yaml"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).expect("utf-8");
    let names: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split('\t').next())
        .collect();

    assert_eq!(
        names,
        vec![
            "listUsers",
            "createUser",
            "userByName",
            "getUser",
            "anyUser",
            "userOrder",
            "assets",
            "root"
        ]
    );
    assert!(stdout.contains("userOrder\tGET,DELETE\t/users/:userId/orders/:orderId"));
}

#[test]
fn routes_json_normalizes_methods() {
    let json = stdout_json(
        waymark()
            .args(["routes", "--format", "json", "--routes"])
            .arg(fixtures().join("routes.json")),
    );

    assert_eq!(json[1]["name"], "files");
    assert_eq!(json[1]["path"], "/files/*");
    assert_eq!(json[1]["methods"], serde_json::json!(["GET", "HEAD"]));
}

#[test]
fn routes_unknown_format_exits_one() {
    waymark()
        .args(["routes", "--format", "xml", "--routes"])
        .arg(fixtures().join("routes.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("unknown output format"));
}

// ---------------------------------------------------------------------------
// waymark match
// ---------------------------------------------------------------------------

#[test]
fn match_static_beats_param() {
    match_route("routes.yaml", "GET", "/users/admin")
        .assert()
        .success()
        .stdout("userByName\n");
}

#[test]
fn match_binds_params() {
    match_route("routes.yaml", "get", "/users/3/orders/9?expand=true")
        .assert()
        .success()
        .stdout("userOrder userId=3 orderId=9\n");
}

#[test]
fn match_falls_back_to_wildcard_method() {
    match_route("routes.yaml", "PATCH", "/users/7")
        .assert()
        .success()
        .stdout("anyUser id=7\n");
}

#[test]
fn match_backtracks_when_static_route_lacks_the_method() {
    match_route("routes.yaml", "POST", "/users/admin")
        .assert()
        .success()
        .stdout("anyUser id=admin\n");
}

#[test]
fn match_all_lists_exact_before_wildcard() {
    match_route("routes.yaml", "GET", "/users/7")
        .arg("--all")
        .assert()
        .success()
        .stdout("getUser id=7\nanyUser id=7\n");
}

#[test]
fn match_catch_all_captures_rest() {
    match_route("routes.yaml", "GET", "/assets/css/site.css")
        .assert()
        .success()
        .stdout("assets path=css/site.css\n");
}

#[test]
fn match_root_and_trailing_slash() {
    match_route("routes.yaml", "GET", "/")
        .assert()
        .success()
        .stdout("root\n");
    match_route("routes.yaml", "GET", "/users/")
        .assert()
        .success()
        .stdout("listUsers\n");
}

#[test]
fn match_absolute_url() {
    match_route("routes.yaml", "GET", "https://api.example.com/users/42#top")
        .assert()
        .success()
        .stdout("getUser id=42\n");
}

#[test]
fn match_protocol_relative_url() {
    match_route("routes.yaml", "GET", "//api.example.com/users/42?x=1")
        .assert()
        .success()
        .stdout("getUser id=42\n");
}

#[test]
fn no_match_exits_zero_and_lists_allowed_methods() {
    match_route("routes.yaml", "POST", "/assets/app.js")
        .assert()
        .success()
        .stdout("no match\nallowed: GET\n");
    match_route("routes.yaml", "GET", "/nowhere")
        .assert()
        .success()
        .stdout("no match\n");
}

#[test]
fn manifest_strategy_selects_linear_backend() {
    match_route("linear.yaml", "GET", "/users/admin")
        .assert()
        .success()
        .stdout("userById id=admin\n");
}

#[test]
fn strategy_flag_overrides_manifest() {
    match_route("linear.yaml", "GET", "/users/admin")
        .args(["--strategy", "radix"])
        .assert()
        .success()
        .stdout("userByName\n");
}

#[test]
fn unknown_strategy_is_rejected() {
    match_route("routes.yaml", "GET", "/users")
        .args(["--strategy", "trie"])
        .assert()
        .failure()
        .stderr(contains("unknown router strategy"));
}

#[test]
fn match_json_output() {
    let json = stdout_json(match_route("routes.yaml", "GET", "/users/7").args(["--format", "json"]));

    assert_eq!(json["strategy"], "radix");
    assert_eq!(json["method"], "GET");
    assert_eq!(json["path"], "/users/7");
    assert_eq!(json["matches"][0]["route"], "getUser");
    assert_eq!(json["matches"][0]["params"]["id"], "7");
    assert_eq!(json["allowed"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// logging flags
// ---------------------------------------------------------------------------

#[test]
fn json_logs_go_to_stderr() {
    match_route("routes.yaml", "GET", "/users/7")
        .args(["--log-level", "debug", "--log-format", "json"])
        .env_remove("RUST_LOG")
        .env_remove("WAYMARK_LOG_LEVEL")
        .assert()
        .success()
        .stdout("getUser id=7\n")
        .stderr(contains("\"event\":\"route_matched\""));
}

#[test]
fn log_level_from_environment() {
    match_route("routes.yaml", "GET", "/nowhere")
        .env_remove("RUST_LOG")
        .env("WAYMARK_LOG_LEVEL", "debug")
        .env("WAYMARK_LOG_FORMAT", "json")
        .assert()
        .success()
        .stdout("no match\n")
        .stderr(contains("\"event\":\"route_not_matched\""));
}

#[test]
fn unknown_log_format_is_rejected() {
    waymark()
        .args(["--log-format", "xml", "check", "--routes"])
        .arg(fixtures().join("routes.yaml"))
        .assert()
        .failure()
        .stderr(contains("unknown log format"));
}
