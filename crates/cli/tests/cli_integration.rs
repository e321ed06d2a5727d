//! CLI integration tests for the client subcommands.
//!
//! Uses `assert_cmd` to spawn the `partflow` binary and verify exit codes,
//! stdout, and stderr. Local validation failures must be reported without a
//! server: every test here points `--url` at an unroutable port, so any
//! accidental request surfaces as "server connection failed" instead of the
//! expected message.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

/// A `partflow` command with a clean environment and a dead server URL.
fn partflow() -> Command {
    let mut cmd = cargo_bin_cmd!("partflow");
    cmd.env_remove("PARTFLOW_URL");
    cmd.env_remove("PARTFLOW_BRANCH");
    cmd.env_remove("PARTFLOW_API_TOKEN");
    cmd.arg("--url").arg("http://127.0.0.1:1");
    cmd
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    partflow()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("warranty round-trip"));
}

#[test]
fn version_exits_0() {
    partflow()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("partflow"));
}

#[test]
fn outward_new_help_lists_required_flags() {
    partflow()
        .args(["outward", "new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--supplier"));
}

// ──────────────────────────────────────────────
// 2. Local validation (no request issued)
// ──────────────────────────────────────────────

#[test]
fn outward_new_without_part_fails_locally() {
    partflow()
        .args(["outward", "new", "--supplier", "BAJAJ"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("part_name"))
        .stderr(predicate::str::contains("connection failed").not());
}

#[test]
fn job_open_without_customer_is_a_clap_error() {
    partflow()
        .args(["job", "open", "--part", "GENERAL SERVICE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--customer"));
}

#[test]
fn replace_without_new_serial_is_blocked_before_the_network() {
    partflow()
        .args(["outward", "resolve", "--ref", "OUT-5", "--result", "replace"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("new serial"))
        .stderr(predicate::str::contains("connection failed").not());
}

#[test]
fn blank_new_serial_counts_as_missing() {
    partflow()
        .args([
            "outward", "resolve", "--ref", "OUT-5", "--result", "replace", "--new-serial", "   ",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("new serial"));
}

#[test]
fn malformed_reference_is_rejected_locally() {
    partflow()
        .args(["outward", "resolve", "--ref", "OUT5", "--result", "repair"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("malformed reference"))
        .stderr(predicate::str::contains("connection failed").not());
}

#[test]
fn unknown_result_type_is_rejected() {
    partflow()
        .args(["outward", "resolve", "--ref", "OUT-5", "--result", "lost"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid result type"));
}

#[test]
fn legacy_return_spelling_is_accepted_as_reject() {
    // RETURN parses (legacy spelling of REJECT), so the command proceeds to
    // the network and fails on the dead URL instead of the parse step.
    partflow()
        .args(["outward", "resolve", "--ref", "OUT-5", "--result", "return"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("server connection failed"));
}

#[test]
fn bad_charges_amount_is_rejected() {
    partflow()
        .args([
            "job", "close", "--ref", "JOB-1", "--result", "repair", "--charges", "abc",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid charges"));
}

#[test]
fn report_rejects_unknown_status_tab() {
    partflow()
        .args(["report", "warranty", "--status", "maybe"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid status"));
}

#[test]
fn masters_add_rejects_blank_name() {
    partflow()
        .args(["masters", "add", "suppliers", "--name", "   "])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("name must not be blank"));
}

// ──────────────────────────────────────────────
// 3. Transport failures
// ──────────────────────────────────────────────

#[test]
fn unreachable_server_reports_connection_failure() {
    partflow()
        .args(["outward", "pending"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("server connection failed"));
}

#[test]
fn json_output_wraps_errors_in_an_error_field() {
    partflow()
        .args(["--output", "json", "outward", "pending"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\"error\""));
}

#[test]
fn quiet_suppresses_error_output_but_keeps_the_exit_code() {
    partflow()
        .args(["--quiet", "outward", "pending"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::is_empty());
}
