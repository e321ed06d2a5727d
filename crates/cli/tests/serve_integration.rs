//! Integration tests for the `partflow serve` HTTP API.
//!
//! Each test starts the server as a child process on a unique port,
//! makes raw HTTP requests, and verifies status codes and JSON bodies.

use std::io::Read;
use std::net::TcpStream;
use std::process::{Child, Command};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

/// Atomic port counter to avoid port conflicts between parallel tests.
/// Base port is derived from process ID so parallel `cargo test --workspace`
/// runs (separate test binaries) don't collide on the same port range.
static NEXT_PORT: AtomicU16 = AtomicU16::new(0);
static PORT_INIT: std::sync::Once = std::sync::Once::new();

fn next_port() -> u16 {
    PORT_INIT.call_once(|| {
        let base = 21000 + (std::process::id() as u16 % 20000);
        NEXT_PORT.store(base, Ordering::SeqCst);
    });
    NEXT_PORT.fetch_add(1, Ordering::SeqCst)
}

/// Start `partflow serve` on the given port, optionally with a bearer token.
fn start_server(port: u16, token: Option<&str>) -> Child {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_partflow"));
    cmd.arg("serve").arg("--port").arg(port.to_string());
    if let Some(token) = token {
        cmd.arg("--token").arg(token);
    }
    cmd.env_remove("PARTFLOW_API_TOKEN");
    // Redirect stdout/stderr to avoid blocking
    cmd.stdout(std::process::Stdio::piped());
    cmd.stderr(std::process::Stdio::piped());

    let child = cmd.spawn().expect("failed to start partflow serve");
    // Wait for the server to be ready by polling the port
    for _ in 0..50 {
        if TcpStream::connect(format!("127.0.0.1:{}", port)).is_ok() {
            return child;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    child
}

/// Make an HTTP GET request with extra headers; return (status, body).
fn http_get(port: u16, path: &str, extra_headers: &[(&str, &str)]) -> (u16, String) {
    let mut stream = TcpStream::connect(format!("127.0.0.1:{}", port)).expect("failed to connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();

    let mut header_lines = String::new();
    for (name, value) in extra_headers {
        header_lines.push_str(&format!("{}: {}\r\n", name, value));
    }
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: localhost:{}\r\n{}Connection: close\r\n\r\n",
        path, port, header_lines
    );
    std::io::Write::write_all(&mut stream, request.as_bytes()).expect("failed to write");

    let mut response = String::new();
    let _ = stream.read_to_string(&mut response);
    parse_http_response(&response)
}

/// Make an HTTP POST request with extra headers; return (status, body).
fn http_post(
    port: u16,
    path: &str,
    body: &str,
    extra_headers: &[(&str, &str)],
) -> (u16, String) {
    let mut stream = TcpStream::connect(format!("127.0.0.1:{}", port)).expect("failed to connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .unwrap();

    let mut header_lines = String::new();
    for (name, value) in extra_headers {
        header_lines.push_str(&format!("{}: {}\r\n", name, value));
    }
    let request = format!(
        "POST {} HTTP/1.1\r\nHost: localhost:{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
        path,
        port,
        body.len(),
        header_lines,
        body
    );
    std::io::Write::write_all(&mut stream, request.as_bytes()).expect("failed to write");

    let mut response = String::new();
    let _ = stream.read_to_string(&mut response);
    parse_http_response(&response)
}

/// Parse an HTTP response into (status_code, body).
fn parse_http_response(response: &str) -> (u16, String) {
    let parts: Vec<&str> = response.splitn(2, "\r\n\r\n").collect();
    let headers = parts.first().unwrap_or(&"").to_string();
    let body = parts.get(1).unwrap_or(&"").to_string();

    let status_line = headers.lines().next().unwrap_or("");
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(0);

    // Handle chunked transfer encoding
    let body = if headers
        .to_lowercase()
        .contains("transfer-encoding: chunked")
    {
        decode_chunked(&body)
    } else {
        body
    };

    (status, body)
}

/// Decode chunked transfer encoding.
fn decode_chunked(data: &str) -> String {
    let mut result = String::new();
    let mut remaining = data;

    while let Some(line_end) = remaining.find("\r\n") {
        let size = match usize::from_str_radix(remaining[..line_end].trim(), 16) {
            Ok(s) => s,
            Err(_) => break,
        };
        if size == 0 {
            break;
        }
        let chunk_start = line_end + 2;
        let chunk_end = chunk_start + size;
        if chunk_end > remaining.len() {
            result.push_str(&remaining[chunk_start..]);
            break;
        }
        result.push_str(&remaining[chunk_start..chunk_end]);
        remaining = if chunk_end + 2 <= remaining.len() {
            &remaining[chunk_end + 2..]
        } else {
            ""
        };
    }

    result
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("invalid JSON ({e}): {body}"))
}

// ──────────────────────────────────────────────
// Health and basics
// ──────────────────────────────────────────────

#[test]
fn health_returns_200_with_version() {
    let port = next_port();
    let mut child = start_server(port, None);

    let (status, body) = http_get(port, "/health", &[]);
    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 200);
    let json = json(&body);
    assert_eq!(json["status"], "ok");
    assert!(json.get("version").is_some(), "version field must be present");
}

#[test]
fn unknown_route_returns_json_404() {
    let port = next_port();
    let mut child = start_server(port, None);

    let (status, body) = http_get(port, "/api/nope", &[]);
    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 404);
    assert_eq!(json(&body)["error"], "not found");
}

// ──────────────────────────────────────────────
// Reference number preview
// ──────────────────────────────────────────────

#[test]
fn outward_no_preview_does_not_consume_the_sequence() {
    let port = next_port();
    let mut child = start_server(port, None);

    let (status, body) = http_get(port, "/api/outward-no", &[]);
    assert_eq!(status, 200);
    assert_eq!(json(&body)["outward_no"], "OUT-1");

    // Peeking again still shows the same number.
    let (_, body) = http_get(port, "/api/outward-no", &[]);
    assert_eq!(json(&body)["outward_no"], "OUT-1");

    // The save assigns the previewed number; the next preview moves on.
    let (status, body) = http_post(
        port,
        "/api/save-outward",
        r#"{"supplier_name":"bajaj","part_name":"motor"}"#,
        &[],
    );
    assert_eq!(status, 201);
    assert_eq!(json(&body)["outward_no"], "OUT-1");

    let (_, body) = http_get(port, "/api/outward-no", &[]);
    child.kill().ok();
    child.wait().ok();
    assert_eq!(json(&body)["outward_no"], "OUT-2");
}

// ──────────────────────────────────────────────
// Supplier outward lifecycle
// ──────────────────────────────────────────────

#[test]
fn outward_round_trip_pending_to_done() {
    let port = next_port();
    let mut child = start_server(port, None);

    // Intake: lower-case input is normalized, status starts PENDING.
    let (status, body) = http_post(
        port,
        "/api/save-outward",
        r#"{"supplier_name":"bajaj auto","part_name":"motor","part_serial":"sn-1","warranty":"YES"}"#,
        &[],
    );
    assert_eq!(status, 201);
    let created = json(&body);
    assert_eq!(created["outward_no"], "OUT-1");
    assert_eq!(created["supplier_name"], "BAJAJ AUTO");
    assert_eq!(created["part_serial"], "SN-1");
    assert_eq!(created["status"], "PENDING");

    // It shows up in the pending selection list.
    let (status, body) = http_get(port, "/api/pending-supplier-outwards", &[]);
    assert_eq!(status, 200);
    let pending = json(&body);
    assert_eq!(pending.as_array().map(Vec::len), Some(1));

    // Resolve as REPLACE with a new serial.
    let (status, body) = http_post(
        port,
        "/api/save-supplier-inward",
        r#"{"reference_no":"out-1","result_type":"REPLACE","new_serial":"mx-99"}"#,
        &[],
    );
    assert_eq!(status, 201);
    let resolved = json(&body);
    assert_eq!(resolved["reference_no"], "OUT-1");
    assert_eq!(resolved["final_serial"], "MX-99");

    // Gone from the pending list, DONE in the joined report.
    let (_, body) = http_get(port, "/api/pending-supplier-outwards", &[]);
    assert_eq!(json(&body).as_array().map(Vec::len), Some(0));

    let (status, body) = http_get(port, "/api/warranty-master", &[]);
    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 200);
    let rows = json(&body);
    let row = &rows.as_array().expect("rows array")[0];
    assert_eq!(row["reference_no"], "OUT-1");
    assert_eq!(row["status"], "DONE");
    assert_eq!(row["result_type"], "REPLACE");
    assert_eq!(row["old_serial"], "SN-1");
    assert_eq!(row["new_serial"], "MX-99");
}

#[test]
fn replace_without_new_serial_is_rejected_and_stays_pending() {
    let port = next_port();
    let mut child = start_server(port, None);

    http_post(
        port,
        "/api/save-outward",
        r#"{"supplier_name":"TVS","part_name":"CDI","part_serial":"SN-5"}"#,
        &[],
    );

    let (status, body) = http_post(
        port,
        "/api/save-supplier-inward",
        r#"{"reference_no":"OUT-1","result_type":"REPLACE"}"#,
        &[],
    );
    assert_eq!(status, 400);
    assert!(
        json(&body)["error"]
            .as_str()
            .unwrap_or_default()
            .contains("new serial"),
        "unexpected body: {body}"
    );

    // The failed resolve must not have flipped the record.
    let (_, body) = http_get(port, "/api/pending-supplier-outwards", &[]);
    child.kill().ok();
    child.wait().ok();
    assert_eq!(json(&body).as_array().map(Vec::len), Some(1));
}

#[test]
fn repair_keeps_the_original_serial_and_ignores_the_typed_one() {
    let port = next_port();
    let mut child = start_server(port, None);

    http_post(
        port,
        "/api/save-outward",
        r#"{"supplier_name":"TVS","part_name":"CDI","part_serial":"SN-5"}"#,
        &[],
    );
    let (status, body) = http_post(
        port,
        "/api/save-supplier-inward",
        r#"{"reference_no":"OUT-1","result_type":"REPAIR","new_serial":"SHOULD-BE-IGNORED"}"#,
        &[],
    );
    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 201);
    assert_eq!(json(&body)["final_serial"], "SN-5");
}

#[test]
fn second_resolution_returns_409() {
    let port = next_port();
    let mut child = start_server(port, None);

    http_post(
        port,
        "/api/save-outward",
        r#"{"supplier_name":"TVS","part_name":"CDI"}"#,
        &[],
    );
    let (status, _) = http_post(
        port,
        "/api/save-supplier-inward",
        r#"{"reference_no":"OUT-1","result_type":"REJECT"}"#,
        &[],
    );
    assert_eq!(status, 201);

    let (status, body) = http_post(
        port,
        "/api/save-supplier-inward",
        r#"{"reference_no":"OUT-1","result_type":"REPAIR"}"#,
        &[],
    );
    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 409);
    assert!(json(&body)["error"]
        .as_str()
        .unwrap_or_default()
        .contains("already resolved"));
}

#[test]
fn unknown_reference_returns_404() {
    let port = next_port();
    let mut child = start_server(port, None);

    let (status, _) = http_post(
        port,
        "/api/save-supplier-inward",
        r#"{"reference_no":"OUT-99","result_type":"REPAIR"}"#,
        &[],
    );
    child.kill().ok();
    child.wait().ok();
    assert_eq!(status, 404);
}

#[test]
fn missing_required_field_returns_400_with_field_name() {
    let port = next_port();
    let mut child = start_server(port, None);

    let (status, body) = http_post(
        port,
        "/api/save-outward",
        r#"{"supplier_name":"BAJAJ"}"#,
        &[],
    );
    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 400);
    assert!(json(&body)["error"]
        .as_str()
        .unwrap_or_default()
        .contains("part_name"));
}

// ──────────────────────────────────────────────
// Branch scoping
// ──────────────────────────────────────────────

#[test]
fn branch_header_scopes_sequences_and_listings() {
    let port = next_port();
    let mut child = start_server(port, None);

    // Both branches get OUT-1: sequences are per branch.
    let (_, body) = http_post(
        port,
        "/api/save-outward",
        r#"{"supplier_name":"BAJAJ","part_name":"MOTOR"}"#,
        &[("branch-id", "1")],
    );
    assert_eq!(json(&body)["outward_no"], "OUT-1");

    let (_, body) = http_post(
        port,
        "/api/save-outward",
        r#"{"supplier_name":"TVS","part_name":"CDI"}"#,
        &[("branch-id", "2")],
    );
    assert_eq!(json(&body)["outward_no"], "OUT-1");

    // Listings never cross branches; no header means branch "1".
    let (_, body) = http_get(port, "/api/pending-supplier-outwards", &[("branch-id", "2")]);
    let branch2 = json(&body);
    assert_eq!(branch2.as_array().map(Vec::len), Some(1));
    assert_eq!(branch2[0]["supplier_name"], "TVS");

    let (_, body) = http_get(port, "/api/pending-supplier-outwards", &[]);
    child.kill().ok();
    child.wait().ok();
    let default_branch = json(&body);
    assert_eq!(default_branch.as_array().map(Vec::len), Some(1));
    assert_eq!(default_branch[0]["supplier_name"], "BAJAJ");
}

// ──────────────────────────────────────────────
// Job card lifecycle
// ──────────────────────────────────────────────

#[test]
fn job_card_close_records_charges() {
    let port = next_port();
    let mut child = start_server(port, None);

    let (status, body) = http_post(
        port,
        "/api/save-service-job",
        r#"{"customer_name":"ram","part_name":"general service","mobile":"9876500000"}"#,
        &[],
    );
    assert_eq!(status, 201);
    assert_eq!(json(&body)["job_no"], "JOB-1");
    assert_eq!(json(&body)["customer_name"], "RAM");

    let (status, body) = http_post(
        port,
        "/api/save-cust-outward",
        r#"{"reference_no":"JOB-1","result_type":"REPAIR","charges":"450.00"}"#,
        &[],
    );
    assert_eq!(status, 201);
    assert_eq!(json(&body)["charges"], "450.00");

    let (status, body) = http_get(port, "/api/service-master", &[]);
    child.kill().ok();
    child.wait().ok();

    assert_eq!(status, 200);
    let rows = json(&body);
    let row = &rows.as_array().expect("rows array")[0];
    assert_eq!(row["status"], "DONE");
    assert_eq!(row["charges"], "450.00");
    // No serial on a general service job: the marker stands in.
    assert_eq!(row["old_serial"], "N/A");
}

// ──────────────────────────────────────────────
// Masters
// ──────────────────────────────────────────────

#[test]
fn master_quick_add_is_idempotent_and_uppercased() {
    let port = next_port();
    let mut child = start_server(port, None);

    let (status, body) = http_post(port, "/api/add-supplier", r#"{"name":"bajaj"}"#, &[]);
    assert_eq!(status, 201);
    assert_eq!(json(&body)["name"], "BAJAJ");

    // Same name again returns the existing entry instead of a duplicate.
    let (status, _) = http_post(port, "/api/add-supplier", r#"{"name":" BAJAJ "}"#, &[]);
    assert_eq!(status, 201);

    let (_, body) = http_get(port, "/api/suppliers", &[]);
    assert_eq!(json(&body).as_array().map(Vec::len), Some(1));

    let (status, body) = http_post(port, "/api/add-part", r#"{"name":"  "}"#, &[]);
    child.kill().ok();
    child.wait().ok();
    assert_eq!(status, 400);
    assert!(json(&body)["error"]
        .as_str()
        .unwrap_or_default()
        .contains("name"));
}

// ──────────────────────────────────────────────
// Bearer token auth
// ──────────────────────────────────────────────

#[test]
fn token_guards_every_mutating_route_but_not_reads() {
    let port = next_port();
    let mut child = start_server(port, Some("s3cret"));

    // Reads and health stay open.
    let (status, _) = http_get(port, "/health", &[]);
    assert_eq!(status, 200);
    let (status, _) = http_get(port, "/api/pending-supplier-outwards", &[]);
    assert_eq!(status, 200);

    // Mutations without a token are rejected before any state changes.
    let payload = r#"{"supplier_name":"BAJAJ","part_name":"MOTOR"}"#;
    let (status, body) = http_post(port, "/api/save-outward", payload, &[]);
    assert_eq!(status, 401);
    assert!(json(&body)["error"]
        .as_str()
        .unwrap_or_default()
        .contains("authentication"));

    let (status, _) = http_post(
        port,
        "/api/save-outward",
        payload,
        &[("Authorization", "Bearer wrong")],
    );
    assert_eq!(status, 403);

    let (status, _) = http_post(
        port,
        "/api/save-outward",
        payload,
        &[("Authorization", "Bearer s3cret")],
    );
    assert_eq!(status, 201);

    // The rejected attempts created nothing.
    let (_, body) = http_get(port, "/api/pending-supplier-outwards", &[]);
    child.kill().ok();
    child.wait().ok();
    assert_eq!(json(&body).as_array().map(Vec::len), Some(1));
}
