use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::{Command, Output, Stdio};
use std::thread;

const QUERY_BIN: &str = env!("CARGO_BIN_EXE_query-a10-api");
const MEMORY_BIN: &str = env!("CARGO_BIN_EXE_check-a10-memory");

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Serves one canned JSON response on a local port and returns `HOST:PORT`.
fn serve_json(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("failed to accept");
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).expect("failed to read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).ok();
    });

    addr.to_string()
}

/// Device info reporting 1 GB used of 4 GB.
const QUARTER_USED: &str =
    r#"{"device_information": {"memory": {"total": 4194304, "used": 1048576}}}"#;

/// Runs a binary with non-interactive stdin and a clean environment.
fn run(bin: &str, args: &[&str]) -> Output {
    Command::new(bin)
        .args(args)
        .env_remove("A10_MONITORING_CONFIG")
        .env_remove("A10_MONITORING_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("failed to run binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// query-a10-api
// ---------------------------------------------------------------------------

#[test]
fn test_query_help() {
    let output = run(QUERY_BIN, &["--help"]);
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(text.starts_with("NAME\n    query-a10-api\n\nDESCRIPTION\n"), "{text}");
    assert!(text.contains("        system.device_info.get\n"));
    assert!(text.contains("EXAMPLES\n    query-a10-api -s <host> -m <method> [param=value] ...\n"));
    assert!(text.contains("-s, --slb HOST[:PORT]"));
    assert!(text.contains("    --version"));
}

#[test]
fn test_query_version() {
    let output = run(QUERY_BIN, &["--version"]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        format!("a10-monitoring {}\n", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn test_query_requires_slb() {
    let output = run(QUERY_BIN, &["-m", "system.device_info.get"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert_eq!(
        stderr(&output),
        "error: please specify the SLB host:port via -s\n"
    );
}

#[test]
fn test_query_requires_metric() {
    let output = run(QUERY_BIN, &["-s", "127.0.0.1"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("please specify the A10 metric via -m"));
}

#[test]
fn test_query_unknown_flag() {
    let output = run(QUERY_BIN, &["--bogus"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "error: invalid option: --bogus\n");
}

#[test]
fn test_query_rejects_malformed_param() {
    let output = run(QUERY_BIN, &["-s", "127.0.0.1", "-m", "x.get", "oops"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid parameter 'oops', expected key=value"));
}

#[test]
fn test_query_prints_pretty_json() {
    let addr = serve_json(r#"{"virtual_server_list":[{"name":"vs1"}]}"#);
    let output = run(
        QUERY_BIN,
        &["-s", &addr, "-m", "slb.virtual_server.getAll", "port_num=1"],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("\n  \"virtual_server_list\": [\n"), "{text}");
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["virtual_server_list"][0]["name"], "vs1");
}

// ---------------------------------------------------------------------------
// check-a10-memory
// ---------------------------------------------------------------------------

#[test]
fn test_memory_ok() {
    let addr = serve_json(QUARTER_USED);
    let output = run(MEMORY_BIN, &["-s", &addr]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "OK: memory usage is 25.0% (1.0 GB of 4.0 GB)\n"
    );
}

#[test]
fn test_memory_warning() {
    let addr = serve_json(QUARTER_USED);
    let output = run(MEMORY_BIN, &["-s", &addr, "-w", "20"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("WARNING: memory usage is 25.0%"));
}

#[test]
fn test_memory_critical() {
    let addr = serve_json(QUARTER_USED);
    let output = run(MEMORY_BIN, &["-s", &addr, "--warning=10", "--critical", "20"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).starts_with("CRITICAL: memory usage is 25.0%"));
}

#[test]
fn test_memory_threshold_is_strict() {
    let addr = serve_json(QUARTER_USED);
    let output = run(MEMORY_BIN, &["-s", &addr, "-w", "25"]);

    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_memory_missing_slb_is_critical() {
    let output = run(MEMORY_BIN, &[]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output), "CRITICAL: please specify the SLB host:port\n");
}

#[test]
fn test_memory_bad_threshold_is_critical() {
    let output = run(MEMORY_BIN, &["-s", "127.0.0.1", "-w", "lots"]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stdout(&output),
        "CRITICAL: invalid argument: -w lots (invalid float literal)\n"
    );
}

#[test]
fn test_memory_unreachable_device_is_critical() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };
    let output = run(MEMORY_BIN, &["-s", &addr]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).starts_with("CRITICAL: "));
}

#[test]
fn test_memory_zero_total_is_critical() {
    let addr = serve_json(r#"{"device_information": {"memory": {"total": 0, "used": 0}}}"#);
    let output = run(MEMORY_BIN, &["-s", &addr]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stdout(&output),
        "CRITICAL: malformed response: device reports zero total memory\n"
    );
}

#[test]
fn test_memory_oversized_counter_is_critical() {
    let addr = serve_json(
        r#"{"device_information": {"memory": {"total": 36028797018963967, "used": 1}}}"#,
    );
    let output = run(MEMORY_BIN, &["-s", &addr]);

    assert_eq!(output.status.code(), Some(2), "{}", stderr(&output));
    assert!(stdout(&output).starts_with("CRITICAL: malformed response: "));
}

#[test]
fn test_memory_status_survives_closed_stdout() {
    let mut child = Command::new(MEMORY_BIN)
        .env_remove("A10_MONITORING_CONFIG")
        .env_remove("A10_MONITORING_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run binary");
    drop(child.stdout.take());

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(2), "{}", stderr(&output));
    assert!(!stderr(&output).contains("panicked"));
}

#[test]
fn test_memory_help_lists_defaults() {
    let output = run(MEMORY_BIN, &["--help"]);
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(text.contains("EXAMPLES\n    check-a10-memory [options]\n"));
    assert!(text.contains("Warning threshold, as percent (0-100) (default: 80)"));
    assert!(text.contains("Critical threshold, as percent (0-100) (default: 90)"));
}

#[test]
fn test_memory_uses_configured_default_port() {
    let addr = serve_json(QUARTER_USED);
    let port = addr.rsplit(':').next().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("a10.yaml");
    fs::write(&config, format!("default_port: {port}\n")).unwrap();

    let output = Command::new(MEMORY_BIN)
        .args(["-s", "127.0.0.1"])
        .env("A10_MONITORING_CONFIG", &config)
        .env_remove("A10_MONITORING_LOG")
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
    assert!(stdout(&output).starts_with("OK: "));
}
