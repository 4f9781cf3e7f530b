use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fake scanning service answering every POST with the same body.
struct FakeService {
    server: MockServer,
    runtime: tokio::runtime::Runtime,
}

impl FakeService {
    fn answering(status: u16, body: serde_json::Value) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(status).set_body_json(body))
                .mount(&server)
                .await;
            server
        });
        FakeService { server, runtime }
    }

    fn requests(&self) -> usize {
        self.runtime
            .block_on(self.server.received_requests())
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    fn scanner(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("steampunk-scanner");
        cmd.env("SCANNER_ENDPOINT", self.server.uri())
            .env("SCANNER_USERNAME", "me@example.com")
            .env("SCANNER_PASSWORD", "secret")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn uncertified_with_error() -> serde_json::Value {
    json!([{"certified": false, "fqcn": "ns.col.mod", "errors": ["bad arg"], "hints": []}])
}

#[test]
fn scan_task_file_reports_lines() {
    let service = FakeService::answering(200, uncertified_with_error());
    service
        .scanner()
        .args(["scan", "--tasks", "tests/fixtures/tasks.yml"])
        .assert()
        .code(1)
        .stdout(predicate::eq(
            "tests/fixtures/tasks.yml:2: WARNING: The ns.col.mod module is not certified.\n\
             tests/fixtures/tasks.yml:2: ERROR: bad arg\n",
        ));
    assert_eq!(service.requests(), 1);
}

#[test]
fn scan_clean_playbook_passes() {
    let service = FakeService::answering(
        200,
        json!([
            {"certified": true, "fqcn": "community.general.pkgng", "errors": [], "hints": []},
            {"certified": true, "fqcn": "ansible.builtin.ping", "errors": [], "hints": ["use fqcn"]}
        ]),
    );
    service
        .scanner()
        .args(["scan", "--playbooks", "tests/fixtures/playbook.yml"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "tests/fixtures/playbook.yml:10: HINT: use fqcn\n",
        ));
}

#[test]
fn dot_prefixed_paths_are_reported_clean() {
    let service = FakeService::answering(
        200,
        json!([{"errors": ["bad arg"]}, {}, {}, {}]),
    );
    service
        .scanner()
        .args(["scan", "--roles", "./tests/fixtures/role"])
        .assert()
        .code(1)
        .stdout(predicate::eq(
            "tests/fixtures/role/tasks/main.yml:2: ERROR: bad arg\n",
        ));
}

#[test]
fn detected_playbook_is_scanned() {
    let service = FakeService::answering(
        200,
        json!([{"certified": true, "errors": [], "hints": []}]),
    );
    service
        .scanner()
        .args(["scan", "tests/fixtures/detect"])
        .assert()
        .success();
    assert_eq!(service.requests(), 1);
}

#[test]
fn nothing_detected_skips_the_service() {
    let service = FakeService::answering(200, json!([]));
    service
        .scanner()
        .env_remove("SCANNER_USERNAME")
        .env_remove("SCANNER_PASSWORD")
        .args(["scan", "tests/fixtures/detect/vars.yml"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert_eq!(service.requests(), 0);
}

#[test]
fn json_format() {
    let service = FakeService::answering(200, uncertified_with_error());
    service
        .scanner()
        .args(["scan", "-t", "tests/fixtures/tasks.yml", "--format", "json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"passed\": false"))
        .stdout(predicate::str::contains("\"tasks_scanned\": 1"));
}

#[test]
fn sarif_format() {
    let service = FakeService::answering(200, uncertified_with_error());
    service
        .scanner()
        .args(["scan", "-t", "tests/fixtures/tasks.yml", "--format", "sarif"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"version\": \"2.1.0\""));
}

#[test]
fn output_written_to_file() {
    let service = FakeService::answering(200, uncertified_with_error());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.txt");

    service
        .scanner()
        .args(["scan", "-t", "tests/fixtures/tasks.yml", "--output"])
        .arg(&out)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Output written to"));

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("tests/fixtures/tasks.yml:2: ERROR: bad arg"));
}

#[test]
fn invalid_path_exits_2() {
    let service = FakeService::answering(200, json!([]));
    service
        .scanner()
        .args(["scan", "--roles", "tests/fixtures/tasks.yml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is not a valid role directory"));
    assert_eq!(service.requests(), 0);
}

#[test]
fn missing_path_exits_2() {
    let service = FakeService::answering(200, json!([]));
    service
        .scanner()
        .args(["scan", "tests/fixtures/does-not-exist"])
        .assert()
        .code(2);
}

#[test]
fn no_inputs_exits_2() {
    let service = FakeService::answering(200, json!([]));
    service
        .scanner()
        .arg("scan")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nothing to scan"));
}

#[test]
fn service_error_exits_2() {
    let service = FakeService::answering(401, json!({"msg": "Invalid credentials"}));
    service
        .scanner()
        .args(["scan", "-t", "tests/fixtures/tasks.yml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Error: API error: 401 - Invalid credentials",
        ));
}

#[test]
fn too_many_findings_exits_2() {
    let service = FakeService::answering(200, json!([{}, {}]));
    service
        .scanner()
        .args(["scan", "-t", "tests/fixtures/tasks.yml"])
        .assert()
        .code(2);
}

#[test]
fn account_activate_prints_message() {
    let service = FakeService::answering(200, json!({"msg": "Account activated"}));
    service
        .scanner()
        .args(["account", "activate", "me@example.com", "1234"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Account activated"));
}

#[test]
fn help_lists_subcommands() {
    assert_cmd::cargo::cargo_bin_cmd!("steampunk-scanner")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("account"));
}
