use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const SERVICE: &str = r#"import Foundation

/// @mockable
protocol Service {
    func load(id: Int) -> String
    func load(name: String) -> String
}

protocol Skipped {
    func nothing()
}
"#;

fn write_source(dir: &Path) {
    std::fs::create_dir_all(dir.join("Sources")).unwrap();
    std::fs::write(dir.join("Sources/Service.swift"), SERVICE).unwrap();
}

fn mocksmith() -> Command {
    Command::cargo_bin("mocksmith").unwrap()
}

#[test]
fn test_generate_prints_mocks() {
    let temp_dir = TempDir::new().unwrap();
    write_source(temp_dir.path());

    mocksmith()
        .current_dir(temp_dir.path())
        .args(["generate", "--sources", "Sources", "--header", "// Generated"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("// Generated\n\nimport Foundation"))
        .stdout(predicate::str::contains("class ServiceMock: Service {"))
        .stdout(predicate::str::contains("var loadNameCallCount = 0"))
        .stdout(predicate::str::contains("SkippedMock").not());
}

#[test]
fn test_generate_writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    write_source(temp_dir.path());
    let output = temp_dir.path().join("Mocks/Generated.swift");

    mocksmith()
        .current_dir(temp_dir.path())
        .args(["generate", "-s", "Sources", "-j", "2", "--mock-final", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote mocks"));

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("final class ServiceMock: Service {"));
}

#[test]
fn test_generate_uses_config_file() {
    let temp_dir = TempDir::new().unwrap();
    write_source(temp_dir.path());
    std::fs::write(
        temp_dir.path().join(".mocksmith.json"),
        r#"{ "testable_imports": ["App"], "excluded_imports": ["Foundation"] }"#,
    )
    .unwrap();

    mocksmith()
        .current_dir(temp_dir.path())
        .args(["generate", "--sources", "Sources"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("@testable import App\n\nclass ServiceMock"));
}

#[test]
fn test_analyze_json() {
    let temp_dir = TempDir::new().unwrap();
    write_source(temp_dir.path());

    mocksmith()
        .current_dir(temp_dir.path())
        .args(["analyze", "Sources/Service.swift", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Service\""))
        .stdout(predicate::str::contains("\"identifier\": \"loadName\""))
        .stdout(predicate::str::contains("\"full_name\": \"loadIdIntString\""));
}

#[test]
fn test_analyze_missing_file_fails() {
    mocksmith()
        .args(["analyze", "does/not/exist.swift"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}
