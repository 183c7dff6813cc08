use mocksmith_core::{
    CollectedResults, Generator, GeneratorConfig, OutputOptions, Result, SourceCache, SwiftParser,
    render_output,
};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const API: &str = r#"import Foundation
import UIKit

/// Talks to the backend.
/// @mockable
public protocol Api: Base {
    var token: String { get set }
    func fetch(id: Int) async throws -> Data
    func fetch(name: String) -> Data?
    func makeBase() -> Base
    subscript(index: Int) -> String { get }
}
"#;

const BASE: &str = r#"import Foundation

/// @mockable
protocol Base {
    func ping()
}
"#;

const LEGACY: &str = r#"import Foundation

/// @mockable
protocol Legacy {
    func old() -> Int
}

/// @mockable
protocol Child: Legacy {
    func young()
}

protocol Unannotated {
    func skip()
}
"#;

const LEGACY_MOCK: &str = r#"import Foundation

class LegacyMock: Legacy {
    private var _doneInit = false
    init() { _doneInit = true }
    var oldCallCount = 0
    var oldHandler: (() -> (Int))?
    func old() -> Int {
        oldCallCount += 1
        if let oldHandler = oldHandler {
            return oldHandler()
        }
        return 0
    }
}
"#;

struct Fixture {
    _dir: TempDir,
    sources: Vec<PathBuf>,
    mocks: Vec<PathBuf>,
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let sources = vec![
        write(dir.path(), "Api.swift", API),
        write(dir.path(), "Base.swift", BASE),
        write(dir.path(), "Legacy.swift", LEGACY),
    ];
    let mocks = vec![write(dir.path(), "LegacyMock.swift", LEGACY_MOCK)];
    Fixture {
        _dir: dir,
        sources,
        mocks,
    }
}

fn generate(fixture: &Fixture, config: &GeneratorConfig, cache: &SourceCache) -> Result<String> {
    let generator = Generator::from_config(config);
    let parser = SwiftParser::new();
    let sink = Mutex::new(CollectedResults::new());

    generator.generate_from_tree(&parser, &fixture.sources, false, &sink)?;
    generator.generate_processed(&parser, &fixture.mocks, &sink)?;

    let results = sink.into_inner();
    render_output(
        &results.entities,
        &results.imports,
        &OutputOptions::from(config),
        cache,
    )
}

fn mock_section<'a>(output: &'a str, name: &str) -> &'a str {
    let start = output
        .find(&format!("class {name}Mock"))
        .unwrap_or_else(|| panic!("{name}Mock missing from:\n{output}"));
    let rest = &output[start..];
    let end = rest.find("\n}").map(|index| index + 2).unwrap_or(rest.len());
    &rest[..end]
}

#[test]
fn test_generates_annotated_protocols_only() -> Result<()> {
    let fixture = fixture();
    let output = generate(&fixture, &GeneratorConfig::default(), &SourceCache::new())?;

    assert!(output.contains("public class ApiMock: Api {"));
    assert!(output.contains("class BaseMock: Base {"));
    assert!(output.contains("class ChildMock: Child {"));
    assert!(!output.contains("class LegacyMock"));
    assert!(!output.contains("UnannotatedMock"));

    // Name order
    let api = output.find("class ApiMock").unwrap();
    let base = output.find("class BaseMock").unwrap();
    let child = output.find("class ChildMock").unwrap();
    assert!(api < base && base < child);
    Ok(())
}

#[test]
fn test_overloads_inheritance_and_defaults() -> Result<()> {
    let fixture = fixture();
    let output = generate(&fixture, &GeneratorConfig::default(), &SourceCache::new())?;
    let api = mock_section(&output, "Api");

    assert!(api.contains("    public init() { _doneInit = true }"));
    assert!(api.contains("    var fetchCallCount = 0"));
    assert!(api.contains("    var fetchNameCallCount = 0"));
    assert!(api.contains("    var fetchNameHandler: ((String) -> (Data?))?"));
    assert!(api.contains("    func fetch(id: Int) async throws -> Data {"));
    assert!(api.contains("return try await fetchHandler(id)"));
    assert!(api.contains("        return nil"));
    assert!(api.contains("        return BaseMock()"));
    assert!(api.contains("    var tokenSetCallCount = 0"));
    assert!(api.contains("        set { }"));
    // Inherited from Base
    assert!(api.contains("    var pingCallCount = 0"));
    Ok(())
}

#[test]
fn test_processed_parent_is_passed_through() -> Result<()> {
    let fixture = fixture();
    let cache = SourceCache::new();
    let output = generate(&fixture, &GeneratorConfig::default(), &cache)?;
    let child = mock_section(&output, "Child");

    assert!(child.contains("    var youngCallCount = 0"));
    assert!(child.contains("    var oldHandler: (() -> (Int))?"));
    assert!(child.contains(
        "    func old() -> Int {\n        oldCallCount += 1\n        if let oldHandler = oldHandler {"
    ));
    assert_eq!(child.matches("private var _doneInit = false").count(), 1);
    assert_eq!(child.matches("init() { _doneInit = true }").count(), 1);
    assert_eq!(cache.decode_count(), 1);
    Ok(())
}

#[test]
fn test_header_and_imports() -> Result<()> {
    let fixture = fixture();
    let config = GeneratorConfig {
        header: Some("// Generated by mocksmith. Do not edit.".to_string()),
        excluded_imports: vec!["UIKit".to_string()],
        testable_imports: vec!["App".to_string()],
        mock_final: true,
        ..Default::default()
    };
    let output = generate(&fixture, &config, &SourceCache::new())?;

    assert!(output.starts_with(
        "// Generated by mocksmith. Do not edit.\n\n@testable import App\nimport Foundation\n\n"
    ));
    assert!(!output.contains("import UIKit"));
    assert!(output.contains("public final class ApiMock: Api {"));
    Ok(())
}

#[test]
fn test_output_is_independent_of_concurrency() -> Result<()> {
    let fixture = fixture();
    let sequential = generate(&fixture, &GeneratorConfig::default(), &SourceCache::new())?;
    for limit in [1, 2, 4] {
        let config = GeneratorConfig {
            max_concurrency: Some(limit),
            ..Default::default()
        };
        let concurrent = generate(&fixture, &config, &SourceCache::new())?;
        assert_eq!(sequential, concurrent, "max_concurrency = {limit}");
    }
    Ok(())
}

fn generate_files(sources: &[(&str, &str)], mocks: &[(&str, &str)]) -> Result<String> {
    let dir = TempDir::new()?;
    let written = |files: &[(&str, &str)]| -> Vec<PathBuf> {
        files
            .iter()
            .map(|(name, contents)| write(dir.path(), name, contents))
            .collect()
    };
    let fixture = Fixture {
        sources: written(sources),
        mocks: written(mocks),
        _dir: dir,
    };
    generate(&fixture, &GeneratorConfig::default(), &SourceCache::new())
}

#[test]
fn test_label_only_overloads_are_both_mocked() -> Result<()> {
    let cart = r#"/// @mockable
protocol Cart {
    func add(_ item: Item)
    func add(item: Item)
}
"#;
    let output = generate_files(&[("Cart.swift", cart)], &[])?;
    let mock = mock_section(&output, "Cart");

    assert!(mock.contains("    func add(_ item: Item) {"));
    assert!(mock.contains("    func add(item: Item) {"));
    assert_eq!(mock.matches("    var addCallCount = 0").count(), 1);
    assert!(mock.contains("    var addItemCallCount = 0"));
    Ok(())
}

#[test]
fn test_fresh_member_does_not_redeclare_processed_storage() -> Result<()> {
    let sources = r#"/// @mockable
protocol Parent {
    func load(id: Int)
}

/// @mockable
protocol Child: Parent {
    func load()
}
"#;
    let parent_mock = r#"class ParentMock: Parent {
    private var _doneInit = false
    init() { _doneInit = true }
    var loadCallCount = 0
    var loadHandler: ((Int) -> ())?
    func load(id: Int) {
        loadCallCount += 1
        if let loadHandler = loadHandler {
            loadHandler(id)
        }
    }
}
"#;
    let output = generate_files(&[("Child.swift", sources)], &[("ParentMock.swift", parent_mock)])?;
    let child = mock_section(&output, "Child");

    assert!(child.contains("    func load() {"));
    assert!(child.contains("    func load(id: Int) {"));
    assert_eq!(child.matches("var loadCallCount = 0").count(), 1);
    assert_eq!(child.matches("var loadHandler:").count(), 1);
    assert!(!output.contains("class ParentMock"));
    Ok(())
}
