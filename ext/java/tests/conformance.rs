//! Conformance tests that run YAML fixtures against arbor-java
//!
//! Run with: cargo test -p arbor-java --test conformance --features fixtures

#![cfg(feature = "fixtures")]

use arbor::RegistryBuilder;
use arbor_java::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Load and run every fixture in one file.
fn run_fixture_file(name: &str) {
    let path = fixtures_dir().join(name);
    let yaml =
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
    let fixtures = Fixture::from_yaml_multi(&yaml)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", path.display()));
    assert!(!fixtures.is_empty(), "{} holds no fixtures", path.display());

    let registry = arbor_java::register(RegistryBuilder::new()).build();
    for fixture in fixtures {
        println!("  Running: {}", fixture.name);
        fixture.run_and_assert(&registry);
    }
}

#[test]
fn test_combinators() {
    run_fixture_file("combinators.yaml");
}

#[test]
fn test_statements() {
    run_fixture_file("statements.yaml");
}

#[test]
fn test_declarations() {
    run_fixture_file("declarations.yaml");
}

#[test]
fn test_expressions() {
    run_fixture_file("expressions.yaml");
}

#[test]
fn test_methods() {
    run_fixture_file("methods.yaml");
}

#[test]
fn test_errors() {
    run_fixture_file("errors.yaml");
}

#[test]
fn every_fixture_file_is_covered() {
    let mut files: Vec<String> = fs::read_dir(fixtures_dir())
        .expect("read fixtures dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".yaml"))
        .collect();
    files.sort();
    assert_eq!(
        files,
        [
            "combinators.yaml",
            "declarations.yaml",
            "errors.yaml",
            "expressions.yaml",
            "methods.yaml",
            "statements.yaml",
        ]
    );
}
