//! Validates the serialized model of every valid fixture against the formal
//! model schema at schema/model-schema.json.

use arlecchino_core::{compile_source, CompileOptions};
use std::path::{Path, PathBuf};

fn collect_fixture_files(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|e| e == "yml"))
        .collect();
    paths.sort();
    paths
}

#[test]
fn validate_all_valid_fixtures_against_schema() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let schema_path = root.join("schema/model-schema.json");
    let schema_src = std::fs::read_to_string(&schema_path)
        .unwrap_or_else(|e| panic!("Failed to read schema at {}: {}", schema_path.display(), e));
    let schema_value: serde_json::Value = serde_json::from_str(&schema_src).unwrap();
    let validator = jsonschema::validator_for(&schema_value)
        .unwrap_or_else(|e| panic!("Failed to compile schema: {}", e));

    let mut tested = 0usize;
    let mut failures = Vec::new();

    for path in collect_fixture_files(&root.join("fixtures/valid")) {
        let text = std::fs::read_to_string(&path).unwrap();
        let compilation =
            compile_source(&text, &path.to_string_lossy(), &CompileOptions::default())
                .unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
        let instance = serde_json::to_value(&compilation.root).unwrap();
        if let Err(error) = validator.validate(&instance) {
            failures.push(format!("{}: {}", path.display(), error));
        }
        tested += 1;
    }

    assert!(tested > 0, "No fixtures found -- check paths");
    assert!(
        failures.is_empty(),
        "Schema validation failed for {} of {} files:\n{}",
        failures.len(),
        tested,
        failures.join("\n")
    );
}

#[test]
fn schema_rejects_unknown_step_type() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let schema_src = std::fs::read_to_string(root.join("schema/model-schema.json")).unwrap();
    let schema_value: serde_json::Value = serde_json::from_str(&schema_src).unwrap();
    let validator = jsonschema::validator_for(&schema_value).unwrap();

    let instance = serde_json::json!({
        "configuration": {},
        "scenarios": [{ "steps": [{ "type": "teleport" }] }]
    });
    assert!(validator.validate(&instance).is_err());
}
