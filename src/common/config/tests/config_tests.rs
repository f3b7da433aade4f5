//! Unit tests for common-config crate

use std::io::Write;

use common_config::{ArrayInsertPolicy, EngineConfig, ExecutionConfig, MosaicConfig};

#[test]
fn test_mosaic_config_default() {
    let config = MosaicConfig::default();

    assert!(!config.engine.treat_warnings_as_errors);
    assert_eq!(
        config.engine.array_insert_policy,
        ArrayInsertPolicy::RejectIncompatible
    );
    assert_eq!(config.execution.parallelism, None);
    assert_eq!(config.execution.min_parallel_tuples, 10_000);
    assert!(config.execution.enable_parallel);
}

#[test]
fn test_engine_config_builders() {
    let config = EngineConfig::default()
        .with_warnings_as_errors(true)
        .with_insert_policy(ArrayInsertPolicy::Replace);

    assert!(config.treat_warnings_as_errors);
    assert_eq!(config.array_insert_policy, ArrayInsertPolicy::Replace);
}

#[test]
fn test_effective_workers() {
    assert_eq!(ExecutionConfig::sequential().effective_workers(), 1);
    assert_eq!(
        ExecutionConfig::default()
            .with_parallelism(6)
            .effective_workers(),
        6
    );
    assert_eq!(
        ExecutionConfig::default()
            .with_parallelism(0)
            .effective_workers(),
        1
    );
    assert!(ExecutionConfig::default().effective_workers() >= 1);
}

#[test]
fn test_config_serialization_roundtrip() {
    let mut config = MosaicConfig::default();
    config.engine.treat_warnings_as_errors = true;
    config.execution.parallelism = Some(4);

    let json = config.to_json_string().unwrap();
    assert!(json.contains("treat_warnings_as_errors"));

    let parsed = MosaicConfig::from_json_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_json_uses_defaults() {
    let parsed =
        MosaicConfig::from_json_str(r#"{ "engine": { "array_insert_policy": "Replace" } }"#)
            .unwrap();

    assert_eq!(parsed.engine.array_insert_policy, ArrayInsertPolicy::Replace);
    assert!(!parsed.engine.treat_warnings_as_errors);
    assert_eq!(parsed.execution, ExecutionConfig::default());
}

#[test]
fn test_invalid_json_is_an_error() {
    let err = MosaicConfig::from_json_str("{ not json").unwrap_err();
    assert!(err.to_string().starts_with("SerdeJsonError"));
}

#[test]
fn test_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "execution": {{ "parallelism": 2, "min_parallel_tuples": 5 }} }}"#
    )
    .unwrap();

    let config = MosaicConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.execution.parallelism, Some(2));
    assert_eq!(config.execution.min_parallel_tuples, 5);
    assert!(config.execution.enable_parallel);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = MosaicConfig::from_json_file("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().starts_with("IoError"));
}
