//! Configuration Unit Tests.
//!
//! Verifies JSON parsing, default values, validation errors, file loading
//! and construction of controllers from configuration entries.

use std::io::Write;

use dpu_fetchunit::common::ConfigError;
use dpu_fetchunit::config::{Config, FetchUnitConfig};
use dpu_fetchunit::soc::RegisterFile;
use dpu_fetchunit::{FetchUnit, FetchUnitKind, StreamId};
use pretty_assertions::assert_eq;

use crate::common::harness::capture_logs;

// ══════════════════════════════════════════════════════════
// 1. Parsing and defaults
// ══════════════════════════════════════════════════════════

#[test]
fn empty_object_has_no_units() {
    let config = Config::from_json("{}").unwrap();
    assert!(config.units.is_empty());
}

#[test]
fn optional_fields_take_defaults() {
    let config = Config::from_json(r#"{ "units": [ { "kind": "warp", "id": 2 } ] }"#).unwrap();
    assert_eq!(config.units, vec![FetchUnitConfig::new(FetchUnitKind::Warp, 2)]);
    assert_eq!(config.units[0].sub_id, 0);
    assert_eq!(config.units[0].stream, StreamId::Disabled);
}

#[test]
fn kind_accepts_block_names() {
    let json = r#"{ "units": [
        { "kind": "fetchdecode", "id": 0 },
        { "kind": "fetcheco", "id": 0 },
        { "kind": "fetchlayer", "id": 0 },
        { "kind": "fetchwarp", "id": 0 }
    ] }"#;
    let kinds: Vec<_> = Config::from_json(json)
        .unwrap()
        .units
        .iter()
        .map(|u| u.kind)
        .collect();
    assert_eq!(kinds, FetchUnitKind::ALL.to_vec());
}

#[test]
fn stream_is_parsed() {
    let json = r#"{ "units": [ { "kind": "decode", "id": 1, "stream": "stream1" } ] }"#;
    assert_eq!(Config::from_json(json).unwrap().units[0].stream, StreamId::Stream1);
}

// ══════════════════════════════════════════════════════════
// 2. Errors
// ══════════════════════════════════════════════════════════

#[test]
fn malformed_json_is_a_parse_error() {
    let err = Config::from_json(r#"{ "units": [ { "kind": "decode" } ] }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "{err}");
}

#[test]
fn unknown_kind_is_a_parse_error() {
    let err = Config::from_json(r#"{ "units": [ { "kind": "fetchblit", "id": 0 } ] }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "{err}");
}

#[test]
fn sub_id_out_of_range_is_rejected() {
    let json = r#"{ "units": [ { "kind": "layer", "id": 0, "sub_id": 8 } ] }"#;
    let err = Config::from_json(json).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::SubIdOutOfRange { kind: FetchUnitKind::Layer, id: 0, sub_id: 8, max: 7 }
    ));
    assert_eq!(err.to_string(), "fetchlayer0: sub-unit index 8 out of range (max 7)");
}

#[test]
fn duplicate_unit_is_rejected() {
    let json = r#"{ "units": [
        { "kind": "decode", "id": 0 },
        { "kind": "eco", "id": 0 },
        { "kind": "decode", "id": 0, "sub_id": 1 }
    ] }"#;
    let err = Config::from_json(json).unwrap_err();
    assert!(matches!(err, ConfigError::Duplicate { kind: FetchUnitKind::Decode, id: 0 }));
}

// ══════════════════════════════════════════════════════════
// 3. Loading
// ══════════════════════════════════════════════════════════

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "units": [ {{ "kind": "eco", "id": 1 }} ] }}"#).unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.units, vec![FetchUnitConfig::new(FetchUnitKind::Eco, 1)]);
}

#[test]
fn load_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let err = Config::load(&path).unwrap_err();
    match err {
        ConfigError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected Io error, got {other}"),
    }
}

// ══════════════════════════════════════════════════════════
// 4. Construction
// ══════════════════════════════════════════════════════════

#[test]
fn unit_from_unvalidated_entry_is_reported() {
    let entry = FetchUnitConfig {
        sub_id: 8,
        ..FetchUnitConfig::new(FetchUnitKind::Layer, 0)
    };
    let (unit, logs) = capture_logs(|| FetchUnit::from_config(&entry, RegisterFile::new()));

    assert!(logs.contains("sub-unit index 8 out of range"), "{logs}");
    assert_eq!(unit.sub_id(), 8);
}

#[test]
fn unit_from_config_carries_identity_and_routing() {
    let entry = FetchUnitConfig {
        sub_id: 2,
        stream: StreamId::Stream0,
        ..FetchUnitConfig::new(FetchUnitKind::Layer, 1)
    };
    let unit = FetchUnit::from_config(&entry, RegisterFile::new());

    assert_eq!(unit.kind(), FetchUnitKind::Layer);
    assert_eq!(unit.id(), 1);
    assert_eq!(unit.sub_id(), 2);
    assert_eq!(unit.stream_id(), StreamId::Stream0);
    assert!(!unit.is_pinned_off());
    assert_eq!(unit.to_string(), "fetchlayer1");
}
