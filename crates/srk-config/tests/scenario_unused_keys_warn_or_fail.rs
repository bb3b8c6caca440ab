use srk_config::{
    load_layered_yaml_from_strings, report_unused_keys, ConfigMode, ReplaySettings,
    UnusedKeyPolicy,
};

/// Unused-key guard:
/// 1) Unused keys are detected in WARN mode but do not error.
/// 2) Unused keys cause failure in FAIL mode.
/// 3) Keys under consumed prefixes are not flagged.
/// 4) SHOW consumes less than REPLAY.

#[test]
fn warn_mode_reports_unused_keys_without_error() {
    let yaml = r#"
input:
  stock_csv: s.csv
  movment_csv: typo.csv

unused_section:
  foo: 123
  bar: 456
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");

    let report = report_unused_keys(ConfigMode::Replay, &loaded.config_json, UnusedKeyPolicy::Warn)
        .expect("warn mode must not error");

    assert!(!report.is_clean());
    assert_eq!(
        report.unused_leaf_pointers,
        vec![
            "/input/movment_csv".to_string(),
            "/unused_section/bar".to_string(),
            "/unused_section/foo".to_string(),
        ]
    );
    assert_eq!(report.mode, "REPLAY");
}

#[test]
fn fail_mode_errors_on_unused_keys() {
    let yaml = r#"
replay:
  fail_on_critical: true
  strict_mode: yes
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let err = report_unused_keys(ConfigMode::Replay, &loaded.config_json, UnusedKeyPolicy::Fail)
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("CONFIG_UNUSED_KEYS"), "got: {msg}");
    assert!(msg.contains("/replay/strict_mode"), "got: {msg}");
}

#[test]
fn fully_consumed_config_is_clean() {
    let yaml = r#"
input:
  stock_csv: s.csv
  movement_csv: m.csv
replay:
  as_of: "2026-02-01"
  fail_on_critical: true
output:
  dir: out
  write_manifest: false
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let report = report_unused_keys(ConfigMode::Replay, &loaded.config_json, UnusedKeyPolicy::Fail)
        .expect("every key is read in replay mode");
    assert!(report.is_clean());

    // Whatever the guard accepts, the settings reader understands.
    let settings = ReplaySettings::from_config_json(&loaded.config_json).unwrap();
    assert!(settings.fail_on_critical);
    assert!(!settings.write_manifest);
}

#[test]
fn show_mode_flags_output_keys() {
    let yaml = r#"
input:
  stock_csv: s.csv
output:
  dir: out
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let report =
        report_unused_keys(ConfigMode::Show, &loaded.config_json, UnusedKeyPolicy::Warn).unwrap();
    assert_eq!(report.unused_leaf_pointers, vec!["/output/dir".to_string()]);

    let replay =
        report_unused_keys(ConfigMode::Replay, &loaded.config_json, UnusedKeyPolicy::Warn).unwrap();
    assert!(replay.is_clean());
}
