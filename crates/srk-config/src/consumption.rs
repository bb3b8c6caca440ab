//! Unused-key guard.
//!
//! "Consumed pointers" are JSON Pointer prefixes. A leaf under any consumed
//! prefix is consumed; every other leaf is reported as unused. Callers decide
//! whether unused keys warn or fail.
//!
//! - consumed prefix "/input" consumes "/input/stock_csv"
//! - consumed prefix "/replay/as_of" does NOT consume "/replay/as_of_time"

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigMode {
    /// Full batch run: reads inputs, replays, writes outputs.
    Replay,
    /// Read-only inspection: reads inputs and replays, writes nothing.
    Show,
}

impl ConfigMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigMode::Replay => "REPLAY",
            ConfigMode::Show => "SHOW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    pub mode: String,
    /// Sorted, unique.
    pub consumed_prefixes: Vec<String>,
    /// Sorted.
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Pointers read by `ReplaySettings::from_config_json` in each mode.
///
/// Keep in step with the settings reader: a key listed here but never read
/// hides a typo in the operator's YAML.
pub fn consumed_pointers_for_mode(mode: ConfigMode) -> &'static [&'static str] {
    match mode {
        ConfigMode::Replay => &[
            "/input/stock_csv",
            "/input/movement_csv",
            "/replay/as_of",
            "/replay/fail_on_critical",
            "/output/dir",
            "/output/write_manifest",
        ],
        ConfigMode::Show => &["/input/stock_csv", "/input/movement_csv", "/replay/as_of"],
    }
}

/// Produce an unused-key report for `mode`.
///
/// With `UnusedKeyPolicy::Fail` any unused leaf is an error.
pub fn report_unused_keys(
    mode: ConfigMode,
    config_json: &Value,
    policy: UnusedKeyPolicy,
) -> Result<UnusedKeyReport> {
    let consumed: BTreeSet<&str> = consumed_pointers_for_mode(mode).iter().copied().collect();

    let unused: Vec<String> = leaf_pointers(config_json)
        .into_iter()
        .filter(|leaf| !consumed.iter().any(|c| consumes(c, leaf)))
        .collect();

    let report = UnusedKeyReport {
        mode: mode.as_str().to_string(),
        consumed_prefixes: consumed.into_iter().map(str::to_string).collect(),
        unused_leaf_pointers: unused,
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        let shown = report.unused_leaf_pointers.len().min(PREVIEW);
        bail!(
            "CONFIG_UNUSED_KEYS (mode={}): {} unused config key(s): {}{}. \
            Remove them or fix their spelling.",
            report.mode,
            report.unused_leaf_pointers.len(),
            report.unused_leaf_pointers[..shown].join(", "),
            if shown < report.unused_leaf_pointers.len() { ", ..." } else { "" }
        );
    }

    Ok(report)
}

const PREVIEW: usize = 12;

/// `prefix` consumes `leaf` when they are equal or `leaf` continues past a
/// segment boundary. `/replay/as_of` does not consume `/replay/as_of_time`.
fn consumes(prefix: &str, leaf: &str) -> bool {
    match leaf.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// JSON Pointers (RFC 6901) to every scalar in `v`, sorted. Empty objects
/// and arrays have no leaves; a scalar root is `/`.
fn leaf_pointers(v: &Value) -> BTreeSet<String> {
    let mut leaves = BTreeSet::new();
    let mut pending: Vec<(String, &Value)> = vec![(String::new(), v)];

    while let Some((path, node)) = pending.pop() {
        match node {
            Value::Object(map) => {
                for (key, child) in map {
                    let token = key.replace('~', "~0").replace('/', "~1");
                    pending.push((format!("{path}/{token}"), child));
                }
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    pending.push((format!("{path}/{i}"), child));
                }
            }
            _ if path.is_empty() => {
                leaves.insert("/".to_string());
            }
            _ => {
                leaves.insert(path);
            }
        }
    }

    leaves
}
