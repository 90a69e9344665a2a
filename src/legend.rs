//! Severity code descriptions taken from the feed's `legend` section.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::severity::{NO_DATA_CODE, NO_DATA_DESCRIPTION, SeverityLevel};

const DESC_SUFFIX: &str = "_desc";

/// DWD names legend entries `id1`, `id2`, ... and stores the code as value.
fn is_indexed_key(key: &str) -> bool {
    key.strip_prefix("id")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Maps severity codes to their human readable description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Legend {
    entries: BTreeMap<String, String>,
}

impl Legend {
    /// Builds the legend from the raw `legend` object.
    ///
    /// Every key `K` without the `_desc` suffix is paired with `K_desc` and
    /// registered under `K`, except for indexed `idN` keys whose code is the
    /// value. Codes outside the severity scale are kept. The no-data code is
    /// always present.
    pub fn from_raw(raw: &BTreeMap<String, String>) -> Self {
        let mut entries = BTreeMap::new();

        for (key, value) in raw {
            if key.ends_with(DESC_SUFFIX) {
                continue;
            }
            let Some(description) = raw.get(&format!("{key}{DESC_SUFFIX}")) else {
                debug!(key = %key, "Legend entry without description skipped");
                continue;
            };
            let code = if is_indexed_key(key) { value } else { key };
            entries.insert(code.trim().to_string(), description.clone());
        }

        entries.insert(NO_DATA_CODE.to_string(), NO_DATA_DESCRIPTION.to_string());

        Self { entries }
    }

    pub fn describe(&self, code: &str) -> Option<&str> {
        self.entries.get(code.trim()).map(String::as_str)
    }

    /// Description of a level, looked up through its code. `None` if the
    /// feed did not describe that code.
    pub fn describe_level(&self, level: SeverityLevel) -> Option<&str> {
        self.describe(level.code())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_dwd_id_scheme() {
        let legend = Legend::from_raw(&raw(&[
            ("id1", "0"),
            ("id1_desc", "keine Belastung"),
            ("id2", "0-1"),
            ("id2_desc", "keine bis geringe Belastung"),
            ("id7", "3"),
            ("id7_desc", "hohe Belastung"),
        ]));

        assert_eq!(legend.describe("0"), Some("keine Belastung"));
        assert_eq!(legend.describe("0-1"), Some("keine bis geringe Belastung"));
        assert_eq!(legend.describe("3"), Some("hohe Belastung"));
        assert_eq!(legend.describe("id1"), None);
        assert_eq!(legend.len(), 4);
    }

    #[test]
    fn test_code_keyed_scheme() {
        let legend = Legend::from_raw(&raw(&[
            ("0", "keine Belastung"),
            ("0_desc", "keine Belastung"),
            ("-1", "nicht belastet"),
        ]));

        assert_eq!(legend.describe("0"), Some("keine Belastung"));
        assert_eq!(legend.describe_level(SeverityLevel::MIN), Some("keine Belastung"));
    }

    #[test]
    fn test_code_keyed_entry_outside_scale() {
        let legend = Legend::from_raw(&raw(&[
            ("0", "keine Belastung"),
            ("0_desc", "keine Belastung"),
            ("4", "extreme Belastung"),
            ("4_desc", "extreme Belastung"),
        ]));

        assert_eq!(legend.describe("4"), Some("extreme Belastung"));
        assert_eq!(legend.describe("extreme Belastung"), None);
        assert_eq!(SeverityLevel::from_code("4"), None);
    }

    #[test]
    fn test_indexed_key_detection() {
        assert!(is_indexed_key("id1"));
        assert!(is_indexed_key("id12"));
        assert!(!is_indexed_key("id"));
        assert!(!is_indexed_key("idx"));
        assert!(!is_indexed_key("4"));
    }

    #[test]
    fn test_no_data_code_is_forced() {
        let legend = Legend::from_raw(&BTreeMap::new());
        assert!(!legend.is_empty());
        assert_eq!(legend.describe(NO_DATA_CODE), Some(NO_DATA_DESCRIPTION));

        let legend = Legend::from_raw(&raw(&[("-1", "x"), ("-1_desc", "nicht belastet")]));
        assert_eq!(legend.describe(NO_DATA_CODE), Some(NO_DATA_DESCRIPTION));
    }

    #[test]
    fn test_missing_description_is_skipped() {
        let legend = Legend::from_raw(&raw(&[("id3", "1")]));
        assert_eq!(legend.describe("1"), None);
        assert_eq!(legend.describe_level(SeverityLevel::new(2).unwrap()), None);
    }
}
