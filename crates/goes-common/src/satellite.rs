//! GOES satellite identities and the registry that resolves short keys.

use serde::{Deserialize, Serialize};

use crate::error::{GoesError, GoesResult};

/// Default satellite key when none is requested.
pub const DEFAULT_SATELLITE: &str = "goes-west";

/// Configuration for one GOES satellite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
    /// Canonical platform name, e.g. "GOES-18"
    pub name: String,
    /// Public NOAA bucket holding the archive
    pub bucket: String,
    /// Sub-satellite longitude in degrees (negative = West)
    pub longitude: f64,
    pub description: String,
}

/// A registry entry: short key plus satellite record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteEntry {
    pub key: String,
    #[serde(flatten)]
    pub satellite: Satellite,
}

/// Immutable mapping from short keys (aliases included) to satellites.
///
/// Keys keep their declaration order so that error messages and help
/// output list them the way the table was written.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteRegistry {
    entries: Vec<SatelliteEntry>,
}

impl SatelliteRegistry {
    /// Build a registry from explicit entries. Keys must be unique and the
    /// table non-empty.
    pub fn from_entries(entries: Vec<SatelliteEntry>) -> GoesResult<Self> {
        if entries.is_empty() {
            return Err(GoesError::InvalidConfig("satellite table is empty".to_string()));
        }
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.key == entry.key) {
                return Err(GoesError::InvalidConfig(format!(
                    "duplicate satellite key '{}'",
                    entry.key
                )));
            }
        }
        Ok(Self { entries })
    }

    /// The built-in table of operational and historical GOES-R satellites.
    pub fn builtin() -> Self {
        let entry = |key: &str, name: &str, bucket: &str, longitude: f64, description: &str| {
            SatelliteEntry {
                key: key.to_string(),
                satellite: Satellite {
                    name: name.to_string(),
                    bucket: bucket.to_string(),
                    longitude,
                    description: description.to_string(),
                },
            }
        };

        Self {
            entries: vec![
                entry("goes-east", "GOES-19", "noaa-goes19", -75.2, "GOES-East (Atlantic, Americas East Coast)"),
                entry("goes-west", "GOES-18", "noaa-goes18", -137.2, "GOES-West (Pacific, Americas West Coast)"),
                entry("goes-16", "GOES-16", "noaa-goes16", -75.2, "GOES-16 (former GOES-East, standby)"),
                entry("goes-17", "GOES-17", "noaa-goes17", -137.2, "GOES-17 (former GOES-West, decommissioned)"),
                entry("goes-18", "GOES-18", "noaa-goes18", -137.2, "GOES-18 (alias for goes-west)"),
                entry("goes-19", "GOES-19", "noaa-goes19", -75.2, "GOES-19 (alias for goes-east)"),
            ],
        }
    }

    /// Parse a YAML list of entries.
    pub fn from_yaml_str(yaml: &str) -> GoesResult<Self> {
        let entries: Vec<SatelliteEntry> = serde_yaml::from_str(yaml)?;
        Self::from_entries(entries)
    }

    /// Resolve a key, failing with the list of valid keys.
    pub fn get(&self, key: &str) -> GoesResult<&Satellite> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.satellite)
            .ok_or_else(|| GoesError::UnknownSatellite {
                key: key.to_string(),
                valid: self.keys().map(str::to_string).collect(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// All keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn entries(&self) -> &[SatelliteEntry] {
        &self.entries
    }
}

impl Default for SatelliteRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_all_keys() {
        let registry = SatelliteRegistry::builtin();
        let keys: Vec<String> = registry.keys().map(str::to_string).collect();
        assert_eq!(keys.len(), 6);
        for key in &keys {
            assert!(registry.get(key).is_ok(), "lookup failed for {}", key);
        }
    }

    #[test]
    fn test_aliases_share_buckets() {
        let registry = SatelliteRegistry::builtin();
        assert_eq!(
            registry.get("goes-west").unwrap().bucket,
            registry.get("goes-18").unwrap().bucket
        );
        assert_eq!(
            registry.get("goes-east").unwrap().bucket,
            registry.get("goes-19").unwrap().bucket
        );
        assert_eq!(registry.get("goes-east").unwrap().name, "GOES-19");
    }

    #[test]
    fn test_unknown_key_lists_exactly_table_keys() {
        let registry = SatelliteRegistry::builtin();
        match registry.get("meteosat") {
            Err(GoesError::UnknownSatellite { key, valid }) => {
                assert_eq!(key, "meteosat");
                assert_eq!(
                    valid,
                    vec!["goes-east", "goes-west", "goes-16", "goes-17", "goes-18", "goes-19"]
                );
            }
            other => panic!("expected UnknownSatellite, got {:?}", other),
        }
    }

    #[test]
    fn test_default_is_registered() {
        assert!(SatelliteRegistry::builtin().contains(DEFAULT_SATELLITE));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
- key: test-sat
  name: GOES-TEST
  bucket: noaa-goes-test
  longitude: -100.0
  description: "Test satellite"
"#;
        let registry = SatelliteRegistry::from_yaml_str(yaml).unwrap();
        let sat = registry.get("test-sat").unwrap();
        assert_eq!(sat.bucket, "noaa-goes-test");
        assert_eq!(sat.longitude, -100.0);
        assert!(registry.get("goes-west").is_err());
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let builtin = SatelliteRegistry::builtin();
        let mut entries = builtin.entries().to_vec();
        entries.push(entries[0].clone());
        assert!(SatelliteRegistry::from_entries(entries).is_err());
        assert!(SatelliteRegistry::from_entries(Vec::new()).is_err());
    }
}
