// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! MAC mapping configuration files.
//!
//! ```yaml
//! settings:
//!   allow_multicast_hosts: false
//! mappings:
//!   - tenant: vtn1
//!     bridge: vbr1
//!     allowed: [ "ANY@10", "00:00:00:00:00:01@20" ]
//!     denied: [ "00:00:00:00:00:02@10" ]
//! ```

use crate::config::{MacMapConfigSnapshot, VtnMacMapConfig};
use crate::settings::MacMapSettings;
use identity::MacMapIdentifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;
use types::{MacVlan, VnodeName, VtnError, VtnResult};

/// The host lists of one MAC mapping in a configuration file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacMapFileEntry {
    pub tenant: VnodeName,
    pub bridge: VnodeName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<MacVlan>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub denied: Vec<MacVlan>,
}

impl MacMapFileEntry {
    #[must_use]
    pub fn identifier(&self) -> MacMapIdentifier {
        MacMapIdentifier::new(self.tenant.clone(), self.bridge.clone())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacMapConfigFile {
    #[serde(default)]
    pub settings: MacMapSettings,
    #[serde(default)]
    pub mappings: Vec<MacMapFileEntry>,
}

impl MacMapConfigFile {
    pub fn from_yaml(text: &str) -> VtnResult<Self> {
        serde_yaml_ng::from_str(text)
            .map_err(|e| VtnError::bad_argument(format!("Invalid MAC mapping configuration: {e}")))
    }

    pub fn to_yaml(&self) -> VtnResult<String> {
        serde_yaml_ng::to_string(self)
            .map_err(|e| VtnError::bad_argument(format!("Can't serialize MAC mapping configuration: {e}")))
    }

    /// Read a configuration file.
    pub fn load(path: &Path) -> VtnResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            VtnError::bad_argument(format!("Can't read {}: {e}", path.display()))
        })?;
        let file = Self::from_yaml(&text)?;
        info!(
            "Loaded {} MAC mappings from {}",
            file.mappings.len(),
            path.display()
        );
        Ok(file)
    }

    pub fn save(&self, path: &Path) -> VtnResult<()> {
        std::fs::write(path, self.to_yaml()?).map_err(|e| {
            VtnError::bad_argument(format!("Can't write {}: {e}", path.display()))
        })
    }

    /// The checked host lists of every mapping in the file.
    ///
    /// # Errors
    ///
    /// Fails with a bad argument error naming the mapping if a mapping appears twice or if its
    /// host lists are not consistent.
    pub fn configs(&self) -> VtnResult<BTreeMap<MacMapIdentifier, VtnMacMapConfig>> {
        let mut configs = BTreeMap::new();
        for entry in &self.mappings {
            let id = entry.identifier();
            let snapshot = MacMapConfigSnapshot {
                allowed: entry.allowed.clone(),
                denied: entry.denied.clone(),
            };
            let config = VtnMacMapConfig::from_snapshot(&snapshot, &self.settings)
                .map_err(|e| VtnError::bad_argument(format!("{id}: {e}")))?;
            if configs.insert(id.clone(), config).is_some() {
                return Err(VtnError::bad_argument(format!("{id}: configured more than once")));
            }
        }
        Ok(configs)
    }
}

#[cfg(test)]
mod test {
    use super::MacMapConfigFile;
    use crate::table::MacMapTable;
    use identity::MacMapIdentifier;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use tracing_test::traced_test;
    use types::{ErrorKind, MacVlan, VnodeName};

    const SAMPLE: &str = r#"
settings:
  allow_multicast_hosts: false
mappings:
  - tenant: vtn1
    bridge: vbr1
    allowed: [ "ANY@10", "00:00:00:00:00:01@20" ]
    denied: [ "00:00:00:00:00:02@10" ]
  - tenant: vtn1
    bridge: vbr2
    allowed: [ "00:00:00:00:00:03@0" ]
"#;

    fn mapping(bridge: &str) -> MacMapIdentifier {
        MacMapIdentifier::new(VnodeName::new("vtn1").unwrap(), VnodeName::new(bridge).unwrap())
    }

    #[test]
    fn parse_sample() {
        let file = MacMapConfigFile::from_yaml(SAMPLE).unwrap();
        assert_eq!(file.mappings.len(), 2);
        assert!(file.settings.persist_status);
        let configs = file.configs().unwrap();
        let vbr1 = &configs[&mapping("vbr1")];
        assert!(vbr1.is_allowed(MacVlan::from_str("00:00:00:00:00:05@10").unwrap()));
        assert!(!vbr1.is_allowed(MacVlan::from_str("00:00:00:00:00:02@10").unwrap()));

        let back = MacMapConfigFile::from_yaml(&file.to_yaml().unwrap()).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn rejected_files() {
        let err = MacMapConfigFile::from_yaml("mappings: [ { tenant: vtn1 } ]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument);
        let err = MacMapConfigFile::from_yaml("unknown: 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument);

        let twice = r#"
mappings:
  - { tenant: vtn1, bridge: vbr1, allowed: [ "ANY@1" ] }
  - { tenant: vtn1, bridge: vbr1, allowed: [ "ANY@2" ] }
"#;
        let err = MacMapConfigFile::from_yaml(twice).unwrap().configs().unwrap_err();
        assert!(err.to_string().contains("MACMAP:vtn1/vbr1"));

        let corrupt = r#"
mappings:
  - tenant: vtn1
    bridge: vbr1
    allowed: [ "00:00:00:00:00:01@1", "00:00:00:00:00:01@2" ]
"#;
        let err = MacMapConfigFile::from_yaml(corrupt).unwrap().configs().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument);
        assert!(err.to_string().contains("MACMAP:vtn1/vbr1"));
    }

    #[test]
    #[traced_test]
    fn load_and_save() {
        let path = std::env::temp_dir().join(format!("vtn-macmap-{}.yaml", std::process::id()));
        let file = MacMapConfigFile::from_yaml(SAMPLE).unwrap();
        file.save(&path).unwrap();
        let loaded = MacMapConfigFile::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, file);

        let table = MacMapTable::from_file(&loaded).unwrap();
        assert_eq!(table.mappings().count(), 2);
        assert!(table.config(&mapping("vbr2")).is_some());
    }
}
