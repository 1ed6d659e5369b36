// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Values MAC mappings keep in the store.

use crate::config::MacMapConfigSnapshot;
use crate::status::MacMapStatusSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MacMapData {
    Config(MacMapConfigSnapshot),
    Status(MacMapStatusSnapshot),
}

impl From<MacMapConfigSnapshot> for MacMapData {
    fn from(value: MacMapConfigSnapshot) -> Self {
        MacMapData::Config(value)
    }
}

impl From<MacMapStatusSnapshot> for MacMapData {
    fn from(value: MacMapStatusSnapshot) -> Self {
        MacMapData::Status(value)
    }
}
