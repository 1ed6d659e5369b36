// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Tunables of MAC mapping.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use types::{MacVlan, VtnError, VtnResult};

fn enabled() -> bool {
    true
}

/// How MAC mappings behave
#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacMapSettings {
    /// Accept multicast and broadcast MAC addresses in host lists
    #[builder(default = false)]
    #[serde(default)]
    pub allow_multicast_hosts: bool,
    /// Write the hosts currently mapped to the store on submit
    #[builder(default = true)]
    #[serde(default = "enabled")]
    pub persist_status: bool,
}

impl Default for MacMapSettings {
    fn default() -> Self {
        Self {
            allow_multicast_hosts: false,
            persist_status: true,
        }
    }
}

impl MacMapSettings {
    /// Fail if `host` can not appear in the host lists of a mapping.
    pub fn check_host(&self, host: MacVlan) -> VtnResult<()> {
        match host.mac() {
            Some(mac) if mac.is_multicast() && !self.allow_multicast_hosts => Err(
                VtnError::bad_argument(format!("{host}: multicast address not allowed")),
            ),
            _ => Ok(()),
        }
    }
}
