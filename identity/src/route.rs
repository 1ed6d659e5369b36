// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Flat records of virtual nodes, as found in the virtual routes of flow-path logs.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use types::MacVlan;

/// Extra data of a route through a VLAN mapping.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VlanMapInfo {
    pub map_id: String,
}

/// Extra data of a route through a MAC mapping.
///
/// `mapped_host` is the numeric encoding of the mapped host, or
/// [`MacVlan::UNDEFINED_ENCODING`] for the mapping itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MacMapInfo {
    pub mapped_host: i64,
}

/// A virtual node as a flat record of names.
///
/// Which identifier the record stands for is told by which fields are set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VirtualNodePath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_map: Option<VlanMapInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_map: Option<MacMapInfo>,
}

impl Display for VirtualNodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = [
            &self.tenant_name,
            &self.bridge_name,
            &self.router_name,
            &self.terminal_name,
            &self.interface_name,
        ];
        let mut first = true;
        for name in names.into_iter().flatten() {
            if !first {
                f.write_str("/")?;
            }
            f.write_str(name)?;
            first = false;
        }
        if let Some(vmap) = &self.vlan_map {
            write!(f, "/vlanmap={}", vmap.map_id)?;
        }
        if let Some(mmap) = &self.mac_map {
            match MacVlan::from_encoded(mmap.mapped_host) {
                Ok(host) => write!(f, "/macmap={host}")?,
                Err(_) => f.write_str("/macmap")?,
            }
        }
        Ok(())
    }
}

/// Why a packet went through a virtual node.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum VirtualRouteReason {
    PortMapped,
    VlanMapped,
    MacMapped,
    Forwarded,
    Redirected,
    Linked,
}

/// One hop of the path of a flow through the virtual network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VirtualRoute {
    pub order: u32,
    pub reason: VirtualRouteReason,
    pub path: VirtualNodePath,
}

impl Display for VirtualRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}({})", self.order, self.path, self.reason)
    }
}

/// Displays a list of routes as a single line, in order.
pub struct Routes<'a>(pub &'a [VirtualRoute]);

impl Display for Routes<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<empty>");
        }
        for (n, route) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{route}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{MacMapInfo, Routes, VirtualNodePath, VirtualRoute, VirtualRouteReason};
    use std::str::FromStr;
    use types::MacVlan;

    fn bridge() -> VirtualNodePath {
        VirtualNodePath {
            tenant_name: Some("vtn1".to_owned()),
            bridge_name: Some("vbr1".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn route_display() {
        let mut host = bridge();
        host.mac_map = Some(MacMapInfo {
            mapped_host: MacVlan::from_str("00:00:00:00:00:01@10").unwrap().encoded(),
        });
        let mut mapping = bridge();
        mapping.mac_map = Some(MacMapInfo {
            mapped_host: MacVlan::UNDEFINED_ENCODING,
        });
        let routes = [
            VirtualRoute {
                order: 0,
                reason: VirtualRouteReason::MacMapped,
                path: host,
            },
            VirtualRoute {
                order: 1,
                reason: VirtualRouteReason::Forwarded,
                path: mapping,
            },
        ];
        assert_eq!(
            Routes(&routes).to_string(),
            "0:vtn1/vbr1/macmap=00:00:00:00:00:01@10(MACMAPPED) -> 1:vtn1/vbr1/macmap(FORWARDED)"
        );
        assert_eq!(Routes(&[]).to_string(), "<empty>");
    }

    #[test]
    fn reasons() {
        assert_eq!(VirtualRouteReason::PortMapped.to_string(), "PORTMAPPED");
        assert_eq!(
            VirtualRouteReason::from_str("LINKED"),
            Ok(VirtualRouteReason::Linked)
        );
    }
}
