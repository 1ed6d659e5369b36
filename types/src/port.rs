// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Physical switches and switch ports, as known to the controller.

use crate::vlan::{InvalidVid, VlanId};
use std::fmt::Display;
use std::str::FromStr;

/// Prefix of the inventory identifiers of openflow switches.
pub const OPENFLOW_PREFIX: &str = "openflow";

/// Errors parsing switch and port identifiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortParseError {
    #[error("Invalid switch identifier: '{0}'")]
    Node(String),
    #[error("Invalid switch port identifier: '{0}'")]
    Port(String),
    #[error("Invalid port/vlan '{0}'")]
    PortVlan(String),
    #[error(transparent)]
    Vlan(#[from] InvalidVid),
}

/// A physical switch, identified by its datapath id.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct SalNode(u64);

impl SalNode {
    #[must_use]
    pub const fn new(dpid: u64) -> Self {
        Self(dpid)
    }
    #[must_use]
    pub const fn dpid(&self) -> u64 {
        self.0
    }
}

impl Display for SalNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{OPENFLOW_PREFIX}:{}", self.0)
    }
}

impl FromStr for SalNode {
    type Err = PortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(OPENFLOW_PREFIX)
            .and_then(|rest| rest.strip_prefix(':'))
            .and_then(|dpid| dpid.parse().ok())
            .map(SalNode)
            .ok_or_else(|| PortParseError::Node(s.to_owned()))
    }
}

impl TryFrom<String> for SalNode {
    type Error = PortParseError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SalNode> for String {
    fn from(value: SalNode) -> Self {
        value.to_string()
    }
}

/// A port of a physical switch.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct SalPort {
    node: SalNode,
    port: u32,
}

impl SalPort {
    /// Port numbers are never zero.
    #[must_use]
    pub fn new(dpid: u64, port: u32) -> Option<Self> {
        (port != 0).then_some(Self {
            node: SalNode(dpid),
            port,
        })
    }
    #[must_use]
    pub const fn node(&self) -> SalNode {
        self.node
    }
    #[must_use]
    pub const fn port(&self) -> u32 {
        self.port
    }
}

impl Display for SalPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.node, self.port)
    }
}

impl FromStr for SalPort {
    type Err = PortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || PortParseError::Port(s.to_owned());
        let (node, port) = s.rsplit_once(':').ok_or_else(bad)?;
        let node: SalNode = node.parse().map_err(|_| bad())?;
        let port: u32 = port.parse().map_err(|_| bad())?;
        SalPort::new(node.dpid(), port).ok_or_else(bad)
    }
}

impl TryFrom<String> for SalPort {
    type Error = PortParseError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SalPort> for String {
    fn from(value: SalPort) -> Self {
        value.to_string()
    }
}

/// A VLAN on a switch port: the unit of network reserved by a virtual mapping.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct PortVlan {
    pub port: SalPort,
    pub vlan: VlanId,
}

impl PortVlan {
    #[must_use]
    pub const fn new(port: SalPort, vlan: VlanId) -> Self {
        Self { port, vlan }
    }
}

impl Display for PortVlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.port, self.vlan)
    }
}

impl FromStr for PortVlan {
    type Err = PortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (port, vlan) = s
            .split_once('@')
            .ok_or_else(|| PortParseError::PortVlan(s.to_owned()))?;
        Ok(PortVlan::new(port.parse()?, vlan.parse()?))
    }
}

#[cfg(test)]
mod test {
    use super::{PortVlan, SalNode, SalPort};
    use crate::VlanId;
    use pretty_assertions::assert_eq;

    #[test]
    fn port_text() {
        let port = SalPort::new(1, 2).unwrap();
        assert_eq!(port.to_string(), "openflow:1:2");
        assert_eq!("openflow:1:2".parse::<SalPort>(), Ok(port));
        assert_eq!(port.node(), SalNode::new(1));
        assert_eq!("openflow:18446744073709551615".parse::<SalNode>().map(|n| n.dpid()), Ok(u64::MAX));

        let pv = PortVlan::new(port, VlanId::new(10).unwrap());
        assert_eq!(pv.to_string(), "openflow:1:2@10");
        assert_eq!(pv.to_string().parse::<PortVlan>(), Ok(pv));
    }

    #[test]
    fn port_bad_text() {
        assert!(SalPort::new(1, 0).is_none());
        assert!("openflow:1:0".parse::<SalPort>().is_err());
        assert!("openflow:1".parse::<SalPort>().is_err());
        assert!("of:1:1".parse::<SalPort>().is_err());
        assert!("openflow:x".parse::<SalNode>().is_err());
        assert!("openflow:1:1@4095".parse::<PortVlan>().is_err());
    }

    #[test]
    fn port_order_groups_by_switch() {
        let p12 = SalPort::new(1, 2).unwrap();
        let p21 = SalPort::new(2, 1).unwrap();
        assert!(p12 < p21);
    }
}
