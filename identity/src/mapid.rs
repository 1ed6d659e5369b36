// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Identifiers of VLAN mappings within a bridge.

use std::fmt::Display;
use std::str::FromStr;
use types::port::PortParseError;
use types::vlan::InvalidVid;
use types::{SalNode, VlanId, VtnError};

/// Identifies a VLAN mapping in a bridge: the switch it applies to (or any switch) and the VLAN.
///
/// The string form is `<node>.<vlan>`, with `ANY` in place of the node when the mapping
/// applies to every switch, e.g. `openflow:1.10` or `ANY.0`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VlanMapId {
    node: Option<SalNode>,
    vlan: VlanId,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VlanMapIdError {
    #[error("'{0}': invalid VLAN mapping ID")]
    Syntax(String),
    #[error(transparent)]
    Node(#[from] PortParseError),
    #[error(transparent)]
    Vlan(#[from] InvalidVid),
}

impl VlanMapId {
    const ANY: &'static str = "ANY";

    #[must_use]
    pub const fn new(node: Option<SalNode>, vlan: VlanId) -> Self {
        Self { node, vlan }
    }
    #[must_use]
    pub const fn node(&self) -> Option<SalNode> {
        self.node
    }
    #[must_use]
    pub const fn vlan(&self) -> VlanId {
        self.vlan
    }
}

impl Display for VlanMapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node {
            Some(node) => write!(f, "{node}.{}", self.vlan),
            None => write!(f, "{}.{}", Self::ANY, self.vlan),
        }
    }
}

impl FromStr for VlanMapId {
    type Err = VlanMapIdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (node, vlan) = s
            .rsplit_once('.')
            .ok_or_else(|| VlanMapIdError::Syntax(s.to_owned()))?;
        let node = if node == Self::ANY {
            None
        } else {
            Some(SalNode::from_str(node)?)
        };
        Ok(Self::new(node, VlanId::from_str(vlan)?))
    }
}

impl From<VlanMapIdError> for VtnError {
    fn from(e: VlanMapIdError) -> Self {
        VtnError::BadArgument(e.to_string())
    }
}
