// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The kinds of virtual nodes and how they nest.

use types::{VtnError, VtnResult};

/// The kind of a virtual node or virtual mapping.
///
/// The string form (`VTN`, `VBRIDGE`, ...) is the type tag of canonical identifier strings.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum VNodeType {
    #[strum(serialize = "VTN")]
    Vtn,
    #[strum(serialize = "VBRIDGE")]
    VBridge,
    #[strum(serialize = "VTERMINAL")]
    VTerminal,
    #[strum(serialize = "VBRIDGE_IF")]
    VBridgeIf,
    #[strum(serialize = "VTERMINAL_IF")]
    VTerminalIf,
    #[strum(serialize = "VLANMAP")]
    VlanMap,
    #[strum(serialize = "MACMAP")]
    MacMap,
    #[strum(serialize = "MACMAP_HOST")]
    MacMapHost,
}

impl VNodeType {
    /// Human readable description, as used in messages.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            VNodeType::Vtn => "VTN",
            VNodeType::VBridge => "vBridge",
            VNodeType::VTerminal => "vTerminal",
            VNodeType::VBridgeIf => "vBridge-IF",
            VNodeType::VTerminalIf => "vTerminal-IF",
            VNodeType::VlanMap => "VLAN mapping",
            VNodeType::MacMap => "MAC mapping",
            VNodeType::MacMapHost => "MAC mapped host",
        }
    }

    /// Number of components in identifiers of this type.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            VNodeType::Vtn => 1,
            VNodeType::VBridge | VNodeType::VTerminal | VNodeType::MacMap => 2,
            VNodeType::VBridgeIf
            | VNodeType::VTerminalIf
            | VNodeType::VlanMap
            | VNodeType::MacMapHost => 3,
        }
    }

    /// The type directly above this one, if any.
    #[must_use]
    pub const fn parent(self) -> Option<VNodeType> {
        match self {
            VNodeType::Vtn => None,
            VNodeType::VBridge | VNodeType::VTerminal => Some(VNodeType::Vtn),
            VNodeType::VBridgeIf | VNodeType::VlanMap | VNodeType::MacMap => {
                Some(VNodeType::VBridge)
            }
            VNodeType::VTerminalIf => Some(VNodeType::VTerminal),
            VNodeType::MacMapHost => Some(VNodeType::MacMap),
        }
    }

    /// Tell if nodes of type `other` may be nested under (or be) a node of this type.
    #[must_use]
    pub fn contains_type(self, other: VNodeType) -> bool {
        let mut current = Some(other);
        while let Some(t) = current {
            if t == self {
                return true;
            }
            current = t.parent();
        }
        false
    }

    /// Tell if flow filters can be attached to nodes of this type.
    #[must_use]
    pub const fn supports_flow_filter(self) -> bool {
        matches!(
            self,
            VNodeType::Vtn | VNodeType::VBridge | VNodeType::VBridgeIf | VNodeType::VTerminalIf
        )
    }

    /// Fail unless flow filters can be attached to nodes of this type.
    pub fn check_flow_filter(self) -> VtnResult<()> {
        if self.supports_flow_filter() {
            Ok(())
        } else {
            Err(VtnError::bad_argument(format!(
                "{} does not support flow filter",
                self.description()
            )))
        }
    }
}

#[cfg(test)]
mod test {
    use super::VNodeType;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn tags_roundtrip() {
        for t in VNodeType::iter() {
            assert_eq!(VNodeType::from_str(&t.to_string()), Ok(t));
        }
        assert_eq!(VNodeType::VBridgeIf.to_string(), "VBRIDGE_IF");
        assert!(VNodeType::from_str("VROUTER").is_err());
    }

    #[test]
    fn lattice() {
        use VNodeType::*;
        for t in VNodeType::iter() {
            assert!(t.contains_type(t));
            assert!(Vtn.contains_type(t));
        }
        assert!(VBridge.contains_type(MacMapHost));
        assert!(VBridge.contains_type(VlanMap));
        assert!(!VBridge.contains_type(VTerminalIf));
        assert!(!VTerminal.contains_type(MacMap));
        assert!(MacMap.contains_type(MacMapHost));
        assert!(!VlanMap.contains_type(MacMapHost));
        assert!(!MacMapHost.contains_type(MacMap));
        assert!(!VBridgeIf.contains_type(VBridge));
    }

    #[test]
    fn arity_follows_depth() {
        for t in VNodeType::iter() {
            let depth = std::iter::successors(Some(t), |t| t.parent()).count();
            assert_eq!(t.arity(), depth);
        }
    }

    #[test]
    fn flow_filters() {
        assert!(VNodeType::VBridgeIf.check_flow_filter().is_ok());
        assert!(VNodeType::MacMap.check_flow_filter().is_err());
        assert!(VNodeType::VTerminal.check_flow_filter().is_err());
    }
}
