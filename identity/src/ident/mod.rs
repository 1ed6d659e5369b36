// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Identifiers of virtual nodes and virtual mappings.
//!
//! Every concrete identifier type is a thin typed wrapper over the names it needs. The
//! [`VNodeIdentifier`] sum type closes over all of them; the operations that depend on the
//! kind of node (store paths, containment, route conversion) dispatch on its variant.

/// Implement the traits common to every concrete identifier type.
macro_rules! identifier {
    ($ty:ident, $variant:ident) => {
        impl $ty {
            pub const TYPE: $crate::vnode::VNodeType = $crate::vnode::VNodeType::$variant;
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let text = self
                    .name
                    .text
                    .get_or_init(|| $crate::ident::pathname::render(Self::TYPE, &self.components()));
                f.write_str(text)
            }
        }

        impl From<$ty> for $crate::ident::VNodeIdentifier {
            fn from(id: $ty) -> Self {
                $crate::ident::VNodeIdentifier::$variant(id)
            }
        }

        impl TryFrom<$crate::ident::VNodeIdentifier> for $ty {
            type Error = types::VtnError;
            fn try_from(id: $crate::ident::VNodeIdentifier) -> Result<Self, Self::Error> {
                match id {
                    $crate::ident::VNodeIdentifier::$variant(id) => Ok(id),
                    other => Err(types::VtnError::bad_argument(format!(
                        "{other}: not a {} identifier",
                        Self::TYPE.description()
                    ))),
                }
            }
        }
    };
}

#[cfg(any(test, feature = "bolero"))]
mod contract;
mod mapping;
mod node;
pub(crate) mod pathname;

pub use mapping::{MacMapHostIdentifier, MacMapIdentifier, VlanMapIdentifier}; // re-export
pub use node::{
    VBridgeIdentifier, VBridgeIfIdentifier, VTenantIdentifier, VTerminalIdentifier,
    VTerminalIfIdentifier,
}; // re-export
pub use pathname::NULL_COMPONENT; // re-export

use crate::mapid::VlanMapId;
use crate::route::{VirtualNodePath, VirtualRoute, VirtualRouteReason};
use crate::store::ReadTransaction;
use crate::storepath::StorePath;
use crate::vnode::VNodeType;
use std::fmt::Display;
use std::str::FromStr;
use types::{MacVlan, VnodeName, VtnError, VtnResult};

/// The identifier of any virtual node or virtual mapping.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VNodeIdentifier {
    Vtn(VTenantIdentifier),
    VBridge(VBridgeIdentifier),
    VTerminal(VTerminalIdentifier),
    VBridgeIf(VBridgeIfIdentifier),
    VTerminalIf(VTerminalIfIdentifier),
    VlanMap(VlanMapIdentifier),
    MacMap(MacMapIdentifier),
    MacMapHost(MacMapHostIdentifier),
}

impl VNodeIdentifier {
    #[must_use]
    pub fn node_type(&self) -> VNodeType {
        match self {
            VNodeIdentifier::Vtn(_) => VNodeType::Vtn,
            VNodeIdentifier::VBridge(_) => VNodeType::VBridge,
            VNodeIdentifier::VTerminal(_) => VNodeType::VTerminal,
            VNodeIdentifier::VBridgeIf(_) => VNodeType::VBridgeIf,
            VNodeIdentifier::VTerminalIf(_) => VNodeType::VTerminalIf,
            VNodeIdentifier::VlanMap(_) => VNodeType::VlanMap,
            VNodeIdentifier::MacMap(_) => VNodeType::MacMap,
            VNodeIdentifier::MacMapHost(_) => VNodeType::MacMapHost,
        }
    }

    /// The components of the canonical string, in order. `None` is a missing name.
    #[must_use]
    pub fn components(&self) -> Vec<Option<String>> {
        match self {
            VNodeIdentifier::Vtn(id) => id.components(),
            VNodeIdentifier::VBridge(id) => id.components(),
            VNodeIdentifier::VTerminal(id) => id.components(),
            VNodeIdentifier::VBridgeIf(id) => id.components(),
            VNodeIdentifier::VTerminalIf(id) => id.components(),
            VNodeIdentifier::VlanMap(id) => id.components(),
            VNodeIdentifier::MacMap(id) => id.components(),
            VNodeIdentifier::MacMapHost(id) => id.components(),
        }
    }

    #[must_use]
    pub fn tenant_name(&self) -> Option<&VnodeName> {
        match self {
            VNodeIdentifier::Vtn(id) => id.tenant_name(),
            VNodeIdentifier::VBridge(id) => id.tenant_name(),
            VNodeIdentifier::VTerminal(id) => id.tenant_name(),
            VNodeIdentifier::VBridgeIf(id) => id.tenant_name(),
            VNodeIdentifier::VTerminalIf(id) => id.tenant_name(),
            VNodeIdentifier::VlanMap(id) => id.tenant_name(),
            VNodeIdentifier::MacMap(id) => id.tenant_name(),
            VNodeIdentifier::MacMapHost(id) => id.tenant_name(),
        }
    }

    /// The path of this node in the store.
    #[must_use]
    pub fn store_path(&self) -> &StorePath {
        match self {
            VNodeIdentifier::Vtn(id) => id.store_path(),
            VNodeIdentifier::VBridge(id) => id.store_path(),
            VNodeIdentifier::VTerminal(id) => id.store_path(),
            VNodeIdentifier::VBridgeIf(id) => id.store_path(),
            VNodeIdentifier::VTerminalIf(id) => id.store_path(),
            VNodeIdentifier::VlanMap(id) => id.store_path(),
            VNodeIdentifier::MacMap(id) => id.store_path(),
            VNodeIdentifier::MacMapHost(id) => id.store_path(),
        }
    }

    /// Convert to a flat virtual node record.
    #[must_use]
    pub fn to_node_path(&self) -> VirtualNodePath {
        match self {
            VNodeIdentifier::Vtn(id) => id.to_node_path(),
            VNodeIdentifier::VBridge(id) => id.to_node_path(),
            VNodeIdentifier::VTerminal(id) => id.to_node_path(),
            VNodeIdentifier::VBridgeIf(id) => id.to_node_path(),
            VNodeIdentifier::VTerminalIf(id) => id.to_node_path(),
            VNodeIdentifier::VlanMap(id) => id.to_node_path(),
            VNodeIdentifier::MacMap(id) => id.to_node_path(),
            VNodeIdentifier::MacMapHost(id) => id.to_node_path(),
        }
    }

    /// Build the route hop for a flow going through this node.
    #[must_use]
    pub fn virtual_route(&self, reason: VirtualRouteReason, order: u32) -> VirtualRoute {
        VirtualRoute {
            order,
            reason,
            path: self.to_node_path(),
        }
    }

    /// Rebuild an identifier from a flat virtual node record.
    ///
    /// The kind of node is told by which fields are set: a bridge name with an interface
    /// name is a vBridge interface, with VLAN mapping data a VLAN mapping, with MAC mapping
    /// data the MAC mapping or one of its hosts; a terminal name is a vTerminal or one of
    /// its interfaces; a lone tenant name is a VTN.
    pub fn from_node_path(path: &VirtualNodePath) -> VtnResult<Self> {
        let name = |n: &Option<String>| -> VtnResult<Option<VnodeName>> {
            pathname::raw_name(n.as_deref())
        };
        let Some(tenant) = name(&path.tenant_name)? else {
            return Err(VtnError::null_argument("Tenant name"));
        };

        if let Some(bridge) = name(&path.bridge_name)? {
            if let Some(interface) = name(&path.interface_name)? {
                return Ok(VBridgeIfIdentifier::new(tenant, bridge, interface).into());
            }
            if let Some(vmap) = &path.vlan_map {
                let map_id = VlanMapId::from_str(&vmap.map_id)?;
                return Ok(VlanMapIdentifier::new(tenant, bridge, map_id).into());
            }
            if let Some(mmap) = &path.mac_map {
                if mmap.mapped_host == MacVlan::UNDEFINED_ENCODING {
                    return Ok(MacMapIdentifier::new(tenant, bridge).into());
                }
                let host = MacVlan::from_encoded(mmap.mapped_host)?;
                return Ok(MacMapHostIdentifier::new(tenant, bridge, host).into());
            }
            return Ok(VBridgeIdentifier::new(tenant, bridge).into());
        }

        if let Some(terminal) = name(&path.terminal_name)? {
            if let Some(interface) = name(&path.interface_name)? {
                return Ok(VTerminalIfIdentifier::new(tenant, terminal, interface).into());
            }
            return Ok(VTerminalIdentifier::new(tenant, terminal).into());
        }

        Ok(VTenantIdentifier::new(tenant).into())
    }

    /// Tell if `other` is this node or one of its descendants.
    #[must_use]
    pub fn contains(&self, other: &VNodeIdentifier) -> bool {
        if !self.node_type().contains_type(other.node_type()) {
            return false;
        }
        other.components().starts_with(&self.components())
    }

    /// Tell if the store node at `path` is this node or lies under it.
    #[must_use]
    pub fn contains_path(&self, path: &StorePath) -> bool {
        path.starts_with(self.store_path())
    }

    /// Tell if the node described by a flat record is this node or one of its descendants.
    ///
    /// A record that does not describe a valid node is contained by nothing.
    #[must_use]
    pub fn contains_route(&self, path: &VirtualNodePath) -> bool {
        Self::from_node_path(path).is_ok_and(|other| self.contains(&other))
    }

    /// Fail unless flow filters can be attached to this node.
    pub fn check_flow_filter(&self) -> VtnResult<()> {
        self.node_type().check_flow_filter()
    }

    /// Tell if this node is present in the store.
    pub fn exists<T: ReadTransaction + ?Sized>(&self, tx: &T) -> VtnResult<bool> {
        tx.exists(self.store_path())
    }

    /// Fail with `NotFound` unless this node is present in the store.
    pub fn check_exists<T: ReadTransaction + ?Sized>(&self, tx: &T) -> VtnResult<()> {
        if self.exists(tx)? {
            Ok(())
        } else {
            Err(VtnError::not_found(
                self.node_type().description(),
                self.path_text(),
            ))
        }
    }

    /// The names of this node joined with `/`, as shown in messages.
    #[must_use]
    pub fn path_text(&self) -> String {
        self.components()
            .into_iter()
            .map(|c| c.unwrap_or_else(|| NULL_COMPONENT.to_owned()))
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl Display for VNodeIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VNodeIdentifier::Vtn(id) => id.fmt(f),
            VNodeIdentifier::VBridge(id) => id.fmt(f),
            VNodeIdentifier::VTerminal(id) => id.fmt(f),
            VNodeIdentifier::VBridgeIf(id) => id.fmt(f),
            VNodeIdentifier::VTerminalIf(id) => id.fmt(f),
            VNodeIdentifier::VlanMap(id) => id.fmt(f),
            VNodeIdentifier::MacMap(id) => id.fmt(f),
            VNodeIdentifier::MacMapHost(id) => id.fmt(f),
        }
    }
}
