// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Identifiers of virtual nodes: tenants, bridges, terminals and their interfaces.

use super::pathname::{NameChecker, PathName, component, raw_name};
use crate::route::VirtualNodePath;
use crate::storepath::{PathSegment, StorePath};
use crate::vnode::VNodeType;
use types::{VnodeName, VtnResult};

/// Identifies a virtual tenant (VTN).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VTenantIdentifier {
    name: PathName,
}
identifier!(VTenantIdentifier, Vtn);

impl VTenantIdentifier {
    #[must_use]
    pub fn new(tenant: VnodeName) -> Self {
        Self {
            name: PathName::new(Some(tenant), None, None),
        }
    }

    /// Build from raw names. With `find`, illegal names are reported as not found.
    pub fn create(tenant: Option<&str>, find: bool) -> VtnResult<Self> {
        let mut names = NameChecker::new(find);
        Ok(Self::new(names.check(VNodeType::Vtn, tenant)?))
    }

    pub(crate) fn from_raw(tenant: Option<&str>) -> VtnResult<Self> {
        Ok(Self {
            name: PathName::new(raw_name(tenant)?, None, None),
        })
    }

    #[must_use]
    pub fn tenant_name(&self) -> Option<&VnodeName> {
        self.name.tenant.as_ref()
    }

    #[must_use]
    pub fn store_path(&self) -> &StorePath {
        self.name.path.get_or_init(|| self.name.tenant_path())
    }

    #[must_use]
    pub fn components(&self) -> Vec<Option<String>> {
        vec![component(self.name.tenant.as_ref())]
    }

    #[must_use]
    pub fn to_node_path(&self) -> VirtualNodePath {
        VirtualNodePath {
            tenant_name: component(self.name.tenant.as_ref()),
            ..Default::default()
        }
    }
}

/// Identifies a vBridge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VBridgeIdentifier {
    name: PathName,
}
identifier!(VBridgeIdentifier, VBridge);

impl VBridgeIdentifier {
    #[must_use]
    pub fn new(tenant: VnodeName, bridge: VnodeName) -> Self {
        Self {
            name: PathName::new(Some(tenant), Some(bridge), None),
        }
    }

    /// Build from raw names. With `find`, illegal names are reported as not found.
    pub fn create(tenant: Option<&str>, bridge: Option<&str>, find: bool) -> VtnResult<Self> {
        let mut names = NameChecker::new(find);
        let tenant = names.check(VNodeType::Vtn, tenant)?;
        Ok(Self::new(tenant, names.check(VNodeType::VBridge, bridge)?))
    }

    pub(crate) fn from_raw(tenant: Option<&str>, bridge: Option<&str>) -> VtnResult<Self> {
        Ok(Self::from_names(raw_name(tenant)?, raw_name(bridge)?))
    }

    pub(crate) fn from_names(tenant: Option<VnodeName>, bridge: Option<VnodeName>) -> Self {
        Self {
            name: PathName::new(tenant, bridge, None),
        }
    }

    #[must_use]
    pub fn tenant_name(&self) -> Option<&VnodeName> {
        self.name.tenant.as_ref()
    }

    #[must_use]
    pub fn bridge_name(&self) -> Option<&VnodeName> {
        self.name.bridge.as_ref()
    }

    /// The identifier of the VTN holding this bridge.
    #[must_use]
    pub fn tenant(&self) -> VTenantIdentifier {
        VTenantIdentifier {
            name: PathName::new(self.name.tenant.clone(), None, None),
        }
    }

    #[must_use]
    pub fn store_path(&self) -> &StorePath {
        self.name.path.get_or_init(|| self.name.bridge_path())
    }

    #[must_use]
    pub fn components(&self) -> Vec<Option<String>> {
        vec![
            component(self.name.tenant.as_ref()),
            component(self.name.bridge.as_ref()),
        ]
    }

    #[must_use]
    pub fn to_node_path(&self) -> VirtualNodePath {
        VirtualNodePath {
            tenant_name: component(self.name.tenant.as_ref()),
            bridge_name: component(self.name.bridge.as_ref()),
            ..Default::default()
        }
    }
}

/// Identifies a vTerminal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VTerminalIdentifier {
    name: PathName,
}
identifier!(VTerminalIdentifier, VTerminal);

impl VTerminalIdentifier {
    #[must_use]
    pub fn new(tenant: VnodeName, terminal: VnodeName) -> Self {
        Self {
            name: PathName::new(Some(tenant), Some(terminal), None),
        }
    }

    /// Build from raw names. With `find`, illegal names are reported as not found.
    pub fn create(tenant: Option<&str>, terminal: Option<&str>, find: bool) -> VtnResult<Self> {
        let mut names = NameChecker::new(find);
        let tenant = names.check(VNodeType::Vtn, tenant)?;
        Ok(Self::new(tenant, names.check(VNodeType::VTerminal, terminal)?))
    }

    pub(crate) fn from_raw(tenant: Option<&str>, terminal: Option<&str>) -> VtnResult<Self> {
        Ok(Self {
            name: PathName::new(raw_name(tenant)?, raw_name(terminal)?, None),
        })
    }

    #[must_use]
    pub fn tenant_name(&self) -> Option<&VnodeName> {
        self.name.tenant.as_ref()
    }

    #[must_use]
    pub fn terminal_name(&self) -> Option<&VnodeName> {
        self.name.bridge.as_ref()
    }

    #[must_use]
    pub fn store_path(&self) -> &StorePath {
        self.name.path.get_or_init(|| self.name.terminal_path())
    }

    #[must_use]
    pub fn components(&self) -> Vec<Option<String>> {
        vec![
            component(self.name.tenant.as_ref()),
            component(self.name.bridge.as_ref()),
        ]
    }

    #[must_use]
    pub fn to_node_path(&self) -> VirtualNodePath {
        VirtualNodePath {
            tenant_name: component(self.name.tenant.as_ref()),
            terminal_name: component(self.name.bridge.as_ref()),
            ..Default::default()
        }
    }
}

/// Identifies an interface of a vBridge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VBridgeIfIdentifier {
    name: PathName,
}
identifier!(VBridgeIfIdentifier, VBridgeIf);

impl VBridgeIfIdentifier {
    #[must_use]
    pub fn new(tenant: VnodeName, bridge: VnodeName, interface: VnodeName) -> Self {
        Self {
            name: PathName::new(Some(tenant), Some(bridge), Some(interface)),
        }
    }

    /// Build from raw names. With `find`, illegal names are reported as not found.
    pub fn create(
        tenant: Option<&str>,
        bridge: Option<&str>,
        interface: Option<&str>,
        find: bool,
    ) -> VtnResult<Self> {
        let mut names = NameChecker::new(find);
        let tenant = names.check(VNodeType::Vtn, tenant)?;
        let bridge = names.check(VNodeType::VBridge, bridge)?;
        Ok(Self::new(
            tenant,
            bridge,
            names.check(VNodeType::VBridgeIf, interface)?,
        ))
    }

    pub(crate) fn from_raw(
        tenant: Option<&str>,
        bridge: Option<&str>,
        interface: Option<&str>,
    ) -> VtnResult<Self> {
        Ok(Self {
            name: PathName::new(raw_name(tenant)?, raw_name(bridge)?, raw_name(interface)?),
        })
    }

    #[must_use]
    pub fn tenant_name(&self) -> Option<&VnodeName> {
        self.name.tenant.as_ref()
    }

    #[must_use]
    pub fn bridge_name(&self) -> Option<&VnodeName> {
        self.name.bridge.as_ref()
    }

    #[must_use]
    pub fn interface_name(&self) -> Option<&VnodeName> {
        self.name.interface.as_ref()
    }

    /// The identifier of the bridge holding this interface.
    #[must_use]
    pub fn bridge(&self) -> VBridgeIdentifier {
        VBridgeIdentifier::from_names(self.name.tenant.clone(), self.name.bridge.clone())
    }

    #[must_use]
    pub fn store_path(&self) -> &StorePath {
        self.name.path.get_or_init(|| {
            self.name
                .bridge_path()
                .child(PathSegment::Vinterface(self.name.interface.clone()))
        })
    }

    #[must_use]
    pub fn components(&self) -> Vec<Option<String>> {
        vec![
            component(self.name.tenant.as_ref()),
            component(self.name.bridge.as_ref()),
            component(self.name.interface.as_ref()),
        ]
    }

    #[must_use]
    pub fn to_node_path(&self) -> VirtualNodePath {
        VirtualNodePath {
            tenant_name: component(self.name.tenant.as_ref()),
            bridge_name: component(self.name.bridge.as_ref()),
            interface_name: component(self.name.interface.as_ref()),
            ..Default::default()
        }
    }
}

/// Identifies an interface of a vTerminal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VTerminalIfIdentifier {
    name: PathName,
}
identifier!(VTerminalIfIdentifier, VTerminalIf);

impl VTerminalIfIdentifier {
    #[must_use]
    pub fn new(tenant: VnodeName, terminal: VnodeName, interface: VnodeName) -> Self {
        Self {
            name: PathName::new(Some(tenant), Some(terminal), Some(interface)),
        }
    }

    /// Build from raw names. With `find`, illegal names are reported as not found.
    pub fn create(
        tenant: Option<&str>,
        terminal: Option<&str>,
        interface: Option<&str>,
        find: bool,
    ) -> VtnResult<Self> {
        let mut names = NameChecker::new(find);
        let tenant = names.check(VNodeType::Vtn, tenant)?;
        let terminal = names.check(VNodeType::VTerminal, terminal)?;
        Ok(Self::new(
            tenant,
            terminal,
            names.check(VNodeType::VTerminalIf, interface)?,
        ))
    }

    pub(crate) fn from_raw(
        tenant: Option<&str>,
        terminal: Option<&str>,
        interface: Option<&str>,
    ) -> VtnResult<Self> {
        Ok(Self {
            name: PathName::new(raw_name(tenant)?, raw_name(terminal)?, raw_name(interface)?),
        })
    }

    #[must_use]
    pub fn tenant_name(&self) -> Option<&VnodeName> {
        self.name.tenant.as_ref()
    }

    #[must_use]
    pub fn terminal_name(&self) -> Option<&VnodeName> {
        self.name.bridge.as_ref()
    }

    #[must_use]
    pub fn interface_name(&self) -> Option<&VnodeName> {
        self.name.interface.as_ref()
    }

    #[must_use]
    pub fn store_path(&self) -> &StorePath {
        self.name.path.get_or_init(|| {
            self.name
                .terminal_path()
                .child(PathSegment::Vinterface(self.name.interface.clone()))
        })
    }

    #[must_use]
    pub fn components(&self) -> Vec<Option<String>> {
        vec![
            component(self.name.tenant.as_ref()),
            component(self.name.bridge.as_ref()),
            component(self.name.interface.as_ref()),
        ]
    }

    #[must_use]
    pub fn to_node_path(&self) -> VirtualNodePath {
        VirtualNodePath {
            tenant_name: component(self.name.tenant.as_ref()),
            terminal_name: component(self.name.bridge.as_ref()),
            interface_name: component(self.name.interface.as_ref()),
            ..Default::default()
        }
    }
}
