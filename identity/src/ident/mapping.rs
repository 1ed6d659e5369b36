// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Identifiers of the virtual mappings of a vBridge: VLAN mappings, the MAC mapping and
//! the hosts it maps.

use super::node::VBridgeIdentifier;
use super::pathname::{NameChecker, PathName, component, raw_name};
use crate::mapid::VlanMapId;
use crate::memo::Memo;
use crate::route::{MacMapInfo, VirtualNodePath, VlanMapInfo};
use crate::storepath::{PathSegment, StorePath};
use crate::vnode::VNodeType;
use std::str::FromStr;
use types::{MacVlan, VnodeName, VtnError, VtnResult};

/// Identifies a VLAN mapping of a vBridge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VlanMapIdentifier {
    name: PathName,
    map_id: VlanMapId,
}
identifier!(VlanMapIdentifier, VlanMap);

impl VlanMapIdentifier {
    #[must_use]
    pub fn new(tenant: VnodeName, bridge: VnodeName, map_id: VlanMapId) -> Self {
        Self {
            name: PathName::new(Some(tenant), Some(bridge), None),
            map_id,
        }
    }

    /// Build from raw names and a raw mapping ID.
    ///
    /// With `find`, illegal names and mapping IDs are reported as not found.
    pub fn create(
        tenant: Option<&str>,
        bridge: Option<&str>,
        map_id: Option<&str>,
        find: bool,
    ) -> VtnResult<Self> {
        let mut names = NameChecker::new(find);
        let tenant = names.check(VNodeType::Vtn, tenant)?;
        let bridge = names.check(VNodeType::VBridge, bridge)?;
        let Some(raw) = map_id else {
            return Err(VtnError::null_argument("VLAN mapping ID"));
        };
        let map_id = VlanMapId::from_str(raw).map_err(|e| {
            if find {
                VtnError::not_found(
                    VNodeType::VlanMap.description(),
                    format!("{tenant}/{bridge}/{raw}"),
                )
            } else {
                e.into()
            }
        })?;
        Ok(Self::new(tenant, bridge, map_id))
    }

    pub(crate) fn from_raw(
        tenant: Option<&str>,
        bridge: Option<&str>,
        map_id: Option<&str>,
    ) -> VtnResult<Self> {
        let Some(map_id) = map_id else {
            return Err(VtnError::null_argument("VLAN mapping ID"));
        };
        Ok(Self {
            name: PathName::new(raw_name(tenant)?, raw_name(bridge)?, None),
            map_id: VlanMapId::from_str(map_id)?,
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
    pub fn map_id(&self) -> VlanMapId {
        self.map_id
    }

    #[must_use]
    pub fn bridge(&self) -> VBridgeIdentifier {
        bridge_of(&self.name)
    }

    #[must_use]
    pub fn store_path(&self) -> &StorePath {
        self.name.path.get_or_init(|| {
            self.name
                .bridge_path()
                .child(PathSegment::VlanMap(Some(self.map_id)))
        })
    }

    #[must_use]
    pub fn components(&self) -> Vec<Option<String>> {
        vec![
            component(self.name.tenant.as_ref()),
            component(self.name.bridge.as_ref()),
            Some(self.map_id.to_string()),
        ]
    }

    #[must_use]
    pub fn to_node_path(&self) -> VirtualNodePath {
        VirtualNodePath {
            tenant_name: component(self.name.tenant.as_ref()),
            bridge_name: component(self.name.bridge.as_ref()),
            vlan_map: Some(VlanMapInfo {
                map_id: self.map_id.to_string(),
            }),
            ..Default::default()
        }
    }
}

fn bridge_of(name: &PathName) -> VBridgeIdentifier {
    VBridgeIdentifier::from_names(name.tenant.clone(), name.bridge.clone())
}

/// Identifies the MAC mapping of a vBridge. A bridge has at most one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacMapIdentifier {
    name: PathName,
    config: Memo<StorePath>,
    status: Memo<StorePath>,
}
identifier!(MacMapIdentifier, MacMap);

impl MacMapIdentifier {
    #[must_use]
    pub fn new(tenant: VnodeName, bridge: VnodeName) -> Self {
        Self::with_name(PathName::new(Some(tenant), Some(bridge), None))
    }

    fn with_name(name: PathName) -> Self {
        Self {
            name,
            config: Memo::default(),
            status: Memo::default(),
        }
    }

    /// Build from raw names. With `find`, illegal names are reported as not found.
    pub fn create(tenant: Option<&str>, bridge: Option<&str>, find: bool) -> VtnResult<Self> {
        let mut names = NameChecker::new(find);
        let tenant = names.check(VNodeType::Vtn, tenant)?;
        Ok(Self::new(tenant, names.check(VNodeType::VBridge, bridge)?))
    }

    pub(crate) fn from_raw(tenant: Option<&str>, bridge: Option<&str>) -> VtnResult<Self> {
        Ok(Self::with_name(PathName::new(
            raw_name(tenant)?,
            raw_name(bridge)?,
            None,
        )))
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
    pub fn bridge(&self) -> VBridgeIdentifier {
        bridge_of(&self.name)
    }

    /// The identifier of one of the hosts mapped by this mapping.
    #[must_use]
    pub fn host(&self, host: MacVlan) -> MacMapHostIdentifier {
        MacMapHostIdentifier {
            name: PathName::new(self.name.tenant.clone(), self.name.bridge.clone(), None),
            host,
        }
    }

    #[must_use]
    pub fn store_path(&self) -> &StorePath {
        self.name
            .path
            .get_or_init(|| self.name.bridge_path().child(PathSegment::MacMap))
    }

    /// Where the allow and deny lists of this mapping are kept.
    #[must_use]
    pub fn config_path(&self) -> &StorePath {
        self.config
            .get_or_init(|| self.store_path().child(PathSegment::MacMapConfig))
    }

    /// Where the hosts currently mapped by this mapping are kept.
    #[must_use]
    pub fn status_path(&self) -> &StorePath {
        self.status
            .get_or_init(|| self.store_path().child(PathSegment::MacMapStatus))
    }

    #[must_use]
    pub fn allowed_host_path(&self, host: MacVlan) -> StorePath {
        self.config_path()
            .child(PathSegment::AllowedHosts)
            .child(PathSegment::AllowedHost(Some(host)))
    }

    #[must_use]
    pub fn denied_host_path(&self, host: MacVlan) -> StorePath {
        self.config_path()
            .child(PathSegment::DeniedHosts)
            .child(PathSegment::DeniedHost(Some(host)))
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
            mac_map: Some(MacMapInfo {
                mapped_host: MacVlan::UNDEFINED_ENCODING,
            }),
            ..Default::default()
        }
    }
}

/// Identifies a host mapped by the MAC mapping of a vBridge.
///
/// The canonical string carries the host as its numeric encoding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacMapHostIdentifier {
    name: PathName,
    host: MacVlan,
}
identifier!(MacMapHostIdentifier, MacMapHost);

impl MacMapHostIdentifier {
    #[must_use]
    pub fn new(tenant: VnodeName, bridge: VnodeName, host: MacVlan) -> Self {
        Self {
            name: PathName::new(Some(tenant), Some(bridge), None),
            host,
        }
    }

    pub(crate) fn from_raw(
        tenant: Option<&str>,
        bridge: Option<&str>,
        host: Option<&str>,
    ) -> VtnResult<Self> {
        let Some(host) = host else {
            return Err(VtnError::null_argument("MAC mapped host"));
        };
        let encoded: i64 = host
            .parse()
            .map_err(|_| VtnError::bad_argument(format!("'{host}': invalid host encoding")))?;
        Ok(Self {
            name: PathName::new(raw_name(tenant)?, raw_name(bridge)?, None),
            host: MacVlan::from_encoded(encoded)?,
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
    pub fn host(&self) -> MacVlan {
        self.host
    }

    /// The identifier of the MAC mapping this host belongs to.
    #[must_use]
    pub fn mac_map(&self) -> MacMapIdentifier {
        MacMapIdentifier::with_name(PathName::new(
            self.name.tenant.clone(),
            self.name.bridge.clone(),
            None,
        ))
    }

    #[must_use]
    pub fn store_path(&self) -> &StorePath {
        self.name.path.get_or_init(|| {
            self.name
                .bridge_path()
                .child(PathSegment::MacMap)
                .child(PathSegment::MacMapStatus)
                .child(PathSegment::MappedHost(Some(self.host)))
        })
    }

    #[must_use]
    pub fn components(&self) -> Vec<Option<String>> {
        vec![
            component(self.name.tenant.as_ref()),
            component(self.name.bridge.as_ref()),
            Some(self.host.encoded().to_string()),
        ]
    }

    #[must_use]
    pub fn to_node_path(&self) -> VirtualNodePath {
        VirtualNodePath {
            tenant_name: component(self.name.tenant.as_ref()),
            bridge_name: component(self.name.bridge.as_ref()),
            mac_map: Some(MacMapInfo {
                mapped_host: self.host.encoded(),
            }),
            ..Default::default()
        }
    }
}
