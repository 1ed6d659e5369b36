// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Building identifiers back from their canonical strings and from store paths.

use crate::ident::{
    MacMapHostIdentifier, MacMapIdentifier, NULL_COMPONENT, VBridgeIdentifier,
    VBridgeIfIdentifier, VNodeIdentifier, VTenantIdentifier, VTerminalIdentifier,
    VTerminalIfIdentifier, VlanMapIdentifier,
};
use crate::mapid::VlanMapId;
use crate::storepath::{PathSegment, SegmentKind, StorePath};
use crate::vnode::VNodeType;
use std::str::FromStr;
use tracing::trace;
use types::{MacVlan, VnodeName, VtnError, VtnResult};

/// Separates the type tag from the components in canonical strings.
pub const TYPE_SEPARATOR: char = ':';
/// Separates components in canonical strings.
pub const COMPONENT_SEPARATOR: char = '/';

impl FromStr for VNodeIdentifier {
    type Err = VtnError;

    /// Parse a canonical identifier string, `TYPE:comp0/comp1/...`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |why: &str| VtnError::bad_argument(format!("'{s}': {why}"));

        let (tag, rest) = s
            .split_once(TYPE_SEPARATOR)
            .ok_or_else(|| bad("no type tag"))?;
        let ty = VNodeType::from_str(tag).map_err(|_| bad("unknown type tag"))?;

        let parts: Vec<&str> = rest.split(COMPONENT_SEPARATOR).collect();
        if parts.len() != ty.arity() {
            return Err(bad(&format!(
                "{} components expected, found {}",
                ty.arity(),
                parts.len()
            )));
        }
        if parts.iter().any(|p| p.is_empty()) {
            return Err(bad("empty component"));
        }
        let comps: Vec<Option<&str>> = parts
            .into_iter()
            .map(|p| (p != NULL_COMPONENT).then_some(p))
            .collect();
        let at = |n: usize| comps.get(n).copied().flatten();

        let id = match ty {
            VNodeType::Vtn => VTenantIdentifier::from_raw(at(0))?.into(),
            VNodeType::VBridge => VBridgeIdentifier::from_raw(at(0), at(1))?.into(),
            VNodeType::VTerminal => VTerminalIdentifier::from_raw(at(0), at(1))?.into(),
            VNodeType::VBridgeIf => VBridgeIfIdentifier::from_raw(at(0), at(1), at(2))?.into(),
            VNodeType::VTerminalIf => {
                VTerminalIfIdentifier::from_raw(at(0), at(1), at(2))?.into()
            }
            VNodeType::VlanMap => VlanMapIdentifier::from_raw(at(0), at(1), at(2))?.into(),
            VNodeType::MacMap => MacMapIdentifier::from_raw(at(0), at(1))?.into(),
            VNodeType::MacMapHost => MacMapHostIdentifier::from_raw(at(0), at(1), at(2))?.into(),
        };
        Ok(id)
    }
}

/// Fields collected while walking a store path.
#[derive(Debug, Default)]
struct Fields {
    ty: Option<VNodeType>,
    tenant: Option<VnodeName>,
    bridge: Option<VnodeName>,
    terminal: Option<VnodeName>,
    interface: Option<VnodeName>,
    map_id: Option<VlanMapId>,
    host: Option<MacVlan>,
}

impl Fields {
    fn expect(&self, seg: &PathSegment, parents: &[VNodeType]) -> VtnResult<()> {
        match self.ty {
            Some(ty) if parents.contains(&ty) => Ok(()),
            _ => Err(VtnError::bad_argument(format!(
                "unexpected path segment: {seg}"
            ))),
        }
    }

    fn build(self) -> VtnResult<VNodeIdentifier> {
        let missing = || VtnError::bad_argument("incomplete path");
        let ty = self.ty.ok_or_else(|| VtnError::bad_argument("no virtual node in path"))?;
        let tenant = self.tenant.ok_or_else(missing)?;
        let id = match ty {
            VNodeType::Vtn => VTenantIdentifier::new(tenant).into(),
            VNodeType::VBridge => VBridgeIdentifier::new(tenant, self.bridge.ok_or_else(missing)?).into(),
            VNodeType::VTerminal => {
                VTerminalIdentifier::new(tenant, self.terminal.ok_or_else(missing)?).into()
            }
            VNodeType::VBridgeIf => VBridgeIfIdentifier::new(
                tenant,
                self.bridge.ok_or_else(missing)?,
                self.interface.ok_or_else(missing)?,
            )
            .into(),
            VNodeType::VTerminalIf => VTerminalIfIdentifier::new(
                tenant,
                self.terminal.ok_or_else(missing)?,
                self.interface.ok_or_else(missing)?,
            )
            .into(),
            VNodeType::VlanMap => VlanMapIdentifier::new(
                tenant,
                self.bridge.ok_or_else(missing)?,
                self.map_id.ok_or_else(missing)?,
            )
            .into(),
            VNodeType::MacMap => MacMapIdentifier::new(tenant, self.bridge.ok_or_else(missing)?).into(),
            VNodeType::MacMapHost => MacMapHostIdentifier::new(
                tenant,
                self.bridge.ok_or_else(missing)?,
                self.host.ok_or_else(missing)?,
            )
            .into(),
        };
        Ok(id)
    }
}

/// What to do after a segment was consumed.
enum Walk {
    Continue,
    Stop,
}

type SegmentRule = fn(&PathSegment, &mut Fields) -> VtnResult<Walk>;

fn key<T: Clone>(seg: &PathSegment, key: Option<&T>) -> VtnResult<T> {
    key.cloned()
        .ok_or_else(|| VtnError::bad_argument(format!("wildcarded path segment: {seg}")))
}

fn on_container(_: &PathSegment, _: &mut Fields) -> VtnResult<Walk> {
    Ok(Walk::Continue)
}

fn on_vtn(seg: &PathSegment, f: &mut Fields) -> VtnResult<Walk> {
    if let PathSegment::Vtn(name) = seg {
        f.tenant = Some(key(seg, name.as_ref())?);
        f.ty = Some(VNodeType::Vtn);
    }
    Ok(Walk::Continue)
}

fn on_vbridge(seg: &PathSegment, f: &mut Fields) -> VtnResult<Walk> {
    f.expect(seg, &[VNodeType::Vtn])?;
    if let PathSegment::Vbridge(name) = seg {
        f.bridge = Some(key(seg, name.as_ref())?);
        f.ty = Some(VNodeType::VBridge);
    }
    Ok(Walk::Continue)
}

fn on_vterminal(seg: &PathSegment, f: &mut Fields) -> VtnResult<Walk> {
    f.expect(seg, &[VNodeType::Vtn])?;
    if let PathSegment::Vterminal(name) = seg {
        f.terminal = Some(key(seg, name.as_ref())?);
        f.ty = Some(VNodeType::VTerminal);
    }
    Ok(Walk::Continue)
}

fn on_vinterface(seg: &PathSegment, f: &mut Fields) -> VtnResult<Walk> {
    f.expect(seg, &[VNodeType::VBridge, VNodeType::VTerminal])?;
    if let PathSegment::Vinterface(name) = seg {
        f.interface = Some(key(seg, name.as_ref())?);
        f.ty = match f.ty {
            Some(VNodeType::VTerminal) => Some(VNodeType::VTerminalIf),
            _ => Some(VNodeType::VBridgeIf),
        };
    }
    Ok(Walk::Continue)
}

fn on_vlan_map(seg: &PathSegment, f: &mut Fields) -> VtnResult<Walk> {
    f.expect(seg, &[VNodeType::VBridge])?;
    if let PathSegment::VlanMap(id) = seg {
        f.map_id = Some(key(seg, id.as_ref())?);
        f.ty = Some(VNodeType::VlanMap);
    }
    Ok(Walk::Continue)
}

fn on_mac_map(seg: &PathSegment, f: &mut Fields) -> VtnResult<Walk> {
    f.expect(seg, &[VNodeType::VBridge])?;
    f.ty = Some(VNodeType::MacMap);
    Ok(Walk::Continue)
}

fn on_mac_map_child(seg: &PathSegment, f: &mut Fields) -> VtnResult<Walk> {
    f.expect(seg, &[VNodeType::MacMap])?;
    Ok(Walk::Continue)
}

/// A denied host is not addressable as a mapped host: the walk ends at the MAC mapping.
fn on_denied_hosts(seg: &PathSegment, f: &mut Fields) -> VtnResult<Walk> {
    f.expect(seg, &[VNodeType::MacMap])?;
    Ok(Walk::Stop)
}

/// An allowed host with a MAC address names a host; a wildcard names the whole mapping.
fn on_allowed_host(seg: &PathSegment, f: &mut Fields) -> VtnResult<Walk> {
    f.expect(seg, &[VNodeType::MacMap])?;
    if let PathSegment::AllowedHost(host) = seg {
        let host = key(seg, host.as_ref())?;
        if !host.is_wildcard() {
            f.host = Some(host);
            f.ty = Some(VNodeType::MacMapHost);
        }
    }
    Ok(Walk::Continue)
}

fn on_mapped_host(seg: &PathSegment, f: &mut Fields) -> VtnResult<Walk> {
    f.expect(seg, &[VNodeType::MacMap])?;
    if let PathSegment::MappedHost(host) = seg {
        f.host = Some(key(seg, host.as_ref())?);
        f.ty = Some(VNodeType::MacMapHost);
    }
    Ok(Walk::Continue)
}

fn on_unexpected(seg: &PathSegment, _: &mut Fields) -> VtnResult<Walk> {
    Err(VtnError::bad_argument(format!(
        "unexpected path segment: {seg}"
    )))
}

/// The extraction rule of every kind of path segment.
const fn segment_rule(kind: SegmentKind) -> SegmentRule {
    match kind {
        SegmentKind::Vtns => on_container,
        SegmentKind::Vtn => on_vtn,
        SegmentKind::Vbridge => on_vbridge,
        SegmentKind::Vterminal => on_vterminal,
        SegmentKind::Vinterface => on_vinterface,
        SegmentKind::VlanMap => on_vlan_map,
        SegmentKind::MacMap => on_mac_map,
        SegmentKind::MacMapConfig | SegmentKind::AllowedHosts | SegmentKind::MacMapStatus => {
            on_mac_map_child
        }
        SegmentKind::DeniedHosts => on_denied_hosts,
        SegmentKind::AllowedHost => on_allowed_host,
        SegmentKind::MappedHost => on_mapped_host,
        SegmentKind::DeniedHost => on_unexpected,
    }
}

impl VNodeIdentifier {
    /// Rebuild the identifier of the virtual node a store path points into.
    ///
    /// Paths below a node, such as the configuration of a MAC mapping, resolve to that
    /// node. Paths into the denied host list resolve to the MAC mapping.
    pub fn from_store_path(path: &StorePath) -> VtnResult<Self> {
        let mut fields = Fields::default();
        for seg in path.segments() {
            match segment_rule(seg.kind())(seg, &mut fields) {
                Ok(Walk::Continue) => {}
                Ok(Walk::Stop) => break,
                Err(e) => {
                    trace!("Cannot convert {path}: {e}");
                    return Err(e);
                }
            }
        }
        fields.build()
    }
}
