// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Paths into the configuration and status tree of the store.

use crate::mapid::VlanMapId;
use std::fmt::Display;
use types::{MacVlan, VnodeName, VtnError, VtnResult};

/// One step of a [`StorePath`]. Keyed segments with no key are wildcards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumDiscriminants)]
#[strum_discriminants(name(SegmentKind), derive(Hash, PartialOrd, Ord, strum::Display))]
pub enum PathSegment {
    Vtns,
    Vtn(Option<VnodeName>),
    Vbridge(Option<VnodeName>),
    Vterminal(Option<VnodeName>),
    Vinterface(Option<VnodeName>),
    VlanMap(Option<VlanMapId>),
    MacMap,
    MacMapConfig,
    AllowedHosts,
    AllowedHost(Option<MacVlan>),
    DeniedHosts,
    DeniedHost(Option<MacVlan>),
    MacMapStatus,
    MappedHost(Option<MacVlan>),
}

impl PathSegment {
    #[must_use]
    pub fn kind(&self) -> SegmentKind {
        SegmentKind::from(self)
    }

    /// Tell if this segment is keyed but carries no key.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        match self {
            PathSegment::Vtn(n)
            | PathSegment::Vbridge(n)
            | PathSegment::Vterminal(n)
            | PathSegment::Vinterface(n) => n.is_none(),
            PathSegment::VlanMap(id) => id.is_none(),
            PathSegment::AllowedHost(h) | PathSegment::DeniedHost(h) | PathSegment::MappedHost(h) => {
                h.is_none()
            }
            PathSegment::Vtns
            | PathSegment::MacMap
            | PathSegment::MacMapConfig
            | PathSegment::AllowedHosts
            | PathSegment::DeniedHosts
            | PathSegment::MacMapStatus => false,
        }
    }
}

fn fmt_key<T: Display>(f: &mut std::fmt::Formatter<'_>, name: &str, key: Option<&T>) -> std::fmt::Result {
    match key {
        Some(key) => write!(f, "{name}={key}"),
        None => write!(f, "{name}=*"),
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSegment::Vtns => f.write_str("vtns"),
            PathSegment::Vtn(n) => fmt_key(f, "vtn", n.as_ref()),
            PathSegment::Vbridge(n) => fmt_key(f, "vbridge", n.as_ref()),
            PathSegment::Vterminal(n) => fmt_key(f, "vterminal", n.as_ref()),
            PathSegment::Vinterface(n) => fmt_key(f, "vinterface", n.as_ref()),
            PathSegment::VlanMap(id) => fmt_key(f, "vlan-map", id.as_ref()),
            PathSegment::MacMap => f.write_str("mac-map"),
            PathSegment::MacMapConfig => f.write_str("mac-map-config"),
            PathSegment::AllowedHosts => f.write_str("allowed-hosts"),
            PathSegment::AllowedHost(h) => fmt_key(f, "allowed-host", h.as_ref()),
            PathSegment::DeniedHosts => f.write_str("denied-hosts"),
            PathSegment::DeniedHost(h) => fmt_key(f, "denied-host", h.as_ref()),
            PathSegment::MacMapStatus => f.write_str("mac-map-status"),
            PathSegment::MappedHost(h) => fmt_key(f, "mapped-host", h.as_ref()),
        }
    }
}

/// An ordered list of segments addressing a node of the store tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorePath(Vec<PathSegment>);

impl StorePath {
    #[must_use]
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// The container of all virtual tenants.
    #[must_use]
    pub fn vtns() -> Self {
        Self(vec![PathSegment::Vtns])
    }

    /// Build the path of a child of this node.
    #[must_use]
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn is_wildcarded(&self) -> bool {
        self.0.iter().any(PathSegment::is_wildcard)
    }

    /// Tell if `self` is `other` or one of its descendants.
    #[must_use]
    pub fn starts_with(&self, other: &StorePath) -> bool {
        self.0.starts_with(&other.0)
    }

    /// Fail if the path can not address a single node.
    pub fn check_concrete(&self) -> VtnResult<()> {
        if self.is_wildcarded() {
            Err(VtnError::bad_argument(format!("wildcarded path: {self}")))
        } else {
            Ok(())
        }
    }
}

impl From<Vec<PathSegment>> for StorePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl Display for StorePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
