// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VLAN identifiers as used by virtual mappings.

use std::fmt::Display;
use std::str::FromStr;

/// A VLAN Identifier.
///
/// Unlike an 802.1Q tag on the wire, a mapping VLAN may be zero, which stands for
/// untagged frames. 4095 is reserved and never legal.
#[repr(transparent)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize,
    serde::Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct VlanId(u16);

/// Errors which can occur when converting a `u16` to a validated [`VlanId`]
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidVid {
    /// 4095 is a reserved VLAN ID per 802.1Q.
    #[error("4095 is a reserved VLAN ID")]
    Reserved,
    /// The value does not fit in 12 bits.
    #[error("{0} is too large to be a legal VLAN ID ({max} is max legal value)", max = VlanId::MAX.as_u16())]
    TooLarge(u16),
    /// Not a number at all.
    #[error("'{0}' is not a VLAN ID")]
    NotANumber(String),
}

impl VlanId {
    /// Untagged frames.
    pub const UNTAGGED: VlanId = VlanId(0);
    /// The maximum legal [`VlanId`] value (2^12 - 2).
    pub const MAX: VlanId = VlanId(4094);
    /// The raw value of the reserved VLAN ID.
    pub const RESERVED: u16 = 4095;
    /// Mask covering the 12 bits of a VLAN ID.
    pub const MASK: u64 = 0xfff;

    /// Create a new [`VlanId`] from a `u16`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is 4095 (reserved) or does not fit in 12 bits.
    pub const fn new(vid: u16) -> Result<Self, InvalidVid> {
        match vid {
            Self::RESERVED => Err(InvalidVid::Reserved),
            v if v > Self::RESERVED => Err(InvalidVid::TooLarge(v)),
            v => Ok(VlanId(v)),
        }
    }

    /// Get the value of the [`VlanId`] as a `u16`.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Tell if this is the untagged VLAN.
    #[must_use]
    pub const fn is_untagged(self) -> bool {
        self.0 == 0
    }
}

impl From<VlanId> for u16 {
    fn from(vid: VlanId) -> u16 {
        vid.as_u16()
    }
}

impl TryFrom<u16> for VlanId {
    type Error = InvalidVid;

    fn try_from(vid: u16) -> Result<VlanId, Self::Error> {
        VlanId::new(vid)
    }
}

impl FromStr for VlanId {
    type Err = InvalidVid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u16 = s.parse().map_err(|_| InvalidVid::NotANumber(s.to_owned()))?;
        VlanId::new(raw)
    }
}

impl Display for VlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use crate::vlan::VlanId;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for VlanId {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let raw: u16 = u.produce()?;
            Some(VlanId(raw % VlanId::RESERVED))
        }
    }
}
