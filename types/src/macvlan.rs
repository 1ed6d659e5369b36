// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Host keys: a MAC address qualified by a VLAN.

use crate::mac::{Mac, MacParseError};
use crate::vlan::{InvalidVid, VlanId};
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// A host in the virtual network: a [`Mac`] on a [`VlanId`].
///
/// The pair is packed as `(mac << 12) | vlan` and ordered by that value, so all the entries
/// sharing a MAC address are adjacent in any ordered container, sorted by VLAN. This is what
/// allows looking up "the host with this MAC, whatever its VLAN" with a range query
/// (see [`MacVlan::mac_range`]).
///
/// A zero MAC is the undefined MAC: a `MacVlan` without MAC address matches every host on
/// its VLAN.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct MacVlan(u64);

/// Errors building a [`MacVlan`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MacVlanError {
    #[error("Invalid host '{0}': expected <mac>@<vlan> or ANY@<vlan>")]
    Syntax(String),
    #[error(transparent)]
    Mac(#[from] MacParseError),
    #[error(transparent)]
    Vlan(#[from] InvalidVid),
    #[error("Invalid host encoding: {0}")]
    Encoding(i64),
}

impl MacVlan {
    /// Numeric encoding of "no specific host", used where a single integer field has to tell
    /// a MAC mapping apart from one of its mapped hosts.
    pub const UNDEFINED_ENCODING: i64 = -1;
    /// Text used in place of the MAC address of a wildcard entry.
    pub const ANY: &'static str = "ANY";
    const VLAN_BITS: u32 = 12;

    /// Build a host key. A missing or zero MAC yields a wildcard entry.
    #[must_use]
    pub fn new(mac: Option<Mac>, vlan: VlanId) -> Self {
        let mac = mac.map_or(0, |m| m.as_u64());
        Self((mac << Self::VLAN_BITS) | u64::from(vlan.as_u16()))
    }

    /// Build the key of a specific host.
    #[must_use]
    pub fn host(mac: Mac, vlan: VlanId) -> Self {
        Self::new(Some(mac), vlan)
    }

    /// Build the key matching any host on `vlan`.
    #[must_use]
    pub fn wildcard(vlan: VlanId) -> Self {
        Self::new(None, vlan)
    }

    /// The MAC address, or `None` if undefined.
    #[must_use]
    pub fn mac(&self) -> Option<Mac> {
        let raw = self.0 >> Self::VLAN_BITS;
        (raw != 0).then(|| Mac::from_u64(raw))
    }

    /// The VLAN.
    #[must_use]
    pub fn vlan(&self) -> VlanId {
        #[allow(clippy::cast_possible_truncation)] // masked to 12 bits
        let raw = (self.0 & VlanId::MASK) as u16;
        // only legal VLAN IDs are ever packed
        VlanId::new(raw).unwrap_or_default()
    }

    /// Tell if the MAC address is undefined.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.mac().is_none()
    }

    /// The packed value. Always positive, since only 60 bits are used.
    #[must_use]
    pub fn encoded(&self) -> i64 {
        #[allow(clippy::cast_possible_wrap)] // 60 significant bits
        let value = self.0 as i64;
        value
    }

    /// Unpack a value produced by [`MacVlan::encoded`].
    ///
    /// # Errors
    ///
    /// Fails on negative values, values wider than 60 bits or holding VLAN 4095.
    pub fn from_encoded(value: i64) -> Result<Self, MacVlanError> {
        let raw = u64::try_from(value).map_err(|_| MacVlanError::Encoding(value))?;
        if raw >> (48 + Self::VLAN_BITS) != 0 {
            return Err(MacVlanError::Encoding(value));
        }
        #[allow(clippy::cast_possible_truncation)] // masked to 12 bits
        VlanId::new((raw & VlanId::MASK) as u16).map_err(|_| MacVlanError::Encoding(value))?;
        Ok(Self(raw))
    }

    /// The smallest and largest keys with the given MAC address, all VLANs included.
    #[must_use]
    pub fn mac_range(mac: Mac) -> RangeInclusive<MacVlan> {
        MacVlan::host(mac, VlanId::UNTAGGED)..=MacVlan::host(mac, VlanId::MAX)
    }
}

impl Display for MacVlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mac() {
            Some(mac) => write!(f, "{mac}@{}", self.vlan()),
            None => write!(f, "{}@{}", Self::ANY, self.vlan()),
        }
    }
}

impl FromStr for MacVlan {
    type Err = MacVlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((mac, vlan)) = s.split_once('@') else {
            return Err(MacVlanError::Syntax(s.to_owned()));
        };
        let vlan: VlanId = vlan.parse()?;
        if mac.eq_ignore_ascii_case(Self::ANY) {
            return Ok(MacVlan::wildcard(vlan));
        }
        Ok(MacVlan::host(mac.parse()?, vlan))
    }
}

impl TryFrom<String> for MacVlan {
    type Error = MacVlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacVlan> for String {
    fn from(value: MacVlan) -> Self {
        value.to_string()
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use crate::macvlan::MacVlan;
    use crate::{Mac, VlanId};
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for MacVlan {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let mac: Option<Mac> = u.produce()?;
            let vlan: VlanId = u.produce()?;
            Some(MacVlan::new(mac, vlan))
        }
    }
}

#[cfg(test)]
mod test {
    use super::{MacVlan, MacVlanError};
    use crate::{Mac, VlanId};
    use pretty_assertions::assert_eq;

    fn vid(raw: u16) -> VlanId {
        VlanId::new(raw).unwrap()
    }

    #[test]
    fn macvlan_accessors() {
        let mac = Mac([0xaa, 0xbb, 0xcc, 0, 0, 1]);
        let host = MacVlan::host(mac, vid(10));
        assert_eq!(host.mac(), Some(mac));
        assert_eq!(host.vlan(), vid(10));
        assert!(!host.is_wildcard());
        assert_eq!(host.encoded(), (0xaabb_cc00_0001_i64 << 12) | 10);

        let any = MacVlan::wildcard(vid(30));
        assert!(any.is_wildcard());
        assert_eq!(any.mac(), None);
        assert_eq!(MacVlan::new(Some(Mac::ZERO), vid(30)), any);
    }

    #[test]
    fn macvlan_order_is_mac_first() {
        let m1 = Mac([0, 0, 0, 0, 0, 1]);
        let m2 = Mac([0, 0, 0, 0, 0, 2]);
        assert!(MacVlan::host(m1, vid(4000)) < MacVlan::host(m2, vid(1)));
        assert!(MacVlan::host(m1, vid(1)) < MacVlan::host(m1, vid(2)));
        assert!(MacVlan::wildcard(vid(4094)) < MacVlan::host(m1, vid(0)));
        let range = MacVlan::mac_range(m1);
        assert!(range.contains(&MacVlan::host(m1, vid(77))));
        assert!(!range.contains(&MacVlan::host(m2, vid(0))));
    }

    #[test]
    fn macvlan_text() {
        let host: MacVlan = "00:11:22:33:44:55@10".parse().unwrap();
        assert_eq!(host.to_string(), "00:11:22:33:44:55@10");
        let any: MacVlan = "any@0".parse().unwrap();
        assert_eq!(any.to_string(), "ANY@0");
        assert!(matches!("00:11:22:33:44:55".parse::<MacVlan>(), Err(MacVlanError::Syntax(_))));
        assert!(matches!("00:11:22:33:44@1".parse::<MacVlan>(), Err(MacVlanError::Mac(_))));
        assert!(matches!("00:11:22:33:44:55@4095".parse::<MacVlan>(), Err(MacVlanError::Vlan(_))));
    }

    #[test]
    fn macvlan_encoding_roundtrip() {
        bolero::check!().with_type().for_each(|host: &MacVlan| {
            assert!(host.encoded() >= 0);
            assert_eq!(MacVlan::from_encoded(host.encoded()), Ok(*host));
            assert_eq!(host.to_string().parse::<MacVlan>(), Ok(*host));
        });
    }

    #[test]
    fn macvlan_bad_encoding() {
        assert!(MacVlan::from_encoded(MacVlan::UNDEFINED_ENCODING).is_err());
        assert!(MacVlan::from_encoded(0xfff).is_err());
        assert!(MacVlan::from_encoded(1 << 60).is_err());
    }
}
