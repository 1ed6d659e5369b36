// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! MAC addresses of hosts.

use arrayvec::ArrayVec;
use std::fmt::Display;
use std::str::FromStr;

/// A 48-bit [MAC Address] as seen by the virtual network.
///
/// `Mac` is a transparent wrapper around `[u8; 6]`. Hosts are keyed by a
/// [`Mac`] and a VLAN (see [`crate::MacVlan`]), and the numeric form returned by
/// [`Mac::as_u64`] is what ends up in the packed host encoding.
///
/// [MAC Address]: https://en.wikipedia.org/wiki/MAC_address
#[repr(transparent)]
#[cfg_attr(any(test, feature = "bolero"), derive(bolero::TypeGenerator))]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Mac(pub [u8; 6]);

/// Rejected textual MAC addresses
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MacParseError {
    #[error("Invalid MAC address '{0}': expected xx:xx:xx:xx:xx:xx")]
    Invalid(String),
}

impl Mac {
    /// ff:ff:ff:ff:ff:ff
    pub const BROADCAST: Mac = Mac([u8::MAX; 6]);
    /// The zero `Mac`.
    ///
    /// In a host key the zero `Mac` stands for "any host" and is never a real address.
    pub const ZERO: Mac = Mac([0; 6]);
    /// Mask of the 48 significant bits of [`Mac::as_u64`].
    pub const MASK: u64 = (1 << 48) - 1;

    /// Tell if this is the broadcast address.
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        *self == Mac::BROADCAST
    }

    /// Tell if the group bit is set. Broadcast is a multicast address too.
    #[must_use]
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 1 != 0
    }

    #[must_use]
    pub fn is_unicast(&self) -> bool {
        !self.is_multicast()
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Mac::ZERO
    }

    /// The address as the low 48 bits of a `u64`, first octet most significant.
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        self.0
            .iter()
            .fold(0u64, |acc, octet| (acc << 8) | u64::from(*octet))
    }

    /// Build a [`Mac`] from the low 48 bits of `value`. Upper bits are ignored.
    #[must_use]
    pub fn from_u64(value: u64) -> Mac {
        let bytes = (value & Self::MASK).to_be_bytes();
        Mac([bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7]])
    }
}

impl From<[u8; 6]> for Mac {
    fn from(value: [u8; 6]) -> Self {
        Mac(value)
    }
}

impl From<Mac> for [u8; 6] {
    fn from(value: Mac) -> Self {
        value.0
    }
}

impl AsRef<[u8; 6]> for Mac {
    fn as_ref(&self) -> &[u8; 6] {
        &self.0
    }
}

impl TryFrom<&str> for Mac {
    type Error = MacParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        const MAX_OCTETS: usize = 6;
        let invalid = || MacParseError::Invalid(value.to_string());
        let octets_parsed = value.split(':').try_fold(
            ArrayVec::<u8, MAX_OCTETS>::new(),
            |mut acc, octet_str| {
                if octet_str.len() != 2 || !octet_str.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(invalid());
                }
                let parsed = u8::from_str_radix(octet_str, 16).map_err(|_| invalid())?;
                acc.try_push(parsed).map_err(|_| invalid())?;
                Ok(acc)
            },
        )?;
        match octets_parsed.as_slice() {
            [o0, o1, o2, o3, o4, o5] => Ok(Mac([*o0, *o1, *o2, *o3, *o4, *o5])),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Mac {
    type Error = MacParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Mac::try_from(value.as_str())
    }
}

impl FromStr for Mac {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mac::try_from(s)
    }
}

impl From<Mac> for String {
    fn from(value: Mac) -> Self {
        value.to_string()
    }
}

impl Display for Mac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use crate::mac::Mac;
    use bolero::{Driver, ValueGenerator};

    /// Generates unicast, non-zero [`Mac`]s: the only ones legal as a mapped host.
    pub struct HostMacGenerator;
    impl ValueGenerator for HostMacGenerator {
        type Output = Mac;

        fn generate<D: Driver>(&self, u: &mut D) -> Option<Self::Output> {
            let mut mac: Mac = u.produce()?;
            mac.0[0] &= 0b1111_1110;
            if mac.is_zero() {
                mac.0[5] = 1;
            }
            Some(mac)
        }
    }
}

#[cfg(any(test, feature = "bolero"))]
pub use contract::HostMacGenerator;
