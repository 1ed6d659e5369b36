// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Primitive types of the virtual network core: MAC addresses, VLAN IDs, host keys,
//! switch ports, virtual node names and the common error type.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod errors;
pub mod mac;
pub mod macvlan;
pub mod name;
pub mod port;
pub mod vlan;

pub use errors::{ErrorKind, VtnError, VtnResult}; // re-export
pub use mac::Mac; // re-export
pub use macvlan::MacVlan; // re-export
pub use name::VnodeName; // re-export
pub use port::{PortVlan, SalNode, SalPort}; // re-export
pub use vlan::VlanId; // re-export

#[cfg(any(test, feature = "bolero"))]
pub use mac::HostMacGenerator; // re-export
