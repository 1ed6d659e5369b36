// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Identifiers of the virtual network: virtual tenants, bridges, terminals, interfaces and
//! the VLAN and MAC mappings of bridges.
//!
//! An identifier has a canonical string form (`VBRIDGE:vtn1/vbr1`), a path in the store, and
//! a flat form used in the virtual routes of flow-path logs. This crate converts between all of
//! them and tells whether one node lies under another.

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

pub mod factory;
pub mod ident;
pub mod mapid;
mod memo;
pub mod route;
pub mod store;
pub mod storepath;
pub mod vnode;

pub use ident::{
    MacMapHostIdentifier, MacMapIdentifier, VBridgeIdentifier, VBridgeIfIdentifier,
    VNodeIdentifier, VTenantIdentifier, VTerminalIdentifier, VTerminalIfIdentifier,
    VlanMapIdentifier,
}; // re-export
pub use mapid::VlanMapId; // re-export
pub use route::{VirtualNodePath, VirtualRoute, VirtualRouteReason}; // re-export
pub use store::{MemStore, ReadTransaction, ReadWriteTransaction}; // re-export
pub use storepath::{PathSegment, StorePath}; // re-export
pub use vnode::VNodeType; // re-export

use logging::log_target;
log_target!("identity", LevelFilter::INFO, &["vtn"]);
