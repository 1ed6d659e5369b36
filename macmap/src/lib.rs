// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! MAC mapping: the dynamic binding of hosts, known by MAC address and VLAN, to a virtual
//! bridge.
//!
//! A MAC mapping has a list of allowed hosts, which may use wildcard entries matching any
//! host on a VLAN, and a list of denied hosts. Hosts seen on the network and allowed by the
//! mapping are mapped on the switch port they were seen on until they leave, move or stop
//! being allowed.

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

pub mod config;
pub mod data;
pub mod errors;
pub mod file;
pub mod settings;
pub mod status;
pub mod table;

pub use config::{AclType, MacMapChange, UpdateOperation, VtnMacMapConfig}; // re-export
pub use errors::{MacMapError, MacMapResult}; // re-export
pub use file::MacMapConfigFile; // re-export
pub use settings::{MacMapSettings, MacMapSettingsBuilder}; // re-export
pub use status::{MacMapActivation, MacMapRemoval, PortFilter, VtnMacMapStatus}; // re-export
pub use table::MacMapTable; // re-export

use logging::log_target;
log_target!("macmap", LevelFilter::INFO, &["vtn"]);
