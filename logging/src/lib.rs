// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Log targets of the virtual network crates and control of their levels at runtime.
//! Each crate declares its target with [`log_target!`] and logs through `tracing`.

#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod control;
pub mod targets;

pub use control::{LogConfigError, LogControl, TargetCfg}; // re-export
pub use tracing_subscriber::filter::LevelFilter; // re-export

#[doc(hidden)]
pub use linkme; // used by log_target!
