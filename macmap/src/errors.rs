// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Failures of MAC mapping operations.

use identity::{MacMapIdentifier, VNodeIdentifier};
use thiserror::Error;
use types::{MacVlan, PortVlan, VtnError};

/// The reasons why a host can not be mapped or unmapped
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MacMapError {
    /// Another host with the same MAC address, on another VLAN, is active in the mapping.
    #[error("{host}: MAC address already mapped by {mapping} as {existing}")]
    Duplicate {
        host: MacVlan,
        mapping: MacMapIdentifier,
        existing: MacVlan,
    },
    /// The host is active in another MAC mapping.
    #[error("{host}: already mapped by {mapping}")]
    Conflict {
        host: MacVlan,
        mapping: MacMapIdentifier,
    },
    /// The VLAN on the port is reserved by another virtual mapping.
    #[error("{host}: {port_vlan} is reserved by {owner}")]
    PortBusy {
        host: MacVlan,
        mapping: MacMapIdentifier,
        port_vlan: PortVlan,
        owner: VNodeIdentifier,
    },
    /// The host is not mapped anymore.
    #[error("{host}: not mapped by {mapping}")]
    Gone {
        host: MacVlan,
        mapping: MacMapIdentifier,
    },
    #[error(transparent)]
    Vtn(#[from] VtnError),
}

impl From<MacMapError> for VtnError {
    fn from(e: MacMapError) -> Self {
        match e {
            MacMapError::Duplicate { .. } | MacMapError::Conflict { .. } => {
                VtnError::Conflict(e.to_string())
            }
            MacMapError::PortBusy { .. } => VtnError::InUse(e.to_string()),
            MacMapError::Gone { .. } => VtnError::Gone(e.to_string()),
            MacMapError::Vtn(e) => e,
        }
    }
}

/// Result-like type for MAC mapping operations
pub type MacMapResult<T> = Result<T, MacMapError>;
