// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Failures of the virtual network core.
//! Every operation on virtual node identifiers, mapping configurations or the store
//! reports its failures as a [`VtnError`]. The variant tells the caller what kind of
//! failure happened; the message tells the operator which object was involved.

use crate::mac::MacParseError;
use crate::macvlan::MacVlanError;
use crate::name::NameError;
use crate::port::PortParseError;
use crate::vlan::InvalidVid;
use thiserror::Error;

/// The kinds of failure, with no payload attached
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    BadArgument,
    NotFound,
    DataExists,
    Conflict,
    Gone,
    InUse,
    CommitFailed,
}

/// The reasons why an operation may be rejected
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VtnError {
    #[error("Bad argument: {0}")]
    BadArgument(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    DataExists(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("{0}")]
    Gone(String),
    #[error("In use: {0}")]
    InUse(String),
    #[error("Commit failed: {0}")]
    CommitFailed(String),
}

impl VtnError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            VtnError::BadArgument(_) => ErrorKind::BadArgument,
            VtnError::NotFound(_) => ErrorKind::NotFound,
            VtnError::DataExists(_) => ErrorKind::DataExists,
            VtnError::Conflict(_) => ErrorKind::Conflict,
            VtnError::Gone(_) => ErrorKind::Gone,
            VtnError::InUse(_) => ErrorKind::InUse,
            VtnError::CommitFailed(_) => ErrorKind::CommitFailed,
        }
    }

    pub fn bad_argument(msg: impl Into<String>) -> Self {
        VtnError::BadArgument(msg.into())
    }

    /// A required argument is missing.
    pub fn null_argument(what: &str) -> Self {
        VtnError::BadArgument(format!("{what} cannot be null"))
    }

    /// A virtual node, named by its description and path, does not exist.
    pub fn not_found(what: &str, path: impl std::fmt::Display) -> Self {
        VtnError::NotFound(format!("{what} does not exist: {path}"))
    }

    /// A virtual node, named by its description and path, already exists.
    pub fn data_exists(what: &str, path: impl std::fmt::Display) -> Self {
        VtnError::DataExists(format!("{what} already exists: {path}"))
    }
}

impl From<MacParseError> for VtnError {
    fn from(e: MacParseError) -> Self {
        VtnError::BadArgument(e.to_string())
    }
}

impl From<InvalidVid> for VtnError {
    fn from(e: InvalidVid) -> Self {
        VtnError::BadArgument(e.to_string())
    }
}

impl From<MacVlanError> for VtnError {
    fn from(e: MacVlanError) -> Self {
        VtnError::BadArgument(e.to_string())
    }
}

impl From<PortParseError> for VtnError {
    fn from(e: PortParseError) -> Self {
        VtnError::BadArgument(e.to_string())
    }
}

impl From<NameError> for VtnError {
    fn from(e: NameError) -> Self {
        VtnError::BadArgument(e.to_string())
    }
}

/// Result-like type for the virtual network core
pub type VtnResult<T> = Result<T, VtnError>;

#[cfg(test)]
mod test {
    use super::{ErrorKind, VtnError};
    use crate::VlanId;

    #[test]
    fn error_kinds() {
        assert_eq!(VtnError::null_argument("Tenant name").kind(), ErrorKind::BadArgument);
        assert_eq!(
            VtnError::not_found("vBridge", "vtn1/vbr1").to_string(),
            "vBridge does not exist: vtn1/vbr1"
        );
        assert_eq!(ErrorKind::InUse.to_string(), "IN_USE");
        let err: VtnError = VlanId::new(4095).unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::BadArgument);
    }
}
