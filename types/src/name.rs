// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Names of virtual nodes.

use std::fmt::Display;
use std::sync::Arc;

/// The name of a virtual node (tenant, bridge, terminal or interface).
///
/// A legal name has 1 to [`VnodeName::MAX_LEN`] characters, starts with an ASCII
/// alphanumeric character and continues with ASCII alphanumerics or `_`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VnodeName(Arc<str>);

/// Reasons for a name to be rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("name cannot be empty")]
    Empty,
    #[error("'{0}': name is too long")]
    TooLong(String),
    #[error("'{0}': name contains invalid characters")]
    Invalid(String),
}

impl VnodeName {
    /// Maximum number of characters in a name.
    pub const MAX_LEN: usize = 31;

    /// Validate `name` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] if the name is not legal.
    pub fn new(name: &str) -> Result<Self, NameError> {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return Err(NameError::Empty);
        };
        if name.len() > Self::MAX_LEN {
            return Err(NameError::TooLong(name.to_owned()));
        }
        if !first.is_ascii_alphanumeric() || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(NameError::Invalid(name.to_owned()));
        }
        Ok(Self(Arc::from(name)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for VnodeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for VnodeName {
    type Error = NameError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        VnodeName::new(value)
    }
}

impl TryFrom<String> for VnodeName {
    type Error = NameError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        VnodeName::new(&value)
    }
}

impl From<VnodeName> for String {
    fn from(value: VnodeName) -> Self {
        value.0.to_string()
    }
}

impl Display for VnodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use crate::name::VnodeName;
    use bolero::{Driver, TypeGenerator};
    use std::ops::Bound;

    const ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    impl TypeGenerator for VnodeName {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let len = u.gen_usize(Bound::Included(&1), Bound::Included(&VnodeName::MAX_LEN))?;
            let mut name = String::with_capacity(len);
            for i in 0..len {
                let pick = u.gen_usize(Bound::Included(&0), Bound::Included(&ALNUM.len()))?;
                // index ALNUM.len() stands for '_', never legal as first character
                match ALNUM.get(pick) {
                    Some(c) => name.push(char::from(*c)),
                    None if i > 0 => name.push('_'),
                    None => name.push('v'),
                }
            }
            VnodeName::new(&name).ok()
        }
    }
}

#[cfg(test)]
mod test {
    use super::{NameError, VnodeName};

    #[test]
    fn name_rules() {
        assert!(VnodeName::new("vtn_1").is_ok());
        assert!(VnodeName::new("1").is_ok());
        assert_eq!(VnodeName::new(""), Err(NameError::Empty));
        assert!(matches!(VnodeName::new("_vtn"), Err(NameError::Invalid(_))));
        assert!(matches!(VnodeName::new("vtn-1"), Err(NameError::Invalid(_))));
        assert!(matches!(VnodeName::new("a/b"), Err(NameError::Invalid(_))));
        assert!(VnodeName::new(&"a".repeat(31)).is_ok());
        assert!(matches!(VnodeName::new(&"a".repeat(32)), Err(NameError::TooLong(_))));
    }

    #[test]
    fn generated_names_are_legal() {
        bolero::check!().with_type().for_each(|name: &VnodeName| {
            assert_eq!(VnodeName::new(name.as_str()).as_ref(), Ok(name));
        });
    }
}
