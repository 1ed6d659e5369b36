// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Names shared by all identifiers, and the checks applied when building them.

use crate::memo::Memo;
use crate::storepath::{PathSegment, StorePath};
use crate::vnode::VNodeType;
use types::{VnodeName, VtnError, VtnResult};

/// Text standing for a missing component in canonical identifier strings.
pub const NULL_COMPONENT: &str = "<null>";

/// The names of an identifier and the memoized forms derived from the whole identifier.
///
/// `bridge` holds the name of the vBridge or vTerminal, depending on the identifier type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct PathName {
    pub(crate) tenant: Option<VnodeName>,
    pub(crate) bridge: Option<VnodeName>,
    pub(crate) interface: Option<VnodeName>,
    pub(crate) text: Memo<String>,
    pub(crate) path: Memo<StorePath>,
}

impl PathName {
    pub(crate) fn new(
        tenant: Option<VnodeName>,
        bridge: Option<VnodeName>,
        interface: Option<VnodeName>,
    ) -> Self {
        Self {
            tenant,
            bridge,
            interface,
            ..Default::default()
        }
    }

    pub(crate) fn tenant_path(&self) -> StorePath {
        StorePath::vtns().child(PathSegment::Vtn(self.tenant.clone()))
    }

    pub(crate) fn bridge_path(&self) -> StorePath {
        self.tenant_path()
            .child(PathSegment::Vbridge(self.bridge.clone()))
    }

    pub(crate) fn terminal_path(&self) -> StorePath {
        self.tenant_path()
            .child(PathSegment::Vterminal(self.bridge.clone()))
    }
}

pub(crate) fn component(name: Option<&VnodeName>) -> Option<String> {
    name.map(ToString::to_string)
}

pub(crate) fn render(ty: VNodeType, components: &[Option<String>]) -> String {
    let parts: Vec<&str> = components
        .iter()
        .map(|c| c.as_deref().unwrap_or(NULL_COMPONENT))
        .collect();
    format!("{ty}:{}", parts.join("/"))
}

/// Validate an optional raw name taken from a canonical string.
pub(crate) fn raw_name(raw: Option<&str>) -> VtnResult<Option<VnodeName>> {
    Ok(raw.map(VnodeName::new).transpose()?)
}

/// Validates the names given to an identifier constructor, one level at a time.
///
/// On the lookup path an illegal name can never have been created, so it is reported as
/// not found. On the create path it is a bad argument.
pub(crate) struct NameChecker {
    find: bool,
    path: Vec<String>,
}

impl NameChecker {
    pub(crate) fn new(find: bool) -> Self {
        Self {
            find,
            path: Vec::new(),
        }
    }

    pub(crate) fn check(&mut self, ty: VNodeType, name: Option<&str>) -> VtnResult<VnodeName> {
        let Some(raw) = name else {
            return Err(VtnError::null_argument(&format!("{} name", ty.description())));
        };
        self.path.push(raw.to_owned());
        VnodeName::new(raw).map_err(|e| {
            if self.find {
                VtnError::not_found(ty.description(), self.path.join("/"))
            } else {
                VtnError::bad_argument(format!("{} name is invalid: {e}", ty.description()))
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::{NameChecker, render};
    use crate::vnode::VNodeType;
    use types::ErrorKind;

    #[test]
    fn find_and_create_policies() {
        let mut lookup = NameChecker::new(true);
        assert!(lookup.check(VNodeType::Vtn, Some("vtn1")).is_ok());
        let err = lookup.check(VNodeType::VBridge, Some("bad-name")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "vBridge does not exist: vtn1/bad-name");
        assert_eq!(
            lookup.check(VNodeType::VBridge, Some("")).unwrap_err().kind(),
            ErrorKind::NotFound
        );

        let mut create = NameChecker::new(false);
        let err = create.check(VNodeType::Vtn, Some("bad-name")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument);

        for find in [true, false] {
            let err = NameChecker::new(find).check(VNodeType::Vtn, None).unwrap_err();
            assert_eq!(err.to_string(), "Bad argument: VTN name cannot be null");
        }
    }

    #[test]
    fn rendering() {
        let comps = [Some("vtn1".to_owned()), None];
        assert_eq!(render(VNodeType::VBridge, &comps), "VBRIDGE:vtn1/<null>");
    }
}
