// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Compute-once cells for the derived forms of identifiers.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// A value derived from the immutable fields of its owner, computed on first access.
///
/// A `Memo` never takes part in the identity of its owner: all memos compare equal and
/// hash to nothing, so owners can derive `Eq`, `Ord` and `Hash`.
#[derive(Clone, Default)]
pub(crate) struct Memo<T>(OnceLock<T>);

impl<T> Memo<T> {
    pub(crate) fn get_or_init(&self, init: impl FnOnce() -> T) -> &T {
        self.0.get_or_init(init)
    }
}

impl<T> PartialEq for Memo<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}
impl<T> Eq for Memo<T> {}

impl<T> PartialOrd for Memo<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for Memo<T> {
    fn cmp(&self, _other: &Self) -> Ordering {
        Ordering::Equal
    }
}

impl<T> Hash for Memo<T> {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

impl<T> std::fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("..")
    }
}
