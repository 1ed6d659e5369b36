// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Link-time registry of the log targets of every crate linked in.

use crate::LevelFilter;
use linkme::distributed_slice;

/// A log target declared with [`log_target!`](crate::log_target)
#[derive(Debug)]
pub struct LogTarget {
    pub(crate) target: &'static str,
    pub(crate) name: &'static str,
    pub(crate) level: LevelFilter,
    pub(crate) tags: &'static [&'static str],
}

impl LogTarget {
    #[must_use]
    pub const fn new(
        target: &'static str,
        name: &'static str,
        level: LevelFilter,
        tags: &'static [&'static str],
    ) -> Self {
        Self {
            target,
            name,
            level,
            tags,
        }
    }
}

#[allow(unsafe_code)] // linkme places the slice in a dedicated link section
#[distributed_slice]
pub static LOG_TARGETS: [LogTarget];

/// Declare the log target of the calling module, with a short name, its default level
/// and the tags it can be addressed by.
///
/// The declaration lives in its own const scope so that the macro can be used several times
/// in the same crate without the statics clashing.
#[macro_export]
macro_rules! log_target {
    ($name:expr, $level:expr, $tags:expr) => {
        const _: () = {
            use $crate::linkme::distributed_slice;
            use $crate::LevelFilter;
            use $crate::targets::{LOG_TARGETS, LogTarget};

            #[allow(unsafe_code)] // linkme places the entry in a dedicated link section
            #[distributed_slice(LOG_TARGETS)]
            #[linkme(crate = $crate::linkme)]
            static LOG_TGT: LogTarget = LogTarget::new(module_path!(), $name, $level, $tags);
        };
    };
}
