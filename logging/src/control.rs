// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Runtime control of log levels.

use ordermap::OrderMap;
use parking_lot::Mutex;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{info, warn};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{EnvFilter, Registry, prelude::*, reload};

use crate::log_target;
use crate::targets::LOG_TARGETS;

log_target!("logging", LevelFilter::INFO, &[]);

/// Errors in a log configuration string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogConfigError {
    #[error("Invalid syntax '{0}': expected tag=level")]
    Syntax(String),
    #[error("Invalid level '{0}': {1}")]
    Level(String, String),
}

/// The current settings of one log target
#[derive(Debug, Clone)]
pub struct TargetCfg {
    pub target: &'static str,
    pub name: &'static str,
    pub level: LevelFilter,
    pub tags: Vec<&'static str>,
}

impl TargetCfg {
    fn has_tag(&self, tag: &str) -> bool {
        self.name == tag || self.tags.contains(&tag)
    }
}

#[derive(Debug)]
struct TargetDb {
    default: LevelFilter,
    targets: OrderMap<&'static str, TargetCfg>,
}

impl TargetDb {
    fn new(default: LevelFilter) -> Self {
        let mut targets = OrderMap::new();
        for t in LOG_TARGETS {
            let cfg = TargetCfg {
                target: t.target,
                name: t.name,
                level: t.level,
                tags: t.tags.to_vec(),
            };
            if let Some(prior) = targets.insert(t.target, cfg) {
                warn!("Log target {} declared more than once", prior.target);
            }
        }
        Self { default, targets }
    }
    fn env_filter(&self) -> EnvFilter {
        self.targets
            .values()
            .filter_map(|t| format!("{}={}", t.target, t.level).parse::<Directive>().ok())
            .fold(EnvFilter::new(self.default.to_string()), EnvFilter::add_directive)
    }
    fn as_config_string(&self) -> String {
        let mut out = format!("default={}", self.default);
        for t in self.targets.values() {
            out += &format!(",{}={}", t.name, t.level);
        }
        out
    }
}

impl Display for TargetDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, " default level: {}", self.default)?;
        for t in self.targets.values() {
            writeln!(f, " {:<12} {:<40} {:<6} {:?}", t.name, t.target, t.level, t.tags)?;
        }
        Ok(())
    }
}

/// The process-wide log control
#[derive(Debug)]
pub struct LogControl {
    db: Mutex<TargetDb>,
    reload: Option<reload::Handle<EnvFilter, Registry>>,
}

static LOG_CONTROL: OnceLock<LogControl> = OnceLock::new();

impl LogControl {
    fn new() -> Self {
        let db = TargetDb::new(LevelFilter::INFO);
        let (filter, handle) = reload::Layer::new(db.env_filter());
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_line_number(true)
            .with_target(true)
            .with_thread_names(true)
            .with_level(true);

        // someone else (e.g. a test harness) may own the global subscriber already
        let reload = tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .is_ok()
            .then_some(handle);

        Self {
            db: Mutex::new(db),
            reload,
        }
    }

    /// Get the log control, installing the global subscriber on first use.
    pub fn get() -> &'static LogControl {
        LOG_CONTROL.get_or_init(LogControl::new)
    }

    pub fn init() {
        let ctl = Self::get();
        if ctl.reload.is_none() {
            warn!("A tracing subscriber was already installed: log levels cannot be changed");
        }
    }

    fn apply(&self, db: &TargetDb) {
        if let Some(handle) = &self.reload
            && let Err(e) = handle.reload(db.env_filter())
        {
            warn!("Failed to reload log filter: {e}");
        }
    }

    /// Set the level of every target carrying `tag` (a target's name is one of its tags).
    pub fn set_tag_level(&self, tag: &str, level: LevelFilter) {
        let mut db = self.db.lock();
        let mut changed = 0;
        for t in db.targets.values_mut().filter(|t| t.has_tag(tag)) {
            if t.level != level {
                t.level = level;
                changed += 1;
            }
        }
        if changed > 0 {
            self.apply(&db);
        }
        info!("Log level for tag '{tag}' set to {level} ({changed} targets changed)");
    }

    pub fn set_level_all(&self, level: LevelFilter) {
        let mut db = self.db.lock();
        db.targets.values_mut().for_each(|t| t.level = level);
        self.apply(&db);
    }

    pub fn set_default_level(&self, level: LevelFilter) {
        let mut db = self.db.lock();
        if db.default != level {
            db.default = level;
            self.apply(&db);
        }
    }

    #[must_use]
    pub fn default_level(&self) -> LevelFilter {
        self.db.lock().default
    }

    fn parse_config(input: &str) -> Result<Vec<(String, LevelFilter)>, LogConfigError> {
        input
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                let (tag, level) = item
                    .split_once('=')
                    .ok_or_else(|| LogConfigError::Syntax(item.to_owned()))?;
                let level = LevelFilter::from_str(level.trim())
                    .map_err(|e| LogConfigError::Level(level.trim().to_owned(), e.to_string()))?;
                Ok((tag.trim().to_owned(), level))
            })
            .collect()
    }

    /// Apply a configuration such as `default=warn,all=info,macmap=debug`.
    /// `default` sets the level of undeclared targets, `all` that of every declared target;
    /// any other key is a tag. Nothing is applied if the string is malformed.
    pub fn setup_from_string(&self, input: &str) -> Result<(), LogConfigError> {
        let config = Self::parse_config(input)?;
        for (tag, level) in &config {
            match tag.as_str() {
                "default" => self.set_default_level(*level),
                "all" => self.set_level_all(*level),
                _ => {}
            }
        }
        config
            .iter()
            .filter(|(tag, _)| tag != "default" && tag != "all")
            .for_each(|(tag, level)| self.set_tag_level(tag, *level));
        Ok(())
    }

    #[must_use]
    pub fn target(&self, target: &str) -> Option<TargetCfg> {
        self.db.lock().targets.get(target).cloned()
    }

    #[must_use]
    pub fn targets(&self) -> Vec<TargetCfg> {
        self.db.lock().targets.values().cloned().collect()
    }

    #[must_use]
    pub fn targets_by_tag(&self, tag: &str) -> Vec<TargetCfg> {
        self.db
            .lock()
            .targets
            .values()
            .filter(|t| t.has_tag(tag))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn as_config_string(&self) -> String {
        self.db.lock().as_config_string()
    }

    pub fn dump(&self) {
        info!("Log targets:\n{}", self.db.lock());
    }
}

#[cfg(test)]
mod tests {
    use super::{LogConfigError, LogControl};
    use crate::{LevelFilter, log_target};

    mod first {
        crate::log_target!("first", LevelFilter::DEBUG, &["common-tag"]);
    }
    mod second {
        crate::log_target!("second", LevelFilter::ERROR, &["common-tag"]);
    }

    #[test]
    fn targets_are_collected_at_link_time() {
        log_target!("declared-late", LevelFilter::WARN, &[]);
        let ctl = LogControl::get();
        let names: Vec<_> = ctl.targets().iter().map(|t| t.name).collect();
        assert!(names.contains(&"logging"));
        assert!(names.contains(&"first"));
        assert!(names.contains(&"second"));
        assert!(names.contains(&"declared-late"));
    }

    #[test]
    fn tag_levels() {
        let ctl = LogControl::get();
        assert_eq!(ctl.targets_by_tag("common-tag").len(), 2);
        ctl.set_tag_level("common-tag", LevelFilter::OFF);
        assert!(
            ctl.targets_by_tag("common-tag")
                .iter()
                .all(|t| t.level == LevelFilter::OFF)
        );
        ctl.setup_from_string("first=trace, second = warn").unwrap();
        assert_eq!(ctl.targets_by_tag("first")[0].level, LevelFilter::TRACE);
        assert_eq!(ctl.targets_by_tag("second")[0].level, LevelFilter::WARN);
        assert!(ctl.as_config_string().contains("first=trace"));
    }

    #[test]
    fn bad_config_strings() {
        let ctl = LogControl::get();
        assert!(matches!(
            ctl.setup_from_string("first=loud"),
            Err(LogConfigError::Level(..))
        ));
        assert!(matches!(
            ctl.setup_from_string("first=info, second"),
            Err(LogConfigError::Syntax(_))
        ));
    }
}
