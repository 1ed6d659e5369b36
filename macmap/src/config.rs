// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The allow and deny lists of a MAC mapping, and how updates to them are reconciled.

use crate::settings::MacMapSettings;
use identity::{MacMapIdentifier, ReadWriteTransaction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;
use types::{MacVlan, VlanId, VtnError, VtnResult};

/// How an update combines with the current contents of a host list
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UpdateOperation {
    /// Replace the list with the given hosts
    Set,
    /// Add the given hosts to the list
    Add,
    /// Remove the given hosts from the list
    Remove,
}

/// The host lists of a MAC mapping
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AclType {
    Allow,
    Deny,
}

/// What an update changed in the host lists of a MAC mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MacMapChange {
    pub allow_added: BTreeSet<MacVlan>,
    pub allow_removed: BTreeSet<MacVlan>,
    pub deny_added: BTreeSet<MacVlan>,
    pub deny_removed: BTreeSet<MacVlan>,
    /// Both lists are empty after the update: the mapping is to be removed.
    pub removing: bool,
}

impl MacMapChange {
    fn new(allow: ListDiff, deny: ListDiff, removing: bool) -> Self {
        Self {
            allow_added: allow.added,
            allow_removed: allow.removed,
            deny_added: deny.added,
            deny_removed: deny.removed,
            removing,
        }
    }

    /// The VLANs of the wildcard entries removed from the allow list.
    pub fn removed_wildcard_vlans(&self) -> impl Iterator<Item = VlanId> + '_ {
        self.allow_removed
            .iter()
            .filter(|h| h.is_wildcard())
            .map(MacVlan::vlan)
    }
}

/// Hosts added to and removed from one list
#[derive(Debug, Default)]
struct ListDiff {
    added: BTreeSet<MacVlan>,
    removed: BTreeSet<MacVlan>,
}

impl ListDiff {
    fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// The persisted form of a [`VtnMacMapConfig`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacMapConfigSnapshot {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<MacVlan>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub denied: Vec<MacVlan>,
}

/// The allow and deny lists of one MAC mapping.
///
/// Allowed entries may be wildcards, matching any MAC address on their VLAN. No two allowed
/// entries share a MAC address. Denied entries always carry a MAC address.
///
/// Updates are all-or-nothing: a failed update leaves the lists untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VtnMacMapConfig {
    settings: MacMapSettings,
    allowed: BTreeSet<MacVlan>,
    denied: BTreeSet<MacVlan>,
}

/// The allowed entry, other than `host`, with the same MAC address as `host`.
fn mapped_as(set: &BTreeSet<MacVlan>, host: MacVlan) -> Option<MacVlan> {
    let mac = host.mac()?;
    set.range(MacVlan::mac_range(mac))
        .copied()
        .find(|h| *h != host)
}

fn check_denied(host: MacVlan) -> VtnResult<()> {
    if host.is_wildcard() {
        Err(VtnError::bad_argument(format!(
            "{host}: denied host must have a MAC address"
        )))
    } else {
        Ok(())
    }
}

impl VtnMacMapConfig {
    #[must_use]
    pub fn new(settings: &MacMapSettings) -> Self {
        Self {
            settings: settings.clone(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty() && self.denied.is_empty()
    }

    pub fn allowed_hosts(&self) -> impl Iterator<Item = MacVlan> + '_ {
        self.allowed.iter().copied()
    }

    pub fn denied_hosts(&self) -> impl Iterator<Item = MacVlan> + '_ {
        self.denied.iter().copied()
    }

    /// The allowed entries that name a single host.
    #[must_use]
    pub fn explicit_hosts(&self) -> BTreeSet<MacVlan> {
        self.allowed
            .iter()
            .filter(|h| !h.is_wildcard())
            .copied()
            .collect()
    }

    /// The VLANs on which any host is allowed.
    #[must_use]
    pub fn wildcard_vlans(&self) -> BTreeSet<VlanId> {
        self.allowed
            .iter()
            .filter(|h| h.is_wildcard())
            .map(MacVlan::vlan)
            .collect()
    }

    #[must_use]
    pub fn is_denied(&self, host: MacVlan) -> bool {
        self.denied.contains(&host)
    }

    /// Tell if `host` may be mapped: it is not denied, and it is either allowed explicitly
    /// or its VLAN is allowed by a wildcard entry.
    #[must_use]
    pub fn is_allowed(&self, host: MacVlan) -> bool {
        !host.is_wildcard()
            && !self.is_denied(host)
            && (self.allowed.contains(&host)
                || self.allowed.contains(&MacVlan::wildcard(host.vlan())))
    }

    fn add_allowed(
        &self,
        current: &mut BTreeSet<MacVlan>,
        delta: &BTreeSet<MacVlan>,
    ) -> VtnResult<BTreeSet<MacVlan>> {
        let mut prev: Option<MacVlan> = None;
        for host in delta.iter().filter(|h| !h.is_wildcard()) {
            self.settings.check_host(*host)?;
            // ordered by MAC first: hosts sharing a MAC address are adjacent
            if let Some(p) = prev
                && p.mac() == host.mac()
            {
                return Err(VtnError::Conflict(format!(
                    "{host}: duplicate MAC address in allowed host list, also given as {p}"
                )));
            }
            prev = Some(*host);
        }

        let mut added = BTreeSet::new();
        for host in delta {
            if current.contains(host) {
                continue;
            }
            if let Some(existing) = mapped_as(current, *host) {
                return Err(VtnError::Conflict(format!(
                    "{host}: MAC address already mapped as {existing}"
                )));
            }
            current.insert(*host);
            added.insert(*host);
        }
        Ok(added)
    }

    fn reconcile_allowed(
        &self,
        current: &mut BTreeSet<MacVlan>,
        op: UpdateOperation,
        delta: &BTreeSet<MacVlan>,
    ) -> VtnResult<ListDiff> {
        let mut diff = ListDiff::default();
        match op {
            UpdateOperation::Set => {
                // leaving hosts go first, so that a host can move to another VLAN
                diff.removed = current.difference(delta).copied().collect();
                current.retain(|h| delta.contains(h));
                diff.added = self.add_allowed(current, delta)?;
            }
            UpdateOperation::Add => diff.added = self.add_allowed(current, delta)?,
            UpdateOperation::Remove => {
                diff.removed = current.intersection(delta).copied().collect();
                current.retain(|h| !delta.contains(h));
            }
        }
        Ok(diff)
    }

    fn reconcile_denied(
        &self,
        current: &mut BTreeSet<MacVlan>,
        op: UpdateOperation,
        delta: &BTreeSet<MacVlan>,
    ) -> VtnResult<ListDiff> {
        if op != UpdateOperation::Remove {
            for host in delta {
                check_denied(*host)?;
                self.settings.check_host(*host)?;
            }
        }
        let mut diff = ListDiff::default();
        match op {
            UpdateOperation::Set => {
                diff.removed = current.difference(delta).copied().collect();
                diff.added = delta.difference(current).copied().collect();
                current.clone_from(delta);
            }
            UpdateOperation::Add => {
                diff.added = delta.difference(current).copied().collect();
                current.extend(delta.iter().copied());
            }
            UpdateOperation::Remove => {
                diff.removed = current.intersection(delta).copied().collect();
                current.retain(|h| !delta.contains(h));
            }
        }
        Ok(diff)
    }

    fn apply(
        &mut self,
        allowed: BTreeSet<MacVlan>,
        denied: BTreeSet<MacVlan>,
        allow: ListDiff,
        deny: ListDiff,
    ) -> Option<MacMapChange> {
        if allow.is_empty() && deny.is_empty() {
            return None;
        }
        self.allowed = allowed;
        self.denied = denied;
        let change = MacMapChange::new(allow, deny, self.is_empty());
        debug!(
            "MAC mapping lists changed: allow +{:?} -{:?}, deny +{:?} -{:?}",
            change.allow_added, change.allow_removed, change.deny_added, change.deny_removed
        );
        Some(change)
    }

    /// Update both lists with the same operation.
    ///
    /// Returns `None` if nothing changed. On error, the lists are left untouched.
    pub fn update(
        &mut self,
        op: UpdateOperation,
        allowed: &[MacVlan],
        denied: &[MacVlan],
    ) -> VtnResult<Option<MacMapChange>> {
        let mut new_allowed = self.allowed.clone();
        let mut new_denied = self.denied.clone();
        let allow = self.reconcile_allowed(&mut new_allowed, op, &allowed.iter().copied().collect())?;
        let deny = self.reconcile_denied(&mut new_denied, op, &denied.iter().copied().collect())?;
        Ok(self.apply(new_allowed, new_denied, allow, deny))
    }

    /// Update one of the lists.
    ///
    /// Returns `None` if nothing changed. On error, the lists are left untouched.
    pub fn update_acl(
        &mut self,
        op: UpdateOperation,
        acl: AclType,
        hosts: &[MacVlan],
    ) -> VtnResult<Option<MacMapChange>> {
        match acl {
            AclType::Allow => {
                let mut new_allowed = self.allowed.clone();
                let allow =
                    self.reconcile_allowed(&mut new_allowed, op, &hosts.iter().copied().collect())?;
                let denied = self.denied.clone();
                Ok(self.apply(new_allowed, denied, allow, ListDiff::default()))
            }
            AclType::Deny => {
                let mut new_denied = self.denied.clone();
                let deny =
                    self.reconcile_denied(&mut new_denied, op, &hosts.iter().copied().collect())?;
                let allowed = self.allowed.clone();
                Ok(self.apply(allowed, new_denied, ListDiff::default(), deny))
            }
        }
    }

    /// Check the lists, as read back from storage or a file.
    pub fn verify(&self) -> VtnResult<()> {
        let mut prev: Option<MacVlan> = None;
        for host in self.allowed.iter().filter(|h| !h.is_wildcard()) {
            self.settings.check_host(*host)?;
            if let Some(p) = prev
                && p.mac() == host.mac()
            {
                return Err(VtnError::bad_argument(format!(
                    "{host}: MAC address allowed more than once, also as {p}"
                )));
            }
            prev = Some(*host);
        }
        for host in &self.denied {
            check_denied(*host)?;
            self.settings.check_host(*host)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> MacMapConfigSnapshot {
        MacMapConfigSnapshot {
            allowed: self.allowed.iter().copied().collect(),
            denied: self.denied.iter().copied().collect(),
        }
    }

    /// Rebuild the lists from their persisted form.
    pub fn from_snapshot(
        snapshot: &MacMapConfigSnapshot,
        settings: &MacMapSettings,
    ) -> VtnResult<Self> {
        let config = Self {
            settings: settings.clone(),
            allowed: snapshot.allowed.iter().copied().collect(),
            denied: snapshot.denied.iter().copied().collect(),
        };
        config.verify()?;
        Ok(config)
    }

    /// Write the lists to the store, or remove them from it if both are empty.
    pub fn submit<T>(&self, tx: &mut T, id: &MacMapIdentifier) -> VtnResult<()>
    where
        T: ReadWriteTransaction + ?Sized,
        T::Value: From<MacMapConfigSnapshot>,
    {
        if self.is_empty() {
            tx.delete(id.config_path())
        } else {
            tx.put(id.config_path(), self.snapshot().into())
        }
    }
}

#[cfg(test)]
mod test {
    use super::{AclType, MacMapConfigSnapshot, UpdateOperation, VtnMacMapConfig};
    use crate::settings::MacMapSettings;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use std::str::FromStr;
    use types::{ErrorKind, MacVlan, VlanId};

    fn h(s: &str) -> MacVlan {
        MacVlan::from_str(s).unwrap()
    }

    fn set(hosts: &[&str]) -> BTreeSet<MacVlan> {
        hosts.iter().map(|s| h(s)).collect()
    }

    #[test]
    fn add_is_idempotent() {
        let mut config = VtnMacMapConfig::default();
        let hosts = [h("00:00:00:00:00:01@10"), h("ANY@20")];
        let change = config.update(UpdateOperation::Add, &hosts, &[]).unwrap().unwrap();
        assert_eq!(change.allow_added, hosts.iter().copied().collect());
        assert!(!change.removing);
        assert_eq!(config.update(UpdateOperation::Add, &hosts, &[]).unwrap(), None);
    }

    #[test]
    fn set_empty_clears() {
        let mut config = VtnMacMapConfig::default();
        let allowed = [h("00:00:00:00:00:01@10"), h("ANY@20")];
        let denied = [h("00:00:00:00:00:02@20")];
        config.update(UpdateOperation::Add, &allowed, &denied).unwrap();

        let change = config.update(UpdateOperation::Set, &[], &[]).unwrap().unwrap();
        assert_eq!(change.allow_removed, allowed.iter().copied().collect());
        assert_eq!(change.deny_removed, denied.iter().copied().collect());
        assert!(change.allow_added.is_empty());
        assert!(change.removing);
        assert!(config.is_empty());
    }

    #[test]
    fn duplicate_mac_in_delta() {
        let mut config = VtnMacMapConfig::default();
        let hosts = [h("00:00:00:00:00:01@10"), h("00:00:00:00:00:01@20")];
        let err = config.update(UpdateOperation::Add, &hosts, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(config.is_empty());

        // the same entry twice is just one entry
        let hosts = [h("00:00:00:00:00:01@10"), h("00:00:00:00:00:01@10")];
        let change = config.update(UpdateOperation::Add, &hosts, &[]).unwrap().unwrap();
        assert_eq!(change.allow_added.len(), 1);
    }

    #[test]
    fn mac_already_mapped() {
        let mut config = VtnMacMapConfig::default();
        config
            .update(UpdateOperation::Add, &[h("00:00:00:00:00:01@10")], &[])
            .unwrap();
        let before = config.clone();
        let err = config
            .update(
                UpdateOperation::Add,
                &[h("00:00:00:00:00:02@10"), h("00:00:00:00:00:01@20")],
                &[],
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(config, before);

        // SET may move a host to another VLAN
        let change = config
            .update(UpdateOperation::Set, &[h("00:00:00:00:00:01@20")], &[])
            .unwrap()
            .unwrap();
        assert_eq!(change.allow_added, set(&["00:00:00:00:00:01@20"]));
        assert_eq!(change.allow_removed, set(&["00:00:00:00:00:01@10"]));
    }

    #[test]
    fn set_retains_common_entries() {
        let mut config = VtnMacMapConfig::default();
        config
            .update(UpdateOperation::Add, &[h("00:00:00:00:00:01@10"), h("ANY@5")], &[])
            .unwrap();
        let change = config
            .update(
                UpdateOperation::Set,
                &[h("00:00:00:00:00:01@10"), h("00:00:00:00:00:03@10")],
                &[],
            )
            .unwrap()
            .unwrap();
        assert_eq!(change.allow_added, set(&["00:00:00:00:00:03@10"]));
        assert_eq!(change.allow_removed, set(&["ANY@5"]));
        assert_eq!(
            change.removed_wildcard_vlans().collect::<Vec<_>>(),
            vec![VlanId::new(5).unwrap()]
        );
    }

    #[test]
    fn remove_ignores_absent_hosts() {
        let mut config = VtnMacMapConfig::default();
        config
            .update(UpdateOperation::Add, &[h("00:00:00:00:00:01@10")], &[])
            .unwrap();
        assert_eq!(
            config
                .update(UpdateOperation::Remove, &[h("00:00:00:00:00:09@10")], &[])
                .unwrap(),
            None
        );
        let change = config
            .update(
                UpdateOperation::Remove,
                &[h("00:00:00:00:00:01@10"), h("00:00:00:00:00:09@10")],
                &[],
            )
            .unwrap()
            .unwrap();
        assert_eq!(change.allow_removed, set(&["00:00:00:00:00:01@10"]));
        assert!(change.removing);
    }

    #[test]
    fn denied_hosts() {
        let mut config = VtnMacMapConfig::default();
        let err = config
            .update_acl(UpdateOperation::Add, AclType::Deny, &[h("ANY@10")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument);

        config
            .update_acl(UpdateOperation::Add, AclType::Allow, &[h("ANY@10")])
            .unwrap();
        let change = config
            .update_acl(
                UpdateOperation::Add,
                AclType::Deny,
                &[h("00:00:00:00:00:07@10")],
            )
            .unwrap()
            .unwrap();
        assert_eq!(change.deny_added, set(&["00:00:00:00:00:07@10"]));
        assert!(change.allow_added.is_empty());

        assert!(config.is_allowed(h("00:00:00:00:00:08@10")));
        assert!(!config.is_allowed(h("00:00:00:00:00:07@10")));
        assert!(!config.is_allowed(h("00:00:00:00:00:08@11")));
        assert!(config.is_denied(h("00:00:00:00:00:07@10")));
        assert_eq!(config.wildcard_vlans(), [VlanId::new(10).unwrap()].into());
    }

    #[test]
    fn multicast_hosts_rejected() {
        let mut config = VtnMacMapConfig::new(&MacMapSettings::default());
        let err = config
            .update(UpdateOperation::Add, &[h("01:00:5e:00:00:01@1")], &[])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument);
    }

    #[test]
    fn snapshots() {
        let snapshot = MacMapConfigSnapshot {
            allowed: vec![h("00:00:00:00:00:01@10"), h("ANY@3")],
            denied: vec![h("00:00:00:00:00:02@3")],
        };
        let config = VtnMacMapConfig::from_snapshot(&snapshot, &MacMapSettings::default()).unwrap();
        assert!(config.verify().is_ok());
        let mut expected = snapshot.clone();
        expected.allowed.sort();
        assert_eq!(config.snapshot(), expected);

        let corrupt = MacMapConfigSnapshot {
            allowed: vec![h("00:00:00:00:00:01@10"), h("00:00:00:00:00:01@11")],
            denied: vec![],
        };
        assert!(VtnMacMapConfig::from_snapshot(&corrupt, &MacMapSettings::default()).is_err());
        let corrupt = MacMapConfigSnapshot {
            allowed: vec![],
            denied: vec![h("ANY@1")],
        };
        assert!(VtnMacMapConfig::from_snapshot(&corrupt, &MacMapSettings::default()).is_err());
    }
}
