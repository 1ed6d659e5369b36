// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The hosts currently mapped by a MAC mapping, and the switch ports they were seen on.

use crate::errors::{MacMapError, MacMapResult};
use identity::{MacMapIdentifier, ReadWriteTransaction};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;
use types::{Mac, MacVlan, PortVlan, SalPort, VlanId, VtnError, VtnResult};

/// Selects switch ports, e.g. those of a switch that went away.
pub trait PortFilter {
    fn accept(&self, port: &SalPort) -> bool;
}

impl<F: Fn(&SalPort) -> bool> PortFilter for F {
    fn accept(&self, port: &SalPort) -> bool {
        self(port)
    }
}

/// What [`VtnMacMapStatus::activate`] changed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MacMapActivation {
    /// The port the host was mapped on before, if it moved.
    pub old_port: Option<SalPort>,
    /// The VLAN on the old port, if no host of the mapping is left there.
    pub released: Option<PortVlan>,
    /// The VLAN on the new port, if the host is the first one of the mapping there.
    pub reserved: Option<PortVlan>,
}

/// Hosts removed from the index by a bulk operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MacMapRemoval {
    pub hosts: BTreeMap<MacVlan, SalPort>,
    pub released: BTreeSet<PortVlan>,
}

impl MacMapRemoval {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// A mapped host in a [`MacMapStatusSnapshot`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedHostEntry {
    pub host: MacVlan,
    pub port: SalPort,
}

/// The persisted form of a [`VtnMacMapStatus`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacMapStatusSnapshot {
    #[serde(default)]
    pub hosts: Vec<MappedHostEntry>,
}

/// The runtime state of one MAC mapping.
///
/// Two indexes are kept in lockstep: mapped host to port, and (port, VLAN) to the hosts
/// mapped there. A host is mapped on a single port at a time, and no two mapped hosts share
/// a MAC address.
#[derive(Clone, Debug, Default)]
pub struct VtnMacMapStatus {
    active: BTreeMap<MacVlan, SalPort>,
    ports: BTreeMap<PortVlan, BTreeSet<MacVlan>>,
    dirty: bool,
}

impl PartialEq for VtnMacMapStatus {
    fn eq(&self, other: &Self) -> bool {
        self.active == other.active
    }
}
impl Eq for VtnMacMapStatus {}

impl VtnMacMapStatus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop `host` from the bucket of `pv`. Returns `pv` if the bucket became empty.
    fn unlink(&mut self, host: MacVlan, pv: PortVlan) -> Option<PortVlan> {
        let bucket = self.ports.get_mut(&pv)?;
        bucket.remove(&host);
        if bucket.is_empty() {
            self.ports.remove(&pv);
            Some(pv)
        } else {
            None
        }
    }

    /// Record that `host` was seen on `port`.
    ///
    /// Returns `None` if the host was already mapped on that port.
    ///
    /// # Errors
    ///
    /// Fails with [`MacMapError::Duplicate`] if another host with the same MAC address is
    /// mapped, and with a bad argument error if `host` is a wildcard entry.
    pub fn activate(
        &mut self,
        mapping: &MacMapIdentifier,
        host: MacVlan,
        port: SalPort,
    ) -> MacMapResult<Option<MacMapActivation>> {
        if host.is_wildcard() {
            return Err(VtnError::bad_argument(format!("{host}: can not map a wildcard host")).into());
        }
        if let Some(existing) = self.get_duplicate(host) {
            return Err(MacMapError::Duplicate {
                host,
                mapping: mapping.clone(),
                existing,
            });
        }

        let old_port = match self.active.insert(host, port) {
            Some(old) if old == port => return Ok(None),
            old => old,
        };
        let released = old_port.and_then(|old| self.unlink(host, PortVlan::new(old, host.vlan())));
        let pv = PortVlan::new(port, host.vlan());
        let bucket = self.ports.entry(pv).or_default();
        let reserved = bucket.is_empty().then_some(pv);
        bucket.insert(host);
        self.dirty = true;

        match old_port {
            Some(old) => debug!("{mapping}: {host} moved from {old} to {port}"),
            None => debug!("{mapping}: {host} mapped on {port}"),
        }
        Ok(Some(MacMapActivation {
            old_port,
            released,
            reserved,
        }))
    }

    /// Forget `host`. Returns the port it was mapped on, if any.
    pub fn inactivate(&mut self, host: MacVlan) -> Option<SalPort> {
        let port = self.active.remove(&host)?;
        self.unlink(host, PortVlan::new(port, host.vlan()));
        self.dirty = true;
        Some(port)
    }

    /// Forget every host mapped on `pv`. Returns them, if any.
    pub fn inactivate_port(&mut self, pv: &PortVlan) -> Option<BTreeSet<MacVlan>> {
        let hosts = self.ports.remove(pv)?;
        for host in &hosts {
            self.active.remove(host);
        }
        self.dirty = true;
        Some(hosts)
    }

    /// Forget every host mapped on a port accepted by `filter`.
    pub fn inactivate_filtered<F: PortFilter + ?Sized>(&mut self, filter: &F) -> MacMapRemoval {
        let mut removal = MacMapRemoval::default();
        let gone: Vec<PortVlan> = self
            .ports
            .keys()
            .filter(|pv| filter.accept(&pv.port))
            .copied()
            .collect();
        for pv in gone {
            if let Some(hosts) = self.ports.remove(&pv) {
                for host in hosts {
                    self.active.remove(&host);
                    removal.hosts.insert(host, pv.port);
                }
                removal.released.insert(pv);
            }
        }
        if !removal.is_empty() {
            self.dirty = true;
        }
        removal
    }

    /// Forget the hosts mapped through a wildcard entry that was removed.
    ///
    /// A host is forgotten if its VLAN is in `unmapped` and it is not in `allowed`, the
    /// explicitly allowed hosts. VLANs left with no host are added to `released`.
    pub fn inactivate_unmapped(
        &mut self,
        mapping: &MacMapIdentifier,
        allowed: &BTreeSet<MacVlan>,
        unmapped: &BTreeSet<VlanId>,
        released: &mut BTreeSet<PortVlan>,
    ) -> BTreeMap<MacVlan, SalPort> {
        let gone: Vec<(MacVlan, SalPort)> = self
            .active
            .iter()
            .filter(|(host, _)| unmapped.contains(&host.vlan()) && !allowed.contains(host))
            .map(|(host, port)| (*host, *port))
            .collect();
        let mut removed = BTreeMap::new();
        for (host, port) in gone {
            self.active.remove(&host);
            released.extend(self.unlink(host, PortVlan::new(port, host.vlan())));
            debug!("{mapping}: {host} on {port} unmapped, VLAN no longer allowed");
            removed.insert(host, port);
        }
        if !removed.is_empty() {
            self.dirty = true;
        }
        removed
    }

    #[must_use]
    pub fn get_port(&self, host: MacVlan) -> Option<SalPort> {
        self.active.get(&host).copied()
    }

    /// The VLAN on the port where a host with address `mac` is mapped.
    #[must_use]
    pub fn get_port_vlan(&self, mac: Mac) -> Option<PortVlan> {
        self.active
            .range(MacVlan::mac_range(mac))
            .next()
            .map(|(host, port)| PortVlan::new(*port, host.vlan()))
    }

    /// A mapped host, other than `host`, with the same MAC address.
    #[must_use]
    pub fn get_duplicate(&self, host: MacVlan) -> Option<MacVlan> {
        let mac = host.mac()?;
        self.active
            .range(MacVlan::mac_range(mac))
            .map(|(h, _)| *h)
            .find(|h| *h != host)
    }

    #[must_use]
    pub fn has_mapping(&self, pv: &PortVlan) -> bool {
        self.ports.contains_key(pv)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// The VLANs on ports where hosts are mapped, or `None` if there is no host.
    #[must_use]
    pub fn networks(&self) -> Option<BTreeSet<PortVlan>> {
        (!self.ports.is_empty()).then(|| self.ports.keys().copied().collect())
    }

    pub fn mapped_hosts(&self) -> impl Iterator<Item = (MacVlan, SalPort)> + '_ {
        self.active.iter().map(|(h, p)| (*h, *p))
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Tell if the index changed since the last call, and clear the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    #[must_use]
    pub fn snapshot(&self) -> MacMapStatusSnapshot {
        MacMapStatusSnapshot {
            hosts: self
                .mapped_hosts()
                .map(|(host, port)| MappedHostEntry { host, port })
                .collect(),
        }
    }

    /// Rebuild the index from its persisted form.
    pub fn from_snapshot(
        snapshot: &MacMapStatusSnapshot,
        mapping: &MacMapIdentifier,
    ) -> MacMapResult<Self> {
        let mut status = Self::new();
        for entry in &snapshot.hosts {
            if status.active.contains_key(&entry.host) {
                return Err(VtnError::bad_argument(format!(
                    "{mapping}: {} mapped more than once",
                    entry.host
                ))
                .into());
            }
            status.activate(mapping, entry.host, entry.port)?;
        }
        status.dirty = false;
        Ok(status)
    }

    /// Write the index to the store if it changed since the last submit.
    pub fn submit<T>(&mut self, tx: &mut T, id: &MacMapIdentifier) -> VtnResult<()>
    where
        T: ReadWriteTransaction + ?Sized,
        T::Value: From<MacMapStatusSnapshot>,
    {
        if !self.dirty {
            return Ok(());
        }
        if self.is_empty() {
            tx.delete(id.status_path())?;
        } else {
            tx.put(id.status_path(), self.snapshot().into())?;
        }
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{MacMapActivation, MacMapStatusSnapshot, MappedHostEntry, VtnMacMapStatus};
    use crate::errors::MacMapError;
    use identity::{MacMapIdentifier, MemStore, ReadTransaction};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use std::str::FromStr;
    use types::{Mac, MacVlan, PortVlan, SalPort, VlanId, VnodeName};

    fn mapping() -> MacMapIdentifier {
        MacMapIdentifier::new(VnodeName::new("vtn1").unwrap(), VnodeName::new("vbr1").unwrap())
    }

    fn h(s: &str) -> MacVlan {
        MacVlan::from_str(s).unwrap()
    }

    fn port(n: u32) -> SalPort {
        SalPort::new(1, n).unwrap()
    }

    fn vid(v: u16) -> VlanId {
        VlanId::new(v).unwrap()
    }

    #[test]
    fn activate_and_inactivate() {
        let mut status = VtnMacMapStatus::new();
        let host = h("aa:bb:cc:00:00:01@10");
        let act = status.activate(&mapping(), host, port(1)).unwrap().unwrap();
        assert_eq!(
            act,
            MacMapActivation {
                old_port: None,
                released: None,
                reserved: Some(PortVlan::new(port(1), vid(10))),
            }
        );
        assert_eq!(status.len(), 1);
        assert!(status.has_mapping(&PortVlan::new(port(1), vid(10))));
        assert!(status.take_dirty());
        assert!(!status.is_dirty());

        assert_eq!(status.inactivate(host), Some(port(1)));
        assert!(status.is_empty());
        assert_eq!(status.networks(), None);
        assert_eq!(status.inactivate(host), None);
    }

    #[test]
    fn activation_moves_host() {
        let mut status = VtnMacMapStatus::new();
        let host = h("00:00:00:00:00:01@10");
        let other = h("00:00:00:00:00:02@10");
        status.activate(&mapping(), host, port(1)).unwrap();
        status.activate(&mapping(), other, port(1)).unwrap();

        // the old bucket still holds another host
        let act = status.activate(&mapping(), host, port(2)).unwrap().unwrap();
        assert_eq!(act.old_port, Some(port(1)));
        assert_eq!(act.released, None);
        assert_eq!(act.reserved, Some(PortVlan::new(port(2), vid(10))));

        let act = status.activate(&mapping(), other, port(2)).unwrap().unwrap();
        assert_eq!(act.old_port, Some(port(1)));
        assert_eq!(act.released, Some(PortVlan::new(port(1), vid(10))));
        assert_eq!(act.reserved, None);
        assert_eq!(status.get_port(host), Some(port(2)));
        assert!(!status.has_mapping(&PortVlan::new(port(1), vid(10))));
    }

    #[test]
    fn activation_is_idempotent() {
        let mut status = VtnMacMapStatus::new();
        let host = h("00:00:00:00:00:01@10");
        status.activate(&mapping(), host, port(1)).unwrap();
        status.take_dirty();
        assert_eq!(status.activate(&mapping(), host, port(1)).unwrap(), None);
        assert!(!status.is_dirty());
        assert_eq!(status.len(), 1);
    }

    #[test]
    fn duplicate_mac_on_activate() {
        let mut status = VtnMacMapStatus::new();
        let h1 = h("00:00:00:00:00:01@10");
        let h2 = h("00:00:00:00:00:01@20");
        status.activate(&mapping(), h1, port(1)).unwrap();
        let err = status.activate(&mapping(), h2, port(1)).unwrap_err();
        assert_eq!(
            err,
            MacMapError::Duplicate {
                host: h2,
                mapping: mapping(),
                existing: h1,
            }
        );
        assert_eq!(status.get_duplicate(h2), Some(h1));
        assert_eq!(status.get_duplicate(h1), None);
        assert_eq!(
            status.get_port_vlan(Mac::from_str("00:00:00:00:00:01").unwrap()),
            Some(PortVlan::new(port(1), vid(10)))
        );
        assert!(status.activate(&mapping(), h("ANY@10"), port(1)).is_err());
    }

    #[test]
    fn bulk_removal() {
        let mut status = VtnMacMapStatus::new();
        let a = h("00:00:00:00:00:01@10");
        let b = h("00:00:00:00:00:02@10");
        let c = h("00:00:00:00:00:03@20");
        status.activate(&mapping(), a, port(1)).unwrap();
        status.activate(&mapping(), b, port(1)).unwrap();
        status.activate(&mapping(), c, SalPort::new(2, 1).unwrap()).unwrap();

        let hosts = status.inactivate_port(&PortVlan::new(port(1), vid(10))).unwrap();
        assert_eq!(hosts, [a, b].into());
        assert_eq!(status.inactivate_port(&PortVlan::new(port(1), vid(10))), None);

        let removal = status.inactivate_filtered(&|p: &SalPort| p.node().dpid() == 2);
        assert_eq!(removal.hosts.len(), 1);
        assert_eq!(
            removal.released,
            [PortVlan::new(SalPort::new(2, 1).unwrap(), vid(20))].into()
        );
        assert!(status.is_empty());
        assert!(status.inactivate_filtered(&|_: &SalPort| true).is_empty());
    }

    #[test]
    fn sweep_unmapped_vlans() {
        let mut status = VtnMacMapStatus::new();
        let h1 = h("00:00:00:00:00:01@30");
        let h2 = h("00:00:00:00:00:02@30");
        let h3 = h("00:00:00:00:00:03@40");
        status.activate(&mapping(), h1, port(1)).unwrap();
        status.activate(&mapping(), h2, port(2)).unwrap();
        status.activate(&mapping(), h3, port(1)).unwrap();

        let mut released = BTreeSet::new();
        let removed =
            status.inactivate_unmapped(&mapping(), &[h2].into(), &[vid(30)].into(), &mut released);
        assert_eq!(removed.into_iter().collect::<Vec<_>>(), vec![(h1, port(1))]);
        assert_eq!(released, [PortVlan::new(port(1), vid(30))].into());
        assert_eq!(status.get_port(h2), Some(port(2)));
        assert_eq!(status.get_port(h3), Some(port(1)));
        assert_eq!(status.len(), 2);
    }

    #[test]
    fn snapshots_and_submit() {
        let store = MemStore::<MacMapStatusSnapshot>::new();
        let mut status = VtnMacMapStatus::new();
        status.activate(&mapping(), h("00:00:00:00:00:01@30"), port(1)).unwrap();

        let mut tx = store.rw_tx();
        status.submit(&mut tx, &mapping()).unwrap();
        store.commit(tx).unwrap();
        assert!(!status.is_dirty());
        // clean index: nothing to write
        let mut tx = store.rw_tx();
        status.submit(&mut tx, &mapping()).unwrap();
        store.commit(tx).unwrap();

        let snapshot = store.read_tx().read(mapping().status_path()).unwrap().unwrap();
        let restored = VtnMacMapStatus::from_snapshot(&snapshot, &mapping()).unwrap();
        assert_eq!(restored, status);
        assert!(!restored.is_dirty());

        let dup = MacMapStatusSnapshot {
            hosts: vec![
                MappedHostEntry {
                    host: h("00:00:00:00:00:01@30"),
                    port: port(1),
                },
                MappedHostEntry {
                    host: h("00:00:00:00:00:01@30"),
                    port: port(2),
                },
            ],
        };
        assert!(VtnMacMapStatus::from_snapshot(&dup, &mapping()).is_err());

        status.inactivate(h("00:00:00:00:00:01@30"));
        let mut tx = store.rw_tx();
        status.submit(&mut tx, &mapping()).unwrap();
        store.commit(tx).unwrap();
        assert!(store.is_empty());
    }
}
