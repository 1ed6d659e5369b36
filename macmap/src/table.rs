// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! All the MAC mappings of the virtual network.
//!
//! The table keeps, next to the configuration and runtime state of every mapping, a global
//! index of mapped hosts and the owner of every VLAN on a switch port used by a virtual
//! mapping. A host is mapped by at most one MAC mapping, and a VLAN on a port belongs to at
//! most one virtual node.

use crate::config::{AclType, MacMapChange, UpdateOperation, VtnMacMapConfig};
use crate::data::MacMapData;
use crate::errors::{MacMapError, MacMapResult};
use crate::settings::MacMapSettings;
use crate::status::{MacMapActivation, MacMapRemoval, PortFilter, VtnMacMapStatus};
use identity::{
    MacMapHostIdentifier, MacMapIdentifier, ReadTransaction, ReadWriteTransaction,
    VNodeIdentifier,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};
use types::{MacVlan, PortVlan, SalPort, VtnError, VtnResult};

#[derive(Debug)]
struct MacMapEntry {
    config: VtnMacMapConfig,
    status: VtnMacMapStatus,
    config_dirty: bool,
}

impl MacMapEntry {
    fn new(config: VtnMacMapConfig, status: VtnMacMapStatus) -> Self {
        Self {
            config,
            status,
            config_dirty: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct MacMapTable {
    settings: MacMapSettings,
    maps: BTreeMap<MacMapIdentifier, MacMapEntry>,
    hosts: BTreeMap<MacVlan, MacMapIdentifier>,
    reservations: BTreeMap<PortVlan, VNodeIdentifier>,
    removed: BTreeSet<MacMapIdentifier>,
}

/// Give back the reservations of `owner` in `released`.
fn drop_reservations(
    reservations: &mut BTreeMap<PortVlan, VNodeIdentifier>,
    released: impl IntoIterator<Item = PortVlan>,
    owner: &VNodeIdentifier,
) {
    for pv in released {
        if reservations.get(&pv) == Some(owner) {
            reservations.remove(&pv);
            debug!("{pv} released by {owner}");
        }
    }
}

impl MacMapTable {
    #[must_use]
    pub fn new(settings: MacMapSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn settings(&self) -> &MacMapSettings {
        &self.settings
    }

    #[must_use]
    pub fn config(&self, id: &MacMapIdentifier) -> Option<&VtnMacMapConfig> {
        self.maps.get(id).map(|e| &e.config)
    }

    #[must_use]
    pub fn status(&self, id: &MacMapIdentifier) -> Option<&VtnMacMapStatus> {
        self.maps.get(id).map(|e| &e.status)
    }

    pub fn mappings(&self) -> impl Iterator<Item = &MacMapIdentifier> {
        self.maps.keys()
    }

    /// The MAC mapping `host` is mapped by, if any.
    #[must_use]
    pub fn mapping_of(&self, host: MacVlan) -> Option<&MacMapIdentifier> {
        self.hosts.get(&host)
    }

    /// The virtual node the VLAN on a port is reserved by, if any.
    #[must_use]
    pub fn owner(&self, pv: &PortVlan) -> Option<&VNodeIdentifier> {
        self.reservations.get(pv)
    }

    /// Update both host lists of a MAC mapping, creating the mapping if needed.
    ///
    /// Hosts that are no longer allowed are unmapped. The mapping is removed if both of its
    /// lists become empty.
    pub fn configure(
        &mut self,
        id: &MacMapIdentifier,
        op: UpdateOperation,
        allowed: &[MacVlan],
        denied: &[MacVlan],
    ) -> VtnResult<Option<MacMapChange>> {
        self.reconfigure(id, |config| config.update(op, allowed, denied))
    }

    /// Update one host list of a MAC mapping. See [`MacMapTable::configure`].
    pub fn configure_acl(
        &mut self,
        id: &MacMapIdentifier,
        op: UpdateOperation,
        acl: AclType,
        hosts: &[MacVlan],
    ) -> VtnResult<Option<MacMapChange>> {
        self.reconfigure(id, |config| config.update_acl(op, acl, hosts))
    }

    fn reconfigure<F>(&mut self, id: &MacMapIdentifier, update: F) -> VtnResult<Option<MacMapChange>>
    where
        F: FnOnce(&mut VtnMacMapConfig) -> VtnResult<Option<MacMapChange>>,
    {
        let mut entry = self.maps.remove(id).unwrap_or_else(|| {
            MacMapEntry::new(VtnMacMapConfig::new(&self.settings), VtnMacMapStatus::new())
        });
        let change = match update(&mut entry.config) {
            Ok(Some(change)) => change,
            other => {
                if let Err(e) = &other {
                    debug!("{id}: update rejected: {e}");
                }
                if !entry.config.is_empty() {
                    self.maps.insert(id.clone(), entry);
                }
                return other;
            }
        };

        self.unmap_disallowed(id, &mut entry, &change);
        entry.config_dirty = true;
        if change.removing {
            debug!("{id}: MAC mapping removed");
            self.removed.insert(id.clone());
        } else {
            self.maps.insert(id.clone(), entry);
        }
        Ok(Some(change))
    }

    /// Unmap the hosts of `entry` that `change` made not allowed.
    fn unmap_disallowed(
        &mut self,
        id: &MacMapIdentifier,
        entry: &mut MacMapEntry,
        change: &MacMapChange,
    ) {
        let mut released = BTreeSet::new();
        let mut gone = BTreeMap::new();
        if change.removing {
            let all = entry.status.inactivate_filtered(&|_: &SalPort| true);
            released.extend(all.released);
            gone.extend(all.hosts);
        } else {
            let explicit = entry.config.explicit_hosts();
            let candidates = change
                .allow_removed
                .iter()
                .filter(|h| !h.is_wildcard())
                .chain(&change.deny_added);
            for host in candidates {
                if entry.config.is_allowed(*host) {
                    continue;
                }
                if let Some(port) = entry.status.inactivate(*host) {
                    let pv = PortVlan::new(port, host.vlan());
                    if !entry.status.has_mapping(&pv) {
                        released.insert(pv);
                    }
                    gone.insert(*host, port);
                }
            }
            let unmapped = change.removed_wildcard_vlans().collect::<BTreeSet<_>>();
            if !unmapped.is_empty() {
                gone.extend(entry.status.inactivate_unmapped(
                    id,
                    &explicit,
                    &unmapped,
                    &mut released,
                ));
            }
        }

        for (host, port) in &gone {
            self.hosts.remove(host);
            debug!("{id}: {host} on {port} is no longer allowed");
        }
        drop_reservations(
            &mut self.reservations,
            released,
            &VNodeIdentifier::from(id.clone()),
        );
    }

    /// Map `host`, seen on `port`, with the MAC mapping `id`.
    ///
    /// Returns `None` if the host was already mapped on that port.
    pub fn map_host(
        &mut self,
        id: &MacMapIdentifier,
        host: MacVlan,
        port: SalPort,
    ) -> MacMapResult<Option<MacMapActivation>> {
        let Some(entry) = self.maps.get_mut(id) else {
            return Err(VtnError::not_found(MacMapIdentifier::TYPE.description(), id).into());
        };
        if !entry.config.is_allowed(host) {
            return Err(VtnError::bad_argument(format!("{host}: not allowed by {id}")).into());
        }
        if let Some(other) = self.hosts.get(&host)
            && other != id
        {
            return Err(MacMapError::Conflict {
                host,
                mapping: other.clone(),
            });
        }
        let owner = VNodeIdentifier::from(id.clone());
        let pv = PortVlan::new(port, host.vlan());
        if let Some(holder) = self.reservations.get(&pv)
            && *holder != owner
        {
            return Err(MacMapError::PortBusy {
                host,
                mapping: id.clone(),
                port_vlan: pv,
                owner: holder.clone(),
            });
        }

        let activation = entry.status.activate(id, host, port)?;
        if let Some(act) = &activation {
            drop_reservations(&mut self.reservations, act.released, &owner);
            if let Some(reserved) = act.reserved {
                debug!("{reserved} reserved by {owner}");
                self.reservations.insert(reserved, owner);
            }
            self.hosts.insert(host, id.clone());
        }
        Ok(activation)
    }

    /// Unmap a host. Returns the port it was mapped on.
    pub fn unmap_host(&mut self, host_id: &MacMapHostIdentifier) -> MacMapResult<SalPort> {
        let id = host_id.mac_map();
        let host = host_id.host();
        let gone = || MacMapError::Gone {
            host,
            mapping: id.clone(),
        };
        let entry = self.maps.get_mut(&id).ok_or_else(gone)?;
        let port = entry.status.inactivate(host).ok_or_else(gone)?;
        let pv = PortVlan::new(port, host.vlan());
        if !entry.status.has_mapping(&pv) {
            drop_reservations(&mut self.reservations, [pv], &VNodeIdentifier::from(id.clone()));
        }
        self.hosts.remove(&host);
        Ok(port)
    }

    /// Unmap every host seen on a port accepted by `filter`, in all mappings.
    pub fn port_down<F: PortFilter + ?Sized>(
        &mut self,
        filter: &F,
    ) -> BTreeMap<MacMapIdentifier, MacMapRemoval> {
        let mut removals = BTreeMap::new();
        for (id, entry) in &mut self.maps {
            let removal = entry.status.inactivate_filtered(filter);
            if removal.is_empty() {
                continue;
            }
            for host in removal.hosts.keys() {
                self.hosts.remove(host);
            }
            drop_reservations(
                &mut self.reservations,
                removal.released.iter().copied(),
                &VNodeIdentifier::from(id.clone()),
            );
            debug!("{id}: {} hosts unmapped on port down", removal.hosts.len());
            removals.insert(id.clone(), removal);
        }
        removals
    }

    /// Reserve the VLAN on a port for a virtual node.
    ///
    /// # Errors
    ///
    /// Fails with `InUse` if it is reserved by another virtual node.
    pub fn reserve(&mut self, pv: PortVlan, owner: VNodeIdentifier) -> VtnResult<()> {
        match self.reservations.get(&pv) {
            Some(holder) if *holder != owner => {
                warn!("{owner} can not reserve {pv}: reserved by {holder}");
                Err(VtnError::InUse(format!("{pv} is reserved by {holder}")))
            }
            Some(_) => Ok(()),
            None => {
                self.reservations.insert(pv, owner);
                Ok(())
            }
        }
    }

    /// Give back a VLAN on a port. Returns false if `owner` did not hold it.
    pub fn release(&mut self, pv: &PortVlan, owner: &VNodeIdentifier) -> bool {
        if self.reservations.get(pv) == Some(owner) {
            self.reservations.remove(pv);
            true
        } else {
            false
        }
    }

    /// Write all the changes since the last submit to the store.
    pub fn submit<T>(&mut self, tx: &mut T) -> VtnResult<()>
    where
        T: ReadWriteTransaction + ?Sized,
        T::Value: From<crate::config::MacMapConfigSnapshot>
            + From<crate::status::MacMapStatusSnapshot>,
    {
        for id in &self.removed {
            tx.delete(id.store_path())?;
        }
        self.removed.clear();
        for (id, entry) in &mut self.maps {
            if entry.config_dirty {
                entry.config.submit(tx, id)?;
                entry.config_dirty = false;
            }
            if self.settings.persist_status {
                entry.status.submit(tx, id)?;
            } else {
                entry.status.take_dirty();
            }
        }
        Ok(())
    }

    fn adopt(
        &mut self,
        id: MacMapIdentifier,
        config: VtnMacMapConfig,
        status: VtnMacMapStatus,
    ) -> MacMapResult<()> {
        if config.is_empty() {
            return Ok(());
        }
        let owner = VNodeIdentifier::from(id.clone());
        for (host, _) in status.mapped_hosts() {
            if !config.is_allowed(host) {
                return Err(VtnError::bad_argument(format!("{host}: not allowed by {id}")).into());
            }
            if let Some(other) = self.hosts.get(&host) {
                return Err(MacMapError::Conflict {
                    host,
                    mapping: other.clone(),
                });
            }
            self.hosts.insert(host, id.clone());
        }
        for pv in status.networks().unwrap_or_default() {
            self.reserve(pv, owner.clone())?;
        }
        self.maps.insert(id, MacMapEntry::new(config, status));
        Ok(())
    }

    /// Rebuild the table from what the mappings `ids` keep in the store.
    pub fn restore<T>(
        settings: MacMapSettings,
        tx: &T,
        ids: impl IntoIterator<Item = MacMapIdentifier>,
    ) -> MacMapResult<Self>
    where
        T: ReadTransaction<Value = MacMapData> + ?Sized,
    {
        let mut table = Self::new(settings);
        for id in ids {
            let config = match tx.read(id.config_path())? {
                Some(MacMapData::Config(snapshot)) => {
                    VtnMacMapConfig::from_snapshot(&snapshot, &table.settings)?
                }
                Some(MacMapData::Status(_)) => {
                    return Err(VtnError::bad_argument(format!(
                        "{id}: unexpected data at {}",
                        id.config_path()
                    ))
                    .into());
                }
                None => continue,
            };
            let status = match tx.read(id.status_path())? {
                Some(MacMapData::Status(snapshot)) => VtnMacMapStatus::from_snapshot(&snapshot, &id)?,
                Some(MacMapData::Config(_)) => {
                    return Err(VtnError::bad_argument(format!(
                        "{id}: unexpected data at {}",
                        id.status_path()
                    ))
                    .into());
                }
                None => VtnMacMapStatus::new(),
            };
            table.adopt(id, config, status)?;
        }
        for entry in table.maps.values_mut() {
            entry.config_dirty = false;
        }
        debug!("Restored {} MAC mappings", table.maps.len());
        Ok(table)
    }

    /// Build a table from the mappings of a configuration file.
    pub fn from_file(file: &crate::file::MacMapConfigFile) -> VtnResult<Self> {
        let mut table = Self::new(file.settings.clone());
        for (id, config) in file.configs()? {
            table.adopt(id, config, VtnMacMapStatus::new())?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod test {
    use super::MacMapTable;
    use crate::config::{AclType, UpdateOperation};
    use crate::data::MacMapData;
    use crate::errors::MacMapError;
    use crate::settings::{MacMapSettings, MacMapSettingsBuilder};
    use identity::{
        MacMapIdentifier, MemStore, ReadTransaction, VNodeIdentifier, VlanMapId,
        VlanMapIdentifier,
    };
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use tracing_test::traced_test;
    use types::{ErrorKind, MacVlan, PortVlan, SalPort, VlanId, VnodeName, VtnError};

    fn mapping(bridge: &str) -> MacMapIdentifier {
        MacMapIdentifier::new(VnodeName::new("vtn1").unwrap(), VnodeName::new(bridge).unwrap())
    }

    fn h(s: &str) -> MacVlan {
        MacVlan::from_str(s).unwrap()
    }

    fn port(n: u32) -> SalPort {
        SalPort::new(1, n).unwrap()
    }

    fn pv(n: u32, vlan: u16) -> PortVlan {
        PortVlan::new(port(n), VlanId::new(vlan).unwrap())
    }

    #[test]
    #[traced_test]
    fn end_to_end() {
        let mut table = MacMapTable::new(MacMapSettings::default());
        let id = mapping("vbr1");
        let host = h("aa:bb:cc:00:00:01@10");

        let change = table
            .configure(&id, UpdateOperation::Add, &[host], &[])
            .unwrap()
            .unwrap();
        assert_eq!(change.allow_added, [host].into());

        table.map_host(&id, host, port(1)).unwrap().unwrap();
        assert_eq!(table.status(&id).unwrap().len(), 1);
        assert!(table.status(&id).unwrap().has_mapping(&pv(1, 10)));
        assert_eq!(table.mapping_of(host), Some(&id));
        assert_eq!(table.owner(&pv(1, 10)), Some(&VNodeIdentifier::from(id.clone())));

        assert_eq!(table.unmap_host(&id.host(host)).unwrap(), port(1));
        assert!(table.status(&id).unwrap().is_empty());
        assert_eq!(table.owner(&pv(1, 10)), None);
        assert_eq!(table.mapping_of(host), None);

        let err = table.unmap_host(&id.host(host)).unwrap_err();
        assert_eq!(VtnError::from(err).kind(), ErrorKind::Gone);
    }

    #[test]
    #[traced_test]
    fn map_host_checks() {
        let mut table = MacMapTable::new(MacMapSettings::default());
        let vbr1 = mapping("vbr1");
        let vbr2 = mapping("vbr2");
        let host = h("00:00:00:00:00:01@10");

        let err = table.map_host(&vbr1, host, port(1)).unwrap_err();
        assert_eq!(VtnError::from(err).kind(), ErrorKind::NotFound);

        table.configure(&vbr1, UpdateOperation::Add, &[h("ANY@10")], &[h("00:00:00:00:00:09@10")]).unwrap();
        table.configure(&vbr2, UpdateOperation::Add, &[host], &[]).unwrap();

        let err = table.map_host(&vbr1, h("00:00:00:00:00:09@10"), port(1)).unwrap_err();
        assert_eq!(VtnError::from(err).kind(), ErrorKind::BadArgument);
        let err = table.map_host(&vbr1, h("00:00:00:00:00:01@11"), port(1)).unwrap_err();
        assert_eq!(VtnError::from(err).kind(), ErrorKind::BadArgument);

        table.map_host(&vbr1, host, port(1)).unwrap();
        let err = table.map_host(&vbr2, host, port(2)).unwrap_err();
        assert_eq!(
            err,
            MacMapError::Conflict {
                host,
                mapping: vbr1.clone(),
            }
        );

        let vmap: VNodeIdentifier = VlanMapIdentifier::new(
            VnodeName::new("vtn1").unwrap(),
            VnodeName::new("vbr3").unwrap(),
            VlanMapId::new(None, VlanId::new(10).unwrap()),
        )
        .into();
        table.reserve(pv(5, 10), vmap.clone()).unwrap();
        let err = table.map_host(&vbr1, h("00:00:00:00:00:02@10"), port(5)).unwrap_err();
        assert!(matches!(err, MacMapError::PortBusy { ref owner, .. } if *owner == vmap));
        assert_eq!(VtnError::from(err).kind(), ErrorKind::InUse);

        // the mapping already holds the VLAN on port 1
        let err = table.reserve(pv(1, 10), vmap.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InUse);
        assert!(table.release(&pv(5, 10), &vmap));
        assert!(!table.release(&pv(5, 10), &vmap));
        table.map_host(&vbr1, h("00:00:00:00:00:02@10"), port(5)).unwrap();
    }

    #[test]
    #[traced_test]
    fn duplicate_mac_in_mapping() {
        let mut table = MacMapTable::new(MacMapSettings::default());
        let id = mapping("vbr1");
        table.configure(&id, UpdateOperation::Add, &[h("ANY@10"), h("ANY@20")], &[]).unwrap();
        table.map_host(&id, h("00:00:00:00:00:01@10"), port(1)).unwrap();
        let err = table.map_host(&id, h("00:00:00:00:00:01@20"), port(1)).unwrap_err();
        assert!(matches!(err, MacMapError::Duplicate { existing, .. } if existing == h("00:00:00:00:00:01@10")));
        assert_eq!(table.map_host(&id, h("00:00:00:00:00:01@10"), port(1)).unwrap(), None);
    }

    #[test]
    #[traced_test]
    fn reconfigure_unmaps_hosts() {
        let mut table = MacMapTable::new(MacMapSettings::default());
        let id = mapping("vbr1");
        let h1 = h("00:00:00:00:00:01@30");
        let h2 = h("00:00:00:00:00:02@30");
        let h3 = h("00:00:00:00:00:03@40");
        let h4 = h("00:00:00:00:00:04@40");
        table
            .configure(&id, UpdateOperation::Add, &[h("ANY@30"), h2, h("ANY@40"), h4], &[])
            .unwrap();
        for (n, host) in [h1, h2, h3, h4].into_iter().enumerate() {
            table.map_host(&id, host, port(u32::try_from(n).unwrap() + 1)).unwrap();
        }

        // the wildcard on VLAN 30 goes away: h2 is still allowed explicitly
        table
            .configure_acl(&id, UpdateOperation::Remove, AclType::Allow, &[h("ANY@30")])
            .unwrap()
            .unwrap();
        assert_eq!(table.mapping_of(h1), None);
        assert_eq!(table.owner(&pv(1, 30)), None);
        assert_eq!(table.mapping_of(h2), Some(&id));

        // h4 is still allowed by the wildcard, h3 gets denied
        table.configure_acl(&id, UpdateOperation::Remove, AclType::Allow, &[h4]).unwrap();
        assert_eq!(table.mapping_of(h4), Some(&id));
        table.configure_acl(&id, UpdateOperation::Add, AclType::Deny, &[h3]).unwrap();
        assert_eq!(table.mapping_of(h3), None);
        assert_eq!(table.status(&id).unwrap().len(), 2);

        // emptying the lists removes the mapping
        let change = table.configure(&id, UpdateOperation::Set, &[], &[]).unwrap().unwrap();
        assert!(change.removing);
        assert!(table.config(&id).is_none());
        assert_eq!(table.mapping_of(h2), None);
        assert_eq!(table.owner(&pv(2, 30)), None);
        assert_eq!(table.mappings().count(), 0);
    }

    #[test]
    #[traced_test]
    fn rejected_update_keeps_state() {
        let mut table = MacMapTable::new(MacMapSettings::default());
        let id = mapping("vbr1");
        let err = table
            .configure(&id, UpdateOperation::Add, &[], &[h("ANY@1")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument);
        assert!(table.config(&id).is_none());

        table.configure(&id, UpdateOperation::Add, &[h("00:00:00:00:00:01@1")], &[]).unwrap();
        let before = table.config(&id).cloned();
        assert!(table
            .configure(&id, UpdateOperation::Add, &[h("00:00:00:00:00:01@2")], &[])
            .is_err());
        assert_eq!(table.config(&id).cloned(), before);
        assert_eq!(table.configure(&id, UpdateOperation::Remove, &[h("00:00:00:00:00:05@1")], &[]).unwrap(), None);
    }

    #[test]
    #[traced_test]
    fn port_down() {
        let mut table = MacMapTable::new(MacMapSettings::default());
        let vbr1 = mapping("vbr1");
        let vbr2 = mapping("vbr2");
        table.configure(&vbr1, UpdateOperation::Add, &[h("ANY@10")], &[]).unwrap();
        table.configure(&vbr2, UpdateOperation::Add, &[h("ANY@20")], &[]).unwrap();
        table.map_host(&vbr1, h("00:00:00:00:00:01@10"), port(1)).unwrap();
        table.map_host(&vbr2, h("00:00:00:00:00:02@20"), port(1)).unwrap();
        table.map_host(&vbr2, h("00:00:00:00:00:03@20"), port(2)).unwrap();

        let removals = table.port_down(&|p: &SalPort| p.port() == 1);
        assert_eq!(removals.len(), 2);
        assert_eq!(removals[&vbr2].released, [pv(1, 20)].into());
        assert_eq!(table.owner(&pv(1, 10)), None);
        assert_eq!(table.owner(&pv(2, 20)), Some(&VNodeIdentifier::from(vbr2.clone())));
        assert_eq!(table.status(&vbr2).unwrap().len(), 1);
    }

    #[test]
    #[traced_test]
    fn submit_and_restore() {
        let store = MemStore::<MacMapData>::new();
        let mut table = MacMapTable::new(MacMapSettings::default());
        let vbr1 = mapping("vbr1");
        let vbr2 = mapping("vbr2");
        table.configure(&vbr1, UpdateOperation::Add, &[h("ANY@10")], &[h("00:00:00:00:00:09@10")]).unwrap();
        table.configure(&vbr2, UpdateOperation::Add, &[h("00:00:00:00:00:02@20")], &[]).unwrap();
        table.map_host(&vbr1, h("00:00:00:00:00:01@10"), port(1)).unwrap();

        let mut tx = store.rw_tx();
        table.submit(&mut tx).unwrap();
        store.commit(tx).unwrap();
        // two configs and one status
        assert_eq!(store.len(), 3);

        let restored = MacMapTable::restore(
            MacMapSettings::default(),
            &store.read_tx(),
            [vbr1.clone(), vbr2.clone(), mapping("vbr3")],
        )
        .unwrap();
        assert_eq!(restored.config(&vbr1), table.config(&vbr1));
        assert_eq!(restored.status(&vbr1), table.status(&vbr1));
        assert_eq!(restored.mapping_of(h("00:00:00:00:00:01@10")), Some(&vbr1));
        assert_eq!(restored.owner(&pv(1, 10)), Some(&VNodeIdentifier::from(vbr1.clone())));
        assert_eq!(restored.mappings().count(), 2);

        table.configure(&vbr1, UpdateOperation::Set, &[], &[]).unwrap();
        let mut tx = store.rw_tx();
        table.submit(&mut tx).unwrap();
        store.commit(tx).unwrap();
        let tx = store.read_tx();
        assert!(!tx.exists(vbr1.config_path()).unwrap());
        assert!(!tx.exists(vbr1.status_path()).unwrap());
        assert!(tx.exists(vbr2.config_path()).unwrap());
    }

    #[test]
    fn status_not_persisted() {
        let store = MemStore::<MacMapData>::new();
        let settings = MacMapSettingsBuilder::default()
            .persist_status(false)
            .build()
            .unwrap();
        let mut table = MacMapTable::new(settings);
        let id = mapping("vbr1");
        table.configure(&id, UpdateOperation::Add, &[h("ANY@10")], &[]).unwrap();
        table.map_host(&id, h("00:00:00:00:00:01@10"), port(1)).unwrap();
        let mut tx = store.rw_tx();
        table.submit(&mut tx).unwrap();
        store.commit(tx).unwrap();
        assert_eq!(store.len(), 1);
        assert!(!table.status(&id).unwrap().is_dirty());
    }
}
