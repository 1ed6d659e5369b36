// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The transactional key-value tree the controller keeps its state in, and a simple
//! in-memory implementation of it.

use crate::storepath::StorePath;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;
use types::{VtnError, VtnResult};

/// Read access to the store.
pub trait ReadTransaction {
    type Value;

    /// Read the value at `path`, if any. Wildcarded paths are rejected.
    fn read(&self, path: &StorePath) -> VtnResult<Option<Self::Value>>;

    fn exists(&self, path: &StorePath) -> VtnResult<bool> {
        Ok(self.read(path)?.is_some())
    }
}

/// Read and write access to the store.
pub trait ReadWriteTransaction: ReadTransaction {
    /// Set the value at `path`, replacing any former one.
    fn put(&mut self, path: &StorePath, value: Self::Value) -> VtnResult<()>;

    /// Remove the value at `path` and everything below it.
    fn delete(&mut self, path: &StorePath) -> VtnResult<()>;
}

#[derive(Debug)]
struct Inner<V> {
    generation: u64,
    data: BTreeMap<StorePath, V>,
}

/// An in-memory store with optimistic concurrency.
///
/// Transactions work on a snapshot of the store. Committing a transaction fails if another
/// transaction was committed since it was started.
#[derive(Debug)]
pub struct MemStore<V> {
    inner: RwLock<Inner<V>>,
}

impl<V: Clone> Default for MemStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> MemStore<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                generation: 0,
                data: BTreeMap::new(),
            }),
        }
    }

    /// Start a read-only transaction.
    #[must_use]
    pub fn read_tx(&self) -> MemReadTx<V> {
        MemReadTx {
            data: self.inner.read().data.clone(),
        }
    }

    /// Start a read-write transaction.
    #[must_use]
    pub fn rw_tx(&self) -> MemRwTx<V> {
        let inner = self.inner.read();
        MemRwTx {
            base: inner.generation,
            data: inner.data.clone(),
            modified: false,
        }
    }

    /// Apply the changes made by `tx`.
    ///
    /// # Errors
    ///
    /// Fails with `CommitFailed` if the store changed since `tx` was started.
    pub fn commit(&self, tx: MemRwTx<V>) -> VtnResult<()> {
        if !tx.modified {
            return Ok(());
        }
        let mut inner = self.inner.write();
        if inner.generation != tx.base {
            debug!(
                "Rejecting commit based on generation {}, store is at {}",
                tx.base, inner.generation
            );
            return Err(VtnError::CommitFailed(format!(
                "store modified since generation {}",
                tx.base
            )));
        }
        inner.data = tx.data;
        inner.generation += 1;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().data.is_empty()
    }
}

fn read_from<V: Clone>(data: &BTreeMap<StorePath, V>, path: &StorePath) -> VtnResult<Option<V>> {
    path.check_concrete()?;
    Ok(data.get(path).cloned())
}

/// A read-only snapshot of a [`MemStore`].
#[derive(Debug)]
pub struct MemReadTx<V> {
    data: BTreeMap<StorePath, V>,
}

impl<V: Clone> ReadTransaction for MemReadTx<V> {
    type Value = V;
    fn read(&self, path: &StorePath) -> VtnResult<Option<V>> {
        read_from(&self.data, path)
    }
}

/// A read-write transaction on a [`MemStore`], applied by [`MemStore::commit`].
#[derive(Debug)]
pub struct MemRwTx<V> {
    base: u64,
    data: BTreeMap<StorePath, V>,
    modified: bool,
}

impl<V: Clone> ReadTransaction for MemRwTx<V> {
    type Value = V;
    fn read(&self, path: &StorePath) -> VtnResult<Option<V>> {
        read_from(&self.data, path)
    }
}

impl<V: Clone> ReadWriteTransaction for MemRwTx<V> {
    fn put(&mut self, path: &StorePath, value: V) -> VtnResult<()> {
        path.check_concrete()?;
        self.data.insert(path.clone(), value);
        self.modified = true;
        Ok(())
    }

    fn delete(&mut self, path: &StorePath) -> VtnResult<()> {
        path.check_concrete()?;
        let before = self.data.len();
        self.data.retain(|key, _| !key.starts_with(path));
        self.modified |= self.data.len() != before;
        Ok(())
    }
}
