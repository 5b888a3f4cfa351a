//! HashTable: open addressing over a prime-sized slot array with tombstone
//! deletion and synchronous doubling rehash.

use crate::config::TableConfig;
use crate::hasher::{DefaultKeyHasher, KeyHasher};
use crate::primes::{clamp_capacity, next_prime, MAX_PRIME};
use crate::probe::ProbingPolicy;
use crate::record::{Record, MAX_ID, MIN_ID};
use core::fmt;
use thiserror::Error;

#[derive(Clone, Debug, Default)]
enum Slot {
    #[default]
    Empty,
    Occupied(Record),
    /// Removed record; keeps probe sequences going and can be reclaimed.
    Tombstone(Record),
}

impl Slot {
    fn live(&self) -> Option<&Record> {
        match self {
            Slot::Occupied(r) => Some(r),
            _ => None,
        }
    }

    fn live_mut(&mut self) -> Option<&mut Record> {
        match self {
            Slot::Occupied(r) => Some(r),
            _ => None,
        }
    }

    fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone(_))
    }

    /// Turn an occupied slot into a tombstone. Other states are left as is.
    fn bury(&mut self) {
        if let Slot::Occupied(mut r) = core::mem::take(self) {
            r.set_live(false);
            *self = Slot::Tombstone(r);
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("serial {serial} is outside [{}, {}]", MIN_ID, MAX_ID)]
    SerialOutOfRange { serial: u32 },
    #[error("record ({key}, {serial}) is already present")]
    Duplicate { key: String, serial: u32 },
    #[error("no free slot after probing all {capacity} positions")]
    TableFull { capacity: usize },
    #[error("no live record with key {key:?}")]
    NotFound { key: String },
}

pub struct HashTable<H = DefaultKeyHasher> {
    hasher: H,
    slots: Box<[Slot]>,
    live: usize,
    tombstones: usize,
    policy: ProbingPolicy,
    pending: Option<ProbingPolicy>,
    config: TableConfig,
}

fn empty_slots(capacity: usize) -> Box<[Slot]> {
    vec![Slot::Empty; capacity].into_boxed_slice()
}

impl HashTable<DefaultKeyHasher> {
    /// Table keyed by a freshly seeded [`DefaultKeyHasher`].
    pub fn with_default_hasher(capacity: usize, policy: ProbingPolicy) -> Self {
        Self::new(capacity, DefaultKeyHasher::new(), policy)
    }
}

impl<H: KeyHasher> HashTable<H> {
    /// The requested capacity is clamped to `[MIN_PRIME, MAX_PRIME]` and
    /// rounded up to a prime.
    pub fn new(capacity: usize, hasher: H, policy: ProbingPolicy) -> Self {
        Self::with_config(capacity, hasher, policy, TableConfig::default())
    }

    pub fn with_config(
        capacity: usize,
        hasher: H,
        policy: ProbingPolicy,
        config: TableConfig,
    ) -> Self {
        let capacity = clamp_capacity(capacity);
        Self {
            hasher,
            slots: empty_slots(capacity),
            live: 0,
            tombstones: 0,
            policy,
            pending: None,
            config,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Alias of [`HashTable::len`].
    pub fn size(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Policy used by insert, remove and key probes right now.
    pub fn policy(&self) -> ProbingPolicy {
        self.policy
    }

    /// Policy that becomes active at the next rehash, if one was requested.
    pub fn pending_policy(&self) -> Option<ProbingPolicy> {
        self.pending
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn load_factor(&self) -> f64 {
        self.live as f64 / self.capacity() as f64
    }

    /// Tombstones per live record; zero for a table without live records.
    pub fn tombstone_ratio(&self) -> f64 {
        if self.live == 0 {
            0.0
        } else {
            self.tombstones as f64 / self.live as f64
        }
    }

    /// Probe sequence for `key` under `policy`, one index per step.
    fn probe_seq(&self, key: &str, policy: ProbingPolicy) -> impl Iterator<Item = usize> {
        let hash = self.hasher.hash_key(key);
        let capacity = self.capacity();
        (0..capacity).map(move |step| policy.probe(hash, step, capacity))
    }

    /// Index of the first live slot on `key`'s probe sequence holding `key`.
    fn probe_live_key(&self, key: &str) -> Option<usize> {
        self.probe_seq(key, self.policy)
            .find(|&i| self.slots[i].live().is_some_and(|r| r.key() == key))
    }

    /// Insert a copy of `record`.
    ///
    /// Rejects serials outside `[MIN_ID, MAX_ID]` and identities already
    /// live in the table. The first empty or tombstoned slot along the
    /// active probe sequence is claimed. A successful insert that pushes the
    /// load factor or tombstone ratio past its threshold rehashes before
    /// returning.
    pub fn insert(&mut self, record: Record) -> Result<(), TableError> {
        if !record.has_valid_serial() {
            return Err(TableError::SerialOutOfRange {
                serial: record.serial(),
            });
        }
        if self.contains(record.key(), record.serial()) {
            return Err(TableError::Duplicate {
                key: record.key().to_owned(),
                serial: record.serial(),
            });
        }

        let Some(index) = self
            .probe_seq(record.key(), self.policy)
            .find(|&i| self.slots[i].live().is_none())
        else {
            tracing::warn!(
                capacity = self.capacity(),
                live = self.live,
                key = record.key(),
                "insert exhausted every probe step"
            );
            return Err(TableError::TableFull {
                capacity: self.capacity(),
            });
        };

        if self.slots[index].is_tombstone() {
            self.tombstones -= 1;
        }
        let mut record = record;
        record.set_live(true);
        self.slots[index] = Slot::Occupied(record);
        self.live += 1;

        if self
            .config
            .needs_rehash(self.load_factor(), self.tombstone_ratio())
        {
            self.rehash();
        }
        Ok(())
    }

    /// Tombstone the first live slot on the active probe sequence whose key
    /// matches `record.key()`. The serial is not compared.
    pub fn remove(&mut self, record: &Record) -> bool {
        let Some(index) = self.probe_live_key(record.key()) else {
            return false;
        };
        self.slots[index].bury();
        self.live -= 1;
        self.tombstones += 1;
        true
    }

    /// Copy of the live record `(key, serial)`, or [`Record::not_found`].
    ///
    /// Scans every slot instead of following a probe sequence, so records
    /// placed under an earlier policy are always found.
    pub fn lookup(&self, key: &str, serial: u32) -> Record {
        self.get(key, serial).cloned().unwrap_or_default()
    }

    /// Borrowing form of [`HashTable::lookup`].
    pub fn get(&self, key: &str, serial: u32) -> Option<&Record> {
        self.iter().find(|r| r.matches(key, serial))
    }

    pub fn contains(&self, key: &str, serial: u32) -> bool {
        self.get(key, serial).is_some()
    }

    /// Rewrite the serial of the first live record with `key` on the active
    /// probe sequence.
    pub fn update_serial(&mut self, key: &str, serial: u32) -> Result<(), TableError> {
        if !(MIN_ID..=MAX_ID).contains(&serial) {
            return Err(TableError::SerialOutOfRange { serial });
        }
        let Some(index) = self.probe_live_key(key) else {
            return Err(TableError::NotFound {
                key: key.to_owned(),
            });
        };
        let current = self.slots[index].live().map(Record::serial);
        if current != Some(serial) && self.contains(key, serial) {
            return Err(TableError::Duplicate {
                key: key.to_owned(),
                serial,
            });
        }
        if let Some(r) = self.slots[index].live_mut() {
            r.set_serial(serial);
        }
        Ok(())
    }

    /// Slot index of `key` along the active probe sequence. Stops at the
    /// first never-used slot.
    pub fn find_index(&self, key: &str) -> Option<usize> {
        for i in self.probe_seq(key, self.policy) {
            match &self.slots[i] {
                Slot::Empty => return None,
                Slot::Occupied(r) if r.key() == key => return Some(i),
                Slot::Occupied(_) | Slot::Tombstone(_) => {}
            }
        }
        None
    }

    /// Request a new probing policy. Existing records stay where they are;
    /// the policy becomes active at the next rehash.
    pub fn change_probing_policy(&mut self, policy: ProbingPolicy) {
        tracing::trace!(current = %self.policy, requested = %policy, "probing policy change pending");
        self.pending = Some(policy);
    }

    /// Rebuild into `next_prime(2 * capacity)` slots.
    ///
    /// Live records are placed with double hashing regardless of the active
    /// policy; tombstones are dropped. A pending policy becomes active.
    pub fn rehash(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = next_prime(old_capacity * 2);
        if new_capacity == MAX_PRIME && old_capacity == MAX_PRIME {
            tracing::warn!(capacity = MAX_PRIME, "table growth saturated");
        }

        let mut slots = empty_slots(new_capacity);
        let mut moved = 0usize;
        let old = core::mem::take(&mut self.slots);
        for slot in old.into_vec() {
            let Slot::Occupied(record) = slot else { continue };
            let hash = self.hasher.hash_key(record.key());
            let target = (0..new_capacity)
                .map(|step| ProbingPolicy::DoubleHash.probe(hash, step, new_capacity))
                .find(|&i| matches!(slots[i], Slot::Empty));
            if let Some(i) = target {
                slots[i] = Slot::Occupied(record);
                moved += 1;
            }
        }

        let dropped = self.tombstones;
        self.slots = slots;
        self.live = moved;
        self.tombstones = 0;
        if let Some(policy) = self.pending.take() {
            self.policy = policy;
        }
        tracing::debug!(
            old_capacity,
            new_capacity,
            live = moved,
            tombstones_dropped = dropped,
            policy = %self.policy,
            "rehashed"
        );
    }

    /// Live records in slot order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            it: self.slots.iter(),
        }
    }
}

/// Iterator over live records.
pub struct Iter<'a> {
    it: core::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Record;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.by_ref().find_map(Slot::live)
    }
}

impl<'a, H: KeyHasher> IntoIterator for &'a HashTable<H> {
    type Item = &'a Record;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Slot-by-slot dump: occupied and tombstoned slots print their record,
/// empty slots print nothing after the index.
impl<H> fmt::Display for HashTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Occupied(r) | Slot::Tombstone(r) => writeln!(f, "[{i}] : {r}")?,
                Slot::Empty => writeln!(f, "[{i}] : ")?,
            }
        }
        Ok(())
    }
}

impl<H> fmt::Debug for HashTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("capacity", &self.slots.len())
            .field("live", &self.live)
            .field("tombstones", &self.tombstones)
            .field("policy", &self.policy)
            .field("pending", &self.pending)
            .finish()
    }
}
