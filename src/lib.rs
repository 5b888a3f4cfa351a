//! probe-table: a single-threaded open-addressing hash table of records
//! identified by a `(key, serial)` pair.
//!
//! Internal Design:
//!
//! Summary
//! - Slots live in one contiguous boxed array sized to a prime capacity in
//!   `[MIN_PRIME, MAX_PRIME]`. A slot is either empty or holds a record whose
//!   liveness flag marks it occupied or tombstoned.
//! - Collisions are resolved by a `ProbingPolicy`: linear, quadratic or
//!   double hashing. The key hash comes from a caller supplied `KeyHasher`.
//! - Growth is a synchronous, single-pass rehash into
//!   `next_prime(2 * capacity)` slots, triggered after an insert when the
//!   load factor exceeds 0.5 or tombstones per live record exceed 0.8.
//!
//! Lookup versus probing
//! - `insert`, `remove`, `update_serial` and `find_index` walk the probe
//!   sequence of the active policy. `remove` matches on key alone.
//! - `lookup`/`get` and duplicate detection scan every slot and match on
//!   the full `(key, serial)` identity, so they stay authoritative even for
//!   records placed under a previous policy.
//!
//! Policy changes
//! - `change_probing_policy` only records the request. The policy becomes
//!   active at the next rehash, and rehash always re-places records with
//!   double hashing.
//!
//! Failure model
//! - Nothing panics. `insert` reports rejection through `TableError`,
//!   `remove` returns `false` on a miss and `lookup` returns the
//!   `Record::not_found()` sentinel. Capacity growth saturates at
//!   `MAX_PRIME`.
//!
//! Non-goals
//! - No persistence, no concurrent access (wrap in a lock to share), no
//!   generic key/value types.

pub mod config;
mod hash_table;
mod hash_table_proptest;
pub mod hasher;
pub mod primes;
pub mod probe;
pub mod record;

// Public surface
pub use config::TableConfig;
pub use hash_table::{HashTable, Iter, TableError};
pub use hasher::{DefaultKeyHasher, KeyHasher};
pub use primes::{is_prime, next_prime, MAX_PRIME, MIN_PRIME};
pub use probe::ProbingPolicy;
pub use record::{Record, MAX_ID, MIN_ID, NOT_FOUND};
