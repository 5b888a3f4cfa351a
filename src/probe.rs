//! Collision resolution: maps a key hash and attempt number to a slot index.

use core::fmt;

/// Modulus of the secondary hash used by [`ProbingPolicy::DoubleHash`].
pub const SECONDARY_MODULUS: u64 = 11;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ProbingPolicy {
    /// `(h + i) mod m`
    Linear,
    /// `(h + i²) mod m`
    Quadratic,
    /// `(h + i · (11 − h mod 11)) mod m`
    #[default]
    DoubleHash,
}

impl ProbingPolicy {
    pub const ALL: [ProbingPolicy; 3] = [
        ProbingPolicy::Linear,
        ProbingPolicy::Quadratic,
        ProbingPolicy::DoubleHash,
    ];

    /// Slot index visited on attempt `step` for a key hashing to `hash`.
    ///
    /// All arithmetic is reduced modulo `capacity` before combining, so any
    /// `u64` hash and any step below `capacity` stay in range.
    #[inline]
    pub fn probe(self, hash: u64, step: usize, capacity: usize) -> usize {
        debug_assert!(capacity > 0);
        let m = capacity as u64;
        let base = hash % m;
        let i = step as u64 % m;
        let offset = match self {
            ProbingPolicy::Linear => i,
            ProbingPolicy::Quadratic => (i * i) % m,
            ProbingPolicy::DoubleHash => (i * secondary_step(hash, m)) % m,
        };
        ((base + offset) % m) as usize
    }
}

/// `11 − (h mod 11)`, falling back to 1 when it shares a factor with the
/// capacity. With a prime capacity that only happens for capacities ≤ 11.
#[inline]
fn secondary_step(hash: u64, m: u64) -> u64 {
    let step = SECONDARY_MODULUS - hash % SECONDARY_MODULUS;
    if step % m == 0 {
        1
    } else {
        step
    }
}

impl fmt::Display for ProbingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProbingPolicy::Linear => "linear",
            ProbingPolicy::Quadratic => "quadratic",
            ProbingPolicy::DoubleHash => "double-hash",
        })
    }
}
