//! String hashing seam. The table never hashes keys itself; it asks a
//! `KeyHasher` supplied at construction.

use core::hash::BuildHasher;
use hashbrown::hash_map::DefaultHashBuilder;

/// Maps a record key to an unsigned hash. Must be deterministic for the
/// lifetime of the table.
pub trait KeyHasher {
    fn hash_key(&self, key: &str) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Keyed hasher backed by hashbrown's default `BuildHasher`. Each instance
/// draws its own seed, so two instances may disagree on a key's hash.
#[derive(Clone, Default)]
pub struct DefaultKeyHasher {
    state: DefaultHashBuilder,
}

impl DefaultKeyHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyHasher for DefaultKeyHasher {
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        self.state.hash_one(key)
    }
}

impl core::fmt::Debug for DefaultKeyHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("DefaultKeyHasher")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_key_hashers() {
        let h = |k: &str| k.len() as u64;
        assert_eq!(h.hash_key("abcd"), 4);

        fn first_byte(k: &str) -> u64 {
            k.bytes().next().map(u64::from).unwrap_or(0)
        }
        assert_eq!(first_byte.hash_key("A"), 65);
    }

    /// Invariant: one instance hashes the same key identically every time.
    #[test]
    fn default_hasher_is_stable_per_instance() {
        let h = DefaultKeyHasher::new();
        assert_eq!(h.hash_key("alpha"), h.hash_key("alpha"));
        let clone = h.clone();
        assert_eq!(h.hash_key("beta"), clone.hash_key("beta"));
    }
}
