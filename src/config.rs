//! Growth thresholds for `HashTable`.

/// Rehash once `live / capacity` exceeds this after an insert.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.5;
/// Rehash once `tombstones / live` exceeds this after an insert.
pub const DEFAULT_MAX_TOMBSTONE_RATIO: f64 = 0.8;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    max_load_factor: f64,
    max_tombstone_ratio: f64,
    auto_rehash: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            max_tombstone_ratio: DEFAULT_MAX_TOMBSTONE_RATIO,
            auto_rehash: true,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamped into `(0, 1]`; non-finite values keep the current setting.
    pub fn with_max_load_factor(mut self, lf: f64) -> Self {
        if lf.is_finite() {
            self.max_load_factor = lf.clamp(f64::MIN_POSITIVE, 1.0);
        }
        self
    }

    /// Clamped to `>= 0`; non-finite values keep the current setting.
    pub fn with_max_tombstone_ratio(mut self, ratio: f64) -> Self {
        if ratio.is_finite() {
            self.max_tombstone_ratio = ratio.max(0.0);
        }
        self
    }

    /// With automatic rehash off, the table only grows on an explicit
    /// `rehash()` and inserts can run out of slots.
    pub fn with_auto_rehash(mut self, on: bool) -> Self {
        self.auto_rehash = on;
        self
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    pub fn max_tombstone_ratio(&self) -> f64 {
        self.max_tombstone_ratio
    }

    pub fn auto_rehash(&self) -> bool {
        self.auto_rehash
    }

    pub(crate) fn needs_rehash(&self, load_factor: f64, tombstone_ratio: f64) -> bool {
        self.auto_rehash
            && (load_factor > self.max_load_factor || tombstone_ratio > self.max_tombstone_ratio)
    }
}
