//! Record: the value stored in a slot, identified by `(key, serial)`.

use core::fmt;
use core::hash::{Hash, Hasher};

/// Smallest serial accepted by the table.
pub const MIN_ID: u32 = 1000;
/// Largest serial accepted by the table.
pub const MAX_ID: u32 = 9999;
/// Serial carried by the sentinel record returned on a lookup miss.
pub const NOT_FOUND: u32 = 0;

/// A stored record. Identity is the `(key, serial)` pair; the liveness flag
/// is bookkeeping owned by the table and takes no part in equality.
#[derive(Clone, Debug, Default)]
pub struct Record {
    key: String,
    serial: u32,
    used: bool,
}

impl Record {
    pub fn new(key: impl Into<String>, serial: u32) -> Self {
        Self {
            key: key.into(),
            serial,
            used: false,
        }
    }

    /// The empty record handed back when a lookup finds nothing.
    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// True while the record occupies its slot; false once tombstoned.
    pub fn is_live(&self) -> bool {
        self.used
    }

    /// True for the sentinel produced by [`Record::not_found`].
    pub fn is_not_found(&self) -> bool {
        self.serial == NOT_FOUND
    }

    /// Whether the serial lies in `[MIN_ID, MAX_ID]`.
    pub fn has_valid_serial(&self) -> bool {
        (MIN_ID..=MAX_ID).contains(&self.serial)
    }

    pub(crate) fn matches(&self, key: &str, serial: u32) -> bool {
        self.key == key && self.serial == serial
    }

    pub(crate) fn set_live(&mut self, live: bool) {
        self.used = live;
    }

    pub(crate) fn set_serial(&mut self, serial: u32) {
        self.serial = serial;
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.serial == other.serial
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.serial.hash(state);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.key, self.serial, self.used)
    }
}
