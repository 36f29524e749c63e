//! Run-scoped result map shared by all fetch tasks
//!
//! Tasks only ever write a URL's entry once they hold a complete record set,
//! and each write replaces the whole entry. A reader can therefore never see
//! records from two different attempts mixed together.

use crate::extract::RecordSet;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// URL to extracted records, ordered by URL
pub type ResultMap = BTreeMap<String, RecordSet>;

#[derive(Debug, Default)]
pub struct ResultStore {
    entries: Mutex<ResultMap>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the records for `url`, returning whatever was there before
    pub fn insert(&self, url: &str, records: RecordSet) -> Option<RecordSet> {
        self.lock().insert(url.to_string(), records)
    }

    pub fn get(&self, url: &str) -> Option<RecordSet> {
        self.lock().get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Moves the accumulated map out, leaving the store empty
    pub fn take(&self) -> ResultMap {
        std::mem::take(&mut *self.lock())
    }

    // A panic inside the lock cannot leave a half-written entry, so a poisoned
    // map is still consistent.
    fn lock(&self) -> MutexGuard<'_, ResultMap> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
