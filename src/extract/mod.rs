//! Record extraction from fetched page bodies
//!
//! The engine knows nothing about which fields a site carries. It hands each
//! successful body to a [`PageExtractor`] and stores whatever comes back.
//!
//! - [`SelectorExtractor`] covers the common case of "one container element
//!   per record, a few CSS-selected fields inside each"
//! - Any `Fn(&str) -> RecordSet` closure works as an extractor too

mod selector;

pub use selector::{FieldRule, SelectorExtractor};

use std::collections::BTreeMap;

/// Field name to value for one page element
///
/// A `None` value marks a field that was expected but missing or unreadable.
pub type ExtractedRecord = BTreeMap<String, Option<String>>;

/// 1-based record index to record for one page
///
/// Indices follow document order. An element whose record could not be built
/// leaves a gap at its index instead of shifting the ones after it.
pub type RecordSet = BTreeMap<usize, ExtractedRecord>;

/// Turns a page body into records
///
/// Implementations must not fail the page as a whole: a broken element
/// affects only its own record.
pub trait PageExtractor: Send + Sync {
    fn extract(&self, body: &str) -> RecordSet;
}

impl<F> PageExtractor for F
where
    F: Fn(&str) -> RecordSet + Send + Sync,
{
    fn extract(&self, body: &str) -> RecordSet {
        self(body)
    }
}
