//! Item projections
//!
//! A projection maps a parsed [`RawRecord`] into whatever shape the caller
//! wants to iterate over. Projections are total and side-effect free.

use crate::decode::RawRecord;

/// Maps a parsed row into the caller-visible item type
pub trait Projection: Send + Sync {
    /// Item type produced by this projection
    type Output;

    /// Project one row
    fn project(&self, record: &RawRecord) -> Self::Output;
}

/// Yields page titles only
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleProjection;

impl Projection for TitleProjection {
    type Output = String;

    fn project(&self, record: &RawRecord) -> String {
        record.title.clone()
    }
}

/// Yields the full record
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordProjection;

impl Projection for RecordProjection {
    type Output = RawRecord;

    fn project(&self, record: &RawRecord) -> RawRecord {
        record.clone()
    }
}

/// Yields page ids only
#[derive(Debug, Clone, Copy, Default)]
pub struct PageIdProjection;

impl Projection for PageIdProjection {
    type Output = u64;

    fn project(&self, record: &RawRecord) -> u64 {
        record.page_id
    }
}

/// Adapts a closure into a projection
///
/// ```rust
/// use mw_listing::projection::{FnProjection, Projection};
/// use mw_listing::decode::RawRecord;
///
/// let ns = FnProjection::new(|r: &RawRecord| r.namespace_id);
/// assert_eq!(ns.project(&RawRecord::new("Talk:X", 1, 1)), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnProjection<F> {
    f: F,
}

impl<F> FnProjection<F> {
    /// Wrap a closure
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, T> Projection for FnProjection<F>
where
    F: Fn(&RawRecord) -> T + Send + Sync,
{
    type Output = T;

    fn project(&self, record: &RawRecord) -> T {
        (self.f)(record)
    }
}
