//! Comment store trait and in-memory backend

use crate::query::CommentQuery;
use parking_lot::RwLock;
use toxiguard_core::{CommentId, CommentRecord, Error, Result};

/// Append-only collection of accepted comments.
///
/// Implementations must make `append` all-or-nothing: after an error the
/// record is not visible through any read method. Reads return records in
/// insertion order.
pub trait CommentStore: Send + Sync {
    /// Persist a record and return its id
    fn append(&self, record: CommentRecord) -> Result<CommentId>;

    /// Every record, in insertion order
    fn list_all(&self) -> Result<Vec<CommentRecord>>;

    /// Records matching `predicate`, in insertion order
    fn filter_by(&self, predicate: &dyn Fn(&CommentRecord) -> bool) -> Result<Vec<CommentRecord>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|record| predicate(record))
            .collect())
    }

    /// Look up a single record
    fn get(&self, id: &CommentId) -> Result<Option<CommentRecord>> {
        Ok(self.filter_by(&|record| record.id == *id)?.into_iter().next())
    }

    /// Number of stored records
    fn count(&self) -> Result<usize> {
        Ok(self.list_all()?.len())
    }

    /// Records matching a structured query, with pagination applied
    fn query(&self, query: &CommentQuery) -> Result<Vec<CommentRecord>> {
        let matching = self.filter_by(&|record| query.matches(record))?;
        Ok(query.paginate(matching))
    }
}

/// Process-local store backed by a vector
#[derive(Default)]
pub struct MemoryCommentStore {
    records: RwLock<Vec<CommentRecord>>,
}

impl MemoryCommentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records
    pub fn with_records(records: Vec<CommentRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl CommentStore for MemoryCommentStore {
    fn append(&self, record: CommentRecord) -> Result<CommentId> {
        let mut records = self.records.write();
        if records.iter().any(|r| r.id == record.id) {
            return Err(Error::store_write(format!("duplicate comment id {}", record.id)));
        }

        let id = record.id;
        records.push(record);
        metrics::counter!("toxiguard_store_appends_total", "backend" => "memory").increment(1);
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<CommentRecord>> {
        Ok(self.records.read().clone())
    }

    fn filter_by(&self, predicate: &dyn Fn(&CommentRecord) -> bool) -> Result<Vec<CommentRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|record| predicate(*record))
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }
}
