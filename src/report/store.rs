//! In-memory report buffer for one reporting cycle.

use super::record::EmployeeRecord;

/// Latest record per employee name, in first-seen order.
///
/// Updating an existing name replaces the whole record and keeps its
/// position. Not synchronised; share it behind a lock.
#[derive(Debug, Default)]
pub struct ReportStore {
    records: Vec<EmployeeRecord>,
    revision: u64,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite existing names and append unseen ones.
    pub fn merge(&mut self, records: impl IntoIterator<Item = EmployeeRecord>) {
        let mut changed = false;
        for record in records {
            changed = true;
            match self.records.iter_mut().find(|r| r.name == record.name) {
                Some(existing) => *existing = record,
                None => self.records.push(record),
            }
        }
        if changed {
            self.revision += 1;
        }
    }

    /// Copy of all records in iteration order.
    pub fn snapshot(&self) -> Vec<EmployeeRecord> {
        self.records.clone()
    }

    pub fn get(&self, name: &str) -> Option<&EmployeeRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counter bumped by every merge that carried at least one record.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Remove the records that still hold exactly the published figures.
    ///
    /// Names re-submitted after `published` was taken keep their newer
    /// figures, and names added since then are untouched.
    pub fn discard_published(&mut self, published: &[EmployeeRecord]) {
        self.records.retain(|r| !published.contains(r));
    }
}
