//! Bookkeeping for every upload attempt of the page session.

use crate::types::{AppResult, UploadEvent, UploadId, UploadRecord};

/// All upload records, in the order files were handled.
///
/// Records are never removed, and ids come from a counter that is not
/// reset between batches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadTracker {
    next_id: u64,
    records: Vec<UploadRecord>,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create one pending record per file name and return their ids in the
    /// same order.
    ///
    /// An empty batch changes nothing and yields `None`, so the caller neither
    /// raises the uploading flag nor submits anything.
    pub fn begin_batch<I, S>(&mut self, names: I) -> Option<Vec<UploadId>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<UploadId> = names
            .into_iter()
            .map(|name| {
                let id = UploadId(self.next_id);
                self.next_id += 1;
                self.records.push(UploadRecord::new(id, name));
                id
            })
            .collect();
        (!ids.is_empty()).then_some(ids)
    }

    pub fn mark_submitted(&mut self, id: UploadId) -> bool {
        self.get_mut(id).is_some_and(UploadRecord::mark_submitted)
    }

    /// Record how handing `id` to the transport went. A request that could
    /// not be built or sent fails its row like a network error would.
    pub fn finish_submission(&mut self, id: UploadId, sent: &AppResult<()>) -> bool {
        match sent {
            Ok(()) => false,
            Err(_) => self.apply(id, &UploadEvent::TransportError),
        }
    }

    /// Route an event to its record. Unknown ids and finished attempts are
    /// ignored and return `false`.
    pub fn apply(&mut self, id: UploadId, event: &UploadEvent) -> bool {
        self.get_mut(id).is_some_and(|record| record.apply(event))
    }

    pub fn get(&self, id: UploadId) -> Option<&UploadRecord> {
        // Ids are pushed in ascending order.
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|idx| &self.records[idx])
    }

    fn get_mut(&mut self, id: UploadId) -> Option<&mut UploadRecord> {
        let idx = self.records.binary_search_by_key(&id, |r| r.id).ok()?;
        self.records.get_mut(idx)
    }

    pub fn records(&self) -> &[UploadRecord] {
        &self.records
    }

    pub fn ids(&self) -> Vec<UploadId> {
        self.records.iter().map(|r| r.id).collect()
    }
}
