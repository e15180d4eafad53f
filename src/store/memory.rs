//! In-process [`PaperStore`] used by tests and the CLI dry-run path.

use std::sync::Mutex;

use uuid::Uuid;

use crate::output::PaperRecord;
use crate::ports::{PaperStore, PaperStoreError};

/// Keeps saved records in a `Mutex<Vec<_>>`. Lookup by URL scans linearly,
/// which is fine for the handful of records a test or dry run produces.
#[derive(Default)]
pub struct MemoryPaperStore {
    records: Mutex<Vec<(String, PaperRecord)>>,
}

impl MemoryPaperStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything saved so far, in insertion order.
    pub fn records(&self) -> Vec<PaperRecord> {
        self.records
            .lock()
            .expect("paper store poisoned")
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl PaperStore for MemoryPaperStore {
    async fn save_paper(&self, record: &PaperRecord) -> Result<String, PaperStoreError> {
        let id = Uuid::new_v4().to_string();
        self.records
            .lock()
            .map_err(|_| PaperStoreError::Backend("paper store poisoned".into()))?
            .push((id.clone(), record.clone()));
        Ok(id)
    }

    async fn find_paper_id(&self, url: &str) -> Result<Option<String>, PaperStoreError> {
        let records = self
            .records
            .lock()
            .map_err(|_| PaperStoreError::Backend("paper store poisoned".into()))?;
        Ok(records
            .iter()
            .find(|(_, r)| r.url == url)
            .map(|(id, _)| id.clone()))
    }
}
