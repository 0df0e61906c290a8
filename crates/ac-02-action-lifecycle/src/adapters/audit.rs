use parking_lot::Mutex;

use crate::ports::outbound::{AuditKeeper, FinalizationEvidence};

/// Evidence log; ids start at 1.
#[derive(Default)]
pub struct InMemoryAuditLog {
    records: Mutex<Vec<FinalizationEvidence>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FinalizationEvidence> {
        self.records.lock().clone()
    }
}

impl AuditKeeper for InMemoryAuditLog {
    fn create_evidence(&self, evidence: FinalizationEvidence) -> Result<u64, String> {
        let mut records = self.records.lock();
        records.push(evidence);
        Ok(records.len() as u64)
    }
}
