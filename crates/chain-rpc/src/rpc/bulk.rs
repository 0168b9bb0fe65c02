use std::mem;

use super::protocol::{RequestId, RpcRequest};

/// Pending envelopes waiting to be flushed as one batch.
///
/// Entries keep insertion order. There is no size bound and no per-caller
/// partitioning: one owner composes one batch at a time.
#[derive(Debug, Default, Clone)]
pub struct BulkQueue {
    entries: Vec<RpcRequest>,
}

impl BulkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an envelope and append it.
    pub fn add(
        &mut self,
        method: impl Into<String>,
        params: Vec<serde_json::Value>,
        id: Option<RequestId>,
    ) {
        self.entries.push(RpcRequest::new(method, params, id));
    }

    pub fn push(&mut self, request: RpcRequest) {
        self.entries.push(request);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RpcRequest] {
        &self.entries
    }

    /// Swap the contents out for an empty queue in one step.
    pub fn take(&mut self) -> Vec<RpcRequest> {
        mem::take(&mut self.entries)
    }
}
