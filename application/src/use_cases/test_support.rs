//! Scripted completion service shared by the use case tests.

use crate::ports::completion::{CompletionError, CompletionRequest, CompletionService, RequestKind};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

type Responder = Box<dyn Fn(&CompletionRequest) -> Result<String, CompletionError> + Send + Sync>;

/// Completion double: answers with a closure, optionally after a delay per
/// request kind, and records every request it receives.
pub(crate) struct ScriptedCompletion {
    responder: Responder,
    delays: HashMap<RequestKind, Duration>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub(crate) fn new(
        responder: impl Fn(&CompletionRequest) -> Result<String, CompletionError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            delays: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request succeeds with a text derived from its kind.
    pub(crate) fn echo() -> Self {
        Self::new(|request| Ok(format!("{} output", request.kind)))
    }

    /// Summary requests (primary and degraded) fail; contributions succeed.
    pub(crate) fn failing_summaries() -> Self {
        Self::new(|request| match request.kind {
            RequestKind::Contribution => Ok("a contribution".to_string()),
            _ => Err(CompletionError::RequestFailed("boom".to_string())),
        })
    }

    pub(crate) fn with_delay(mut self, kind: RequestKind, delay: Duration) -> Self {
        self.delays.insert(kind, delay);
        self
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, kind: RequestKind) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delays.get(&request.kind) {
            tokio::time::sleep(*delay).await;
        }
        (self.responder)(request)
    }
}
