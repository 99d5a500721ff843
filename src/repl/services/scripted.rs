//! # Scripted Transport
//!
//! In-memory [`AnalysisTransport`] for tests. Answers are queued up front,
//! either ready immediately or held until the test releases them, and every
//! dispatched request is recorded for verification.

use super::http::AnalysisTransport;
use crate::repl::models::{AnalysisRequest, TransportFailure, TransportResult};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::oneshot;

enum ScriptedAnswer {
    Ready(TransportResult),
    Held(oneshot::Receiver<TransportResult>),
}

/// Type alias for the shared request log
type RequestLog = Arc<Mutex<Vec<AnalysisRequest>>>;

/// Transport that replays queued answers
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    answers: Arc<Mutex<VecDeque<ScriptedAnswer>>>,
    sent: RequestLog,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer that resolves as soon as it is awaited
    pub fn push_ready(&self, result: TransportResult) {
        self.lock_answers().push_back(ScriptedAnswer::Ready(result));
    }

    /// Queue an answer that stays pending until the returned sender fires.
    /// Dropping the sender resolves the call as [`TransportFailure::NoResponse`].
    pub fn push_held(&self) -> oneshot::Sender<TransportResult> {
        let (sender, receiver) = oneshot::channel();
        self.lock_answers().push_back(ScriptedAnswer::Held(receiver));
        sender
    }

    /// Requests dispatched so far
    pub fn sent_requests(&self) -> Vec<AnalysisRequest> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn send_count(&self) -> usize {
        self.sent_requests().len()
    }

    fn lock_answers(&self) -> std::sync::MutexGuard<'_, VecDeque<ScriptedAnswer>> {
        self.answers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AnalysisTransport for ScriptedTransport {
    fn send(
        &self,
        request: &AnalysisRequest,
    ) -> impl Future<Output = TransportResult> + Send + 'static {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let answer = self.lock_answers().pop_front();

        async move {
            match answer {
                Some(ScriptedAnswer::Ready(result)) => result,
                Some(ScriptedAnswer::Held(receiver)) => receiver
                    .await
                    .unwrap_or(Err(TransportFailure::NoResponse)),
                None => Err(TransportFailure::SetupError {
                    message: "no scripted answer left".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::models::Mode;
    use serde_json::json;

    #[tokio::test]
    async fn scripted_transport_should_replay_in_order_and_record_requests() {
        let transport = ScriptedTransport::new();
        transport.push_ready(Ok(json!({ "n": 1 })));
        transport.push_ready(Err(TransportFailure::Timeout));

        let request = AnalysisRequest::build(Mode::Indent, "x", "");
        assert_eq!(transport.send(&request).await, Ok(json!({ "n": 1 })));
        assert_eq!(transport.send(&request).await, Err(TransportFailure::Timeout));
        assert_eq!(transport.send_count(), 2);
    }

    #[tokio::test]
    async fn held_answer_should_resolve_on_release() {
        let transport = ScriptedTransport::new();
        let release = transport.push_held();
        let request = AnalysisRequest::build(Mode::Syntax, "x", "");
        let pending = transport.send(&request);

        release.send(Ok(json!({ "valid": true }))).unwrap();
        assert_eq!(pending.await, Ok(json!({ "valid": true })));
    }

    #[tokio::test]
    async fn dropped_release_should_read_as_no_response() {
        let transport = ScriptedTransport::new();
        drop(transport.push_held());
        let request = AnalysisRequest::build(Mode::Syntax, "x", "");
        assert_eq!(
            transport.send(&request).await,
            Err(TransportFailure::NoResponse)
        );
    }
}
