use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::claim::ClaimPayload;
use crate::report::ReportPayload;

/// Sink for finished drafts: issue reports and cleanup-event claims.
pub struct Submission<E> {
    context: CapabilityContext<SubmissionOperation, E>,
}

impl<Ev> Capability<Ev> for Submission<Ev> {
    type Operation = SubmissionOperation;
    type MappedSelf<MappedEv> = Submission<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Submission::new(self.context.map_event(f))
    }
}

impl<E> Submission<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<SubmissionOperation, E>) -> Self {
        Self { context }
    }

    pub fn submit_report<F>(&self, payload: ReportPayload, callback: F)
    where
        F: FnOnce(SubmissionResult) -> E + Send + 'static,
    {
        self.send(SubmissionOperation::Report(payload), callback);
    }

    pub fn claim_event<F>(&self, payload: ClaimPayload, callback: F)
    where
        F: FnOnce(SubmissionResult) -> E + Send + 'static,
    {
        self.send(SubmissionOperation::ClaimEvent(payload), callback);
    }

    fn send<F>(&self, operation: SubmissionOperation, callback: F)
    where
        F: FnOnce(SubmissionResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(callback(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubmissionOperation {
    Report(ReportPayload),
    ClaimEvent(ClaimPayload),
}

impl SubmissionOperation {
    #[must_use]
    pub fn client_ref(&self) -> Uuid {
        match self {
            Self::Report(payload) => payload.client_ref,
            Self::ClaimEvent(payload) => payload.client_ref,
        }
    }
}

impl Operation for SubmissionOperation {
    type Output = SubmissionResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub client_ref: Uuid,
    pub server_id: Option<String>,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("rejected by server: {reason}")]
    Rejected { reason: String },

    #[error("already claimed by {holder}")]
    AlreadyClaimed { holder: String },

    #[error("submission service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("submission timed out")]
    Timeout,
}

impl SubmissionError {
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self {
            Self::Rejected { reason } => format!("Submission was not accepted: {reason}"),
            Self::AlreadyClaimed { holder } => {
                format!("This issue has already been claimed by {holder}.")
            }
            Self::Unavailable { .. } => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            Self::Timeout => "The request timed out. Please try again.".into(),
        }
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout)
    }
}

pub type SubmissionResult = Result<SubmissionReceipt, SubmissionError>;
