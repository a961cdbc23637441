use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::claim::ClaimForm;
use crate::navigation::{Screen, Session};
use crate::report::ReportWizard;
use crate::TOAST_DURATION_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastMessage {
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl ToastMessage {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            duration_ms: TOAST_DURATION_MS,
        }
    }
}

/// Core state. Only `session` outlives a screen; the nested drafts exist
/// while their screen is mounted.
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub session: Session,
    pub account_id: Option<String>,

    // Pre-auth forms. The key of the request sent from the mounted form.
    pub auth_in_flight: Option<Uuid>,
    pub auth_error: Option<String>,

    // Report screen
    pub wizard: Option<ReportWizard>,

    // Map screen
    pub claim: Option<ClaimForm>,

    pub toast: Option<ToastMessage>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.session.rendered_screen()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.authenticated
    }

    #[must_use]
    pub fn is_auth_pending(&self) -> bool {
        self.auth_in_flight.is_some()
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast = Some(ToastMessage::new(message, kind));
    }

    pub fn clear_toast(&mut self) {
        self.toast = None;
    }
}
