use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Credentials;
use crate::capabilities::{AuthResult, CaptureResult, CaptureSource, SubmissionResult};
use crate::claim::ClaimCommand;
use crate::navigation::{ConversationId, NavCommand};
use crate::report::WizardCommand;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub enum Event {
    #[default]
    Noop,

    // Navigation
    Navigate(NavCommand),
    RestoreSession {
        authenticated: bool,
        screen_id: String,
        conversation: Option<ConversationId>,
    },

    // Auth forms
    AuthRequested(Credentials),
    AuthResponse {
        client_ref: Uuid,
        result: AuthResult,
    },

    // Report wizard
    Wizard(WizardCommand),
    CapturePhotoRequested {
        source: CaptureSource,
    },
    PhotoCaptured(CaptureResult),
    ReportSubmitted {
        client_ref: Uuid,
        result: SubmissionResult,
    },

    // Cleanup claim (map screen)
    OpenClaimForm {
        issue_name: String,
        issue_location: String,
    },
    Claim(ClaimCommand),
    ClaimSubmitted {
        client_ref: Uuid,
        result: SubmissionResult,
    },

    DismissToast,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Navigate(command) => command.name(),
            Self::RestoreSession { .. } => "restore_session",
            Self::AuthRequested(_) => "auth_requested",
            Self::AuthResponse { .. } => "auth_response",
            Self::Wizard(command) => command.name(),
            Self::CapturePhotoRequested { .. } => "capture_photo_requested",
            Self::PhotoCaptured(_) => "photo_captured",
            Self::ReportSubmitted { .. } => "report_submitted",
            Self::OpenClaimForm { .. } => "open_claim_form",
            Self::Claim(_) => "claim",
            Self::ClaimSubmitted { .. } => "claim_submitted",
            Self::DismissToast => "dismiss_toast",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::Navigate(_)
                | Self::AuthRequested(_)
                | Self::Wizard(_)
                | Self::CapturePhotoRequested { .. }
                | Self::OpenClaimForm { .. }
                | Self::Claim(_)
                | Self::DismissToast
        )
    }
}
