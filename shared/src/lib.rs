#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod auth;
pub mod capabilities;
pub mod claim;
pub mod event;
pub mod model;
pub mod navigation;
pub mod report;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::{Model, ToastKind, ToastMessage};
pub use navigation::{ConversationId, NavCommand, Screen, Session, Tab};
pub use report::{Category, ImageRef, ReportDraft, ReportWizard, WizardCommand, WizardStep};

pub const APP_NAME: &str = "Red2Green";
pub const DEFAULT_REPORT_LOCATION: &str = "Current Location";
pub const REPORT_STEP_COUNT: u8 = 3;
pub const TOAST_DURATION_MS: u64 = 4000;

/// Local rejections: a command arrived that the view should have disabled.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error(transparent)]
    Wizard(#[from] report::WizardError),

    #[error(transparent)]
    Claim(#[from] claim::ClaimError),

    #[error(transparent)]
    AuthForm(#[from] auth::AuthFormError),

    #[error("{command} is not available on {screen}")]
    UnavailableHere {
        command: &'static str,
        screen: Screen,
    },
}

impl CoreError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Wizard(_) => "WIZARD_REJECTED",
            Self::Claim(_) => "CLAIM_REJECTED",
            Self::AuthForm(_) => "AUTH_FORM_REJECTED",
            Self::UnavailableHere { .. } => "UNAVAILABLE_HERE",
        }
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self {
            Self::AuthForm(auth::AuthFormError::MissingFields(_)) => {
                "Please fill in all required fields.".into()
            }
            Self::AuthForm(auth::AuthFormError::AlreadyPending) => {
                "Still signing you in, please wait.".into()
            }
            _ => "That action isn't available right now.".into(),
        }
    }
}

// --- View model ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabView {
    pub tab: Tab,
    pub label: String,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryOption {
    pub category: Category,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportView {
    pub step: u8,
    pub total_steps: u8,
    pub image: Option<String>,
    pub categories: Vec<CategoryOption>,
    pub description: String,
    pub location: String,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub can_capture: bool,
    pub is_final_step: bool,
    pub primary_label: String,
    pub submitting: bool,
}

impl From<&ReportWizard> for ReportView {
    fn from(wizard: &ReportWizard) -> Self {
        let draft = wizard.draft();
        let is_final_step = draft.step == WizardStep::Details;
        Self {
            step: draft.step.number(),
            total_steps: REPORT_STEP_COUNT,
            image: draft.image.as_ref().map(|image| image.0.clone()),
            categories: Category::ALL
                .into_iter()
                .map(|category| CategoryOption {
                    category,
                    label: category.label().into(),
                    selected: draft.category == Some(category),
                })
                .collect(),
            description: draft.description.clone(),
            location: draft.location.clone(),
            can_advance: wizard.can_advance(),
            can_retreat: wizard.can_retreat(),
            can_capture: draft.step == WizardStep::Photo && !wizard.is_submitting(),
            is_final_step,
            primary_label: if is_final_step { "Submit Report" } else { "Continue" }.into(),
            submitting: wizard.is_submitting(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimView {
    pub issue_name: String,
    pub issue_location: String,
    pub date: String,
    pub time: String,
    pub meeting_point: String,
    pub can_confirm: bool,
    pub confirming: bool,
}

impl From<&claim::ClaimForm> for ClaimView {
    fn from(form: &claim::ClaimForm) -> Self {
        Self {
            issue_name: form.issue_name.clone(),
            issue_location: form.issue_location.clone(),
            date: form.date.clone(),
            time: form.time.clone(),
            meeting_point: form.meeting_point.clone(),
            can_confirm: form.can_confirm(),
            confirming: form.is_confirming(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthView {
    pub pending: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastView {
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl From<&ToastMessage> for ToastView {
    fn from(t: &ToastMessage) -> Self {
        Self {
            message: t.message.clone(),
            kind: t.kind,
            duration_ms: t.duration_ms,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub authenticated: bool,
    pub screen: Screen,
    pub selected_conversation: Option<String>,
    pub tabs: Vec<TabView>,
    pub report: Option<ReportView>,
    pub claim: Option<ClaimView>,
    pub auth: AuthView,
    pub toast: Option<ToastView>,
    pub account_id: Option<String>,
}

pub mod app {
    use tracing::{debug, info, warn};
    use uuid::Uuid;

    use super::*;
    use crate::auth::{AuthFormError, Credentials};
    use crate::capabilities::{AuthResult, CaptureError, CaptureResult, CaptureSource, SubmissionResult};
    use crate::claim::{ClaimCommand, ClaimForm};
    use crate::report::WizardOutcome;

    #[derive(Default)]
    pub struct App;

    impl App {
        fn reject(error: &CoreError) {
            warn!(code = error.code(), error = %error, "command rejected");
        }

        /// Runs one navigation command and keeps the nested drafts in step
        /// with the screen that is now mounted.
        fn navigate(model: &mut Model, command: NavCommand) {
            let name = command.name();
            let next = model.session.reduce(command);
            if next == model.session {
                debug!(command = name, screen = %model.screen(), "navigation left session unchanged");
                return;
            }

            let from = model.screen();
            model.session = next;
            info!(command = name, from = %from, to = %model.screen(), "screen changed");
            Self::sync_screen_state(model, from);
        }

        fn sync_screen_state(model: &mut Model, from: Screen) {
            let screen = model.screen();

            if screen == Screen::Report {
                if model.wizard.is_none() {
                    model.wizard = Some(ReportWizard::new());
                }
            } else if let Some(wizard) = model.wizard.take() {
                if wizard.draft() != &ReportDraft::default() {
                    info!(step = wizard.step().number(), "report draft discarded");
                }
            }

            if screen != Screen::Map && model.claim.take().is_some() {
                debug!("claim form closed");
            }

            if screen != from {
                model.auth_error = None;
                if let Some(client_ref) = model.auth_in_flight.take() {
                    debug!(%client_ref, from = %from, "auth request abandoned");
                }
            }

            if !model.is_authenticated() {
                model.account_id = None;
            }
        }

        fn restore_session(
            model: &mut Model,
            authenticated: bool,
            screen_id: &str,
            conversation: Option<ConversationId>,
        ) {
            let from = model.screen();
            model.session = Session::restore(authenticated, screen_id, conversation);
            if model.screen().id() != screen_id {
                warn!(requested = screen_id, resolved = %model.screen(), "restored screen fell back");
            }
            Self::sync_screen_state(model, from);
        }

        fn request_auth(model: &mut Model, credentials: Credentials, caps: &Capabilities) {
            let checked = if model.is_auth_pending() {
                Err(AuthFormError::AlreadyPending)
            } else {
                credentials.validate_on(model.screen())
            };

            if let Err(e) = checked {
                let error = CoreError::from(e);
                Self::reject(&error);
                // Presence failures are shown on the form; nothing else changes.
                if matches!(error, CoreError::AuthForm(AuthFormError::MissingFields(_))) {
                    model.auth_error = Some(error.user_facing_message());
                }
                return;
            }

            let client_ref = Uuid::new_v4();
            info!(%client_ref, kind = credentials.kind(), "authentication requested");
            model.auth_in_flight = Some(client_ref);
            model.auth_error = None;
            caps.auth.authenticate(credentials, move |result| Event::AuthResponse {
                client_ref,
                result,
            });
        }

        fn on_auth_response(model: &mut Model, client_ref: Uuid, result: AuthResult) {
            // Only the form that sent the request may act on its answer.
            if model.auth_in_flight != Some(client_ref) || model.is_authenticated() {
                debug!(%client_ref, ok = result.is_ok(), "auth response for a closed form dropped");
                return;
            }
            model.auth_in_flight = None;

            match result {
                Ok(grant) => {
                    info!("authentication succeeded");
                    model.account_id = Some(grant.account_id);
                    Self::navigate(model, NavCommand::CompleteAuth);
                    model.show_toast(format!("Welcome to {APP_NAME}!"), ToastKind::Success);
                }
                Err(e) => {
                    warn!(error = %e, "authentication failed");
                    model.auth_error = Some(e.user_facing_message());
                }
            }
        }

        fn on_wizard_command(model: &mut Model, command: WizardCommand, caps: &Capabilities) {
            let name = command.name();
            let Some(wizard) = model.wizard.as_mut() else {
                Self::reject(&CoreError::UnavailableHere {
                    command: name,
                    screen: model.screen(),
                });
                return;
            };

            match wizard.apply(command) {
                Ok(WizardOutcome::Updated) => {
                    debug!(command = name, step = wizard.step().number(), "wizard updated");
                }
                Ok(WizardOutcome::Submitted(payload)) => {
                    let client_ref = payload.client_ref;
                    info!(%client_ref, category = %payload.category, "report submitted");
                    caps.submission.submit_report(payload, move |result| Event::ReportSubmitted {
                        client_ref,
                        result,
                    });
                }
                Ok(WizardOutcome::Cancelled) => {
                    Self::navigate(model, NavCommand::Back);
                }
                Err(e) => Self::reject(&e.into()),
            }
        }

        fn request_capture(model: &Model, source: CaptureSource, caps: &Capabilities) {
            match &model.wizard {
                Some(wizard) if wizard.step() == WizardStep::Photo && !wizard.is_submitting() => {
                    caps.capture.acquire(source, Event::PhotoCaptured);
                }
                _ => Self::reject(&CoreError::UnavailableHere {
                    command: "capture_photo",
                    screen: model.screen(),
                }),
            }
        }

        fn on_photo_captured(model: &mut Model, result: CaptureResult) {
            match result {
                Ok(image) => {
                    let Some(wizard) = model.wizard.as_mut() else {
                        debug!("photo arrived after report screen closed");
                        return;
                    };
                    if let Err(e) = wizard.set_image(image) {
                        Self::reject(&e.into());
                    }
                }
                Err(CaptureError::Cancelled) => debug!("photo capture cancelled"),
                Err(e) => {
                    warn!(error = %e, "photo capture failed");
                    model.show_toast(e.user_facing_message(), ToastKind::Error);
                }
            }
        }

        fn on_report_submitted(model: &mut Model, client_ref: Uuid, result: SubmissionResult) {
            let tracked = model
                .wizard
                .as_ref()
                .is_some_and(|wizard| wizard.awaits(client_ref));

            if !tracked {
                if !model.is_authenticated() {
                    debug!(%client_ref, ok = result.is_ok(), "report response after logout dropped");
                    return;
                }
                // The draft was closed while the sink was working; the
                // outcome is still reported.
                match result {
                    Ok(_) => {
                        info!(%client_ref, "report accepted after its draft was closed");
                        model.show_toast("Issue reported successfully!", ToastKind::Success);
                    }
                    Err(e) => {
                        warn!(%client_ref, error = %e, "submission failed for a closed draft");
                        model.show_toast(e.user_facing_message(), ToastKind::Error);
                    }
                }
                return;
            }

            let Some(wizard) = model.wizard.as_mut() else {
                return;
            };

            match result {
                Ok(receipt) => {
                    if let Err(e) = wizard.submission_succeeded(client_ref) {
                        Self::reject(&e.into());
                        return;
                    }
                    info!(%client_ref, server_id = ?receipt.server_id, "report accepted");
                    model.show_toast("Issue reported successfully!", ToastKind::Success);
                    Self::navigate(model, NavCommand::Navigate(Screen::Home));
                }
                Err(e) => {
                    if let Err(reject) = wizard.submission_failed(client_ref) {
                        Self::reject(&reject.into());
                        return;
                    }
                    warn!(
                        %client_ref,
                        error = %e,
                        retryable = e.is_retryable(),
                        "report submission failed"
                    );
                    model.show_toast(e.user_facing_message(), ToastKind::Error);
                }
            }
        }

        fn open_claim_form(model: &mut Model, issue_name: String, issue_location: String) {
            if model.screen() != Screen::Map || !model.is_authenticated() {
                Self::reject(&CoreError::UnavailableHere {
                    command: "open_claim_form",
                    screen: model.screen(),
                });
                return;
            }
            if model.claim.as_ref().is_some_and(ClaimForm::is_confirming) {
                Self::reject(&claim::ClaimError::ConfirmationInFlight.into());
                return;
            }
            model.claim = Some(ClaimForm::new(issue_name, issue_location));
        }

        fn on_claim_command(model: &mut Model, command: ClaimCommand, caps: &Capabilities) {
            let Some(form) = model.claim.as_mut() else {
                Self::reject(&CoreError::UnavailableHere {
                    command: "claim",
                    screen: model.screen(),
                });
                return;
            };

            let outcome = match command {
                ClaimCommand::SetDate(date) => form.set_date(date),
                ClaimCommand::SetTime(time) => form.set_time(time),
                ClaimCommand::SetMeetingPoint(point) => form.set_meeting_point(point),
                ClaimCommand::Confirm => form.confirm().map(|payload| {
                    let client_ref = payload.client_ref;
                    info!(%client_ref, issue = %payload.issue_name, "cleanup claim sent");
                    caps.submission.claim_event(payload, move |result| Event::ClaimSubmitted {
                        client_ref,
                        result,
                    });
                }),
                ClaimCommand::Close => {
                    model.claim = None;
                    Ok(())
                }
            };

            if let Err(e) = outcome {
                Self::reject(&e.into());
            }
        }

        fn on_claim_submitted(model: &mut Model, client_ref: Uuid, result: SubmissionResult) {
            let Some(form) = model.claim.as_mut().filter(|form| form.awaits(client_ref)) else {
                debug!(%client_ref, "claim response for a closed form dropped");
                return;
            };

            match result {
                Ok(_) => {
                    info!(%client_ref, "cleanup claim confirmed");
                    model.claim = None;
                    model.show_toast(
                        "Claim confirmed! A group chat has been created for coordination.",
                        ToastKind::Success,
                    );
                }
                Err(e) => {
                    if let Err(reject) = form.confirmation_failed(client_ref) {
                        Self::reject(&reject.into());
                        return;
                    }
                    warn!(%client_ref, error = %e, "cleanup claim failed");
                    model.show_toast(e.user_facing_message(), ToastKind::Error);
                }
            }
        }

        fn build_tabs(session: &Session) -> Vec<TabView> {
            if !session.authenticated {
                return Vec::new();
            }
            let active = session.active_tab();
            Tab::ALL
                .into_iter()
                .map(|tab| TabView {
                    tab,
                    label: tab.label().into(),
                    active: active == Some(tab),
                })
                .collect()
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(
                event = event.name(),
                user = event.is_user_initiated(),
                screen = %model.screen(),
                "update"
            );

            match event {
                Event::Noop => return,

                Event::Navigate(command) => Self::navigate(model, command),

                Event::RestoreSession {
                    authenticated,
                    screen_id,
                    conversation,
                } => Self::restore_session(model, authenticated, &screen_id, conversation),

                Event::AuthRequested(credentials) => Self::request_auth(model, credentials, caps),

                Event::AuthResponse { client_ref, result } => {
                    Self::on_auth_response(model, client_ref, result);
                }

                Event::Wizard(command) => Self::on_wizard_command(model, command, caps),

                Event::CapturePhotoRequested { source } => {
                    Self::request_capture(model, source, caps);
                }

                Event::PhotoCaptured(result) => Self::on_photo_captured(model, result),

                Event::ReportSubmitted { client_ref, result } => {
                    Self::on_report_submitted(model, client_ref, result);
                }

                Event::OpenClaimForm {
                    issue_name,
                    issue_location,
                } => Self::open_claim_form(model, issue_name, issue_location),

                Event::Claim(command) => Self::on_claim_command(model, command, caps),

                Event::ClaimSubmitted { client_ref, result } => {
                    Self::on_claim_submitted(model, client_ref, result);
                }

                Event::DismissToast => model.clear_toast(),
            }

            caps.render.render();
        }

        fn view(&self, model: &Model) -> ViewModel {
            let screen = model.screen();

            let report = (screen == Screen::Report).then(|| match &model.wizard {
                Some(wizard) => ReportView::from(wizard),
                None => ReportView::from(&ReportWizard::new()),
            });

            let claim = if screen == Screen::Map {
                model.claim.as_ref().map(ClaimView::from)
            } else {
                None
            };

            ViewModel {
                authenticated: model.is_authenticated(),
                screen,
                selected_conversation: model
                    .session
                    .selected_conversation
                    .as_ref()
                    .map(|id| id.0.clone()),
                tabs: Self::build_tabs(&model.session),
                report,
                claim,
                auth: AuthView {
                    pending: model.is_auth_pending(),
                    error: model.auth_error.clone(),
                },
                toast: model.toast.as_ref().map(ToastView::from),
                account_id: model.account_id.clone(),
            }
        }
    }
}
