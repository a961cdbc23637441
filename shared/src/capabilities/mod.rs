mod auth;
mod capture;
mod submission;

pub use self::auth::{Auth, AuthError, AuthGrant, AuthOperation, AuthResult};
pub use self::capture::{Capture, CaptureError, CaptureOperation, CaptureResult, CaptureSource};
pub use self::submission::{
    Submission, SubmissionError, SubmissionOperation, SubmissionReceipt, SubmissionResult,
};

// Crux's built-in Render covers view updates; the rest are shell-side
// collaborators.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub auth: Auth<Event>,
    pub capture: Capture<Event>,
    pub submission: Submission<Event>,
}
