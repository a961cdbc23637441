use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::ImageRef;

pub struct Capture<E> {
    context: CapabilityContext<CaptureOperation, E>,
}

impl<Ev> Capability<Ev> for Capture<Ev> {
    type Operation = CaptureOperation;
    type MappedSelf<MappedEv> = Capture<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Capture::new(self.context.map_event(f))
    }
}

impl<E> Capture<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<CaptureOperation, E>) -> Self {
        Self { context }
    }

    pub fn acquire<F>(&self, source: CaptureSource, callback: F)
    where
        F: FnOnce(CaptureResult) -> E + Send + 'static,
    {
        let operation = match source {
            CaptureSource::Camera => CaptureOperation::TakePhoto,
            CaptureSource::Gallery => CaptureOperation::PickFromGallery,
        };
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(callback(result));
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaptureSource {
    #[default]
    Camera,
    Gallery,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CaptureOperation {
    TakePhoto,
    PickFromGallery,
}

impl Operation for CaptureOperation {
    type Output = CaptureResult;
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum CaptureError {
    #[error("capture cancelled by user")]
    Cancelled,

    #[error("camera permission denied")]
    PermissionDenied,

    #[error("capture failed: {reason}")]
    Failed { reason: String },
}

impl CaptureError {
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self {
            Self::Cancelled => String::new(),
            Self::PermissionDenied => {
                "Camera access is needed to photograph the issue. Please allow it in settings."
                    .into()
            }
            Self::Failed { .. } => "Unable to use that photo. Please try another one.".into(),
        }
    }
}

pub type CaptureResult = Result<ImageRef, CaptureError>;
