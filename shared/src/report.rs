//! Three-step issue report wizard: photo, category, details.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::DEFAULT_REPORT_LOCATION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Garbage,
    Pothole,
    Graffiti,
    Other,
}

impl Category {
    pub const ALL: [Self; 4] = [Self::Garbage, Self::Pothole, Self::Graffiti, Self::Other];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Garbage => "garbage",
            Self::Pothole => "pothole",
            Self::Graffiti => "graffiti",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Garbage => "Garbage",
            Self::Pothole => "Pothole",
            Self::Graffiti => "Graffiti",
            Self::Other => "Other",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Opaque handle to a captured photo. The bytes live with the shell.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Photo,
    Category,
    Details,
}

impl WizardStep {
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Photo => 1,
            Self::Category => 2,
            Self::Details => 3,
        }
    }

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Photo => Some(Self::Category),
            Self::Category => Some(Self::Details),
            Self::Details => None,
        }
    }

    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Photo => None,
            Self::Category => Some(Self::Photo),
            Self::Details => Some(Self::Category),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}", self.number())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReportDraft {
    pub step: WizardStep,
    pub image: Option<ImageRef>,
    pub category: Option<Category>,
    pub description: String,
    pub location: String,
}

impl Default for ReportDraft {
    fn default() -> Self {
        Self {
            step: WizardStep::Photo,
            image: None,
            category: None,
            description: String::new(),
            location: DEFAULT_REPORT_LOCATION.to_string(),
        }
    }
}

impl ReportDraft {
    /// Whether the current step has what it needs to move forward.
    #[must_use]
    pub fn step_complete(&self) -> bool {
        match self.step {
            WizardStep::Photo => self.image.is_some(),
            WizardStep::Category => self.category.is_some(),
            WizardStep::Details => true,
        }
    }
}

/// A completed draft, ready for the submission sink.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReportPayload {
    pub client_ref: Uuid,
    pub image: ImageRef,
    pub category: Category,
    pub description: String,
    pub location: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("{command} is only available at {expected}, wizard is at {actual}")]
    WrongStep {
        command: &'static str,
        expected: WizardStep,
        actual: WizardStep,
    },

    #[error("a photo is required before continuing")]
    MissingImage,

    #[error("a category is required before continuing")]
    MissingCategory,

    #[error("already at the first step")]
    AtFirstStep,

    #[error("already at the last step, submit instead")]
    AtFinalStep,

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("no submission with reference {0} is in flight")]
    UnknownSubmission(Uuid),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum WizardCommand {
    SetImage(ImageRef),
    ClearImage,
    Advance,
    Retreat,
    SetCategory(Category),
    SetDescription(String),
    SetLocation(String),
    Submit,
    Cancel,
}

impl WizardCommand {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetImage(_) => "set_image",
            Self::ClearImage => "clear_image",
            Self::Advance => "advance",
            Self::Retreat => "retreat",
            Self::SetCategory(_) => "set_category",
            Self::SetDescription(_) => "set_description",
            Self::SetLocation(_) => "set_location",
            Self::Submit => "submit",
            Self::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    Updated,
    Submitted(ReportPayload),
    Cancelled,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportWizard {
    draft: ReportDraft,
    in_flight: Option<Uuid>,
}

impl ReportWizard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn draft(&self) -> &ReportDraft {
        &self.draft
    }

    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.draft.step
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Enablement of the primary button: "Continue" on steps 1 and 2,
    /// "Submit" on step 3.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        !self.is_submitting() && self.draft.step_complete()
    }

    #[must_use]
    pub fn can_retreat(&self) -> bool {
        !self.is_submitting() && self.draft.step.previous().is_some()
    }

    pub fn apply(&mut self, command: WizardCommand) -> Result<WizardOutcome, WizardError> {
        let updated = match command {
            WizardCommand::SetImage(image) => self.set_image(image),
            WizardCommand::ClearImage => self.clear_image(),
            WizardCommand::Advance => self.advance(),
            WizardCommand::Retreat => self.retreat(),
            WizardCommand::SetCategory(category) => self.set_category(category),
            WizardCommand::SetDescription(text) => self.set_description(text),
            WizardCommand::SetLocation(text) => self.set_location(text),
            WizardCommand::Submit => return self.submit().map(WizardOutcome::Submitted),
            WizardCommand::Cancel => {
                self.reset();
                return Ok(WizardOutcome::Cancelled);
            }
        };
        updated.map(|()| WizardOutcome::Updated)
    }

    fn require_step(&self, command: &'static str, expected: WizardStep) -> Result<(), WizardError> {
        if self.is_submitting() {
            return Err(WizardError::SubmissionInFlight);
        }
        if self.draft.step != expected {
            return Err(WizardError::WrongStep {
                command,
                expected,
                actual: self.draft.step,
            });
        }
        Ok(())
    }

    pub fn set_image(&mut self, image: ImageRef) -> Result<(), WizardError> {
        self.require_step("set_image", WizardStep::Photo)?;
        self.draft.image = Some(image);
        Ok(())
    }

    pub fn clear_image(&mut self) -> Result<(), WizardError> {
        self.require_step("clear_image", WizardStep::Photo)?;
        self.draft.image = None;
        Ok(())
    }

    pub fn set_category(&mut self, category: Category) -> Result<(), WizardError> {
        self.require_step("set_category", WizardStep::Category)?;
        self.draft.category = Some(category);
        Ok(())
    }

    pub fn set_description(&mut self, text: impl Into<String>) -> Result<(), WizardError> {
        self.require_step("set_description", WizardStep::Details)?;
        self.draft.description = text.into();
        Ok(())
    }

    pub fn set_location(&mut self, text: impl Into<String>) -> Result<(), WizardError> {
        self.require_step("set_location", WizardStep::Details)?;
        self.draft.location = text.into();
        Ok(())
    }

    pub fn advance(&mut self) -> Result<(), WizardError> {
        if self.is_submitting() {
            return Err(WizardError::SubmissionInFlight);
        }
        let next = self.draft.step.next().ok_or(WizardError::AtFinalStep)?;
        if !self.draft.step_complete() {
            return Err(match self.draft.step {
                WizardStep::Photo => WizardError::MissingImage,
                _ => WizardError::MissingCategory,
            });
        }
        self.draft.step = next;
        Ok(())
    }

    /// Moves back one step. Field values are kept.
    pub fn retreat(&mut self) -> Result<(), WizardError> {
        if self.is_submitting() {
            return Err(WizardError::SubmissionInFlight);
        }
        self.draft.step = self.draft.step.previous().ok_or(WizardError::AtFirstStep)?;
        Ok(())
    }

    /// Hands the completed draft out for submission. The draft stays in
    /// place until the sink answers.
    pub fn submit(&mut self) -> Result<ReportPayload, WizardError> {
        self.require_step("submit", WizardStep::Details)?;
        let (Some(image), Some(category)) = (self.draft.image.clone(), self.draft.category) else {
            // Only reachable if the draft was built bypassing `advance`.
            return Err(if self.draft.image.is_none() {
                WizardError::MissingImage
            } else {
                WizardError::MissingCategory
            });
        };

        let client_ref = Uuid::new_v4();
        self.in_flight = Some(client_ref);
        Ok(ReportPayload {
            client_ref,
            image,
            category,
            description: self.draft.description.clone(),
            location: self.draft.location.clone(),
        })
    }

    pub fn submission_succeeded(&mut self, client_ref: Uuid) -> Result<(), WizardError> {
        self.check_in_flight(client_ref)?;
        self.reset();
        Ok(())
    }

    /// Keeps the draft at the last step so the user can retry.
    pub fn submission_failed(&mut self, client_ref: Uuid) -> Result<(), WizardError> {
        self.check_in_flight(client_ref)?;
        self.in_flight = None;
        Ok(())
    }

    #[must_use]
    pub fn awaits(&self, client_ref: Uuid) -> bool {
        self.in_flight == Some(client_ref)
    }

    fn check_in_flight(&self, client_ref: Uuid) -> Result<(), WizardError> {
        match self.in_flight {
            Some(current) if current == client_ref => Ok(()),
            _ => Err(WizardError::UnknownSubmission(client_ref)),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn photo() -> ImageRef {
        ImageRef::new("file:///tmp/issue.jpg")
    }

    fn at_details() -> ReportWizard {
        let mut wizard = ReportWizard::new();
        wizard.set_image(photo()).unwrap();
        wizard.advance().unwrap();
        wizard.set_category(Category::Pothole).unwrap();
        wizard.advance().unwrap();
        wizard
    }

    #[test]
    fn initial_draft() {
        let wizard = ReportWizard::new();
        assert_eq!(wizard.step(), WizardStep::Photo);
        assert_eq!(wizard.draft().image, None);
        assert_eq!(wizard.draft().category, None);
        assert_eq!(wizard.draft().description, "");
        assert_eq!(wizard.draft().location, "Current Location");
        assert!(!wizard.can_advance());
        assert!(!wizard.can_retreat());
    }

    #[test]
    fn advance_without_image_is_rejected() {
        let mut wizard = ReportWizard::new();
        assert_eq!(wizard.advance(), Err(WizardError::MissingImage));
        assert_eq!(wizard.step(), WizardStep::Photo);
    }

    #[test]
    fn advance_with_image_moves_to_category() {
        let mut wizard = ReportWizard::new();
        wizard.set_image(photo()).unwrap();
        assert!(wizard.can_advance());
        wizard.advance().unwrap();
        assert_eq!(wizard.step(), WizardStep::Category);
        assert!(!wizard.can_advance());
    }

    #[test]
    fn clearing_image_disables_continue() {
        let mut wizard = ReportWizard::new();
        wizard.set_image(photo()).unwrap();
        wizard.clear_image().unwrap();
        assert!(!wizard.can_advance());
        assert_eq!(wizard.advance(), Err(WizardError::MissingImage));
    }

    #[test]
    fn category_gate() {
        let mut wizard = ReportWizard::new();
        wizard.set_image(photo()).unwrap();
        wizard.advance().unwrap();
        assert_eq!(wizard.advance(), Err(WizardError::MissingCategory));
        wizard.set_category(Category::Graffiti).unwrap();
        wizard.advance().unwrap();
        assert_eq!(wizard.step(), WizardStep::Details);
    }

    #[test]
    fn details_step_has_no_forward_gate() {
        let wizard = at_details();
        assert!(wizard.can_advance());
        assert_eq!(wizard.clone().advance(), Err(WizardError::AtFinalStep));
    }

    #[test]
    fn setters_are_step_local() {
        let mut wizard = ReportWizard::new();
        assert_matches::assert_matches!(
            wizard.set_category(Category::Garbage),
            Err(WizardError::WrongStep { expected: WizardStep::Category, .. })
        );
        assert_matches::assert_matches!(
            wizard.set_description("broken bench"),
            Err(WizardError::WrongStep { expected: WizardStep::Details, .. })
        );

        let mut wizard = at_details();
        assert_matches::assert_matches!(
            wizard.set_image(photo()),
            Err(WizardError::WrongStep { actual: WizardStep::Details, .. })
        );
    }

    #[test]
    fn retreat_keeps_fields() {
        let mut wizard = at_details();
        wizard.set_description("deep hole near the bus stop").unwrap();
        let before = wizard.draft().clone();

        wizard.retreat().unwrap();
        assert_eq!(wizard.step(), WizardStep::Category);
        assert_eq!(wizard.draft().category, Some(Category::Pothole));

        wizard.advance().unwrap();
        assert_eq!(wizard.draft(), &before);
    }

    #[test]
    fn retreat_at_first_step_is_rejected() {
        let mut wizard = ReportWizard::new();
        assert_eq!(wizard.retreat(), Err(WizardError::AtFirstStep));
    }

    #[test]
    fn submit_only_at_details() {
        let mut wizard = ReportWizard::new();
        wizard.set_image(photo()).unwrap();
        assert_matches::assert_matches!(wizard.submit(), Err(WizardError::WrongStep { .. }));
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn submit_then_success_resets() {
        let mut wizard = at_details();
        wizard.set_location("5th and Main").unwrap();
        let payload = wizard.submit().unwrap();
        assert_eq!(payload.category, Category::Pothole);
        assert_eq!(payload.image, photo());
        assert_eq!(payload.location, "5th and Main");
        assert!(wizard.is_submitting());
        assert!(!wizard.can_advance());

        wizard.submission_succeeded(payload.client_ref).unwrap();
        assert_eq!(wizard, ReportWizard::new());
        assert_eq!(wizard.step(), WizardStep::Photo);
    }

    #[test]
    fn failed_submission_allows_retry() {
        let mut wizard = at_details();
        let payload = wizard.submit().unwrap();
        assert_eq!(wizard.submit(), Err(WizardError::SubmissionInFlight));

        wizard.submission_failed(payload.client_ref).unwrap();
        assert_eq!(wizard.step(), WizardStep::Details);
        assert_eq!(wizard.draft().category, Some(Category::Pothole));

        let retry = wizard.submit().unwrap();
        assert_ne!(retry.client_ref, payload.client_ref);
    }

    #[test]
    fn stale_receipt_is_rejected() {
        let mut wizard = at_details();
        let _payload = wizard.submit().unwrap();
        let stale = Uuid::new_v4();
        assert_eq!(
            wizard.submission_succeeded(stale),
            Err(WizardError::UnknownSubmission(stale))
        );
        assert!(wizard.is_submitting());
    }

    #[test]
    fn cancel_discards_draft() {
        let mut wizard = at_details();
        assert_eq!(wizard.apply(WizardCommand::Cancel), Ok(WizardOutcome::Cancelled));
        assert_eq!(wizard, ReportWizard::new());
    }

    #[test]
    fn category_ids_parse() {
        assert_eq!(Category::from_id("pothole"), Some(Category::Pothole));
        assert_eq!(Category::from_id("litter"), None);
    }

    fn any_command() -> impl Strategy<Value = WizardCommand> {
        prop_oneof![
            "[a-z]{1,8}".prop_map(|uri| WizardCommand::SetImage(ImageRef(uri))),
            Just(WizardCommand::ClearImage),
            Just(WizardCommand::Advance),
            Just(WizardCommand::Retreat),
            proptest::sample::select(Category::ALL.to_vec()).prop_map(WizardCommand::SetCategory),
            ".{0,12}".prop_map(WizardCommand::SetDescription),
            ".{0,12}".prop_map(WizardCommand::SetLocation),
        ]
    }

    proptest! {
        #[test]
        fn step_gates_hold_for_any_sequence(
            commands in proptest::collection::vec(any_command(), 0..48)
        ) {
            let mut wizard = ReportWizard::new();
            for command in commands {
                let before = wizard.clone();
                if wizard.apply(command).is_err() {
                    prop_assert_eq!(&wizard, &before);
                }
                let draft = wizard.draft();
                if draft.step > WizardStep::Photo {
                    prop_assert!(draft.image.is_some());
                }
                if draft.step > WizardStep::Category {
                    prop_assert!(draft.category.is_some());
                }
            }
        }
    }
}
