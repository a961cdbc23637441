use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Scheduling form an NGO fills in to claim an issue from the map.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClaimForm {
    pub issue_name: String,
    pub issue_location: String,
    pub date: String,
    pub time: String,
    pub meeting_point: String,
    #[serde(skip)]
    in_flight: Option<Uuid>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClaimPayload {
    pub client_ref: Uuid,
    pub issue_name: String,
    pub date: String,
    pub time: String,
    pub meeting_point: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimField {
    Date,
    Time,
    MeetingPoint,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ClaimCommand {
    SetDate(String),
    SetTime(String),
    SetMeetingPoint(String),
    Confirm,
    Close,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClaimError {
    #[error("missing required fields: {missing:?}")]
    Incomplete { missing: Vec<ClaimField> },

    #[error("the claim is already being confirmed")]
    ConfirmationInFlight,

    #[error("no claim with reference {0} is in flight")]
    UnknownConfirmation(Uuid),
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl ClaimForm {
    pub fn new(issue_name: impl Into<String>, issue_location: impl Into<String>) -> Self {
        let issue_location = issue_location.into();
        Self {
            issue_name: issue_name.into(),
            meeting_point: issue_location.clone(),
            issue_location,
            date: String::new(),
            time: String::new(),
            in_flight: None,
        }
    }

    #[must_use]
    pub fn missing_fields(&self) -> Vec<ClaimField> {
        [
            (ClaimField::Date, &self.date),
            (ClaimField::Time, &self.time),
            (ClaimField::MeetingPoint, &self.meeting_point),
        ]
        .into_iter()
        .filter(|(_, value)| blank(value))
        .map(|(field, _)| field)
        .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    #[must_use]
    pub fn is_confirming(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn can_confirm(&self) -> bool {
        !self.is_confirming() && self.is_complete()
    }

    fn editable(&self) -> Result<(), ClaimError> {
        if self.is_confirming() {
            Err(ClaimError::ConfirmationInFlight)
        } else {
            Ok(())
        }
    }

    pub fn set_date(&mut self, date: impl Into<String>) -> Result<(), ClaimError> {
        self.editable()?;
        self.date = date.into();
        Ok(())
    }

    pub fn set_time(&mut self, time: impl Into<String>) -> Result<(), ClaimError> {
        self.editable()?;
        self.time = time.into();
        Ok(())
    }

    pub fn set_meeting_point(&mut self, meeting_point: impl Into<String>) -> Result<(), ClaimError> {
        self.editable()?;
        self.meeting_point = meeting_point.into();
        Ok(())
    }

    pub fn confirm(&mut self) -> Result<ClaimPayload, ClaimError> {
        self.editable()?;
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ClaimError::Incomplete { missing });
        }

        let client_ref = Uuid::new_v4();
        self.in_flight = Some(client_ref);
        Ok(ClaimPayload {
            client_ref,
            issue_name: self.issue_name.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            meeting_point: self.meeting_point.clone(),
        })
    }

    /// Clears the in-flight marker after a failed confirmation.
    pub fn confirmation_failed(&mut self, client_ref: Uuid) -> Result<(), ClaimError> {
        match self.in_flight {
            Some(current) if current == client_ref => {
                self.in_flight = None;
                Ok(())
            }
            _ => Err(ClaimError::UnknownConfirmation(client_ref)),
        }
    }

    #[must_use]
    pub fn awaits(&self, client_ref: Uuid) -> bool {
        self.in_flight == Some(client_ref)
    }
}
