use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use zeroize::Zeroize;

use crate::navigation::Screen;

// --- Password wrapper: redacts Debug, zeroizes on Drop ---

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CitizenRole {
    #[default]
    Reporter,
    Volunteer,
}

/// Third-party sign-in offered on the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialProvider {
    Google,
    Phone,
}

impl SocialProvider {
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Phone => "phone",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Login {
        identifier: String,
        password: Password,
    },
    CitizenSignup {
        full_name: String,
        email: String,
        phone: String,
        password: Password,
        role: CitizenRole,
    },
    NgoSignup {
        org_name: String,
        contact_person: String,
        email: String,
        phone: String,
        ngo_id: String,
        password: Password,
    },
    /// The provider collects the identity itself; nothing to presence-check.
    Social {
        provider: SocialProvider,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthFormError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("{form} credentials cannot be submitted from {screen}")]
    WrongScreen { form: &'static str, screen: Screen },

    #[error("an authentication request is already pending")]
    AlreadyPending,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl Credentials {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::CitizenSignup { .. } => "citizen_signup",
            Self::NgoSignup { .. } => "ngo_signup",
            Self::Social { .. } => "social",
        }
    }

    /// The pre-auth screen that collects these credentials.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        match self {
            Self::Login { .. } | Self::Social { .. } => Screen::Login,
            Self::CitizenSignup { .. } => Screen::CitizenSignup,
            Self::NgoSignup { .. } => Screen::NgoSignup,
        }
    }

    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let (texts, password): (Vec<(&'static str, &str)>, &Password) = match self {
            Self::Login {
                identifier,
                password,
            } => (vec![("identifier", identifier.as_str())], password),
            Self::CitizenSignup {
                full_name,
                email,
                phone,
                password,
                role: _,
            } => (
                vec![
                    ("full_name", full_name.as_str()),
                    ("email", email.as_str()),
                    ("phone", phone.as_str()),
                ],
                password,
            ),
            Self::NgoSignup {
                org_name,
                contact_person,
                email,
                phone,
                ngo_id,
                password,
            } => (
                vec![
                    ("org_name", org_name.as_str()),
                    ("contact_person", contact_person.as_str()),
                    ("email", email.as_str()),
                    ("phone", phone.as_str()),
                    ("ngo_id", ngo_id.as_str()),
                ],
                password,
            ),
            Self::Social { .. } => return Vec::new(),
        };

        let mut missing: Vec<&'static str> = texts
            .into_iter()
            .filter(|(_, value)| blank(value))
            .map(|(name, _)| name)
            .collect();
        if password.is_blank() {
            missing.push("password");
        }
        missing
    }

    pub fn validate(&self) -> Result<(), AuthFormError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AuthFormError::MissingFields(missing))
        }
    }

    /// Presence check plus the screen gate: credentials are only accepted
    /// from the form that collects them.
    pub fn validate_on(&self, screen: Screen) -> Result<(), AuthFormError> {
        if self.screen() != screen {
            return Err(AuthFormError::WrongScreen {
                form: self.kind(),
                screen,
            });
        }
        self.validate()
    }
}
