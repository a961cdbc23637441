//! Top-level screen state machine.
//!
//! The session decides what is on screen and gates every post-auth screen
//! behind the authentication flag. All transitions are total: a command whose
//! precondition does not hold leaves the session untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Welcome,
    CitizenSignup,
    NgoSignup,
    Login,
    Home,
    Map,
    Report,
    Profile,
    Messages,
    ChatRoom,
    Settings,
    EditProfile,
}

impl Screen {
    pub const PRE_AUTH: [Self; 4] = [
        Self::Welcome,
        Self::CitizenSignup,
        Self::NgoSignup,
        Self::Login,
    ];

    pub const POST_AUTH: [Self; 8] = [
        Self::Home,
        Self::Map,
        Self::Report,
        Self::Profile,
        Self::Messages,
        Self::ChatRoom,
        Self::Settings,
        Self::EditProfile,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::CitizenSignup => "citizen-signup",
            Self::NgoSignup => "ngo-signup",
            Self::Login => "login",
            Self::Home => "home",
            Self::Map => "map",
            Self::Report => "report",
            Self::Profile => "profile",
            Self::Messages => "messages",
            Self::ChatRoom => "chat-room",
            Self::Settings => "settings",
            Self::EditProfile => "edit-profile",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::PRE_AUTH
            .into_iter()
            .chain(Self::POST_AUTH)
            .find(|screen| screen.id() == id)
    }

    #[must_use]
    pub const fn is_pre_auth(self) -> bool {
        matches!(
            self,
            Self::Welcome | Self::CitizenSignup | Self::NgoSignup | Self::Login
        )
    }

    #[must_use]
    pub const fn is_post_auth(self) -> bool {
        !self.is_pre_auth()
    }

    /// Whether this screen may be shown for the given authentication state.
    #[must_use]
    pub const fn allowed_when(self, authenticated: bool) -> bool {
        if authenticated {
            self.is_post_auth()
        } else {
            self.is_pre_auth()
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bottom navigation entries, shown only while authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Watch,
    Do,
    Report,
    Messages,
    Profile,
}

impl Tab {
    pub const ALL: [Self; 5] = [
        Self::Watch,
        Self::Do,
        Self::Report,
        Self::Messages,
        Self::Profile,
    ];

    #[must_use]
    pub const fn target(self) -> Screen {
        match self {
            Self::Watch => Screen::Home,
            Self::Do => Screen::Map,
            Self::Report => Screen::Report,
            Self::Messages => Screen::Messages,
            Self::Profile => Screen::Profile,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Watch => "Watch",
            Self::Do => "Do",
            Self::Report => "Report",
            Self::Messages => "Message",
            Self::Profile => "Profile",
        }
    }

    /// The tab highlighted while `screen` is shown, if any.
    #[must_use]
    pub const fn for_screen(screen: Screen) -> Option<Self> {
        match screen {
            Screen::Home => Some(Self::Watch),
            Screen::Map => Some(Self::Do),
            Screen::Report => Some(Self::Report),
            Screen::Messages | Screen::ChatRoom => Some(Self::Messages),
            Screen::Profile => Some(Self::Profile),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum NavCommand {
    SelectCitizenSignup,
    SelectNgoSignup,
    SelectLogin,
    SwitchToLogin,
    CompleteAuth,
    Logout,
    GoBackToWelcome,
    Navigate(Screen),
    SelectTab(Tab),
    OpenConversation(ConversationId),
    JoinCleanup,
    OpenSettings,
    OpenEditProfile,
    SaveProfile,
    Back,
}

impl NavCommand {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectCitizenSignup => "select_citizen_signup",
            Self::SelectNgoSignup => "select_ngo_signup",
            Self::SelectLogin => "select_login",
            Self::SwitchToLogin => "switch_to_login",
            Self::CompleteAuth => "complete_auth",
            Self::Logout => "logout",
            Self::GoBackToWelcome => "go_back_to_welcome",
            Self::Navigate(_) => "navigate",
            Self::SelectTab(_) => "select_tab",
            Self::OpenConversation(_) => "open_conversation",
            Self::JoinCleanup => "join_cleanup",
            Self::OpenSettings => "open_settings",
            Self::OpenEditProfile => "open_edit_profile",
            Self::SaveProfile => "save_profile",
            Self::Back => "back",
        }
    }
}

/// Screen shown when the stored screen is not valid for the auth state.
#[must_use]
pub const fn fallback_screen(authenticated: bool) -> Screen {
    if authenticated {
        Screen::Home
    } else {
        Screen::Welcome
    }
}

/// Coerces `screen` into the set allowed for `authenticated`.
#[must_use]
pub const fn resolve_screen(authenticated: bool, screen: Screen) -> Screen {
    if screen.allowed_when(authenticated) {
        screen
    } else {
        fallback_screen(authenticated)
    }
}

/// Like [`resolve_screen`], for a raw identifier coming from a shell.
/// Unrecognized identifiers resolve to the fallback screen.
#[must_use]
pub fn resolve_screen_id(authenticated: bool, id: &str) -> Screen {
    Screen::from_id(id).map_or_else(
        || fallback_screen(authenticated),
        |screen| resolve_screen(authenticated, screen),
    )
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub active_screen: Screen,
    pub selected_conversation: Option<ConversationId>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            authenticated: false,
            active_screen: Screen::Welcome,
            selected_conversation: None,
        }
    }
}

impl Session {
    /// Rebuilds a session from externally stored values, applying the
    /// fallback rule to an unknown or cross-set screen identifier. A chat
    /// room with no conversation to show resolves to the messages list.
    #[must_use]
    pub fn restore(
        authenticated: bool,
        screen_id: &str,
        conversation: Option<ConversationId>,
    ) -> Self {
        let selected_conversation = conversation.filter(|_| authenticated);
        let active_screen = match resolve_screen_id(authenticated, screen_id) {
            Screen::ChatRoom if selected_conversation.is_none() => Screen::Messages,
            screen => screen,
        };
        Self {
            authenticated,
            active_screen,
            selected_conversation,
        }
    }

    #[must_use]
    pub const fn rendered_screen(&self) -> Screen {
        resolve_screen(self.authenticated, self.active_screen)
    }

    #[must_use]
    pub const fn active_tab(&self) -> Option<Tab> {
        if self.authenticated {
            Tab::for_screen(self.rendered_screen())
        } else {
            None
        }
    }

    fn on_pre_auth(&self) -> bool {
        !self.authenticated
    }

    fn showing(&self, screen: Screen) -> bool {
        self.rendered_screen() == screen
    }

    fn with_screen(&self, screen: Screen) -> Self {
        Self {
            active_screen: screen,
            ..self.clone()
        }
    }

    /// Applies one command and returns the next session.
    #[must_use]
    pub fn reduce(&self, command: NavCommand) -> Self {
        match command {
            NavCommand::SelectCitizenSignup if self.on_pre_auth() => {
                self.with_screen(Screen::CitizenSignup)
            }
            NavCommand::SelectNgoSignup if self.on_pre_auth() => {
                self.with_screen(Screen::NgoSignup)
            }
            NavCommand::SelectLogin | NavCommand::SwitchToLogin if self.on_pre_auth() => {
                self.with_screen(Screen::Login)
            }
            NavCommand::GoBackToWelcome if self.on_pre_auth() => {
                self.with_screen(Screen::Welcome)
            }

            // Idempotent: repeating it from home keeps (true, home).
            NavCommand::CompleteAuth => Self {
                authenticated: true,
                active_screen: Screen::Home,
                selected_conversation: self.selected_conversation.clone(),
            },

            NavCommand::Logout => Self::default(),

            NavCommand::Navigate(target) if self.authenticated && target.is_post_auth() => {
                self.with_screen(target)
            }

            NavCommand::SelectTab(tab) if self.authenticated => self.with_screen(tab.target()),

            NavCommand::OpenConversation(id) if self.authenticated => Self {
                authenticated: true,
                active_screen: Screen::ChatRoom,
                selected_conversation: Some(id),
            },

            NavCommand::JoinCleanup if self.authenticated && self.showing(Screen::Map) => {
                self.with_screen(Screen::ChatRoom)
            }

            NavCommand::OpenSettings if self.authenticated => self.with_screen(Screen::Settings),

            NavCommand::OpenEditProfile if self.authenticated && self.showing(Screen::Settings) => {
                self.with_screen(Screen::EditProfile)
            }

            NavCommand::SaveProfile if self.authenticated && self.showing(Screen::EditProfile) => {
                self.with_screen(Screen::Settings)
            }

            NavCommand::Back => match self.back_target() {
                Some(screen) => self.with_screen(screen),
                None => self.clone(),
            },

            _ => self.clone(),
        }
    }

    fn back_target(&self) -> Option<Screen> {
        match (self.authenticated, self.rendered_screen()) {
            (false, Screen::CitizenSignup | Screen::NgoSignup | Screen::Login) => {
                Some(Screen::Welcome)
            }
            (true, Screen::ChatRoom) => Some(Screen::Messages),
            (true, Screen::Settings | Screen::Report) => Some(Screen::Home),
            (true, Screen::EditProfile) => Some(Screen::Settings),
            _ => None,
        }
    }
}
