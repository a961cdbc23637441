use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::Credentials;

pub struct Auth<E> {
    context: CapabilityContext<AuthOperation, E>,
}

impl<Ev> Capability<Ev> for Auth<Ev> {
    type Operation = AuthOperation;
    type MappedSelf<MappedEv> = Auth<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Auth::new(self.context.map_event(f))
    }
}

impl<E> Auth<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<AuthOperation, E>) -> Self {
        Self { context }
    }

    /// Sends credentials to the authentication service. Login and both
    /// sign-up flows go through the same request.
    pub fn authenticate<F>(&self, credentials: Credentials, callback: F)
    where
        F: FnOnce(AuthResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(AuthOperation::Authenticate(credentials))
                .await;
            ctx.update_app(callback(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthOperation {
    Authenticate(Credentials),
}

impl Operation for AuthOperation {
    type Output = AuthResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthGrant {
    pub account_id: String,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthError {
    #[error("credentials rejected: {reason}")]
    Rejected { reason: String },

    #[error("account already exists")]
    AlreadyRegistered,

    #[error("authentication service unavailable: {reason}")]
    Unavailable { reason: String },
}

impl AuthError {
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self {
            Self::Rejected { .. } => "Those details didn't match an account. Please try again.".into(),
            Self::AlreadyRegistered => {
                "An account with these details already exists. Try signing in instead.".into()
            }
            Self::Unavailable { .. } => {
                "Unable to reach the server. Please check your connection and try again.".into()
            }
        }
    }
}

pub type AuthResult = Result<AuthGrant, AuthError>;
