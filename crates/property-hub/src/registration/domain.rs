use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::role::Role;

/// Validated sign-up payload handed to the [`AccountRegistrar`].
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInput {
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

impl fmt::Debug for RegistrationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationInput")
            .field("role", &self.role)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .field("accept_terms", &self.accept_terms)
            .finish()
    }
}

/// Account details returned by the auth provider after sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredUser {
    pub id: String,
    /// Role string as the provider reports it; may name roles the form never offers.
    pub role: String,
    pub first_name: String,
    #[serde(skip_serializing)]
    pub session_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationResult {
    pub success: bool,
    pub user: Option<RegisteredUser>,
}

impl RegistrationResult {
    pub fn accepted(user: RegisteredUser) -> Self {
        Self {
            success: true,
            user: Some(user),
        }
    }

    pub fn declined() -> Self {
        Self {
            success: false,
            user: None,
        }
    }
}

/// Error raised by an [`AccountRegistrar`].
#[derive(Debug, thiserror::Error)]
pub enum RegistrarError {
    #[error("registration rejected: {0}")]
    Rejected(String),
    #[error("registration service unavailable: {0}")]
    Unavailable(String),
    #[error("registration cancelled")]
    Cancelled,
}

/// External account-creation collaborator (the auth/session provider).
///
/// Implementations should stop work once `cancel` fires; the form also stops waiting on
/// its own when the token is cancelled.
#[async_trait]
pub trait AccountRegistrar: Send + Sync {
    async fn register(
        &self,
        input: &RegistrationInput,
        cancel: &CancellationToken,
    ) -> Result<RegistrationResult, RegistrarError>;
}

/// Read-only view of the current session.
pub trait SessionState {
    fn is_authenticated(&self) -> bool;
}

impl SessionState for bool {
    fn is_authenticated(&self) -> bool {
        *self
    }
}
