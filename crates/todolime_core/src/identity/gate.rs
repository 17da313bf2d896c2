//! Identity gate contract.
//!
//! The gate wraps a hosted auth provider. Task logic only needs to know
//! whether a user is signed in; everything else is pass-through for the UI.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::Receiver;

/// Signed-in account as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserIdentity {
    /// Provider-stable user id.
    pub uid: String,
    pub email: String,
}

/// Observed auth state; `None` means signed out.
pub type AuthState = Option<UserIdentity>;

/// Provider failure surfaced verbatim to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityError {
    /// Stable machine-readable code, e.g. `auth/wrong-password`.
    pub code: String,
    /// Human-readable provider message.
    pub message: String,
}

impl IdentityError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl Display for IdentityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl Error for IdentityError {}

pub type IdentityResult<T> = Result<T, IdentityError>;

/// Hosted identity provider boundary.
///
/// Implementations use interior mutability so one handle can be shared by
/// the session and the UI.
pub trait IdentityGate {
    /// Currently signed-in user, if any.
    fn current_user(&self) -> AuthState;

    /// Opens an auth-state observation stream.
    ///
    /// The receiver yields the current state immediately, then one value per
    /// sign-in or sign-out.
    fn subscribe(&self) -> Receiver<AuthState>;

    fn sign_in(&self, email: &str, password: &str) -> IdentityResult<UserIdentity>;

    /// Creates an account and signs it in.
    fn register(&self, email: &str, password: &str) -> IdentityResult<UserIdentity>;

    fn request_password_reset(&self, email: &str) -> IdentityResult<()>;

    fn sign_out(&self) -> IdentityResult<()>;
}
