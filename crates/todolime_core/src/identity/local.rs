//! In-process identity provider.
//!
//! # Responsibility
//! - Implement `IdentityGate` without network access, for development
//!   builds and tests.
//! - Mirror the hosted provider's validation rules and error codes.
//!
//! # Invariants
//! - Emails are compared case-insensitively after trimming.
//! - Subscribers are notified only when the signed-in user changes.
//! - Accounts live in memory only and vanish with the process.

use crate::identity::gate::{AuthState, IdentityError, IdentityGate, IdentityResult, UserIdentity};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

pub const MIN_PASSWORD_CHARS: usize = 6;

pub const CODE_INVALID_EMAIL: &str = "auth/invalid-email";
pub const CODE_MISSING_PASSWORD: &str = "auth/missing-password";
pub const CODE_WEAK_PASSWORD: &str = "auth/weak-password";
pub const CODE_EMAIL_IN_USE: &str = "auth/email-already-in-use";
pub const CODE_USER_NOT_FOUND: &str = "auth/user-not-found";
pub const CODE_WRONG_PASSWORD: &str = "auth/wrong-password";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

struct Account {
    identity: UserIdentity,
    password: String,
}

#[derive(Default)]
struct GateState {
    accounts: BTreeMap<String, Account>,
    current: AuthState,
    subscribers: Vec<Sender<AuthState>>,
    reset_requests: Vec<String>,
}

impl GateState {
    fn set_current(&mut self, next: AuthState) {
        if self.current == next {
            return;
        }
        self.current = next;
        let snapshot = self.current.clone();
        self.subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
    }
}

/// Local `IdentityGate` implementation.
#[derive(Default)]
pub struct LocalIdentityGate {
    state: Mutex<GateState>,
}

impl LocalIdentityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emails that requested a password reset, oldest first.
    pub fn reset_requests(&self) -> Vec<String> {
        self.lock().reset_requests.clone()
    }

    pub fn account_count(&self) -> usize {
        self.lock().accounts.len()
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl IdentityGate for LocalIdentityGate {
    fn current_user(&self) -> AuthState {
        self.lock().current.clone()
    }

    fn subscribe(&self) -> Receiver<AuthState> {
        let (sender, receiver) = mpsc::channel();
        let mut state = self.lock();
        let _ = sender.send(state.current.clone());
        state.subscribers.push(sender);
        receiver
    }

    fn sign_in(&self, email: &str, password: &str) -> IdentityResult<UserIdentity> {
        let email = normalize_email(email)?;
        require_password(password)?;

        let mut state = self.lock();
        let identity = match state.accounts.get(&email) {
            None => {
                warn!("event=auth_sign_in module=identity status=error error_code={CODE_USER_NOT_FOUND}");
                return Err(user_not_found());
            }
            Some(account) if account.password != password => {
                warn!("event=auth_sign_in module=identity status=error error_code={CODE_WRONG_PASSWORD}");
                return Err(IdentityError::new(
                    CODE_WRONG_PASSWORD,
                    "The password is invalid or the user does not have a password.",
                ));
            }
            Some(account) => account.identity.clone(),
        };

        state.set_current(Some(identity.clone()));
        info!("event=auth_sign_in module=identity status=ok uid={}", identity.uid);
        Ok(identity)
    }

    fn register(&self, email: &str, password: &str) -> IdentityResult<UserIdentity> {
        let email = normalize_email(email)?;
        require_password(password)?;
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(IdentityError::new(
                CODE_WEAK_PASSWORD,
                format!("Password should be at least {MIN_PASSWORD_CHARS} characters."),
            ));
        }

        let mut state = self.lock();
        if state.accounts.contains_key(&email) {
            return Err(IdentityError::new(
                CODE_EMAIL_IN_USE,
                "The email address is already in use by another account.",
            ));
        }

        let identity = UserIdentity {
            uid: Uuid::new_v4().simple().to_string(),
            email: email.clone(),
        };
        state.accounts.insert(
            email,
            Account {
                identity: identity.clone(),
                password: password.to_string(),
            },
        );
        state.set_current(Some(identity.clone()));
        info!("event=auth_register module=identity status=ok uid={}", identity.uid);
        Ok(identity)
    }

    fn request_password_reset(&self, email: &str) -> IdentityResult<()> {
        let email = normalize_email(email)?;
        let mut state = self.lock();
        if !state.accounts.contains_key(&email) {
            return Err(user_not_found());
        }
        state.reset_requests.push(email);
        info!("event=auth_password_reset module=identity status=ok");
        Ok(())
    }

    fn sign_out(&self) -> IdentityResult<()> {
        self.lock().set_current(None);
        info!("event=auth_sign_out module=identity status=ok");
        Ok(())
    }
}

fn normalize_email(email: &str) -> IdentityResult<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if !EMAIL_RE.is_match(&normalized) {
        return Err(IdentityError::new(
            CODE_INVALID_EMAIL,
            "The email address is badly formatted.",
        ));
    }
    Ok(normalized)
}

fn require_password(password: &str) -> IdentityResult<()> {
    if password.is_empty() {
        return Err(IdentityError::new(
            CODE_MISSING_PASSWORD,
            "A password is required.",
        ));
    }
    Ok(())
}

fn user_not_found() -> IdentityError {
    IdentityError::new(
        CODE_USER_NOT_FOUND,
        "There is no user record corresponding to this identifier.",
    )
}

#[cfg(test)]
mod tests {
    use super::{normalize_email, CODE_INVALID_EMAIL};

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(
            normalize_email("  Ada@Example.COM ").expect("valid email"),
            "ada@example.com"
        );
    }

    #[test]
    fn normalize_email_rejects_malformed_values() {
        for value in ["", "ada", "ada@", "@example.com", "ada@example", "a da@x.io"] {
            let err = normalize_email(value).expect_err("malformed email must fail");
            assert_eq!(err.code, CODE_INVALID_EMAIL, "value: {value}");
        }
    }
}
