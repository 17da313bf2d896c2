//! Application session: view selection and identity-scoped task lists.
//!
//! # Responsibility
//! - Decide which top-level view is shown (landing, auth form, tasks).
//! - Route auth form submissions to the identity gate.
//! - Rebuild the task store for the signed-in user on every auth change.
//!
//! # Invariants
//! - A task store exists if and only if a user is signed in.
//! - Each user reads and writes only their own snapshot key.
//! - Auth failures leave session state unchanged and are returned verbatim.

use crate::identity::gate::{AuthState, IdentityGate, IdentityResult, UserIdentity};
use crate::model::filter::FilterMode;
use crate::model::task::Task;
use crate::repo::kv_store::KeyValueStore;
use crate::repo::snapshot_repo::KvSnapshotRepository;
use crate::service::task_store::TaskStore;
use log::info;
use std::sync::mpsc::{Receiver, TryRecvError};

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Landing,
    Auth,
    Tasks,
}

/// Picks the screen for the given flags.
///
/// A signed-in user always lands on the task list, even before `started`.
pub fn select_view(started: bool, user_present: bool) -> AppView {
    match (started, user_present) {
        (_, true) => AppView::Tasks,
        (true, false) => AppView::Auth,
        (false, false) => AppView::Landing,
    }
}

/// Which form the auth view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    Register,
    ResetPassword,
}

pub type SessionTaskStore<S> = TaskStore<KvSnapshotRepository<S>>;

/// One UI session bound to an identity gate and a key-value store.
pub struct AppSession<G: IdentityGate, S: KeyValueStore + Clone> {
    gate: G,
    store: S,
    auth_events: Receiver<AuthState>,
    started: bool,
    auth_mode: AuthMode,
    filter: FilterMode,
    user: AuthState,
    tasks: Option<SessionTaskStore<S>>,
}

impl<G: IdentityGate, S: KeyValueStore + Clone> AppSession<G, S> {
    /// Subscribes to `gate` and applies its current auth state.
    pub fn new(gate: G, store: S) -> Self {
        let auth_events = gate.subscribe();
        let mut session = Self {
            gate,
            store,
            auth_events,
            started: false,
            auth_mode: AuthMode::default(),
            filter: FilterMode::default(),
            user: None,
            tasks: None,
        };
        session.sync_auth_state();
        session
    }

    pub fn view(&self) -> AppView {
        select_view(self.started, self.user.is_some())
    }

    /// Leaves the landing page.
    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    pub fn set_auth_mode(&mut self, mode: AuthMode) {
        self.auth_mode = mode;
    }

    /// Submits the auth form for the current mode.
    ///
    /// A successful reset request switches the form back to sign-in.
    pub fn submit_auth(&mut self, email: &str, password: &str) -> IdentityResult<()> {
        match self.auth_mode {
            AuthMode::SignIn => {
                self.gate.sign_in(email, password)?;
            }
            AuthMode::Register => {
                self.gate.register(email, password)?;
            }
            AuthMode::ResetPassword => {
                self.gate.request_password_reset(email)?;
                self.auth_mode = AuthMode::SignIn;
            }
        }
        self.sync_auth_state();
        Ok(())
    }

    pub fn sign_out(&mut self) -> IdentityResult<()> {
        self.gate.sign_out()?;
        self.sync_auth_state();
        Ok(())
    }

    /// Drains pending auth events and applies the latest one.
    ///
    /// Returns whether the signed-in user changed.
    pub fn sync_auth_state(&mut self) -> bool {
        let mut latest = None;
        loop {
            match self.auth_events.try_recv() {
                Ok(state) => latest = Some(state),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        match latest {
            Some(state) if state != self.user => {
                self.apply_user(state);
                true
            }
            _ => false,
        }
    }

    pub fn current_user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }

    pub fn tasks(&self) -> Option<&SessionTaskStore<S>> {
        self.tasks.as_ref()
    }

    pub fn tasks_mut(&mut self) -> Option<&mut SessionTaskStore<S>> {
        self.tasks.as_mut()
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        self.filter = filter;
    }

    /// Tasks under the active filter; empty when signed out.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks
            .as_ref()
            .map(|store| store.view(self.filter))
            .unwrap_or_default()
    }

    fn apply_user(&mut self, state: AuthState) {
        self.tasks = state.as_ref().map(|user| {
            TaskStore::hydrate(KvSnapshotRepository::for_user(
                self.store.clone(),
                &user.uid,
            ))
        });
        info!(
            "event=session_auth_change module=session status=ok signed_in={}",
            state.is_some()
        );
        self.user = state;
    }
}

#[cfg(test)]
mod tests {
    use super::{select_view, AppView};

    #[test]
    fn select_view_truth_table() {
        assert_eq!(select_view(false, false), AppView::Landing);
        assert_eq!(select_view(true, false), AppView::Auth);
        assert_eq!(select_view(true, true), AppView::Tasks);
        assert_eq!(select_view(false, true), AppView::Tasks);
    }
}
