//! Auth-session store for the current context.
//!
//! ARCHITECTURE
//! ============
//! [`AuthSession`] is the single writer of the in-memory identity. It is
//! constructed explicitly with its gateway (and through it, the vault),
//! never a hidden static, so embedders and tests inject their own
//! collaborators. Startup restores and re-validates the cached record;
//! afterwards only the mutators and externally-originated vault events
//! may replace the user, always wholesale.
//!
//! ORDERING
//! ========
//! Within one context, updates land in the order their initiating calls
//! complete. Vault events from other contexts are applied as they arrive
//! with no ordering relative to a mutator already in flight: last write
//! wins, an accepted race inherited from the storage-event contract.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;

use crate::net::gateway::{AuthError, AuthGateway};
use crate::net::types::{Credentials, SignupData, SignupOutcome, User};
use crate::persist::{SessionVault, VaultEvent};

/// Authentication state tracking the current user and loading status.
///
/// `loading` is true only during the initial restore-and-validate step;
/// `user` is either a fully populated record or absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
}

impl AuthState {
    /// Whether a user is currently logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Per-context session store over an [`AuthGateway`].
///
/// At most one auth mutator may be in flight at a time; a second caller
/// gets [`AuthError::OperationInFlight`] instead of racing the first.
pub struct AuthSession {
    gateway: AuthGateway,
    state: Arc<watch::Sender<AuthState>>,
    mutator: Mutex<()>,
    listener: JoinHandle<()>,
}

impl AuthSession {
    /// Start a session: restore and re-validate the cached record, then
    /// begin applying vault changes made by other contexts.
    ///
    /// Restore failures are absorbed into a logged-out state; startup
    /// itself never fails.
    pub async fn start(gateway: AuthGateway) -> Self {
        let (state, _) = watch::channel(AuthState {
            user: None,
            loading: true,
        });
        let state = Arc::new(state);

        let restored = gateway.current_user().await;
        state.send_replace(AuthState {
            user: restored,
            loading: false,
        });

        let vault = gateway.vault();
        let events = vault.subscribe();
        let listener = tokio::spawn(apply_vault_events(
            events,
            vault,
            Arc::clone(&state),
        ));

        Self {
            gateway,
            state,
            mutator: Mutex::new(()),
            listener,
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Currently logged-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Whether a user is currently logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().user.is_some()
    }

    /// Whether the initial restore is still running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Watch the session state; the receiver yields on every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Gateway this session drives.
    #[must_use]
    pub fn gateway(&self) -> &AuthGateway {
        &self.gateway
    }

    /// Log in and assign the resulting user.
    ///
    /// # Errors
    ///
    /// Propagates the gateway failure; the in-memory state is untouched
    /// on error.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let _guard = self
            .mutator
            .try_lock()
            .map_err(|_| AuthError::OperationInFlight)?;
        let user = self.gateway.login(credentials).await?;
        self.state
            .send_modify(|state| state.user = Some(user.clone()));
        Ok(user)
    }

    /// Sign up; assigns the user only when the backend returned an active
    /// one.
    ///
    /// # Errors
    ///
    /// Propagates the gateway failure.
    pub async fn signup(&self, data: &SignupData) -> Result<SignupOutcome, AuthError> {
        let _guard = self
            .mutator
            .try_lock()
            .map_err(|_| AuthError::OperationInFlight)?;
        let outcome = self.gateway.signup(data).await?;
        if let Some(user) = &outcome.user {
            self.state
                .send_modify(|state| state.user = Some(user.clone()));
        }
        Ok(outcome)
    }

    /// Log out. Never fails; waits for an in-flight mutator rather than
    /// erroring, then clears both the vault and the in-memory user.
    pub async fn logout(&self) {
        let _guard = self.mutator.lock().await;
        self.gateway.logout().await;
        self.state.send_modify(|state| state.user = None);
    }
}

impl Drop for AuthSession {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// Apply externally-originated vault changes to the store.
///
/// Self-originated events are skipped; this is the only path by which
/// another context may mutate this store. An unparseable payload degrades
/// this context to logged out.
async fn apply_vault_events(
    mut events: broadcast::Receiver<VaultEvent>,
    vault: Arc<dyn SessionVault>,
    state: Arc<watch::Sender<AuthState>>,
) {
    let own_handle = vault.handle_id();
    loop {
        match events.recv().await {
            Ok(event) => {
                if event.writer == own_handle {
                    continue;
                }
                apply_record(&state, event.value.as_deref());
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // Missed events are fine; the vault itself is newest.
                tracing::debug!(skipped, "vault event stream lagged; re-reading record");
                let value = vault.load();
                apply_record(&state, value.as_deref());
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn apply_record(state: &watch::Sender<AuthState>, raw: Option<&str>) {
    let user = raw.and_then(|raw| match serde_json::from_str::<User>(raw) {
        Ok(user) => Some(user),
        Err(error) => {
            tracing::warn!(%error, "cross-context session payload unparseable; treating as logged out");
            None
        }
    });
    state.send_modify(|current| current.user = user);
}
