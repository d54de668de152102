//! Route admission helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected views should apply identical admission behavior: hold while
//! the initial restore runs, redirect when it settles unauthenticated,
//! render otherwise. The decision is re-evaluated on every session
//! change, never polled.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::state::auth::AuthState;

/// Admission outcome for a protected view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    /// The initial restore has not settled yet; show a placeholder.
    Loading,
    /// Settled and unauthenticated; send the user to the login entry.
    RedirectToLogin,
    /// Authenticated; render the protected content.
    Allow,
}

/// Decide admission for the given session state.
#[must_use]
pub fn route_decision(state: &AuthState) -> RouteDecision {
    if state.loading {
        return RouteDecision::Loading;
    }
    if state.user.is_none() {
        return RouteDecision::RedirectToLogin;
    }
    RouteDecision::Allow
}

/// Invoke `navigate` whenever the session settles with no user present.
///
/// Mirrors a route guard effect: the callback fires on the current state
/// if it already warrants a redirect, and again on every later change
/// that does. The returned handle can be aborted to uninstall the guard.
pub fn install_unauth_redirect<F>(
    mut auth: watch::Receiver<AuthState>,
    navigate: F,
) -> JoinHandle<()>
where
    F: Fn() + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let decision = route_decision(&auth.borrow_and_update());
            if decision == RouteDecision::RedirectToLogin {
                navigate();
            }
            if auth.changed().await.is_err() {
                break;
            }
        }
    })
}
