use std::time::Duration;

use super::*;
use crate::net::types::User;

fn user() -> User {
    User {
        id: "u1".to_owned(),
        email: "a@b.com".to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Byron".to_owned(),
        role: "user".to_owned(),
    }
}

// =============================================================================
// route_decision
// =============================================================================

#[test]
fn loading_state_holds() {
    let state = AuthState {
        user: None,
        loading: true,
    };
    assert_eq!(route_decision(&state), RouteDecision::Loading);
}

#[test]
fn loading_wins_even_with_user_present() {
    let state = AuthState {
        user: Some(user()),
        loading: true,
    };
    assert_eq!(route_decision(&state), RouteDecision::Loading);
}

#[test]
fn settled_without_user_redirects() {
    let state = AuthState {
        user: None,
        loading: false,
    };
    assert_eq!(route_decision(&state), RouteDecision::RedirectToLogin);
}

#[test]
fn settled_with_user_allows() {
    let state = AuthState {
        user: Some(user()),
        loading: false,
    };
    assert_eq!(route_decision(&state), RouteDecision::Allow);
}

// =============================================================================
// install_unauth_redirect
// =============================================================================

#[tokio::test]
async fn redirects_when_state_settles_unauthenticated() {
    let (tx, rx) = tokio::sync::watch::channel(AuthState {
        user: None,
        loading: true,
    });
    let (fired_tx, mut fired_rx) = tokio::sync::mpsc::unbounded_channel();

    let guard = install_unauth_redirect(rx, move || {
        let _ = fired_tx.send(());
    });

    tx.send_replace(AuthState {
        user: None,
        loading: false,
    });

    tokio::time::timeout(Duration::from_secs(2), fired_rx.recv())
        .await
        .expect("redirect not fired")
        .unwrap();
    guard.abort();
}

#[tokio::test]
async fn redirects_immediately_when_already_unauthenticated() {
    let (_tx, rx) = tokio::sync::watch::channel(AuthState {
        user: None,
        loading: false,
    });
    let (fired_tx, mut fired_rx) = tokio::sync::mpsc::unbounded_channel();

    let guard = install_unauth_redirect(rx, move || {
        let _ = fired_tx.send(());
    });

    tokio::time::timeout(Duration::from_secs(2), fired_rx.recv())
        .await
        .expect("redirect not fired")
        .unwrap();
    guard.abort();
}

#[tokio::test]
async fn does_not_redirect_while_loading_or_authenticated() {
    let (tx, rx) = tokio::sync::watch::channel(AuthState {
        user: None,
        loading: true,
    });
    let (fired_tx, mut fired_rx) = tokio::sync::mpsc::unbounded_channel();

    let guard = install_unauth_redirect(rx, move || {
        let _ = fired_tx.send(());
    });

    tx.send_replace(AuthState {
        user: Some(user()),
        loading: false,
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(fired_rx.try_recv().is_err());
    guard.abort();
}
