//! # client
//!
//! Rust client library for the veritas news-verification backend.
//!
//! Owns the session/auth state machine: the HTTP gateway for
//! `/api/auth/*`, the persisted session record with cross-context change
//! notifications, the reactive session store consumed by route guards,
//! and the thin verification API surface. All scoring, hashing and
//! consensus logic lives behind the REST backend; this crate passes those
//! results through untouched.

pub mod net;
pub mod persist;
pub mod state;
pub mod util;
