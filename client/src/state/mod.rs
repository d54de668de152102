//! Client-side session state.
//!
//! DESIGN
//! ======
//! One store per process context owns the in-memory identity; consumers
//! subscribe rather than poll, so route guards re-evaluate on every
//! change.

pub mod auth;
