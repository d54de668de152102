//! Networking modules for the veritas REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `gateway` handles the authentication endpoints, `verify` the
//! verification endpoints, and `types` defines the shared wire schema.

pub mod gateway;
pub mod types;
pub mod verify;
