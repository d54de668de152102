//! Utility helpers shared by embedders of the session store.

pub mod auth;
