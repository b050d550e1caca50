//! Mise Server library.
//!
//! Restaurant back-office API: email-verified signup with one-time codes,
//! login with signed session tokens, and per-user inventory, menu, recipe,
//! and invoice documents behind a pluggable document store.
//!
//! The binary in `main.rs` wires this library to `PostgreSQL` and SMTP; the
//! library itself only depends on the [`db::DocumentStore`] and
//! [`services::OtpNotifier`] traits, which keeps every handler testable
//! in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
