//! Role administration service library crate.
//!
//! # Purpose
//! Exposes the role-admin HTTP API, editing sessions, directory access,
//! configuration and storage for use by the binary and tests.
//!
//! # Notes
//! Scope math lives in `scopegrant-authz`; this crate only wires it to
//! directory snapshots, persisted roles and HTTP.
pub mod api;
pub mod app;
pub mod config;
pub mod directory;
pub mod filter;
pub mod model;
pub mod observability;
pub mod session;
pub mod store;
