//! CLI subcommand handlers.
//!
//! This module groups the implementations for each `saml-ctk` subcommand,
//! keeping the top-level `main.rs` lightweight while still allowing the
//! handlers to share utilities and types.

pub mod completions;
pub mod creds;
pub mod verify;
pub mod version;
