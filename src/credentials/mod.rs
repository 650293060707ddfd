//! Credentials management for the IdP test account.
//!
//! The built-in form-login responder needs a username and password for the
//! account it authenticates as. This module provides a trait-based interface
//! for resolving them from various sources; the default implementation uses
//! `.netrc` files.
//!
//! Store test-account credentials in `~/.netrc`:
//! ```text
//! machine idp.example.org
//!   login ctk-test-user
//!   password ctk-test-password
//! ```
//!
//! **Important**: use a dedicated conformance-testing account, never a real
//! user's credentials.

mod netrc;
mod provider;
mod types;

pub use netrc::NetrcProvider;
pub use provider::CredentialsProvider;
pub use types::{Credential, CredentialError};
