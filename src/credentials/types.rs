//! Strongly typed test-account credentials and related errors.
//!
//! Shared between credential providers and the CLI so callers reason about
//! usernames, passwords, and failure modes consistently.

use std::fmt;

/// Credentials for the IdP test account a responder logs in with.
///
/// These belong to a throwaway conformance-testing account on the IdP under
/// test, never to a real user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
  /// Username of the test account.
  pub username: String,
  /// Password of the test account.
  pub password: String,
}

/// Errors that can occur while resolving credentials.
#[derive(Debug)]
pub enum CredentialError {
  /// The home directory could not be determined, so `.netrc` is unreachable.
  HomeNotFound,
  /// The `.netrc` file is malformed.
  NetrcParse(String),
  /// An I/O error occurred while reading a credential source.
  Io(std::io::Error),
}

impl fmt::Display for CredentialError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::HomeNotFound => write!(f, "home directory not found, cannot locate .netrc"),
      Self::NetrcParse(msg) => write!(f, "failed to parse .netrc: {msg}"),
      Self::Io(err) => write!(f, "I/O error: {err}"),
    }
  }
}

impl std::error::Error for CredentialError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io(err) => Some(err),
      _ => None,
    }
  }
}

impl From<std::io::Error> for CredentialError {
  fn from(err: std::io::Error) -> Self {
    Self::Io(err)
  }
}
