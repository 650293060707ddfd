//! Credential provider abstractions.
//!
//! Defines the [`CredentialsProvider`] trait so different credential backends
//! (`.netrc`, environment variables, custom stores) can supply the IdP test
//! account without changing call sites.

use super::{Credential, CredentialError};

/// A provider for retrieving IdP test-account credentials.
pub trait CredentialsProvider {
  /// Retrieve credentials for the given IdP host.
  ///
  /// # Arguments
  /// * `host` - Hostname of the IdP under test (e.g., `idp.example.org`).
  ///
  /// # Returns
  /// * `Ok(Some(Credential))` when the provider knows the host.
  /// * `Ok(None)` when it has no entry, letting fallback providers run.
  ///
  /// # Errors
  /// Returns `Err(CredentialError)` on unexpected failures such as an
  /// unreadable configuration file.
  fn get_credentials(&self, host: &str) -> Result<Option<Credential>, CredentialError>;
}
