//! `.netrc` credential discovery.
//!
//! Provides a [`CredentialsProvider`] implementation that reads the user's
//! `~/.netrc` file to locate the IdP test account. This keeps conformance
//! test passwords out of shell history and supports testing several IdPs
//! from one machine.

use super::{Credential, CredentialError, CredentialsProvider};

/// A credentials provider that reads from `.netrc` files.
///
/// # Example `.netrc` entry for an IdP under test
///
/// ```text
/// machine idp.example.org
///   login ctk-test-user
///   password ctk-test-password
/// ```
#[derive(Debug, Default)]
pub struct NetrcProvider;

impl NetrcProvider {
  /// Creates a new `.netrc` credentials provider.
  pub fn new() -> Self {
    Self
  }
}

impl CredentialsProvider for NetrcProvider {
  /// Resolve credentials for `host` from the user's `~/.netrc`.
  ///
  /// # Returns
  /// * `Ok(Some(Credential))` for a matching `machine` entry, or the
  ///   `default` entry when no machine matches.
  /// * `Ok(None)` when the file is absent or has no applicable entry.
  fn get_credentials(&self, host: &str) -> Result<Option<Credential>, CredentialError> {
    let home = std::env::var("HOME").map_err(|_| CredentialError::HomeNotFound)?;
    let netrc_path = std::path::Path::new(&home).join(".netrc");

    if !netrc_path.exists() {
      return Ok(None);
    }

    let content = std::fs::read_to_string(&netrc_path)?;
    Ok(lookup(&content, host))
  }
}

/// One parsed `machine` or `default` entry.
#[derive(Debug, Default)]
struct Entry {
  machine: Option<String>,
  is_default: bool,
  login: Option<String>,
  password: Option<String>,
}

impl Entry {
  fn credential(&self) -> Option<Credential> {
    Some(Credential {
      username: self.login.clone()?,
      password: self.password.clone()?,
    })
  }
}

/// Find the credential for `host`, preferring an exact machine entry over
/// `default`.
fn lookup(content: &str, host: &str) -> Option<Credential> {
  let entries = parse(content);

  entries
    .iter()
    .find(|entry| entry.machine.as_deref() == Some(host))
    .and_then(Entry::credential)
    .or_else(|| {
      entries
        .iter()
        .find(|entry| entry.is_default)
        .and_then(Entry::credential)
    })
}

/// Tokenize a `.netrc` file into entries.
///
/// The format is free-form whitespace-separated tokens; `#` starts a comment
/// running to end of line, and `macdef` bodies run to the next blank line.
fn parse(content: &str) -> Vec<Entry> {
  let mut entries: Vec<Entry> = Vec::new();
  let mut lines = content.lines();

  let mut tokens: Vec<String> = Vec::new();
  while let Some(line) = lines.next() {
    let line = line.split('#').next().unwrap_or("");
    for token in line.split_whitespace() {
      if token == "macdef" {
        // Skip the macro definition: rest of this line plus everything up
        // to the next blank line.
        for body_line in lines.by_ref() {
          if body_line.trim().is_empty() {
            break;
          }
        }
        break;
      }
      tokens.push(token.to_string());
    }
  }

  let mut iter = tokens.into_iter().peekable();
  while let Some(token) = iter.next() {
    match token.as_str() {
      "machine" => entries.push(Entry {
        machine: iter.next(),
        ..Entry::default()
      }),
      "default" => entries.push(Entry {
        is_default: true,
        ..Entry::default()
      }),
      "login" => {
        if let Some(entry) = entries.last_mut() {
          entry.login = iter.next();
        }
      }
      "password" => {
        if let Some(entry) = entries.last_mut() {
          entry.password = iter.next();
        }
      }
      _ => {
        // Unknown tokens (account, port, stray values) are skipped.
      }
    }
  }

  entries
}
