//! Test-account credential subcommand handlers.
//!
//! Implements `saml-ctk creds show`, which prints the currently detected
//! credential sources for the IdP test account so conflicts between flags,
//! environment variables, and `.netrc` entries are easy to diagnose.

use clap::Subcommand;
use url::Url;

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::credentials::{Credential, CredentialsProvider, NetrcProvider};

/// Credential subcommands
#[derive(Debug, Subcommand)]
pub enum CredsCommand {
  /// Print the resolved credential sources without contacting the IdP
  Show,
}

/// Dispatch the credential subcommands defined under `saml-ctk creds`.
pub(crate) fn handle_creds_command(subcommand: &CredsCommand, cli: &Cli, colors: &ColorScheme) {
  match subcommand {
    CredsCommand::Show => show_credential_config(cli, colors),
  }
}

/// Display the currently configured credential sources and values.
///
/// The output highlights whether values came from CLI flags, environment
/// variables, or a `.netrc` file. The password is always masked.
fn show_credential_config(cli: &Cli, colors: &ColorScheme) {
  println!("{}\n", colors.emphasis("Test Account Configuration"));

  let idp_url = cli.idp.idp_url.as_deref();
  let url_source = if std::env::var("IDP_URL").is_ok() {
    "environment variable"
  } else if idp_url.is_some() {
    "command-line flag"
  } else {
    "not set"
  };

  if let Some(url) = idp_url {
    println!("{}: {}", colors.emphasis("IdP URL"), colors.link(url));
    println!("  {}: {}", colors.dimmed("Source"), colors.dimmed(url_source));
  } else {
    println!("{}: {}", colors.emphasis("IdP URL"), colors.dimmed("(not set)"));
  }

  let username = cli.idp.user.as_deref();
  let user_source = if std::env::var("IDP_USER").is_ok() {
    "environment variable"
  } else {
    "command-line flag"
  };

  let password = cli.idp.password.as_deref();
  let password_source = if std::env::var("IDP_PASSWORD").is_ok() {
    "environment variable"
  } else {
    "command-line flag"
  };

  // Fall back to .netrc when either half is missing and we know the host.
  let netrc_creds = if username.is_none() || password.is_none() {
    idp_url.and_then(extract_host).and_then(|host| {
      let provider = NetrcProvider::new();
      provider.get_credentials(&host).ok().flatten()
    })
  } else {
    None
  };

  if let Some(user) = username {
    println!("\n{}: {}", colors.emphasis("Username"), user);
    println!("  {}: {}", colors.dimmed("Source"), colors.dimmed(user_source));
  } else if let Some(Credential { username, .. }) = &netrc_creds {
    println!("\n{}: {}", colors.emphasis("Username"), username);
    println!("  {}: {}", colors.dimmed("Source"), colors.dimmed(".netrc file"));
  } else {
    println!("\n{}: {}", colors.emphasis("Username"), colors.dimmed("(not set)"));
  }

  if let Some(password) = password {
    println!("\n{}: {}", colors.emphasis("Password"), colors.dimmed(mask(password)));
    println!(
      "  {}: {} characters",
      colors.dimmed("Length"),
      colors.number(password.len())
    );
    println!("  {}: {}", colors.dimmed("Source"), colors.dimmed(password_source));
  } else if netrc_creds.is_some() {
    println!("\n{}: {}", colors.emphasis("Password"), colors.dimmed("********"));
    println!("  {}: {}", colors.dimmed("Source"), colors.dimmed(".netrc file"));
  } else {
    println!("\n{}: {}", colors.emphasis("Password"), colors.dimmed("(not set)"));
  }

  if idp_url.is_none() {
    println!(
      "\n{} {} is required for .netrc discovery",
      colors.warning("⚠"),
      colors.emphasis("IdP URL")
    );
    println!("  Set via --idp-url flag or IDP_URL environment variable");
  }

  let has_username = username.is_some() || netrc_creds.is_some();
  let has_password = password.is_some() || netrc_creds.is_some();

  if !has_username || !has_password {
    println!(
      "\n{} {} for the login responder",
      colors.warning("⚠"),
      colors.warning("Credentials incomplete")
    );
    if !has_username {
      println!("  Missing: username (use --user or IDP_USER)");
    }
    if !has_password {
      println!("  Missing: password (use --password or IDP_PASSWORD)");
    }
    println!("\n  Or add the test account to ~/.netrc:");
    if let Some(host) = idp_url.and_then(extract_host) {
      println!("    machine {host}");
    }
    println!("      login ctk-test-user");
    println!("      password ctk-test-password");
  } else {
    println!("\n{} {}", colors.success("✓"), colors.success("Credentials configured"));
  }
}

/// Mask a password for display, keeping a short recognisable prefix.
fn mask(password: &str) -> String {
  if password.len() > 8 {
    format!("{}{}", &password[..4], "*".repeat(password.len() - 4))
  } else {
    "*".repeat(password.len())
  }
}

/// Extract the hostname component from the IdP base URL.
fn extract_host(url: &str) -> Option<String> {
  Url::parse(url).ok()?.host_str().map(str::to_string)
}
