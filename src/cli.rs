//! Command-line interface definitions for saml-ctk.
//!
//! This module defines the CLI structure using clap derives and dispatches
//! parsed invocations to the command handlers.

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use url::Url;

use crate::color::ColorScheme;
use crate::commands::completions::{Shell, handle_completions_command};
use crate::commands::creds::{CredsCommand, handle_creds_command};
use crate::commands::verify::handle_verify_command;
use crate::commands::version::handle_version_command;

/// saml-ctk - SAML IdP conformance test kit
#[derive(Debug, Parser)]
#[command(
  name = "saml-ctk",
  version,
  about = "Check SAML IdP responses for specification compliance",
  long_about = "A toolkit for SAML 2.0 IdP conformance testing.\n\
                Verifies captured SAML response documents against the core specification\n\
                and manages the test-account credentials used by login responders.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute
  #[command(subcommand)]
  pub command: Command,

  /// IdP and test-account options
  #[command(flatten)]
  pub idp: IdpOptions,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
  /// Verify a captured SAML response document against the core spec
  Verify {
    /// Path to the response document, or '-' to read from stdin
    #[arg(value_name = "FILE")]
    input: String,

    /// ID of the AuthnRequest the response must reference
    #[arg(long, value_name = "ID")]
    request_id: Option<String>,

    /// Assertion consumer service URL the response must target
    #[arg(long, value_name = "URL")]
    acs_url: Option<String>,

    /// Output the report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Test-account credential inspection
  Creds {
    #[command(subcommand)]
    subcommand: CredsCommand,
  },

  /// Display version and build information
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show only version number
    #[arg(long)]
    short: bool,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: Shell,
  },
}

/// Normalize a URL by adding https:// if no scheme is present
fn normalize_url(url: &str) -> Result<String, String> {
  let trimmed = url.trim();

  let parsed = match Url::parse(trimmed) {
    Ok(parsed) => parsed,
    Err(_) => {
      // Likely missing a scheme; retry with https:// prepended
      let with_https = format!("https://{trimmed}");
      Url::parse(&with_https).map_err(|e| format!("Invalid URL: {e}"))?
    }
  };

  let mut url_str = parsed.to_string();
  if url_str.ends_with('/') && url_str.len() > 1 {
    url_str.pop();
  }

  Ok(url_str)
}

/// IdP and test-account options
#[derive(Debug, Parser)]
pub struct IdpOptions {
  /// Base URL of the IdP under test
  #[arg(long, env = "IDP_URL", value_name = "URL", value_parser = normalize_url)]
  pub idp_url: Option<String>,

  /// Test-account username
  #[arg(long, env = "IDP_USER", value_name = "USER")]
  pub user: Option<String>,

  /// Test-account password
  #[arg(long, env = "IDP_PASSWORD", value_name = "PASSWORD", hide_env_values = true)]
  pub password: Option<String>,
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, value_enum, default_value = "auto", value_name = "WHEN")]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

impl Cli {
  /// Parse CLI arguments from the environment
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Validate CLI arguments
  ///
  /// Returns an error if the CLI configuration is invalid.
  pub fn validate(&self) -> Result<(), String> {
    if let Command::Verify {
      input,
      request_id,
      acs_url,
      ..
    } = &self.command
    {
      if input.trim().is_empty() {
        return Err("FILE must name a response document or be '-' for stdin".to_string());
      }

      if let Some(request_id) = request_id
        && request_id.trim().is_empty()
      {
        return Err("--request-id must not be empty".to_string());
      }

      if let Some(acs_url) = acs_url
        && Url::parse(acs_url).is_err()
      {
        return Err(format!("--acs-url must be an absolute URL, got {acs_url:?}"));
      }
    }

    Ok(())
  }
}

/// Parse CLI arguments, initialize shared services, and dispatch to the chosen
/// command.
pub async fn run() {
  let cli = Cli::parse_args();

  init_tracing(&cli.behavior);

  // Create color scheme based on user preference
  let colors = ColorScheme::new(cli.behavior.color);

  // Validate CLI arguments
  if let Err(e) = cli.validate() {
    eprintln!("{} {}", colors.error("Error:"), e);
    process::exit(4); // Invalid arguments exit code
  }

  match &cli.command {
    Command::Verify {
      input,
      request_id,
      acs_url,
      json,
    } => {
      handle_verify_command(input, request_id.as_deref(), acs_url.as_deref(), *json, &colors).await;
    }
    Command::Creds { subcommand } => {
      handle_creds_command(subcommand, &cli, &colors);
    }
    Command::Version { json, short } => {
      handle_version_command(*json, *short, &colors);
    }
    Command::Completions { shell } => {
      handle_completions_command(*shell);
    }
  }
}

fn init_tracing(behavior: &BehaviorOptions) {
  let level = if behavior.quiet {
    LevelFilter::ERROR
  } else {
    match behavior.verbose {
      0 => LevelFilter::WARN,
      1 => LevelFilter::INFO,
      2 => LevelFilter::DEBUG,
      _ => LevelFilter::TRACE,
    }
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}
