//! Compliance verification of a captured SAML response document.
//!
//! Implements `saml-ctk verify`, which reads one response document (raw XML
//! or the base64-encoded SAMLResponse value as captured from a binding),
//! checks it against the core specification, and reports the result.
//!
//! Exit codes: 0 when compliant, 3 when violations are found, 1 on read or
//! parse failures.

use std::process;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;
use tracing::info;

use crate::color::ColorScheme;
use crate::verification::{ComplianceError, VerificationContext, verify_response};

/// Run the verify command against a file path or `-` for stdin.
///
/// # Arguments
/// * `input` - Path to the document, or `-` to read stdin.
/// * `request_id` - Expected `InResponseTo` value, when known.
/// * `acs_url` - Expected `Destination` value, when known.
/// * `json` - Emit a machine-readable report instead of colored text.
/// * `colors` - Shared color scheme used to render output consistently.
pub(crate) async fn handle_verify_command(
  input: &str,
  request_id: Option<&str>,
  acs_url: Option<&str>,
  json: bool,
  colors: &ColorScheme,
) {
  let raw = match read_input(input).await {
    Ok(raw) => raw,
    Err(e) => {
      eprintln!("{} {e:#}", colors.error("✗"));
      process::exit(1);
    }
  };

  let xml = match decode_document(&raw) {
    Ok(xml) => xml,
    Err(e) => {
      eprintln!("{} {e:#}", colors.error("✗"));
      process::exit(1);
    }
  };

  let mut ctx = VerificationContext::new();
  if let Some(request_id) = request_id {
    ctx = ctx.expecting_request_id(request_id);
  }
  if let Some(acs_url) = acs_url {
    ctx = ctx.expecting_acs_url(acs_url);
  }

  info!("Verifying {len} bytes of response document", len = xml.len());

  match verify_response(&xml, &ctx) {
    Ok(()) => {
      if json {
        println!("{}", json!({ "compliant": true, "violations": [] }));
      } else {
        println!(
          "{} {}",
          colors.success("✓"),
          colors.success("Response is compliant with the checked requirements")
        );
      }
    }
    Err(err) => match err.downcast_ref::<ComplianceError>() {
      Some(compliance) => {
        report_violations(compliance, json, colors);
        process::exit(3);
      }
      None => {
        eprintln!("{} {err:#}", colors.error("✗"));
        process::exit(1);
      }
    },
  }
}

/// Print the violation report in the requested format.
fn report_violations(compliance: &ComplianceError, json: bool, colors: &ColorScheme) {
  if json {
    println!(
      "{}",
      json!({ "compliant": false, "violations": compliance.violations() })
    );
    return;
  }

  eprintln!(
    "{} {}",
    colors.error("✗"),
    colors.error("Response violates the SAML core specification")
  );
  for violation in compliance.violations() {
    eprintln!("\n  {}", colors.code(&violation.code));
    eprintln!("    {}", violation.requirement);
    if let Some(detail) = &violation.detail {
      eprintln!("    {}", colors.dimmed(detail));
    }
  }
}

/// Read the document from a file or stdin.
async fn read_input(input: &str) -> Result<String> {
  if input == "-" {
    return std::io::read_to_string(std::io::stdin()).context("Failed to read response document from stdin");
  }

  tokio::fs::read_to_string(input)
    .await
    .with_context(|| format!("Failed to read response document from {input}"))
}

/// Accept either raw XML or the base64-encoded SAMLResponse control value.
fn decode_document(raw: &str) -> Result<String> {
  let trimmed = raw.trim();

  if trimmed.starts_with('<') {
    return Ok(trimmed.to_string());
  }

  // Base64 as captured from a form control or query parameter; tolerate
  // line-wrapped values.
  let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
  let bytes = BASE64
    .decode(compact.as_bytes())
    .context("Input is neither XML nor a valid base64-encoded SAMLResponse")?;

  String::from_utf8(bytes).context("Decoded SAMLResponse is not UTF-8")
}
