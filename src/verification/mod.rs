//! SAML response compliance verification.
//!
//! Checks a SAML Response document against the normative requirements of the
//! SAML 2.0 Core specification that apply to the web SSO response protocol:
//! - [`data_types`] - common data type rules (Core 1.3)
//! - [`protocol`] - StatusResponseType, Status/StatusCode, AuthnStatement and
//!   NameIDMappingResponse rules (Core 3.2.2 et seq.)
//! - [`codes`] - section codes and the requirement text they stand for
//!
//! Signature verification and XSD schema validation are out of scope; the
//! checks here are the lexical and structural rules the specification states
//! in prose.

use anyhow::{Context, Result, bail};
use roxmltree::Document;
use tracing::debug;

pub mod codes;
pub mod data_types;
pub mod error;
pub mod protocol;
pub mod xml;

pub use data_types::{IdRegistry, verify_common_data_types};
pub use error::{ComplianceError, Violation};
pub use protocol::{TOP_LEVEL_STATUS_CODES, VerificationContext, verify_response_protocol};

/// Verify a SAML Response document against the core specification.
///
/// # Arguments
/// * `xml` - The response document, as delivered by the IdP (after any
///   base64/URL decoding the binding requires).
/// * `ctx` - Caller expectations about the soliciting request and delivery
///   address.
///
/// # Errors
/// Returns a [`ComplianceError`] (wrapped in `anyhow::Error`) when the
/// document violates a requirement, or a plain error when it is not
/// well-formed XML or contains no Response element.
pub fn verify_response(xml: &str, ctx: &VerificationContext) -> Result<()> {
  let document = Document::parse(xml).context("Failed to parse SAML response document")?;

  let root = document.root_element();
  let response = if root.tag_name().name() == "Response" {
    root
  } else {
    match xml::all_children(root, "Response").into_iter().next() {
      Some(node) => node,
      None => bail!("Document contains no SAML Response element"),
    }
  };

  debug!(
    "Verifying Response {id}",
    id = xml::attr(response, "ID").unwrap_or("(no ID)")
  );

  let mut registry = IdRegistry::new();
  verify_common_data_types(response, &mut registry)?;
  verify_response_protocol(response, ctx, &mut registry)?;

  Ok(())
}
