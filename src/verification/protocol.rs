//! Response protocol verification.
//!
//! Implements the StatusResponseType checks of SAML Core 3.2.2, the Status
//! and StatusCode checks of 3.2.2.1/3.2.2.2, the AuthnStatement requirement
//! of 3.4, and the NameIDMappingResponse requirement of 3.8.2.

use roxmltree::Node;

use super::codes::{
  SAML_CORE_3_2_2_A, SAML_CORE_3_2_2_B, SAML_CORE_3_2_2_C, SAML_CORE_3_2_2_D, SAML_CORE_3_2_2_E, SAML_CORE_3_2_2_2_A,
  SAML_CORE_3_2_2_2_B, SAML_CORE_3_4_A, SAML_CORE_3_8_2_A,
};
use super::data_types::{IdRegistry, verify_id_value, verify_time_value};
use super::error::ComplianceError;
use super::xml::{all_children, attr, children};

/// The four status code values permitted at the top level (Core 3.2.2.2).
pub const TOP_LEVEL_STATUS_CODES: [&str; 4] = [
  "urn:oasis:names:tc:SAML:2.0:status:Success",
  "urn:oasis:names:tc:SAML:2.0:status:Requester",
  "urn:oasis:names:tc:SAML:2.0:status:Responder",
  "urn:oasis:names:tc:SAML:2.0:status:VersionMismatch",
];

/// Caller-supplied expectations about the response under test.
///
/// Checks that compare against the soliciting request (`InResponseTo`) or the
/// delivery address (`Destination`) only run when the corresponding
/// expectation is present, so unsolicited responses can still be verified.
#[derive(Debug, Clone, Default)]
pub struct VerificationContext {
  /// ID of the AuthnRequest this response answers.
  pub request_id: Option<String>,
  /// Assertion consumer service URL the response was delivered to.
  pub acs_url: Option<String>,
}

impl VerificationContext {
  /// Context with no expectations.
  pub fn new() -> Self {
    Self::default()
  }

  /// Expect the response to reference this request ID.
  pub fn expecting_request_id(mut self, request_id: impl Into<String>) -> Self {
    self.request_id = Some(request_id.into());
    self
  }

  /// Expect the response's Destination to match this ACS URL.
  pub fn expecting_acs_url(mut self, acs_url: impl Into<String>) -> Self {
    self.acs_url = Some(acs_url.into());
    self
  }
}

/// Run every response protocol check against a Response element.
pub fn verify_response_protocol(
  response: Node,
  ctx: &VerificationContext,
  registry: &mut IdRegistry,
) -> Result<(), ComplianceError> {
  verify_status_response_type(response, ctx, registry)?;
  verify_statuses(response)?;
  verify_name_id_mapping_responses(response)?;
  verify_authn_statements(response)?;
  Ok(())
}

/// StatusResponseType attribute checks (Core 3.2.2).
fn verify_status_response_type(
  response: Node,
  ctx: &VerificationContext,
  registry: &mut IdRegistry,
) -> Result<(), ComplianceError> {
  let id = attr(response, "ID").ok_or_else(|| ComplianceError::required("SAMLCore.3.2.2", "ID", "Response"))?;
  verify_id_value(id, registry, Some(SAML_CORE_3_2_2_A))?;

  if let Some(expected) = &ctx.request_id
    && attr(response, "InResponseTo") != Some(expected.as_str())
  {
    return Err(ComplianceError::with_detail(
      &[SAML_CORE_3_2_2_B],
      format!("expected InResponseTo {expected:?}, found {:?}", attr(response, "InResponseTo")),
    ));
  }

  let version =
    attr(response, "Version").ok_or_else(|| ComplianceError::required("SAMLCore.3.2.2", "Version", "Response"))?;
  if version != "2.0" {
    return Err(ComplianceError::with_detail(
      &[SAML_CORE_3_2_2_C],
      format!("found version {version:?}"),
    ));
  }

  let issue_instant = attr(response, "IssueInstant")
    .ok_or_else(|| ComplianceError::required("SAMLCore.3.2.2", "IssueInstant", "Response"))?;
  verify_time_value(issue_instant, Some(SAML_CORE_3_2_2_D))?;

  if let Some(destination) = attr(response, "Destination")
    && let Some(expected) = &ctx.acs_url
    && destination != expected.as_str()
  {
    return Err(ComplianceError::with_detail(
      &[SAML_CORE_3_2_2_E],
      format!("expected destination {expected:?}, found {destination:?}"),
    ));
  }

  if children(response, "Status").is_empty() {
    return Err(ComplianceError::required("SAMLCore.3.2.2", "Status", "Response"));
  }

  Ok(())
}

/// Status and StatusCode checks (Core 3.2.2.1 and 3.2.2.2).
fn verify_statuses(response: Node) -> Result<(), ComplianceError> {
  for status in children(response, "Status") {
    let status_codes = children(status, "StatusCode");
    if status_codes.is_empty() {
      return Err(ComplianceError::required("SAMLCore.3.2.2.1", "StatusCode", "Status"));
    }

    if status_codes.iter().any(|code| attr(*code, "Value").is_none()) {
      return Err(ComplianceError::required("SAMLCore.3.2.2.2", "Value", "StatusCode"));
    }

    let top_level = attr(status_codes[0], "Value").unwrap_or("");
    if !TOP_LEVEL_STATUS_CODES.contains(&top_level) {
      return Err(ComplianceError::with_detail(
        &[SAML_CORE_3_2_2_2_A, SAML_CORE_3_2_2_2_B],
        format!("found top-level status code {top_level:?}"),
      ));
    }
  }
  Ok(())
}

/// NameIDMappingResponse checks (Core 3.8.2).
fn verify_name_id_mapping_responses(response: Node) -> Result<(), ComplianceError> {
  for mapping in all_children(response, "NameIDMappingResponse") {
    if children(mapping, "NameID").is_empty() && children(mapping, "EncryptedID").is_empty() {
      return Err(ComplianceError::of(&[SAML_CORE_3_8_2_A]));
    }
  }
  Ok(())
}

/// Assertions answering an AuthnRequest must carry an AuthnStatement
/// (Core 3.4).
fn verify_authn_statements(response: Node) -> Result<(), ComplianceError> {
  for assertion in children(response, "Assertion") {
    if children(assertion, "AuthnStatement").is_empty() {
      return Err(ComplianceError::of(&[SAML_CORE_3_4_A]));
    }
  }
  Ok(())
}
