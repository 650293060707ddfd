//! Compliance failure reporting.
//!
//! A [`ComplianceError`] carries one or more [`Violation`]s, each tagged with
//! the specification section that states the broken requirement. The harness
//! treats any such error as a test failure; abort-versus-skip policy stays
//! with the caller.

use std::fmt;

use serde::Serialize;

use super::codes;

/// A single broken requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
  /// Specification section code, e.g. `SAMLCore.3.2.2_c`.
  pub code: String,
  /// The requirement text quoted from the specification.
  pub requirement: String,
  /// Optional detail about the offending value.
  pub detail: Option<String>,
}

impl Violation {
  /// Build a violation for a section code, pulling the requirement text from
  /// the catalogue.
  pub fn of(code: &str) -> Self {
    Self {
      code: code.to_string(),
      requirement: codes::requirement(code).to_string(),
      detail: None,
    }
  }

  /// Attach detail about the offending value.
  pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
    self.detail = Some(detail.into());
    self
  }
}

impl fmt::Display for Violation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.code, self.requirement)?;
    if let Some(detail) = &self.detail {
      write!(f, " ({detail})")?;
    }
    Ok(())
  }
}

/// One or more specification violations found in a SAML message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceError {
  violations: Vec<Violation>,
}

impl ComplianceError {
  /// Build an error from one or more section codes.
  pub fn of(codes: &[&str]) -> Self {
    Self {
      violations: codes.iter().map(|code| Violation::of(code)).collect(),
    }
  }

  /// Build an error from section codes plus detail about the offending value.
  pub fn with_detail(codes: &[&str], detail: impl Into<String>) -> Self {
    let detail = detail.into();
    Self {
      violations: codes
        .iter()
        .map(|code| Violation::of(code).with_detail(detail.clone()))
        .collect(),
    }
  }

  /// Build an error for a required attribute or element that is missing.
  ///
  /// Mirrors the "X is required in Y" reporting style used throughout the
  /// verification routines.
  pub fn required(section: &str, name: &str, parent: &str) -> Self {
    Self {
      violations: vec![Violation {
        code: section.to_string(),
        requirement: format!("{name} is required in {parent}"),
        detail: None,
      }],
    }
  }

  /// The individual violations, in discovery order.
  pub fn violations(&self) -> &[Violation] {
    &self.violations
  }
}

impl fmt::Display for ComplianceError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "SAML compliance violations:")?;
    for violation in &self.violations {
      writeln!(f)?;
      write!(f, "  {violation}")?;
    }
    Ok(())
  }
}

impl std::error::Error for ComplianceError {}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::verification::codes::{SAML_CORE_1_3_3_A, SAML_CORE_3_2_2_C, XML_DATATYPES_3_2_7};

  #[test]
  fn single_code_formats_with_requirement() {
    let err = ComplianceError::of(&[SAML_CORE_3_2_2_C]);
    let text = err.to_string();
    assert!(text.contains("SAMLCore.3.2.2_c"));
    assert!(text.contains("MUST be set to '2.0'"));
  }

  #[test]
  fn multiple_codes_list_every_section() {
    let err = ComplianceError::of(&[XML_DATATYPES_3_2_7, SAML_CORE_1_3_3_A]);
    assert_eq!(err.violations().len(), 2);
    let text = err.to_string();
    assert!(text.contains("XMLDatatypesSchema.3.2.7"));
    assert!(text.contains("SAMLCore.1.3.3_a"));
  }

  #[test]
  fn required_message_names_attribute_and_parent() {
    let err = ComplianceError::required("SAMLCore.3.2.2", "Version", "Response");
    assert!(err.to_string().contains("Version is required in Response"));
  }

  #[test]
  fn detail_is_appended() {
    let err = ComplianceError::with_detail(&[SAML_CORE_3_2_2_C], "found version 1.1");
    assert!(err.to_string().contains("found version 1.1"));
  }
}
