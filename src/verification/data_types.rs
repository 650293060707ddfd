//! Common data type verification.
//!
//! Implements the checks of SAML Core section 1.3: string values, anyURI
//! values, time values, and ID values. Elements opt into a check through
//! their declared `xsi:type`; the response protocol checks additionally call
//! the value-level routines directly for attributes such as `ID` and
//! `IssueInstant`.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use roxmltree::Node;
use url::Url;

use super::codes::{
  SAML_CORE_1_3_1_A, SAML_CORE_1_3_2_A, SAML_CORE_1_3_3_A, SAML_CORE_1_3_4_A, SAML_CORE_1_3_4_B, XML_DATATYPES_3_2_7,
  XML_DATATYPES_3_2_7_1_A1, XML_DATATYPES_3_2_7_1_A2, XML_DATATYPES_3_2_7_1_A3,
};
use super::error::ComplianceError;
use super::xml::{text_of, xsi_type};

/// Document-scoped registry of ID values seen so far.
///
/// SAML Core 1.3.4 requires identifier uniqueness; the registry is explicit
/// state owned by the caller, so two documents never share it by accident.
#[derive(Debug, Default)]
pub struct IdRegistry {
  seen: HashSet<String>,
}

impl IdRegistry {
  /// Create an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Record an ID value, returning `false` when it was already present.
  fn record(&mut self, value: &str) -> bool {
    self.seen.insert(value.to_string())
  }
}

/// Build an error from base codes plus an optional caller-supplied section.
fn fail(base: &[&str], extra: Option<&str>, detail: String) -> ComplianceError {
  match extra {
    Some(code) => {
      let mut codes = base.to_vec();
      codes.push(code);
      ComplianceError::with_detail(&codes, detail)
    }
    None => ComplianceError::with_detail(base, detail),
  }
}

/// Walk an element tree and verify every `xsi:type`-annotated value.
///
/// Dispatches on the declared type the way the specification's data type
/// catalogue does: `string`, `anyURI`, `dateTime`, and `ID` (which also
/// covers derived identifier types).
pub fn verify_common_data_types(root: Node, registry: &mut IdRegistry) -> Result<(), ComplianceError> {
  for node in root.descendants().filter(|n| n.is_element()) {
    let Some(declared) = xsi_type(node) else {
      continue;
    };

    if declared.contains("string") {
      verify_string_value(text_of(node), None)?;
    }
    if declared.contains("anyURI") {
      verify_uri_value(text_of(node), None)?;
    }
    if declared.contains("dateTime") {
      verify_time_value(text_of(node), None)?;
    }
    if declared.contains("ID") {
      verify_id_value(text_of(node), registry, None)?;
    }
  }
  Ok(())
}

/// SAML Core 1.3.1: strings must contain at least one non-whitespace
/// character.
pub fn verify_string_value(value: &str, extra: Option<&str>) -> Result<(), ComplianceError> {
  if value.trim().is_empty() {
    return Err(fail(&[SAML_CORE_1_3_1_A], extra, "blank string value".to_string()));
  }
  Ok(())
}

/// SAML Core 1.3.2: URI references must be non-blank and absolute.
pub fn verify_uri_value(value: &str, extra: Option<&str>) -> Result<(), ComplianceError> {
  // Url::parse accepts only absolute references; relative ones fail with
  // RelativeUrlWithoutBase.
  if value.trim().is_empty() || Url::parse(value.trim()).is_err() {
    return Err(fail(
      &[SAML_CORE_1_3_2_A],
      extra,
      format!("not an absolute URI: {value:?}"),
    ));
  }
  Ok(())
}

/// SAML Core 1.3.4: ID values must be non-empty and unique per document.
pub fn verify_id_value(value: &str, registry: &mut IdRegistry, extra: Option<&str>) -> Result<(), ComplianceError> {
  if value.trim().is_empty() {
    return Err(fail(&[SAML_CORE_1_3_4_A], extra, "empty ID value".to_string()));
  }
  if !registry.record(value) {
    return Err(fail(&[SAML_CORE_1_3_4_B], extra, format!("duplicate ID {value:?}")));
  }
  Ok(())
}

/// SAML Core 1.3.3 / XML Datatypes 3.2.7: xs:dateTime lexical checks.
///
/// Negative years are allowed, the year carries decimal digits only with no
/// leading zeros past four digits and never the value 0000, and the
/// remainder must parse as `mm-ddThh:mm:ss` with an optional fractional
/// second of any precision and an optional trailing `Z`.
pub fn verify_time_value(value: &str, extra: Option<&str>) -> Result<(), ComplianceError> {
  let (year, rest) = split_year(value, extra)?;
  verify_year(year, value, extra)?;
  verify_date_time_body(rest, value, extra)
}

/// Split `[-]yyyy…-` off the front of a dateTime value.
fn split_year<'v>(value: &'v str, extra: Option<&str>) -> Result<(&'v str, &'v str), ComplianceError> {
  let search_from = usize::from(value.starts_with('-'));
  let hyphen = value[search_from..]
    .find('-')
    .map(|offset| offset + search_from)
    .ok_or_else(|| {
      fail(
        &[XML_DATATYPES_3_2_7, SAML_CORE_1_3_3_A],
        extra,
        format!("no year field in {value:?}"),
      )
    })?;
  Ok((&value[..hyphen], &value[hyphen + 1..]))
}

/// Year field rules from XML Datatypes 3.2.7.1.
fn verify_year(year: &str, value: &str, extra: Option<&str>) -> Result<(), ComplianceError> {
  let digits = year.strip_prefix('-').unwrap_or(year);

  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return Err(fail(
      &[XML_DATATYPES_3_2_7_1_A3, SAML_CORE_1_3_3_A],
      extra,
      format!("non-numeric year in {value:?}"),
    ));
  }
  if digits.len() > 4 && digits.starts_with('0') {
    return Err(fail(
      &[XML_DATATYPES_3_2_7_1_A1, SAML_CORE_1_3_3_A],
      extra,
      format!("leading zero in expanded year of {value:?}"),
    ));
  }
  if digits == "0000" {
    return Err(fail(
      &[XML_DATATYPES_3_2_7_1_A2, SAML_CORE_1_3_3_A],
      extra,
      "year 0000 is prohibited".to_string(),
    ));
  }
  Ok(())
}

/// Everything after the year: `mm-ddThh:mm:ss('.'s+)?('Z')?`.
fn verify_date_time_body(rest: &str, value: &str, extra: Option<&str>) -> Result<(), ComplianceError> {
  let bad = || {
    fail(
      &[XML_DATATYPES_3_2_7, SAML_CORE_1_3_3_A],
      extra,
      format!("malformed dateTime {value:?}"),
    )
  };

  let rest = rest.strip_suffix('Z').unwrap_or(rest);

  // Fractional seconds may carry any precision.
  let rest = match rest.split_once('.') {
    Some((head, fraction)) => {
      if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
      }
      head
    }
    None => rest,
  };

  // Re-anchor on a leap year so 02-29 stays a valid month-day combination.
  NaiveDateTime::parse_from_str(&format!("2000-{rest}"), "%Y-%m-%dT%H:%M:%S").map_err(|_| bad())?;
  Ok(())
}
