//! Parsing of IdP-served forms.
//!
//! Covers the two form shapes a responder meets: the auto-submitted form
//! wrapping the SAMLResponse control (the POST binding's payload) and login
//! forms the responder fills in on the way there. IdP pages in conformance
//! fixtures are XHTML; anything that is not well-formed markup is rejected
//! with context rather than guessed at.

use anyhow::{Context, Result, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use roxmltree::Document;
use serde::Serialize;

/// Name of the form control carrying the encoded SAML response.
pub const SAML_RESPONSE_CONTROL: &str = "SAMLResponse";
/// Name of the form control carrying the relay state.
pub const RELAY_STATE_CONTROL: &str = "RelayState";

/// A named form control and its pre-populated value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormControl {
  /// Control name attribute.
  pub name: String,
  /// Control value attribute, empty when absent.
  pub value: String,
}

/// An HTML form with its submission target and controls, as parsed from an
/// IdP page. Crate-internal; the public payload type is [`SamlForm`].
#[derive(Debug, Clone)]
pub(crate) struct RawForm {
  pub action: String,
  pub method: String,
  pub controls: Vec<RawControl>,
}

/// A parsed `<input>` including its type, so login forms can be recognised.
#[derive(Debug, Clone)]
pub(crate) struct RawControl {
  pub name: String,
  pub value: String,
  pub kind: String,
}

impl RawForm {
  /// Whether this looks like a login form (it asks for a password).
  pub fn is_login_form(&self) -> bool {
    self.controls.iter().any(|control| control.kind == "password")
  }

  fn control(&self, name: &str) -> Option<&RawControl> {
    self.controls.iter().find(|control| control.name == name)
  }
}

/// Extract every form from an XHTML page.
pub(crate) fn parse_forms(html: &str) -> Result<Vec<RawForm>> {
  // roxmltree rejects DTDs, and IdP pages routinely open with one.
  let markup = strip_doctype(html);
  let document = Document::parse(markup).context("Failed to parse IdP page as XHTML")?;

  let forms = document
    .descendants()
    .filter(|node| node.is_element() && node.tag_name().name() == "form")
    .map(|form| RawForm {
      action: form.attribute("action").unwrap_or("").to_string(),
      method: form.attribute("method").unwrap_or("post").to_ascii_lowercase(),
      controls: form
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "input")
        .filter_map(|input| {
          input.attribute("name").map(|name| RawControl {
            name: name.to_string(),
            value: input.attribute("value").unwrap_or("").to_string(),
            kind: input.attribute("type").unwrap_or("text").to_ascii_lowercase(),
          })
        })
        .collect(),
    })
    .collect();

  Ok(forms)
}

fn strip_doctype(html: &str) -> &str {
  let trimmed = html.trim_start();
  if let Some(rest) = trimmed.strip_prefix("<!DOCTYPE")
    && let Some(end) = rest.find('>')
  {
    return &rest[end + 1..];
  }
  trimmed
}

/// The wrapping form containing the SAML response control.
///
/// This is the POST-binding payload handed back to the harness: the form's
/// submission target plus its named controls, of which `SAMLResponse` is
/// guaranteed present by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SamlForm {
  action: String,
  method: String,
  controls: Vec<FormControl>,
}

impl SamlForm {
  /// Parse an IdP page and extract the form wrapping the SAMLResponse
  /// control.
  ///
  /// # Errors
  /// Returns an error when the page is not well-formed markup or when no
  /// form on it carries a `SAMLResponse` control.
  pub fn parse(html: &str) -> Result<Self> {
    let form = parse_forms(html)?
      .into_iter()
      .find(|form| form.control(SAML_RESPONSE_CONTROL).is_some())
      .ok_or_else(|| anyhow!("IdP page contains no form wrapping a SAMLResponse control"))?;

    Ok(Self {
      action: form.action,
      method: form.method,
      controls: form
        .controls
        .into_iter()
        .map(|control| FormControl {
          name: control.name,
          value: control.value,
        })
        .collect(),
    })
  }

  /// The form's submission target.
  pub fn action(&self) -> &str {
    &self.action
  }

  /// The form's submission method, lower-cased.
  pub fn method(&self) -> &str {
    &self.method
  }

  /// All named controls, in document order.
  pub fn controls(&self) -> &[FormControl] {
    &self.controls
  }

  /// Value of a named control.
  pub fn control(&self, name: &str) -> Option<&str> {
    self
      .controls
      .iter()
      .find(|control| control.name == name)
      .map(|control| control.value.as_str())
  }

  /// The encoded SAMLResponse control value.
  pub fn saml_response(&self) -> Option<&str> {
    self.control(SAML_RESPONSE_CONTROL)
  }

  /// The RelayState control value, when present.
  pub fn relay_state(&self) -> Option<&str> {
    self.control(RELAY_STATE_CONTROL)
  }

  /// Base64-decode the SAMLResponse control into the response document.
  ///
  /// # Errors
  /// Returns an error when the control is empty, not valid base64, or not
  /// UTF-8 XML.
  pub fn decoded_saml_response(&self) -> Result<String> {
    let encoded = self
      .saml_response()
      .filter(|value| !value.is_empty())
      .ok_or_else(|| anyhow!("SAMLResponse control is empty"))?;

    let bytes = BASE64
      .decode(encoded.as_bytes())
      .context("SAMLResponse control is not valid base64")?;

    String::from_utf8(bytes).context("Decoded SAMLResponse is not UTF-8")
  }
}
