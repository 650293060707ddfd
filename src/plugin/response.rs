//! Value objects crossing the responder plugin boundary.
//!
//! [`HttpResponse`] is the harness-owned snapshot of what the IdP sent back
//! for the initial AuthnRequest; [`IdpResponse`] is the binding-shaped result
//! a responder hands back once the IdP has produced its SAML response. Both
//! are transient, single-use values owned by the caller.

use anyhow::{Context, Result};
use url::Url;

use super::form::SamlForm;

/// Snapshot of an HTTP response from the identity provider.
///
/// Captured by the harness after sending an AuthnRequest and handed to the
/// responder read-only. The final request URL is kept so responders can
/// resolve relative form actions.
#[derive(Debug, Clone)]
pub struct HttpResponse {
  status: u16,
  url: String,
  headers: Vec<(String, String)>,
  body: String,
}

impl HttpResponse {
  /// Build a response snapshot from already-extracted parts.
  ///
  /// Used by tests and by harnesses that drive their own HTTP stack.
  pub fn from_parts(status: u16, url: impl Into<String>, headers: Vec<(String, String)>, body: impl Into<String>) -> Self {
    Self {
      status,
      url: url.into(),
      headers,
      body: body.into(),
    }
  }

  /// Capture a live `reqwest` response, consuming it.
  ///
  /// Header values that are not valid UTF-8 are skipped.
  ///
  /// # Errors
  /// Returns an error when the body cannot be read.
  pub async fn capture(response: reqwest::Response) -> Result<Self> {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let headers = response
      .headers()
      .iter()
      .filter_map(|(name, value)| {
        value
          .to_str()
          .ok()
          .map(|value| (name.as_str().to_string(), value.to_string()))
      })
      .collect();
    let body = response
      .text()
      .await
      .context("Failed to read IdP response body")?;

    Ok(Self { status, url, headers, body })
  }

  /// HTTP status code.
  pub fn status(&self) -> u16 {
    self.status
  }

  /// Final URL the response was received from.
  pub fn url(&self) -> &str {
    &self.url
  }

  /// Response body.
  pub fn body(&self) -> &str {
    &self.body
  }

  /// First header value matching a name, case-insensitively.
  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(header, _)| header.eq_ignore_ascii_case(name))
      .map(|(_, value)| value.as_str())
  }

  /// The redirect target, when the IdP answered with a Location header.
  pub fn location(&self) -> Option<&str> {
    self.header("Location")
  }

  /// Whether the status code is a 3xx redirect.
  pub fn is_redirect(&self) -> bool {
    (300..400).contains(&self.status)
  }
}

/// Binding-shaped result of a completed IdP interaction.
///
/// The redirect-binding method of the responder contract produces the
/// `Redirect` variant, the POST-binding method the `Post` variant; the
/// harness interprets the payload downstream.
#[derive(Debug, Clone)]
pub enum IdpResponse {
  /// Final outcome of a redirect-binding flow.
  Redirect(IdpRedirectResponse),
  /// Final outcome of a POST-binding flow.
  Post(IdpPostResponse),
}

impl IdpResponse {
  /// Package a redirect outcome from the IdP's status code and Location URL.
  pub fn redirect(http_status_code: u16, url: impl Into<String>) -> Self {
    Self::Redirect(IdpRedirectResponse {
      http_status_code,
      url: url.into(),
    })
  }

  /// Package a POST outcome from the IdP's status code and wrapping form.
  pub fn post(http_status_code: u16, saml_form: SamlForm) -> Self {
    Self::Post(IdpPostResponse {
      http_status_code,
      saml_form,
    })
  }

  /// HTTP status code of the final IdP response, whatever the shape.
  pub fn http_status_code(&self) -> u16 {
    match self {
      Self::Redirect(redirect) => redirect.http_status_code,
      Self::Post(post) => post.http_status_code,
    }
  }

  /// The redirect payload, when this is a redirect-shaped result.
  pub fn as_redirect(&self) -> Option<&IdpRedirectResponse> {
    match self {
      Self::Redirect(redirect) => Some(redirect),
      Self::Post(_) => None,
    }
  }

  /// The POST payload, when this is a post-shaped result.
  pub fn as_post(&self) -> Option<&IdpPostResponse> {
    match self {
      Self::Redirect(_) => None,
      Self::Post(post) => Some(post),
    }
  }
}

/// Redirect-binding outcome: the SAML response travels in the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdpRedirectResponse {
  /// Status code returned by the IdP.
  pub http_status_code: u16,
  /// URL from the Location header, carrying the encoded SAML response.
  pub url: String,
}

impl IdpRedirectResponse {
  /// A query parameter of the redirect URL, percent-decoded.
  pub fn query_parameter(&self, name: &str) -> Option<String> {
    let url = Url::parse(&self.url).ok()?;
    url
      .query_pairs()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.into_owned())
  }

  /// The encoded SAMLResponse query parameter, when present.
  pub fn saml_response(&self) -> Option<String> {
    self.query_parameter("SAMLResponse")
  }

  /// The SAMLart artifact query parameter, when present.
  pub fn artifact(&self) -> Option<String> {
    self.query_parameter("SAMLart")
  }

  /// The RelayState query parameter, when present.
  pub fn relay_state(&self) -> Option<String> {
    self.query_parameter("RelayState")
  }
}

/// POST-binding outcome: the SAML response travels in an auto-submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdpPostResponse {
  /// Status code returned by the IdP.
  pub http_status_code: u16,
  /// The wrapping form containing the SAMLResponse control.
  pub saml_form: SamlForm,
}

impl IdpPostResponse {
  /// The encoded SAMLResponse control value.
  pub fn saml_response(&self) -> Option<&str> {
    self.saml_form.saml_response()
  }
}
