//! Fake IdP responder for testing
//!
//! This module provides a stub implementation of the responder plugin
//! contract that returns predefined outcomes without making any network
//! requests.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use saml_ctk::plugin::{HttpResponse, IdpResponse, IdpSsoResponder, SamlForm};

/// A fake responder that returns predefined outcomes for testing
pub struct FakeIdpResponder {
  redirect_url: Option<String>,
  form_page: Option<String>,
}

impl FakeIdpResponder {
  /// Create a fake responder with no canned outcomes; every call fails the
  /// way a real implementation does when the flow has no continuation data.
  pub fn new() -> Self {
    Self {
      redirect_url: None,
      form_page: None,
    }
  }

  /// Canned outcome for the redirect binding.
  pub fn with_redirect_url(mut self, url: impl Into<String>) -> Self {
    self.redirect_url = Some(url.into());
    self
  }

  /// Canned outcome for the POST binding, as the raw IdP page.
  pub fn with_form_page(mut self, page: impl Into<String>) -> Self {
    self.form_page = Some(page.into());
    self
  }
}

impl Default for FakeIdpResponder {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl IdpSsoResponder for FakeIdpResponder {
  async fn get_redirect_response(&self, _original_response: &HttpResponse) -> Result<IdpResponse> {
    let url = self
      .redirect_url
      .as_ref()
      .ok_or_else(|| anyhow!("IdP flow produced no redirect carrying a SAML response"))?;
    Ok(IdpResponse::redirect(302, url))
  }

  async fn get_post_response(&self, _original_response: &HttpResponse) -> Result<IdpResponse> {
    let page = self
      .form_page
      .as_ref()
      .ok_or_else(|| anyhow!("IdP flow produced no SAML response form"))?;
    let form = SamlForm::parse(page)?;
    Ok(IdpResponse::post(200, form))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::common::fixtures;

  fn initial_response() -> HttpResponse {
    HttpResponse::from_parts(200, "https://idp.example/sso", vec![], "")
  }

  #[tokio::test]
  async fn fake_responder_without_outcomes_errors() {
    let responder = FakeIdpResponder::new();
    assert!(responder.get_redirect_response(&initial_response()).await.is_err());
    assert!(responder.get_post_response(&initial_response()).await.is_err());
  }

  #[tokio::test]
  async fn fake_responder_returns_canned_redirect() {
    let url = fixtures::redirect_url(fixtures::ACS_URL, &fixtures::encoded_response());
    let responder = FakeIdpResponder::new().with_redirect_url(&url);

    let result = responder.get_redirect_response(&initial_response()).await.unwrap();
    assert_eq!(result.as_redirect().unwrap().url, url);
  }

  #[tokio::test]
  async fn fake_responder_parses_canned_form_page() {
    let page = fixtures::saml_form_page(fixtures::ACS_URL, &fixtures::encoded_response());
    let responder = FakeIdpResponder::new().with_form_page(page);

    let result = responder.get_post_response(&initial_response()).await.unwrap();
    assert!(result.as_post().unwrap().saml_response().is_some());
  }
}
