//! The responder plugin contract.

use anyhow::Result;
use async_trait::async_trait;

use super::response::{HttpResponse, IdpResponse};

/// Extension point for the IdP interactions the SAML specification does not
/// constrain.
///
/// After the harness sends an AuthnRequest over one of the two bindings, the
/// IdP's first answer is implementation territory: login forms, MFA prompts,
/// consent screens. Implementations of this trait carry out whatever
/// interaction is required to authenticate the test user, then package the
/// HTTP-level outcome once the IdP has produced its SAML response.
///
/// Each call is stateless from the harness's perspective; any session state
/// (cookie jars, HTTP clients, tokens) lives inside the implementation.
/// Repeated calls are not required to produce identical results; one-time
/// tokens are the norm, not the exception.
#[async_trait]
pub trait IdpSsoResponder: Send + Sync {
  /// Complete the flow started by an AuthnRequest sent over the Redirect
  /// binding.
  ///
  /// # Arguments
  /// * `original_response` - The response the harness received for the
  ///   initial redirect-binding AuthnRequest, carrying whatever cookies,
  ///   headers, and body are needed to continue the interaction.
  ///
  /// # Returns
  /// A redirect-shaped [`IdpResponse`] built from the IdP's final status code
  /// and the Location header URL carrying the encoded SAML response.
  ///
  /// # Errors
  /// Implementations fail loudly when the IdP flow does not match what they
  /// expect; they never return a result with missing critical fields.
  async fn get_redirect_response(&self, original_response: &HttpResponse) -> Result<IdpResponse>;

  /// Complete the flow started by an AuthnRequest sent over the POST binding.
  ///
  /// # Arguments
  /// * `original_response` - The response the harness received for the
  ///   initial POST-binding AuthnRequest.
  ///
  /// # Returns
  /// A post-shaped [`IdpResponse`] built from the IdP's final status code and
  /// the wrapping form containing the SAMLResponse control.
  ///
  /// # Errors
  /// Same contract as [`get_redirect_response`](Self::get_redirect_response).
  async fn get_post_response(&self, original_response: &HttpResponse) -> Result<IdpResponse>;
}
