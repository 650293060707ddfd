//! Test fixtures for IdP interactions
//!
//! This module provides realistic sample pages and documents an IdP serves
//! during a web SSO flow, for use in tests.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// ID of the AuthnRequest the fixture response answers.
pub const REQUEST_ID: &str = "_req-e2e-0001";
/// Assertion consumer service URL the fixture response targets.
pub const ACS_URL: &str = "https://sp.example/acs";

/// A SAML Response document satisfying every checked core requirement.
pub fn compliant_response_xml() -> String {
  format!(
    r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol"
    xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion"
    ID="_resp-e2e-0001" Version="2.0" IssueInstant="2024-06-01T10:00:00Z"
    Destination="{ACS_URL}" InResponseTo="{REQUEST_ID}">
  <saml:Issuer>https://idp.example</saml:Issuer>
  <samlp:Status>
    <samlp:StatusCode Value="urn:oasis:names:tc:SAML:2.0:status:Success"/>
  </samlp:Status>
  <saml:Assertion ID="_asrt-e2e-0001" Version="2.0" IssueInstant="2024-06-01T10:00:00Z">
    <saml:Issuer>https://idp.example</saml:Issuer>
    <saml:Subject>
      <saml:NameID Format="urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress">ctk-test-user@example.org</saml:NameID>
    </saml:Subject>
    <saml:AuthnStatement AuthnInstant="2024-06-01T10:00:00Z">
      <saml:AuthnContext>
        <saml:AuthnContextClassRef>urn:oasis:names:tc:SAML:2.0:ac:classes:PasswordProtectedTransport</saml:AuthnContextClassRef>
      </saml:AuthnContext>
    </saml:AuthnStatement>
  </saml:Assertion>
</samlp:Response>"#
  )
}

/// The compliant response, base64-encoded the way bindings carry it.
pub fn encoded_response() -> String {
  BASE64.encode(compliant_response_xml().as_bytes())
}

/// The compliant response with its Version attribute downgraded.
pub fn tampered_version_response_xml() -> String {
  compliant_response_xml().replacen("Version=\"2.0\"", "Version=\"1.1\"", 1)
}

/// A login page asking for username and password, as an IdP's first answer.
pub fn login_page(action: &str) -> String {
  format!(
    r#"<html><head><title>Sign in</title></head><body>
  <form id="login" action="{action}" method="post">
    <input type="hidden" name="execution" value="e1s1"/>
    <input type="text" name="username"/>
    <input type="password" name="password"/>
    <input type="submit" value="Sign in"/>
  </form>
</body></html>"#
  )
}

/// The auto-submitted page wrapping the SAMLResponse control.
pub fn saml_form_page(acs_url: &str, encoded: &str) -> String {
  format!(
    r#"<html><body onload="document.forms[0].submit()">
  <form action="{acs_url}" method="post">
    <input type="hidden" name="SAMLResponse" value="{encoded}"/>
    <input type="hidden" name="RelayState" value="e2e-relay"/>
  </form>
</body></html>"#
  )
}

/// A redirect URL delivering the encoded response via query parameter.
pub fn redirect_url(acs_url: &str, encoded: &str) -> String {
  let mut url = url::Url::parse(acs_url).expect("fixture ACS URL is absolute");
  url
    .query_pairs_mut()
    .append_pair("SAMLResponse", encoded)
    .append_pair("RelayState", "e2e-relay");
  url.to_string()
}
