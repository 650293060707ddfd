//! End-to-end tests for the responder contract and verification core
//!
//! These tests demonstrate complete flows: a responder (fake or the built-in
//! form-login implementation against a scripted IdP) completes the login
//! interaction, and the recovered SAML response document is verified against
//! the core specification.

mod common;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use common::fake_idp::FakeIdpResponder;
use common::fixtures;
use saml_ctk::plugin::{FormLoginResponder, HttpResponse, IdpSsoResponder, LoginConfig};
use saml_ctk::verification::{ComplianceError, VerificationContext, verify_response};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn full_expectations() -> VerificationContext {
  VerificationContext::new()
    .expecting_request_id(fixtures::REQUEST_ID)
    .expecting_acs_url(fixtures::ACS_URL)
}

fn initial_response(body: &str) -> HttpResponse {
  HttpResponse::from_parts(200, "https://idp.example/sso", vec![], body)
}

#[tokio::test]
async fn redirect_result_carries_the_saml_payload() {
  let encoded = fixtures::encoded_response();
  let responder = FakeIdpResponder::new().with_redirect_url(fixtures::redirect_url(fixtures::ACS_URL, &encoded));

  let result = responder.get_redirect_response(&initial_response("")).await.unwrap();
  let redirect = result.as_redirect().unwrap();

  assert!(!redirect.url.is_empty());
  assert_eq!(redirect.http_status_code, 302);
  assert_eq!(redirect.saml_response(), Some(encoded));
  assert_eq!(redirect.relay_state(), Some("e2e-relay".to_string()));
}

#[tokio::test]
async fn post_result_wraps_a_recoverable_response_document() {
  let page = fixtures::saml_form_page(fixtures::ACS_URL, &fixtures::encoded_response());
  let responder = FakeIdpResponder::new().with_form_page(page);

  let result = responder.get_post_response(&initial_response("")).await.unwrap();
  let post = result.as_post().unwrap();

  assert_eq!(post.saml_form.action(), fixtures::ACS_URL);
  let document = post.saml_form.decoded_saml_response().unwrap();
  assert_eq!(document, fixtures::compliant_response_xml());

  verify_response(&document, &full_expectations()).unwrap();
}

#[tokio::test]
async fn responder_without_continuation_data_fails_loudly() {
  let responder = FakeIdpResponder::new();

  let err = responder.get_redirect_response(&initial_response("")).await.unwrap_err();
  assert!(err.to_string().contains("no redirect"));

  let err = responder.get_post_response(&initial_response("")).await.unwrap_err();
  assert!(err.to_string().contains("no SAML response form"));
}

#[tokio::test]
async fn form_login_responder_completes_the_redirect_binding() {
  let server = MockServer::start().await;
  let redirect_target = fixtures::redirect_url(fixtures::ACS_URL, &fixtures::encoded_response());

  Mock::given(method("POST"))
    .and(path("/sso/login"))
    .and(body_string_contains("username=ctk-test-user"))
    .and(body_string_contains("execution=e1s1"))
    .respond_with(ResponseTemplate::new(302).insert_header("Location", redirect_target.as_str()))
    .expect(1)
    .mount(&server)
    .await;

  let original = HttpResponse::from_parts(
    200,
    format!("{}/sso/start", server.uri()),
    vec![],
    fixtures::login_page("/sso/login"),
  );

  let responder = FormLoginResponder::new(LoginConfig::new("ctk-test-user", "ctk-test-password")).unwrap();
  let result = responder.get_redirect_response(&original).await.unwrap();

  let redirect = result.as_redirect().unwrap();
  assert_eq!(redirect.http_status_code, 302);
  assert_eq!(redirect.url, redirect_target);

  let document = BASE64.decode(redirect.saml_response().unwrap()).unwrap();
  verify_response(&String::from_utf8(document).unwrap(), &full_expectations()).unwrap();
}

#[tokio::test]
async fn form_login_responder_completes_the_post_binding() {
  let server = MockServer::start().await;
  let page = fixtures::saml_form_page(fixtures::ACS_URL, &fixtures::encoded_response());

  Mock::given(method("GET"))
    .and(path("/sso/start"))
    .respond_with(ResponseTemplate::new(200).set_body_string(fixtures::login_page("/sso/login")))
    .mount(&server)
    .await;

  Mock::given(method("POST"))
    .and(path("/sso/login"))
    .and(body_string_contains("password=ctk-test-password"))
    .respond_with(ResponseTemplate::new(200).set_body_string(page))
    .expect(1)
    .mount(&server)
    .await;

  // Capture the IdP's first answer the way a harness would.
  let initial = reqwest::get(format!("{}/sso/start", server.uri())).await.unwrap();
  let original = HttpResponse::capture(initial).await.unwrap();
  assert_eq!(original.status(), 200);
  assert!(original.url().ends_with("/sso/start"));

  let responder = FormLoginResponder::new(LoginConfig::new("ctk-test-user", "ctk-test-password")).unwrap();
  let result = responder.get_post_response(&original).await.unwrap();

  let post = result.as_post().unwrap();
  assert_eq!(post.http_status_code, 200);

  let document = post.saml_form.decoded_saml_response().unwrap();
  verify_response(&document, &full_expectations()).unwrap();
}

#[tokio::test]
async fn form_login_responder_rejects_a_flow_without_saml_outcome() {
  let server = MockServer::start().await;

  // Wrong credentials: the IdP serves the login page again.
  Mock::given(method("POST"))
    .and(path("/sso/login"))
    .respond_with(ResponseTemplate::new(200).set_body_string(fixtures::login_page("/sso/login")))
    .mount(&server)
    .await;

  let original = HttpResponse::from_parts(
    200,
    format!("{}/sso/start", server.uri()),
    vec![],
    fixtures::login_page("/sso/login"),
  );

  let responder = FormLoginResponder::new(LoginConfig::new("ctk-test-user", "wrong-password")).unwrap();
  let err = responder.get_post_response(&original).await.unwrap_err();
  assert!(err.to_string().contains("did not produce a SAML response form"));
}

#[tokio::test]
async fn form_login_responder_requires_a_login_form() {
  let responder = FormLoginResponder::new(LoginConfig::new("ctk-test-user", "ctk-test-password")).unwrap();
  let original = initial_response("<html><body><p>Maintenance window</p></body></html>");

  let err = responder.get_redirect_response(&original).await.unwrap_err();
  assert!(err.to_string().contains("no login form"));
}

#[test]
fn tampered_document_is_rejected_with_its_section_code() {
  let err = verify_response(&fixtures::tampered_version_response_xml(), &full_expectations()).unwrap_err();

  let compliance = err.downcast_ref::<ComplianceError>().expect("typed violation");
  assert_eq!(compliance.violations()[0].code, "SAMLCore.3.2.2_c");
}

#[test]
fn request_id_expectation_is_enforced() {
  let ctx = VerificationContext::new().expecting_request_id("_some-other-request");
  let err = verify_response(&fixtures::compliant_response_xml(), &ctx).unwrap_err();

  let compliance = err.downcast_ref::<ComplianceError>().expect("typed violation");
  assert_eq!(compliance.violations()[0].code, "SAMLCore.3.2.2_b");
}

#[test]
fn compliant_document_passes_without_expectations() {
  verify_response(&fixtures::compliant_response_xml(), &VerificationContext::new()).unwrap();
}
