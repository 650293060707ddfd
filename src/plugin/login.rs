//! Built-in form-login responder.
//!
//! Covers the most common implementation-specific flow: the IdP answers the
//! initial AuthnRequest with a username/password login form, and one credential
//! submission yields the SAML response. IdPs with richer flows (MFA, consent
//! screens) need their own [`IdpSsoResponder`] implementation.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use super::api::IdpSsoResponder;
use super::form::{RawForm, SamlForm, parse_forms};
use super::response::{HttpResponse, IdpResponse};

/// Configuration for the form-login responder.
///
/// Timeout and retry behaviour are deliberately configuration rather than
/// policy baked into the contract.
#[derive(Debug, Clone)]
pub struct LoginConfig {
  /// Test account username.
  pub username: String,
  /// Test account password.
  pub password: String,
  /// Name of the login form's username control.
  pub username_control: String,
  /// Name of the login form's password control.
  pub password_control: String,
  /// Request timeout in seconds.
  pub timeout_secs: u64,
  /// Transport-level retries per submission.
  pub max_retries: u32,
}

impl LoginConfig {
  /// Configuration with default control names (`username`/`password`), a
  /// 30-second timeout, and no retries.
  pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
    Self {
      username: username.into(),
      password: password.into(),
      username_control: "username".to_string(),
      password_control: "password".to_string(),
      timeout_secs: 30,
      max_retries: 0,
    }
  }
}

/// [`IdpSsoResponder`] that authenticates by submitting the IdP's login form.
///
/// Keeps its session state (cookie jar, HTTP client) internal, as the
/// contract requires. Redirects are not followed automatically so the
/// binding-level outcome stays observable.
pub struct FormLoginResponder {
  config: LoginConfig,
  client: reqwest::Client,
}

impl FormLoginResponder {
  /// Create a responder for the given login configuration.
  ///
  /// # Errors
  /// Returns an error when the underlying `reqwest::Client` cannot be built.
  pub fn new(config: LoginConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(format!("saml-ctk/{} ({})", env!("CARGO_PKG_VERSION"), env!("TARGET")))
      .redirect(reqwest::redirect::Policy::none())
      .cookie_store(true)
      .build()
      .context("Failed to create HTTP client")?;

    Ok(Self { config, client })
  }

  /// Locate the login form on the page the IdP answered with.
  fn login_form(&self, original_response: &HttpResponse) -> Result<RawForm> {
    parse_forms(original_response.body())?
      .into_iter()
      .find(RawForm::is_login_form)
      .ok_or_else(|| anyhow!("IdP page at {} contains no login form", original_response.url()))
  }

  /// Fill credentials into the form, passing pre-populated controls through.
  fn login_fields(&self, form: &RawForm) -> Vec<(String, String)> {
    let mut fields = Vec::with_capacity(form.controls.len());
    for control in &form.controls {
      let value = if control.name == self.config.username_control {
        self.config.username.clone()
      } else if control.name == self.config.password_control {
        self.config.password.clone()
      } else {
        control.value.clone()
      };
      fields.push((control.name.clone(), value));
    }
    fields
  }

  /// Submit the login form, retrying transport failures per configuration.
  async fn submit_login(&self, original_response: &HttpResponse) -> Result<reqwest::Response> {
    let form = self.login_form(original_response)?;
    let action = resolve_action(original_response.url(), &form.action)?;
    let fields = self.login_fields(&form);

    debug!("Submitting IdP login form to {action}");

    let mut attempt = 0;
    loop {
      match self.client.post(action.clone()).form(&fields).send().await {
        Ok(response) => return Ok(response),
        Err(err) if attempt < self.config.max_retries => {
          attempt += 1;
          warn!("Login submission failed ({err}), retry {attempt}/{max}", max = self.config.max_retries);
          sleep(Duration::from_millis(500 * u64::from(attempt))).await;
        }
        Err(err) => return Err(err).context("Failed to submit IdP login form"),
      }
    }
  }
}

#[async_trait]
impl IdpSsoResponder for FormLoginResponder {
  async fn get_redirect_response(&self, original_response: &HttpResponse) -> Result<IdpResponse> {
    // The IdP may not require any interaction at all (active session,
    // artifact already issued).
    if let Some(location) = original_response.location()
      && carries_saml_payload(location)
    {
      return Ok(IdpResponse::redirect(original_response.status(), location));
    }

    let response = self.submit_login(original_response).await?;
    let status = response.status();

    if !status.is_redirection() {
      bail!("IdP answered login with {status} instead of a redirect carrying the SAML response");
    }

    let location = response
      .headers()
      .get(reqwest::header::LOCATION)
      .and_then(|value| value.to_str().ok())
      .ok_or_else(|| anyhow!("IdP redirect after login carries no Location header"))?;

    if !carries_saml_payload(location) {
      bail!("IdP redirect location carries no SAML response parameter: {location}");
    }

    Ok(IdpResponse::redirect(status.as_u16(), location))
  }

  async fn get_post_response(&self, original_response: &HttpResponse) -> Result<IdpResponse> {
    if let Ok(form) = SamlForm::parse(original_response.body()) {
      return Ok(IdpResponse::post(original_response.status(), form));
    }

    let response = self.submit_login(original_response).await?;
    let status = response.status();

    if !status.is_success() {
      let body = response.text().await.unwrap_or_else(|_| String::from("(no body)"));
      bail!("IdP answered login with {status}: {body}");
    }

    let body = response.text().await.context("Failed to read IdP login response body")?;
    let form = SamlForm::parse(&body).context("IdP login did not produce a SAML response form")?;

    Ok(IdpResponse::post(status.as_u16(), form))
  }
}

/// Resolve a form action against the URL the page was served from.
fn resolve_action(base: &str, action: &str) -> Result<Url> {
  if action.is_empty() {
    // An empty action submits back to the current URL.
    return Url::parse(base).with_context(|| format!("Invalid page URL {base:?}"));
  }
  let base = Url::parse(base).with_context(|| format!("Invalid page URL {base:?}"))?;
  base
    .join(action)
    .with_context(|| format!("Invalid form action {action:?}"))
}

/// Whether a redirect URL carries the SAML response or an artifact.
fn carries_saml_payload(location: &str) -> bool {
  Url::parse(location)
    .map(|url| {
      url
        .query_pairs()
        .any(|(key, _)| key == "SAMLResponse" || key == "SAMLart")
    })
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
  use super::*;

  const LOGIN_PAGE: &str = r#"<html><body>
    <form action="/sso/login" method="post">
      <input type="hidden" name="execution" value="e1s1"/>
      <input type="text" name="username"/>
      <input type="password" name="password"/>
    </form>
  </body></html>"#;

  fn responder() -> FormLoginResponder {
    FormLoginResponder::new(LoginConfig::new("alice", "correct horse")).unwrap()
  }

  #[test]
  fn login_fields_fill_credentials_and_keep_hidden_controls() {
    let responder = responder();
    let form = responder
      .login_form(&HttpResponse::from_parts(200, "https://idp.example/sso", vec![], LOGIN_PAGE))
      .unwrap();

    let fields = responder.login_fields(&form);
    assert!(fields.contains(&("username".to_string(), "alice".to_string())));
    assert!(fields.contains(&("password".to_string(), "correct horse".to_string())));
    assert!(fields.contains(&("execution".to_string(), "e1s1".to_string())));
  }

  #[test]
  fn custom_control_names_are_honoured() {
    let mut config = LoginConfig::new("alice", "pw");
    config.username_control = "j_username".to_string();
    config.password_control = "j_password".to_string();
    let responder = FormLoginResponder::new(config).unwrap();

    let page = LOGIN_PAGE
      .replace("name=\"username\"", "name=\"j_username\"")
      .replace("name=\"password\"", "name=\"j_password\"");
    let form = responder
      .login_form(&HttpResponse::from_parts(200, "https://idp.example/sso", vec![], page))
      .unwrap();

    let fields = responder.login_fields(&form);
    assert!(fields.contains(&("j_username".to_string(), "alice".to_string())));
    assert!(fields.contains(&("j_password".to_string(), "pw".to_string())));
  }

  #[test]
  fn page_without_login_form_fails_loudly() {
    let responder = responder();
    let err = responder
      .login_form(&HttpResponse::from_parts(200, "https://idp.example/sso", vec![], "<html><body/></html>"))
      .unwrap_err();
    assert!(err.to_string().contains("no login form"));
  }

  #[test]
  fn form_actions_resolve_against_the_page_url() {
    let resolved = resolve_action("https://idp.example/sso/start?client=sp", "/sso/login").unwrap();
    assert_eq!(resolved.as_str(), "https://idp.example/sso/login");

    let resolved = resolve_action("https://idp.example/sso/start", "login?step=2").unwrap();
    assert_eq!(resolved.as_str(), "https://idp.example/sso/login?step=2");

    let resolved = resolve_action("https://idp.example/sso/start", "").unwrap();
    assert_eq!(resolved.as_str(), "https://idp.example/sso/start");
  }

  #[test]
  fn saml_payload_detection_checks_known_parameters() {
    assert!(carries_saml_payload("https://sp.example/acs?SAMLResponse=abc"));
    assert!(carries_saml_payload("https://idp.example/sso?SAMLart=xyz"));
    assert!(!carries_saml_payload("https://idp.example/login?next=home"));
    assert!(!carries_saml_payload("not a url"));
  }

  #[tokio::test]
  async fn redirect_shortcut_packages_an_existing_artifact_redirect() {
    let responder = responder();
    let original = HttpResponse::from_parts(
      302,
      "https://idp.example/sso",
      vec![("Location".to_string(), "https://idp.example/sso?SAMLart=xyz".to_string())],
      "",
    );

    let result = responder.get_redirect_response(&original).await.unwrap();
    let redirect = result.as_redirect().unwrap();
    assert_eq!(redirect.http_status_code, 302);
    assert_eq!(redirect.url, "https://idp.example/sso?SAMLart=xyz");
  }
}
