//! IdP responder plugin contract and supporting value objects.
//!
//! The SAML specification constrains what an IdP's response must look like,
//! but not how a user gets authenticated first; that part is
//! implementation-dependent. This module defines the boundary the test
//! harness hands it across:
//! - [`IdpSsoResponder`] - the contract, one method per binding
//! - [`HttpResponse`] / [`IdpResponse`] - the values crossing it
//! - [`SamlForm`] - the POST binding's wrapping-form payload
//! - [`FormLoginResponder`] - a built-in implementation for plain
//!   username/password login forms

pub mod api;
pub mod form;
pub mod login;
pub mod response;

pub use api::IdpSsoResponder;
pub use form::{FormControl, RELAY_STATE_CONTROL, SAML_RESPONSE_CONTROL, SamlForm};
pub use login::{FormLoginResponder, LoginConfig};
pub use response::{HttpResponse, IdpPostResponse, IdpRedirectResponse, IdpResponse};
