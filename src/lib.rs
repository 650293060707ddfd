//! SAML IdP conformance test kit
//!
//! This library provides the responder plugin contract a SAML conformance
//! harness hands implementation-specific IdP login handling across, plus
//! verification of IdP responses against the core specification.

pub mod cli;
pub mod color;
pub mod commands;
pub mod credentials;
pub mod plugin;
pub mod verification;
