//! saml-ctk - SAML IdP conformance test kit
//!
//! This is the main entry point for the CLI application.

use saml_ctk::cli;

#[tokio::main]
async fn main() {
  cli::run().await;
}
