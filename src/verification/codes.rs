//! Specification section codes and their requirement text.
//!
//! Every compliance violation is reported under the section of the SAML Core
//! specification (or the XML Datatypes schema) that states the requirement,
//! so a failing test points straight at the normative text.

/// A section code paired with the requirement it stands for.
pub type CodeEntry = (&'static str, &'static str);

/// SAML Core 1.3.1: string values must carry at least one non-whitespace
/// character.
pub const SAML_CORE_1_3_1_A: &str = "SAMLCore.1.3.1_a";
/// SAML Core 1.3.2: anyURI values must be absolute URI references.
pub const SAML_CORE_1_3_2_A: &str = "SAMLCore.1.3.2_a";
/// SAML Core 1.3.3: time values must conform to the xs:dateTime lexical form.
pub const SAML_CORE_1_3_3_A: &str = "SAMLCore.1.3.3_a";
/// SAML Core 1.3.4: ID values must be non-empty.
pub const SAML_CORE_1_3_4_A: &str = "SAMLCore.1.3.4_a";
/// SAML Core 1.3.4: ID values must be unique within the document.
pub const SAML_CORE_1_3_4_B: &str = "SAMLCore.1.3.4_b";

/// XML Datatypes 3.2.7: general xs:dateTime lexical form.
pub const XML_DATATYPES_3_2_7: &str = "XMLDatatypesSchema.3.2.7";
/// XML Datatypes 3.2.7.1: years longer than four digits must not carry
/// leading zeros.
pub const XML_DATATYPES_3_2_7_1_A1: &str = "XMLDatatypesSchema.3.2.7.1_a1";
/// XML Datatypes 3.2.7.1: the year 0000 is prohibited.
pub const XML_DATATYPES_3_2_7_1_A2: &str = "XMLDatatypesSchema.3.2.7.1_a2";
/// XML Datatypes 3.2.7.1: the year field contains digits only (no plus sign).
pub const XML_DATATYPES_3_2_7_1_A3: &str = "XMLDatatypesSchema.3.2.7.1_a3";

/// SAML Core 3.2.2: the Response ID value must be valid.
pub const SAML_CORE_3_2_2_A: &str = "SAMLCore.3.2.2_a";
/// SAML Core 3.2.2: InResponseTo must reference the request that solicited
/// the response.
pub const SAML_CORE_3_2_2_B: &str = "SAMLCore.3.2.2_b";
/// SAML Core 3.2.2: the Version attribute must be "2.0".
pub const SAML_CORE_3_2_2_C: &str = "SAMLCore.3.2.2_c";
/// SAML Core 3.2.2: IssueInstant must be a valid time value.
pub const SAML_CORE_3_2_2_D: &str = "SAMLCore.3.2.2_d";
/// SAML Core 3.2.2: Destination, when present, must match the address the
/// response was delivered to.
pub const SAML_CORE_3_2_2_E: &str = "SAMLCore.3.2.2_e";

/// SAML Core 3.2.2.2: the top-level StatusCode value must be one of the four
/// defined top-level codes.
pub const SAML_CORE_3_2_2_2_A: &str = "SAMLCore.3.2.2.2_a";
/// SAML Core 3.2.2.2: additional top-level values are not permitted.
pub const SAML_CORE_3_2_2_2_B: &str = "SAMLCore.3.2.2.2_b";

/// SAML Core 3.4: responses to an AuthnRequest carry assertions with at least
/// one AuthnStatement.
pub const SAML_CORE_3_4_A: &str = "SAMLCore.3.4_a";
/// SAML Core 3.8.2: NameIDMappingResponse must contain NameID or EncryptedID.
pub const SAML_CORE_3_8_2_A: &str = "SAMLCore.3.8.2_a";

/// Requirement text keyed by section code.
static REQUIREMENTS: &[CodeEntry] = &[
  (
    SAML_CORE_1_3_1_A,
    "Unless otherwise noted, all strings in SAML messages MUST consist of at least one non-whitespace character",
  ),
  (
    SAML_CORE_1_3_2_A,
    "Unless otherwise indicated, all URI reference values MUST consist of at least one non-whitespace character, \
     and are REQUIRED to be absolute",
  ),
  (
    SAML_CORE_1_3_3_A,
    "All SAML time values have the type xs:dateTime and MUST be expressed in UTC form",
  ),
  (SAML_CORE_1_3_4_A, "An identifier value MUST be a non-empty xs:ID value"),
  (
    SAML_CORE_1_3_4_B,
    "Any party that assigns an identifier MUST ensure that there is negligible probability that it will \
     accidentally assign the same identifier to a different data object",
  ),
  (
    XML_DATATYPES_3_2_7,
    "The lexical space of xs:dateTime consists of finite-length sequences of the form \
     '-'? yyyy '-' mm '-' dd 'T' hh ':' mm ':' ss ('.' s+)? (zzzzzz)?",
  ),
  (
    XML_DATATYPES_3_2_7_1_A1,
    "If more than four digits are used to represent the year, leading zeros are prohibited",
  ),
  (XML_DATATYPES_3_2_7_1_A2, "The value '0000' is prohibited as a year"),
  (
    XML_DATATYPES_3_2_7_1_A3,
    "The year field consists of decimal digits only; a preceding plus sign is not permitted",
  ),
  (SAML_CORE_3_2_2_A, "The Response ID attribute value MUST be a valid identifier"),
  (
    SAML_CORE_3_2_2_B,
    "If the response is generated in response to a request, InResponseTo MUST contain the ID of that request",
  ),
  (SAML_CORE_3_2_2_C, "The Version attribute MUST be set to '2.0'"),
  (
    SAML_CORE_3_2_2_D,
    "The IssueInstant attribute MUST carry the time instant of issue in UTC as a valid xs:dateTime",
  ),
  (
    SAML_CORE_3_2_2_E,
    "If the Destination attribute is present, it MUST match the URI reference the message was delivered to",
  ),
  (
    SAML_CORE_3_2_2_2_A,
    "The topmost StatusCode value MUST be from the top-level list: Success, Requester, Responder, VersionMismatch",
  ),
  (
    SAML_CORE_3_2_2_2_B,
    "A system entity MUST NOT use a top-level StatusCode value outside the four values defined by the specification",
  ),
  (
    SAML_CORE_3_4_A,
    "Any assertion issued in response to an AuthnRequest MUST contain at least one AuthnStatement",
  ),
  (
    SAML_CORE_3_8_2_A,
    "A NameIDMappingResponse MUST contain a NameID or EncryptedID element with the mapped identifier",
  ),
];

/// Look up the requirement text for a section code.
///
/// Unknown codes fall back to a generic phrase rather than panicking, so a
/// forgotten table entry degrades to a less descriptive report.
pub fn requirement(code: &str) -> &'static str {
  REQUIREMENTS
    .iter()
    .find(|(c, _)| *c == code)
    .map(|(_, text)| *text)
    .unwrap_or("requirement text not catalogued for this section")
}
