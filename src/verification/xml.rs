//! DOM lookup helpers shared by the verification routines.
//!
//! SAML documents mix namespaces (saml, samlp, ds, xenc), so all lookups here
//! match on local names only.

use roxmltree::Node;

/// XML Schema instance namespace, home of the `xsi:type` attribute.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Direct element children of `node` matching a local name.
pub fn children<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Vec<Node<'a, 'input>> {
  node
    .children()
    .filter(|child| child.is_element() && child.tag_name().name() == name)
    .collect()
}

/// All element descendants of `node` matching a local name, in document order.
pub fn all_children<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Vec<Node<'a, 'input>> {
  node
    .descendants()
    .filter(|desc| desc.is_element() && *desc != node && desc.tag_name().name() == name)
    .collect()
}

/// Attribute value by local name, ignoring any namespace prefix.
pub fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
  node
    .attributes()
    .find(|attribute| attribute.name() == name)
    .map(|attribute| attribute.value())
}

/// The `xsi:type` attribute value, when declared.
pub fn xsi_type<'a>(node: Node<'a, '_>) -> Option<&'a str> {
  node.attribute((XSI_NS, "type"))
}

/// Text content of an element, empty when it has none.
pub fn text_of<'a>(node: Node<'a, '_>) -> &'a str {
  node.text().unwrap_or("")
}

#[cfg(test)]
mod tests {
  use roxmltree::Document;

  use super::*;

  const DOC: &str = r#"<Root xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <Status><StatusCode Value="ok"/></Status>
    <Status/>
    <Wrapper><Status note="nested"/></Wrapper>
    <Typed xsi:type="xs:string">hello</Typed>
  </Root>"#;

  #[test]
  fn children_matches_direct_elements_only() {
    let doc = Document::parse(DOC).unwrap();
    let root = doc.root_element();
    assert_eq!(children(root, "Status").len(), 2);
  }

  #[test]
  fn all_children_descends_into_wrappers() {
    let doc = Document::parse(DOC).unwrap();
    let root = doc.root_element();
    assert_eq!(all_children(root, "Status").len(), 3);
  }

  #[test]
  fn all_children_excludes_the_node_itself() {
    let doc = Document::parse("<Status><Status/></Status>").unwrap();
    let root = doc.root_element();
    assert_eq!(all_children(root, "Status").len(), 1);
  }

  #[test]
  fn attr_ignores_missing_values() {
    let doc = Document::parse(DOC).unwrap();
    let root = doc.root_element();
    let code = all_children(root, "StatusCode")[0];
    assert_eq!(attr(code, "Value"), Some("ok"));
    assert_eq!(attr(code, "Missing"), None);
  }

  #[test]
  fn xsi_type_reads_the_namespaced_attribute() {
    let doc = Document::parse(DOC).unwrap();
    let root = doc.root_element();
    let typed = children(root, "Typed")[0];
    assert_eq!(xsi_type(typed), Some("xs:string"));
    assert_eq!(text_of(typed), "hello");
  }
}
