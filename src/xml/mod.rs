/// XML part parsing.
///
/// - `tree`: owned element tree built with quick-xml
/// - `attr`: namespace- and case-tolerant attribute name matching
pub mod attr;
pub mod tree;

pub use attr::{LinkAttr, attr_name_matches, is_truthy_flag, normalize_attr_name};
pub use tree::{QualifiedName, XmlAttribute, XmlElement, XmlNode};
