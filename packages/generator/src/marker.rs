use sigen_parser::ast::AttributeList;

/// Attribute that opts an interface into generation
pub const MARKER_ATTRIBUTE: &str = "SerializableInterface";

/// Whether any attribute in the lists is the marker.
///
/// Names are compared exactly as written. Aliases are not resolved and
/// qualified or `...Attribute` spellings do not match, while an unrelated
/// attribute that happens to be called `SerializableInterface` does.
pub fn has_marker(attribute_lists: &[AttributeList]) -> bool {
    attribute_lists
        .iter()
        .flat_map(|list| &list.attributes)
        .any(|attribute| attribute.name == MARKER_ATTRIBUTE)
}
