use std::borrow::Cow;

use percent_encoding::percent_decode_str;

pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Parses a schema `$ref` path and extracts the referenced schema name.
///
/// Only document-local pointers of the form `#/components/schemas/<name>` are
/// accepted. The name segment is percent-decoded and JSON Pointer escapes
/// (`~1` for `/`, `~0` for `~`) are undone. Returns `None` for external
/// references, pointers into other component sections, and pointers that
/// descend below a named schema (`#/components/schemas/Pet/properties/id`).
pub fn parse_schema_ref_path(ref_path: &str) -> Option<String> {
  parse_component_ref(ref_path, "schemas")
}

/// Parses `#/components/<section>/<name>` and returns the decoded name.
pub fn parse_component_ref(ref_path: &str, section: &str) -> Option<String> {
  let rest = ref_path.strip_prefix("#/components/")?;
  let name = rest.strip_prefix(section)?.strip_prefix('/')?;
  if name.is_empty() || name.contains('/') {
    return None;
  }
  Some(unescape_segment(name))
}

/// Resolves a discriminator mapping value, which OpenAPI allows to be either a
/// full schema pointer or a bare schema name.
pub fn parse_mapping_target(value: &str) -> Option<String> {
  if value.starts_with('#') || value.contains('/') {
    parse_schema_ref_path(value)
  } else if value.is_empty() {
    None
  } else {
    Some(value.to_string())
  }
}

/// Builds the canonical pointer for a named schema.
pub fn schema_pointer(name: &str) -> String {
  format!("{SCHEMA_REF_PREFIX}{}", escape_segment(name))
}

/// Escapes a single JSON Pointer reference token.
pub fn escape_segment(segment: &str) -> Cow<'_, str> {
  if segment.contains(['~', '/']) {
    Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
  } else {
    Cow::Borrowed(segment)
  }
}

fn unescape_segment(segment: &str) -> String {
  let decoded = percent_decode_str(segment).decode_utf8_lossy();
  decoded.replace("~1", "/").replace("~0", "~")
}
