use std::{collections::BTreeSet, sync::LazyLock};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

static WORD_SEPARATOR_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap_or_else(|_| unreachable!("static pattern")));

/// Transliterates to ASCII, replaces every run of non-alphanumeric characters
/// with a single underscore and trims underscores from both ends.
pub fn sanitize(input: &str) -> String {
  let ascii = any_ascii(input);
  WORD_SEPARATOR_RE.replace_all(&ascii, "_").trim_matches('_').to_string()
}

/// Converts a component name into a `PascalCase` model identifier.
///
/// # Rules:
/// 1. Non-ASCII characters are transliterated.
/// 2. A name that already mixes upper and lower case and has no separators keeps
///    its capitalisation (`HTTPResponse` stays `HTTPResponse`); only the first
///    letter is upper-cased.
/// 3. Otherwise the name is split on separators and each word is converted to
///    `PascalCase` (`pet_store.v2` becomes `PetStoreV2`).
/// 4. A result that starts with a digit is prefixed with `T`.
/// 5. An empty result becomes `Unnamed`.
pub fn to_type_identifier(name: &str) -> String {
  let ascii = any_ascii(name);

  let has_separators = ascii.chars().any(|c| !c.is_ascii_alphanumeric());
  let has_upper = ascii.chars().any(|c| c.is_ascii_uppercase());
  let has_lower = ascii.chars().any(|c| c.is_ascii_lowercase());

  let mut ident = if !has_separators && has_upper && has_lower {
    capitalize_first(&ascii)
  } else {
    WORD_SEPARATOR_RE
      .split(&ascii)
      .filter(|word| !word.is_empty())
      .map(word_to_pascal)
      .collect::<String>()
  };

  if ident.is_empty() {
    return "Unnamed".to_string();
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, 'T');
  }
  ident
}

/// Ensures a name is unique within a set of used names, appending a numeric suffix if needed.
pub fn ensure_unique(base_name: &str, used_names: &BTreeSet<String>) -> String {
  if !used_names.contains(base_name) {
    return base_name.to_string();
  }
  let mut i = 2;
  loop {
    let new_name = format!("{base_name}{i}");
    if !used_names.contains(&new_name) {
      return new_name;
    }
    i += 1;
  }
}

/// `NOT` and `not` both become `Not`; camel-cased words are split on case boundaries.
fn word_to_pascal(word: &str) -> String {
  let is_mixed = word.chars().any(|c| c.is_ascii_uppercase()) && word.chars().any(|c| c.is_ascii_lowercase());
  if is_mixed {
    word.to_pascal_case()
  } else {
    capitalize_first(&word.to_ascii_lowercase())
  }
}

fn capitalize_first(input: &str) -> String {
  let mut chars = input.chars();
  match chars.next() {
    None => String::new(),
    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
  }
}
