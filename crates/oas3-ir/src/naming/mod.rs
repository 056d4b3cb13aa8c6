pub mod identifiers;

pub use identifiers::{ensure_unique, sanitize, to_type_identifier};
