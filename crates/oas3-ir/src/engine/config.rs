pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Options that change what the engine produces. Built once and passed by reference.
///
/// ```
/// use oas3_ir::engine::EngineConfig;
///
/// let config = EngineConfig::builder().hoist_inline_objects(true).build();
/// assert!(config.hoist_inline_objects);
/// assert_eq!(config.max_nesting_depth, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, bon::Builder)]
pub struct EngineConfig {
  /// Promote inline object schemas with properties to synthetic named models.
  #[builder(default)]
  pub hoist_inline_objects: bool,
  /// Deepest inline nesting the type resolver follows before failing.
  #[builder(default = DEFAULT_MAX_NESTING_DEPTH)]
  pub max_nesting_depth: usize,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}
