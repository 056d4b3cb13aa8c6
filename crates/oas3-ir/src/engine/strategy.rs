use crate::ir::{SchemaModel, SpecialCase, UnionDetectionStrategy};

/// Picks how a renderer should tell the members of a union model apart.
///
/// Discriminated unions dispatch on the discriminator value, keeping the
/// mapping's declaration order. Any other union falls back to trying members
/// in order. Non-union models get `None`.
pub fn select_strategy(model: &SchemaModel) -> Option<UnionDetectionStrategy> {
  if model.has_special_case(SpecialCase::DiscriminatedUnion)
    && let Some(discriminator) = &model.discriminator
  {
    return Some(UnionDetectionStrategy::DiscriminatorDispatch {
      property_name: discriminator.property_name.clone(),
      value_to_schema_name: discriminator.value_to_schema_name.clone(),
    });
  }

  model.is_union().then(|| UnionDetectionStrategy::HeuristicTryEach {
    members: model.union_members.clone(),
  })
}
