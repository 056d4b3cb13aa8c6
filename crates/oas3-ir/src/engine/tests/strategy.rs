use indexmap::IndexMap;

use crate::{
  engine::select_strategy,
  ir::{DiscriminatorInfo, SchemaModel, SpecialCase, TypeDescriptor, UnionDetectionStrategy},
};

fn union_model(members: &[&str]) -> SchemaModel {
  let mut model = SchemaModel::new("Pet", "Pet");
  model.union_members = members.iter().map(|m| TypeDescriptor::reference(*m)).collect();
  model
}

fn mapping() -> IndexMap<String, String> {
  IndexMap::from([
    ("dog".to_string(), "Dog".to_string()),
    ("cat".to_string(), "Cat".to_string()),
  ])
}

#[test]
fn test_discriminated_union_dispatches() {
  let mut model = union_model(&["Cat", "Dog"]);
  model.special_cases.insert(SpecialCase::DiscriminatedUnion);
  model.discriminator = Some(DiscriminatorInfo {
    property_name: "petType".to_string(),
    value_to_schema_name: mapping(),
    required: true,
  });

  assert_eq!(
    select_strategy(&model),
    Some(UnionDetectionStrategy::DiscriminatorDispatch {
      property_name: "petType".to_string(),
      value_to_schema_name: mapping(),
    })
  );
}

#[test]
fn test_union_without_discriminator_tries_each() {
  let mut tagged_without_info = union_model(&["Cat", "Dog"]);
  tagged_without_info.special_cases.insert(SpecialCase::DiscriminatedUnion);

  for model in [union_model(&["Cat", "Dog"]), tagged_without_info] {
    assert_eq!(
      select_strategy(&model),
      Some(UnionDetectionStrategy::HeuristicTryEach {
        members: vec![TypeDescriptor::reference("Cat"), TypeDescriptor::reference("Dog")],
      }),
      "failed for model {model:?}"
    );
  }
}

#[test]
fn test_non_union_has_no_strategy() {
  let mut alias = SchemaModel::new("OnlyPet", "OnlyPet");
  alias.aliased_type = Some(TypeDescriptor::reference("Pet"));

  for model in [SchemaModel::new("Plain", "Plain"), alias, union_model(&[])] {
    assert_eq!(select_strategy(&model), None, "failed for model {:?}", model.name);
  }
}
