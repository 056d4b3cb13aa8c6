use oas3_ir::{
  Analyzer, Document, EngineConfig, InternalModel, LoaderOptions, SpecFormat, SpecialCase, TypeDescriptor,
  document::{Method, ParameterIn},
  engine::AnalysisStats,
  ir::{InheritanceKind, InheritanceStrategy, ScalarType, UnionDetectionStrategy},
  load_slice,
};

const PETSTORE: &[u8] = include_bytes!("../fixtures/petstore.yaml");

fn petstore() -> Document {
  load_slice(PETSTORE, SpecFormat::Yaml, LoaderOptions::default()).expect("fixture loads")
}

fn analyze_petstore() -> (InternalModel, AnalysisStats) {
  let config = EngineConfig::builder().hoist_inline_objects(true).build();
  Analyzer::new(&petstore(), config).analyze().expect("fixture analyzes")
}

#[test]
fn test_models_in_declaration_order() {
  let (model, _) = analyze_petstore();

  assert_eq!(model.info.title, "Petstore");
  assert_eq!(model.info.version, "1.2.0");
  assert_eq!(
    model.schemas.keys().map(String::as_str).collect::<Vec<_>>(),
    [
      "Pet",
      "PetBase",
      "Cat",
      "Dog",
      "Owner",
      "OwnerAddress",
      "Category",
      "Error",
      "CreatePetRequest"
    ]
  );
}

#[test]
fn test_render_order_puts_dependencies_first() {
  let (model, _) = analyze_petstore();
  assert_eq!(model.render_order.len(), model.schemas.len());

  let position = |name: &str| model.render_order.iter().position(|n| n == name).expect("rendered");
  for schema in model.schemas.values() {
    for dependency in &schema.dependencies {
      assert!(
        position(dependency) < position(&schema.name),
        "{dependency} must render before {}",
        schema.name
      );
    }
  }
}

#[test]
fn test_pet_hierarchy() {
  let (model, _) = analyze_petstore();

  let pet = model.schema("Pet").expect("Pet");
  assert!(pet.has_special_case(SpecialCase::DiscriminatedUnion));
  assert!(matches!(
    &pet.union_strategy,
    Some(UnionDetectionStrategy::DiscriminatorDispatch { property_name, .. }) if property_name == "petType"
  ));

  let cat = model.schema("Cat").expect("Cat");
  assert_eq!(cat.inheritance.kind, InheritanceKind::AllOfFlattening);
  assert!(cat.has_special_case(SpecialCase::MultipleComposition));
  assert_eq!(
    cat.properties.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
    ["id", "petType", "name", "meow"]
  );
  assert_eq!(cat.implements, ["Pet"]);
  assert_eq!(
    cat.property("id").expect("id").ty,
    TypeDescriptor::scalar_with_format(ScalarType::Int, Some("int64".to_string()))
  );

  let dog = model.schema("Dog").expect("Dog");
  assert_eq!(dog.inheritance, InheritanceStrategy::abstract_base("PetBase"));
  assert_eq!(dog.implements, ["Pet"]);
  assert_eq!(
    dog.properties.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
    ["bark"]
  );
  assert_eq!(
    dog.property("bark").expect("bark").ty,
    TypeDescriptor::enumeration(vec!["soft".into(), "loud".into()]).with_nullable(true)
  );
}

#[test]
fn test_owner_and_category() {
  let (model, _) = analyze_petstore();

  let owner = model.schema("Owner").expect("Owner");
  assert!(owner.has_special_case(SpecialCase::PolymorphicArray));
  assert!(owner.has_special_case(SpecialCase::DynamicProperties));
  assert_eq!(owner.additional_properties, Some(TypeDescriptor::scalar(ScalarType::String)));
  assert_eq!(owner.dependencies, ["Pet", "OwnerAddress"]);
  assert!(model.schema("OwnerAddress").expect("OwnerAddress").synthetic);

  let category = model.schema("Category").expect("Category");
  assert!(category.has_special_case(SpecialCase::CircularReference));
  assert!(category.has_special_case(SpecialCase::RecursiveSchema));
  assert!(category.dependencies.is_empty());
  assert_eq!(category.cyclic_references, ["Category"]);
}

#[test]
fn test_endpoints() {
  let (model, _) = analyze_petstore();

  let summary = model
    .endpoints
    .iter()
    .map(|e| (e.method, e.path.as_str(), e.operation_id.as_deref().unwrap_or_default()))
    .collect::<Vec<_>>();
  assert_eq!(
    summary,
    [
      (Method::Get, "/pets", "listPets"),
      (Method::Post, "/pets", "createPet"),
      (Method::Get, "/pets/{petId}", "showPetById"),
    ]
  );

  let list = &model.endpoints[0];
  assert_eq!(list.parameters[0].location, ParameterIn::Query);
  assert!(list.parameters[0].ty.nullable);
  assert_eq!(
    list.responses[0].ty,
    Some(TypeDescriptor::array(TypeDescriptor::reference("Pet")))
  );
  assert_eq!(list.responses[1].ty, Some(TypeDescriptor::reference("Error")));

  let create = &model.endpoints[1];
  let body = create.request_body.as_ref().expect("request body");
  assert_eq!(body.ty, TypeDescriptor::reference("CreatePetRequest"));
  assert_eq!(
    model.schema("CreatePetRequest").expect("CreatePetRequest").dependencies,
    ["Category"]
  );

  let show = &model.endpoints[2];
  assert_eq!(show.parameters[0].name, "petId");
  assert!(show.parameters[0].required);
}

#[test]
fn test_statistics() {
  let (_, stats) = analyze_petstore();

  assert_eq!(stats.schemas_analyzed, 8);
  assert_eq!(stats.synthetic_models, 2);
  assert_eq!(stats.endpoints_analyzed, 3);
  assert_eq!(stats.cycles_detected, 1);
  assert!(stats.warnings.is_empty());
}

#[test]
fn test_ir_serializes_to_json() {
  let (model, _) = analyze_petstore();
  let json = serde_json::to_value(&model).expect("serializes");

  assert_eq!(json["renderOrder"].as_array().map(Vec::len), Some(model.schemas.len()));
  assert_eq!(json["schemas"]["Dog"]["inheritance"]["kind"], "abstractBase");
  assert_eq!(json["endpoints"][0]["method"], "get");
}
