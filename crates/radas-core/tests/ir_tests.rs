use std::path::Path;

use radas_core::ir::grouping::{
    TrailingParamMatcher, group_by_namespace, has_related_get_operation, related_get_operation,
    related_list_operation,
};
use radas_core::ir::{
    HttpMethod, IrParameterLocation, IrSpec, IrType, PrimitiveKind, SchemaKind, SchemaRef,
};
use radas_core::load::{LoadOptions, load_spec};
use radas_core::transform;

fn load(name: &str) -> IrSpec {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let spec = load_spec(&path, LoadOptions::default()).expect("fixture should load");
    transform::transform(&spec)
}

#[test]
fn transform_petstore() {
    let ir = load("petstore-3.0.yaml");

    assert_eq!(ir.info.title, "Petstore");
    assert_eq!(ir.info.version, "1.2.0");
    assert_eq!(ir.servers[0].url, "https://petstore.example.com/v1");

    let ids: Vec<&str> = ir.operations.iter().map(|op| op.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "listPets",
            "createPet",
            "showPetById",
            "updatePet",
            "deletePet",
            "users_getUser"
        ]
    );

    let list = ir.operation("listPets").unwrap();
    assert_eq!(list.method, HttpMethod::Get);
    assert_eq!((list.namespace.as_str(), list.entity.as_str()), ("pets", "Pet"));
    assert_eq!(list.parameters_in(IrParameterLocation::Query).count(), 1);
    assert_eq!(list.parameters_in(IrParameterLocation::Header).count(), 1);
    assert_eq!(
        list.success_response().and_then(|r| r.schema.clone()),
        Some(SchemaRef::Inline(IrType::array(IrType::Ref("Pet".into()))))
    );
    assert_eq!(
        list.responses["default"].schema,
        Some(SchemaRef::Named("Error".into()))
    );

    let create = ir.operation("createPet").unwrap();
    let body = create.request_body.as_ref().expect("createPet has a body");
    assert!(body.required);
    assert_eq!(body.content_type, "application/json");
    assert_eq!(body.schema, SchemaRef::Named("NewPet".into()));

    let show = ir.operation("showPetById").unwrap();
    assert_eq!(show.parameters[0].name, "petId");
    assert_eq!(show.parameters[0].location, IrParameterLocation::Path);
    assert!(show.parameters[0].required);

    assert!(ir.operation("deletePet").unwrap().deprecated);
}

#[test]
fn transform_petstore_schemas() {
    let ir = load("petstore-3.0.yaml");

    let names: Vec<&str> = ir.schemas.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Pet", "NewPet", "PetStatus", "Error", "User"]);

    let pet = ir.schema("Pet").unwrap();
    assert_eq!(pet.kind, SchemaKind::Object);
    assert_eq!(pet.description.as_deref(), Some("A pet in the store."));
    assert_eq!(pet.properties["tag"].ty, IrType::string().nullable());
    assert_eq!(pet.properties["status"].ty, IrType::Ref("PetStatus".into()));
    assert!(pet.is_required("name"));
    assert!(!pet.is_required("tag"));

    let status = ir.schema("PetStatus").unwrap();
    assert_eq!(
        status.kind,
        SchemaKind::Enum(vec!["available".into(), "pending".into(), "sold".into()])
    );

    let user = ir.schema("User").unwrap();
    assert_eq!(user.namespace, "users");
    assert_eq!(user.original_name, "users_User");
    assert_eq!(
        user.properties["friends"].ty,
        IrType::array(IrType::Ref("User".into())).nullable()
    );
}

#[test]
fn transform_namespaces_and_cookie_params() {
    let ir = load("petstore-3.0.yaml");

    let user = ir.operation("users_getUser").unwrap();
    assert_eq!((user.namespace.as_str(), user.entity.as_str()), ("users", "users"));
    let session = user.parameters.iter().find(|p| p.name == "session").unwrap();
    assert_eq!(session.location, IrParameterLocation::Query);

    let index: Vec<(&str, Vec<&str>)> = ir
        .namespaces
        .iter()
        .map(|(ns, entities)| (ns.as_str(), entities.iter().map(String::as_str).collect()))
        .collect();
    assert_eq!(index, vec![("pets", vec!["Pet"]), ("users", vec!["users"])]);
}

#[test]
fn transform_openapi_31_nullability() {
    let ir = load("orders-3.1.yaml");

    let order = ir.schema("Order").unwrap();
    assert_eq!(order.properties["notes"].ty, IrType::string().nullable());
    assert_eq!(order.properties["status"].ty, IrType::string());
    assert_eq!(
        order.properties["total"].ty,
        IrType::Primitive(PrimitiveKind::Number)
    );
    assert_eq!(
        order.properties["lines"].ty,
        IrType::array(IrType::Ref("LineItem".into())).nullable()
    );
    assert_eq!(
        order.properties["assignee"].ty,
        IrType::Ref("User".into()).nullable()
    );

    let users = ir.operation("listUsers").unwrap();
    assert_eq!(
        users.success_response().and_then(|r| r.schema.clone()),
        Some(SchemaRef::Inline(
            IrType::array(IrType::Ref("User".into())).nullable()
        ))
    );

    let health = ir.operation("listHealth").expect("route-derived id");
    assert_eq!(
        health.success_response().and_then(|r| r.schema.clone()),
        Some(SchemaRef::Inline(IrType::string()))
    );
}

#[test]
fn transform_underscore_ids_without_tags() {
    let ir = load("orders-3.1.yaml");

    let item = ir.operation("items_getItem").unwrap();
    assert_eq!(item.namespace, "items");
    assert_eq!(item.entity, "items");
    assert_eq!(item.path, "/items/{id}");

    let order_ops: Vec<&str> = ir
        .operations
        .iter()
        .filter(|op| op.namespace == "orders")
        .map(|op| op.id.as_str())
        .collect();
    assert_eq!(
        order_ops,
        vec![
            "orders_listOrders",
            "orders_createOrder",
            "orders_getOrder",
            "orders_updateOrder",
            "orders_removeOrder"
        ]
    );
}

#[test]
fn related_operations_for_orders() {
    let ir = load("orders-3.1.yaml");
    let ops: Vec<_> = ir.operations.iter().collect();
    let update = ir.operation("orders_updateOrder").unwrap();

    assert!(has_related_get_operation(update, &ops));
    assert_eq!(
        related_list_operation(update, &ops, &TrailingParamMatcher).map(|op| op.path.as_str()),
        Some("/orders")
    );
    assert_eq!(
        related_get_operation(update, &ops, &TrailingParamMatcher).map(|op| op.path.as_str()),
        Some("/orders/{id}")
    );

    let health = ir.operation("listHealth").unwrap();
    assert!(!has_related_get_operation(health, &ops));
}

#[test]
fn grouping_falls_back_to_api() {
    let ir = load("orders-3.1.yaml");
    let groups = group_by_namespace(&ir.operations);
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["orders", "items", "api"]);
    assert_eq!(groups[2].operations.len(), 2);
}

#[test]
fn transform_bundled_external_refs() {
    let ir = load("external/api.yaml");
    let get = ir.operation("getPet").unwrap();
    assert_eq!(
        get.success_response().and_then(|r| r.schema.clone()),
        Some(SchemaRef::Named("pet".into()))
    );
    assert_eq!(get.responses["404"].schema, Some(SchemaRef::Named("Error".into())));
    assert_eq!(get.parameters[0].name, "id");

    let pet = ir.schema("pet").unwrap();
    assert_eq!(pet.properties["owner"].ty, IrType::Ref("Owner".into()));
}

#[test]
fn transform_empty_document() {
    let ir = load("empty.yaml");
    assert!(ir.operations.is_empty());
    assert!(ir.schemas.is_empty());
    assert!(ir.namespaces.is_empty());
}

#[test]
fn transform_sanitizes_schema_names() {
    let ir = load("quirks-3.1.yaml");

    let names: Vec<&str> = ir.schemas.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Pet_Response", "Tag"]);

    let response = ir.schema("Pet_Response").unwrap();
    assert_eq!(response.original_name, "Pet-Response");
    assert_eq!(response.namespace, "");
    assert_eq!(response.properties["tag"].ty, IrType::Ref("Tag".into()));
    assert_eq!(ir.schema("Tag").unwrap().namespace, "");

    let list = ir.operation("getThing").unwrap();
    assert_eq!(
        list.success_response().and_then(|r| r.schema.clone()),
        Some(SchemaRef::Inline(IrType::array(IrType::Ref(
            "Pet_Response".into()
        ))))
    );
}

#[test]
fn transform_boolean_schemas_to_unknown() {
    let ir = load("quirks-3.1.yaml");

    let response = ir.schema("Pet_Response").unwrap();
    assert_eq!(response.properties["meta"].ty, IrType::Unknown);
    assert!(!response.is_required("meta"));

    let legacy = ir.operation("listLegacy").unwrap();
    assert_eq!(
        legacy.success_response().and_then(|r| r.schema.clone()),
        Some(SchemaRef::Inline(IrType::Unknown))
    );
}
