use radas_core::ir::HttpMethod;
use radas_core::transform::name_normalizer::{
    action_name, hook_name, route_to_name, sanitize_identifier, store_name,
};

#[test]
fn action_names_follow_http_verbs() {
    assert_eq!(action_name(HttpMethod::Post, "user"), "createUser");
    assert_eq!(action_name(HttpMethod::Post, "createUser"), "createUser");
    assert_eq!(action_name(HttpMethod::Delete, "removeUser"), "removeUser");
    assert_eq!(action_name(HttpMethod::Delete, "user"), "deleteUser");
    assert_eq!(action_name(HttpMethod::Patch, "order"), "updateOrder");
    assert_eq!(action_name(HttpMethod::Get, "order"), "order");
}

#[test]
fn action_name_prefix_check_is_case_insensitive() {
    assert_eq!(action_name(HttpMethod::Post, "CreateUser"), "CreateUser");
    assert_eq!(action_name(HttpMethod::Delete, "RemoveUser"), "RemoveUser");
    assert_eq!(action_name(HttpMethod::Put, "UPDATE_user"), "UPDATE_user");
}

#[test]
fn names_for_generated_code() {
    assert_eq!(hook_name("items_getItem"), "useItems_getItem");
    assert_eq!(hook_name("listPets"), "useListPets");
    assert_eq!(store_name("pets"), "usePetsStore");
    assert_eq!(sanitize_identifier("pets.list-all"), "pets_list_all");
}

#[test]
fn route_names_singularize_items() {
    assert_eq!(route_to_name(HttpMethod::Get, "/pets/{petId}"), "getPet");
    assert_eq!(route_to_name(HttpMethod::Get, "/pets"), "listPets");
    assert_eq!(route_to_name(HttpMethod::Delete, "/boxes/{id}"), "deleteBox");
    assert_eq!(
        route_to_name(HttpMethod::Put, "/user-profiles/{id}"),
        "updateUserProfile"
    );
}
