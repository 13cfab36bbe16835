use heck::ToPascalCase;

use crate::ir::HttpMethod;

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character, leaving the rest untouched.
pub fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name of the store action or mutation for an operation.
///
/// Mutations get a verb prefix (`create`, `update`, `delete`) unless the id
/// already starts with it; `remove` also counts for DELETE. GET ids pass
/// through unchanged.
///
/// - `POST user` → `createUser`
/// - `POST createUser` → `createUser`
/// - `DELETE removeUser` → `removeUser`
pub fn action_name(method: HttpMethod, id: &str) -> String {
    let lower = id.to_lowercase();
    let (verb, aliases): (&str, &[&str]) = match method {
        HttpMethod::Get => return id.to_string(),
        HttpMethod::Post => ("create", &[]),
        HttpMethod::Put | HttpMethod::Patch => ("update", &[]),
        HttpMethod::Delete => ("delete", &["remove"]),
    };
    if lower.starts_with(verb) || aliases.iter().any(|a| lower.starts_with(a)) {
        id.to_string()
    } else {
        format!("{verb}{}", capitalize(id))
    }
}

/// `getUser` → `useGetUser`. Underscores survive: `items_getItem` →
/// `useItems_getItem`.
pub fn hook_name(id: &str) -> String {
    format!("use{}", capitalize(id))
}

/// `user_profiles` → `useUserProfilesStore`.
pub fn store_name(namespace: &str) -> String {
    format!("use{}Store", namespace.to_pascal_case())
}

/// Split a component key on its first `_` into `(namespace, name)`.
/// A leading `_` gives an empty namespace (`_User` → `User`); keys without
/// `_`, or with nothing after it, keep the whole key as the name.
pub fn split_schema_name(key: &str) -> (&str, &str) {
    match key.split_once('_') {
        Some((namespace, name)) if !name.is_empty() => (namespace, name),
        _ => ("", key),
    }
}

/// The TypeScript name declared for a component key: the name part of
/// [`split_schema_name`], made a valid identifier.
///
/// - `users_User` → `User`
/// - `Pet-Response` → `Pet_Response`
/// - `Page[User]` → `Page_User_`
pub fn schema_type_name(key: &str) -> String {
    sanitize_identifier(split_schema_name(key).1)
}

/// Derive a camelCase operation name from HTTP method + path.
///
/// - `GET /users` → `listUsers`
/// - `GET /users/{userId}` → `getUser`
/// - `POST /users` → `createUsers`
/// - `DELETE /users/{userId}` → `deleteUser`
/// - `GET /users/{userId}/messages/{messageId}` → `getUsersMessage`
pub fn route_to_name(method: HttpMethod, path: &str) -> String {
    let mut resource_parts: Vec<&str> = Vec::new();
    let mut ends_with_param = false;

    for seg in path.split('/').filter(|s| !s.is_empty()) {
        if seg.starts_with('{') && seg.ends_with('}') {
            ends_with_param = true;
        } else {
            resource_parts.push(seg);
            ends_with_param = false;
        }
    }

    let prefix = match method {
        HttpMethod::Get if ends_with_param => "get",
        HttpMethod::Get => "list",
        HttpMethod::Post => "create",
        HttpMethod::Put => "update",
        HttpMethod::Patch => "patch",
        HttpMethod::Delete => "delete",
    };

    let last = resource_parts.len().saturating_sub(1);
    let resource: String = resource_parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i == last && ends_with_param {
                singularize(part).to_pascal_case()
            } else {
                part.to_pascal_case()
            }
        })
        .collect();

    format!("{prefix}{resource}")
}

/// Naive singularization of a trailing plural.
fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies")
        && !stem.is_empty()
    {
        format!("{stem}y")
    } else if word.ends_with("ses") || word.ends_with("xes") || word.ends_with("zes") {
        word[..word.len() - 2].to_string()
    } else if word.ends_with('s') && !word.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Make `name` usable as a JavaScript identifier: every character outside
/// `[A-Za-z0-9_$]` becomes `_`, and a leading digit gets a `_` prefix.
pub fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 1);
    for (i, ch) in name.chars().enumerate() {
        if i == 0 && ch.is_ascii_digit() {
            result.push('_');
        }
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
            result.push(ch);
        } else {
            result.push('_');
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_name_prefixes_mutations() {
        assert_eq!(action_name(HttpMethod::Post, "user"), "createUser");
        assert_eq!(action_name(HttpMethod::Post, "createUser"), "createUser");
        assert_eq!(action_name(HttpMethod::Put, "user"), "updateUser");
        assert_eq!(action_name(HttpMethod::Patch, "UpdateUser"), "UpdateUser");
        assert_eq!(action_name(HttpMethod::Delete, "user"), "deleteUser");
        assert_eq!(action_name(HttpMethod::Delete, "removeUser"), "removeUser");
        assert_eq!(action_name(HttpMethod::Get, "listUsers"), "listUsers");
    }

    #[test]
    fn hook_and_store_names() {
        assert_eq!(hook_name("getUser"), "useGetUser");
        assert_eq!(hook_name("items_getItem"), "useItems_getItem");
        assert_eq!(store_name("users"), "useUsersStore");
        assert_eq!(store_name("user_profiles"), "useUserProfilesStore");
        assert_eq!(store_name("api"), "useApiStore");
    }

    #[test]
    fn schema_names_split_on_first_underscore() {
        assert_eq!(split_schema_name("users_User"), ("users", "User"));
        assert_eq!(split_schema_name("a_b_C"), ("a", "b_C"));
        assert_eq!(split_schema_name("User"), ("", "User"));
        assert_eq!(split_schema_name("_User"), ("", "User"));
        assert_eq!(split_schema_name("users_"), ("", "users_"));
    }

    #[test]
    fn schema_type_names_are_identifiers() {
        assert_eq!(schema_type_name("users_User"), "User");
        assert_eq!(schema_type_name("Pet-Response"), "Pet_Response");
        assert_eq!(schema_type_name("Foo.Bar"), "Foo_Bar");
        assert_eq!(schema_type_name("Page[User]"), "Page_User_");
        assert_eq!(schema_type_name("_User"), "User");
    }

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_identifier("get-user.v2"), "get_user_v2");
        assert_eq!(sanitize_identifier("3dModel"), "_3dModel");
        assert_eq!(sanitize_identifier("items_getItem"), "items_getItem");
        assert_eq!(sanitize_identifier(""), "unnamed");
    }

    #[test]
    fn route_names() {
        assert_eq!(route_to_name(HttpMethod::Get, "/users"), "listUsers");
        assert_eq!(route_to_name(HttpMethod::Post, "/users"), "createUsers");
        assert_eq!(route_to_name(HttpMethod::Get, "/users/{userId}"), "getUser");
        assert_eq!(route_to_name(HttpMethod::Put, "/users/{userId}"), "updateUser");
        assert_eq!(route_to_name(HttpMethod::Patch, "/users/{userId}"), "patchUser");
        assert_eq!(route_to_name(HttpMethod::Delete, "/categories/{id}"), "deleteCategory");
        assert_eq!(
            route_to_name(HttpMethod::Get, "/users/{userId}/messages/{messageId}"),
            "getUsersMessage"
        );
        assert_eq!(route_to_name(HttpMethod::Get, "/"), "list");
    }

    #[test]
    fn capitalization() {
        assert_eq!(capitalize("getUser"), "GetUser");
        assert_eq!(uncapitalize("GetUser"), "getUser");
        assert_eq!(capitalize(""), "");
    }
}
