use indexmap::IndexMap;

use crate::ir::{IrProperty, IrSchema, IrType, PrimitiveKind, SchemaKind, SchemaRef};
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaType};
use crate::parse::spec::OpenApiSpec;

use super::name_normalizer::{schema_type_name, split_schema_name};

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Converts document schemas into IR descriptors.
///
/// Borrows the component schemas so references can be checked against them
/// and `allOf` members merged. Never fails: anything without a mapping rule
/// becomes [`IrType::Unknown`].
pub struct SchemaResolver<'a> {
    components: Option<&'a IndexMap<String, SchemaOrRef>>,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self {
            components: spec.components.as_ref().map(|c| &c.schemas),
        }
    }

    /// Look up a component by its key, following component-to-component
    /// references. `None` when the key is missing or the chain cycles.
    fn component(&self, key: &str) -> Option<&'a Schema> {
        let components = self.components?;
        let mut current = key;
        for _ in 0..=components.len() {
            match components.get(current)? {
                SchemaOrRef::Schema(schema) => return Some(schema),
                SchemaOrRef::Ref { ref_path } => current = ref_path.strip_prefix(SCHEMA_REF_PREFIX)?,
                SchemaOrRef::Bool(_) => return None,
            }
        }
        None
    }

    fn has_component(&self, key: &str) -> bool {
        self.components.is_some_and(|c| c.contains_key(key))
    }

    /// The generated name for a `#/components/schemas/*` reference, if the
    /// target exists. Logs and returns `None` otherwise.
    fn ref_name(&self, ref_path: &str) -> Option<String> {
        let Some(key) = ref_path.strip_prefix(SCHEMA_REF_PREFIX) else {
            log::warn!("schema reference {ref_path} is not a local component; typing it as any");
            return None;
        };
        if !self.has_component(key) {
            log::warn!("schema reference {ref_path} does not resolve; typing it as any");
            return None;
        }
        Some(schema_type_name(key))
    }

    /// Request/response schema: named when it points at a component.
    pub fn schema_ref(&self, schema_or_ref: &SchemaOrRef) -> SchemaRef {
        match schema_or_ref {
            SchemaOrRef::Ref { ref_path } => match self.ref_name(ref_path) {
                Some(name) => SchemaRef::Named(name),
                None => SchemaRef::Inline(IrType::Unknown),
            },
            SchemaOrRef::Schema(schema) => SchemaRef::Inline(self.schema_type(schema)),
            SchemaOrRef::Bool(_) => SchemaRef::Inline(IrType::Unknown),
        }
    }

    pub fn ir_type(&self, schema_or_ref: &SchemaOrRef) -> IrType {
        match schema_or_ref {
            SchemaOrRef::Ref { ref_path } => match self.ref_name(ref_path) {
                Some(name) => IrType::Ref(name),
                None => IrType::Unknown,
            },
            SchemaOrRef::Schema(schema) => self.schema_type(schema),
            SchemaOrRef::Bool(_) => IrType::Unknown,
        }
    }

    pub fn schema_type(&self, schema: &Schema) -> IrType {
        let base = self.base_type(schema);
        if schema.is_nullable() {
            base.nullable()
        } else {
            base
        }
    }

    fn base_type(&self, schema: &Schema) -> IrType {
        let variants = if schema.one_of.is_empty() {
            &schema.any_of
        } else {
            &schema.one_of
        };
        if !variants.is_empty() {
            return self.union_type(variants);
        }

        if let [only] = schema.all_of.as_slice() {
            return self.ir_type(only);
        }
        if !schema.all_of.is_empty() {
            return IrType::Primitive(PrimitiveKind::Object);
        }

        if !schema.enum_values.is_empty() && schema.schema_type.is_none() {
            return enum_type(&schema.enum_values);
        }

        let Some(types) = &schema.schema_type else {
            if !schema.properties.is_empty() || schema.additional_properties.is_some() {
                return IrType::Primitive(PrimitiveKind::Object);
            }
            if let Some(items) = &schema.items {
                return IrType::array(self.ir_type(items));
            }
            return IrType::Unknown;
        };

        match types.non_null().as_slice() {
            [] => IrType::Primitive(PrimitiveKind::Null),
            [single] => self.typed(*single, schema),
            _ => IrType::Unknown,
        }
    }

    fn typed(&self, ty: SchemaType, schema: &Schema) -> IrType {
        match ty {
            SchemaType::String => IrType::string(),
            SchemaType::Number => IrType::Primitive(PrimitiveKind::Number),
            SchemaType::Integer => IrType::Primitive(PrimitiveKind::Integer),
            SchemaType::Boolean => IrType::Primitive(PrimitiveKind::Boolean),
            SchemaType::Object => IrType::Primitive(PrimitiveKind::Object),
            SchemaType::Null => IrType::Primitive(PrimitiveKind::Null),
            SchemaType::Array => match &schema.items {
                Some(items) => IrType::array(self.ir_type(items)),
                None => IrType::array(IrType::Unknown),
            },
            SchemaType::Unknown => IrType::Unknown,
        }
    }

    /// `oneOf`/`anyOf`: a single non-null member, optionally alongside
    /// `{type: null}`, maps to that member; wider unions are `Unknown`.
    fn union_type(&self, variants: &[SchemaOrRef]) -> IrType {
        let mut has_null = false;
        let mut members = Vec::new();
        for variant in variants {
            if is_null_schema(variant) {
                has_null = true;
            } else {
                members.push(variant);
            }
        }
        let base = match members.as_slice() {
            [] if has_null => return IrType::Primitive(PrimitiveKind::Null),
            [only] => self.ir_type(only),
            _ => IrType::Unknown,
        };
        if has_null { base.nullable() } else { base }
    }

    /// Build the IR for the component stored under `key`.
    pub fn ir_schema(&self, key: &str, schema_or_ref: &SchemaOrRef) -> IrSchema {
        let (namespace, _) = split_schema_name(key);
        let mut ir = IrSchema {
            name: schema_type_name(key),
            original_name: key.to_string(),
            namespace: namespace.to_string(),
            description: None,
            kind: SchemaKind::Object,
            properties: IndexMap::new(),
            required: Vec::new(),
        };

        let schema = match schema_or_ref {
            SchemaOrRef::Ref { .. } | SchemaOrRef::Bool(_) => {
                ir.kind = SchemaKind::Alias(self.ir_type(schema_or_ref));
                return ir;
            }
            SchemaOrRef::Schema(schema) => schema,
        };
        ir.description = schema.description.clone();

        if let Some(values) = string_enum(&schema.enum_values) {
            ir.kind = SchemaKind::Enum(values);
            return ir;
        }

        if schema.properties.is_empty() && schema.all_of.is_empty() {
            ir.kind = SchemaKind::Alias(self.schema_type(schema));
            return ir;
        }

        let mut seen = vec![key.to_string()];
        self.merge_object(schema, &mut ir.properties, &mut ir.required, &mut seen);
        ir
    }

    /// Flatten `allOf` members and own properties into one property map.
    /// Later declarations override earlier ones with the same key.
    fn merge_object(
        &self,
        schema: &Schema,
        properties: &mut IndexMap<String, IrProperty>,
        required: &mut Vec<String>,
        seen: &mut Vec<String>,
    ) {
        for part in &schema.all_of {
            match part {
                SchemaOrRef::Ref { ref_path } => {
                    let Some(key) = ref_path.strip_prefix(SCHEMA_REF_PREFIX) else {
                        continue;
                    };
                    if seen.iter().any(|s| s == key) {
                        continue;
                    }
                    seen.push(key.to_string());
                    match self.component(key) {
                        Some(target) => self.merge_object(target, properties, required, seen),
                        None => log::warn!("allOf member {ref_path} does not resolve; skipping it"),
                    }
                }
                SchemaOrRef::Schema(inner) => self.merge_object(inner, properties, required, seen),
                SchemaOrRef::Bool(_) => {}
            }
        }

        for (name, prop) in &schema.properties {
            let description = match prop {
                SchemaOrRef::Schema(s) => s.description.clone(),
                SchemaOrRef::Ref { .. } | SchemaOrRef::Bool(_) => None,
            };
            properties.insert(
                name.clone(),
                IrProperty {
                    ty: self.ir_type(prop),
                    description,
                },
            );
        }
        for name in &schema.required {
            if !required.contains(name) {
                required.push(name.clone());
            }
        }
        if let Some(AdditionalProperties::Schema(_)) = &schema.additional_properties {
            log::debug!("additionalProperties schema is not modelled; extra keys pass through");
        }
    }
}

fn is_null_schema(schema_or_ref: &SchemaOrRef) -> bool {
    match schema_or_ref {
        SchemaOrRef::Schema(s) => s
            .schema_type
            .as_ref()
            .is_some_and(|t| t.includes_null() && t.non_null().is_empty()),
        SchemaOrRef::Ref { .. } | SchemaOrRef::Bool(_) => false,
    }
}

/// All-string enum values, or `None` when any value is not a string.
fn string_enum(values: &[serde_json::Value]) -> Option<Vec<String>> {
    if values.is_empty() {
        return None;
    }
    values
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn enum_type(values: &[serde_json::Value]) -> IrType {
    if values.iter().all(|v| v.is_string()) {
        IrType::string()
    } else if values.iter().all(|v| v.is_number()) {
        IrType::Primitive(PrimitiveKind::Number)
    } else if values.iter().all(|v| v.is_boolean()) {
        IrType::Primitive(PrimitiveKind::Boolean)
    } else {
        IrType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn spec(yaml: &str) -> OpenApiSpec {
        parse::from_yaml(yaml).unwrap()
    }

    const DOC: &str = r#"
openapi: 3.1.0
info: {title: t, version: '1'}
paths: {}
components:
  schemas:
    users_User:
      type: object
      description: A user.
      required: [id]
      properties:
        id: {type: string}
        tags: {type: [array, 'null'], items: {type: string}}
        manager:
          oneOf:
            - $ref: '#/components/schemas/users_User'
            - type: 'null'
    Status:
      type: string
      enum: [active, disabled]
    Slug:
      type: string
    Admin:
      allOf:
        - $ref: '#/components/schemas/users_User'
        - type: object
          required: [level]
          properties:
            level: {type: integer}
"#;

    #[test]
    fn maps_nullable_forms() {
        let doc = spec(DOC);
        let resolver = SchemaResolver::new(&doc);
        let user = resolver.ir_schema("users_User", &doc.components.as_ref().unwrap().schemas["users_User"]);

        assert_eq!(user.name, "User");
        assert_eq!(user.namespace, "users");
        assert_eq!(user.description.as_deref(), Some("A user."));
        assert_eq!(
            user.properties["tags"].ty,
            IrType::array(IrType::string()).nullable()
        );
        assert_eq!(
            user.properties["manager"].ty,
            IrType::Ref("User".into()).nullable()
        );
    }

    #[test]
    fn enums_aliases_and_all_of() {
        let doc = spec(DOC);
        let schemas = &doc.components.as_ref().unwrap().schemas;
        let resolver = SchemaResolver::new(&doc);

        let status = resolver.ir_schema("Status", &schemas["Status"]);
        assert_eq!(
            status.kind,
            SchemaKind::Enum(vec!["active".into(), "disabled".into()])
        );

        let slug = resolver.ir_schema("Slug", &schemas["Slug"]);
        assert_eq!(slug.kind, SchemaKind::Alias(IrType::string()));

        let admin = resolver.ir_schema("Admin", &schemas["Admin"]);
        assert_eq!(admin.kind, SchemaKind::Object);
        let keys: Vec<&str> = admin.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "tags", "manager", "level"]);
        assert_eq!(admin.required, vec!["id", "level"]);
    }

    #[test]
    fn unresolved_refs_degrade_to_unknown() {
        let doc = spec(DOC);
        let resolver = SchemaResolver::new(&doc);
        let missing = SchemaOrRef::Ref {
            ref_path: "#/components/schemas/Nope".into(),
        };
        assert_eq!(resolver.ir_type(&missing), IrType::Unknown);
        assert_eq!(resolver.schema_ref(&missing), SchemaRef::Inline(IrType::Unknown));

        let remote = SchemaOrRef::Ref {
            ref_path: "https://example.com/schemas.json#/Pet".into(),
        };
        assert_eq!(resolver.ir_type(&remote), IrType::Unknown);
    }

    #[test]
    fn wide_unions_are_unknown() {
        let doc = spec(DOC);
        let resolver = SchemaResolver::new(&doc);
        let schema: Schema =
            serde_yaml_ng::from_str("oneOf: [{type: string}, {type: integer}]").unwrap();
        assert_eq!(resolver.schema_type(&schema), IrType::Unknown);
    }
}
