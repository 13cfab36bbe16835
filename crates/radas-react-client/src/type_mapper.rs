use radas_core::ir::{IrType, PrimitiveKind};

/// Where a TypeScript annotation is rendered. Outside `dto.ts`, schema
/// names are qualified with the `DTO` namespace import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Dto,
    Client,
}

/// How references to component validators are emitted. Declarations may
/// refer to schemas declared later in the file (or to themselves), so they
/// go through `z.lazy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefMode {
    Direct,
    Lazy,
}

/// Maps IR type descriptors to zod validator expressions and TypeScript
/// annotations. Never fails: unmapped shapes become `z.any()` / `any`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeMapper;

impl TypeMapper {
    pub fn validator(&self, ty: &IrType, refs: RefMode) -> String {
        match ty {
            IrType::Primitive(kind) => match kind {
                PrimitiveKind::String => "z.string()".to_string(),
                PrimitiveKind::Number | PrimitiveKind::Integer => "z.number()".to_string(),
                PrimitiveKind::Boolean => "z.boolean()".to_string(),
                PrimitiveKind::Object => "z.record(z.string(), z.any())".to_string(),
                PrimitiveKind::Null => "z.null()".to_string(),
            },
            IrType::Array(item) => format!("z.array({})", self.validator(item, refs)),
            IrType::Nullable(base) => format!("{}.nullable()", self.validator(base, refs)),
            IrType::Ref(name) => match refs {
                RefMode::Direct => schema_const(name),
                RefMode::Lazy => format!("z.lazy(() => {})", schema_const(name)),
            },
            IrType::Unknown => "z.any()".to_string(),
        }
    }

    pub fn annotation(&self, ty: &IrType, scope: Scope) -> String {
        match ty {
            IrType::Primitive(kind) => match kind {
                PrimitiveKind::String => "string".to_string(),
                PrimitiveKind::Number | PrimitiveKind::Integer => "number".to_string(),
                PrimitiveKind::Boolean => "boolean".to_string(),
                PrimitiveKind::Object => "Record<string, any>".to_string(),
                PrimitiveKind::Null => "null".to_string(),
            },
            IrType::Array(item) => {
                let inner = self.annotation(item, scope);
                if inner.contains('|') {
                    format!("({inner})[]")
                } else {
                    format!("{inner}[]")
                }
            }
            IrType::Nullable(base) => format!("{} | null", self.annotation(base, scope)),
            IrType::Ref(name) => match scope {
                Scope::Dto => name.clone(),
                Scope::Client => format!("DTO.{name}"),
            },
            IrType::Unknown => "any".to_string(),
        }
    }
}

/// Name of the exported validator constant for a schema.
pub fn schema_const(name: &str) -> String {
    format!("{name}Schema")
}
