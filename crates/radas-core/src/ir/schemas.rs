use indexmap::IndexMap;

/// Coarse primitive kinds a descriptor can bottom out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Integer,
    Boolean,
    /// An open object with no declared properties.
    Object,
    Null,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Object => "object",
            PrimitiveKind::Null => "null",
        }
    }
}

/// A property or parameter type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrType {
    Primitive(PrimitiveKind),
    Array(Box<IrType>),
    Nullable(Box<IrType>),
    /// Reference to a component schema by its generated (bare) name.
    Ref(String),
    /// Anything the mapper has no rule for.
    Unknown,
}

impl IrType {
    pub fn string() -> Self {
        IrType::Primitive(PrimitiveKind::String)
    }

    pub fn array(item: IrType) -> Self {
        IrType::Array(Box::new(item))
    }

    /// Wrap in `Nullable` unless the type already admits null.
    pub fn nullable(self) -> Self {
        match self {
            IrType::Nullable(_) | IrType::Unknown | IrType::Primitive(PrimitiveKind::Null) => self,
            other => IrType::Nullable(Box::new(other)),
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, IrType::Nullable(_))
    }

    /// Names of every component schema this descriptor points at.
    pub fn collect_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            IrType::Ref(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            IrType::Array(inner) | IrType::Nullable(inner) => inner.collect_refs(out),
            IrType::Primitive(_) | IrType::Unknown => {}
        }
    }
}

/// A request or response schema: either a named component or an inline
/// descriptor. Kept typed until the final render step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaRef {
    Named(String),
    Inline(IrType),
}

impl SchemaRef {
    /// The descriptor equivalent of this reference.
    pub fn to_type(&self) -> IrType {
        match self {
            SchemaRef::Named(name) => IrType::Ref(name.clone()),
            SchemaRef::Inline(ty) => ty.clone(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            SchemaRef::Named(name) => Some(name),
            SchemaRef::Inline(_) => None,
        }
    }
}

/// What shape a component schema renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
    /// An object with declared properties.
    Object,
    /// A string enumeration.
    Enum(Vec<String>),
    /// Anything else, rendered as a type alias of the descriptor.
    Alias(IrType),
}

impl SchemaKind {
    /// Coarse type tag for summaries.
    pub fn tag(&self) -> &'static str {
        match self {
            SchemaKind::Object => "object",
            SchemaKind::Enum(_) => "enum",
            SchemaKind::Alias(_) => "alias",
        }
    }
}

/// One declared property of an object schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrProperty {
    pub ty: IrType,
    pub description: Option<String>,
}

/// A named, reusable schema from `components.schemas`.
#[derive(Debug, Clone)]
pub struct IrSchema {
    /// Bare name, with any `namespace_` prefix removed.
    pub name: String,
    /// The component key as written in the document.
    pub original_name: String,
    pub namespace: String,
    pub description: Option<String>,
    pub kind: SchemaKind,
    pub properties: IndexMap<String, IrProperty>,
    /// Required property names, verbatim from the document.
    pub required: Vec<String>,
}

impl IrSchema {
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }

    /// Properties sorted by key, the order they are rendered in.
    pub fn sorted_properties(&self) -> Vec<(&String, &IrProperty)> {
        let mut props: Vec<_> = self.properties.iter().collect();
        props.sort_by(|a, b| a.0.cmp(b.0));
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_does_not_double_wrap() {
        let ty = IrType::string().nullable().nullable();
        assert_eq!(ty, IrType::Nullable(Box::new(IrType::string())));
        assert_eq!(IrType::Unknown.nullable(), IrType::Unknown);
    }

    #[test]
    fn collect_refs_dedupes() {
        let ty = IrType::array(IrType::Ref("User".into()).nullable());
        let mut refs = Vec::new();
        ty.collect_refs(&mut refs);
        ty.collect_refs(&mut refs);
        assert_eq!(refs, vec!["User"]);
    }
}
