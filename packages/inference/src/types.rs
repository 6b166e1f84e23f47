use indexmap::IndexMap;
use slicegen_common::is_identifier;
use std::borrow::Cow;
use std::fmt;

/// Structural type descriptor derived from a runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(PrimitiveType),

    /// Built-ins whose internals are not expanded
    Opaque(OpaqueType),

    /// Ordered sequence over the union of its element types
    Array(Union),

    Map(Union, Union),

    Set(Union),

    Object(ObjectType),

    /// Stands in for a reference back into the structure being described
    Circular,

    /// Nesting deeper than the configured limit
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Number,
    String,
    Boolean,
    BigInt,
    Symbol,
    Undefined,
    Null,
}

impl PrimitiveType {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Number => "number",
            PrimitiveType::String => "string",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::BigInt => "bigint",
            PrimitiveType::Symbol => "symbol",
            PrimitiveType::Undefined => "undefined",
            PrimitiveType::Null => "null",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpaqueType {
    Date,
    RegExp,
    Function,
}

impl OpaqueType {
    pub fn name(self) -> &'static str {
        match self {
            OpaqueType::Date => "Date",
            OpaqueType::RegExp => "RegExp",
            OpaqueType::Function => "Function",
        }
    }
}

/// Object shape with fields in the source object's enumeration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectType {
    pub fields: Vec<(String, Type)>,
}

impl ObjectType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, type_: Type) -> Self {
        self.fields.push((name.into(), type_));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Insertion-ordered set of alternatives, deduplicated by rendered text.
///
/// Two different types that render identically collapse into one member.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Union {
    members: IndexMap<String, Type>,
}

impl Union {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member unless one with the same rendering is already present
    pub fn insert(&mut self, type_: Type) -> bool {
        let key = type_.to_string();
        if self.members.contains_key(&key) {
            return false;
        }
        self.members.insert(key, type_);
        true
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> impl Iterator<Item = &Type> {
        self.members.values()
    }
}

impl FromIterator<Type> for Union {
    fn from_iter<I: IntoIterator<Item = Type>>(iter: I) -> Self {
        let mut union = Union::new();
        for type_ in iter {
            union.insert(type_);
        }
        union
    }
}

impl fmt::Display for Union {
    /// `any` when empty, the bare member when alone, else `(A | B)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered = self.members.keys();
        match self.members.len() {
            0 => f.write_str("any"),
            1 => f.write_str(rendered.next().map(String::as_str).unwrap_or("any")),
            _ => {
                f.write_str("(")?;
                for (idx, member) in rendered.enumerate() {
                    if idx > 0 {
                        f.write_str(" | ")?;
                    }
                    f.write_str(member)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(primitive) => f.write_str(primitive.name()),
            Type::Opaque(opaque) => f.write_str(opaque.name()),
            Type::Array(elements) => write!(f, "{}[]", elements),
            Type::Map(keys, values) => write!(f, "Map<{}, {}>", keys, values),
            Type::Set(elements) => write!(f, "Set<{}>", elements),
            Type::Object(object) if object.is_empty() => f.write_str("Record<string, any>"),
            Type::Object(object) => {
                f.write_str("{ ")?;
                for (name, type_) in &object.fields {
                    write!(f, "{}: {}; ", property_key(name), type_)?;
                }
                f.write_str("}")
            }
            Type::Circular => f.write_str("any /* circular */"),
            Type::Any => f.write_str("any"),
        }
    }
}

/// Property name as written in a type literal: identifiers and canonical
/// numbers bare, anything else quoted
pub fn property_key(name: &str) -> Cow<'_, str> {
    if is_identifier(name) || is_numeric_key(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{:?}", name))
    }
}

fn is_numeric_key(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_digit())
        && (name.len() == 1 || !name.starts_with('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_dedup_preserves_first_occurrence() {
        let union: Union = vec![
            Type::Primitive(PrimitiveType::Number),
            Type::Primitive(PrimitiveType::String),
            Type::Primitive(PrimitiveType::Number),
        ]
        .into_iter()
        .collect();

        assert_eq!(union.len(), 2);
        assert_eq!(union.to_string(), "(number | string)");
    }

    #[test]
    fn test_union_rendering() {
        assert_eq!(Union::new().to_string(), "any");

        let single: Union = std::iter::once(Type::Opaque(OpaqueType::Date)).collect();
        assert_eq!(single.to_string(), "Date");
    }

    #[test]
    fn test_union_dedups_by_text() {
        // Structurally distinct, identical rendering
        let empty = Type::Array(Union::new());
        let of_any = Type::Array(std::iter::once(Type::Any).collect());
        assert_ne!(empty, of_any);

        let mut union = Union::new();
        assert!(union.insert(empty));
        assert!(!union.insert(of_any));
        assert_eq!(union.len(), 1);
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(Type::Array(Union::new()).to_string(), "any[]");
        assert_eq!(Type::Map(Union::new(), Union::new()).to_string(), "Map<any, any>");
        assert_eq!(Type::Set(Union::new()).to_string(), "Set<any>");
        assert_eq!(Type::Object(ObjectType::new()).to_string(), "Record<string, any>");
    }

    #[test]
    fn test_object_rendering() {
        let object = ObjectType::new()
            .with_field("name", Type::Primitive(PrimitiveType::String))
            .with_field("age", Type::Primitive(PrimitiveType::Number));

        assert_eq!(
            Type::Object(object).to_string(),
            "{ name: string; age: number; }"
        );
    }

    #[test]
    fn test_non_identifier_keys_are_quoted() {
        let object = ObjectType::new()
            .with_field("first-name", Type::Primitive(PrimitiveType::String))
            .with_field("0", Type::Primitive(PrimitiveType::Boolean))
            .with_field("$ref", Type::Primitive(PrimitiveType::Null));

        assert_eq!(
            Type::Object(object).to_string(),
            "{ \"first-name\": string; 0: boolean; $ref: null; }"
        );
    }

    #[test]
    fn test_heterogeneous_array() {
        let elements: Union = vec![
            Type::Primitive(PrimitiveType::Number),
            Type::Primitive(PrimitiveType::String),
        ]
        .into_iter()
        .collect();

        assert_eq!(Type::Array(elements).to_string(), "(number | string)[]");
    }

    #[test]
    fn test_circular_marker() {
        assert_eq!(Type::Circular.to_string(), "any /* circular */");
    }
}
