use crate::types::OpaqueType;
use slicegen_value::{Heap, ObjectKind, Value};

/// Category of a runtime value, in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Null,
    Undefined,
    /// Date-like or pattern-like built-in
    Opaque(OpaqueType),
    MapLike,
    SetLike,
    ArrayLike,
    Function,
    Symbol,
    PlainObject,
    Primitive(PrimitiveKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Number,
    String,
    Boolean,
    BigInt,
}

/// Classify a value. Total: every value maps to exactly one tag.
pub fn classify(heap: &Heap, value: &Value) -> Tag {
    match value {
        Value::Null => Tag::Null,
        Value::Undefined => Tag::Undefined,
        Value::Object(id) => match heap.get(*id).map(|obj| obj.kind()) {
            Some(ObjectKind::Date(_)) => Tag::Opaque(OpaqueType::Date),
            Some(ObjectKind::RegExp { .. }) => Tag::Opaque(OpaqueType::RegExp),
            Some(ObjectKind::Map(_)) => Tag::MapLike,
            Some(ObjectKind::Set(_)) => Tag::SetLike,
            Some(ObjectKind::Array(_)) => Tag::ArrayLike,
            Some(ObjectKind::Function { .. }) => Tag::Function,
            // Dangling handles are treated as empty objects
            Some(ObjectKind::Ordinary) | None => Tag::PlainObject,
        },
        Value::Symbol(_) => Tag::Symbol,
        Value::Number(_) => Tag::Primitive(PrimitiveKind::Number),
        Value::String(_) => Tag::Primitive(PrimitiveKind::String),
        Value::Bool(_) => Tag::Primitive(PrimitiveKind::Boolean),
        Value::BigInt(_) => Tag::Primitive(PrimitiveKind::BigInt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_scalars() {
        let mut heap = Heap::new();
        let symbol = heap.alloc_symbol(None);

        assert_eq!(classify(&heap, &Value::Null), Tag::Null);
        assert_eq!(classify(&heap, &Value::Undefined), Tag::Undefined);
        assert_eq!(classify(&heap, &Value::Symbol(symbol)), Tag::Symbol);
        assert_eq!(
            classify(&heap, &Value::from("123")),
            Tag::Primitive(PrimitiveKind::String)
        );
        assert_eq!(
            classify(&heap, &Value::from(f64::NAN)),
            Tag::Primitive(PrimitiveKind::Number)
        );
        assert_eq!(
            classify(&heap, &Value::from(true)),
            Tag::Primitive(PrimitiveKind::Boolean)
        );
        assert_eq!(
            classify(&heap, &Value::BigInt("9".to_string())),
            Tag::Primitive(PrimitiveKind::BigInt)
        );
    }

    #[test]
    fn test_classify_objects() {
        let mut heap = Heap::new();
        let cases = [
            (heap.alloc_date(Some(0.0)), Tag::Opaque(OpaqueType::Date)),
            (heap.alloc_date(None), Tag::Opaque(OpaqueType::Date)),
            (heap.alloc_regexp("a", ""), Tag::Opaque(OpaqueType::RegExp)),
            (heap.alloc_map(), Tag::MapLike),
            (heap.alloc_set(), Tag::SetLike),
            (heap.alloc_array(Vec::new()), Tag::ArrayLike),
            (heap.alloc_function(None), Tag::Function),
            (heap.alloc_object(), Tag::PlainObject),
            (heap.alloc_instance("MyClass"), Tag::PlainObject),
        ];

        for (id, expected) in cases {
            assert_eq!(classify(&heap, &Value::Object(id)), expected);
        }
    }

    #[test]
    fn test_classify_dangling_handle() {
        let mut other = Heap::new();
        for _ in 0..4 {
            other.alloc_object();
        }
        let dangling = other.alloc_object();

        let heap = Heap::new();
        assert_eq!(classify(&heap, &Value::Object(dangling)), Tag::PlainObject);
    }
}
