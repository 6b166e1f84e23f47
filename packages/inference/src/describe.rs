use slicegen_value::{Heap, ObjectKind, Value};

/// One-line summary of a value's kind for generated doc comments.
///
/// Looks at the top level only; nested values are never inspected.
pub fn describe(heap: &Heap, value: &Value) -> String {
    match value {
        Value::Null => "Nullable value".to_string(),
        Value::Undefined => "Undefined value".to_string(),
        Value::Object(id) => match heap.get(*id) {
            Some(obj) => match obj.kind() {
                ObjectKind::Array(elements) => {
                    format!("Array with {} initial items", elements.len())
                }
                ObjectKind::Function { .. } => "function value".to_string(),
                _ => format!("Object with {} properties", obj.own_key_count()),
            },
            None => "Object with 0 properties".to_string(),
        },
        other => format!("{} value", other.type_of(heap)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicegen_parser::parse_value;

    fn describe_source(source: &str) -> String {
        let (heap, value) = parse_value(source).unwrap();
        describe(&heap, &value)
    }

    #[test]
    fn test_describe_nullish() {
        assert_eq!(describe_source("null"), "Nullable value");
        assert_eq!(describe_source("undefined"), "Undefined value");
    }

    #[test]
    fn test_describe_arrays() {
        assert_eq!(describe_source("[1, 2, 3]"), "Array with 3 initial items");
        assert_eq!(describe_source("[]"), "Array with 0 initial items");
    }

    #[test]
    fn test_describe_objects() {
        assert_eq!(describe_source("{ a: 1, b: 2 }"), "Object with 2 properties");
        assert_eq!(describe_source("{}"), "Object with 0 properties");
        assert_eq!(
            describe_source("{ nested: { deep: { x: 1 } } }"),
            "Object with 1 properties"
        );
        assert_eq!(describe_source("new Map([['a', 1]])"), "Object with 0 properties");
        assert_eq!(describe_source("new Date(0)"), "Object with 0 properties");
    }

    #[test]
    fn test_describe_primitives() {
        assert_eq!(describe_source("42"), "number value");
        assert_eq!(describe_source("'text'"), "string value");
        assert_eq!(describe_source("false"), "boolean value");
        assert_eq!(describe_source("Symbol()"), "symbol value");
        assert_eq!(describe_source("1n"), "bigint value");
        assert_eq!(describe_source("() => {}"), "function value");
    }
}
