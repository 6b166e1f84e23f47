use crate::heap::{Heap, ObjectId, ObjectKind};

/// A JavaScript symbol. Every symbol allocated by a [`Heap`] is unique,
/// even when two share a description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub(crate) id: u32,
    pub(crate) description: Option<String>,
}

impl Symbol {
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A JavaScript value. Objects are handles into a [`Heap`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The JavaScript `undefined` value.
    Undefined,
    /// The JavaScript `null` value.
    Null,
    /// A JavaScript boolean.
    Bool(bool),
    /// A JavaScript number (IEEE-754 double).
    Number(f64),
    /// A JavaScript bigint, stored as normalized decimal digits.
    BigInt(String),
    /// A JavaScript string.
    String(String),
    /// A JavaScript symbol.
    Symbol(Symbol),
    /// A heap-allocated JavaScript object.
    Object(ObjectId),
}

impl Value {
    /// The result of the JavaScript `typeof` operator.
    pub fn type_of(&self, heap: &Heap) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(id) => match heap.get(*id).map(|obj| obj.kind()) {
                Some(ObjectKind::Function { .. }) => "function",
                _ => "object",
            },
        }
    }

    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::Object(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// ECMAScript `SameValueZero(x, y)`, the key equality of `Map` and `Set`.
    ///
    /// `NaN` equals `NaN`, and `+0` equals `-0`.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a.id == b.id,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::Object(id)
    }
}
