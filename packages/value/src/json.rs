//! `JSON.stringify` semantics over a [`Heap`].

use crate::heap::{Heap, ObjectId, ObjectKind};
use crate::value::Value;
use chrono::{DateTime, SecondsFormat};
use serde_json::{Map, Number};
use thiserror::Error;

/// Integers up to 2^53 serialize without a fractional part.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JsonError {
    #[error("Converting circular structure to JSON")]
    Circular,

    #[error("Do not know how to serialize a BigInt")]
    BigInt,
}

pub type JsonResult<T> = Result<T, JsonError>;

/// Serialize a value the way `JSON.stringify` would.
///
/// Returns `Ok(None)` when the value itself is not serializable
/// (`undefined`, functions, symbols).
pub fn to_json(heap: &Heap, value: &Value) -> JsonResult<Option<serde_json::Value>> {
    Serializer {
        heap,
        stack: Vec::new(),
    }
    .serialize(value)
}

struct Serializer<'a> {
    heap: &'a Heap,
    stack: Vec<ObjectId>,
}

impl<'a> Serializer<'a> {
    fn serialize(&mut self, value: &Value) -> JsonResult<Option<serde_json::Value>> {
        let json = match value {
            Value::Undefined | Value::Symbol(_) => return Ok(None),
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::BigInt(_) => return Err(JsonError::BigInt),
            Value::Object(id) => return self.serialize_object(*id),
        };
        Ok(Some(json))
    }

    fn serialize_object(&mut self, id: ObjectId) -> JsonResult<Option<serde_json::Value>> {
        let heap = self.heap;
        let Some(obj) = heap.get(id) else {
            return Ok(Some(serde_json::Value::Object(Map::new())));
        };

        match obj.kind() {
            ObjectKind::Function { .. } => return Ok(None),
            ObjectKind::Date(time) => {
                let iso = time
                    .and_then(|t| DateTime::from_timestamp_millis(t as i64))
                    .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true));
                return Ok(Some(
                    iso.map(serde_json::Value::String)
                        .unwrap_or(serde_json::Value::Null),
                ));
            }
            _ => {}
        }

        if self.stack.contains(&id) {
            return Err(JsonError::Circular);
        }
        self.stack.push(id);

        let json = match obj.kind() {
            ObjectKind::Array(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.serialize(element)?.unwrap_or(serde_json::Value::Null));
                }
                serde_json::Value::Array(items)
            }
            _ => {
                let mut map = Map::new();
                for (key, value) in obj.entries() {
                    if let Some(json) = self.serialize(value)? {
                        map.insert(key.to_string(), json);
                    }
                }
                serde_json::Value::Object(map)
            }
        };

        self.stack.pop();
        Ok(Some(json))
    }
}

fn number(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::from(n as i64);
    }
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}
