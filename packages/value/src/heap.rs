use crate::value::{Symbol, Value};
use indexmap::IndexMap;
use thiserror::Error;

/// Largest magnitude of a valid `Date` time value, in milliseconds.
const MAX_TIME_VALUE: f64 = 8.64e15;

/// Handle to an object allocated in a [`Heap`]. Handle equality is object identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    /// The slot index within the heap.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The internal kind of a heap object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    /// Plain objects and class instances.
    Ordinary,
    Array(Vec<Value>),
    /// Entries in insertion order.
    Map(Vec<(Value, Value)>),
    /// Members in insertion order.
    Set(Vec<Value>),
    /// Time value in milliseconds since the epoch; `None` is an invalid date.
    Date(Option<f64>),
    RegExp { source: String, flags: String },
    Function { name: Option<String> },
}

#[derive(Debug, Clone)]
pub struct HeapObject {
    kind: ObjectKind,
    properties: IndexMap<String, Value>,
    class_name: Option<String>,
}

impl HeapObject {
    fn new(kind: ObjectKind, class_name: Option<String>) -> Self {
        Self {
            kind,
            properties: IndexMap::new(),
            class_name,
        }
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Name of the class this object was instantiated from, if any.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, ObjectKind::Function { .. })
    }

    /// Own enumerable string keys in ECMAScript `OwnPropertyKeys` order:
    /// array-index keys ascending, then the remaining keys in insertion order.
    pub fn own_keys(&self) -> Vec<&str> {
        let mut index_keys: Vec<(u32, &str)> = Vec::new();
        let mut string_keys: Vec<&str> = Vec::new();

        for key in self.properties.keys() {
            match array_index(key) {
                Some(idx) => index_keys.push((idx, key.as_str())),
                None => string_keys.push(key.as_str()),
            }
        }

        index_keys.sort_by_key(|(idx, _)| *idx);

        let mut out = Vec::with_capacity(index_keys.len() + string_keys.len());
        out.extend(index_keys.into_iter().map(|(_, key)| key));
        out.extend(string_keys);
        out
    }

    pub fn own_key_count(&self) -> usize {
        self.properties.len()
    }

    /// Own properties in enumeration order.
    pub fn entries(&self) -> Vec<(&str, &Value)> {
        self.own_keys()
            .into_iter()
            .filter_map(|key| self.properties.get_key_value(key))
            .map(|(key, value)| (key.as_str(), value))
            .collect()
    }
}

/// Parse a canonical array index (`0`..=`2^32 - 2`, no leading zeros).
fn array_index(key: &str) -> Option<u32> {
    let bytes = key.as_bytes();
    if bytes.is_empty() || (bytes.len() > 1 && bytes[0] == b'0') {
        return None;
    }
    let mut n: u64 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
        if n > u64::from(u32::MAX) {
            return None;
        }
    }
    if n == u64::from(u32::MAX) {
        return None;
    }
    Some(n as u32)
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeapError {
    #[error("Invalid object handle {0:?}")]
    InvalidHandle(ObjectId),

    #[error("Object is not {expected}")]
    WrongKind { expected: &'static str },

    #[error("Array index {0} exceeds the maximum array length")]
    ArrayTooLarge(usize),
}

/// Longest array a heap will grow to through element assignment
pub const MAX_ARRAY_LENGTH: usize = 1 << 20;

pub type HeapResult<T> = Result<T, HeapError>;

/// Arena holding every object of one evaluated module.
#[derive(Debug, Clone, Default)]
pub struct Heap {
    objects: Vec<HeapObject>,
    next_symbol: u32,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn alloc(&mut self, kind: ObjectKind, class_name: Option<String>) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(HeapObject::new(kind, class_name));
        id
    }

    pub fn alloc_object(&mut self) -> ObjectId {
        self.alloc(ObjectKind::Ordinary, None)
    }

    pub fn alloc_instance(&mut self, class_name: impl Into<String>) -> ObjectId {
        self.alloc(ObjectKind::Ordinary, Some(class_name.into()))
    }

    pub fn alloc_array(&mut self, elements: Vec<Value>) -> ObjectId {
        self.alloc(ObjectKind::Array(elements), None)
    }

    pub fn alloc_map(&mut self) -> ObjectId {
        self.alloc(ObjectKind::Map(Vec::new()), None)
    }

    pub fn alloc_set(&mut self) -> ObjectId {
        self.alloc(ObjectKind::Set(Vec::new()), None)
    }

    /// Allocate a `Date`. Non-finite or out-of-range times produce an invalid date,
    /// fractional milliseconds are truncated.
    pub fn alloc_date(&mut self, time: Option<f64>) -> ObjectId {
        let time = time
            .filter(|t| t.is_finite() && t.abs() <= MAX_TIME_VALUE)
            .map(|t| t.trunc() + 0.0);
        self.alloc(ObjectKind::Date(time), None)
    }

    pub fn alloc_regexp(&mut self, source: impl Into<String>, flags: impl Into<String>) -> ObjectId {
        self.alloc(
            ObjectKind::RegExp {
                source: source.into(),
                flags: flags.into(),
            },
            None,
        )
    }

    pub fn alloc_function(&mut self, name: Option<String>) -> ObjectId {
        self.alloc(ObjectKind::Function { name }, None)
    }

    pub fn alloc_symbol(&mut self, description: Option<String>) -> Symbol {
        let id = self.next_symbol;
        self.next_symbol += 1;
        Symbol { id, description }
    }

    pub fn get(&self, id: ObjectId) -> Option<&HeapObject> {
        self.objects.get(id.index())
    }

    fn get_mut(&mut self, id: ObjectId) -> HeapResult<&mut HeapObject> {
        self.objects
            .get_mut(id.index())
            .ok_or(HeapError::InvalidHandle(id))
    }

    /// Set an own property. Overwriting keeps the key's original position.
    pub fn set_property(
        &mut self,
        id: ObjectId,
        key: impl Into<String>,
        value: Value,
    ) -> HeapResult<()> {
        self.get_mut(id)?.properties.insert(key.into(), value);
        Ok(())
    }

    pub fn get_property(&self, id: ObjectId, key: &str) -> Option<&Value> {
        self.get(id).and_then(|obj| obj.property(key))
    }

    /// Own enumerable keys of an object; empty for a dangling handle.
    pub fn own_keys(&self, id: ObjectId) -> Vec<&str> {
        self.get(id).map(HeapObject::own_keys).unwrap_or_default()
    }

    pub fn array_push(&mut self, id: ObjectId, value: Value) -> HeapResult<()> {
        match &mut self.get_mut(id)?.kind {
            ObjectKind::Array(elements) => {
                elements.push(value);
                Ok(())
            }
            _ => Err(HeapError::WrongKind { expected: "an array" }),
        }
    }

    /// Assign an element, filling any gap with `undefined`.
    pub fn array_set(&mut self, id: ObjectId, index: usize, value: Value) -> HeapResult<()> {
        match &mut self.get_mut(id)?.kind {
            ObjectKind::Array(_) if index >= MAX_ARRAY_LENGTH => {
                Err(HeapError::ArrayTooLarge(index))
            }
            ObjectKind::Array(elements) => {
                if index >= elements.len() {
                    elements.resize(index + 1, Value::Undefined);
                }
                elements[index] = value;
                Ok(())
            }
            _ => Err(HeapError::WrongKind { expected: "an array" }),
        }
    }

    /// `Map.prototype.set`: an existing key (by SameValueZero) keeps its position.
    pub fn map_set(&mut self, id: ObjectId, key: Value, value: Value) -> HeapResult<()> {
        match &mut self.get_mut(id)?.kind {
            ObjectKind::Map(entries) => {
                match entries.iter_mut().find(|(k, _)| k.same_value_zero(&key)) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key, value)),
                }
                Ok(())
            }
            _ => Err(HeapError::WrongKind { expected: "a Map" }),
        }
    }

    /// `Set.prototype.add`: duplicates (by SameValueZero) are ignored.
    pub fn set_add(&mut self, id: ObjectId, value: Value) -> HeapResult<()> {
        match &mut self.get_mut(id)?.kind {
            ObjectKind::Set(members) => {
                if !members.iter().any(|m| m.same_value_zero(&value)) {
                    members.push(value);
                }
                Ok(())
            }
            _ => Err(HeapError::WrongKind { expected: "a Set" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_keys_orders_array_indices_first() {
        let mut heap = Heap::new();
        let obj = heap.alloc_object();
        heap.set_property(obj, "b", Value::from(1)).unwrap();
        heap.set_property(obj, "10", Value::from(2)).unwrap();
        heap.set_property(obj, "a", Value::from(3)).unwrap();
        heap.set_property(obj, "2", Value::from(4)).unwrap();
        heap.set_property(obj, "01", Value::from(5)).unwrap();

        assert_eq!(heap.own_keys(obj), vec!["2", "10", "b", "a", "01"]);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut heap = Heap::new();
        let obj = heap.alloc_object();
        heap.set_property(obj, "first", Value::from(1)).unwrap();
        heap.set_property(obj, "second", Value::from(2)).unwrap();
        heap.set_property(obj, "first", Value::from("changed")).unwrap();

        let entries = heap.get(obj).unwrap().entries();
        assert_eq!(entries[0], ("first", &Value::from("changed")));
        assert_eq!(entries[1].0, "second");
    }

    #[test]
    fn test_array_index_bounds() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("4294967294"), Some(u32::MAX - 1));
        assert_eq!(array_index("4294967295"), None);
        assert_eq!(array_index("007"), None);
        assert_eq!(array_index("-1"), None);
        assert_eq!(array_index(""), None);
    }

    #[test]
    fn test_map_set_overwrites_same_key() {
        let mut heap = Heap::new();
        let map = heap.alloc_map();
        heap.map_set(map, Value::from("a"), Value::from(1)).unwrap();
        heap.map_set(map, Value::from(f64::NAN), Value::from(2)).unwrap();
        heap.map_set(map, Value::from("a"), Value::from(3)).unwrap();
        heap.map_set(map, Value::from(f64::NAN), Value::from(4)).unwrap();

        match heap.get(map).unwrap().kind() {
            ObjectKind::Map(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].1, Value::from(3));
                assert_eq!(entries[1].1, Value::from(4));
            }
            other => panic!("Expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_set_add_dedupes() {
        let mut heap = Heap::new();
        let set = heap.alloc_set();
        let obj = heap.alloc_object();
        for value in [Value::from(1), Value::from(1), Value::Object(obj), Value::Object(obj)] {
            heap.set_add(set, value).unwrap();
        }

        match heap.get(set).unwrap().kind() {
            ObjectKind::Set(members) => assert_eq!(members.len(), 2),
            other => panic!("Expected set, got {:?}", other),
        }
    }

    #[test]
    fn test_array_set_fills_holes() {
        let mut heap = Heap::new();
        let arr = heap.alloc_array(vec![Value::from(1)]);
        heap.array_set(arr, 3, Value::from(4)).unwrap();

        match heap.get(arr).unwrap().kind() {
            ObjectKind::Array(elements) => {
                assert_eq!(
                    elements,
                    &vec![Value::from(1), Value::Undefined, Value::Undefined, Value::from(4)]
                );
            }
            other => panic!("Expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_array_set_rejects_huge_index() {
        let mut heap = Heap::new();
        let arr = heap.alloc_array(Vec::new());

        assert_eq!(
            heap.array_set(arr, 4_000_000_000, Value::from(1)),
            Err(HeapError::ArrayTooLarge(4_000_000_000))
        );
        assert_eq!(
            heap.array_set(arr, MAX_ARRAY_LENGTH, Value::from(1)),
            Err(HeapError::ArrayTooLarge(MAX_ARRAY_LENGTH))
        );
    }

    #[test]
    fn test_wrong_kind_errors() {
        let mut heap = Heap::new();
        let obj = heap.alloc_object();
        assert_eq!(
            heap.array_push(obj, Value::Null),
            Err(HeapError::WrongKind { expected: "an array" })
        );
        assert_eq!(
            heap.set_add(obj, Value::Null),
            Err(HeapError::WrongKind { expected: "a Set" })
        );
    }

    #[test]
    fn test_invalid_dates() {
        let mut heap = Heap::new();
        let invalid = heap.alloc_date(Some(f64::NAN));
        let too_far = heap.alloc_date(Some(9e15));
        let valid = heap.alloc_date(Some(1.7));

        assert_eq!(heap.get(invalid).unwrap().kind(), &ObjectKind::Date(None));
        assert_eq!(heap.get(too_far).unwrap().kind(), &ObjectKind::Date(None));
        assert_eq!(heap.get(valid).unwrap().kind(), &ObjectKind::Date(Some(1.0)));
    }
}
