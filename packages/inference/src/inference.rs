use crate::classify::{classify, PrimitiveKind, Tag};
use crate::describe::describe;
use crate::options::{CycleGuard, InferenceOptions};
use crate::types::{ObjectType, OpaqueType, PrimitiveType, Type, Union};
use slicegen_value::{Heap, ObjectId, ObjectKind, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A top-level field with its inferred type and doc description
#[derive(Debug, Clone, PartialEq)]
pub struct InferredField {
    pub name: String,
    pub type_: Type,
    pub description: String,
}

/// Structural type inference over heap values
pub struct InferenceEngine {
    options: InferenceOptions,
}

impl InferenceEngine {
    /// Create a new inference engine with the given options
    pub fn new(options: InferenceOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &InferenceOptions {
        &self.options
    }

    /// Render the type descriptor of a value
    pub fn infer(&self, heap: &Heap, value: &Value) -> String {
        self.infer_type(heap, value).to_string()
    }

    /// Infer the structural type of a value.
    ///
    /// Each call owns a fresh cycle guard, so repeated calls on an unchanged
    /// value produce identical results.
    pub fn infer_type(&self, heap: &Heap, value: &Value) -> Type {
        let mut walker = Walker {
            heap,
            options: &self.options,
            entered: HashSet::new(),
            depth_exceeded: false,
        };
        walker.walk(value, 0)
    }

    /// Infer every top-level field of a state object, in order
    pub fn infer_fields<'v>(
        &self,
        heap: &Heap,
        fields: impl IntoIterator<Item = (&'v str, &'v Value)>,
    ) -> Vec<InferredField> {
        fields
            .into_iter()
            .map(|(name, value)| {
                let type_ = self.infer_type(heap, value);
                debug!(field = name, type_ = %type_, "Inferred field type");
                InferredField {
                    name: name.to_string(),
                    type_,
                    description: describe(heap, value),
                }
            })
            .collect()
    }
}

/// Per-call traversal state
struct Walker<'a> {
    heap: &'a Heap,
    options: &'a InferenceOptions,
    /// Identities currently (or, for `CycleGuard::Call`, ever) entered
    entered: HashSet<ObjectId>,
    depth_exceeded: bool,
}

impl<'a> Walker<'a> {
    fn walk(&mut self, value: &Value, depth: usize) -> Type {
        if depth > self.options.max_depth {
            if !self.depth_exceeded {
                warn!(
                    max_depth = self.options.max_depth,
                    "Value nesting exceeds max_depth, rendering as any"
                );
                self.depth_exceeded = true;
            }
            return Type::Any;
        }

        match classify(self.heap, value) {
            Tag::Null => Type::Primitive(PrimitiveType::Null),
            Tag::Undefined => Type::Primitive(PrimitiveType::Undefined),
            Tag::Opaque(opaque) => Type::Opaque(opaque),
            Tag::Function => Type::Opaque(OpaqueType::Function),
            Tag::Symbol => Type::Primitive(PrimitiveType::Symbol),
            Tag::Primitive(kind) => Type::Primitive(match kind {
                PrimitiveKind::Number => PrimitiveType::Number,
                PrimitiveKind::String => PrimitiveType::String,
                PrimitiveKind::Boolean => PrimitiveType::Boolean,
                PrimitiveKind::BigInt => PrimitiveType::BigInt,
            }),
            Tag::ArrayLike | Tag::MapLike | Tag::SetLike => match value.as_object() {
                Some(id) => self.walk_container(id, depth),
                None => Type::Any,
            },
            Tag::PlainObject => match value.as_object() {
                Some(id) => self.walk_object(id, depth),
                None => Type::Any,
            },
        }
    }

    /// Arrays, maps and sets; always guarded for the current path only
    fn walk_container(&mut self, id: ObjectId, depth: usize) -> Type {
        if !self.entered.insert(id) {
            return Type::Circular;
        }

        let heap = self.heap;
        let type_ = match heap.get(id).map(|obj| obj.kind()) {
            Some(ObjectKind::Array(elements)) => Type::Array(self.union_of(elements, depth)),
            Some(ObjectKind::Set(members)) => Type::Set(self.union_of(members, depth)),
            Some(ObjectKind::Map(entries)) => {
                let mut keys = Union::new();
                let mut values = Union::new();
                for (key, value) in entries {
                    keys.insert(self.walk(key, depth + 1));
                    values.insert(self.walk(value, depth + 1));
                }
                Type::Map(keys, values)
            }
            _ => Type::Any,
        };

        self.entered.remove(&id);
        type_
    }

    fn walk_object(&mut self, id: ObjectId, depth: usize) -> Type {
        if !self.entered.insert(id) {
            return Type::Circular;
        }

        let heap = self.heap;
        let mut object = ObjectType::new();
        if let Some(obj) = heap.get(id) {
            for (key, value) in obj.entries() {
                let field = self.walk(value, depth + 1);
                object.fields.push((key.to_string(), field));
            }
        }

        if self.options.cycle_guard == CycleGuard::Path {
            self.entered.remove(&id);
        }
        Type::Object(object)
    }

    fn union_of(&mut self, values: &[Value], depth: usize) -> Union {
        let mut union = Union::new();
        for value in values {
            union.insert(self.walk(value, depth + 1));
        }
        union
    }
}
