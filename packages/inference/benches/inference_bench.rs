use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slicegen_inference::{InferenceEngine, InferenceOptions};
use slicegen_value::{Heap, Value};

/// State object with `width` records, each holding nested arrays and a shared lookup
fn build_state(width: usize) -> (Heap, Value) {
    let mut heap = Heap::new();
    let shared = heap.alloc_object();
    heap.set_property(shared, "currency", Value::from("EUR")).unwrap();

    let root = heap.alloc_object();
    for i in 0..width {
        let tags = heap.alloc_array(vec![Value::from("a"), Value::from(i as f64)]);
        let record = heap.alloc_object();
        heap.set_property(record, "id", Value::from(i as f64)).unwrap();
        heap.set_property(record, "tags", Value::Object(tags)).unwrap();
        heap.set_property(record, "pricing", Value::Object(shared)).unwrap();
        heap.set_property(root, format!("record{}", i), Value::Object(record))
            .unwrap();
    }
    heap.set_property(root, "self", Value::Object(root)).unwrap();

    (heap, Value::Object(root))
}

fn build_nested(depth: usize) -> (Heap, Value) {
    let mut heap = Heap::new();
    let mut value = Value::from(true);
    for _ in 0..depth {
        let id = heap.alloc_object();
        heap.set_property(id, "child", value).unwrap();
        value = Value::Object(id);
    }
    (heap, value)
}

fn infer_wide_state(c: &mut Criterion) {
    let (heap, value) = build_state(200);
    let engine = InferenceEngine::new(InferenceOptions::default());

    c.bench_function("infer_wide_state", |b| {
        b.iter(|| engine.infer(black_box(&heap), black_box(&value)))
    });
}

fn infer_wide_state_compat(c: &mut Criterion) {
    let (heap, value) = build_state(200);
    let engine = InferenceEngine::new(InferenceOptions::compat());

    c.bench_function("infer_wide_state_compat", |b| {
        b.iter(|| engine.infer(black_box(&heap), black_box(&value)))
    });
}

fn infer_deep_state(c: &mut Criterion) {
    let (heap, value) = build_nested(200);
    let engine = InferenceEngine::new(InferenceOptions::default());

    c.bench_function("infer_deep_state", |b| {
        b.iter(|| engine.infer(black_box(&heap), black_box(&value)))
    });
}

criterion_group!(
    benches,
    infer_wide_state,
    infer_wide_state_compat,
    infer_deep_state
);
criterion_main!(benches);
