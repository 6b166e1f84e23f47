use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slicegen_parser::parse_module;

fn parse_small_state(c: &mut Criterion) {
    let source = r#"
        export default {
            loading: false,
            error: null,
            searchQuery: '',
            currentPage: 1,
        }
    "#;

    c.bench_function("parse_small_state", |b| {
        b.iter(|| parse_module(black_box(source)))
    });
}

fn parse_typed_state(c: &mut Criterion) {
    let source = r#"
        import type { Product } from './types';

        type SortOrder = 'asc' | 'desc';

        const filters = {
            category: '',
            priceRange: [0, 1000],
            inStock: true,
            sortBy: 'name',
            sortOrder: 'asc' as SortOrder,
        };

        const products: Product[] = [];

        export default {
            products,
            filters,
            tags: new Set(['new', 'sale']),
            lookup: new Map([['a', 1], ['b', 2]]),
            lastUpdated: new Date(0),
            pattern: /^[a-z]+$/i,
            onSelect: (id: number): void => { console.log(id) },
        };
    "#;

    c.bench_function("parse_typed_state", |b| {
        b.iter(|| parse_module(black_box(source)))
    });
}

fn parse_large_state(c: &mut Criterion) {
    let mut source = String::from("export default {\n");
    for i in 0..500 {
        source.push_str(&format!(
            "  field{i}: {{ id: {i}, label: 'item {i}', tags: ['a', 'b'], active: {} }},\n",
            i % 2 == 0
        ));
    }
    source.push_str("}\n");

    c.bench_function("parse_large_state", |b| {
        b.iter(|| parse_module(black_box(&source)))
    });
}

criterion_group!(benches, parse_small_state, parse_typed_state, parse_large_state);
criterion_main!(benches);
