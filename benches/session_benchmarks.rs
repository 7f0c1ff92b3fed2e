//! Micro-benchmarks for the hot paths of a session: primitive operator
//! semantics and name resolution against the bootstrap image.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use javelin::{LanguageLevel, Session, Type, Value, ops};
use javelin_core::PrimitiveKind;

fn operator_semantics(c: &mut Criterion) {
    let int = Type::Primitive(PrimitiveKind::Int);
    c.bench_function("ops/add_int", |b| {
        b.iter(|| ops::add(black_box(&int), black_box(&Value::Char('a')), black_box(&Value::Int(1))))
    });
    c.bench_function("ops/concat", |b| {
        let string = Type::string();
        b.iter(|| {
            ops::add(
                black_box(&string),
                black_box(&Value::Int(5)),
                black_box(&Value::Str("x".into())),
            )
        })
    });
}

fn name_resolution(c: &mut Criterion) {
    c.bench_function("session/resolve_host_class", |b| {
        let mut session = Session::new(LanguageLevel::Modern);
        b.iter(|| session.resolve(black_box("lang.Integer"), None).unwrap())
    });
}

criterion_group!(benches, operator_semantics, name_resolution);
criterion_main!(benches);
