use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazy_static::lazy_static;
use machina::dfa::Dfa;
use machina::regex::Regex;

lazy_static! {
    static ref ENDS_NEAR_ONE: Dfa = compile("(0|1)*1(0|1)(0|1)(0|1)");
    static ref ENDS_IN_ZERO: Dfa = compile("(0|1)*0");
}

fn compile(pattern: &str) -> Dfa {
    Regex::new(pattern)
        .unwrap()
        .to_nfa()
        .to_dfa()
        .unwrap()
}

pub fn subset_construction(c: &mut Criterion) {
    let nfa = Regex::new("(0|1)*1(0|1)(0|1)(0|1)").unwrap().to_nfa();
    c.bench_function("subset construction", |b| {
        b.iter(|| black_box(&nfa).to_dfa())
    });
}

pub fn minimization(c: &mut Criterion) {
    c.bench_function("minimize", |b| b.iter(|| black_box(&*ENDS_NEAR_ONE).minimized()));
}

pub fn powerset(c: &mut Criterion) {
    c.bench_function("union", |b| {
        b.iter(|| ENDS_NEAR_ONE.union(black_box(&ENDS_IN_ZERO)))
    });
    c.bench_function("intersection", |b| {
        b.iter(|| ENDS_NEAR_ONE.intersection(black_box(&ENDS_IN_ZERO)))
    });
}

pub fn equivalence_check(c: &mut Criterion) {
    let minimized = ENDS_NEAR_ONE.minimized().unwrap();
    c.bench_function("equivalence", |b| {
        b.iter(|| ENDS_NEAR_ONE.equivalent_to(black_box(&minimized)))
    });
}

criterion_group!(
    benches,
    subset_construction,
    minimization,
    powerset,
    equivalence_check
);
criterion_main!(benches);
