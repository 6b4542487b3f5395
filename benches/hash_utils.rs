use std::collections::hash_map::DefaultHasher;
use std::hash::BuildHasherDefault;

use criterion::{Criterion, criterion_group, criterion_main};
use simplebloom::hash_utils::{DigestHasher, Probes, SeededHasher, StdHasher};

fn run_probes<H>(c: &mut Criterion, name: &str, hasher: H)
where
    H: SeededHasher,
{
    c.bench_function(name, |b| {
        let max_result = 14378;
        let number_functions = 10;
        let obj = b"1337";
        b.iter(|| {
            Probes::new(max_result, number_functions, obj, &hasher)
                .map(|pos| pos.unwrap())
                .sum::<usize>()
        })
    });
}

fn probes_digest(c: &mut Criterion) {
    run_probes(c, "probes_digest", DigestHasher::<simplebloom::sha2::Sha256>::new());
}

fn probes_std(c: &mut Criterion) {
    run_probes(
        c,
        "probes_std",
        StdHasher::new(BuildHasherDefault::<DefaultHasher>::default()),
    );
}

criterion_group!(benches, probes_digest, probes_std);
criterion_main!(benches);
