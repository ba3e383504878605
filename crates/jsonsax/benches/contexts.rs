//! Benchmark – decoding one document through each context
#![allow(missing_docs)]

use std::{fmt::Write, hint::black_box, time::Duration};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jsonsax::{BufferContext, ConstBufferContext, Context, StreamContext, parse_array, walk};

/// A deterministic array of `records` small objects, each mixing strings with
/// escapes, numbers, booleans and a nested array.
fn make_payload(records: usize) -> String {
    let mut s = String::from("[");
    for i in 0..records {
        if i > 0 {
            s.push(',');
        }
        write!(
            s,
            r#"{{"id": {i}, "name": "item\t{i}", "score": {}.5, "ok": {}, "tags": ["a", "b\n", null]}}"#,
            i % 100,
            i % 2 == 0
        )
        .unwrap();
    }
    s.push(']');
    s
}

fn count_scalars<C: Context + ?Sized>(ctx: &mut C) -> usize {
    let mut count = 0usize;
    walk(ctx, |_, value| {
        count += value.as_bytes().len();
        Ok(())
    })
    .unwrap();
    count
}

fn skip_all<C: Context + ?Sized>(ctx: &mut C) {
    parse_array(ctx, |element| element.ignore()).unwrap();
}

fn bench_contexts(c: &mut Criterion) {
    let mut group = c.benchmark_group("contexts");

    for &records in &[100usize, 10_000] {
        let payload = make_payload(records);
        group.throughput(Throughput::Bytes(payload.len() as u64));

        group.bench_with_input(BenchmarkId::new("const", records), &payload, |b, p| {
            b.iter(|| black_box(count_scalars(&mut ConstBufferContext::new(p.as_bytes()))));
        });
        group.bench_with_input(BenchmarkId::new("in_place", records), &payload, |b, p| {
            b.iter_batched_ref(
                || p.as_bytes().to_vec(),
                |buffer| black_box(count_scalars(&mut BufferContext::new(buffer))),
                criterion::BatchSize::LargeInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("stream", records), &payload, |b, p| {
            b.iter(|| {
                black_box(count_scalars(&mut StreamContext::new(
                    p.as_bytes().iter().copied(),
                )))
            });
        });
        group.bench_with_input(BenchmarkId::new("ignore", records), &payload, |b, p| {
            b.iter(|| skip_all(&mut ConstBufferContext::new(black_box(p.as_bytes()))));
        });
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(10));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_contexts }
criterion_main!(benches);
