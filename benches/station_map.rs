use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use station_stats::StationMap;
use std::hint::black_box;
use std::thread;

const UPDATES_PER_THREAD: usize = 100_000;

fn station_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("Station {:05}", i)).collect()
}

fn workload(names: &[String], seed: u64) -> Vec<(usize, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..UPDATES_PER_THREAD)
        .map(|_| {
            let tenths: i32 = rng.random_range(-999..=999);
            (rng.random_range(0..names.len()), tenths as f64 / 10.0)
        })
        .collect()
}

fn bench_upsert_by_shards(c: &mut Criterion) {
    let names = station_names(413);
    let threads = 8;
    let workloads: Vec<_> = (0..threads).map(|t| workload(&names, t as u64)).collect();

    let mut group = c.benchmark_group("upsert_8_threads");
    group.throughput(Throughput::Elements((threads * UPDATES_PER_THREAD) as u64));

    for shards in [1, 16, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(shards), &shards, |b, &shards| {
            b.iter(|| {
                let map = StationMap::with_shards(shards);
                thread::scope(|scope| {
                    for work in &workloads {
                        let map = &map;
                        let names = &names;
                        scope.spawn(move || {
                            for &(station, temperature) in work {
                                map.upsert(&names[station], temperature);
                            }
                        });
                    }
                });
                black_box(map.into_sorted())
            })
        });
    }

    group.finish();
}

fn bench_upsert_single_thread(c: &mut Criterion) {
    let names = station_names(10_000);
    let work = workload(&names, 7);

    c.bench_function("upsert_single_thread_10k_stations", |b| {
        b.iter(|| {
            let map = StationMap::new();
            for &(station, temperature) in &work {
                map.upsert(&names[station], temperature);
            }
            black_box(map.len())
        })
    });
}

criterion_group!(benches, bench_upsert_by_shards, bench_upsert_single_thread);
criterion_main!(benches);
