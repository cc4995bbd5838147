use core::hint::black_box;
use criterion::async_executor::SmolExecutor;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use flakeid::{
    BasicSnowflakeGenerator, CUSTOM_EPOCH, GeneratorConfig, LockSnowflakeGenerator,
    MonotonicClock, Poll, Result, SnowflakeGenerator, SnowflakeGeneratorAsyncSmolExt,
    SnowflakeGeneratorAsyncTokioExt, TimeSource,
};
use futures::future::try_join_all;
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};
use tokio::runtime::Builder;

#[derive(Clone, Copy)]
struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// One full millisecond of sequence space. A fresh generator on a fixed clock
// never reports `Pending` within this many IDs.
const TOTAL_IDS: usize = 4096;

fn config(worker_id: u64, epoch: u64) -> GeneratorConfig {
    GeneratorConfig::new(worker_id, epoch).unwrap()
}

/// Benchmarks the hot path where IDs are always `Ready`.
fn bench_generator<G>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: SnowflakeGenerator<FixedMockTime>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    match generator.poll_id() {
                        Ok(Poll::Ready { id }) => {
                            black_box(id);
                        }
                        _ => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks the blocking path against a real clock, including overflow
/// waits.
fn bench_generator_blocking<G>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    G: SnowflakeGenerator<MonotonicClock>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.generate_id().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one lock generator shared across threads.
fn bench_lock_contended<T>(c: &mut Criterion, group_name: &str, time: T)
where
    T: TimeSource + Clone + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let generator =
                        LockSnowflakeGenerator::try_new(config(0, 0), time.clone()).unwrap();
                    let barrier = Barrier::new(thread_count + 1);
                    scope(|s| {
                        for _ in 0..thread_count {
                            let generator = generator.clone();
                            let barrier = &barrier;
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(generator.generate_id().unwrap());
                                }
                            });
                        }
                        barrier.wait();
                    });
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

/// Benchmarks many async tasks sharing one lock generator on Tokio.
fn bench_lock_async_tokio(c: &mut Criterion, group_name: &str) {
    let mut group = c.benchmark_group(group_name);
    group.sample_size(10);
    group.sampling_mode(criterion::SamplingMode::Flat);

    let total_ids = TOTAL_IDS * 64;

    for num_tasks in [1, 2, 4, 8, 16, 32, 64] {
        let ids_per_task = total_ids / num_tasks;

        group.throughput(Throughput::Elements(total_ids as u64));
        group.bench_function(format!("elems/{total_ids}/tasks/{num_tasks}"), |b| {
            let rt = Builder::new_multi_thread().enable_all().build().unwrap();

            b.to_async(&rt).iter_custom(move |iters| async move {
                let start = Instant::now();

                for _ in 0..iters {
                    let generator = Arc::new(
                        LockSnowflakeGenerator::try_new(
                            config(0, CUSTOM_EPOCH),
                            MonotonicClock::default(),
                        )
                        .unwrap(),
                    );

                    let tasks: Vec<tokio::task::JoinHandle<Result<()>>> = (0..num_tasks)
                        .map(|_| {
                            let generator = Arc::clone(&generator);
                            tokio::spawn(async move {
                                for _ in 0..ids_per_task {
                                    black_box(generator.generate_id_tokio().await?);
                                }
                                Ok(())
                            })
                        })
                        .collect();

                    for result in try_join_all(tasks).await.unwrap() {
                        result.unwrap();
                    }
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

/// Benchmarks a single generator awaited sequentially on smol.
fn bench_sequential_async_smol(c: &mut Criterion, group_name: &str) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.to_async(SmolExecutor).iter_custom(|iters| async move {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = BasicSnowflakeGenerator::try_new(
                    config(0, CUSTOM_EPOCH),
                    MonotonicClock::default(),
                )
                .unwrap();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.generate_id_smol().await.unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

fn benchmark_mock_sequential_basic(c: &mut Criterion) {
    bench_generator(c, "mock/sequential/basic", || {
        BasicSnowflakeGenerator::try_new(config(0, 0), FixedMockTime { millis: 1 }).unwrap()
    });
}

fn benchmark_mock_sequential_lock(c: &mut Criterion) {
    bench_generator(c, "mock/sequential/lock", || {
        LockSnowflakeGenerator::try_new(config(0, 0), FixedMockTime { millis: 1 }).unwrap()
    });
}

fn benchmark_mock_contended_lock(c: &mut Criterion) {
    bench_lock_contended(c, "mock/contended/lock", FixedMockTime { millis: 1 });
}

fn benchmark_mono_sequential_basic(c: &mut Criterion) {
    bench_generator_blocking(c, "mono/sequential/basic", || {
        BasicSnowflakeGenerator::try_new(config(0, CUSTOM_EPOCH), MonotonicClock::default())
            .unwrap()
    });
}

fn benchmark_mono_sequential_lock(c: &mut Criterion) {
    bench_generator_blocking(c, "mono/sequential/lock", || {
        LockSnowflakeGenerator::try_new(config(0, CUSTOM_EPOCH), MonotonicClock::default())
            .unwrap()
    });
}

fn benchmark_mono_tokio_lock(c: &mut Criterion) {
    bench_lock_async_tokio(c, "mono/tokio/lock");
}

fn benchmark_mono_sequential_smol_basic(c: &mut Criterion) {
    bench_sequential_async_smol(c, "mono/sequential/smol/basic");
}

criterion_group!(
    benches,
    // Mock clock
    benchmark_mock_sequential_basic,
    benchmark_mock_sequential_lock,
    benchmark_mock_contended_lock,
    // Monotonic clock (blocking through overflow)
    benchmark_mono_sequential_basic,
    benchmark_mono_sequential_lock,
    // Async
    benchmark_mono_tokio_lock,
    benchmark_mono_sequential_smol_basic,
);
criterion_main!(benches);
