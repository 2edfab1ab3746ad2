use core::{hint::black_box, time::Duration};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use linkflake::{
    AtomicIdentifierClock, Base62Ext, IdentifierClock, LockIdentifierClock, NodeIdentity, Poll,
    SHORT_CODE_LEN, SystemClock, TWITTER_EPOCH, TimeSource, encode, encode_to_buf,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration. Equal to one full
// millisecond of sequence space, so a fixed clock never stalls.
const TOTAL_IDS: usize = 4096;

fn node() -> NodeIdentity {
    NodeIdentity::new(1, 1).unwrap()
}

/// Benchmarks a hot-path generator where every poll is `Ready`.
fn bench_generator<G>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: IdentifierClock,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    match generator.try_poll_id().unwrap() {
                        Poll::Ready { id } => {
                            black_box(id);
                        }
                        Poll::Pending { .. } => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks generators on the wall clock, including sequence stalls.
fn bench_generator_wallclock<G>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    G: IdentifierClock,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks a shared generator across threads on the wall clock.
fn bench_generator_contended<G>(c: &mut Criterion, group_name: &str, generator_fn: impl Fn() -> G)
where
    G: IdentifierClock + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let generator = Arc::new(generator_fn());
                    let barrier = Arc::new(Barrier::new(thread_count + 1));
                    scope(|s| {
                        for _ in 0..thread_count {
                            let generator = Arc::clone(&generator);
                            let barrier = Arc::clone(&barrier);
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(generator.next_id().unwrap());
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

fn benchmark_mock_lock(c: &mut Criterion) {
    bench_generator(c, "mock/sequential/lock", || {
        LockIdentifierClock::new(node(), Duration::ZERO, FixedMockTime { millis: 1 })
    });
}

fn benchmark_mock_atomic(c: &mut Criterion) {
    bench_generator(c, "mock/sequential/atomic", || {
        AtomicIdentifierClock::new(node(), Duration::ZERO, FixedMockTime { millis: 1 })
    });
}

fn benchmark_wallclock_lock(c: &mut Criterion) {
    bench_generator_wallclock(c, "wallclock/sequential/lock", || {
        LockIdentifierClock::new(node(), TWITTER_EPOCH, SystemClock)
    });
}

fn benchmark_wallclock_atomic(c: &mut Criterion) {
    bench_generator_wallclock(c, "wallclock/sequential/atomic", || {
        AtomicIdentifierClock::new(node(), TWITTER_EPOCH, SystemClock)
    });
}

fn benchmark_contended_lock(c: &mut Criterion) {
    bench_generator_contended(c, "wallclock/contended/lock", || {
        LockIdentifierClock::new(node(), TWITTER_EPOCH, SystemClock)
    });
}

fn benchmark_contended_atomic(c: &mut Criterion) {
    bench_generator_contended(c, "wallclock/contended/atomic", || {
        AtomicIdentifierClock::new(node(), TWITTER_EPOCH, SystemClock)
    });
}

fn benchmark_base62(c: &mut Criterion) {
    let generator = LockIdentifierClock::new(node(), TWITTER_EPOCH, SystemClock);
    let ids: Vec<_> = (0..TOTAL_IDS)
        .map(|_| generator.next_id().unwrap())
        .collect();

    let mut group = c.benchmark_group("base62");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function("encode", |b| {
        b.iter(|| {
            for id in &ids {
                black_box(id.encode());
            }
        });
    });

    group.bench_function("encode_to_buf", |b| {
        let mut buf = [0_u8; SHORT_CODE_LEN];
        b.iter(|| {
            for id in &ids {
                encode_to_buf(id.to_raw(), &mut buf);
                black_box(&buf);
            }
        });
    });

    group.bench_function("encode/string", |b| {
        b.iter(|| {
            for id in &ids {
                black_box(encode(id.to_raw()).into_string());
            }
        });
    });

    group.finish();
}

fn benchmark_generate_and_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));
    let threads = num_cpus::get().max(1);

    group.bench_function(format!("atomic/threads/{threads}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let generator = AtomicIdentifierClock::new(node(), TWITTER_EPOCH, SystemClock);
                scope(|s| {
                    for _ in 0..threads {
                        s.spawn(|| {
                            for _ in 0..TOTAL_IDS / threads {
                                black_box(generator.next_id().unwrap().encode());
                            }
                        });
                    }
                });
            }
            start.elapsed()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    // Mock clock
    benchmark_mock_lock,
    benchmark_mock_atomic,
    // Wall clock
    benchmark_wallclock_lock,
    benchmark_wallclock_atomic,
    benchmark_contended_lock,
    benchmark_contended_atomic,
    // Encoding
    benchmark_base62,
    benchmark_generate_and_encode,
);
criterion_main!(benches);
