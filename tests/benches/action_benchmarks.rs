//! # Action-Chain Benchmarks
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | ac-01 ID Codec | `create_id` | < 100µs |
//! | ac-01 ID Audit | `verify_ids`, one sampled position | < 100µs |
//! | ac-02 Lifecycle | Cascade register + finalize | < 5ms |
//! | ac-02 Lifecycle | Expiration sweep | < 1ms per action |

use std::time::Duration;

use ac_01_id_audit::{create_id, create_ids, verify_ids, AuditSeed};
use ac_02_action_lifecycle::test_utils::TestChain;
use ac_02_action_lifecycle::{ActionMsgApi, ActionType, Params};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

fn random_signatures() -> String {
    let mut rng = rand::thread_rng();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes[..]);
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("{hex}.{hex}")
}

// ============================================================================
// AC-01: ID Codec and Audit
// ============================================================================

fn bench_id_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("ac-01-id-codec");
    group.measurement_time(Duration::from_secs(10));

    let signatures = random_signatures();
    group.bench_function("create_id_single", |b| {
        b.iter(|| black_box(create_id(&signatures, black_box(42))))
    });

    for count in [10u64, 50, 100] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::new("create_ids", count), &count, |b, &count| {
            b.iter(|| black_box(create_ids(&signatures, 7, count)))
        });
    }

    for count in [10u64, 50, 100] {
        let ids = create_ids(&signatures, 7, count).unwrap();
        let seed = AuditSeed::new(100, "1", "lumera1sn0001");
        group.bench_with_input(
            BenchmarkId::new("verify_ids", count),
            &(ids, seed),
            |b, (ids, seed)| b.iter(|| black_box(verify_ids(ids, &signatures, 7, count, seed).is_ok())),
        );
    }

    group.finish();
}

// ============================================================================
// AC-02: Action Lifecycle
// ============================================================================

fn bench_cascade_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("ac-02-action-lifecycle");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("cascade_register_finalize", |b| {
        b.iter_with_setup(
            || TestChain::new(1).unwrap(),
            |mut chain| {
                let json = chain.cascade_request_json();
                let id = chain.request(ActionType::Cascade, &json, 10_000).unwrap();
                let finalize = chain.cascade_finalize_json(&id).unwrap();
                black_box(chain.finalize(0, &id, ActionType::Cascade, &finalize).unwrap())
            },
        )
    });

    for pending in [10usize, 50] {
        group.throughput(Throughput::Elements(pending as u64));
        group.bench_with_input(
            BenchmarkId::new("expiration_sweep", pending),
            &pending,
            |b, &pending| {
                b.iter_with_setup(
                    || {
                        let params = Params::default()
                            .with_expiration_duration(Duration::from_secs(60))
                            .with_max_actions_per_block(pending as u64);
                        let mut chain = TestChain::with_params(1, params).unwrap();
                        let json = chain.cascade_request_json();
                        for _ in 0..pending {
                            chain.request(ActionType::Cascade, &json, 10_000).unwrap();
                        }
                        chain.advance(60);
                        chain
                    },
                    |mut chain| {
                        let block = chain.block;
                        chain.msg_server().end_block(block);
                        black_box(chain.escrow())
                    },
                )
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_id_codec, bench_cascade_lifecycle);

criterion_main!(benches);
