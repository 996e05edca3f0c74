//! Latency benchmarks for the signing path of a single action.
//!
//! Run with: `cargo bench --bench latency`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use hyperliquid_core::actions::{l1, user_signed, Grouping, OrderRequest, OrderType, Tif};
use hyperliquid_core::signing::{
    action_hash, ActionCategory, LocalSigner, RawHashSigner, SigningContext, TypedDataDocument,
};
use hyperliquid_core::types::{parse_address, Action, Chain};
use hyperliquid_core::wire;

const BENCH_KEY: &str = "0x0123456789012345678901234567890123456789012345678901234567890123";

/// Generate an order action with `count` resting limit orders.
fn generate_order_action(count: usize) -> Action {
    let orders: Vec<OrderRequest> = (0..count)
        .map(|i| OrderRequest {
            asset: (i % 8) as u32,
            is_buy: i % 2 == 0,
            limit_px: Decimal::new(1_850_25 + i as i64, 2),
            sz: Decimal::new(125 + i as i64, 3),
            reduce_only: false,
            order_type: OrderType::Limit { tif: Tif::Gtc },
            cloid: None,
        })
        .collect();

    l1::order(&orders, Grouping::Na, None).unwrap()
}

/// Benchmark msgpack encoding of order actions.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("msgpack_encode");

    for count in [1, 10, 50].iter() {
        let action = generate_order_action(*count);

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("orders", count), &action, |b, action| {
            b.iter(|| black_box(wire::encode(black_box(action))))
        });
    }

    group.finish();
}

/// Benchmark the action hash (encode + nonce/vault/expiry + keccak).
fn bench_action_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("action_hash");
    let vault = Some(parse_address("0x1719884eb866cb12b2287399b15f7db5e7d775ea").unwrap());

    for count in [1, 10, 50].iter() {
        let action = generate_order_action(*count);

        group.bench_with_input(BenchmarkId::new("plain", count), &action, |b, action| {
            b.iter(|| black_box(action_hash(action, 1_700_000_000_000, None, None)))
        });

        group.bench_with_input(
            BenchmarkId::new("vault_expiry", count),
            &action,
            |b, action| {
                b.iter(|| {
                    black_box(action_hash(
                        action,
                        1_700_000_000_000,
                        vault.as_ref(),
                        Some(1_700_000_060_000),
                    ))
                })
            },
        );
    }

    group.finish();
}

/// Benchmark EIP-712 struct hashing for both document kinds.
fn bench_typed_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_data");

    let connection_id = alloy_primitives::keccak256(b"bench");
    let agent = TypedDataDocument::l1_agent(connection_id, Chain::Mainnet);
    group.bench_function("agent_signing_hash", |b| {
        b.iter(|| black_box(agent.signing_hash()))
    });

    let destination = parse_address("0x5e9ee1089755c3435139848e47e6635505d5a13a").unwrap();
    let send = user_signed::usd_send(&destination, Decimal::ONE, 1_700_000_000_000).unwrap();
    let document = SigningContext::new(Chain::Mainnet)
        .prepare_action(&send, 1_700_000_000_000)
        .unwrap()
        .document;
    group.bench_function("usd_send_signing_hash", |b| {
        b.iter(|| black_box(document.signing_hash()))
    });
    group.bench_function("document_to_json", |b| b.iter(|| black_box(document.to_json())));

    group.finish();
}

/// Benchmark end-to-end signing with the raw hash backend.
fn bench_sign(c: &mut Criterion) {
    let mut group = c.benchmark_group("sign");
    let signer = LocalSigner::from_hex(BENCH_KEY).unwrap();
    let ctx = SigningContext::new(Chain::Mainnet);

    let hash = alloy_primitives::keccak256(b"digest");
    group.bench_function("sign_hash", |b| {
        b.iter(|| black_box(signer.sign_hash(black_box(hash.as_slice()))))
    });

    let action = generate_order_action(1);
    group.bench_function("l1_order", |b| {
        b.iter(|| black_box(ctx.sign(&signer, &action, 1_700_000_000_000, ActionCategory::L1)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_encode,
    bench_action_hash,
    bench_typed_data,
    bench_sign,
);

criterion_main!(benches);
