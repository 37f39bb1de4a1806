// Benchmarks for the transaction hot paths: canonical encoding, hashing,
// signing and verification, plus address encode/decode.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use kcn_protocol::config::Network;
use kcn_protocol::crypto::keys::KcnKeypair;
use kcn_protocol::crypto::signatures::{sign, verify};
use kcn_protocol::identity::{address_to_public_key, encode_public_key};
use kcn_protocol::transaction::codec;
use kcn_protocol::transaction::{Transaction, TransactionBuilder, TxFields};

fn sample_fields(keypair: &KcnKeypair) -> TxFields {
    TransactionBuilder::new()
        .to(keypair.address(Network::Mainnet))
        .amount(1_000_000)
        .coin("KCN")
        .fee(100)
        .nonce(42)
        .memo("benchmark payment")
        .into_fields()
        .expect("all fields set")
}

fn bench_keypair_generation(c: &mut Criterion) {
    c.bench_function("ed25519/keypair_generate", |b| {
        b.iter(KcnKeypair::generate);
    });
}

fn bench_sign_verify_message(c: &mut Criterion) {
    let keypair = KcnKeypair::generate();
    let message = [0xabu8; 32];
    let signature = sign(&keypair, &message);
    let public_key = keypair.public_key();

    c.bench_function("ed25519/sign_hash", |b| {
        b.iter(|| sign(&keypair, black_box(&message)));
    });
    c.bench_function("ed25519/verify_hash", |b| {
        b.iter(|| verify(&public_key, black_box(&message), &signature));
    });
}

fn bench_codec(c: &mut Criterion) {
    let keypair = KcnKeypair::generate();
    let fields = sample_fields(&keypair);
    let bytes = codec::serialize(&fields).unwrap();

    c.bench_function("codec/serialize", |b| {
        b.iter(|| codec::serialize(black_box(&fields)).unwrap());
    });
    c.bench_function("codec/deserialize", |b| {
        b.iter(|| codec::deserialize(black_box(&bytes)).unwrap());
    });
    c.bench_function("codec/hash", |b| {
        b.iter(|| codec::hash(black_box(&fields)).unwrap());
    });
}

fn bench_transaction(c: &mut Criterion) {
    let keypair = KcnKeypair::generate();
    let fields = sample_fields(&keypair);

    c.bench_function("transaction/construct_and_sign", |b| {
        b.iter(|| {
            let mut tx = Transaction::new(fields.clone(), Network::Mainnet).unwrap();
            tx.sign(&keypair);
            tx
        });
    });

    let mut signed = Transaction::new(fields, Network::Mainnet).unwrap();
    signed.sign(&keypair);
    c.bench_function("transaction/verify", |b| {
        b.iter(|| black_box(&signed).verify());
    });
}

fn bench_addresses(c: &mut Criterion) {
    let mut group = c.benchmark_group("address/decode");

    for network in Network::ALL {
        let addr = encode_public_key(KcnKeypair::generate().public_key().as_bytes(), network);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(network), &addr, |b, addr| {
            b.iter(|| address_to_public_key(addr, network).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_keypair_generation,
    bench_sign_verify_message,
    bench_codec,
    bench_transaction,
    bench_addresses,
);
criterion_main!(benches);
