use criterion::{black_box, criterion_group, criterion_main, Criterion};
use huffpack::HuffmanCodec;

fn sample_text() -> Vec<u8> {
    b"The quick brown fox jumps over the lazy dog. \
      Huffman encoding is a greedy algorithm that builds optimal prefix codes. "
        .repeat(512)
}

fn encode_benchmark(c: &mut Criterion) {
    let input = sample_text();
    c.bench_function("huffman encode", |b| {
        b.iter(|| HuffmanCodec::encode(black_box(&input)))
    });
}

fn decode_benchmark(c: &mut Criterion) {
    let compressed = HuffmanCodec::encode(&sample_text()).expect("encode sample");
    c.bench_function("huffman decode", |b| {
        b.iter(|| HuffmanCodec::decode(black_box(&compressed)))
    });
}

criterion_group!(benches, encode_benchmark, decode_benchmark);
criterion_main!(benches);
