use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use virtualshield::protocol::{CommandRecord, SERVICE_WEB, post_entries};
use virtualshield::sensor::split::{bounded_copy, split_in_place};

const RESPONSE: &[u8] = b"21.5|12.0|light rain|SW 14 km/h|1013 hPa|78%|sunrise 07:12|sunset 18:40";

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");
    group.throughput(Throughput::Bytes(RESPONSE.len() as u64));
    group.bench_function("copy_and_split_8_parts", |b| {
        b.iter(|| {
            let mut buffer = [0u8; 128];
            bounded_copy(&mut buffer, black_box(RESPONSE));
            let mut parts: [&[u8]; 8] = [b"".as_slice(); 8];
            split_in_place(&mut buffer, 128, &mut parts);
            black_box(parts[7].len())
        })
    });
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let entries = post_entries(
        "http://example.com/api/weather?city=Seattle",
        "units=metric&lang=en",
        "//temp|//low|//sky",
        256,
    );
    c.bench_function("encode_post_record", |b| {
        b.iter(|| {
            let record = CommandRecord {
                service: SERVICE_WEB,
                id: black_box(42),
                entries: &entries,
            };
            let mut buf = [0u8; 512];
            record.to_slice(&mut buf).unwrap()
        })
    });
}

criterion_group!(benches, bench_split, bench_encode);
criterion_main!(benches);
