use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io::Cursor;

use eob_extract::storage::{encode_words, find_last_record_offset, Word, LEADING_TAG_BASE};

const TAIL: Word = 0x0000_0ABC;

/// A file whose last record starts `distance` words before EOF
fn synthetic_file(distance: usize) -> Vec<u8> {
    let mut words: Vec<Word> = vec![0x0101_0101; 1000];
    words.push(TAIL.wrapping_add(LEADING_TAG_BASE));
    words.extend(std::iter::repeat(0x0202_0202).take(distance - 2));
    words.push(TAIL);

    let mut buf = Vec::with_capacity(words.len() * 4);
    encode_words(&mut buf, &words);
    buf
}

fn bench_backward_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("backward_scan");

    for distance in [64usize, 10_000, 150_000] {
        let file = synthetic_file(distance);
        group.bench_with_input(BenchmarkId::from_parameter(distance), &file, |b, file| {
            b.iter(|| {
                let mut stream = Cursor::new(file.as_slice());
                find_last_record_offset(black_box(&mut stream), 10_000, 200_000).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_backward_scan);
criterion_main!(benches);
