use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rp66_repcode::{RepCode, decode, encode, read_uvari, write_uvari};
use rp66_types::{ByteCursor, Value};

fn bench_uvari(c: &mut Criterion) {
    let mut bytes = Vec::new();
    for value in 0..4096u64 {
        write_uvari(&mut bytes, value * 333).unwrap();
    }
    c.bench_function("uvari_decode_4096", |b| {
        b.iter(|| {
            let mut cur = ByteCursor::new(&bytes);
            let mut sum = 0u64;
            while cur.remaining() > 0 {
                sum += u64::from(read_uvari(&mut cur).unwrap());
            }
            black_box(sum)
        });
    });
}

fn bench_fsingl_frame(c: &mut Criterion) {
    // A representative frame: 256 single precision samples.
    let mut bytes = Vec::new();
    for i in 0..256 {
        encode(RepCode::Fsingl, &Value::F32(i as f32 * 0.5), &mut bytes).unwrap();
    }
    c.bench_function("fsingl_decode_256", |b| {
        b.iter(|| {
            let mut cur = ByteCursor::new(&bytes);
            let mut sum = 0.0f64;
            while cur.remaining() > 0 {
                if let Value::F32(v) = decode(RepCode::Fsingl, &mut cur).unwrap() {
                    sum += f64::from(v);
                }
            }
            black_box(sum)
        });
    });
}

criterion_group!(benches, bench_uvari, bench_fsingl_frame);
criterion_main!(benches);
