use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fvr_codecs::archive;
use fvr_codecs::decoding::BitReader;
use fvr_codecs::image::{decode_image, ImagePayloadBuilder};
use rand::{Rng, SeedableRng};

fn do_all_accesses(br: &mut BitReader<'_>, accesses: &[u8]) -> u64 {
    let mut sum = 0;
    for x in accesses {
        sum += u64::from(br.next(*x));
    }
    let _ = black_box(br);
    sum
}

/// Text-like data: random words from a small vocabulary.
fn repetitive(rng: &mut impl Rng, len: usize) -> Vec<u8> {
    const WORDS: [&[u8]; 8] = [
        b"the ", b"panorama ", b"node ", b"cube ", b"face ", b"strip ", b"sound ", b"archive ",
    ];
    let mut data = Vec::with_capacity(len + 16);
    while data.len() < len {
        data.extend_from_slice(WORDS[rng.gen_range(0..WORDS.len())]);
    }
    data.truncate(len);
    data
}

fn bitreader_benchmark(c: &mut Criterion) {
    const DATA_SIZE: usize = 1024 * 1024;

    let mut rng = rand::rngs::SmallRng::seed_from_u64(0xDEADBEEF);
    let mut rand_vec = vec![];
    for _ in 0..DATA_SIZE {
        rand_vec.push(rng.gen());
    }

    let mut access_vec = vec![];
    let mut br = BitReader::new(&rand_vec);
    while br.bits_left() > 0 {
        let x = rng.gen_range(0..16);
        br.next(x);
        access_vec.push(x);
    }

    c.bench_function("bitreader", |b| {
        b.iter(|| {
            br.reset(&rand_vec);
            do_all_accesses(&mut br, &access_vec)
        })
    });
}

fn archive_benchmark(c: &mut Criterion) {
    let mut rng = rand::rngs::SmallRng::seed_from_u64(0xDEADBEEF);
    let data = repetitive(&mut rng, 256 * 1024);
    let packed = archive::compress(&data);

    c.bench_function("lz compress", |b| b.iter(|| archive::compress(black_box(&data))));
    c.bench_function("lz decompress", |b| {
        b.iter(|| archive::decompress(black_box(&packed)))
    });
}

fn image_benchmark(c: &mut Criterion) {
    const WIDTH: usize = 640;
    const HEIGHT: usize = 480;

    let mut rng = rand::rngs::SmallRng::seed_from_u64(0xDEADBEEF);
    let mut builder = ImagePayloadBuilder::default();
    for _ in 0..(WIDTH / 8) * (HEIGHT / 8) * 3 {
        let mut levels = [0i32; 64];
        levels[0] = rng.gen_range(0..256);
        for level in levels[1..12].iter_mut() {
            *level = rng.gen_range(-20..=20);
        }
        builder.push_block(&levels).unwrap();
    }
    let payload = builder.finish();

    c.bench_function("decode 640x480", |b| {
        b.iter(|| decode_image(black_box(&payload), WIDTH, HEIGHT, 50).unwrap())
    });
}

criterion_group!(benches, bitreader_benchmark, archive_benchmark, image_benchmark);
criterion_main!(benches);
