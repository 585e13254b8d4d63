use criterion::{black_box, criterion_group, criterion_main, Criterion};
use han_decode::frame::scan;
use han_decode::source::ByteSource;

struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteSource for SliceSource<'a> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let remaining = self.data.len() - self.pos;
        let n = remaining.min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

const S1_FRAME: &[u8] = &[
    0x7E, 0xA0, 0x2A, 0x41, 0x08, 0x83, 0x13, 0x04, 0x13, 0xE6, 0xE7, 0x00, 0x0F, 0x40, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x01, 0x02, 0x03, 0x09, 0x06, 0x01, 0x00, 0x01, 0x07, 0x00, 0xFF, 0x06, 0x00,
    0x00, 0x0E, 0x90, 0x02, 0x02, 0x0F, 0x00, 0x16, 0x1B, 0x77, 0x24, 0x7E,
];

fn clean_stream(frame_count: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(S1_FRAME.len() * frame_count);
    for _ in 0..frame_count {
        data.extend_from_slice(S1_FRAME);
    }
    data
}

fn noisy_stream(frame_count: usize, noise_bytes: usize) -> Vec<u8> {
    let mut data = Vec::new();
    for _ in 0..frame_count {
        data.extend(std::iter::repeat(0x5Au8).take(noise_bytes));
        data.extend_from_slice(S1_FRAME);
    }
    data
}

fn bench_scan_clean_stream(c: &mut Criterion) {
    let data = clean_stream(64);
    c.bench_function("scan_64_clean_frames", |b| {
        b.iter(|| {
            let mut source = SliceSource {
                data: black_box(&data),
                pos: 0,
            };
            let mut count = 0usize;
            scan(&mut source, |_frame| {
                count += 1;
                Ok(())
            })
            .unwrap();
            black_box(count)
        })
    });
}

fn bench_scan_noisy_stream(c: &mut Criterion) {
    let data = noisy_stream(64, 256);
    c.bench_function("scan_64_frames_with_noise", |b| {
        b.iter(|| {
            let mut source = SliceSource {
                data: black_box(&data),
                pos: 0,
            };
            let mut count = 0usize;
            scan(&mut source, |_frame| {
                count += 1;
                Ok(())
            })
            .unwrap();
            black_box(count)
        })
    });
}

criterion_group!(benches, bench_scan_clean_stream, bench_scan_noisy_stream);
criterion_main!(benches);
