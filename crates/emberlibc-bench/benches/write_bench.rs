//! Write-engine benchmarks: binary passthrough vs. text-mode newline
//! translation through the in-memory provider.

use criterion::{Criterion, criterion_group, criterion_main};

use emberlibc_core::Context;
use emberlibc_fixture_exec::MemProvider;

const PAYLOAD_LEN: usize = 64 * 1024;

fn bench_binary_write(c: &mut Criterion) {
    let payload = vec![0xA5u8; PAYLOAD_LEN];
    c.bench_function("fwrite_binary_64k", |b| {
        b.iter(|| {
            let mut ctx = Context::new(MemProvider::new(), 4);
            let id = ctx.fopen("BENCH.BIN", "wb").expect("open");
            criterion::black_box(ctx.fwrite(&payload, 1, payload.len(), id));
            ctx.fclose(id);
        });
    });
}

fn bench_text_write(c: &mut Criterion) {
    let mut payload = vec![b'x'; PAYLOAD_LEN];
    for byte in payload.iter_mut().step_by(64) {
        *byte = b'\n';
    }
    c.bench_function("fwrite_text_64k", |b| {
        b.iter(|| {
            let mut ctx = Context::new(MemProvider::new(), 4);
            let id = ctx.fopen("BENCH.TXT", "w").expect("open");
            ctx.set_text_mode(id, true);
            criterion::black_box(ctx.fwrite(&payload, 1, payload.len(), id));
            ctx.fclose(id);
        });
    });
}

criterion_group!(benches, bench_binary_write, bench_text_write);
criterion_main!(benches);
