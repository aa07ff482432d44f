//! 匹配结果转换基准测试
//!
//! - normalize_in_place: native regmatch_t -> MatchSpan over a full buffer
//! - execute: regexec plus conversion, as the host sees it

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fingerprint_ffi::posix_regex::matches::{normalize_in_place, MatchSpan, MATCH_COUNT};
use fingerprint_ffi::posix_regex::{CompileFlags, ExecFlags, PosixRegex};
use std::mem::size_of;

fn bench_normalize(c: &mut Criterion) {
    let stride = size_of::<libc::regmatch_t>().max(size_of::<MatchSpan>());
    let words = MATCH_COUNT * stride / 8;
    let template: Vec<libc::regmatch_t> = (0..MATCH_COUNT)
        .map(|i| libc::regmatch_t {
            rm_so: i as _,
            rm_eo: (i + 1) as _,
        })
        .collect();

    c.bench_function("normalize_in_place_256", |b| {
        let mut buf = vec![0u64; words];
        b.iter(|| {
            let base = buf.as_mut_ptr() as *mut libc::regmatch_t;
            unsafe {
                std::ptr::copy_nonoverlapping(template.as_ptr(), base, MATCH_COUNT);
                normalize_in_place::<libc::regmatch_t>(base.cast(), MATCH_COUNT);
            }
            black_box(&buf);
        });
    });
}

fn bench_execute(c: &mut Criterion) {
    let mut regex =
        PosixRegex::compile("([a-z]+)@([a-z]+)\\.com", CompileFlags::EXTENDED).unwrap();
    let subject = "contact: someone@example.com, thanks";

    c.bench_function("execute_with_groups", |b| {
        b.iter(|| {
            black_box(regex.execute_str(black_box(subject), ExecFlags::empty()).is_some());
        });
    });
}

criterion_group!(benches, bench_normalize, bench_execute);
criterion_main!(benches);
