use std::time::{Duration, Instant};

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use taja::engine::live_stats::{StatsEngine, StatsInput, StatsOptions, calculate};
use taja::engine::perf::PerfMonitor;
use taja::generator::Language;
use taja::hangul::composer::compose_keys;
use taja::hangul::sliding_visualization;
use taja::session::input::{Keystroke, Mistake, judge};

const SAMPLE_TEXT: &str = "다람쥐 헌 쳇바퀴에 타고파 키스의 고유조건은 입술끼리 만나야 하고 특별한 기술은 필요치 않다";

fn make_history(count: usize, start: Instant) -> (Vec<Keystroke>, Vec<Mistake>) {
    let target: Vec<char> = SAMPLE_TEXT.chars().collect();
    let mut keystrokes = Vec::with_capacity(count);
    let mut mistakes = Vec::new();
    let mut previous = start;
    for i in 0..count {
        let now = start + Duration::from_millis(150 * (i as u64 + 1));
        let expected = target[i % target.len()];
        let actual = if i % 9 == 0 { 'x' } else { expected }; // ~11% error rate
        let (k, m) = judge(expected, actual, i, now, previous);
        keystrokes.push(k);
        mistakes.extend(m);
        previous = now;
    }
    (keystrokes, mistakes)
}

fn bench_calculate(c: &mut Criterion) {
    let (keystrokes, mistakes) = make_history(1000, Instant::now());
    let options = StatsOptions::default();

    c.bench_function("calculate (1000 keystrokes)", |b| {
        b.iter(|| {
            calculate(
                black_box(&keystrokes),
                black_box(mistakes.len()),
                black_box(900),
                black_box(150.0),
                &options,
            )
        })
    });
}

fn bench_recompute(c: &mut Criterion) {
    let start = Instant::now();
    let (keystrokes, mistakes) = make_history(1000, start);
    let now = start + Duration::from_secs(150);
    let mut engine = StatsEngine::new(StatsOptions::default());
    let mut perf = PerfMonitor::new();

    c.bench_function("StatsEngine::recompute (1000 keystrokes)", |b| {
        b.iter(|| {
            let input = StatsInput {
                keystrokes: black_box(&keystrokes),
                mistakes: black_box(&mistakes),
                started_at: Some(start),
                current_index: 900,
                now,
                language: Language::Korean,
            };
            engine.recompute(&input, &mut perf).cpm
        })
    });
}

fn bench_sliding_window(c: &mut Criterion) {
    let len = SAMPLE_TEXT.chars().count();

    c.bench_function("sliding_visualization (every cursor position)", |b| {
        b.iter(|| {
            for idx in 0..=len {
                black_box(sliding_visualization(black_box(SAMPLE_TEXT), idx, 5));
            }
        })
    });
}

fn bench_composer(c: &mut Criterion) {
    c.bench_function("compose_keys (pangram)", |b| {
        b.iter(|| compose_keys(black_box("ekfkawnl gjs cptkqkznldp xkrhvk")))
    });
}

criterion_group!(
    benches,
    bench_calculate,
    bench_recompute,
    bench_sliding_window,
    bench_composer
);
criterion_main!(benches);
