//! Console benchmark: Measure append and per-frame reveal cost.
//!
//! Target: a full 40x8 drain in well under one 16ms frame budget

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::rc::Rc;
use typewriter::{ConsoleConfig, FrameTicker, GlyphGrid, TypewriterConsole};

const PARAGRAPH: &str = "The console re-paces every pending character whenever new text arrives,\n\
so a burst of output finishes inside the same reveal window as a single word.\n";

fn setup(window_ms: f64) -> (TypewriterConsole<GlyphGrid, FrameTicker>, Rc<FrameTicker>) {
    let ticker = Rc::new(FrameTicker::new());
    let config = ConsoleConfig::new(8, 40, window_ms, 10);
    let console = TypewriterConsole::initialize(config, GlyphGrid::new(8, 40), ticker.clone())
        .expect("valid console config");
    (console, ticker)
}

fn append_burst(c: &mut Criterion) {
    c.bench_function("console_append_paragraph", |b| {
        b.iter_batched(
            || setup(2000.0),
            |(mut console, ticker)| {
                console.append(black_box(PARAGRAPH)).expect("console alive");
                (console, ticker)
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("console_append_many_small", |b| {
        b.iter_batched(
            || setup(2000.0),
            |(mut console, ticker)| {
                for word in PARAGRAPH.split(' ') {
                    console.append(black_box(word)).expect("console alive");
                }
                (console, ticker)
            },
            BatchSize::SmallInput,
        );
    });
}

fn drain_with_scroll(c: &mut Criterion) {
    let text = PARAGRAPH.repeat(4);

    // Zero window reveals one unit per frame; a large window with 100ms
    // frames reveals many units per frame and scrolls repeatedly.
    c.bench_function("console_drain_4_paragraphs", |b| {
        b.iter_batched(
            || {
                let (mut console, ticker) = setup(2000.0);
                console.append(&text).expect("console alive");
                (console, ticker)
            },
            |(console, ticker)| {
                while console.is_running() {
                    ticker.advance(black_box(100.0));
                }
                (console, ticker)
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("console_frame_single_unit", |b| {
        b.iter_batched(
            || {
                let (mut console, ticker) = setup(0.0);
                console.append(&text).expect("console alive");
                (console, ticker)
            },
            |(console, ticker)| {
                ticker.advance(black_box(0.0));
                (console, ticker)
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, append_burst, drain_with_scroll);
criterion_main!(benches);
