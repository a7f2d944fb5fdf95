use std::{collections::HashMap, hint::black_box};

use criterion::{Criterion, criterion_group, criterion_main};
use outline_bridge_engine::FormatBridge;
mod common;

fn bench_render_to_html(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_to_html");
    group.sample_size(20);

    let bridge = FormatBridge::default();
    let message = common::generate_chat_message(20);
    group.bench_function("chat_message", |b| {
        b.iter(|| black_box(bridge.render_to_html(black_box(&message))));
    });

    let lists = common::generate_nested_list(50, 4);
    group.bench_function("nested_lists", |b| {
        b.iter(|| black_box(bridge.render_to_html(black_box(&lists))));
    });

    let hostile = common::generate_hostile_html_message(50);
    group.bench_function("hostile_markup", |b| {
        b.iter(|| black_box(bridge.render_to_html(black_box(&hostile))));
    });

    group.bench_function("cached_hit", |b| {
        let mut cache = HashMap::new();
        bridge.render_to_html_cached(&message, &mut cache);
        b.iter(|| black_box(bridge.render_to_html_cached(black_box(&message), &mut cache)));
    });

    group.finish();
}

fn bench_outline(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline");
    group.sample_size(20);

    let bridge = FormatBridge::default();
    let message = common::generate_chat_message(20);
    let outline = bridge.to_outline_format(&message);

    group.bench_function("to_outline_format", |b| {
        b.iter(|| black_box(bridge.to_outline_format(black_box(&message))));
    });
    group.bench_function("from_outline_format", |b| {
        b.iter(|| black_box(bridge.from_outline_format(black_box(&outline))));
    });

    group.finish();
}

criterion_group!(benches, bench_render_to_html, bench_outline);
criterion_main!(benches);
