use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use readroom::{
    core::state::{ListState, LoadKind, Message},
    domain::page::{Cursor, Page},
    test_helpers::TestItem,
    KeyedList,
};

const PAGE_SIZE: usize = 50;

fn page(start: usize, overlap: usize) -> Vec<TestItem> {
    let first = start.saturating_sub(overlap);
    (first..start + PAGE_SIZE)
        .map(|i| TestItem::new(&format!("item-{i}")))
        .collect()
}

fn load_pages(pages: usize, overlap: usize) -> ListState<TestItem> {
    let mut state = ListState::new();
    for n in 0..pages {
        let kind = if n == 0 {
            LoadKind::Refresh
        } else {
            LoadKind::LoadMore
        };
        state.update(Message::Started(kind));
        state.update(Message::PageArrived {
            kind,
            page: Page::new(
                page(n * PAGE_SIZE, overlap),
                Some(Cursor::new(format!("c{n}"))),
                false,
            ),
        });
    }
    state
}

fn bench_append_new(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed_list_append_new");
    for size in [100, 1_000, 10_000] {
        let items: Vec<TestItem> = (0..size)
            .map(|i| TestItem::new(&format!("item-{}", i % (size / 2))))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| {
                let mut list = KeyedList::new();
                black_box(list.append_new(items.iter().cloned()))
            })
        });
    }
    group.finish();
}

fn bench_paged_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_state_paged_merge");
    for overlap in [0, 10] {
        group.bench_with_input(
            BenchmarkId::new("20_pages", format!("overlap_{overlap}")),
            &overlap,
            |b, &overlap| b.iter(|| black_box(load_pages(20, overlap).len())),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_append_new, bench_paged_merge);
criterion_main!(benches);
