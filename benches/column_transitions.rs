use column_state::column_ops::{lock_cols, move_right, move_to_back, unlock_cols, update_sort};
use column_state::data::{Column, ColumnSet, SortOrder, SortSpec};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn create_columns(count: usize, locked: usize) -> ColumnSet {
    let columns = (0..count)
        .map(|i| {
            Column::new(format!("col_{}", i))
                .with_dtype(if i % 3 == 0 { "float64" } else { "int64" })
                .with_locked(i < locked)
        })
        .collect();
    ColumnSet::new(columns).unwrap()
}

fn benchmark_moves(c: &mut Criterion) {
    let wide = create_columns(500, 5);

    let mut group = c.benchmark_group("column_moves");

    group.bench_function("move_right_500_cols", |b| {
        b.iter(|| move_right(black_box("col_250"), &wide, "1"));
    });

    group.bench_function("move_to_back_500_cols", |b| {
        b.iter(|| move_to_back(black_box("col_10"), &wide, "1"));
    });

    group.finish();
}

fn benchmark_locking(c: &mut Criterion) {
    let wide = create_columns(500, 5);
    let to_lock: Vec<String> = (100..120).map(|i| format!("col_{}", i)).collect();
    let to_unlock: Vec<String> = (0..3).map(|i| format!("col_{}", i)).collect();

    let mut group = c.benchmark_group("column_locking");

    group.bench_function("lock_20_of_500", |b| {
        b.iter(|| lock_cols(black_box(&to_lock), &wide, "1"));
    });

    group.bench_function("unlock_3_of_500", |b| {
        b.iter(|| unlock_cols(black_box(&to_unlock), &wide, "1"));
    });

    group.finish();
}

fn benchmark_sort(c: &mut Criterion) {
    let existing: Vec<String> = (0..50).map(|i| format!("col_{}", i)).collect();
    let sort = update_sort(&existing, SortOrder::Ascending, &SortSpec::new())
        .change
        .sort_info
        .unwrap_or_default();
    let selected = vec!["col_10".to_string(), "col_60".to_string()];

    c.bench_function("update_sort_50_entries", |b| {
        b.iter(|| update_sort(black_box(&selected), SortOrder::Descending, &sort));
    });
}

criterion_group!(benches, benchmark_moves, benchmark_locking, benchmark_sort);
criterion_main!(benches);
