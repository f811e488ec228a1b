use criterion::{criterion_group, criterion_main, Criterion, black_box};

use mapedit::diff::DifferenceTracker;
use mapedit::history::{Action, ActionStack, ApplyAction};
use mapedit::scene::{ObjectId, ObjectRecord, SceneStore};

struct Sink;

impl ApplyAction for Sink {
    fn apply_action(&mut self, action: &Action) {
        black_box(action);
    }
}

fn records(count: usize) -> Vec<ObjectRecord> {
    (0..count)
        .map(|i| ObjectRecord::new(format!("obj-{i}"), "tree.glb", "gltf", [127.0 + i as f64 * 1e-4, 37.0]))
        .collect()
}

fn bench_push_coalesced(c: &mut Criterion) {
    let target = ObjectId::new("a");

    c.bench_function("push_coalesced_1000", |b| {
        b.iter(|| {
            let mut stack = ActionStack::new();
            for t in 0..1000u64 {
                stack.push(Action::position(target.clone(), 0.001, 0.0, black_box(t * 10)));
            }
            stack
        });
    });
}

fn bench_push_distinct(c: &mut Criterion) {
    let target = ObjectId::new("a");

    c.bench_function("push_distinct_1000", |b| {
        b.iter(|| {
            let mut stack = ActionStack::new();
            for t in 0..1000u64 {
                stack.push(Action::rotation(target.clone(), 1.0, black_box(t * 1000)));
            }
            stack
        });
    });
}

fn bench_undo_redo(c: &mut Criterion) {
    let target = ObjectId::new("a");
    let mut stack = ActionStack::new();
    for t in 0..1000u64 {
        stack.push(Action::scale(target.clone(), 0.1, t * 1000));
    }

    c.bench_function("undo_redo_1000", |b| {
        b.iter(|| {
            let mut sink = Sink;
            while stack.undo(&mut sink) {}
            while stack.redo(&mut sink) {}
        });
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let baseline = records(5000);
    let mut scene = SceneStore::from_records(baseline.clone());
    let mut tracker = DifferenceTracker::new();
    for (i, record) in baseline.iter().enumerate() {
        match i % 10 {
            0 => {
                scene.translate(&record.id, 0.01, 0.0);
                tracker.enlist(&record.id);
            }
            1 => tracker.remove(&record.id),
            _ => {}
        }
    }

    c.bench_function("reconcile_5000", |b| {
        b.iter(|| tracker.reconcile(black_box(baseline.clone()), &scene));
    });
}

criterion_group!(
    benches,
    bench_push_coalesced,
    bench_push_distinct,
    bench_undo_redo,
    bench_reconcile,
);
criterion_main!(benches);
