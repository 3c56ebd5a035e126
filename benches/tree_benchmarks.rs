use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kd3::{BoundingRegion, KdTree, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_points(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Point::new(
                rng.gen_range(0.0..255.0),
                rng.gen_range(0.0..255.0),
                rng.gen_range(0.0..255.0),
            )
        })
        .collect()
}

fn build_tree(points: &[Point]) -> KdTree<usize> {
    let mut tree = KdTree::new();
    for (i, p) in points.iter().enumerate() {
        tree.insert(*p, i).unwrap();
    }
    tree
}

fn benchmark_basic_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("basic_operations");
    let points = random_points(10_000, 1);

    group.bench_function("insert_10k", |b| {
        b.iter(|| build_tree(black_box(&points)))
    });

    let tree = build_tree(&points);
    group.bench_function("search_hit", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % points.len();
            tree.search(black_box(&points[i]))
        })
    });

    group.bench_function("range_small_box", |b| {
        let low = Point::new(100.0, 100.0, 100.0);
        let high = Point::new(120.0, 120.0, 120.0);
        b.iter(|| tree.range(black_box(&low), black_box(&high)).len())
    });

    group.bench_function("range_unbounded", |b| {
        let all = BoundingRegion::unbounded();
        b.iter(|| tree.range_region(black_box(&all)).len())
    });

    group.finish();
}

fn benchmark_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    let targets = random_points(1_000, 2);

    for &size in &[1_000usize, 10_000, 100_000] {
        let tree = build_tree(&random_points(size, 3));
        group.bench_with_input(BenchmarkId::new("random_tree", size), &size, |b, _| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % targets.len();
                tree.nearest(black_box(&targets[i])).unwrap();
            })
        });
    }

    group.finish();
}

fn benchmark_match_and_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_and_delete");
    let palette = random_points(4_096, 4);
    let pixels = random_points(4_096, 5);

    group.bench_function("drain_palette", |b| {
        b.iter(|| {
            let mut tree = build_tree(&palette);
            for pixel in &pixels {
                black_box(tree.take_nearest(pixel).unwrap());
            }
        })
    });

    group.bench_function("drain_palette_with_rebuilds", |b| {
        b.iter(|| {
            let mut tree = build_tree(&palette);
            for (i, pixel) in pixels.iter().enumerate() {
                black_box(tree.take_nearest(pixel).unwrap());
                if i % 512 == 511 {
                    tree = tree.rebuild();
                }
            }
        })
    });

    group.finish();
}

fn benchmark_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");
    let points = random_points(20_000, 6);

    group.bench_function("rebuild_half_dead_20k", |b| {
        b.iter_with_setup(
            || {
                let mut tree = build_tree(&points);
                for p in points.iter().step_by(2) {
                    tree.delete(p).unwrap();
                }
                tree
            },
            |tree| tree.rebuild(),
        )
    });

    group.bench_function("bulk_load_20k", |b| {
        let entries: Vec<(Point, usize)> = points.iter().copied().zip(0..).collect();
        b.iter_with_setup(|| entries.clone(), |entries| KdTree::bulk_load(entries).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_basic_operations,
    benchmark_nearest,
    benchmark_match_and_delete,
    benchmark_rebuild
);

criterion_main!(benches);
