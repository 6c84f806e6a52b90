use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo_roadgraph::{
    JunctionGeometryResolver, RoadElement, RoadGraphBuilder, RoadType,
};

/// A street grid with a vertex at every crossing, so every crossing becomes a junction.
fn generate_grid(n: usize) -> Vec<RoadElement> {
    let mut elements = Vec::new();
    let spacing = 50.0;
    for i in 0..=n {
        let c = i as f64 * spacing;
        let along: Vec<f64> = (0..=n).map(|k| k as f64 * spacing).collect();
        // Horizontal
        elements.push(RoadElement::new(
            2 * i as u64,
            RoadType::Car,
            6.0,
            2,
            along.iter().map(|&x| (x, c)).collect(),
        ));
        // Vertical
        elements.push(RoadElement::new(
            2 * i as u64 + 1,
            RoadType::Car,
            6.0,
            2,
            along.iter().map(|&y| (c, y)).collect(),
        ));
    }
    elements
}

fn bench_road_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("road_graph");
    group.sample_size(10); // Reduce sample size for speed

    for size in [5, 10, 20].iter() {
        group.bench_with_input(BenchmarkId::new("grid", size), size, |b, &size| {
            let elements = generate_grid(size);
            b.iter(|| {
                let mut builder = RoadGraphBuilder::new();
                builder.extend(elements.iter().cloned()).unwrap();
                let mut graph = builder.build().unwrap();
                JunctionGeometryResolver::new().resolve(&mut graph).unwrap();
                graph
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_road_graph);
criterion_main!(benches);
