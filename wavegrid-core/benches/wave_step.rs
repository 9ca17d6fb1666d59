use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use wavegrid_core::{Grid, SimplexField, WaveParams, WaveState, step};

const GRID_SIZES: [usize; 3] = [25, 50, 100];

fn wave_step(c: &mut Criterion) {
    let params = WaveParams::default();
    let noise = SimplexField::new(0);

    let mut g = c.benchmark_group("wave step");

    for size in GRID_SIZES {
        let mut grid = Grid::new(size, size, 0.0f64);
        let mut state = WaveState::default();
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                state = step(std::hint::black_box(state), &mut grid, &params, &noise);
            });
        });
    }

    g.finish();
}


criterion_group!(benches, wave_step);
criterion_main!(benches);
