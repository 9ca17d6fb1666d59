//! The sphere grid driven by the wave updater

use nalgebra::Point3;
use wavegrid_core::{Grid, GridConfig, VerticalOffset};
use wavegrid_gpu::InstanceRaw;

/// One sphere of the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereInstance {
    pub position: Point3<f32>,
}

impl SphereInstance {
    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            translation: [self.position.x, self.position.y, self.position.z],
        }
    }
}

impl VerticalOffset for SphereInstance {
    fn vertical_offset(&self) -> f64 {
        self.position.y as f64
    }

    fn set_vertical_offset(&mut self, y: f64) {
        self.position.y = y as f32;
    }
}

/// Spheres laid out on the `xz` plane, one per grid cell.
///
/// Cell `(i, j)` sits at `x = (i - rows / 2) * spacing`,
/// `z = (j - cols / 2) * spacing`; only `y` changes after construction.
#[derive(Debug, Clone)]
pub struct SphereGrid {
    grid: Grid<SphereInstance>,
    spacing: f32,
}

impl SphereGrid {
    pub fn new(rows: usize, cols: usize, spacing: f32) -> Self {
        let (half_rows, half_cols) = (rows as f32 * 0.5, cols as f32 * 0.5);
        let grid = Grid::from_fn(rows, cols, |i, j| SphereInstance {
            position: Point3::new((i as f32 - half_rows) * spacing, 0.0, (j as f32 - half_cols) * spacing),
        });
        Self { grid, spacing }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.rows, config.cols, config.spacing)
    }

    pub fn grid(&self) -> &Grid<SphereInstance> {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid<SphereInstance> {
        &mut self.grid
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Instance data for upload
    pub fn instances(&self) -> Vec<InstanceRaw> {
        self.grid.iter().map(SphereInstance::to_raw).collect()
    }

    /// Refill `out` with instance data, reusing its allocation
    pub fn write_instances(&self, out: &mut Vec<InstanceRaw>) {
        out.clear();
        out.extend(self.grid.iter().map(SphereInstance::to_raw));
    }
}
