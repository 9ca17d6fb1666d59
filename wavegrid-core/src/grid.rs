//! Fixed-size two-dimensional grid with row-major storage

use std::ops::{Index, IndexMut};

/// A `rows × cols` grid stored as one flat, row-major `Vec`.
///
/// The dimensions are fixed at construction; there is no way to grow or
/// shrink a grid afterwards, so `len() == rows * cols` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `fill`
    pub fn new(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    /// Create a grid by evaluating `f(i, j)` for every cell
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut cells = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                cells.push(f(i, j));
            }
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of cell `(i, j)`
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.cols + j
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        if i < self.rows && j < self.cols {
            self.cells.get(self.index(i, j))
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut T> {
        if i < self.rows && j < self.cols {
            let idx = self.index(i, j);
            self.cells.get_mut(idx)
        } else {
            None
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.cells.iter_mut()
    }

    /// Iterate over `((i, j), &cell)` in row-major order
    pub fn indexed_iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| ((idx / cols, idx % cols), cell))
    }

    /// Iterate mutably over `((i, j), &mut cell)` in row-major order
    pub fn indexed_iter_mut(&mut self) -> impl Iterator<Item = ((usize, usize), &mut T)> {
        let cols = self.cols;
        self.cells
            .iter_mut()
            .enumerate()
            .map(move |(idx, cell)| ((idx / cols, idx % cols), cell))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        assert!(i < self.rows && j < self.cols, "cell ({i}, {j}) out of bounds");
        &self.cells[i * self.cols + j]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        assert!(i < self.rows && j < self.cols, "cell ({i}, {j}) out of bounds");
        &mut self.cells[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let grid = Grid::from_fn(3, 4, |i, j| (i, j));
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.index(1, 2), 6);
        assert_eq!(grid.as_slice()[6], (1, 2));
        assert_eq!(grid[(2, 3)], (2, 3));
    }

    #[test]
    fn test_out_of_bounds_get() {
        let grid = Grid::new(2, 2, 0u8);
        assert!(grid.get(2, 0).is_none());
        assert!(grid.get(0, 2).is_none());
        assert_eq!(grid.get(1, 1), Some(&0));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_index_panics_on_column_overflow() {
        // (0, 3) would alias (1, 0) in flat storage without the bounds check
        let grid = Grid::new(2, 3, 0u8);
        let _ = grid[(0, 3)];
    }

    #[test]
    fn test_indexed_iter_matches_coordinates() {
        let mut grid = Grid::new(5, 7, (0, 0));
        for ((i, j), cell) in grid.indexed_iter_mut() {
            *cell = (i, j);
        }
        for ((i, j), cell) in grid.indexed_iter() {
            assert_eq!(*cell, (i, j));
        }
    }
}
