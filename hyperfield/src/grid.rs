use std::collections::BTreeSet;

use itertools::Itertools;

use crate::cell::{Cell, CellState};

/// The hyper-grid of one game instance.
///
/// All cells live in one flat arena indexed by linearized coordinate;
/// adjacency is stored as indices into that arena. A cell for every
/// coordinate exists for the whole lifetime of the grid.
#[derive(Clone, Debug)]
pub struct Grid {
    dimensions: Vec<usize>,
    wrap: Vec<bool>,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds the grid and computes every cell's adjacency set exactly once.
    ///
    /// A wrap vector shorter than the dimension vector is padded with
    /// `false`. Building is total for any validated configuration; callers
    /// must reject more than 6 axes and empty axes upfront.
    pub fn build(dimensions: &[usize], wrap: &[bool]) -> Self {
        let wrap = dimensions
            .iter()
            .enumerate()
            .map(|(axis, _)| wrap.get(axis).copied().unwrap_or(false))
            .collect_vec();

        let cell_count = dimensions.iter().product();
        let cells = (0..cell_count)
            .map(|index| Cell::new(coordinates_of(index, dimensions)))
            .collect_vec();

        let mut grid = Self {
            dimensions: dimensions.to_vec(),
            wrap,
            cells,
        };
        for index in 0..cell_count {
            let adjacent = grid.adjacent_set(index).into_iter().collect();
            grid.cells[index].set_adjacent(adjacent);
        }
        grid
    }

    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    pub fn wrap(&self) -> &[bool] {
        &self.wrap
    }

    /// The total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    /// Resolves a coordinate tuple to its arena index.
    ///
    /// Returns [`None`] if the tuple has the wrong length or any axis is out
    /// of range.
    pub fn index_of(&self, coordinates: &[usize]) -> Option<usize> {
        if coordinates.len() != self.dimensions.len() {
            return None;
        }
        coordinates
            .iter()
            .zip(&self.dimensions)
            .try_fold(0, |index, (&coordinate, &size)| {
                (coordinate < size).then_some(index * size + coordinate)
            })
    }

    /// The number of neighboring cells that hold a mine.
    pub fn adjacent_mines(&self, index: usize) -> usize {
        self.cell(index)
            .adjacent()
            .iter()
            .filter(|&&neighbor| self.cell(neighbor).is_mine())
            .count()
    }

    /// Indices of all neighbors currently in the given state.
    pub fn neighbors_in(&self, index: usize, state: CellState) -> impl Iterator<Item = usize> + '_ {
        self.cell(index)
            .adjacent()
            .iter()
            .copied()
            .filter(move |&neighbor| self.cell(neighbor).state() == state)
    }

    /// All existing neighbors of a cell as a set of arena indices.
    ///
    /// Enumerates the `3^d - 1` offset vectors; on wrapping axes the neighbor
    /// coordinate is taken modulo the axis size, on non-wrapping axes an
    /// out-of-range candidate drops the whole offset. The candidate equal to
    /// the cell itself (after wrapping) is excluded, which also collapses
    /// wrapped axes of size 1, and the set keeps wrapped axes of size 2 from
    /// producing duplicates.
    fn adjacent_set(&self, index: usize) -> BTreeSet<usize> {
        let coordinates = self.cells[index].coordinates().to_vec();
        self.dimensions
            .iter()
            .map(|_| -1isize..=1)
            .multi_cartesian_product()
            .filter_map(|offset| self.offset_coordinates(&coordinates, &offset))
            .filter(|candidate| *candidate != coordinates)
            .map(|candidate| {
                self.index_of(&candidate)
                    .expect("adjacent coordinates should be within bounds")
            })
            .collect()
    }

    fn offset_coordinates(&self, coordinates: &[usize], offset: &[isize]) -> Option<Vec<usize>> {
        coordinates
            .iter()
            .zip(offset)
            .enumerate()
            .map(|(axis, (&coordinate, &delta))| {
                let size = self.dimensions[axis] as isize;
                let position = coordinate as isize + delta;
                if self.wrap[axis] {
                    Some(position.rem_euclid(size) as usize)
                } else {
                    (0..size).contains(&position).then_some(position as usize)
                }
            })
            .collect()
    }
}

fn coordinates_of(mut index: usize, dimensions: &[usize]) -> Vec<usize> {
    let mut coordinates = vec![0; dimensions.len()];
    for (coordinate, &size) in coordinates.iter_mut().zip(dimensions).rev() {
        *coordinate = index % size;
        index /= size;
    }
    coordinates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_and_indices_round_trip() {
        let grid = Grid::build(&[3, 4, 5], &[]);
        assert_eq!(grid.len(), 60);
        for index in 0..grid.len() {
            let coordinates = grid.cell(index).coordinates();
            assert_eq!(grid.index_of(coordinates), Some(index));
        }
        assert_eq!(grid.index_of(&[0, 0]), None);
        assert_eq!(grid.index_of(&[0, 0, 5]), None);
    }

    #[test]
    fn adjacency_is_symmetric() {
        for wrap in [[false, false], [true, false], [true, true]] {
            let grid = Grid::build(&[3, 4], &wrap);
            for index in 0..grid.len() {
                for &neighbor in grid.cell(index).adjacent() {
                    assert!(
                        grid.cell(neighbor).adjacent().contains(&index),
                        "asymmetric adjacency between {index} and {neighbor} with wrap {wrap:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn adjacency_never_exceeds_the_offset_count() {
        let grid = Grid::build(&[3, 3, 3], &[true, false, true]);
        for index in 0..grid.len() {
            assert!(grid.cell(index).adjacent().len() <= 3usize.pow(3) - 1);
        }
    }

    #[test]
    fn interior_and_corner_cells_of_a_plane() {
        let grid = Grid::build(&[5, 5], &[]);
        let center = grid.index_of(&[2, 2]).unwrap();
        assert_eq!(grid.cell(center).adjacent().len(), 8);
        let corner = grid.index_of(&[0, 0]).unwrap();
        assert_eq!(grid.cell(corner).adjacent().len(), 3);
    }

    #[test]
    fn a_fully_wrapped_plane_has_no_edges() {
        let grid = Grid::build(&[3, 3], &[true, true]);
        for index in 0..grid.len() {
            assert_eq!(grid.cell(index).adjacent().len(), 8);
        }
    }

    #[test]
    fn wrapping_joins_the_ends_of_a_line() {
        let open = Grid::build(&[3], &[]);
        assert_eq!(open.cell(0).adjacent(), [1]);
        let wrapped = Grid::build(&[3], &[true]);
        assert_eq!(wrapped.cell(0).adjacent(), [1, 2]);
    }

    #[test]
    fn wrapped_short_axes_do_not_duplicate_neighbors() {
        // On a wrapped axis of size 2 the -1 and +1 offsets hit the same cell.
        let grid = Grid::build(&[2, 3], &[true, false]);
        let index = grid.index_of(&[0, 0]).unwrap();
        let adjacent = grid.cell(index).adjacent();
        assert_eq!(adjacent.len(), 3);
        let unique: BTreeSet<_> = adjacent.iter().collect();
        assert_eq!(unique.len(), adjacent.len());
    }

    #[test]
    fn a_wrapped_single_cell_axis_has_no_self_edge() {
        let grid = Grid::build(&[1, 3], &[true, false]);
        let index = grid.index_of(&[0, 1]).unwrap();
        assert!(!grid.cell(index).adjacent().contains(&index));
        assert_eq!(grid.cell(index).adjacent().len(), 2);
    }
}
