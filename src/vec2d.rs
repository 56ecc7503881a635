use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Index, IndexMut};

use crate::data::{MapCell, Pos};

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Vec2d<T> {
    data: Vec<T>,
    rows: u8,
    cols: u8,
}

impl<T> Vec2d<T> {
    pub(crate) fn rows(&self) -> u8 {
        self.rows
    }

    pub(crate) fn cols(&self) -> u8 {
        self.cols
    }

    pub(crate) fn create_scratchpad<U: Copy>(&self, default: U) -> Vec2d<U> {
        Vec2d {
            data: vec![default; self.data.len()],
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: Copy> Vec2d<T> {
    /// Ragged rows are padded with `default` up to the longest row.
    pub(crate) fn new(grid: &[Vec<T>], default: T) -> Self {
        assert!(!grid.is_empty() && !grid[0].is_empty());

        let max_cols = grid.iter().map(|row| row.len()).max().unwrap();
        let mut data = Vec::with_capacity(grid.len() * max_cols);
        for row in grid.iter() {
            data.extend_from_slice(row);
            for _ in row.len()..max_cols {
                data.push(default);
            }
        }
        Vec2d {
            data,
            rows: grid.len() as u8,
            cols: max_cols as u8,
        }
    }
}

impl Display for Vec2d<MapCell> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.cols.into()) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Display for Vec2d<bool> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.cols.into()) {
            for &cell in row {
                write!(f, "{}", if cell { 1 } else { 0 })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Debug for Vec2d<MapCell> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Debug for Vec2d<bool> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl<T> Index<Pos> for Vec2d<T> {
    type Output = T;

    fn index(&self, index: Pos) -> &Self::Output {
        let index = usize::from(index.r) * usize::from(self.cols) + usize::from(index.c);
        // unchecked indexing is only marginally faster (if at all) to justify unsafe
        &self.data[index]
    }
}

impl<T> IndexMut<Pos> for Vec2d<T> {
    fn index_mut(&mut self, index: Pos) -> &mut Self::Output {
        let index = usize::from(index.r) * usize::from(self.cols) + usize::from(index.c);
        &mut self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_and_indexing() {
        let rows = vec![
            vec![MapCell::Wall, MapCell::Wall, MapCell::Wall],
            vec![MapCell::Wall, MapCell::Goal],
        ];
        let grid = Vec2d::new(&rows, MapCell::Empty);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid[Pos::new(1, 1)], MapCell::Goal);
        // the short row is padded
        assert_eq!(grid[Pos::new(1, 2)], MapCell::Empty);
    }

    #[test]
    fn scratchpad_matches_dimensions() {
        let rows = vec![vec![MapCell::Wall; 4], vec![MapCell::Wall; 4]];
        let grid = Vec2d::new(&rows, MapCell::Empty);
        let mut pad = grid.create_scratchpad(false);
        assert_eq!(pad.rows(), grid.rows());
        assert_eq!(pad.cols(), grid.cols());
        pad[Pos::new(0, 3)] = true;
        assert_eq!(format!("{}", pad), "0001\n0000\n");
    }
}
