use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::Add;

// row/col counts must fit into u8 together with index 0
pub(crate) const MAX_SIZE: usize = 254;

/// Expansion order everywhere a state is expanded. Fixed so tie-breaking
/// stays deterministic between runs.
pub(crate) const DIRECTIONS: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub r: u8,
    pub c: u8,
}

impl Pos {
    pub fn new(r: u8, c: u8) -> Pos {
        Pos { r, c }
    }

    pub fn dist(self, other: Pos) -> i32 {
        (i32::from(self.r) - i32::from(other.r)).abs()
            + (i32::from(self.c) - i32::from(other.c)).abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Right,
    Down,
    Left,
}

impl Dir {
    pub fn inverse(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Right => Dir::Left,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
        }
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = match *self {
            Dir::Up => 'u',
            Dir::Right => 'r',
            Dir::Down => 'd',
            Dir::Left => 'l',
        };
        write!(f, "{}", c)
    }
}

impl Add<Dir> for Pos {
    type Output = Pos;

    // the parser guarantees a closed wall border so the result stays on the grid
    fn add(self, dir: Dir) -> Pos {
        match dir {
            Dir::Up => Pos { r: self.r - 1, c: self.c },
            Dir::Right => Pos { r: self.r, c: self.c + 1 },
            Dir::Down => Pos { r: self.r + 1, c: self.c },
            Dir::Left => Pos { r: self.r, c: self.c - 1 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MapCell {
    Empty,
    Wall,
    Goal,
}

impl Display for MapCell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = match *self {
            MapCell::Empty => ' ',
            MapCell::Wall => '#',
            MapCell::Goal => '.',
        };
        write!(f, "{}", c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Contents {
    Empty,
    Box,
    Player,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_arithmetic() {
        let pos = Pos::new(3, 4);
        assert_eq!(pos + Dir::Up, Pos::new(2, 4));
        assert_eq!(pos + Dir::Right, Pos::new(3, 5));
        assert_eq!(pos + Dir::Down, Pos::new(4, 4));
        assert_eq!(pos + Dir::Left, Pos::new(3, 3));
        for &dir in &DIRECTIONS {
            assert_eq!(pos + dir + dir.inverse(), pos);
        }
    }

    #[test]
    fn pos_dist() {
        assert_eq!(Pos::new(1, 1).dist(Pos::new(1, 4)), 3);
        assert_eq!(Pos::new(4, 4).dist(Pos::new(6, 2)), 4);
        assert_eq!(Pos::new(2, 3).dist(Pos::new(2, 3)), 0);
    }

    #[test]
    fn dir_formatting() {
        let dirs: String = DIRECTIONS.iter().map(|d| d.to_string()).collect();
        assert_eq!(dirs, "urdl");
    }
}
