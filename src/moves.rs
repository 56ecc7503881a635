use std::fmt::{self, Debug, Display, Formatter};

use crate::data::Dir;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub dir: Dir,
    pub is_push: bool,
}

impl Move {
    pub(crate) fn new(dir: Dir, is_push: bool) -> Self {
        Move { dir, is_push }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_push {
            write!(f, "{}", self.dir.to_string().to_uppercase())
        } else {
            write!(f, "{}", self.dir)
        }
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A whole solution or a prefix of one, in the order the moves are made.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Moves(Vec<Move>);

impl Moves {
    pub(crate) fn new(moves: Vec<Move>) -> Self {
        Moves(moves)
    }

    pub fn move_cnt(&self) -> usize {
        self.0.len()
    }

    pub fn push_cnt(&self) -> usize {
        self.0.iter().filter(|m| m.is_push).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.0.iter()
    }
}

impl IntoIterator for Moves {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Moves {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for mov in self {
            write!(f, "{}", mov)?;
        }
        Ok(())
    }
}

impl Debug for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_dirs(is_push: bool) -> Vec<Move> {
        vec![
            Move::new(Dir::Up, is_push),
            Move::new(Dir::Right, is_push),
            Move::new(Dir::Down, is_push),
            Move::new(Dir::Left, is_push),
        ]
    }

    #[test]
    fn formatting_moves() {
        let mut moves = all_dirs(false);
        moves.extend(all_dirs(true));
        assert_eq!(Moves::new(moves).to_string(), "urdlURDL");
    }

    #[test]
    fn counting() {
        let pushes = Moves::new(all_dirs(true));
        let walks = Moves::new(all_dirs(false));

        assert_eq!(pushes.move_cnt(), 4);
        assert_eq!(pushes.push_cnt(), 4);
        assert_eq!(walks.move_cnt(), 4);
        assert_eq!(walks.push_cnt(), 0);
        assert!(!walks.is_empty());
        assert!(Moves::default().is_empty());
    }

    #[test]
    fn iterating() {
        let v = all_dirs(false);
        let moves = Moves::new(v.clone());

        let mut v2 = Vec::new();
        for &m in &moves {
            v2.push(m);
        }
        for &m in moves.iter() {
            v2.push(m);
        }
        for m in moves {
            v2.push(m);
        }

        assert_eq!(v2.len(), 12);
        for chunk in v2.chunks(4) {
            assert_eq!(chunk, &v[..]);
        }
    }
}
