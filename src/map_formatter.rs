use std::fmt::{self, Debug, Display, Formatter};

use crate::data::{Contents, MapCell, Pos};
use crate::state::State;
use crate::vec2d::Vec2d;

/// Renders a grid back to XSB text, optionally with a state overlaid.
#[derive(Clone, Copy)]
pub struct MapFormatter<'a> {
    grid: &'a Vec2d<MapCell>,
    state: Option<&'a State>,
}

impl<'a> MapFormatter<'a> {
    pub(crate) fn new(grid: &'a Vec2d<MapCell>, state: Option<&'a State>) -> Self {
        Self { grid, state }
    }

    fn write_to_formatter(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut state_grid = self.grid.create_scratchpad(Contents::Empty);
        if let Some(state) = self.state {
            for &b in &state.boxes {
                state_grid[b] = Contents::Box;
            }
            state_grid[state.player_pos] = Contents::Player;
        }

        for r in 0..self.grid.rows() {
            // don't print trailing empty cells to match the input level strings
            let mut last_non_empty = 0;
            for c in 0..self.grid.cols() {
                let pos = Pos::new(r, c);
                if self.grid[pos] != MapCell::Empty || state_grid[pos] != Contents::Empty {
                    last_non_empty = pos.c;
                }
            }

            for c in 0..=last_non_empty {
                let pos = Pos::new(r, c);
                Self::write_cell_xsb(self.grid[pos], state_grid[pos], f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_cell_xsb(cell: MapCell, contents: Contents, f: &mut Formatter<'_>) -> fmt::Result {
        match (cell, contents) {
            (MapCell::Empty, Contents::Empty) => write!(f, " "),
            (MapCell::Empty, Contents::Box) => write!(f, "$"),
            (MapCell::Empty, Contents::Player) => write!(f, "@"),
            (MapCell::Wall, Contents::Empty) => write!(f, "#"),
            (MapCell::Wall, _) => unreachable!("Wall with non-empty contents"),
            (MapCell::Goal, Contents::Empty) => write!(f, "."),
            (MapCell::Goal, Contents::Box) => write!(f, "*"),
            (MapCell::Goal, Contents::Player) => write!(f, "+"),
        }
    }
}

impl<'a> Display for MapFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_to_formatter(f)
    }
}

impl<'a> Debug for MapFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
