use std::fmt;
use std::fmt::{Debug, Display, Formatter};

use crate::data::{MapCell, Pos};
use crate::map_formatter::MapFormatter;
use crate::state::State;
use crate::vec2d::Vec2d;

#[derive(Clone)]
pub struct GoalMap {
    pub(crate) grid: Vec2d<MapCell>,
    pub(crate) goals: Vec<Pos>,
}

impl GoalMap {
    pub(crate) fn new(grid: Vec2d<MapCell>, goals: Vec<Pos>) -> Self {
        GoalMap { grid, goals }
    }

    /// Exact match of boxes and goals - box and goal counts are equal
    /// so covering every box covers every goal.
    pub fn is_solved(&self, state: &State) -> bool {
        state.boxes.iter().all(|&b| self.grid[b] == MapCell::Goal)
    }

    pub fn format_with_state<'a>(&'a self, state: &'a State) -> MapFormatter<'a> {
        MapFormatter::new(&self.grid, Some(state))
    }
}

impl Display for GoalMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", MapFormatter::new(&self.grid, None))
    }
}

impl Debug for GoalMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use crate::level::Level;

    #[test]
    fn formatting_map() {
        let xsb_level: &str = r"
*###*
#@$.#
*###*#
"
        .trim_start_matches('\n');
        let xsb_map: &str = "
.###.
#  .#
.###.#
"
        .trim_start_matches('\n');

        let level: Level = xsb_level.parse().unwrap();
        assert_eq!(format!("{}", level.map), xsb_map);
        assert_eq!(format!("{:?}", level.map), xsb_map);
    }

    #[test]
    fn solved_states() {
        let level: Level = "
#####
#@$.#
#####
"
        .trim_start_matches('\n')
        .parse()
        .unwrap();
        assert!(!level.map.is_solved(&level.state));

        let solved: Level = "
#####
#@*##
#####
"
        .trim_start_matches('\n')
        .parse()
        .unwrap();
        assert!(solved.map.is_solved(&solved.state));
    }
}
