use std::fmt;
use std::fmt::{Debug, Display, Formatter};

use crate::map::GoalMap;
use crate::map_formatter::MapFormatter;
use crate::moves::Moves;
use crate::solution_formatter::SolutionFormatter;
use crate::state::State;

/// A parsed puzzle: static geometry plus the starting state.
#[derive(Clone)]
pub struct Level {
    pub map: GoalMap,
    pub state: State,
}

impl Level {
    pub(crate) fn new(map: GoalMap, state: State) -> Self {
        Level { map, state }
    }

    pub fn xsb(&self) -> MapFormatter<'_> {
        self.map.format_with_state(&self.state)
    }

    pub fn xsb_solution<'a>(&'a self, moves: &'a Moves, include_steps: bool) -> SolutionFormatter<'a> {
        SolutionFormatter::new(&self.map, &self.state, moves, include_steps)
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.xsb())
    }
}

impl Debug for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.xsb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_level() {
        let xsb: &str = r"
#####
#@$.#
# *.#
#  $#
#####
"
        .trim_start_matches('\n');

        let level: Level = xsb.parse().unwrap();
        assert_eq!(level.to_string(), xsb);
        assert_eq!(level.xsb().to_string(), xsb);
        assert_eq!(format!("{}", level), xsb);
        assert_eq!(format!("{:?}", level), xsb);
        assert_eq!(level.map.format_with_state(&level.state).to_string(), xsb);
    }
}
