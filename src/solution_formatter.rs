use std::fmt::{self, Debug, Display, Formatter};

use crate::map::GoalMap;
use crate::moves::Moves;
use crate::state::State;

/// Replays a solution as a sequence of XSB frames.
///
/// Prints the initial state, then one frame per push. With `include_steps`
/// it also prints a frame for every walk move in between.
#[derive(Clone, Copy)]
pub struct SolutionFormatter<'a> {
    map: &'a GoalMap,
    initial_state: &'a State,
    moves: &'a Moves,
    include_steps: bool,
}

impl<'a> SolutionFormatter<'a> {
    pub fn new(
        map: &'a GoalMap,
        initial_state: &'a State,
        moves: &'a Moves,
        include_steps: bool,
    ) -> Self {
        Self {
            map,
            initial_state,
            moves,
            include_steps,
        }
    }
}

impl Display for SolutionFormatter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // TODO verify moves (somebody could pass moves from a different level)

        writeln!(f, "{}", self.map.format_with_state(self.initial_state))?;
        let mut last_state = self.initial_state.clone();
        for mov in self.moves {
            let new_player_pos = last_state.player_pos + mov.dir;
            let new_boxes = last_state
                .boxes
                .iter()
                .cloned()
                .map(|b| if b == new_player_pos { b + mov.dir } else { b })
                .collect();
            let new_state = State::new(new_player_pos, new_boxes);
            if mov.is_push || self.include_steps {
                writeln!(f, "{}", self.map.format_with_state(&new_state))?;
            }
            last_state = new_state;
        }
        Ok(())
    }
}

impl Debug for SolutionFormatter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Method;
    use crate::level::Level;
    use crate::solver::SearchResult;
    use crate::Solve;

    fn solve_bfs(level: &Level) -> crate::solver::Solution {
        match level.solve(Method::Bfs { prune: false }, &mut ()) {
            SearchResult::Solved(solution) => solution,
            SearchResult::NoSolution(_) => panic!("expected a solution"),
        }
    }

    #[test]
    fn replaying_pushes_only() {
        let level: Level = "
######
#@$ .#
######
"
        .trim_start_matches('\n')
        .parse()
        .unwrap();
        let solution = solve_bfs(&level);

        let formatted =
            SolutionFormatter::new(&level.map, &level.state, &solution.moves, false).to_string();
        let expected = "
######
#@$ .#
######

######
# @$.#
######

######
#  @*#
######

"
        .trim_start_matches('\n');
        assert_eq!(formatted, expected);
    }

    #[test]
    fn replaying_all_steps() {
        let level: Level = "
#####
# @ #
#.$ #
#####
"
        .trim_start_matches('\n')
        .parse()
        .unwrap();
        let solution = solve_bfs(&level);

        let frames =
            SolutionFormatter::new(&level.map, &level.state, &solution.moves, true).to_string();
        // one frame per move plus the initial state
        let frame_cnt = frames.matches('@').count() + frames.matches('+').count();
        assert_eq!(frame_cnt, solution.moves.move_cnt() + 1);
    }
}
