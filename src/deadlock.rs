use std::collections::VecDeque;

use log::debug;

use crate::data::{Dir, MapCell, Pos, DIRECTIONS};
use crate::map::GoalMap;
use crate::state::State;
use crate::vec2d::Vec2d;

/// Solvability probe over a reduced state, borrowed from the engine so the
/// corral detector can run a nested search without depending on it.
pub(crate) trait SubSearch {
    fn solvable(&self, start: State, is_goal: &mut dyn FnMut(&State) -> bool) -> bool;
}

/// Per-map deadlock precompute plus the three detectors. All of them are
/// conservative - they only flag states no push sequence can rescue.
pub(crate) struct Deadlocks {
    dead_squares: Vec2d<bool>,
}

impl Deadlocks {
    /// Pulls an imaginary box backwards from every goal. A square no pull
    /// can reach can never be pushed to a goal either, so a box there means
    /// the state is lost.
    pub(crate) fn analyze(map: &GoalMap) -> Self {
        let mut alive = map.grid.create_scratchpad(false);
        let mut to_visit = VecDeque::new();

        for &goal in &map.goals {
            alive[goal] = true;
            to_visit.push_back(goal);
        }

        while let Some(cur) = to_visit.pop_front() {
            for &dir in &DIRECTIONS {
                // a pull moves the box to `from` and the player to the cell
                // behind it - test `from` first so we never index outside
                // the wall border
                let from = cur + dir;
                if map.grid[from] == MapCell::Wall {
                    continue;
                }
                if map.grid[from + dir] == MapCell::Wall {
                    continue;
                }
                if !alive[from] {
                    alive[from] = true;
                    to_visit.push_back(from);
                }
            }
        }

        let mut dead_squares = map.grid.create_scratchpad(false);
        for r in 0..map.grid.rows() {
            for c in 0..map.grid.cols() {
                let pos = Pos::new(r, c);
                if map.grid[pos] != MapCell::Wall && !alive[pos] {
                    dead_squares[pos] = true;
                }
            }
        }
        debug!("dead squares:\n{}", dead_squares);

        Deadlocks { dead_squares }
    }

    /// Any box on a square it can never be pushed away from.
    pub(crate) fn simple(&self, state: &State) -> bool {
        state.boxes.iter().any(|&b| self.dead_squares[b])
    }

    /// Any box off goal that can't move on either axis. Boxes may be held
    /// in place by other boxes so this recurses sideways.
    pub(crate) fn freeze(&self, map: &GoalMap, state: &State) -> bool {
        state
            .boxes
            .iter()
            .any(|&b| self.frozen(map, state, b, &mut Vec::new()))
    }

    fn frozen(&self, map: &GoalMap, state: &State, pos: Pos, visiting: &mut Vec<Pos>) -> bool {
        if map.grid[pos] == MapCell::Goal {
            return false;
        }
        // a cycle of boxes propping each other up proves nothing,
        // treat it as movable
        if visiting.contains(&pos) {
            return false;
        }
        visiting.push(pos);
        let ret = self.blocked(map, state, pos, Dir::Up, visiting)
            && self.blocked(map, state, pos, Dir::Left, visiting);
        visiting.pop();
        ret
    }

    fn blocked(
        &self,
        map: &GoalMap,
        state: &State,
        pos: Pos,
        dir: Dir,
        visiting: &mut Vec<Pos>,
    ) -> bool {
        let side_a = pos + dir;
        let side_b = pos + dir.inverse();
        if map.grid[side_a] == MapCell::Wall || map.grid[side_b] == MapCell::Wall {
            return true;
        }
        if self.dead_squares[side_a] && self.dead_squares[side_b] {
            return true;
        }
        (state.has_box(side_a) && self.frozen(map, state, side_a, visiting))
            || (state.has_box(side_b) && self.frozen(map, state, side_b, visiting))
    }

    /// Only answers after a push - walking never creates a new corral. Finds
    /// the area the player got locked out of, keeps its boxes (the fence
    /// counts as inside) and checks whether they can still reach goals or
    /// escape. Corrals with the wrong number of goals are lost right away.
    pub(crate) fn corral(
        &self,
        map: &GoalMap,
        state: &State,
        pushed_box: bool,
        sub: &dyn SubSearch,
    ) -> bool {
        if !pushed_box {
            return false;
        }

        let reachable = player_reachable(map, state);

        let mut in_corral = map.grid.create_scratchpad(false);
        let mut to_visit = VecDeque::new();
        for r in 0..map.grid.rows() {
            for c in 0..map.grid.cols() {
                let pos = Pos::new(r, c);
                if map.grid[pos] == MapCell::Wall || reachable[pos] {
                    continue;
                }
                if self.dead_squares[pos] || state.has_box(pos) {
                    continue;
                }
                in_corral[pos] = true;
                to_visit.push_back(pos);
            }
        }
        if to_visit.is_empty() {
            return false;
        }

        // absorb the boxes fencing the area off (or stuck inside it)
        while let Some(cur) = to_visit.pop_front() {
            for &dir in &DIRECTIONS {
                let next = cur + dir;
                if map.grid[next] != MapCell::Wall && !reachable[next] && !in_corral[next] {
                    in_corral[next] = true;
                    to_visit.push_back(next);
                }
            }
        }

        let targets_inside = map.goals.iter().filter(|&&g| in_corral[g]).count();
        let boxes_inside: Vec<Pos> = state
            .boxes
            .iter()
            .cloned()
            .filter(|&b| in_corral[b])
            .collect();
        if targets_inside != boxes_inside.len() {
            debug!(
                "corral deadlock: {} boxes, {} goals inside",
                boxes_inside.len(),
                targets_inside
            );
            return true;
        }

        let reduced = State::new(state.player_pos, boxes_inside);
        let mut is_goal = |s: &State| {
            s.boxes.iter().any(|&b| !in_corral[b])
                || s.boxes.iter().all(|&b| map.grid[b] == MapCell::Goal)
        };
        let dead = !sub.solvable(reduced, &mut is_goal);
        if dead {
            debug!("corral deadlock: boxes can neither escape nor park");
        }
        dead
    }
}

/// Cells the player can walk to without pushing anything.
fn player_reachable(map: &GoalMap, state: &State) -> Vec2d<bool> {
    let mut reachable = map.grid.create_scratchpad(false);
    reachable[state.player_pos] = true;
    let mut to_visit = vec![state.player_pos];

    while let Some(cur) = to_visit.pop() {
        for &dir in &DIRECTIONS {
            let next = cur + dir;
            if map.grid[next] != MapCell::Wall && !state.has_box(next) && !reachable[next] {
                reachable[next] = true;
                to_visit.push(next);
            }
        }
    }

    reachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::solver::CorralProbe;

    fn parse(xsb: &str) -> Level {
        xsb.trim_start_matches('\n').parse().unwrap()
    }

    #[test]
    fn dead_squares_pull_reach() {
        let level = parse(
            r"
#####
##@##
##$##
#  .#
#####
",
        );
        let deadlocks = Deadlocks::analyze(&level.map);
        let expected = r"
00000
00100
00000
01000
00000
"
        .trim_start_matches('\n');
        assert_eq!(deadlocks.dead_squares.to_string(), expected);
    }

    #[test]
    fn simple_in_alcove() {
        let level = parse(
            r"
#####
#@$##
# .##
#####
",
        );
        let deadlocks = Deadlocks::analyze(&level.map);
        assert!(deadlocks.simple(&level.state));
    }

    #[test]
    fn simple_not_on_goal() {
        let level = parse(
            r"
#####
#@*##
#####
",
        );
        let deadlocks = Deadlocks::analyze(&level.map);
        assert!(!deadlocks.simple(&level.state));
    }

    #[test]
    fn freeze_corner_pair() {
        let level = parse(
            r"
#####
#$$ #
#@..#
#####
",
        );
        let deadlocks = Deadlocks::analyze(&level.map);
        assert!(deadlocks.freeze(&level.map, &level.state));
    }

    #[test]
    fn freeze_spares_goal_box() {
        let level = parse(
            r"
#####
#*$ #
#@ .#
#####
",
        );
        let deadlocks = Deadlocks::analyze(&level.map);
        assert!(!deadlocks.freeze(&level.map, &level.state));
    }

    #[test]
    fn corral_needs_a_push() {
        let level = parse(
            r"
######
#@$ .#
######
",
        );
        let deadlocks = Deadlocks::analyze(&level.map);
        let probe = CorralProbe::new(&level.map);
        assert!(!deadlocks.corral(&level.map, &level.state, false, &probe));
    }

    #[test]
    fn corral_wrong_goal_count() {
        let level = parse(
            r"
#######
#+$ $.#
#######
",
        );
        let deadlocks = Deadlocks::analyze(&level.map);
        let probe = CorralProbe::new(&level.map);

        let (pushed, mov) = level.state.try_move(&level.map, Dir::Right).unwrap();
        assert!(mov.is_push);
        // two boxes trapped on the right with a single goal
        assert!(deadlocks.corral(&level.map, &pushed, true, &probe));
    }

    #[test]
    fn corral_solvable_inside() {
        let level = parse(
            r"
######
#@$ .#
######
",
        );
        let deadlocks = Deadlocks::analyze(&level.map);
        let probe = CorralProbe::new(&level.map);

        let (pushed, mov) = level.state.try_move(&level.map, Dir::Right).unwrap();
        assert!(mov.is_push);
        // the box can still be pushed onto the goal inside
        assert!(!deadlocks.corral(&level.map, &pushed, true, &probe));
    }
}
