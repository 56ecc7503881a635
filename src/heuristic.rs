use pathfinding::prelude::{kuhn_munkres_min, Matrix};

use crate::config::HeuristicKind;
use crate::deadlock::{Deadlocks, SubSearch};
use crate::map::GoalMap;
use crate::state::State;

/// Estimate meaning "provably no solution from here".
pub(crate) const INFINITY: i32 = i32::max_value();

/// Everything an estimator may look at besides the state itself.
pub(crate) struct HeuristicCtx<'a> {
    pub(crate) map: &'a GoalMap,
    pub(crate) deadlocks: &'a Deadlocks,
    pub(crate) sub: &'a dyn SubSearch,
}

/// Lower estimate of the remaining moves. Variants ignore the fields of
/// `ctx` they have no use for.
pub(crate) trait Heuristic {
    fn estimate(&self, ctx: &HeuristicCtx<'_>, state: &State, pushed_box: bool) -> i32;
}

pub(crate) fn select(kind: HeuristicKind) -> Box<dyn Heuristic> {
    match kind {
        HeuristicKind::Manhattan => Box::new(Manhattan),
        HeuristicKind::ManhattanImproved => Box::new(ManhattanImproved),
        HeuristicKind::PlayerDistance => Box::new(PlayerDistance),
        HeuristicKind::Combined => Box::new(Combined),
        HeuristicKind::ManhattanDeadlock => Box::new(DeadlockAware {
            inner: Manhattan,
            corral: false,
        }),
        HeuristicKind::CombinedDeadlock => Box::new(DeadlockAware {
            inner: Combined,
            corral: true,
        }),
    }
}

/// Each box counts its closest goal, goals may be counted twice.
pub(crate) struct Manhattan;

impl Heuristic for Manhattan {
    fn estimate(&self, ctx: &HeuristicCtx<'_>, state: &State, _pushed_box: bool) -> i32 {
        let mut goal_dist_sum = 0;
        for &box_pos in &state.boxes {
            let mut min = i32::max_value();
            for &goal in &ctx.map.goals {
                let dist = box_pos.dist(goal);
                if dist < min {
                    min = dist;
                }
            }
            goal_dist_sum += min;
        }
        goal_dist_sum
    }
}

/// Cheapest one-to-one pairing of boxes and goals so two boxes never claim
/// the same goal. Equal or tighter than [`Manhattan`].
pub(crate) struct ManhattanImproved;

impl Heuristic for ManhattanImproved {
    fn estimate(&self, ctx: &HeuristicCtx<'_>, state: &State, _pushed_box: bool) -> i32 {
        if state.boxes.is_empty() {
            return 0;
        }

        // boxes and goals always come in equal numbers so the matrix is square
        let n = state.boxes.len();
        let mut weights = Matrix::new(n, n, 0);
        for (r, &box_pos) in state.boxes.iter().enumerate() {
            for (c, &goal) in ctx.map.goals.iter().enumerate() {
                weights[(r, c)] = box_pos.dist(goal);
            }
        }
        kuhn_munkres_min(&weights).0
    }
}

/// Distance from the player to the closest box - the cost of starting to be
/// useful. Knows nothing about goals, only used in combinations.
pub(crate) struct PlayerDistance;

impl Heuristic for PlayerDistance {
    fn estimate(&self, _ctx: &HeuristicCtx<'_>, state: &State, _pushed_box: bool) -> i32 {
        if state.boxes.is_empty() {
            return 0;
        }

        let mut closest_box = i32::max_value();
        for &box_pos in &state.boxes {
            let dist = state.player_pos.dist(box_pos);
            if dist < closest_box {
                closest_box = dist;
            }
        }
        closest_box
    }
}

pub(crate) struct Combined;

impl Heuristic for Combined {
    fn estimate(&self, ctx: &HeuristicCtx<'_>, state: &State, pushed_box: bool) -> i32 {
        Manhattan.estimate(ctx, state, pushed_box) + PlayerDistance.estimate(ctx, state, pushed_box)
    }
}

/// Runs the deadlock detectors before delegating - doomed states get
/// [`INFINITY`] and fall out of the search.
pub(crate) struct DeadlockAware<H> {
    inner: H,
    corral: bool,
}

impl<H: Heuristic> Heuristic for DeadlockAware<H> {
    fn estimate(&self, ctx: &HeuristicCtx<'_>, state: &State, pushed_box: bool) -> i32 {
        if ctx.deadlocks.simple(state) || ctx.deadlocks.freeze(ctx.map, state) {
            return INFINITY;
        }
        if self.corral && ctx.deadlocks.corral(ctx.map, state, pushed_box, ctx.sub) {
            return INFINITY;
        }
        self.inner.estimate(ctx, state, pushed_box)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dir;
    use crate::level::Level;
    use crate::solver::CorralProbe;

    fn parse(xsb: &str) -> Level {
        xsb.trim_start_matches('\n').parse().unwrap()
    }

    #[test]
    fn estimates_two_boxes() {
        let level = parse(
            r"
######
#$  .#
#    #
#    #
#   $#
#    #
# .  #
#@   #
######
",
        );
        let deadlocks = Deadlocks::analyze(&level.map);
        let probe = CorralProbe::new(&level.map);
        let ctx = HeuristicCtx {
            map: &level.map,
            deadlocks: &deadlocks,
            sub: &probe,
        };

        // both boxes are closest to the same goal
        assert_eq!(Manhattan.estimate(&ctx, &level.state, false), 6);
        // the assignment makes one of them take the farther goal
        assert_eq!(ManhattanImproved.estimate(&ctx, &level.state, false), 7);
        assert_eq!(PlayerDistance.estimate(&ctx, &level.state, false), 6);
        assert_eq!(Combined.estimate(&ctx, &level.state, false), 12);
    }

    #[test]
    fn deadlock_aware_infinity() {
        let level = parse(
            r"
#####
#@$##
# .##
#####
",
        );
        let deadlocks = Deadlocks::analyze(&level.map);
        let probe = CorralProbe::new(&level.map);
        let ctx = HeuristicCtx {
            map: &level.map,
            deadlocks: &deadlocks,
            sub: &probe,
        };

        let plain = select(HeuristicKind::Manhattan);
        let aware = select(HeuristicKind::ManhattanDeadlock);
        assert_eq!(plain.estimate(&ctx, &level.state, false), 1);
        assert_eq!(aware.estimate(&ctx, &level.state, false), INFINITY);
    }

    #[test]
    fn corral_aware_infinity_after_push() {
        let level = parse(
            r"
#######
#+$ $.#
#######
",
        );
        let deadlocks = Deadlocks::analyze(&level.map);
        let probe = CorralProbe::new(&level.map);
        let ctx = HeuristicCtx {
            map: &level.map,
            deadlocks: &deadlocks,
            sub: &probe,
        };
        let (pushed, mov) = level.state.try_move(&level.map, Dir::Right).unwrap();
        assert!(mov.is_push);

        let aware = select(HeuristicKind::CombinedDeadlock);
        assert_eq!(aware.estimate(&ctx, &pushed, true), INFINITY);
        // without the push there is no corral signal and the state looks fine
        assert_ne!(aware.estimate(&ctx, &pushed, false), INFINITY);
    }
}
