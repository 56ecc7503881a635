use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::time::{Duration, Instant};

use fnv::{FnvHashMap, FnvHashSet};
use log::debug;
use prettytable::{Cell, Row, Table};
use separator::Separatable;
use typed_arena::Arena;

use crate::config::{HeuristicKind, Method};
use crate::data::DIRECTIONS;
use crate::deadlock::{Deadlocks, SubSearch};
use crate::heuristic::{self, HeuristicCtx, INFINITY};
use crate::level::Level;
use crate::map::GoalMap;
use crate::moves::{Move, Moves};
use crate::state::State;
use crate::Solve;

#[derive(Debug)]
pub enum SearchResult {
    Solved(Solution),
    NoSolution(Failure),
}

/// A winning move sequence plus everything measured while finding it.
#[derive(Debug)]
pub struct Solution {
    pub moves: Moves,
    /// Every state along the way, the initial one included.
    pub path: Vec<State>,
    pub stats: Stats,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct Failure {
    pub stats: Stats,
    pub elapsed: Duration,
}

/// Callbacks the engines invoke as the search progresses.
/// `()` is the silent observer.
pub trait SearchObserver {
    fn on_depth(&mut self, _depth: i32, _stats: &Stats) {}
    fn on_finish(&mut self, _result: &SearchResult) {}
}

impl SearchObserver for () {}

/// Counts of touched states, kept per depth.
#[derive(PartialEq, Eq)]
pub struct Stats {
    created_states: Vec<i32>,
    visited_states: Vec<i32>,
    duplicate_states: Vec<i32>,
    pruned_states: Vec<i32>,
    frontier_states: i32,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Stats {
            created_states: vec![],
            visited_states: vec![],
            duplicate_states: vec![],
            pruned_states: vec![],
            frontier_states: 0,
        }
    }

    pub fn total_created(&self) -> i32 {
        self.created_states.iter().sum::<i32>()
    }

    pub fn total_unique_visited(&self) -> i32 {
        self.visited_states.iter().sum::<i32>()
    }

    pub fn total_reached_duplicates(&self) -> i32 {
        self.duplicate_states.iter().sum::<i32>()
    }

    pub fn total_pruned(&self) -> i32 {
        self.pruned_states.iter().sum::<i32>()
    }

    /// How many created states were still waiting in the open structure
    /// when the search ended.
    pub fn frontier(&self) -> i32 {
        self.frontier_states
    }

    pub(crate) fn add_created(&mut self, depth: i32) -> bool {
        Self::add(&mut self.created_states, depth)
    }

    pub(crate) fn add_unique_visited(&mut self, depth: i32) -> bool {
        Self::add(&mut self.visited_states, depth)
    }

    pub(crate) fn add_reached_duplicate(&mut self, depth: i32) -> bool {
        Self::add(&mut self.duplicate_states, depth)
    }

    pub(crate) fn add_pruned(&mut self, depth: i32) -> bool {
        Self::add(&mut self.pruned_states, depth)
    }

    fn add(counts: &mut Vec<i32>, depth: i32) -> bool {
        let mut ret = false;

        // while because some depths might be skipped
        while depth as usize >= counts.len() {
            counts.push(0);
            ret = true;
        }
        counts[depth as usize] += 1;
        ret
    }
}

impl Debug for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "created by depth: {:?}", self.created_states)?;
        writeln!(f, "unique visited by depth: {:?}", self.visited_states)?;
        writeln!(
            f,
            "reached duplicates by depth: {:?}",
            self.duplicate_states
        )?;
        writeln!(f, "pruned by depth: {:?}", self.pruned_states)?;
        writeln!(
            f,
            "total created: {}",
            self.total_created().separated_string()
        )?;
        writeln!(
            f,
            "total unique visited: {}",
            self.total_unique_visited().separated_string()
        )?;
        writeln!(
            f,
            "total reached duplicates: {}",
            self.total_reached_duplicates().separated_string()
        )?;
        writeln!(f, "total pruned: {}", self.total_pruned().separated_string())
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let created = self.total_created();
        let visited = self.total_unique_visited();
        let duplicates = self.total_reached_duplicates();
        let pruned = self.total_pruned();
        let left = created - visited - duplicates - pruned;
        writeln!(f, "States created total: {}", created.separated_string())?;
        writeln!(
            f,
            "Unique states visited total: {}",
            visited.separated_string()
        )?;
        writeln!(
            f,
            "Reached duplicates total: {}",
            duplicates.separated_string()
        )?;
        writeln!(f, "Pruned total: {}", pruned.separated_string())?;
        writeln!(
            f,
            "Created but not reached total: {}",
            left.separated_string()
        )?;
        writeln!(
            f,
            "Left in frontier: {}",
            self.frontier_states.separated_string()
        )?;
        writeln!(f)?;

        let mut table = Table::new();
        table.set_titles(Row::new(vec![
            Cell::new("depth"),
            Cell::new("created"),
            Cell::new("unique visited"),
            Cell::new("duplicates"),
            Cell::new("pruned"),
        ]));
        // created_states is always the longest vec
        for depth in 0..self.created_states.len() {
            let visited = if depth < self.visited_states.len() {
                self.visited_states[depth]
            } else {
                0
            };
            let duplicates = if depth < self.duplicate_states.len() {
                self.duplicate_states[depth]
            } else {
                0
            };
            let pruned = if depth < self.pruned_states.len() {
                self.pruned_states[depth]
            } else {
                0
            };
            table.add_row(Row::new(vec![
                Cell::new(&depth.to_string()),
                Cell::new(&self.created_states[depth].separated_string()),
                Cell::new(&visited.separated_string()),
                Cell::new(&duplicates.separated_string()),
                Cell::new(&pruned.separated_string()),
            ]));
        }
        write!(f, "{}", table)
    }
}

struct SearchNode<'a> {
    state: State,
    parent: Option<&'a SearchNode<'a>>,
    action: Option<Move>,
    dist: i32,
}

#[derive(Clone, Copy)]
struct OpenEntry<'a> {
    priority: (i32, i32),
    node: &'a SearchNode<'a>,
}

impl PartialOrd for OpenEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // intentionally reversed so the BinaryHeap pops the best entry
        // first, with the state order as a deterministic tie-break
        (other.priority, &other.node.state).cmp(&(self.priority, &self.node.state))
    }
}

impl PartialEq for OpenEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry<'_> {}

impl Solve for Level {
    fn solve(&self, method: Method, observer: &mut dyn SearchObserver) -> SearchResult {
        solve(self, method, observer)
    }
}

fn solve(level: &Level, method: Method, observer: &mut dyn SearchObserver) -> SearchResult {
    assert_eq!(level.state.boxes.len(), level.map.goals.len());

    let started = Instant::now();

    debug!("Analyzing deadlocks...");
    let deadlocks = Deadlocks::analyze(&level.map);
    debug!("Analyzed deadlocks");

    let (solved, stats) = match method {
        Method::AStar(kind) => informed(
            &level.map,
            &level.state,
            false,
            kind,
            &deadlocks,
            observer,
        ),
        Method::Greedy(kind) => informed(&level.map, &level.state, true, kind, &deadlocks, observer),
        Method::Bfs { prune } => uninformed(
            &level.map,
            &level.state,
            false,
            prune,
            &deadlocks,
            observer,
        ),
        Method::Dfs { prune } => {
            uninformed(&level.map, &level.state, true, prune, &deadlocks, observer)
        }
    };
    let elapsed = started.elapsed();

    let result = match solved {
        Some((moves, path)) => SearchResult::Solved(Solution {
            moves,
            path,
            stats,
            elapsed,
        }),
        None => SearchResult::NoSolution(Failure { stats, elapsed }),
    };
    observer.on_finish(&result);
    result
}

fn informed(
    map: &GoalMap,
    initial: &State,
    greedy: bool,
    kind: HeuristicKind,
    deadlocks: &Deadlocks,
    observer: &mut dyn SearchObserver,
) -> (Option<(Moves, Vec<State>)>, Stats) {
    debug!("Search called");

    let heuristic = heuristic::select(kind);
    let probe = CorralProbe::new(map);
    let ctx = HeuristicCtx {
        map,
        deadlocks,
        sub: &probe,
    };

    let arena = Arena::new();
    let mut stats = Stats::new();
    let mut to_visit = BinaryHeap::new();
    let mut closed = FnvHashSet::default();
    // tentative best distance per state, only maintained for a-star
    let mut best_g = FnvHashMap::default();

    let root: &SearchNode<'_> = arena.alloc(SearchNode {
        state: initial.clone(),
        parent: None,
        action: None,
        dist: 0,
    });
    stats.add_created(0);
    let h = heuristic.estimate(&ctx, &root.state, false);
    if h == INFINITY {
        stats.add_pruned(0);
    } else {
        if !greedy {
            best_g.insert(root.state.clone(), 0);
        }
        to_visit.push(OpenEntry {
            priority: priority(greedy, 0, h),
            node: root,
        });
    }

    while let Some(entry) = to_visit.pop() {
        let cur = entry.node;
        if !closed.insert(cur.state.clone()) {
            stats.add_reached_duplicate(cur.dist);
            continue;
        }
        if stats.add_unique_visited(cur.dist) {
            observer.on_depth(cur.dist, &stats);
        }

        if map.is_solved(&cur.state) {
            debug!("Solved, backtracking path");
            stats.frontier_states = to_visit.len() as i32;
            return (Some(backtrack_path(cur)), stats);
        }

        for &dir in &DIRECTIONS {
            if let Some((new_state, mov)) = cur.state.try_move(map, dir) {
                let dist = cur.dist + 1;
                stats.add_created(dist);

                if greedy {
                    if closed.contains(&new_state) {
                        continue;
                    }
                } else if let Some(&g) = best_g.get(&new_state) {
                    // requeue only on a strictly better path
                    if g <= dist {
                        continue;
                    }
                }

                let h = heuristic.estimate(&ctx, &new_state, mov.is_push);
                if h == INFINITY {
                    stats.add_pruned(dist);
                    continue;
                }

                if !greedy {
                    best_g.insert(new_state.clone(), dist);
                }
                let node: &SearchNode<'_> = arena.alloc(SearchNode {
                    state: new_state,
                    parent: Some(cur),
                    action: Some(mov),
                    dist,
                });
                to_visit.push(OpenEntry {
                    priority: priority(greedy, dist, h),
                    node,
                });
            }
        }
    }

    stats.frontier_states = 0;
    (None, stats)
}

fn priority(greedy: bool, dist: i32, h: i32) -> (i32, i32) {
    if greedy {
        (h, 0)
    } else {
        (dist + h, dist)
    }
}

fn uninformed(
    map: &GoalMap,
    initial: &State,
    depth_first: bool,
    prune: bool,
    deadlocks: &Deadlocks,
    observer: &mut dyn SearchObserver,
) -> (Option<(Moves, Vec<State>)>, Stats) {
    debug!("Search called");

    let arena = Arena::new();
    let mut stats = Stats::new();
    let mut to_visit = VecDeque::new();
    let mut seen = FnvHashSet::default();

    let root: &SearchNode<'_> = arena.alloc(SearchNode {
        state: initial.clone(),
        parent: None,
        action: None,
        dist: 0,
    });
    stats.add_created(0);
    seen.insert(root.state.clone());
    to_visit.push_back(root);

    loop {
        let cur = if depth_first {
            to_visit.pop_back()
        } else {
            to_visit.pop_front()
        };
        let cur = match cur {
            Some(cur) => cur,
            None => break,
        };

        if stats.add_unique_visited(cur.dist) {
            observer.on_depth(cur.dist, &stats);
        }

        if map.is_solved(&cur.state) {
            debug!("Solved, backtracking path");
            stats.frontier_states = to_visit.len() as i32;
            return (Some(backtrack_path(cur)), stats);
        }

        for &dir in &DIRECTIONS {
            if let Some((new_state, mov)) = cur.state.try_move(map, dir) {
                let dist = cur.dist + 1;
                stats.add_created(dist);
                if !seen.insert(new_state.clone()) {
                    stats.add_reached_duplicate(dist);
                    continue;
                }
                // walking never creates a deadlock, only pushes are checked
                if prune
                    && mov.is_push
                    && (deadlocks.simple(&new_state) || deadlocks.freeze(map, &new_state))
                {
                    stats.add_pruned(dist);
                    continue;
                }
                let node: &SearchNode<'_> = arena.alloc(SearchNode {
                    state: new_state,
                    parent: Some(cur),
                    action: Some(mov),
                    dist,
                });
                to_visit.push_back(node);
            }
        }
    }

    stats.frontier_states = 0;
    (None, stats)
}

fn backtrack_path(goal: &SearchNode<'_>) -> (Moves, Vec<State>) {
    let mut moves = Vec::new();
    let mut path = Vec::new();

    let mut cur = goal;
    path.push(cur.state.clone());
    while let (Some(parent), Some(action)) = (cur.parent, cur.action) {
        moves.push(action);
        path.push(parent.state.clone());
        cur = parent;
    }

    moves.reverse();
    path.reverse();
    (Moves::new(moves), path)
}

/// Breadth-first probe over a reduced level for the corral detector.
/// No pruning and no stats, the sub-problems are tiny.
pub(crate) struct CorralProbe<'a> {
    map: &'a GoalMap,
}

impl<'a> CorralProbe<'a> {
    pub(crate) fn new(map: &'a GoalMap) -> Self {
        CorralProbe { map }
    }
}

impl SubSearch for CorralProbe<'_> {
    fn solvable(&self, start: State, is_goal: &mut dyn FnMut(&State) -> bool) -> bool {
        let mut to_visit = VecDeque::new();
        let mut seen = FnvHashSet::default();

        seen.insert(start.clone());
        to_visit.push_back(start);

        while let Some(cur) = to_visit.pop_front() {
            if is_goal(&cur) {
                return true;
            }
            for &dir in &DIRECTIONS {
                if let Some((new_state, _)) = cur.try_move(self.map, dir) {
                    if seen.insert(new_state.clone()) {
                        to_visit.push_back(new_state);
                    }
                }
            }
        }
        false
    }
}
